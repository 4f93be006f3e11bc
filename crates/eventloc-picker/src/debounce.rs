//! Trailing-edge debouncer on a tokio timer.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Delay between the last keystroke and the search it triggers.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Emits the most recent value once no new value has arrived for `delay`.
///
/// Each [`update`](Self::update) aborts the pending timer and starts a new
/// one. Nothing is emitted before the first update, and a value whose timer
/// fired but was superseded before it was read is dropped by
/// [`next`](Self::next). Dropping the debouncer aborts its timer.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    seq: u64,
    tx: mpsc::UnboundedSender<(u64, T)>,
    rx: mpsc::UnboundedReceiver<(u64, T)>,
    pending: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            delay,
            seq: 0,
            tx,
            rx,
            pending: None,
        }
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replaces the pending value and restarts the timer.
    ///
    /// Must be called from within a tokio runtime.
    pub fn update(&mut self, value: T) {
        self.abort_pending();
        self.seq += 1;

        let seq = self.seq;
        let tx = self.tx.clone();
        let deadline = Instant::now() + self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            // The receiver lives as long as the debouncer; a failed send means it is gone.
            let _ = tx.send((seq, value));
        }));
    }

    /// Drops the pending value, if any, without emitting it.
    pub fn cancel(&mut self) {
        self.abort_pending();
        self.seq += 1;
    }

    /// `true` from an [`update`](Self::update) until its value is read by
    /// [`next`](Self::next) or dropped by [`cancel`](Self::cancel), including
    /// after the timer has fired.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Waits for the next settled value.
    ///
    /// Pends indefinitely when nothing is scheduled, which makes it suitable as a
    /// `tokio::select!` branch.
    pub async fn next(&mut self) -> Option<T> {
        loop {
            let (seq, value) = self.rx.recv().await?;
            if seq == self.seq {
                self.pending = None;
                return Some(value);
            }
            tracing::trace!(seq, current = self.seq, "dropping superseded debounced value");
        }
    }

    fn abort_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG_WAIT: Duration = Duration::from_secs(5);

    #[tokio::test(start_paused = true)]
    async fn emits_only_the_last_value_in_the_window() {
        let mut debouncer = Debouncer::new(DEFAULT_DEBOUNCE);

        debouncer.update("v1");
        tokio::time::advance(Duration::from_millis(100)).await;
        debouncer.update("v2");
        tokio::time::advance(Duration::from_millis(100)).await;
        debouncer.update("v3");

        assert_eq!(debouncer.next().await, Some("v3"));
        assert!(tokio::time::timeout(LONG_WAIT, debouncer.next())
            .await
            .is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn waits_the_full_delay_after_the_last_update() {
        let mut debouncer = Debouncer::new(DEFAULT_DEBOUNCE);
        let start = Instant::now();

        debouncer.update(1);
        tokio::time::advance(Duration::from_millis(250)).await;
        debouncer.update(2);

        assert_eq!(debouncer.next().await, Some(2));
        assert!(start.elapsed() >= Duration::from_millis(550));
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_is_emitted_before_the_first_update() {
        let mut debouncer: Debouncer<&str> = Debouncer::new(DEFAULT_DEBOUNCE);
        assert!(!debouncer.is_pending());
        assert!(tokio::time::timeout(LONG_WAIT, debouncer.next())
            .await
            .is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_emission() {
        let mut debouncer = Debouncer::new(DEFAULT_DEBOUNCE);
        debouncer.update("stale");
        assert!(debouncer.is_pending());
        debouncer.cancel();

        assert!(tokio::time::timeout(LONG_WAIT, debouncer.next())
            .await
            .is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn fired_but_unread_value_is_superseded() {
        let mut debouncer = Debouncer::new(DEFAULT_DEBOUNCE);

        debouncer.update("old");
        // Let the first timer fire; its value sits unread in the channel.
        tokio::time::sleep(Duration::from_millis(400)).await;
        debouncer.update("new");

        assert_eq!(debouncer.next().await, Some("new"));
    }

    #[tokio::test(start_paused = true)]
    async fn fired_value_stays_pending_until_read() {
        let mut debouncer = Debouncer::new(DEFAULT_DEBOUNCE);

        debouncer.update("ready");
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(debouncer.is_pending());

        assert_eq!(debouncer.next().await, Some("ready"));
        assert!(!debouncer.is_pending());
    }
}
