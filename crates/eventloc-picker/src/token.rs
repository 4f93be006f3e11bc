//! Request identity for discarding out-of-order async completions.

/// Identifies one issued request. Only the most recently issued token of a
/// [`RequestGeneration`] is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestToken(u64);

/// Monotonic generation counter.
#[derive(Debug, Default)]
pub struct RequestGeneration {
    current: u64,
}

impl RequestGeneration {
    /// Issues a new token, making every earlier one stale.
    pub fn issue(&mut self) -> RequestToken {
        self.current += 1;
        RequestToken(self.current)
    }

    #[must_use]
    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.current
    }

    /// Makes every issued token stale without issuing a new one.
    pub fn invalidate(&mut self) {
        self.current += 1;
    }
}
