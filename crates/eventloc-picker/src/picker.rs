//! Async driver running a [`PickerController`] against a geocoder.

use std::sync::Arc;
use std::time::Duration;

use eventloc_core::{CanonicalLocation, ManualLocationInput, PlaceCandidate};
use eventloc_places::Geocoder;
use tokio::sync::watch;

use crate::controller::{PickerController, PickerError, PickerState, Selection};
use crate::debounce::{Debouncer, DEFAULT_DEBOUNCE};
use crate::fetcher::{SuggestionFetcher, DEFAULT_MIN_QUERY_LEN};
use crate::map::MapView;
use crate::resolver::{PlaceResolver, ResolveError};
use crate::reverse::ReverseGeocoder;
use crate::token::RequestToken;

/// How long suggestions stay up after the input loses focus.
pub const BLUR_GRACE: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickerConfig {
    pub debounce: Duration,
    pub blur_grace: Duration,
    pub min_query_len: usize,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            blur_grace: BLUR_GRACE,
            min_query_len: DEFAULT_MIN_QUERY_LEN,
        }
    }
}

impl PickerConfig {
    #[must_use]
    pub fn from_app_config(config: &eventloc_core::AppConfig) -> Self {
        Self {
            debounce: Duration::from_millis(config.picker_debounce_ms),
            min_query_len: config.picker_min_query_len,
            ..Self::default()
        }
    }
}

/// A timer-driven change surfaced by [`Picker::next_event`].
#[derive(Debug, Clone, PartialEq)]
pub enum PickerEvent {
    /// A settled query was searched; these are the visible suggestions.
    Suggestions(Vec<PlaceCandidate>),
    /// The blur grace period ran out and suggestions were hidden.
    SuggestionsHidden,
}

/// Location picker bound to one task.
///
/// Typing feeds a debouncer; [`next_event`](Self::next_event) waits for the
/// query to settle (or for a blur to expire) and runs the search. Selections
/// are published on a [`watch`] channel as well as returned.
pub struct Picker<G: ?Sized, M> {
    controller: PickerController<M>,
    fetcher: SuggestionFetcher<G>,
    resolver: PlaceResolver<G>,
    reverse: ReverseGeocoder<G>,
    queries: Debouncer<String>,
    blur_timer: Debouncer<RequestToken>,
    selection_tx: watch::Sender<Selection>,
    closed: bool,
}

impl<G, M> Picker<G, M>
where
    G: Geocoder + ?Sized,
    M: MapView,
{
    pub fn new(geocoder: Arc<G>, map: M) -> Self {
        Self::with_config(geocoder, map, PickerConfig::default())
    }

    pub fn with_config(geocoder: Arc<G>, map: M, config: PickerConfig) -> Self {
        let (selection_tx, _) = watch::channel(Selection::NoSelection);
        Self {
            controller: PickerController::new(map, config.min_query_len),
            fetcher: SuggestionFetcher::new(Arc::clone(&geocoder), config.min_query_len),
            resolver: PlaceResolver::new(Arc::clone(&geocoder)),
            reverse: ReverseGeocoder::new(geocoder),
            queries: Debouncer::new(config.debounce),
            blur_timer: Debouncer::new(config.blur_grace),
            selection_tx,
            closed: false,
        }
    }

    #[must_use]
    pub fn controller(&self) -> &PickerController<M> {
        &self.controller
    }

    #[must_use]
    pub fn state(&self) -> PickerState {
        self.controller.state()
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        self.controller.selection()
    }

    /// Receives every selection change, including [`Selection::Cleared`].
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Selection> {
        self.selection_tx.subscribe()
    }

    /// Whether typing `text` would schedule a search: it is long enough and
    /// the geocoder is ready.
    #[must_use]
    pub fn accepts_query(&self, text: &str) -> bool {
        self.fetcher.accepts(text)
    }

    /// Records typed text and restarts the debounce timer.
    pub fn type_query(&mut self, text: &str) {
        if self.closed {
            return;
        }
        self.controller.input(text);
        if self.fetcher.accepts(text) {
            self.queries.update(text.to_owned());
        } else {
            self.queries.cancel();
        }
    }

    pub fn focus(&mut self) {
        if self.closed {
            return;
        }
        self.blur_timer.cancel();
        self.controller.focus();
    }

    /// Starts the grace period after which suggestions are hidden.
    pub fn blur(&mut self) {
        if self.closed {
            return;
        }
        let token = self.controller.blur();
        self.blur_timer.update(token);
    }

    /// Waits for the next timer-driven change. Returns `None` after
    /// [`shutdown`](Self::shutdown).
    pub async fn next_event(&mut self) -> Option<PickerEvent> {
        if self.closed {
            return None;
        }

        tokio::select! {
            Some(query) = self.queries.next() => {
                Some(PickerEvent::Suggestions(self.run_search(&query).await))
            }
            Some(token) = self.blur_timer.next() => {
                self.controller.blur_elapsed(token);
                Some(PickerEvent::SuggestionsHidden)
            }
            else => None,
        }
    }

    /// Waits for the typed query to settle, searches it, and returns the
    /// visible suggestions. Blur expiries on the way are applied and skipped.
    pub async fn next_debounced(&mut self) -> Option<Vec<PlaceCandidate>> {
        loop {
            match self.next_event().await? {
                PickerEvent::Suggestions(candidates) => return Some(candidates),
                PickerEvent::SuggestionsHidden => {}
            }
        }
    }

    /// Resolves a candidate picked from the suggestion list and selects it.
    ///
    /// # Errors
    ///
    /// Returns [`PickerError::NotFound`] or [`PickerError::Transport`] when the
    /// lookup fails; the previous selection is kept.
    pub async fn select_candidate(
        &mut self,
        place_id: &str,
    ) -> Result<CanonicalLocation, PickerError> {
        self.settle_input();
        let token = self.controller.begin_resolve();
        let outcome = self.resolver.resolve(place_id).await;
        self.apply_resolution(token, outcome)
    }

    /// Reverse geocodes a map click and selects the result at the clicked point.
    ///
    /// # Errors
    ///
    /// Returns [`PickerError::NotFound`] when nothing is found at the point, or
    /// [`PickerError::Transport`] when the lookup fails.
    pub async fn click_map(
        &mut self,
        latitude: f64,
        longitude: f64,
    ) -> Result<CanonicalLocation, PickerError> {
        self.settle_input();
        let token = self.controller.begin_resolve();
        let outcome = self.reverse.locate(latitude, longitude).await;
        self.apply_resolution(token, outcome)
    }

    pub fn open_manual_entry(&mut self) -> bool {
        self.controller.open_manual_entry()
    }

    pub fn cancel_manual_entry(&mut self) {
        self.controller.cancel_manual_entry();
    }

    /// Validates and selects a hand-typed location.
    ///
    /// # Errors
    ///
    /// Returns [`PickerError::Validation`] with every field error.
    pub fn submit_manual(
        &mut self,
        input: ManualLocationInput,
    ) -> Result<CanonicalLocation, PickerError> {
        self.settle_input();
        let location = self.controller.submit_manual(input)?;
        self.publish();
        Ok(location)
    }

    /// Drops the selection; subscribers see [`Selection::Cleared`].
    pub fn clear(&mut self) -> Selection {
        self.settle_input();
        let selection = self.controller.clear().clone();
        self.publish();
        selection
    }

    /// Cancels pending timers and marks in-flight work stale. The picker
    /// ignores input afterwards.
    pub fn shutdown(&mut self) {
        self.queries.cancel();
        self.blur_timer.cancel();
        self.controller.invalidate_pending();
        self.closed = true;
        tracing::debug!("picker shut down");
    }

    async fn run_search(&mut self, query: &str) -> Vec<PlaceCandidate> {
        let Some(token) = self.controller.begin_search(query) else {
            return Vec::new();
        };
        let candidates = self.fetcher.fetch(query).await;
        self.controller.finish_search(token, candidates);
        self.controller.suggestions().to_vec()
    }

    fn apply_resolution(
        &mut self,
        token: RequestToken,
        outcome: Result<CanonicalLocation, ResolveError>,
    ) -> Result<CanonicalLocation, PickerError> {
        if !self.controller.finish_resolve(token, outcome)? {
            return Err(PickerError::Superseded);
        }
        self.publish();
        self.controller
            .selection()
            .location()
            .cloned()
            .ok_or(PickerError::Superseded)
    }

    /// Selection and clearing end the typing session.
    fn settle_input(&mut self) {
        self.queries.cancel();
        self.blur_timer.cancel();
    }

    fn publish(&self) {
        self.selection_tx
            .send_replace(self.controller.selection().clone());
    }
}
