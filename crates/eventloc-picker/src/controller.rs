//! Picker state machine.
//!
//! The controller owns the query text, the suggestion list, the current
//! selection and the map. It performs no I/O: callers start a request with a
//! `begin_*` method, run it, and hand the outcome back to the matching
//! `finish_*` method together with the token they were given. Completions
//! carrying a stale token are dropped, so a slow search can never overwrite a
//! newer search or a selection made after it started.

use eventloc_core::{CanonicalLocation, ManualLocationInput, PlaceCandidate, ValidationErrors};
use thiserror::Error;

use crate::fetcher::meets_min_len;
use crate::map::{reset_view, show_location, MapView};
use crate::resolver::ResolveError;
use crate::token::{RequestGeneration, RequestToken};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerState {
    /// No search running and nothing selected.
    Idle,
    /// A settled query is being searched.
    Searching,
    /// Candidates are shown under the focused input.
    SuggestionsVisible,
    /// A candidate or map click is being resolved.
    Resolving,
    /// A location is selected.
    Selected,
}

/// What the picker currently reports to its caller.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Selection {
    /// Nothing was ever selected.
    #[default]
    NoSelection,
    Selected(CanonicalLocation),
    /// A selection existed and was cleared.
    Cleared,
}

impl Selection {
    /// The location value a form should hold: the selection, the empty
    /// location after a clear, or nothing.
    #[must_use]
    pub fn to_location(&self) -> Option<CanonicalLocation> {
        match self {
            Self::NoSelection => None,
            Self::Selected(location) => Some(location.clone()),
            Self::Cleared => Some(CanonicalLocation::empty()),
        }
    }

    #[must_use]
    pub fn location(&self) -> Option<&CanonicalLocation> {
        match self {
            Self::Selected(location) => Some(location),
            Self::NoSelection | Self::Cleared => None,
        }
    }
}

/// A recoverable failure shown next to the picker.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PickerError {
    #[error("No address was found for that location.")]
    NotFound,
    #[error("Failed to fetch place details. Try again or enter the address manually.")]
    Transport,
    #[error(transparent)]
    Validation(ValidationErrors),
    #[error("The request was superseded by a newer one.")]
    Superseded,
}

impl From<&ResolveError> for PickerError {
    fn from(err: &ResolveError) -> Self {
        match err {
            ResolveError::NotFound => Self::NotFound,
            ResolveError::Transport(_) => Self::Transport,
        }
    }
}

pub struct PickerController<M> {
    map: M,
    state: PickerState,
    /// State to return to when the manual-entry overlay is cancelled.
    manual_return: Option<PickerState>,
    query: String,
    suggestions: Vec<PlaceCandidate>,
    selection: Selection,
    error: Option<PickerError>,
    focused: bool,
    min_query_len: usize,
    searches: RequestGeneration,
    resolutions: RequestGeneration,
    blurs: RequestGeneration,
}

impl<M: MapView> PickerController<M> {
    /// Creates an idle controller and resets `map` to the world view.
    pub fn new(mut map: M, min_query_len: usize) -> Self {
        reset_view(&mut map);
        Self {
            map,
            state: PickerState::Idle,
            manual_return: None,
            query: String::new(),
            suggestions: Vec::new(),
            selection: Selection::NoSelection,
            error: None,
            focused: false,
            min_query_len,
            searches: RequestGeneration::default(),
            resolutions: RequestGeneration::default(),
            blurs: RequestGeneration::default(),
        }
    }

    #[must_use]
    pub fn state(&self) -> PickerState {
        self.state
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub fn suggestions(&self) -> &[PlaceCandidate] {
        &self.suggestions
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    #[must_use]
    pub fn error(&self) -> Option<&PickerError> {
        self.error.as_ref()
    }

    #[must_use]
    pub fn map(&self) -> &M {
        &self.map
    }

    #[must_use]
    pub fn is_manual_entry_open(&self) -> bool {
        self.manual_return.is_some()
    }

    #[must_use]
    pub fn min_query_len(&self) -> usize {
        self.min_query_len
    }

    /// Records typed text. A query below the minimum length hides the
    /// suggestions and drops any search still in flight.
    pub fn input(&mut self, text: &str) {
        text.clone_into(&mut self.query);
        self.focused = true;
        self.error = None;

        if !meets_min_len(&self.query, self.min_query_len) {
            self.searches.invalidate();
            self.suggestions.clear();
            if matches!(
                self.state,
                PickerState::Searching | PickerState::SuggestionsVisible
            ) {
                self.state = self.resting_state();
            }
        }
    }

    /// Starts a search for a settled query. Returns `None`, with suggestions
    /// cleared, when the query is too short to search.
    pub fn begin_search(&mut self, query: &str) -> Option<RequestToken> {
        if !meets_min_len(query, self.min_query_len) {
            self.searches.invalidate();
            self.suggestions.clear();
            self.state = self.resting_state();
            return None;
        }
        if self.state != PickerState::Resolving {
            self.state = PickerState::Searching;
        }
        Some(self.searches.issue())
    }

    /// Applies search results. Returns `false` when `token` is stale and the
    /// results were dropped.
    pub fn finish_search(&mut self, token: RequestToken, candidates: Vec<PlaceCandidate>) -> bool {
        if !self.searches.is_current(token) {
            tracing::debug!(?token, "dropping stale suggestions");
            return false;
        }

        if candidates.is_empty() || !self.focused {
            self.suggestions.clear();
            self.state = self.resting_state();
        } else {
            self.suggestions = candidates;
            self.state = PickerState::SuggestionsVisible;
        }
        true
    }

    pub fn focus(&mut self) {
        self.focused = true;
        self.blurs.invalidate();
        if !self.suggestions.is_empty() && self.state == self.resting_state() {
            self.state = PickerState::SuggestionsVisible;
        }
    }

    /// Marks the input as unfocused. Suggestions stay visible until
    /// [`blur_elapsed`](Self::blur_elapsed) is called with the returned token,
    /// so a click on a suggestion can still land.
    pub fn blur(&mut self) -> RequestToken {
        self.focused = false;
        self.blurs.issue()
    }

    /// Hides suggestions once the blur grace period has run out. Returns
    /// `false` when focus came back or a selection happened in the meantime.
    pub fn blur_elapsed(&mut self, token: RequestToken) -> bool {
        if !self.blurs.is_current(token) || self.focused {
            return false;
        }
        self.suggestions.clear();
        if self.state == PickerState::SuggestionsVisible {
            self.state = self.resting_state();
        }
        true
    }

    /// Starts resolving a chosen candidate or a map click.
    ///
    /// Clears the query and suggestions, and makes every in-flight search and
    /// earlier resolution stale.
    pub fn begin_resolve(&mut self) -> RequestToken {
        self.query.clear();
        self.suggestions.clear();
        self.searches.invalidate();
        self.blurs.invalidate();
        self.error = None;
        self.state = PickerState::Resolving;
        self.resolutions.issue()
    }

    /// Applies a resolution outcome.
    ///
    /// Returns `Ok(true)` when the location was selected and `Ok(false)` when
    /// `token` is stale and the outcome was dropped.
    ///
    /// # Errors
    ///
    /// Returns the failure for a current token; the picker returns to a
    /// resting state with the error recorded.
    pub fn finish_resolve(
        &mut self,
        token: RequestToken,
        outcome: Result<CanonicalLocation, ResolveError>,
    ) -> Result<bool, PickerError> {
        if !self.resolutions.is_current(token) {
            tracing::debug!(?token, "dropping stale resolution");
            return Ok(false);
        }

        match outcome {
            Ok(location) => {
                self.select(location);
                Ok(true)
            }
            Err(e) => {
                tracing::warn!(error = %e, "location resolution failed");
                let err = PickerError::from(&e);
                self.error = Some(err.clone());
                self.state = self.resting_state();
                Err(err)
            }
        }
    }

    /// Opens the manual-entry overlay. Not available while a resolution is in
    /// flight.
    pub fn open_manual_entry(&mut self) -> bool {
        if self.state == PickerState::Resolving {
            return false;
        }
        if self.manual_return.is_none() {
            self.manual_return = Some(self.state);
        }
        true
    }

    /// Closes the overlay and returns to the state it was opened from.
    pub fn cancel_manual_entry(&mut self) {
        if let Some(previous) = self.manual_return.take() {
            self.state = previous;
            self.error = None;
        }
    }

    /// Validates a manual entry and selects it.
    ///
    /// # Errors
    ///
    /// Returns [`PickerError::Validation`] with every field error; the overlay
    /// stays open so the entry can be corrected.
    pub fn submit_manual(
        &mut self,
        input: ManualLocationInput,
    ) -> Result<CanonicalLocation, PickerError> {
        match input.into_location() {
            Ok(location) => {
                self.resolutions.invalidate();
                self.select(location.clone());
                tracing::debug!("manual location selected");
                Ok(location)
            }
            Err(errors) => {
                let err = PickerError::Validation(errors);
                self.error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Drops the selection and resets the map. The selection becomes
    /// [`Selection::Cleared`].
    pub fn clear(&mut self) -> &Selection {
        self.query.clear();
        self.suggestions.clear();
        self.searches.invalidate();
        self.resolutions.invalidate();
        self.blurs.invalidate();
        self.error = None;
        self.manual_return = None;
        self.selection = Selection::Cleared;
        self.state = PickerState::Idle;
        reset_view(&mut self.map);
        &self.selection
    }

    /// Makes every in-flight request stale.
    pub fn invalidate_pending(&mut self) {
        self.searches.invalidate();
        self.resolutions.invalidate();
        self.blurs.invalidate();
        if matches!(self.state, PickerState::Searching | PickerState::Resolving) {
            self.state = self.resting_state();
        }
    }

    fn select(&mut self, location: CanonicalLocation) {
        self.query.clear();
        self.suggestions.clear();
        self.searches.invalidate();
        self.error = None;
        self.manual_return = None;
        show_location(&mut self.map, &location);
        self.selection = Selection::Selected(location);
        self.state = PickerState::Selected;
    }

    fn resting_state(&self) -> PickerState {
        match self.selection {
            Selection::Selected(_) => PickerState::Selected,
            Selection::NoSelection | Selection::Cleared => PickerState::Idle,
        }
    }
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;
