//! Autocomplete suggestions for a settled query.

use std::sync::Arc;

use eventloc_core::PlaceCandidate;
use eventloc_places::Geocoder;

/// Shortest query the picker searches for.
pub const DEFAULT_MIN_QUERY_LEN: usize = 3;

/// Turns a settled query into ranked candidates.
///
/// Short queries and an unready geocoder never reach the network. Failures are
/// logged and yield an empty list, which hides the suggestions panel.
pub struct SuggestionFetcher<G: ?Sized> {
    geocoder: Arc<G>,
    min_query_len: usize,
}

impl<G: Geocoder + ?Sized> SuggestionFetcher<G> {
    pub fn new(geocoder: Arc<G>, min_query_len: usize) -> Self {
        Self {
            geocoder,
            min_query_len,
        }
    }

    #[must_use]
    pub fn min_query_len(&self) -> usize {
        self.min_query_len
    }

    /// Whether `query` would be sent to the geocoder.
    #[must_use]
    pub fn accepts(&self, query: &str) -> bool {
        meets_min_len(query, self.min_query_len) && self.geocoder.is_ready()
    }

    /// Candidates for `query`, in the provider's order.
    pub async fn fetch(&self, query: &str) -> Vec<PlaceCandidate> {
        if !self.accepts(query) {
            return Vec::new();
        }

        match self.geocoder.autocomplete(query.trim()).await {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!(error = %e, query, "suggestion fetch failed");
                Vec::new()
            }
        }
    }
}

pub(crate) fn meets_min_len(query: &str, min_query_len: usize) -> bool {
    query.trim().chars().count() >= min_query_len
}
