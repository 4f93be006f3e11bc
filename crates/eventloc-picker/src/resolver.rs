//! Resolution of a chosen autocomplete candidate into a canonical location.

use std::sync::Arc;

use eventloc_core::{canonical_from_details, CanonicalLocation};
use eventloc_places::{Geocoder, PlacesError};
use thiserror::Error;

/// Why a place id or a coordinate could not be turned into a location.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no location found")]
    NotFound,
    #[error("location lookup failed: {0}")]
    Transport(#[source] PlacesError),
}

impl From<PlacesError> for ResolveError {
    fn from(err: PlacesError) -> Self {
        if err.is_not_found() {
            Self::NotFound
        } else {
            Self::Transport(err)
        }
    }
}

/// Looks up place details and normalizes them.
pub struct PlaceResolver<G: ?Sized> {
    geocoder: Arc<G>,
}

impl<G: Geocoder + ?Sized> PlaceResolver<G> {
    pub fn new(geocoder: Arc<G>) -> Self {
        Self { geocoder }
    }

    /// The canonical location for `place_id`, with `is_manually_entered = false`.
    ///
    /// A place without a country component resolves with an empty country;
    /// that is a validation concern, not a lookup failure.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::NotFound`] if the provider has no such place and
    /// [`ResolveError::Transport`] for any other provider failure.
    pub async fn resolve(&self, place_id: &str) -> Result<CanonicalLocation, ResolveError> {
        let details = self.geocoder.place_details(place_id).await?;
        tracing::debug!(place_id, "place resolved");
        Ok(canonical_from_details(details))
    }
}
