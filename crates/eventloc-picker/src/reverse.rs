//! Reverse geocoding of a map click.

use std::sync::Arc;

use eventloc_core::{canonical_from_details, CanonicalLocation};
use eventloc_places::Geocoder;

use crate::resolver::ResolveError;

pub struct ReverseGeocoder<G: ?Sized> {
    geocoder: Arc<G>,
}

impl<G: Geocoder + ?Sized> ReverseGeocoder<G> {
    pub fn new(geocoder: Arc<G>) -> Self {
        Self { geocoder }
    }

    /// The address at a clicked point.
    ///
    /// The result keeps the clicked coordinates rather than the matched
    /// address's, so a marker stays under the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::NotFound`] when nothing is found at the point and
    /// [`ResolveError::Transport`] for any other provider failure.
    pub async fn locate(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<CanonicalLocation, ResolveError> {
        let details = self.geocoder.reverse_geocode(latitude, longitude).await?;
        let mut location = canonical_from_details(details);
        location.latitude = Some(latitude);
        location.longitude = Some(longitude);
        Ok(location)
    }
}
