//! The geocoding capability the picker and the server depend on.

use async_trait::async_trait;
use eventloc_core::{PlaceCandidate, PlaceDetails};

use crate::client::GoogleMapsClient;
use crate::error::PlacesError;

/// Address search, place lookup and reverse geocoding.
///
/// Implemented by [`GoogleMapsClient`] and by in-memory fakes in tests.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Whether the backing service can take requests yet.
    fn is_ready(&self) -> bool {
        true
    }

    async fn autocomplete(&self, query: &str) -> Result<Vec<PlaceCandidate>, PlacesError>;

    async fn place_details(&self, place_id: &str) -> Result<PlaceDetails, PlacesError>;

    async fn reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<PlaceDetails, PlacesError>;
}

#[async_trait]
impl Geocoder for GoogleMapsClient {
    fn is_ready(&self) -> bool {
        self.has_api_key()
    }

    async fn autocomplete(&self, query: &str) -> Result<Vec<PlaceCandidate>, PlacesError> {
        GoogleMapsClient::autocomplete(self, query).await
    }

    async fn place_details(&self, place_id: &str) -> Result<PlaceDetails, PlacesError> {
        GoogleMapsClient::place_details(self, place_id).await
    }

    async fn reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<PlaceDetails, PlacesError> {
        GoogleMapsClient::reverse_geocode(self, latitude, longitude).await
    }
}
