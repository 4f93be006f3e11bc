//! Client for the Google Maps Places and Geocoding web services.

pub mod client;
pub mod error;
pub mod geocoder;
pub(crate) mod types;

pub use client::{GoogleMapsClient, DEFAULT_BASE_URL, MIN_AUTOCOMPLETE_LEN};
pub use error::PlacesError;
pub use geocoder::Geocoder;
