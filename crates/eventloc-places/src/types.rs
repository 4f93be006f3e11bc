//! Google Maps web-service response types.
//!
//! Every response carries a top-level `status` string; the payload fields are
//! present only when it is `"OK"`.

use eventloc_core::{AddressComponent, PlaceCandidate, PlaceDetails};
use serde::Deserialize;

pub(crate) const STATUS_OK: &str = "OK";

/// Statuses meaning "the query was fine but matched nothing".
pub(crate) fn is_no_result(status: &str) -> bool {
    matches!(status, "ZERO_RESULTS" | "NOT_FOUND")
}

// ---------------------------------------------------------------------------
// place/autocomplete
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct AutocompleteResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Prediction {
    pub place_id: String,
    pub description: String,
    #[serde(default)]
    pub structured_formatting: Option<StructuredFormatting>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StructuredFormatting {
    #[serde(default)]
    pub main_text: Option<String>,
    #[serde(default)]
    pub secondary_text: Option<String>,
}

impl From<Prediction> for PlaceCandidate {
    fn from(p: Prediction) -> Self {
        let (main_text, secondary_text) = p
            .structured_formatting
            .map(|f| (f.main_text, f.secondary_text))
            .unwrap_or_default();
        Self {
            place_id: p.place_id,
            description: p.description,
            main_text,
            secondary_text,
        }
    }
}

// ---------------------------------------------------------------------------
// place/details and geocode
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct DetailsResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub result: Option<PlaceResult>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeocodeResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub results: Vec<PlaceResult>,
}

/// Shared shape of a details result and a geocode result.
#[derive(Debug, Deserialize)]
pub(crate) struct PlaceResult {
    pub place_id: String,
    #[serde(default)]
    pub formatted_address: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address_components: Vec<AddressComponent>,
    pub geometry: Geometry,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl From<PlaceResult> for PlaceDetails {
    fn from(r: PlaceResult) -> Self {
        Self {
            place_id: r.place_id,
            formatted_address: r.formatted_address,
            name: r.name.filter(|n| !n.is_empty()),
            address_components: r.address_components,
            latitude: r.geometry.location.lat,
            longitude: r.geometry.location.lng,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prediction_without_structured_formatting_converts() {
        let p: Prediction = serde_json::from_value(serde_json::json!({
            "place_id": "abc",
            "description": "1 Main St, Springfield, IL, USA"
        }))
        .expect("parse prediction");
        let c = PlaceCandidate::from(p);
        assert_eq!(c.place_id, "abc");
        assert!(c.main_text.is_none());
        assert!(c.secondary_text.is_none());
    }

    #[test]
    fn no_result_statuses() {
        assert!(is_no_result("ZERO_RESULTS"));
        assert!(is_no_result("NOT_FOUND"));
        assert!(!is_no_result("REQUEST_DENIED"));
        assert!(!is_no_result(STATUS_OK));
    }
}
