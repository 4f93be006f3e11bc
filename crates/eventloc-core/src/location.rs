//! Location records shared by the picker, the places client, and persistence.

use serde::{Deserialize, Serialize};

use crate::validation::FieldError;

/// The single normalized location shape produced by autocomplete resolution,
/// reverse geocoding, and manual entry alike.
///
/// `is_manually_entered` records which path produced the values: resolved
/// records carry a `place_id` and `formatted_address` from the provider,
/// manual records never carry a `place_id`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalLocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub street_address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub is_manually_entered: bool,
}

impl CanonicalLocation {
    /// The value a picker reports after its selection is cleared.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            country: Some(String::new()),
            ..Self::default()
        }
    }

    /// Both coordinates, when present.
    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }

    /// Title for a map marker: the name, falling back to the formatted address.
    #[must_use]
    pub fn marker_title(&self) -> Option<&str> {
        non_empty(self.name.as_deref()).or_else(|| non_empty(self.formatted_address.as_deref()))
    }

    /// Returns the trimmed country, or a field error when it is missing or blank.
    ///
    /// # Errors
    ///
    /// Returns a [`FieldError`] on `country` when it is absent or empty.
    pub fn require_country(&self) -> Result<&str, FieldError> {
        non_empty(self.country.as_deref())
            .map(str::trim)
            .ok_or_else(|| FieldError::new("country", "Country is required"))
    }
}

/// An autocomplete candidate. Lives only for the duration of a search session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceCandidate {
    pub place_id: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_text: Option<String>,
}

/// One entry of a provider's heterogeneous address-component list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressComponent {
    pub long_name: String,
    #[serde(default)]
    pub short_name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

impl AddressComponent {
    #[must_use]
    pub fn has_type(&self, kind: &str) -> bool {
        self.types.iter().any(|t| t == kind)
    }
}

/// Full place record returned by a details lookup or a reverse geocode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceDetails {
    pub place_id: String,
    pub formatted_address: String,
    pub name: Option<String>,
    pub address_components: Vec<AddressComponent>,
    pub latitude: f64,
    pub longitude: f64,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
