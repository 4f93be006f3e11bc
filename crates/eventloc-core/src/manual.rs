//! Manual-entry fallback: hand-typed address fields into a [`CanonicalLocation`].

use serde::Deserialize;

use crate::location::CanonicalLocation;
use crate::validation::{FieldError, ValidationErrors};

/// Address fields of a manual entry, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ManualAddress {
    pub name: Option<String>,
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
}

/// A manual-entry form submission where coordinates are still raw text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManualLocationInput {
    pub address: ManualAddress,
    pub latitude: String,
    pub longitude: String,
}

impl ManualLocationInput {
    /// Parses the coordinate text and validates the entry.
    ///
    /// # Errors
    ///
    /// Returns every field error found: a missing country and each
    /// unparsable or out-of-range coordinate.
    pub fn into_location(self) -> Result<CanonicalLocation, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let latitude = parse_coordinate("latitude", &self.latitude).unwrap_or_else(|e| {
            errors.push(e);
            None
        });
        let longitude = parse_coordinate("longitude", &self.longitude).unwrap_or_else(|e| {
            errors.push(e);
            None
        });

        match build_manual_location(self.address, latitude, longitude) {
            Ok(location) => errors.finish(location),
            Err(more) => {
                errors.0.extend(more.0);
                Err(errors)
            }
        }
    }
}

/// Parses a coordinate typed into a text field. Blank text means "no value".
///
/// # Errors
///
/// Returns a [`FieldError`] on `field` when the text is not a finite number.
pub fn parse_coordinate(field: &'static str, text: &str) -> Result<Option<f64>, FieldError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(FieldError::new(field, format!("'{text}' is not a number"))),
    }
}

/// Builds a manually entered location.
///
/// Country is required; every other field is optional and blank values are
/// dropped. The formatted address joins street, city, region, postal code and
/// country with `", "`.
///
/// # Errors
///
/// Returns field errors for a missing country or coordinates outside
/// latitude ±90 / longitude ±180.
pub fn build_manual_location(
    address: ManualAddress,
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> Result<CanonicalLocation, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let name = trimmed(address.name);
    let street_address = trimmed(address.street_address);
    let city = trimmed(address.city);
    let region = trimmed(address.region);
    let country = trimmed(address.country);
    let postal_code = trimmed(address.postal_code);

    if country.is_none() {
        errors.push(FieldError::new("country", "Country is required"));
    }
    check_coordinates(
        &mut errors,
        ("latitude", latitude),
        ("longitude", longitude),
    );

    let formatted_address = [&street_address, &city, &region, &postal_code, &country]
        .into_iter()
        .filter_map(|part| part.as_deref())
        .collect::<Vec<_>>()
        .join(", ");

    errors.finish(CanonicalLocation {
        place_id: None,
        name,
        street_address,
        city,
        region,
        country,
        postal_code,
        latitude,
        longitude,
        formatted_address: Some(formatted_address).filter(|f| !f.is_empty()),
        is_manually_entered: true,
    })
}

/// Records a field error for a latitude outside ±90 or a longitude outside
/// ±180. Absent values pass.
pub fn check_coordinates(
    errors: &mut ValidationErrors,
    (lat_field, latitude): (&'static str, Option<f64>),
    (lng_field, longitude): (&'static str, Option<f64>),
) {
    if latitude.is_some_and(|v| !(-90.0..=90.0).contains(&v)) {
        errors.push(FieldError::new(
            lat_field,
            "latitude must be between -90 and 90",
        ));
    }
    if longitude.is_some_and(|v| !(-180.0..=180.0).contains(&v)) {
        errors.push(FieldError::new(
            lng_field,
            "longitude must be between -180 and 180",
        ));
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}
