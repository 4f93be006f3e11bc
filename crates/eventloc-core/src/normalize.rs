//! Mapping from provider address-component lists to [`CanonicalLocation`].
//!
//! Shared by the place-details and reverse-geocode paths. Each field lookup is
//! independent; a missing component type yields an empty string, never an error.

use crate::location::{AddressComponent, CanonicalLocation, PlaceDetails};

/// City component types, in priority order.
const CITY_TYPES: [&str; 3] = ["locality", "sublocality", "postal_town"];

/// Address fields extracted from a component list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedAddress {
    pub street_address: String,
    pub city: String,
    pub region: String,
    pub country: String,
    pub postal_code: String,
}

/// Extracts street, city, region, country and postal code from `components`.
///
/// - street address: `street_number` and `route` joined by a single space,
///   empty parts dropped
/// - city: first of `locality`, `sublocality`, `postal_town`
/// - region: `administrative_area_level_1`
/// - country: `country`
/// - postal code: `postal_code`
///
/// All values are the components' `long_name`.
#[must_use]
pub fn parse_address_components(components: &[AddressComponent]) -> ParsedAddress {
    let street_address = [
        long_name_of(components, "street_number"),
        long_name_of(components, "route"),
    ]
    .into_iter()
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(" ");

    let city = CITY_TYPES
        .iter()
        .map(|kind| long_name_of(components, kind))
        .find(|name| !name.is_empty())
        .unwrap_or_default();

    ParsedAddress {
        street_address,
        city: city.to_owned(),
        region: long_name_of(components, "administrative_area_level_1").to_owned(),
        country: long_name_of(components, "country").to_owned(),
        postal_code: long_name_of(components, "postal_code").to_owned(),
    }
}

/// Maps a resolved place into the canonical shape.
///
/// Name and formatted address are taken verbatim; coordinates come from the
/// place geometry. Country is always present, possibly empty, so a missing
/// country surfaces later as a validation failure rather than a lookup error.
#[must_use]
pub fn canonical_from_details(details: PlaceDetails) -> CanonicalLocation {
    let parsed = parse_address_components(&details.address_components);

    CanonicalLocation {
        place_id: Some(details.place_id),
        name: details.name,
        street_address: some_if_present(parsed.street_address),
        city: some_if_present(parsed.city),
        region: some_if_present(parsed.region),
        country: Some(parsed.country),
        postal_code: some_if_present(parsed.postal_code),
        latitude: Some(details.latitude),
        longitude: Some(details.longitude),
        formatted_address: Some(details.formatted_address),
        is_manually_entered: false,
    }
}

fn long_name_of<'a>(components: &'a [AddressComponent], kind: &str) -> &'a str {
    components
        .iter()
        .find(|c| c.has_type(kind))
        .map_or("", |c| c.long_name.as_str())
}

fn some_if_present(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
