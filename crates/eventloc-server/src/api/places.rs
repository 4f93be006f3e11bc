//! Geocoding proxy: address search, place lookup and reverse geocoding.

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use eventloc_core::{
    canonical_from_details, parse_coordinate, CanonicalLocation, FieldError, PlaceCandidate,
    ValidationErrors,
};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_places_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct DetailsQuery {
    pub place_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct GeocodeQuery {
    pub lat: Option<String>,
    pub lng: Option<String>,
}

pub(super) async fn search_places(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<PlaceCandidate>>>, ApiError> {
    let Some(query) = params.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) else {
        return Ok(Json(ApiResponse::new(req_id.0, Vec::new())));
    };

    let candidates = state
        .geocoder
        .autocomplete(query)
        .await
        .map_err(|e| map_places_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse::new(req_id.0, candidates)))
}

pub(super) async fn place_details(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<DetailsQuery>,
) -> Result<Json<ApiResponse<CanonicalLocation>>, ApiError> {
    let Some(place_id) = params
        .place_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
    else {
        return Err(ApiError::new(req_id.0, "bad_request", "place_id is required"));
    };

    let details = state
        .geocoder
        .place_details(place_id)
        .await
        .map_err(|e| map_places_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse::new(
        req_id.0,
        canonical_from_details(details),
    )))
}

/// Reverse geocodes a point. The response keeps the requested coordinates
/// rather than those of the matched address.
pub(super) async fn reverse_geocode(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<GeocodeQuery>,
) -> Result<Json<ApiResponse<CanonicalLocation>>, ApiError> {
    let (latitude, longitude) =
        parse_point(&params).map_err(|e| ApiError::validation(req_id.0.clone(), e))?;

    let details = state
        .geocoder
        .reverse_geocode(latitude, longitude)
        .await
        .map_err(|e| map_places_error(req_id.0.clone(), &e))?;

    let mut location = canonical_from_details(details);
    location.latitude = Some(latitude);
    location.longitude = Some(longitude);

    Ok(Json(ApiResponse::new(req_id.0, location)))
}

fn parse_point(params: &GeocodeQuery) -> Result<(f64, f64), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let latitude = coordinate(&mut errors, "lat", params.lat.as_deref(), 90.0);
    let longitude = coordinate(&mut errors, "lng", params.lng.as_deref(), 180.0);

    match (latitude, longitude) {
        (Some(lat), Some(lng)) if errors.is_empty() => Ok((lat, lng)),
        _ => Err(errors),
    }
}

fn coordinate(
    errors: &mut ValidationErrors,
    field: &'static str,
    raw: Option<&str>,
    bound: f64,
) -> Option<f64> {
    match parse_coordinate(field, raw.unwrap_or_default()) {
        Ok(Some(value)) if (-bound..=bound).contains(&value) => Some(value),
        Ok(Some(_)) => {
            errors.push(FieldError::new(
                field,
                format!("{field} must be between -{bound} and {bound}"),
            ));
            None
        }
        Ok(None) => {
            errors.push(FieldError::new(field, format!("{field} is required")));
            None
        }
        Err(e) => {
            errors.push(e);
            None
        }
    }
}
