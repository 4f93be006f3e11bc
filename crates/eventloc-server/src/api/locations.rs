//! Stored location handlers: list, create (from a place or by hand), read,
//! update and delete.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use eventloc_core::{
    build_manual_location, canonical_from_details, CanonicalLocation, ManualAddress,
};
use eventloc_db::LocationRow;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{map_db_error, map_places_error, parse_id, ApiError, ApiResponse, AppState};

const UNKNOWN_COUNTRY: &str = "Unknown";

// ---------------------------------------------------------------------------
// Request / response bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(super) struct ListQuery {
    pub q: Option<String>,
}

/// Body for create and update. A non-empty `placeId` on create switches to
/// the provider lookup path and the address fields are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(super) struct LocationRequest {
    pub place_id: Option<String>,
    #[serde(flatten)]
    pub address: ManualAddress,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub formatted_address: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct LocationItem {
    pub id: Uuid,
    pub place_id: Option<String>,
    pub name: Option<String>,
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: String,
    pub postal_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub formatted_address: Option<String>,
    pub is_manually_entered: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<LocationRow> for LocationItem {
    fn from(row: LocationRow) -> Self {
        Self {
            id: row.id,
            place_id: row.place_id,
            name: row.name,
            street_address: row.street_address,
            city: row.city,
            region: row.region,
            country: row.country,
            postal_code: row.postal_code,
            latitude: row.latitude,
            longitude: row.longitude,
            formatted_address: row.formatted_address,
            is_manually_entered: row.is_manually_entered,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct DeletedResponse {
    pub deleted: bool,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fills the gaps a provider record can leave: the name falls back to the
/// first segment of the formatted address and a blank country to `"Unknown"`.
fn with_place_defaults(mut location: CanonicalLocation) -> CanonicalLocation {
    if location.name.as_deref().is_none_or(|n| n.trim().is_empty()) {
        location.name = location
            .formatted_address
            .as_deref()
            .and_then(|addr| addr.split(',').next())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToOwned::to_owned);
    }
    if location.country.as_deref().is_none_or(|c| c.trim().is_empty()) {
        location.country = Some(UNKNOWN_COUNTRY.to_owned());
    }
    location
}

fn manual_location(rid: &str, body: LocationRequest) -> Result<CanonicalLocation, ApiError> {
    build_manual_location(body.address, body.latitude, body.longitude)
        .map_err(|errors| ApiError::validation(rid, errors))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/locations: most recently updated first, optionally filtered.
pub(super) async fn list_locations(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<LocationItem>>>, ApiError> {
    let rows = eventloc_db::list_locations(&state.pool, params.q.as_deref())
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let data = rows.into_iter().map(LocationItem::from).collect();
    Ok(Json(ApiResponse::new(req_id.0, data)))
}

/// POST /api/v1/locations: store a provider place or a manual entry.
pub(super) async fn create_location(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<LocationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<LocationItem>>), ApiError> {
    let rid = &req_id.0;

    let place_id = body
        .place_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(ToOwned::to_owned);

    let location = if let Some(place_id) = place_id {
        let details = state
            .geocoder
            .place_details(&place_id)
            .await
            .map_err(|e| map_places_error(rid.clone(), &e))?;
        with_place_defaults(canonical_from_details(details))
    } else {
        manual_location(rid, body)?
    };

    let row = eventloc_db::create_location(&state.pool, &location)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(req_id.0, LocationItem::from(row))),
    ))
}

/// GET /api/v1/locations/{id}
pub(super) async fn get_location(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<LocationItem>>, ApiError> {
    let rid = &req_id.0;
    let id = parse_id(rid, &id)?;

    let row = eventloc_db::get_location(&state.pool, id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?
        .ok_or_else(|| ApiError::new(rid, "not_found", "Location not found"))?;

    Ok(Json(ApiResponse::new(req_id.0, LocationItem::from(row))))
}

/// PUT /api/v1/locations/{id}: replace the address fields.
pub(super) async fn update_location(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
    Json(body): Json<LocationRequest>,
) -> Result<Json<ApiResponse<LocationItem>>, ApiError> {
    let rid = &req_id.0;
    let id = parse_id(rid, &id)?;

    let formatted_address = body
        .formatted_address
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned);
    let mut location = manual_location(rid, body)?;
    // Absent keeps the stored value.
    location.formatted_address = formatted_address;

    let row = eventloc_db::update_location(&state.pool, id, &location)
        .await
        .map_err(|e| match e {
            eventloc_db::DbError::NotFound => {
                ApiError::new(rid, "not_found", "Location not found")
            }
            other => map_db_error(rid.clone(), &other),
        })?;

    Ok(Json(ApiResponse::new(req_id.0, LocationItem::from(row))))
}

/// DELETE /api/v1/locations/{id}: refused while any event uses it.
pub(super) async fn delete_location(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DeletedResponse>>, ApiError> {
    let rid = &req_id.0;
    let id = parse_id(rid, &id)?;

    eventloc_db::delete_location(&state.pool, id)
        .await
        .map_err(|e| match e {
            eventloc_db::DbError::NotFound => {
                ApiError::new(rid, "not_found", "Location not found")
            }
            eventloc_db::DbError::LocationInUse(..) => ApiError::new(
                rid,
                "conflict",
                "Cannot delete location that is in use by events",
            ),
            other => map_db_error(rid.clone(), &other),
        })?;

    Ok(Json(ApiResponse::new(req_id.0, DeletedResponse { deleted: true })))
}
