use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use eventloc_core::EventInput;
use eventloc_db::EventWithLocation;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::middleware::RequestId;

use super::locations::LocationItem;
use super::{map_db_error, parse_id, ApiError, ApiResponse, AppState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct EventItem {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub organizer_name: String,
    pub organizer_email: String,
    pub max_attendees: Option<i32>,
    pub image_url: Option<String>,
    pub price: Option<Decimal>,
    pub tags: Vec<String>,
    pub location_id: Uuid,
    pub location: LocationItem,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EventWithLocation> for EventItem {
    fn from(EventWithLocation { event, location }: EventWithLocation) -> Self {
        Self {
            id: event.id,
            title: event.title,
            description: event.description,
            start_date: event.start_date,
            end_date: event.end_date,
            organizer_name: event.organizer_name,
            organizer_email: event.organizer_email,
            max_attendees: event.max_attendees,
            image_url: event.image_url,
            price: event.price,
            tags: event.tags,
            location_id: event.location_id,
            location: LocationItem::from(location),
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}

/// POST /api/v1/events: validate, then store the location and the event together.
pub(super) async fn create_event(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<EventInput>,
) -> Result<(StatusCode, Json<ApiResponse<EventItem>>), ApiError> {
    let rid = &req_id.0;

    let event = body
        .validate()
        .map_err(|errors| ApiError::validation(rid, errors))?;

    let created = eventloc_db::create_event(&state.pool, &event)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(req_id.0, EventItem::from(created))),
    ))
}

/// GET /api/v1/events: newest first.
pub(super) async fn list_events(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<EventItem>>>, ApiError> {
    let rows = eventloc_db::list_events(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let data = rows.into_iter().map(EventItem::from).collect();
    Ok(Json(ApiResponse::new(req_id.0, data)))
}

/// GET /api/v1/events/{id}
pub(super) async fn get_event(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<EventItem>>, ApiError> {
    let rid = &req_id.0;
    let id = parse_id(rid, &id)?;

    let event = eventloc_db::get_event(&state.pool, id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?
        .ok_or_else(|| ApiError::new(rid, "not_found", "Event not found"))?;

    Ok(Json(ApiResponse::new(req_id.0, EventItem::from(event))))
}
