//! Database operations for the `events` table.
//!
//! Events are always read back together with their location.

use chrono::{DateTime, Utc};
use eventloc_core::NewEvent;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::locations::{create_location, LocationRow};
use crate::DbError;

/// A row from the `events` table.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct EventRow {
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An event with its location embedded.
#[derive(Debug, Clone, PartialEq)]
pub struct EventWithLocation {
    pub event: EventRow,
    pub location: LocationRow,
}

/// Flat projection of `events JOIN locations`; location columns carry a `loc_` prefix.
#[derive(Debug, sqlx::FromRow)]
struct EventJoinRow {
    id: Uuid,
    title: String,
    description: String,
    start_date: DateTime<Utc>,
    end_date: Option<DateTime<Utc>>,
    organizer_name: String,
    organizer_email: String,
    max_attendees: Option<i32>,
    image_url: Option<String>,
    price: Option<Decimal>,
    tags: Vec<String>,
    location_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    loc_place_id: Option<String>,
    loc_name: Option<String>,
    loc_street_address: Option<String>,
    loc_city: Option<String>,
    loc_region: Option<String>,
    loc_country: String,
    loc_postal_code: Option<String>,
    loc_latitude: Option<f64>,
    loc_longitude: Option<f64>,
    loc_formatted_address: Option<String>,
    loc_is_manually_entered: bool,
    loc_created_at: DateTime<Utc>,
    loc_updated_at: DateTime<Utc>,
}

impl From<EventJoinRow> for EventWithLocation {
    fn from(row: EventJoinRow) -> Self {
        Self {
            location: LocationRow {
                id: row.location_id,
                place_id: row.loc_place_id,
                name: row.loc_name,
                street_address: row.loc_street_address,
                city: row.loc_city,
                region: row.loc_region,
                country: row.loc_country,
                postal_code: row.loc_postal_code,
                latitude: row.loc_latitude,
                longitude: row.loc_longitude,
                formatted_address: row.loc_formatted_address,
                is_manually_entered: row.loc_is_manually_entered,
                created_at: row.loc_created_at,
                updated_at: row.loc_updated_at,
            },
            event: EventRow {
                id: row.id,
                title: row.title,
                description: row.description,
                start_date: row.start_date,
                end_date: row.end_date,
                organizer_name: row.organizer_name,
                organizer_email: row.organizer_email,
                max_attendees: row.max_attendees,
                image_url: row.image_url,
                price: row.price,
                tags: row.tags,
                location_id: row.location_id,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
        }
    }
}

const JOIN_SELECT: &str = "SELECT e.id, e.title, e.description, e.start_date, e.end_date, \
            e.organizer_name, e.organizer_email, e.max_attendees, e.image_url, e.price, \
            e.tags, e.location_id, e.created_at, e.updated_at, \
            l.place_id AS loc_place_id, l.name AS loc_name, \
            l.street_address AS loc_street_address, l.city AS loc_city, \
            l.region AS loc_region, l.country AS loc_country, \
            l.postal_code AS loc_postal_code, l.latitude AS loc_latitude, \
            l.longitude AS loc_longitude, l.formatted_address AS loc_formatted_address, \
            l.is_manually_entered AS loc_is_manually_entered, \
            l.created_at AS loc_created_at, l.updated_at AS loc_updated_at \
     FROM events e \
     JOIN locations l ON l.id = e.location_id";

/// Creates the event's location and the event itself in one transaction.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if either insert fails; nothing is persisted then.
pub async fn create_event(pool: &PgPool, event: &NewEvent) -> Result<EventWithLocation, DbError> {
    let mut tx = pool.begin().await?;

    let location = create_location(&mut *tx, &event.location).await?;

    let row = sqlx::query_as::<_, EventRow>(
        "INSERT INTO events \
           (title, description, start_date, end_date, organizer_name, organizer_email, \
            max_attendees, image_url, price, tags, location_id) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
         RETURNING id, title, description, start_date, end_date, organizer_name, \
                   organizer_email, max_attendees, image_url, price, tags, location_id, \
                   created_at, updated_at",
    )
    .bind(&event.title)
    .bind(&event.description)
    .bind(event.start_date)
    .bind(event.end_date)
    .bind(&event.organizer_name)
    .bind(&event.organizer_email)
    .bind(event.max_attendees)
    .bind(event.image_url.as_deref())
    .bind(event.price)
    .bind(&event.tags)
    .bind(location.id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    tracing::info!(event_id = %row.id, location_id = %location.id, "event created");

    Ok(EventWithLocation {
        event: row,
        location,
    })
}

/// Lists all events with their locations, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_events(pool: &PgPool) -> Result<Vec<EventWithLocation>, DbError> {
    let rows =
        sqlx::query_as::<_, EventJoinRow>(&format!("{JOIN_SELECT} ORDER BY e.created_at DESC"))
            .fetch_all(pool)
            .await?;
    Ok(rows.into_iter().map(EventWithLocation::from).collect())
}

/// Returns a single event with its location, or `None` if not found.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_event(pool: &PgPool, id: Uuid) -> Result<Option<EventWithLocation>, DbError> {
    let row = sqlx::query_as::<_, EventJoinRow>(&format!("{JOIN_SELECT} WHERE e.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(EventWithLocation::from))
}
