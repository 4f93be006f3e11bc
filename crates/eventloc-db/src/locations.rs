//! Database operations for the `locations` table.

use chrono::{DateTime, Utc};
use eventloc_core::CanonicalLocation;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::DbError;

const LOCATION_COLUMNS: &str = "id, place_id, name, street_address, city, region, country, \
     postal_code, latitude, longitude, formatted_address, is_manually_entered, \
     created_at, updated_at";

/// A row from the `locations` table.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct LocationRow {
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

impl From<LocationRow> for CanonicalLocation {
    fn from(row: LocationRow) -> Self {
        Self {
            place_id: row.place_id,
            name: row.name,
            street_address: row.street_address,
            city: row.city,
            region: row.region,
            country: Some(row.country),
            postal_code: row.postal_code,
            latitude: row.latitude,
            longitude: row.longitude,
            formatted_address: row.formatted_address,
            is_manually_entered: row.is_manually_entered,
        }
    }
}

/// Inserts a location and returns the stored row with its generated id.
///
/// `country` must already be validated; an absent country is stored as `""`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn create_location<'e, E>(
    executor: E,
    location: &CanonicalLocation,
) -> Result<LocationRow, DbError>
where
    E: PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, LocationRow>(&format!(
        "INSERT INTO locations \
           (place_id, name, street_address, city, region, country, postal_code, \
            latitude, longitude, formatted_address, is_manually_entered) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
         RETURNING {LOCATION_COLUMNS}"
    ))
    .bind(location.place_id.as_deref())
    .bind(location.name.as_deref())
    .bind(location.street_address.as_deref())
    .bind(location.city.as_deref())
    .bind(location.region.as_deref())
    .bind(location.country.as_deref().unwrap_or_default())
    .bind(location.postal_code.as_deref())
    .bind(location.latitude)
    .bind(location.longitude)
    .bind(location.formatted_address.as_deref())
    .bind(location.is_manually_entered)
    .fetch_one(executor)
    .await?;

    tracing::debug!(location_id = %row.id, manual = row.is_manually_entered, "location created");
    Ok(row)
}

/// Returns a single location by id, or `None` if not found.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_location(pool: &PgPool, id: Uuid) -> Result<Option<LocationRow>, DbError> {
    let row = sqlx::query_as::<_, LocationRow>(&format!(
        "SELECT {LOCATION_COLUMNS} FROM locations WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Lists locations, most recently updated first.
///
/// When `query` is non-empty, keeps only locations whose name, city, or country
/// contains it (case-insensitive).
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_locations(
    pool: &PgPool,
    query: Option<&str>,
) -> Result<Vec<LocationRow>, DbError> {
    let query = query.map(str::trim).filter(|q| !q.is_empty());

    let rows = if let Some(q) = query {
        sqlx::query_as::<_, LocationRow>(&format!(
            "SELECT {LOCATION_COLUMNS} FROM locations \
             WHERE name ILIKE $1 OR city ILIKE $1 OR country ILIKE $1 \
             ORDER BY updated_at DESC"
        ))
        .bind(format!("%{}%", escape_like(q)))
        .fetch_all(pool)
        .await?
    } else {
        sqlx::query_as::<_, LocationRow>(&format!(
            "SELECT {LOCATION_COLUMNS} FROM locations ORDER BY updated_at DESC"
        ))
        .fetch_all(pool)
        .await?
    };

    Ok(rows)
}

/// Replaces the address fields of an existing location.
///
/// The provenance columns (`place_id`, `is_manually_entered`) are left as stored.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row has `id`, or [`DbError::Sqlx`] if
/// the update fails.
pub async fn update_location(
    pool: &PgPool,
    id: Uuid,
    location: &CanonicalLocation,
) -> Result<LocationRow, DbError> {
    sqlx::query_as::<_, LocationRow>(&format!(
        "UPDATE locations \
         SET name              = $2, \
             street_address    = $3, \
             city              = $4, \
             region            = $5, \
             country           = $6, \
             postal_code       = $7, \
             latitude          = $8, \
             longitude         = $9, \
             formatted_address = COALESCE($10, formatted_address), \
             updated_at        = NOW() \
         WHERE id = $1 \
         RETURNING {LOCATION_COLUMNS}"
    ))
    .bind(id)
    .bind(location.name.as_deref())
    .bind(location.street_address.as_deref())
    .bind(location.city.as_deref())
    .bind(location.region.as_deref())
    .bind(location.country.as_deref().unwrap_or_default())
    .bind(location.postal_code.as_deref())
    .bind(location.latitude)
    .bind(location.longitude)
    .bind(location.formatted_address.as_deref())
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)
}

/// Deletes a location that no event references.
///
/// The location row is locked for the duration of the check so an event
/// cannot attach to it between the reference count and the delete.
///
/// # Errors
///
/// - [`DbError::NotFound`] if no row has `id`.
/// - [`DbError::LocationInUse`] if any event references it; nothing is deleted.
/// - [`DbError::Sqlx`] on query failure.
pub async fn delete_location(pool: &PgPool, id: Uuid) -> Result<(), DbError> {
    let mut tx = pool.begin().await?;

    let locked: Option<Uuid> =
        sqlx::query_scalar("SELECT id FROM locations WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
    if locked.is_none() {
        return Err(DbError::NotFound);
    }

    let in_use: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM events WHERE location_id = $1")
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
    if in_use > 0 {
        return Err(DbError::LocationInUse(id, in_use));
    }

    sqlx::query("DELETE FROM locations WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.code().as_deref() == Some("23503") => {
                DbError::LocationInUse(id, 1)
            }
            other => DbError::Sqlx(other),
        })?;

    tx.commit().await?;
    tracing::info!(location_id = %id, "location deleted");
    Ok(())
}

fn escape_like(raw: &str) -> String {
    raw.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_like_escapes_wildcards() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("Springfield"), "Springfield");
    }

    #[test]
    fn row_converts_to_canonical_location() {
        let row = LocationRow {
            id: Uuid::new_v4(),
            place_id: Some("ChIJ".to_string()),
            name: None,
            street_address: None,
            city: Some("Springfield".to_string()),
            region: None,
            country: "USA".to_string(),
            postal_code: None,
            latitude: Some(1.0),
            longitude: Some(2.0),
            formatted_address: Some("Springfield, USA".to_string()),
            is_manually_entered: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let loc = CanonicalLocation::from(row);
        assert_eq!(loc.country.as_deref(), Some("USA"));
        assert_eq!(loc.place_id.as_deref(), Some("ChIJ"));
        assert_eq!(loc.coordinates(), Some((1.0, 2.0)));
    }
}
