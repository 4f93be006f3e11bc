//! Read-only listings of stored events and locations.

use chrono::{DateTime, Utc};
use eventloc_db::LocationRow;

/// Prints every stored event with its location, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub(crate) async fn run_events(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let events = eventloc_db::list_events(pool).await?;

    if events.is_empty() {
        println!("no events stored");
        return Ok(());
    }

    println!("{:<12}{:<32}{:<24}LOCATION", "STARTS", "TITLE", "ORGANIZER");
    for item in &events {
        println!(
            "{:<12}{:<32}{:<24}{}",
            fmt_date(item.event.start_date),
            truncate(&item.event.title, 30),
            truncate(&item.event.organizer_name, 22),
            location_label(&item.location)
        );
    }

    Ok(())
}

/// Prints stored locations, most recently updated first, optionally filtered.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub(crate) async fn run_locations(pool: &sqlx::PgPool, query: Option<&str>) -> anyhow::Result<()> {
    let locations = eventloc_db::list_locations(pool, query).await?;

    if locations.is_empty() {
        println!(
            "no locations found{}",
            query.map(|q| format!(" matching '{q}'")).unwrap_or_default()
        );
        return Ok(());
    }

    println!("{:<38}{:<8}{:<12}LOCATION", "ID", "SOURCE", "UPDATED");
    for location in &locations {
        let source = if location.is_manually_entered {
            "manual"
        } else {
            "place"
        };
        println!(
            "{:<38}{:<8}{:<12}{}",
            location.id,
            source,
            fmt_date(location.updated_at),
            location_label(location)
        );
    }

    Ok(())
}

fn fmt_date(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d").to_string()
}

/// Formatted address when known, otherwise name, city and country joined.
fn location_label(location: &LocationRow) -> String {
    if let Some(addr) = location
        .formatted_address
        .as_deref()
        .filter(|a| !a.is_empty())
    {
        return addr.to_owned();
    }
    [
        location.name.as_deref(),
        location.city.as_deref(),
        Some(location.country.as_str()),
    ]
    .into_iter()
    .flatten()
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(", ")
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", text.chars().take(max - 3).collect::<String>())
    } else {
        text.to_owned()
    }
}
