//! Picker-driven commands: search, resolve, reverse geocode and manual entry.
//!
//! Each command runs one headless [`Picker`] session against the configured
//! Google Maps client and prints the outcome.

use std::sync::Arc;

use eventloc_core::{AppConfig, CanonicalLocation, ManualLocationInput, PlaceCandidate};
use eventloc_picker::{HeadlessMap, Picker, PickerConfig, PickerError};
use eventloc_places::GoogleMapsClient;

type CliPicker = Picker<GoogleMapsClient, HeadlessMap>;

fn build_picker(config: &AppConfig) -> anyhow::Result<CliPicker> {
    let client = GoogleMapsClient::with_base_url(
        config.google_maps_api_key.clone(),
        config.maps_timeout_secs,
        &config.maps_base_url,
    )
    .map_err(|e| anyhow::anyhow!("failed to build Google Maps client: {e}"))?;

    Ok(Picker::with_config(
        Arc::new(client),
        HeadlessMap::default(),
        PickerConfig::from_app_config(config),
    ))
}

fn require_api_key(config: &AppConfig) -> anyhow::Result<()> {
    if config.google_maps_api_key.is_none() {
        anyhow::bail!("GOOGLE_MAPS_API_KEY is not set; address lookups are unavailable");
    }
    Ok(())
}

/// Types `query` into a picker, waits for the debounce to settle, and prints
/// the ranked suggestions.
///
/// # Errors
///
/// Returns an error if no API key is configured or the query is shorter than
/// the picker's minimum length.
pub(crate) async fn run_search(config: &AppConfig, query: &str) -> anyhow::Result<()> {
    require_api_key(config)?;
    let mut picker = build_picker(config)?;

    if !picker.accepts_query(query) {
        anyhow::bail!(
            "query must be at least {} characters",
            picker.controller().min_query_len()
        );
    }

    picker.focus();
    picker.type_query(query);
    let candidates = picker.next_debounced().await.unwrap_or_default();
    picker.shutdown();

    print!("{}", format_candidates(&candidates));
    Ok(())
}

/// Resolves a place id and prints the canonical location as JSON.
///
/// # Errors
///
/// Returns an error if no API key is configured, the place is unknown, or the
/// provider request fails.
pub(crate) async fn run_resolve(config: &AppConfig, place_id: &str) -> anyhow::Result<()> {
    require_api_key(config)?;
    let mut picker = build_picker(config)?;

    let location = picker
        .select_candidate(place_id)
        .await
        .map_err(|e| anyhow::anyhow!("could not resolve '{place_id}': {e}"))?;
    print_location(&location)
}

/// Reverse geocodes a point. A point with no address is reported, not failed.
///
/// # Errors
///
/// Returns an error if no API key is configured or the provider request fails.
pub(crate) async fn run_reverse(
    config: &AppConfig,
    latitude: f64,
    longitude: f64,
) -> anyhow::Result<()> {
    require_api_key(config)?;
    let mut picker = build_picker(config)?;

    match picker.click_map(latitude, longitude).await {
        Ok(location) => print_location(&location),
        Err(PickerError::NotFound) => {
            println!("no address found at {latitude},{longitude}");
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!("reverse geocoding failed: {e}")),
    }
}

/// Validates a hand-typed location through the picker's manual-entry path.
/// Field errors are printed one per line to stderr.
///
/// # Errors
///
/// Returns an error if any field is invalid.
pub(crate) fn run_manual(config: &AppConfig, input: ManualLocationInput) -> anyhow::Result<()> {
    let mut picker = build_picker(config)?;
    picker.open_manual_entry();

    match picker.submit_manual(input) {
        Ok(location) => print_location(&location),
        Err(PickerError::Validation(errors)) => {
            for error in &errors.0 {
                eprintln!("{}: {}", error.field, error.message);
            }
            anyhow::bail!("manual location rejected ({} field errors)", errors.0.len())
        }
        Err(e) => Err(anyhow::anyhow!("manual entry failed: {e}")),
    }
}

fn print_location(location: &CanonicalLocation) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(location)?);
    Ok(())
}

fn format_candidates(candidates: &[PlaceCandidate]) -> String {
    if candidates.is_empty() {
        return "no suggestions\n".to_string();
    }
    candidates
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{:>2}. {}  [{}]\n", i + 1, c.description, c.place_id))
        .collect()
}
