//! HTTP client for the Google Maps Places and Geocoding web services.
//!
//! Wraps `reqwest` with Maps-specific status handling and typed response
//! deserialization. Every endpoint checks the `"status"` field of the JSON
//! body: no-result statuses become [`PlacesError::NotFound`] (or an empty
//! candidate list for autocomplete), anything else that is not `"OK"` becomes
//! [`PlacesError::ApiStatus`].

use std::time::Duration;

use eventloc_core::{PlaceCandidate, PlaceDetails};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::error::PlacesError;
use crate::types::{
    is_no_result, AutocompleteResponse, DetailsResponse, GeocodeResponse, STATUS_OK,
};

pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/";

/// Queries shorter than this never reach the provider.
pub const MIN_AUTOCOMPLETE_LEN: usize = 2;

const DETAILS_FIELDS: &str = "place_id,formatted_address,name,address_components,geometry";

/// Client for the Google Maps web services.
///
/// Use [`GoogleMapsClient::new`] for production or
/// [`GoogleMapsClient::with_base_url`] to point at a mock server in tests.
/// A client without an API key can be built; each call then fails with
/// [`PlacesError::MissingApiKey`].
pub struct GoogleMapsClient {
    client: Client,
    api_key: Option<String>,
    autocomplete_url: Url,
    details_url: Url,
    geocode_url: Url,
}

impl std::fmt::Debug for GoogleMapsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleMapsClient")
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("autocomplete_url", &self.autocomplete_url.as_str())
            .finish_non_exhaustive()
    }
}

impl GoogleMapsClient {
    /// Creates a client pointed at the production Google Maps API.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: Option<String>, timeout_secs: u64) -> Result<Self, PlacesError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`PlacesError::ApiStatus`] if `base_url`
    /// is not a valid URL.
    pub fn with_base_url(
        api_key: Option<String>,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("eventloc/0.1 (location-picker)")
            .build()?;

        // Exactly one trailing slash, so relative endpoint paths append to it.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let endpoint = |path: &str| {
            Url::parse(&normalised)
                .and_then(|base| base.join(path))
                .map_err(|e| PlacesError::ApiStatus(format!("invalid base URL '{base_url}': {e}")))
        };

        Ok(Self {
            client,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            autocomplete_url: endpoint("place/autocomplete/json")?,
            details_url: endpoint("place/details/json")?,
            geocode_url: endpoint("geocode/json")?,
        })
    }

    /// `true` once an API key is configured.
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Address predictions for `query`, in provider order.
    ///
    /// Queries shorter than [`MIN_AUTOCOMPLETE_LEN`] characters (after
    /// trimming) return an empty list without a request. `ZERO_RESULTS` is
    /// also an empty list.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::MissingApiKey`] if no key is configured.
    /// - [`PlacesError::ApiStatus`] if the provider rejects the request.
    /// - [`PlacesError::Http`] on network failure or non-2xx HTTP status.
    /// - [`PlacesError::Deserialize`] if the body does not match the expected shape.
    pub async fn autocomplete(&self, query: &str) -> Result<Vec<PlaceCandidate>, PlacesError> {
        let query = query.trim();
        if query.chars().count() < MIN_AUTOCOMPLETE_LEN {
            return Ok(Vec::new());
        }

        let url = self.build_url(
            &self.autocomplete_url,
            &[("input", query), ("types", "address"), ("language", "en")],
        )?;
        let body: AutocompleteResponse = self.request_json(url, "place/autocomplete").await?;

        if is_no_result(&body.status) {
            return Ok(Vec::new());
        }
        check_status(&body.status, body.error_message.as_deref())?;

        tracing::debug!(
            query,
            count = body.predictions.len(),
            "autocomplete returned predictions"
        );
        Ok(body
            .predictions
            .into_iter()
            .map(PlaceCandidate::from)
            .collect())
    }

    /// Full details for a place id chosen from autocomplete.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::NotFound`] if the provider knows no such place.
    /// - [`PlacesError::MissingApiKey`] if no key is configured.
    /// - [`PlacesError::ApiStatus`] if the provider rejects the request.
    /// - [`PlacesError::Http`] on network failure or non-2xx HTTP status.
    /// - [`PlacesError::Deserialize`] if the body does not match the expected shape.
    pub async fn place_details(&self, place_id: &str) -> Result<PlaceDetails, PlacesError> {
        let url = self.build_url(
            &self.details_url,
            &[("place_id", place_id), ("fields", DETAILS_FIELDS)],
        )?;
        let body: DetailsResponse = self.request_json(url, "place/details").await?;
        check_status(&body.status, body.error_message.as_deref())?;

        body.result
            .map(PlaceDetails::from)
            .ok_or(PlacesError::NotFound)
    }

    /// The best address match for a coordinate pair (the provider's first result).
    ///
    /// The returned coordinates are the matched address's own, not the input.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::NotFound`] if nothing is found at the coordinates.
    /// - [`PlacesError::MissingApiKey`] if no key is configured.
    /// - [`PlacesError::ApiStatus`] if the provider rejects the request.
    /// - [`PlacesError::Http`] on network failure or non-2xx HTTP status.
    /// - [`PlacesError::Deserialize`] if the body does not match the expected shape.
    pub async fn reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<PlaceDetails, PlacesError> {
        let latlng = format!("{latitude},{longitude}");
        let url = self.build_url(&self.geocode_url, &[("latlng", &latlng)])?;
        let body: GeocodeResponse = self.request_json(url, "geocode").await?;
        check_status(&body.status, body.error_message.as_deref())?;

        body.results
            .into_iter()
            .next()
            .map(PlaceDetails::from)
            .ok_or(PlacesError::NotFound)
    }

    /// Builds a request URL with percent-encoded query parameters, `key` first.
    fn build_url(&self, endpoint: &Url, extra: &[(&str, &str)]) -> Result<Url, PlacesError> {
        let key = self.api_key.as_deref().ok_or(PlacesError::MissingApiKey)?;
        let mut url = endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("key", key);
            for (k, v) in extra {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    /// Sends a GET request, asserts a 2xx HTTP status, and parses the body.
    ///
    /// `context` names the endpoint in errors; the URL itself carries the key
    /// and is never logged.
    async fn request_json<T: DeserializeOwned>(
        &self,
        url: Url,
        context: &str,
    ) -> Result<T, PlacesError> {
        // reqwest errors embed the request URL, which carries the key.
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(reqwest::Error::without_url)?;
        let body = response.text().await.map_err(reqwest::Error::without_url)?;
        serde_json::from_str(&body).map_err(|e| PlacesError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}

/// Maps a non-`OK` provider status to an error.
fn check_status(status: &str, error_message: Option<&str>) -> Result<(), PlacesError> {
    if status == STATUS_OK {
        return Ok(());
    }
    if is_no_result(status) {
        return Err(PlacesError::NotFound);
    }
    tracing::warn!(status, error_message, "google maps request rejected");
    Err(PlacesError::ApiStatus(match error_message {
        Some(msg) => format!("{status}: {msg}"),
        None => status.to_owned(),
    }))
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
