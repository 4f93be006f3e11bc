use thiserror::Error;

/// Errors returned by the Google Maps client.
#[derive(Debug, Error)]
pub enum PlacesError {
    /// Network or TLS failure, or a non-2xx response.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The provider answered with a status other than `OK` or a no-result status.
    #[error("Google Maps API error: {0}")]
    ApiStatus(String),

    /// The provider found nothing for the place id or coordinates.
    #[error("no result found")]
    NotFound,

    /// No API key is configured, so no request can be made.
    #[error("GOOGLE_MAPS_API_KEY is not configured")]
    MissingApiKey,
}

impl PlacesError {
    /// `true` for "nothing there" outcomes, `false` for transport or provider failures.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}
