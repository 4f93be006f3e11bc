use super::*;

fn test_client(base_url: &str) -> GoogleMapsClient {
    GoogleMapsClient::with_base_url(Some("test-key".to_string()), 10, base_url)
        .expect("client construction should not fail")
}

#[test]
fn endpoints_append_to_base_path() {
    let client = test_client("https://maps.example.com/maps/api");
    assert_eq!(
        client.details_url.as_str(),
        "https://maps.example.com/maps/api/place/details/json"
    );
    assert_eq!(
        client.geocode_url.as_str(),
        "https://maps.example.com/maps/api/geocode/json"
    );
}

#[test]
fn build_url_puts_key_first_and_encodes_values() {
    let client = test_client("https://maps.example.com/maps/api/");
    let url = client
        .build_url(&client.autocomplete_url, &[("input", "1 Main & Co")])
        .expect("key configured");
    assert!(
        url.as_str()
            .starts_with("https://maps.example.com/maps/api/place/autocomplete/json?key=test-key&input="),
        "unexpected url: {url}"
    );
    assert!(
        url.as_str().contains("1+Main+%26+Co"),
        "query param should be percent-encoded: {url}"
    );
}

#[test]
fn blank_api_key_counts_as_missing() {
    let client = GoogleMapsClient::with_base_url(Some("  ".to_string()), 10, DEFAULT_BASE_URL)
        .expect("client");
    assert!(!client.has_api_key());
    let err = client.build_url(&client.geocode_url, &[]).unwrap_err();
    assert!(matches!(err, PlacesError::MissingApiKey));
}

#[test]
fn invalid_base_url_is_rejected() {
    let err = GoogleMapsClient::with_base_url(None, 10, "not a url").unwrap_err();
    assert!(matches!(err, PlacesError::ApiStatus(_)));
}

#[test]
fn check_status_maps_provider_statuses() {
    assert!(check_status("OK", None).is_ok());
    assert!(matches!(
        check_status("ZERO_RESULTS", None),
        Err(PlacesError::NotFound)
    ));
    assert!(matches!(
        check_status("NOT_FOUND", None),
        Err(PlacesError::NotFound)
    ));
    let err = check_status("REQUEST_DENIED", Some("The provided API key is invalid.")).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Google Maps API error: REQUEST_DENIED: The provided API key is invalid."
    );
}

#[test]
fn debug_redacts_api_key() {
    let client = test_client(DEFAULT_BASE_URL);
    let rendered = format!("{client:?}");
    assert!(!rendered.contains("test-key"));
    assert!(rendered.contains("[redacted]"));
}
