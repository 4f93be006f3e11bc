use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["eventloc-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_search_command() {
    let cli = Cli::try_parse_from(["eventloc-cli", "search", "742 Evergreen"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Search { ref query }) if query == "742 Evergreen"
    ));
}

#[test]
fn parses_resolve_command() {
    let cli = Cli::try_parse_from(["eventloc-cli", "resolve", "ChIJ-place"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Resolve { ref place_id }) if place_id == "ChIJ-place"
    ));
}

#[test]
fn reverse_accepts_negative_coordinates() {
    let cli = Cli::try_parse_from(["eventloc-cli", "reverse", "-33.86", "-151.2"])
        .expect("expected valid cli args");

    match cli.command {
        Some(Commands::Reverse {
            latitude,
            longitude,
        }) => {
            assert!((latitude + 33.86).abs() < f64::EPSILON);
            assert!((longitude + 151.2).abs() < f64::EPSILON);
        }
        other => panic!("expected reverse command, got {other:?}"),
    }
}

#[test]
fn reverse_rejects_non_numeric_coordinates() {
    assert!(Cli::try_parse_from(["eventloc-cli", "reverse", "north", "0"]).is_err());
}

#[test]
fn manual_args_map_to_manual_input() {
    let cli = Cli::try_parse_from([
        "eventloc-cli",
        "manual",
        "--country",
        "USA",
        "--street",
        "1 Main St",
        "--postal-code",
        "62701",
        "--lat",
        "-12.5",
    ])
    .expect("expected valid cli args");

    let Some(Commands::Manual(args)) = cli.command else {
        panic!("expected manual command");
    };
    let input = eventloc_core::ManualLocationInput::from(args);
    assert_eq!(input.address.country.as_deref(), Some("USA"));
    assert_eq!(input.address.street_address.as_deref(), Some("1 Main St"));
    assert_eq!(input.address.postal_code.as_deref(), Some("62701"));
    assert_eq!(input.latitude, "-12.5");
    assert_eq!(input.longitude, "");
}

#[test]
fn manual_without_country_still_parses() {
    // Country is checked by manual-entry validation, which reports it per field.
    let cli = Cli::try_parse_from(["eventloc-cli", "manual", "--city", "Springfield"])
        .expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::Manual(_))));
}

#[test]
fn parses_events_command() {
    let cli = Cli::try_parse_from(["eventloc-cli", "events"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::Events)));
}

#[test]
fn parses_locations_with_query() {
    let cli = Cli::try_parse_from(["eventloc-cli", "locations", "--query", "spring"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Locations { query: Some(ref q) }) if q == "spring"
    ));
}
