use eventloc_core::{ManualAddress, ManualLocationInput, PlaceCandidate};
use eventloc_places::PlacesError;

use super::*;
use crate::map::{HeadlessMap, SELECTED_ZOOM, WORLD_ZOOM};

fn controller() -> PickerController<HeadlessMap> {
    PickerController::new(HeadlessMap::default(), 3)
}

fn candidate(place_id: &str) -> PlaceCandidate {
    PlaceCandidate {
        place_id: place_id.to_string(),
        description: format!("{place_id} description"),
        main_text: None,
        secondary_text: None,
    }
}

fn resolved(place_id: &str, lat: f64, lng: f64) -> CanonicalLocation {
    CanonicalLocation {
        place_id: Some(place_id.to_string()),
        name: Some(format!("{place_id} name")),
        country: Some("USA".to_string()),
        latitude: Some(lat),
        longitude: Some(lng),
        formatted_address: Some(format!("{place_id}, USA")),
        ..CanonicalLocation::default()
    }
}

fn searching(controller: &mut PickerController<HeadlessMap>, query: &str) -> RequestToken {
    controller.input(query);
    controller.begin_search(query).expect("query long enough")
}

#[test]
fn starts_idle_with_world_view() {
    let c = controller();
    assert_eq!(c.state(), PickerState::Idle);
    assert_eq!(c.selection(), &Selection::NoSelection);
    assert_eq!(c.map().center, (0.0, 0.0));
    assert_eq!(c.map().zoom, WORLD_ZOOM);
    assert!(c.map().marker.is_none());
}

#[test]
fn short_query_does_not_start_a_search() {
    let mut c = controller();
    c.input("ab");
    assert!(c.begin_search("ab").is_none());
    assert_eq!(c.state(), PickerState::Idle);
    assert!(c.suggestions().is_empty());
}

#[test]
fn search_results_become_visible_in_order() {
    let mut c = controller();
    let token = searching(&mut c, "Main");
    assert_eq!(c.state(), PickerState::Searching);

    assert!(c.finish_search(token, vec![candidate("b"), candidate("a")]));
    assert_eq!(c.state(), PickerState::SuggestionsVisible);
    let ids: Vec<&str> = c.suggestions().iter().map(|s| s.place_id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a"]);
}

#[test]
fn empty_results_hide_the_panel() {
    let mut c = controller();
    let token = searching(&mut c, "Nowhere");
    assert!(c.finish_search(token, Vec::new()));
    assert_eq!(c.state(), PickerState::Idle);
}

#[test]
fn slower_older_search_does_not_overwrite_newer_results() {
    let mut c = controller();
    let older = searching(&mut c, "Mai");
    let newer = searching(&mut c, "Main St");

    assert!(c.finish_search(newer, vec![candidate("fresh")]));
    assert!(!c.finish_search(older, vec![candidate("stale")]));

    assert_eq!(c.suggestions().len(), 1);
    assert_eq!(c.suggestions()[0].place_id, "fresh");
}

#[test]
fn shortening_the_query_drops_in_flight_search() {
    let mut c = controller();
    let token = searching(&mut c, "Main");
    c.input("Ma");
    assert!(!c.finish_search(token, vec![candidate("late")]));
    assert!(c.suggestions().is_empty());
    assert_eq!(c.state(), PickerState::Idle);
}

#[test]
fn selection_clears_query_and_suggestions_and_centers_map() {
    let mut c = controller();
    let search = searching(&mut c, "Main");
    c.finish_search(search, vec![candidate("p1")]);

    let token = c.begin_resolve();
    assert_eq!(c.state(), PickerState::Resolving);
    assert_eq!(c.query(), "");
    assert!(c.suggestions().is_empty());

    assert_eq!(
        c.finish_resolve(token, Ok(resolved("p1", 39.8, -89.6))),
        Ok(true)
    );
    assert_eq!(c.state(), PickerState::Selected);
    assert_eq!(
        c.selection().location().and_then(|l| l.place_id.as_deref()),
        Some("p1")
    );

    let map = c.map();
    assert_eq!(map.center, (39.8, -89.6));
    assert_eq!(map.zoom, SELECTED_ZOOM);
    let marker = map.marker.as_ref().expect("marker placed");
    assert_eq!(marker.title.as_deref(), Some("p1 name"));
}

#[test]
fn resolution_takes_precedence_over_earlier_search() {
    let mut c = controller();
    let search = searching(&mut c, "Main");
    let resolve = c.begin_resolve();

    c.finish_resolve(resolve, Ok(resolved("chosen", 1.0, 2.0)))
        .expect("resolved");
    assert!(!c.finish_search(search, vec![candidate("stale")]));

    assert!(c.suggestions().is_empty());
    assert_eq!(c.state(), PickerState::Selected);
}

#[test]
fn out_of_order_resolutions_keep_the_latest_request() {
    let mut c = controller();
    let a = c.begin_resolve();
    let b = c.begin_resolve();

    assert_eq!(c.finish_resolve(b, Ok(resolved("B", 2.0, 2.0))), Ok(true));
    assert_eq!(c.finish_resolve(a, Ok(resolved("A", 1.0, 1.0))), Ok(false));

    assert_eq!(
        c.selection().location().and_then(|l| l.place_id.as_deref()),
        Some("B")
    );
    assert_eq!(c.map().center, (2.0, 2.0));
}

#[test]
fn not_found_and_transport_failures_are_distinct() {
    let mut c = controller();

    let token = c.begin_resolve();
    let err = c
        .finish_resolve(token, Err(ResolveError::NotFound))
        .unwrap_err();
    assert_eq!(err, PickerError::NotFound);
    assert_eq!(c.state(), PickerState::Idle);

    let token = c.begin_resolve();
    let err = c
        .finish_resolve(
            token,
            Err(ResolveError::Transport(PlacesError::ApiStatus(
                "OVER_QUERY_LIMIT".to_string(),
            ))),
        )
        .unwrap_err();
    assert_eq!(err, PickerError::Transport);
    assert_ne!(
        PickerError::NotFound.to_string(),
        PickerError::Transport.to_string()
    );
    assert_eq!(c.error(), Some(&PickerError::Transport));
    assert!(c.open_manual_entry(), "manual entry stays available");
}

#[test]
fn failed_resolution_keeps_previous_selection() {
    let mut c = controller();
    let token = c.begin_resolve();
    c.finish_resolve(token, Ok(resolved("keep", 1.0, 1.0)))
        .expect("resolved");

    let token = c.begin_resolve();
    let _ = c.finish_resolve(token, Err(ResolveError::NotFound));

    assert_eq!(c.state(), PickerState::Selected);
    assert_eq!(
        c.selection().location().and_then(|l| l.place_id.as_deref()),
        Some("keep")
    );
}

#[test]
fn clear_reports_cleared_and_resets_map() {
    let mut c = controller();
    let token = c.begin_resolve();
    c.finish_resolve(token, Ok(resolved("p1", 39.8, -89.6)))
        .expect("resolved");

    let selection = c.clear().clone();
    assert_eq!(selection, Selection::Cleared);
    assert_eq!(selection.to_location(), Some(CanonicalLocation::empty()));
    assert_eq!(c.state(), PickerState::Idle);
    assert_eq!(c.map(), &HeadlessMap::default());
}

#[test]
fn never_selected_reports_no_location() {
    let c = controller();
    assert_eq!(c.selection().to_location(), None);
}

#[test]
fn clear_then_reselect_keeps_resolved_provenance() {
    let mut c = controller();
    let original = resolved("ChIJ-round-trip", 39.8, -89.6);

    let token = c.begin_resolve();
    c.finish_resolve(token, Ok(original.clone()))
        .expect("resolved");
    c.clear();

    let token = c.begin_resolve();
    c.finish_resolve(token, Ok(original.clone()))
        .expect("resolved again");

    let selected = c.selection().location().expect("selected");
    assert_eq!(selected.place_id, original.place_id);
    assert!(!selected.is_manually_entered);
}

#[test]
fn blur_hides_suggestions_only_after_grace() {
    let mut c = controller();
    let token = searching(&mut c, "Main");
    c.finish_search(token, vec![candidate("p1")]);

    let blur = c.blur();
    assert_eq!(c.state(), PickerState::SuggestionsVisible);
    assert_eq!(c.suggestions().len(), 1);

    assert!(c.blur_elapsed(blur));
    assert!(c.suggestions().is_empty());
    assert_eq!(c.state(), PickerState::Idle);
}

#[test]
fn refocus_cancels_pending_blur() {
    let mut c = controller();
    let token = searching(&mut c, "Main");
    c.finish_search(token, vec![candidate("p1")]);

    let blur = c.blur();
    c.focus();
    assert!(!c.blur_elapsed(blur));
    assert_eq!(c.suggestions().len(), 1);
}

#[test]
fn selection_during_blur_grace_wins() {
    let mut c = controller();
    let token = searching(&mut c, "Main");
    c.finish_search(token, vec![candidate("p1")]);

    let blur = c.blur();
    let resolve = c.begin_resolve();
    assert!(!c.blur_elapsed(blur));
    c.finish_resolve(resolve, Ok(resolved("p1", 1.0, 1.0)))
        .expect("resolved");
    assert_eq!(c.state(), PickerState::Selected);
}

#[test]
fn results_arriving_after_blur_stay_hidden() {
    let mut c = controller();
    let token = searching(&mut c, "Main");
    let _ = c.blur();
    assert!(c.finish_search(token, vec![candidate("p1")]));
    assert!(c.suggestions().is_empty());
    assert_eq!(c.state(), PickerState::Idle);
}

fn manual(country: &str, lat: &str, lng: &str) -> ManualLocationInput {
    ManualLocationInput {
        address: ManualAddress {
            name: Some("Community Hall".to_string()),
            city: Some("Springfield".to_string()),
            country: Some(country.to_string()),
            ..ManualAddress::default()
        },
        latitude: lat.to_string(),
        longitude: lng.to_string(),
    }
}

#[test]
fn manual_entry_cancel_returns_to_prior_state() {
    let mut c = controller();
    let token = searching(&mut c, "Main");
    c.finish_search(token, vec![candidate("p1")]);

    assert!(c.open_manual_entry());
    assert!(c.is_manual_entry_open());
    c.cancel_manual_entry();
    assert!(!c.is_manual_entry_open());
    assert_eq!(c.state(), PickerState::SuggestionsVisible);
}

#[test]
fn manual_entry_is_unavailable_while_resolving() {
    let mut c = controller();
    let _ = c.begin_resolve();
    assert!(!c.open_manual_entry());
}

#[test]
fn invalid_manual_entry_keeps_overlay_open() {
    let mut c = controller();
    c.open_manual_entry();

    let err = c.submit_manual(manual("", "", "")).unwrap_err();
    let PickerError::Validation(errors) = err else {
        panic!("expected validation error, got {err:?}");
    };
    assert!(errors.field("country").is_some());
    assert!(c.is_manual_entry_open());
    assert_eq!(c.selection(), &Selection::NoSelection);
}

#[test]
fn manual_entry_selects_and_closes_overlay() {
    let mut c = controller();
    c.open_manual_entry();

    let location = c
        .submit_manual(manual("USA", "39.8", "-89.6"))
        .expect("valid manual entry");
    assert!(location.is_manually_entered);
    assert!(location.place_id.is_none());
    assert_eq!(
        location.formatted_address.as_deref(),
        Some("Springfield, USA")
    );

    assert!(!c.is_manual_entry_open());
    assert_eq!(c.state(), PickerState::Selected);
    assert_eq!(c.map().zoom, SELECTED_ZOOM);
    assert_eq!(
        c.map().marker.as_ref().and_then(|m| m.title.as_deref()),
        Some("Community Hall")
    );
}

#[test]
fn manual_entry_without_coordinates_leaves_map_alone() {
    let mut c = controller();
    c.open_manual_entry();
    c.submit_manual(manual("USA", "", "")).expect("valid");
    assert_eq!(c.map(), &HeadlessMap::default());
}

#[test]
fn manual_entry_supersedes_in_flight_resolution() {
    let mut c = controller();
    let token = c.begin_resolve();
    c.cancel_manual_entry();
    // Overlay cannot open mid-resolve; submitting directly still wins.
    c.submit_manual(manual("USA", "", "")).expect("valid");
    assert_eq!(
        c.finish_resolve(token, Ok(resolved("late", 1.0, 1.0))),
        Ok(false)
    );
    assert!(c
        .selection()
        .location()
        .is_some_and(|l| l.is_manually_entered));
}
