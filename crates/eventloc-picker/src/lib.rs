//! Location picker workflow: debounced address search, place resolution,
//! reverse geocoding of map clicks, and manual entry, all converging on one
//! [`CanonicalLocation`](eventloc_core::CanonicalLocation).
//!
//! [`PickerController`] is the synchronous state machine; [`Picker`] drives it
//! on a single tokio task against a [`Geocoder`](eventloc_places::Geocoder).

pub mod controller;
pub mod debounce;
pub mod fetcher;
pub mod map;
pub mod picker;
pub mod resolver;
pub mod reverse;
pub mod token;

pub use controller::{PickerController, PickerError, PickerState, Selection};
pub use debounce::{Debouncer, DEFAULT_DEBOUNCE};
pub use fetcher::{SuggestionFetcher, DEFAULT_MIN_QUERY_LEN};
pub use map::{HeadlessMap, MapView, Marker, SELECTED_ZOOM, WORLD_ZOOM};
pub use picker::{Picker, PickerConfig, PickerEvent, BLUR_GRACE};
pub use resolver::{PlaceResolver, ResolveError};
pub use reverse::ReverseGeocoder;
pub use token::{RequestGeneration, RequestToken};
