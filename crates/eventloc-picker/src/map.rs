//! The map surface the picker draws on.

use eventloc_core::CanonicalLocation;

/// Zoom level used when showing a selected location.
pub const SELECTED_ZOOM: u8 = 16;
/// Zoom level of the initial and cleared world view.
pub const WORLD_ZOOM: u8 = 2;

/// Map rendering capability: a view center, a zoom level and at most one marker.
pub trait MapView {
    fn set_view(&mut self, latitude: f64, longitude: f64, zoom: u8);
    fn place_marker(&mut self, latitude: f64, longitude: f64, title: Option<&str>);
    fn clear_marker(&mut self);
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub latitude: f64,
    pub longitude: f64,
    pub title: Option<String>,
}

/// In-memory map that records what would be drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessMap {
    pub center: (f64, f64),
    pub zoom: u8,
    pub marker: Option<Marker>,
}

impl Default for HeadlessMap {
    fn default() -> Self {
        Self {
            center: (0.0, 0.0),
            zoom: WORLD_ZOOM,
            marker: None,
        }
    }
}

impl MapView for HeadlessMap {
    fn set_view(&mut self, latitude: f64, longitude: f64, zoom: u8) {
        self.center = (latitude, longitude);
        self.zoom = zoom;
    }

    fn place_marker(&mut self, latitude: f64, longitude: f64, title: Option<&str>) {
        self.marker = Some(Marker {
            latitude,
            longitude,
            title: title.map(ToOwned::to_owned),
        });
    }

    fn clear_marker(&mut self) {
        self.marker = None;
    }
}

/// Centers on `location` with a single marker. Locations without coordinates
/// leave the map as it is.
pub(crate) fn show_location<M: MapView + ?Sized>(map: &mut M, location: &CanonicalLocation) {
    if let Some((latitude, longitude)) = location.coordinates() {
        map.set_view(latitude, longitude, SELECTED_ZOOM);
        map.clear_marker();
        map.place_marker(latitude, longitude, location.marker_title());
    }
}

pub(crate) fn reset_view<M: MapView + ?Sized>(map: &mut M) {
    map.clear_marker();
    map.set_view(0.0, 0.0, WORLD_ZOOM);
}
