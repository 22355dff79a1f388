//! Renderer backed by a host mapping SDK.

use crate::catalog::Category;
use crate::geo::{Coordinate, GeoPosition};
use crate::proximity::ProximityEntry;

use super::layout::{clamp_percent, ViewportMarker, CENTER_PERCENT, MAX_PERCENT, MIN_PERCENT};
use super::{MapEventSender, MapRenderer, RendererKind};

/// Marker handed to the SDK, in real coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct SdkMarker {
    pub id: String,
    pub title: String,
    pub category: Category,
    pub coordinate: Coordinate,
    /// Distance annotation for the info window, e.g. `"2.2 km away"`.
    pub subtitle: Option<String>,
}

/// Host mapping engine.
///
/// Implementations report clicks and info-window actions by sending
/// [`MapEvent`](super::MapEvent)s on the renderer's channel.
pub trait MapSdk: Send {
    /// False when the SDK failed to load (missing key, offline).
    fn is_available(&self) -> bool;

    /// Replace all markers on the map.
    fn set_markers(&mut self, markers: &[SdkMarker]);

    fn center_on(&mut self, coordinate: Coordinate);
}

/// Forwards markers to a [`MapSdk`] and recentres on the user.
///
/// Viewport positions are a north-up projection of the markers' bounding box
/// onto `[10, 90]` percent, so list consumers see the same geometry the SDK
/// draws.
pub struct NativeMapRenderer {
    sdk: Box<dyn MapSdk>,
    events: MapEventSender,
    markers: Vec<ViewportMarker>,
}

impl std::fmt::Debug for NativeMapRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeMapRenderer")
            .field("markers", &self.markers.len())
            .finish_non_exhaustive()
    }
}

impl NativeMapRenderer {
    pub fn new(sdk: Box<dyn MapSdk>, events: MapEventSender) -> Self {
        Self {
            sdk,
            events,
            markers: Vec::new(),
        }
    }
}

impl MapRenderer for NativeMapRenderer {
    fn kind(&self) -> RendererKind {
        RendererKind::Native
    }

    fn render(
        &mut self,
        entries: &[ProximityEntry],
        origin: Option<&GeoPosition>,
    ) -> &[ViewportMarker] {
        let placed: Vec<(&ProximityEntry, Coordinate)> = entries
            .iter()
            .filter_map(|entry| {
                let coordinate = entry.point.coordinate();
                match coordinate.validate() {
                    Ok(()) => Some((entry, coordinate)),
                    Err(e) => {
                        tracing::warn!(id = %entry.point.id, error = %e, "Marker not placed");
                        None
                    }
                }
            })
            .collect();

        let sdk_markers: Vec<SdkMarker> = placed
            .iter()
            .map(|(entry, coordinate)| SdkMarker {
                id: entry.point.id.clone(),
                title: entry.point.name.clone(),
                category: entry.point.category,
                coordinate: *coordinate,
                subtitle: entry.distance_label(),
            })
            .collect();

        self.sdk.set_markers(&sdk_markers);
        if let Some(origin) = origin {
            self.sdk.center_on(origin.coordinate());
        }

        let bounds = Bounds::around(
            placed
                .iter()
                .map(|(_, c)| *c)
                .chain(origin.map(GeoPosition::coordinate)),
        );
        self.markers = placed
            .into_iter()
            .map(|(entry, coordinate)| {
                let (x_percent, y_percent) = bounds.project(coordinate);
                ViewportMarker {
                    entry: entry.clone(),
                    x_percent,
                    y_percent,
                }
            })
            .collect();

        tracing::trace!(markers = self.markers.len(), "Native markers updated");
        &self.markers
    }

    fn markers(&self) -> &[ViewportMarker] {
        &self.markers
    }

    fn events(&self) -> &MapEventSender {
        &self.events
    }
}

/// Bounding box in degrees.
struct Bounds {
    min_lat: f64,
    max_lat: f64,
    min_lon: f64,
    max_lon: f64,
}

impl Bounds {
    fn around(coordinates: impl Iterator<Item = Coordinate>) -> Self {
        coordinates.fold(
            Bounds {
                min_lat: f64::INFINITY,
                max_lat: f64::NEG_INFINITY,
                min_lon: f64::INFINITY,
                max_lon: f64::NEG_INFINITY,
            },
            |b, c| Bounds {
                min_lat: b.min_lat.min(c.latitude),
                max_lat: b.max_lat.max(c.latitude),
                min_lon: b.min_lon.min(c.longitude),
                max_lon: b.max_lon.max(c.longitude),
            },
        )
    }

    fn project(&self, coordinate: Coordinate) -> (f64, f64) {
        let span = MAX_PERCENT - MIN_PERCENT;
        let lon_span = self.max_lon - self.min_lon;
        let lat_span = self.max_lat - self.min_lat;

        let x = if lon_span > 0.0 {
            MIN_PERCENT + span * (coordinate.longitude - self.min_lon) / lon_span
        } else {
            CENTER_PERCENT
        };
        // North up: larger latitude is nearer the top
        let y = if lat_span > 0.0 {
            MIN_PERCENT + span * (self.max_lat - coordinate.latitude) / lat_span
        } else {
            CENTER_PERCENT
        };
        (clamp_percent(x), clamp_percent(y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PointOfInterest;
    use crate::map::event_channel;
    use std::sync::Arc;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Recorded {
        markers: Vec<SdkMarker>,
        center: Option<Coordinate>,
    }

    struct RecordingSdk(Arc<Mutex<Recorded>>);

    impl MapSdk for RecordingSdk {
        fn is_available(&self) -> bool {
            true
        }
        fn set_markers(&mut self, markers: &[SdkMarker]) {
            self.0.lock().markers = markers.to_vec();
        }
        fn center_on(&mut self, coordinate: Coordinate) {
            self.0.lock().center = Some(coordinate);
        }
    }

    fn entry(id: &str, lat: f64, lon: f64) -> ProximityEntry {
        ProximityEntry {
            point: PointOfInterest::new(id, format!("{id} name"), "addr", Category::Hospital, lat, lon),
            distance_km: Some(2.2),
        }
    }

    #[test]
    fn test_forwards_markers_and_centres() {
        let recorded = Arc::new(Mutex::new(Recorded::default()));
        let (tx, _rx) = event_channel();
        let mut renderer = NativeMapRenderer::new(Box::new(RecordingSdk(recorded.clone())), tx);
        let origin = GeoPosition::now(6.9271, 79.8612, 10.0).unwrap();

        let markers = renderer.render(&[entry("a", 6.93, 79.84), entry("b", 6.90, 79.88)], Some(&origin));
        assert_eq!(markers.len(), 2);

        let recorded = recorded.lock();
        assert_eq!(recorded.markers.len(), 2);
        assert_eq!(recorded.markers[0].id, "a");
        assert_eq!(recorded.markers[0].subtitle.as_deref(), Some("2.2 km away"));
        assert_eq!(recorded.center, Some(origin.coordinate()));
    }

    #[test]
    fn test_projection_is_north_up_and_bounded() {
        let (tx, _rx) = event_channel();
        let recorded = Arc::new(Mutex::new(Recorded::default()));
        let mut renderer = NativeMapRenderer::new(Box::new(RecordingSdk(recorded)), tx);

        let markers = renderer.render(&[entry("north_west", 7.0, 79.0), entry("south_east", 6.0, 80.0)], None);

        assert_eq!((markers[0].x_percent, markers[0].y_percent), (MIN_PERCENT, MIN_PERCENT));
        assert_eq!((markers[1].x_percent, markers[1].y_percent), (MAX_PERCENT, MAX_PERCENT));
    }

    #[test]
    fn test_single_marker_is_centred() {
        let (tx, _rx) = event_channel();
        let recorded = Arc::new(Mutex::new(Recorded::default()));
        let mut renderer = NativeMapRenderer::new(Box::new(RecordingSdk(recorded)), tx);

        let markers = renderer.render(&[entry("only", 6.9, 79.8)], None);

        assert_eq!((markers[0].x_percent, markers[0].y_percent), (CENTER_PERCENT, CENTER_PERCENT));
    }

    #[test]
    fn test_invalid_point_not_placed() {
        let (tx, _rx) = event_channel();
        let recorded = Arc::new(Mutex::new(Recorded::default()));
        let mut renderer = NativeMapRenderer::new(Box::new(RecordingSdk(recorded.clone())), tx);

        let markers = renderer.render(&[entry("bad", 95.0, 79.8), entry("ok", 6.9, 79.8)], None);

        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].id(), "ok");
        assert_eq!(recorded.lock().markers.len(), 1);
    }
}
