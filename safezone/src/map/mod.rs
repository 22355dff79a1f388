//! Map rendering seam.
//!
//! Two [`MapRenderer`] implementations share one contract: given the ordered
//! proximity view they produce [`ViewportMarker`]s, and user interaction
//! (marker clicks, info-window actions) is reported as [`MapEvent`]s on a
//! channel owned by the caller.
//!
//! - [`SyntheticMapRenderer`] - ring layout from [`SyntheticMapLayout`], no
//!   external dependency, with an ASCII preview for terminals
//! - [`NativeMapRenderer`] - forwards real coordinates to an injected [`MapSdk`]
//!
//! [`create_renderer`] picks one from configuration and falls back to the
//! synthetic renderer when no SDK is available.

mod layout;
mod native;
mod synthetic;

pub use layout::{SyntheticMapLayout, ViewportMarker, CENTER_PERCENT, MAX_PERCENT, MIN_PERCENT};
pub use native::{MapSdk, NativeMapRenderer, SdkMarker};
pub use synthetic::SyntheticMapRenderer;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tokio::sync::mpsc;

use crate::geo::GeoPosition;
use crate::proximity::ProximityEntry;

/// Interaction reported by a renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapEvent {
    /// A marker was clicked.
    MarkerClicked { id: String },
    /// "Directions" was chosen in a marker's info window.
    DirectionsRequested { id: String },
    /// "Call" was chosen in a marker's info window.
    CallRequested { id: String },
    /// The info window or detail card was closed.
    Dismissed,
}

pub type MapEventSender = mpsc::UnboundedSender<MapEvent>;
pub type MapEventReceiver = mpsc::UnboundedReceiver<MapEvent>;

/// Create the channel renderers report interaction on.
pub fn event_channel() -> (MapEventSender, MapEventReceiver) {
    mpsc::unbounded_channel()
}

/// Which renderer to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RendererKind {
    #[default]
    Synthetic,
    Native,
}

impl RendererKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RendererKind::Synthetic => "synthetic",
            RendererKind::Native => "native",
        }
    }
}

impl fmt::Display for RendererKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown map renderer '{0}' (expected synthetic or native)")]
pub struct ParseRendererKindError(pub String);

impl FromStr for RendererKind {
    type Err = ParseRendererKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "synthetic" => Ok(RendererKind::Synthetic),
            "native" => Ok(RendererKind::Native),
            other => Err(ParseRendererKindError(other.to_string())),
        }
    }
}

/// A map view over the proximity list.
pub trait MapRenderer: Send {
    fn kind(&self) -> RendererKind;

    /// Render `entries` (already filtered and sorted) around `origin`.
    fn render(&mut self, entries: &[ProximityEntry], origin: Option<&GeoPosition>)
        -> &[ViewportMarker];

    /// Markers from the last render.
    fn markers(&self) -> &[ViewportMarker];

    fn events(&self) -> &MapEventSender;

    /// Text rendering of the last render, for terminals. `None` if unsupported.
    fn text_preview(&self, _width: usize, _height: usize) -> Option<String> {
        None
    }

    /// Report an interaction. Returns false if nobody is listening.
    fn emit(&self, event: MapEvent) -> bool {
        self.events().send(event).is_ok()
    }

    /// Report a click on the marker with `id`. Unknown ids are ignored.
    fn click(&self, id: &str) -> bool {
        if !self.markers().iter().any(|m| m.id() == id) {
            tracing::debug!(id, "Click on unknown marker ignored");
            return false;
        }
        self.emit(MapEvent::MarkerClicked { id: id.to_string() })
    }
}

/// Build a renderer of `kind`.
///
/// Asking for [`RendererKind::Native`] without an available SDK falls back to
/// the synthetic renderer.
pub fn create_renderer(
    kind: RendererKind,
    sdk: Option<Box<dyn MapSdk>>,
    events: MapEventSender,
) -> Box<dyn MapRenderer> {
    match (kind, sdk) {
        (RendererKind::Native, Some(sdk)) if sdk.is_available() => {
            tracing::debug!("Using native map renderer");
            Box::new(NativeMapRenderer::new(sdk, events))
        }
        (RendererKind::Native, _) => {
            tracing::info!("Map SDK unavailable, falling back to synthetic map");
            Box::new(SyntheticMapRenderer::new(events))
        }
        (RendererKind::Synthetic, _) => Box::new(SyntheticMapRenderer::new(events)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Coordinate;

    struct NullSdk {
        available: bool,
    }

    impl MapSdk for NullSdk {
        fn is_available(&self) -> bool {
            self.available
        }
        fn set_markers(&mut self, _markers: &[SdkMarker]) {}
        fn center_on(&mut self, _coordinate: Coordinate) {}
    }

    #[test]
    fn test_renderer_kind_parse() {
        assert_eq!("synthetic".parse::<RendererKind>().unwrap(), RendererKind::Synthetic);
        assert_eq!(" Native ".parse::<RendererKind>().unwrap(), RendererKind::Native);
        assert!("leaflet".parse::<RendererKind>().is_err());
        assert_eq!(RendererKind::Native.to_string(), "native");
    }

    #[test]
    fn test_create_synthetic() {
        let (tx, _rx) = event_channel();
        let renderer = create_renderer(RendererKind::Synthetic, None, tx);
        assert_eq!(renderer.kind(), RendererKind::Synthetic);
    }

    #[test]
    fn test_create_native_with_sdk() {
        let (tx, _rx) = event_channel();
        let sdk = Box::new(NullSdk { available: true });
        let renderer = create_renderer(RendererKind::Native, Some(sdk), tx);
        assert_eq!(renderer.kind(), RendererKind::Native);
        assert!(renderer.text_preview(20, 10).is_none());
    }

    #[test]
    fn test_native_without_sdk_falls_back() {
        let (tx, _rx) = event_channel();
        let renderer = create_renderer(RendererKind::Native, None, tx);
        assert_eq!(renderer.kind(), RendererKind::Synthetic);
        assert!(renderer.text_preview(20, 10).is_some());
    }

    #[test]
    fn test_native_with_unavailable_sdk_falls_back() {
        let (tx, _rx) = event_channel();
        let sdk = Box::new(NullSdk { available: false });
        let renderer = create_renderer(RendererKind::Native, Some(sdk), tx);
        assert_eq!(renderer.kind(), RendererKind::Synthetic);
    }
}
