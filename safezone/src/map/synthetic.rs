//! Renderer backed by the synthetic ring layout.

use crate::geo::GeoPosition;
use crate::proximity::ProximityEntry;

use super::layout::{SyntheticMapLayout, ViewportMarker, CENTER_PERCENT};
use super::{MapEventSender, MapRenderer, RendererKind};

/// Glyph drawn at the viewport centre for the user's position.
const ORIGIN_GLYPH: char = '+';

/// Lays markers out with [`SyntheticMapLayout`].
///
/// Positions are recomputed only when the sequence of ids changes; otherwise
/// the cached positions are kept and only the entries are refreshed.
#[derive(Debug)]
pub struct SyntheticMapRenderer {
    events: MapEventSender,
    ids: Vec<String>,
    markers: Vec<ViewportMarker>,
    layouts: usize,
}

impl SyntheticMapRenderer {
    pub fn new(events: MapEventSender) -> Self {
        Self {
            events,
            ids: Vec::new(),
            markers: Vec::new(),
            layouts: 0,
        }
    }

    /// Number of times positions were actually computed.
    pub fn layouts_computed(&self) -> usize {
        self.layouts
    }

    /// Draw the last render as text, `width` x `height` characters.
    ///
    /// The user's position is `+` at the centre; each marker is drawn with its
    /// category glyph. Later markers overwrite earlier ones on collision.
    pub fn ascii_preview(&self, width: usize, height: usize) -> String {
        if width == 0 || height == 0 {
            return String::new();
        }

        let mut grid = vec![vec!['.'; width]; height];
        let (cx, cy) = cell(CENTER_PERCENT, CENTER_PERCENT, width, height);
        grid[cy][cx] = ORIGIN_GLYPH;

        for marker in &self.markers {
            let (x, y) = cell(marker.x_percent, marker.y_percent, width, height);
            grid[y][x] = marker.entry.point.category.glyph();
        }

        grid.into_iter()
            .map(|row| row.into_iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn cell(x_percent: f64, y_percent: f64, width: usize, height: usize) -> (usize, usize) {
    let x = (x_percent / 100.0 * (width - 1) as f64).round() as usize;
    let y = (y_percent / 100.0 * (height - 1) as f64).round() as usize;
    (x.min(width - 1), y.min(height - 1))
}

impl MapRenderer for SyntheticMapRenderer {
    fn kind(&self) -> RendererKind {
        RendererKind::Synthetic
    }

    fn render(
        &mut self,
        entries: &[ProximityEntry],
        _origin: Option<&GeoPosition>,
    ) -> &[ViewportMarker] {
        let unchanged = self.ids.len() == entries.len()
            && self.ids.iter().zip(entries).all(|(id, e)| id == e.id());

        if unchanged {
            for (marker, entry) in self.markers.iter_mut().zip(entries) {
                marker.entry = entry.clone();
            }
        } else {
            self.ids = entries.iter().map(|e| e.id().to_string()).collect();
            self.markers = SyntheticMapLayout::layout(entries);
            self.layouts += 1;
            tracing::trace!(markers = self.markers.len(), "Synthetic layout recomputed");
        }

        &self.markers
    }

    fn markers(&self) -> &[ViewportMarker] {
        &self.markers
    }

    fn events(&self) -> &MapEventSender {
        &self.events
    }

    fn text_preview(&self, width: usize, height: usize) -> Option<String> {
        Some(self.ascii_preview(width, height))
    }
}
