//! Deterministic synthetic layout.
//!
//! Places the i-th of n points on one of three concentric rings around the
//! viewport centre:
//!
//! ```text
//! angle  = i * 360 / n
//! radius = 30 + (i mod 3) * 15
//! x      = 50 + radius * cos(angle)
//! y      = 50 + radius * sin(angle)
//! ```
//!
//! Both coordinates are clamped to `[10, 90]` percent. Positions depend only
//! on ordinal position, so a stable ordering yields stable positions.

use crate::proximity::ProximityEntry;

/// Lower bound for marker coordinates, in percent of the viewport.
pub const MIN_PERCENT: f64 = 10.0;

/// Upper bound for marker coordinates, in percent of the viewport.
pub const MAX_PERCENT: f64 = 90.0;

/// Viewport centre, where the user's own position is drawn.
pub const CENTER_PERCENT: f64 = 50.0;

const BASE_RADIUS: f64 = 30.0;
const RING_STEP: f64 = 15.0;
const RING_COUNT: usize = 3;

/// A point placed in the viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportMarker {
    pub entry: ProximityEntry,
    /// Horizontal position in `[10, 90]` percent.
    pub x_percent: f64,
    /// Vertical position in `[10, 90]` percent, growing downwards.
    pub y_percent: f64,
}

impl ViewportMarker {
    pub fn id(&self) -> &str {
        self.entry.id()
    }
}

/// Ring layout used when no mapping SDK is available.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticMapLayout;

impl SyntheticMapLayout {
    /// Position of the `index`-th of `count` markers as `(x, y)` percent.
    pub fn position(index: usize, count: usize) -> (f64, f64) {
        if count == 0 {
            return (CENTER_PERCENT, CENTER_PERCENT);
        }

        let angle = (index as f64 * 360.0 / count as f64).to_radians();
        let radius = BASE_RADIUS + (index % RING_COUNT) as f64 * RING_STEP;

        (
            clamp_percent(CENTER_PERCENT + radius * angle.cos()),
            clamp_percent(CENTER_PERCENT + radius * angle.sin()),
        )
    }

    /// Lay out `entries` in order.
    pub fn layout(entries: &[ProximityEntry]) -> Vec<ViewportMarker> {
        let count = entries.len();
        entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let (x_percent, y_percent) = Self::position(index, count);
                ViewportMarker {
                    entry: entry.clone(),
                    x_percent,
                    y_percent,
                }
            })
            .collect()
    }
}

pub(crate) fn clamp_percent(value: f64) -> f64 {
    value.clamp(MIN_PERCENT, MAX_PERCENT)
}
