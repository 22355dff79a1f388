//! Geographic value types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Valid latitude range in degrees.
pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;

/// Valid longitude range in degrees.
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Errors raised by geographic computations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    /// Latitude outside [-90, 90] or longitude outside [-180, 180] (or NaN).
    #[error("Invalid coordinate: ({latitude}, {longitude})")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    /// Accuracy radius is negative or not a number.
    #[error("Invalid accuracy: {0} m")]
    InvalidAccuracy(f64),
}

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Create a validated coordinate.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        let coord = Self {
            latitude,
            longitude,
        };
        coord.validate()?;
        Ok(coord)
    }

    /// Check both components are inside their valid ranges.
    ///
    /// `Coordinate` has public fields, so values built directly (or
    /// deserialized) are re-checked here before any distance math.
    pub fn validate(&self) -> Result<(), GeoError> {
        // Range checks with contains() also reject NaN.
        if (MIN_LAT..=MAX_LAT).contains(&self.latitude)
            && (MIN_LON..=MAX_LON).contains(&self.longitude)
        {
            Ok(())
        } else {
            Err(GeoError::InvalidCoordinate {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }
}

/// A single observed device position (a "fix").
///
/// Immutable once created. The geolocation provider replaces the current fix
/// wholesale when a newer one is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPosition {
    latitude: f64,
    longitude: f64,
    accuracy_meters: f64,
    captured_at: DateTime<Utc>,
}

impl GeoPosition {
    /// Create a validated fix.
    pub fn new(
        latitude: f64,
        longitude: f64,
        accuracy_meters: f64,
        captured_at: DateTime<Utc>,
    ) -> Result<Self, GeoError> {
        Coordinate::new(latitude, longitude)?;
        if accuracy_meters.is_nan() || accuracy_meters < 0.0 {
            return Err(GeoError::InvalidAccuracy(accuracy_meters));
        }
        Ok(Self {
            latitude,
            longitude,
            accuracy_meters,
            captured_at,
        })
    }

    /// Create a fix captured now.
    pub fn now(latitude: f64, longitude: f64, accuracy_meters: f64) -> Result<Self, GeoError> {
        Self::new(latitude, longitude, accuracy_meters, Utc::now())
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Accuracy radius in meters (lower is better).
    pub fn accuracy_meters(&self) -> f64 {
        self.accuracy_meters
    }

    /// When the device observed this position.
    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    /// The position as a plain coordinate.
    pub fn coordinate(&self) -> Coordinate {
        Coordinate {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    /// Age of this fix relative to `now`. Fixes stamped in the future count as age zero.
    pub fn age_at(&self, now: DateTime<Utc>) -> std::time::Duration {
        (now - self.captured_at).to_std().unwrap_or_default()
    }

    /// Age of this fix relative to the wall clock.
    pub fn age(&self) -> std::time::Duration {
        self.age_at(Utc::now())
    }

    /// True when the fix is at least `max_age` old.
    pub fn is_stale(&self, max_age: std::time::Duration) -> bool {
        self.age() >= max_age
    }
}

impl From<GeoPosition> for Coordinate {
    fn from(position: GeoPosition) -> Self {
        position.coordinate()
    }
}

impl From<&GeoPosition> for Coordinate {
    fn from(position: &GeoPosition) -> Self {
        position.coordinate()
    }
}
