//! Great-circle distance between geographic coordinates.
//!
//! Provides the haversine distance used by every "nearby" view, plus the
//! human-readable "km away" annotation shown next to each point.

mod types;

#[cfg(test)]
mod tests;

pub use types::{Coordinate, GeoError, GeoPosition, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Computes the great-circle distance between two coordinates in kilometers.
///
/// Uses the haversine formula on a sphere of radius [`EARTH_RADIUS_KM`].
///
/// # Errors
///
/// Returns [`GeoError::InvalidCoordinate`] if either latitude is outside
/// [-90, 90] or either longitude is outside [-180, 180].
///
/// # Example
///
/// ```
/// use safezone::geo::{distance_km, Coordinate};
///
/// let colombo = Coordinate::new(6.9271, 79.8612).unwrap();
/// let fort = Coordinate::new(6.9344, 79.8428).unwrap();
/// let km = distance_km(colombo, fort).unwrap();
/// assert!((km - 2.2).abs() < 0.2);
/// ```
pub fn distance_km(a: impl Into<Coordinate>, b: impl Into<Coordinate>) -> Result<f64, GeoError> {
    let a = a.into();
    let b = b.into();
    a.validate()?;
    b.validate()?;

    // Absolute deltas keep the result bit-identical when a and b are swapped.
    let d_lat = (b.latitude - a.latitude).abs().to_radians();
    let d_lon = (b.longitude - a.longitude).abs().to_radians();
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push h a hair past 1.0 for antipodal points.
    let central_angle = 2.0 * h.clamp(0.0, 1.0).sqrt().asin();

    Ok(EARTH_RADIUS_KM * central_angle)
}

/// Formats a distance as the annotation shown next to a point.
///
/// - below 1 km: whole meters (`"850 m away"`)
/// - below 100 km: one decimal (`"2.3 km away"`)
/// - otherwise whole kilometers (`"123 km away"`)
pub fn format_distance(km: f64) -> String {
    if km < 1.0 {
        format!("{:.0} m away", (km * 1000.0).max(0.0))
    } else if km < 100.0 {
        format!("{:.1} km away", km)
    } else {
        format!("{:.0} km away", km)
    }
}
