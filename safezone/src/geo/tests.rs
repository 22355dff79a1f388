//! Tests for distance computation

use super::*;

const COLOMBO: (f64, f64) = (6.9271, 79.8612);
const FORT_POLICE: (f64, f64) = (6.9344, 79.8428);

fn coord(lat: f64, lon: f64) -> Coordinate {
    Coordinate::new(lat, lon).unwrap()
}

#[test]
fn test_colombo_to_fort_police_station() {
    let km = distance_km(coord(COLOMBO.0, COLOMBO.1), coord(FORT_POLICE.0, FORT_POLICE.1)).unwrap();
    assert!((km - 2.2).abs() <= 0.2, "Expected ~2.2 km, got {}", km);
}

#[test]
fn test_same_point_is_zero() {
    let a = coord(COLOMBO.0, COLOMBO.1);
    assert_eq!(distance_km(a, a).unwrap(), 0.0);
}

#[test]
fn test_london_to_paris() {
    // London 51.5074°N 0.1278°W, Paris 48.8566°N 2.3522°E: ~343.5 km
    let km = distance_km(coord(51.5074, -0.1278), coord(48.8566, 2.3522)).unwrap();
    assert!((km - 343.5).abs() < 2.0, "Expected ~343.5 km, got {}", km);
}

#[test]
fn test_antipodal_points_are_half_circumference() {
    let km = distance_km(coord(0.0, 0.0), coord(0.0, 180.0)).unwrap();
    let half = std::f64::consts::PI * EARTH_RADIUS_KM;
    assert!((km - half).abs() < 1e-6);
}

#[test]
fn test_accepts_geo_position() {
    let fix = GeoPosition::now(COLOMBO.0, COLOMBO.1, 15.0).unwrap();
    let km = distance_km(fix, coord(FORT_POLICE.0, FORT_POLICE.1)).unwrap();
    assert!(km > 2.0 && km < 2.4);
}

#[test]
fn test_invalid_latitude() {
    let bad = Coordinate {
        latitude: 91.0,
        longitude: 0.0,
    };
    let result = distance_km(bad, coord(0.0, 0.0));
    assert!(matches!(
        result.unwrap_err(),
        GeoError::InvalidCoordinate { latitude, .. } if latitude == 91.0
    ));
}

#[test]
fn test_invalid_longitude_second_argument() {
    let bad = Coordinate {
        latitude: 0.0,
        longitude: -180.5,
    };
    assert!(distance_km(coord(0.0, 0.0), bad).is_err());
}

#[test]
fn test_nan_is_invalid() {
    assert!(Coordinate::new(f64::NAN, 0.0).is_err());
    assert!(Coordinate::new(0.0, f64::NAN).is_err());
}

#[test]
fn test_boundaries_are_valid() {
    assert!(Coordinate::new(90.0, 180.0).is_ok());
    assert!(Coordinate::new(-90.0, -180.0).is_ok());
}

#[test]
fn test_geo_position_rejects_negative_accuracy() {
    let result = GeoPosition::now(0.0, 0.0, -1.0);
    assert!(matches!(result, Err(GeoError::InvalidAccuracy(_))));
}

#[test]
fn test_geo_position_age() {
    let captured = chrono::Utc::now() - chrono::Duration::seconds(10);
    let fix = GeoPosition::new(COLOMBO.0, COLOMBO.1, 5.0, captured).unwrap();
    let age = fix.age_at(captured + chrono::Duration::seconds(10));
    assert_eq!(age, std::time::Duration::from_secs(10));
    assert!(!fix.is_stale(std::time::Duration::from_secs(300)));
    assert!(fix.is_stale(std::time::Duration::from_secs(5)));
}

#[test]
fn test_future_fix_has_zero_age() {
    let now = chrono::Utc::now();
    let fix = GeoPosition::new(0.0, 0.0, 5.0, now + chrono::Duration::seconds(30)).unwrap();
    assert_eq!(fix.age_at(now), std::time::Duration::ZERO);
}

#[test]
fn test_geo_position_serializes_validated_fields() {
    let fix = GeoPosition::now(COLOMBO.0, COLOMBO.1, 12.5).unwrap();
    let json = serde_json::to_value(fix).unwrap();
    assert_eq!(json["latitude"], COLOMBO.0);
    assert_eq!(json["longitude"], COLOMBO.1);
    assert_eq!(json["accuracy_meters"], 12.5);
    assert!(json["captured_at"].is_string());
}

#[test]
fn test_format_distance() {
    assert_eq!(format_distance(0.85), "850 m away");
    assert_eq!(format_distance(2.187), "2.2 km away");
    assert_eq!(format_distance(123.4), "123 km away");
    assert_eq!(format_distance(0.0), "0 m away");
}

// Property-based tests using proptest
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn any_coord() -> impl Strategy<Value = Coordinate> {
        (-90.0..=90.0_f64, -180.0..=180.0_f64).prop_map(|(latitude, longitude)| Coordinate {
            latitude,
            longitude,
        })
    }

    proptest! {
        #[test]
        fn test_identity_is_zero(a in any_coord()) {
            prop_assert_eq!(distance_km(a, a)?, 0.0);
        }

        #[test]
        fn test_symmetric(a in any_coord(), b in any_coord()) {
            prop_assert_eq!(distance_km(a, b)?, distance_km(b, a)?);
        }

        #[test]
        fn test_non_negative_and_bounded(a in any_coord(), b in any_coord()) {
            let d = distance_km(a, b)?;
            prop_assert!(d >= 0.0);
            prop_assert!(d <= std::f64::consts::PI * EARTH_RADIUS_KM + 1e-6);
        }

        #[test]
        fn test_triangle_inequality(a in any_coord(), b in any_coord(), c in any_coord()) {
            let ab = distance_km(a, b)?;
            let bc = distance_km(b, c)?;
            let ac = distance_km(a, c)?;
            // asin loses precision near antipodes, hence the 10 m slack.
            prop_assert!(
                ac <= ab + bc + 1e-2,
                "triangle inequality violated: ac={} ab={} bc={}",
                ac, ab, bc
            );
        }
    }
}
