//! Integration tests for the nearby-points flow.
//!
//! These tests drive the complete path a "nearby" screen takes:
//! - device fix → provider → proximity entries
//! - watch delivery → re-sorted entries
//! - entries → map markers → click → selection → hand-off URIs
//! - SOS countdown using the same provider and catalog
//!
//! Run with: `cargo test --test proximity_flow`

use std::sync::Arc;

use parking_lot::Mutex;

use safezone::catalog::{Catalog, Category};
use safezone::geo::GeoPosition;
use safezone::interaction::{MapInteractionController, UriHandoff, UriLauncher};
use safezone::location::{GeolocationProvider, LocationConfig, ProviderState, SimulatedDevice};
use safezone::map::{create_renderer, event_channel, MapEvent, RendererKind, MAX_PERCENT, MIN_PERCENT};
use safezone::proximity::{MemoizedProximity, ProximityQuery};
use safezone::sos::{EmergencyDispatcher, SosAlert, SosCountdown};

// ============================================================================
// Helper Functions
// ============================================================================

/// Colombo city centre.
const ORIGIN: (f64, f64) = (6.9271, 79.8612);

/// A few hundred meters from Castle Street Hospital.
const BORELLA: (f64, f64) = (6.9100, 79.8790);

#[derive(Default)]
struct RecordingLauncher {
    opened: Mutex<Vec<String>>,
}

impl UriLauncher for RecordingLauncher {
    fn launch(&self, uri: &str) -> std::io::Result<()> {
        self.opened.lock().push(uri.to_string());
        Ok(())
    }
}

#[derive(Default)]
struct RecordingDispatcher {
    alerts: Mutex<Vec<SosAlert>>,
}

impl EmergencyDispatcher for RecordingDispatcher {
    fn dispatch(&self, alert: &SosAlert) {
        self.alerts.lock().push(alert.clone());
    }
}

fn ids(entries: &[safezone::proximity::ProximityEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.id()).collect()
}

async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

// ============================================================================
// Integration Tests
// ============================================================================

/// A started provider feeds distances into the proximity query.
#[tokio::test]
async fn test_fix_orders_catalog_by_distance() {
    let catalog = Catalog::sample().unwrap();
    let device = Arc::new(SimulatedDevice::fixed(ORIGIN.0, ORIGIN.1, 10.0));
    let provider = GeolocationProvider::new(device);

    let state = provider.start(LocationConfig::default()).await;
    assert_eq!(state, ProviderState::Watching);

    let fix = provider.current_fix();
    let entries = ProximityQuery::new().run(&catalog, fix.as_ref());
    assert_eq!(entries.len(), catalog.len());
    assert_eq!(
        &ids(&entries)[..3],
        &["police-maradana", "hospital-national", "incident-pettah-theft"]
    );
    assert!(entries.iter().all(|e| e.distance_km.is_some()));
}

/// A watch delivery moves the user and the next query reflects it.
#[tokio::test]
async fn test_watch_update_reorders_entries() {
    let catalog = Catalog::sample().unwrap();
    let device = Arc::new(SimulatedDevice::fixed(ORIGIN.0, ORIGIN.1, 10.0));
    let provider = GeolocationProvider::new(device.clone());
    provider.start(LocationConfig::default()).await;

    let mut memo = MemoizedProximity::new();
    let query = ProximityQuery::new().category(Category::Hospital);
    let before = memo.get(&catalog, provider.current_fix().as_ref(), query.filter());
    assert_eq!(before[0].id(), "hospital-national");

    let moved = GeoPosition::now(BORELLA.0, BORELLA.1, 5.0).unwrap();
    assert_eq!(device.deliver(Ok(moved)), 1);
    settle().await;

    assert_eq!(provider.current_fix(), Some(moved));
    let after = memo.get(&catalog, provider.current_fix().as_ref(), query.filter());
    assert_eq!(
        ids(&after),
        vec!["hospital-castle-street", "hospital-lady-ridgeway", "hospital-national"]
    );
}

/// Without location the list is still shown, in catalog order.
#[tokio::test]
async fn test_unsupported_location_keeps_catalog_order() {
    let catalog = Catalog::sample().unwrap();
    let provider = GeolocationProvider::new(Arc::new(SimulatedDevice::unsupported()));
    let state = provider.start(LocationConfig::default()).await;
    assert!(state.is_error());

    let entries = ProximityQuery::new().safe_zones_only(true).run(&catalog, None);
    let expected: Vec<&str> = catalog
        .iter()
        .filter(|p| p.is_safe_zone())
        .map(|p| p.id.as_str())
        .collect();
    assert_eq!(ids(&entries), expected);
    assert!(entries.iter().all(|e| e.distance_label().is_none()));
}

/// Markers from the proximity list can be clicked and hand off to the host.
#[tokio::test]
async fn test_marker_click_to_directions_and_call() {
    let catalog = Catalog::sample().unwrap();
    let origin = GeoPosition::now(BORELLA.0, BORELLA.1, 5.0).unwrap();
    let entries = ProximityQuery::new()
        .safe_zones_only(true)
        .limit(3)
        .run(&catalog, Some(&origin));

    let (tx, mut rx) = event_channel();
    let mut renderer = create_renderer(RendererKind::Synthetic, None, tx);
    let markers = renderer.render(&entries, Some(&origin)).to_vec();
    assert_eq!(markers.len(), 3);
    for marker in &markers {
        assert!((MIN_PERCENT..=MAX_PERCENT).contains(&marker.x_percent));
        assert!((MIN_PERCENT..=MAX_PERCENT).contains(&marker.y_percent));
    }

    let launcher = Arc::new(RecordingLauncher::default());
    let mut controller = MapInteractionController::with_uri_handoff(UriHandoff::new(launcher.clone()));

    let first = markers[0].id().to_string();
    assert_eq!(first, "hospital-castle-street");
    assert!(renderer.click(&first));
    assert!(!renderer.click("not-on-the-map"));
    renderer.emit(MapEvent::DirectionsRequested { id: first.clone() });
    renderer.emit(MapEvent::CallRequested { id: first.clone() });
    drop(renderer);

    controller.run(&mut rx, &catalog).await;

    assert_eq!(controller.selected_id(), Some("hospital-castle-street"));
    assert_eq!(
        *launcher.opened.lock(),
        vec![
            "https://www.google.com/maps/dir/?api=1&destination=Castle%20Street%2C%20Colombo%2008"
                .to_string(),
            "tel:+94112696231".to_string(),
        ]
    );
}

/// The SOS countdown uses the provider's fresh fix and the nearest safe zones.
#[tokio::test(start_paused = true)]
async fn test_sos_alert_carries_nearest_safe_zones() {
    let catalog = Catalog::sample().unwrap();
    let device = Arc::new(SimulatedDevice::fixed(BORELLA.0, BORELLA.1, 5.0));
    let provider = GeolocationProvider::new(device.clone());
    provider.start(LocationConfig::default()).await;
    let requests_before = device.request_count();

    let dispatcher = RecordingDispatcher::default();
    let alert = SosCountdown::new(2)
        .run(&provider, &catalog, &dispatcher, |_| {})
        .await
        .unwrap();

    // Forced refresh bypasses the cached fix.
    assert_eq!(device.request_count(), requests_before + 1);
    assert!(alert.fix.is_some());
    let zones: Vec<&str> = alert.safe_zones.iter().map(|e| e.id()).collect();
    // The community hall is closer but unverified.
    assert_eq!(
        zones,
        vec!["hospital-castle-street", "hospital-lady-ridgeway", "shelter-women-centre"]
    );
    assert_eq!(dispatcher.alerts.lock().len(), 1);
}
