//! Geolocation provider: the acquisition state machine.
//!
//! Owns the single "current fix" for the session. Only the provider writes
//! it, and only when a fix is at least as new as the one it holds (monotonic
//! acceptance), which guards against out-of-order delivery from overlapping
//! requests. Every other component reads snapshots.
//!
//! # Lifecycle
//!
//! ```text
//! start(config) ─► Acquiring ─► Active ─► Watching ─stop()─► Active
//!                      │
//!                      └─► Error(kind)   (cached fix is kept)
//! ```
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use safezone::location::{GeolocationProvider, LocationConfig, ProviderState, SimulatedDevice};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let device = Arc::new(SimulatedDevice::fixed(6.9271, 79.8612, 20.0));
//! let provider = GeolocationProvider::new(device);
//!
//! let state = provider.start(LocationConfig::default()).await;
//! assert_eq!(state, ProviderState::Watching);
//! assert_eq!(provider.latitude(), Some(6.9271));
//!
//! provider.stop();
//! assert_eq!(provider.state(), ProviderState::Active);
//! # }
//! ```

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;

use super::device::{LocationDevice, WatchDelivery, WatchId};
use super::error::LocationError;
use super::state::{LocationConfig, LocationStatus, PositionOptions, ProviderState};
use super::watch::WatchGuard;
use crate::geo::GeoPosition;

/// Capacity of the accepted-fix broadcast channel.
const FIX_BROADCAST_CAPACITY: usize = 16;

/// Mutable provider state, guarded as one unit so no partial update is visible.
#[derive(Debug)]
struct ProviderInner {
    state: ProviderState,
    fix: Option<GeoPosition>,
    config: LocationConfig,
    /// Set once `start` has run; refresh only resumes watching after that.
    started: bool,
    watch: Option<WatchGuard>,
}

/// State shared between the provider and its watch task.
struct Shared {
    inner: Mutex<ProviderInner>,
    fixes_tx: broadcast::Sender<GeoPosition>,
}

impl Shared {
    /// Replace the current fix if `fix` is not older than it.
    fn accept_fix(&self, inner: &mut ProviderInner, fix: GeoPosition) -> bool {
        if let Some(current) = inner.fix {
            if fix.captured_at() < current.captured_at() {
                tracing::debug!(
                    fix_at = %fix.captured_at(),
                    current_at = %current.captured_at(),
                    "Out-of-order fix ignored"
                );
                return false;
            }
        }

        inner.fix = Some(fix);
        tracing::debug!(
            latitude = fix.latitude(),
            longitude = fix.longitude(),
            accuracy_m = fix.accuracy_meters(),
            "Fix accepted"
        );
        // No subscribers is fine.
        let _ = self.fixes_tx.send(fix);
        true
    }

    /// Move to `Error(error)`, keeping the cached fix.
    fn record_error(&self, inner: &mut ProviderInner, error: LocationError) {
        inner.state = ProviderState::Error(error);
        if error.is_terminal() {
            tracing::warn!(error = %error, "Location unavailable for this session");
            // Dropping the guard clears any running watch.
            inner.watch = None;
        } else {
            tracing::warn!(error = %error, "Location request failed");
        }
    }

    /// Apply one watch delivery. Returns false when the watch should end.
    fn apply_watch_delivery(&self, id: WatchId, delivery: WatchDelivery) -> bool {
        let mut inner = self.inner.lock();
        if inner.watch.as_ref().map(WatchGuard::id) != Some(id) {
            return false;
        }

        match delivery {
            Ok(fix) => {
                self.accept_fix(&mut inner, fix);
                if inner.state.is_error() {
                    tracing::info!(watch = %id, "Location watch recovered");
                }
                inner.state = ProviderState::Watching;
                true
            }
            Err(error) => {
                self.record_error(&mut inner, error);
                !error.is_terminal()
            }
        }
    }
}

/// Manages device-location acquisition and exposes the current fix.
///
/// Errors never escape: they are recorded as [`ProviderState::Error`] and the
/// last good fix stays available.
pub struct GeolocationProvider {
    device: Arc<dyn LocationDevice>,
    shared: Arc<Shared>,
}

impl std::fmt::Debug for GeolocationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeolocationProvider")
            .field("inner", &*self.shared.inner.lock())
            .finish_non_exhaustive()
    }
}

impl GeolocationProvider {
    /// Create an idle provider over a device.
    pub fn new(device: Arc<dyn LocationDevice>) -> Self {
        let (fixes_tx, _) = broadcast::channel(FIX_BROADCAST_CAPACITY);
        Self {
            device,
            shared: Arc::new(Shared {
                inner: Mutex::new(ProviderInner {
                    state: ProviderState::Idle,
                    fix: None,
                    config: LocationConfig::default(),
                    started: false,
                    watch: None,
                }),
                fixes_tx,
            }),
        }
    }

    /// Acquire a first fix, then begin watching if `config.watch` is set.
    ///
    /// Ignored while acquiring or watching, and after a terminal error. On
    /// failure the provider moves to `Error(kind)` and keeps any cached fix.
    /// Returns the resulting state.
    pub async fn start(&self, config: LocationConfig) -> ProviderState {
        {
            let mut inner = self.shared.inner.lock();
            match inner.state {
                ProviderState::Acquiring | ProviderState::Watching => {
                    tracing::warn!(state = %inner.state, "Location already started, ignoring start");
                    return inner.state;
                }
                ProviderState::Error(error) if error.is_terminal() => {
                    tracing::debug!(error = %error, "Location unavailable, ignoring start");
                    return inner.state;
                }
                _ => {}
            }

            inner.config = config.clone();
            inner.started = true;

            if !self.device.is_supported() {
                self.shared
                    .record_error(&mut inner, LocationError::Unsupported);
                return inner.state;
            }
            inner.state = ProviderState::Acquiring;
        }

        tracing::info!(
            high_accuracy = config.high_accuracy,
            timeout_ms = config.timeout_ms,
            maximum_age_ms = config.maximum_age_ms,
            "Acquiring location"
        );

        let result = self.request_once(config.options()).await;

        let mut inner = self.shared.inner.lock();
        match result {
            Ok(fix) => {
                self.shared.accept_fix(&mut inner, fix);
                inner.state = ProviderState::Active;
                if config.watch {
                    self.begin_watch(&mut inner);
                }
            }
            Err(error) => self.shared.record_error(&mut inner, error),
        }
        inner.state
    }

    /// Return a usable fix, asking the device only when necessary.
    ///
    /// With `force == false` a cached fix younger than `maximum_age_ms` is
    /// returned without any device request. With `force == true` a fresh
    /// request is always issued with `maximum_age_ms = 0`.
    ///
    /// After a terminal error the device is not contacted. On failure the
    /// cached fix (if any) is returned and the error is recorded in state.
    pub async fn refresh(&self, force: bool) -> Option<GeoPosition> {
        let options = {
            let mut inner = self.shared.inner.lock();

            if let ProviderState::Error(error) = inner.state {
                if error.is_terminal() {
                    tracing::debug!(error = %error, "Refresh skipped, location unavailable");
                    return inner.fix;
                }
            }

            if !self.device.is_supported() {
                self.shared
                    .record_error(&mut inner, LocationError::Unsupported);
                return inner.fix;
            }

            if !force {
                if let Some(fix) = inner.fix {
                    if fix.age() < inner.config.maximum_age() {
                        tracing::trace!("Cached fix still fresh");
                        return Some(fix);
                    }
                }
            }

            if matches!(inner.state, ProviderState::Idle | ProviderState::Error(_)) {
                inner.state = ProviderState::Acquiring;
            }

            let mut options = inner.config.options();
            if force {
                options.maximum_age_ms = 0;
            }
            options
        };

        tracing::debug!(force, "Refreshing location");
        let result = self.request_once(options).await;

        let mut inner = self.shared.inner.lock();
        match result {
            Ok(fix) => {
                self.shared.accept_fix(&mut inner, fix);
                if inner.watch.is_some() {
                    inner.state = ProviderState::Watching;
                } else {
                    inner.state = ProviderState::Active;
                    if inner.started && inner.config.watch {
                        self.begin_watch(&mut inner);
                    }
                }
            }
            Err(error) => self.shared.record_error(&mut inner, error),
        }
        inner.fix
    }

    /// Cancel the continuous watch, if any. Takes effect immediately.
    pub fn stop(&self) {
        let mut inner = self.shared.inner.lock();
        if let Some(guard) = inner.watch.take() {
            drop(guard);
            if inner.state == ProviderState::Watching {
                inner.state = ProviderState::Active;
            }
            tracing::info!("Location watch stopped");
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ProviderState {
        self.shared.inner.lock().state
    }

    /// The current fix, kept across errors.
    pub fn current_fix(&self) -> Option<GeoPosition> {
        self.shared.inner.lock().fix
    }

    pub fn latitude(&self) -> Option<f64> {
        self.current_fix().map(|f| f.latitude())
    }

    pub fn longitude(&self) -> Option<f64> {
        self.current_fix().map(|f| f.longitude())
    }

    /// True when a fix exists and is older than the configured maximum age.
    pub fn is_stale(&self) -> bool {
        let inner = self.shared.inner.lock();
        inner
            .fix
            .is_some_and(|fix| fix.is_stale(inner.config.maximum_age()))
    }

    pub fn is_watching(&self) -> bool {
        self.shared.inner.lock().watch.is_some()
    }

    /// Consistent snapshot of state and fix.
    pub fn status(&self) -> LocationStatus {
        let inner = self.shared.inner.lock();
        LocationStatus {
            state: inner.state,
            fix: inner.fix,
            stale: inner
                .fix
                .is_some_and(|fix| fix.is_stale(inner.config.maximum_age())),
            watching: inner.watch.is_some(),
        }
    }

    /// The configuration passed to the last `start`.
    pub fn config(&self) -> LocationConfig {
        self.shared.inner.lock().config.clone()
    }

    /// Subscribe to accepted fixes.
    pub fn subscribe(&self) -> broadcast::Receiver<GeoPosition> {
        self.shared.fixes_tx.subscribe()
    }

    /// One device request bounded by `options.timeout_ms`.
    async fn request_once(&self, options: PositionOptions) -> Result<GeoPosition, LocationError> {
        let deadline = std::time::Duration::from_millis(options.timeout_ms);
        match tokio::time::timeout(deadline, self.device.current_position(options)).await {
            Ok(result) => result,
            Err(_) => Err(LocationError::Timeout),
        }
    }

    /// Subscribe to continuous updates and spawn the task that applies them.
    fn begin_watch(&self, inner: &mut ProviderInner) {
        if inner.watch.is_some() {
            inner.state = ProviderState::Watching;
            return;
        }

        let (tx, rx) = mpsc::unbounded_channel();
        match self.device.watch_position(inner.config.options(), tx) {
            Ok(id) => {
                let cancellation = CancellationToken::new();
                tokio::spawn(drain_watch(
                    Arc::downgrade(&self.shared),
                    id,
                    rx,
                    cancellation.clone(),
                ));
                inner.watch = Some(WatchGuard::new(
                    Arc::clone(&self.device),
                    id,
                    cancellation,
                ));
                inner.state = ProviderState::Watching;
                tracing::info!(watch = %id, "Location watch started");
            }
            Err(error) => self.shared.record_error(inner, error),
        }
    }
}

/// Apply watch deliveries one at a time until cancelled or the watch ends.
async fn drain_watch(
    shared: Weak<Shared>,
    id: WatchId,
    mut deliveries: mpsc::UnboundedReceiver<WatchDelivery>,
    cancellation: CancellationToken,
) {
    loop {
        let delivery = tokio::select! {
            biased;
            _ = cancellation.cancelled() => break,
            delivery = deliveries.recv() => delivery,
        };

        let Some(delivery) = delivery else {
            break;
        };
        let Some(shared) = shared.upgrade() else {
            break;
        };
        if !shared.apply_watch_delivery(id, delivery) {
            break;
        }
    }
    tracing::trace!(watch = %id, "Watch task finished");
}
