//! Device location capability.
//!
//! The host environment's location API is consumed through the
//! [`LocationDevice`] trait: a one-shot request and a continuous watch, both
//! configured with [`PositionOptions`]. Watch deliveries are pushed into a
//! channel supplied by the caller, so the device never holds a reference back
//! into the provider.

use std::fmt;

use futures::future::BoxFuture;
use tokio::sync::mpsc;

use super::error::LocationError;
use super::state::PositionOptions;
use crate::geo::GeoPosition;

/// One watch delivery: a fix or a typed failure.
pub type WatchDelivery = Result<GeoPosition, LocationError>;

/// Sending half of a watch subscription.
pub type FixSender = mpsc::UnboundedSender<WatchDelivery>;

/// Handle for an active watch subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatchId(pub u64);

impl fmt::Display for WatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "watch#{}", self.0)
    }
}

/// A source of device positions.
///
/// Implementations must be `Send + Sync`; the provider shares the device
/// between its request path and its watch guard.
///
/// # Dyn Compatibility
///
/// `current_position` returns a boxed future so the trait can be used as
/// `Arc<dyn LocationDevice>`.
pub trait LocationDevice: Send + Sync {
    /// Whether the host exposes a location capability at all.
    fn is_supported(&self) -> bool {
        true
    }

    /// Request a single fix.
    ///
    /// The provider applies `options.timeout_ms` itself, so implementations
    /// may ignore the deadline.
    fn current_position(
        &self,
        options: PositionOptions,
    ) -> BoxFuture<'_, Result<GeoPosition, LocationError>>;

    /// Begin continuous delivery of fixes into `sink`.
    ///
    /// Deliveries may arrive zero, one or many times until
    /// [`clear_watch`](Self::clear_watch) is called.
    fn watch_position(
        &self,
        options: PositionOptions,
        sink: FixSender,
    ) -> Result<WatchId, LocationError>;

    /// Cancel a watch subscription. Must take effect synchronously.
    fn clear_watch(&self, id: WatchId);
}
