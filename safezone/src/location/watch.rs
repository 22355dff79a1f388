//! Scoped watch subscriptions.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::device::{LocationDevice, WatchId};

/// Owns an active watch subscription.
///
/// Dropping the guard clears the device watch and stops the task draining its
/// deliveries, so every exit path (explicit `stop()`, a terminal error,
/// dropping the provider) releases the subscription.
pub(crate) struct WatchGuard {
    device: Arc<dyn LocationDevice>,
    id: WatchId,
    cancellation: CancellationToken,
}

impl WatchGuard {
    pub(crate) fn new(
        device: Arc<dyn LocationDevice>,
        id: WatchId,
        cancellation: CancellationToken,
    ) -> Self {
        Self {
            device,
            id,
            cancellation,
        }
    }

    pub(crate) fn id(&self) -> WatchId {
        self.id
    }
}

impl Drop for WatchGuard {
    fn drop(&mut self) {
        self.cancellation.cancel();
        self.device.clear_watch(self.id);
        tracing::debug!(watch = %self.id, "Location watch cleared");
    }
}

impl std::fmt::Debug for WatchGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchGuard")
            .field("id", &self.id)
            .field("cancelled", &self.cancellation.is_cancelled())
            .finish_non_exhaustive()
    }
}
