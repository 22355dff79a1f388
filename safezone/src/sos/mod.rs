//! SOS panic flow.
//!
//! Pressing SOS starts a short [`SosCountdown`] the user can still cancel.
//! When it elapses the countdown asks the provider for the freshest fix it
//! can get, picks the nearest verified safe zones and hands an [`SosAlert`]
//! to the [`EmergencyDispatcher`].

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::catalog::Catalog;
use crate::geo::{format_distance, GeoPosition};
use crate::location::GeolocationProvider;
use crate::proximity::{nearest_safe_zones, ProximityEntry};

/// Default countdown before an alert is dispatched.
pub const DEFAULT_COUNTDOWN_SECS: u64 = 5;

/// Default number of safe zones attached to an alert.
pub const DEFAULT_SAFE_ZONE_COUNT: usize = 3;

const TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SosError {
    #[error("SOS cancelled before dispatch")]
    Cancelled,
}

/// What gets sent to emergency contacts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SosAlert {
    pub raised_at: DateTime<Utc>,
    /// Best known position; `None` when location is unavailable.
    pub fix: Option<GeoPosition>,
    /// Provider state when the alert was assembled, e.g. `"Watching"`.
    pub location_state: String,
    pub safe_zones: Vec<ProximityEntry>,
}

impl SosAlert {
    /// One-line description for logs and terminals.
    pub fn summary(&self) -> String {
        let position = match &self.fix {
            Some(fix) => format!(
                "{:.5}, {:.5} (±{:.0} m)",
                fix.latitude(),
                fix.longitude(),
                fix.accuracy_meters()
            ),
            None => "location unavailable".to_string(),
        };

        match self.safe_zones.first() {
            Some(nearest) => {
                let distance = nearest
                    .distance_km
                    .map(format_distance)
                    .unwrap_or_else(|| "distance unknown".to_string());
                format!("SOS at {position}; nearest safe zone: {} ({distance})", nearest.point.name)
            }
            None => format!("SOS at {position}; no safe zones known"),
        }
    }
}

/// Delivers an alert to emergency contacts. Fire-and-forget.
pub trait EmergencyDispatcher: Send + Sync {
    fn dispatch(&self, alert: &SosAlert);
}

/// Cancellable countdown ending in an alert dispatch.
#[derive(Debug, Clone)]
pub struct SosCountdown {
    seconds: u64,
    safe_zone_count: usize,
    cancellation: CancellationToken,
}

impl SosCountdown {
    pub fn new(seconds: u64) -> Self {
        Self {
            seconds,
            safe_zone_count: DEFAULT_SAFE_ZONE_COUNT,
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_safe_zone_count(mut self, count: usize) -> Self {
        self.safe_zone_count = count;
        self
    }

    pub fn seconds(&self) -> u64 {
        self.seconds
    }

    /// Stop the countdown. Safe to call from any thread.
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    /// Token that cancels this countdown, for signal handlers and UI buttons.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Count down, then assemble and dispatch the alert.
    ///
    /// `on_tick` receives the remaining seconds, ending with 0 just before
    /// dispatch. Returns [`SosError::Cancelled`] if cancelled first.
    pub async fn run(
        &self,
        provider: &GeolocationProvider,
        catalog: &Catalog,
        dispatcher: &dyn EmergencyDispatcher,
        mut on_tick: impl FnMut(u64),
    ) -> Result<SosAlert, SosError> {
        tracing::info!(seconds = self.seconds, "SOS countdown started");

        for remaining in (1..=self.seconds).rev() {
            on_tick(remaining);
            tokio::select! {
                biased;
                _ = self.cancellation.cancelled() => {
                    tracing::info!(remaining, "SOS cancelled");
                    return Err(SosError::Cancelled);
                }
                _ = tokio::time::sleep(TICK) => {}
            }
        }

        if self.cancellation.is_cancelled() {
            return Err(SosError::Cancelled);
        }
        on_tick(0);

        let fix = provider.refresh(true).await;
        let alert = SosAlert {
            raised_at: Utc::now(),
            fix,
            location_state: provider.state().to_string(),
            safe_zones: nearest_safe_zones(catalog, fix.as_ref(), self.safe_zone_count),
        };

        tracing::warn!(
            has_fix = alert.fix.is_some(),
            safe_zones = alert.safe_zones.len(),
            "Dispatching SOS alert"
        );
        dispatcher.dispatch(&alert);
        Ok(alert)
    }
}

impl Default for SosCountdown {
    fn default() -> Self {
        Self::new(DEFAULT_COUNTDOWN_SECS)
    }
}
