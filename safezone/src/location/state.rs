//! Provider state types.
//!
//! - [`LocationConfig`] - acquisition settings
//! - [`PositionOptions`] - per-request options handed to the device
//! - [`ProviderState`] - lifecycle state machine
//! - [`LocationStatus`] - snapshot for consumers, with derived availability
//!   and the recovery action a UI should offer

use std::fmt;
use std::time::Duration;

use super::error::LocationError;
use crate::geo::GeoPosition;

/// Default request deadline (10 seconds).
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Default cache lifetime for a fix (5 minutes).
pub const DEFAULT_MAXIMUM_AGE_MS: u64 = 300_000;

/// Options for a single device request or watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub enable_high_accuracy: bool,
    /// Deadline for the request in milliseconds.
    pub timeout_ms: u64,
    /// Oldest cached fix the device may answer with, in milliseconds.
    pub maximum_age_ms: u64,
}

/// Acquisition settings for the geolocation provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationConfig {
    /// Ask the device for its best (GPS-grade) accuracy.
    pub high_accuracy: bool,
    /// Deadline for one-shot requests.
    pub timeout_ms: u64,
    /// How long a fix stays fresh for `refresh(false)`.
    pub maximum_age_ms: u64,
    /// Start a continuous watch after the first successful fix.
    pub watch: bool,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            maximum_age_ms: DEFAULT_MAXIMUM_AGE_MS,
            watch: true,
        }
    }
}

impl LocationConfig {
    /// Device options derived from this configuration.
    pub fn options(&self) -> PositionOptions {
        PositionOptions {
            enable_high_accuracy: self.high_accuracy,
            timeout_ms: self.timeout_ms,
            maximum_age_ms: self.maximum_age_ms,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn maximum_age(&self) -> Duration {
        Duration::from_millis(self.maximum_age_ms)
    }
}

/// Lifecycle state of the geolocation provider.
///
/// ```text
/// Idle ──start──► Acquiring ──fix──► Active ──watch──► Watching
///                     │                 ▲                 │
///                     │                 └──────stop───────┘
///                     └──failure──► Error(kind) ◄──watch failure
/// ```
///
/// `Error` is reachable from any non-idle state. There is no terminal
/// state; the provider runs until it is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderState {
    /// Not started.
    #[default]
    Idle,
    /// Waiting for the first fix.
    Acquiring,
    /// Holding a fix, not watching.
    Active,
    /// Holding a fix and receiving continuous updates.
    Watching,
    /// The last request or delivery failed.
    Error(LocationError),
}

impl ProviderState {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// The error kind, if any.
    pub fn error(&self) -> Option<LocationError> {
        match self {
            Self::Error(kind) => Some(*kind),
            _ => None,
        }
    }
}

impl fmt::Display for ProviderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Acquiring => write!(f, "Acquiring"),
            Self::Active => write!(f, "Active"),
            Self::Watching => write!(f, "Watching"),
            Self::Error(kind) => write!(f, "Error ({})", kind),
        }
    }
}

/// What the UI can say about location right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    /// Location has not been requested.
    Idle,
    /// Still acquiring the first fix.
    Acquiring,
    /// A fix is available.
    Available,
    /// The last attempt failed but may succeed later.
    Failed(LocationError),
    /// The user denied permission.
    Denied,
    /// The device cannot provide location at all.
    Unsupported,
}

/// The recovery action a UI should offer for the current availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Nothing to do.
    None,
    /// Keep waiting for the first fix.
    Wait,
    /// Offer a retry (`refresh(true)`).
    Retry,
    /// Continue without location: catalog order, no distances.
    ProceedWithoutLocation,
}

/// Snapshot of the provider for consumers.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationStatus {
    pub state: ProviderState,
    /// The current fix, kept across errors.
    pub fix: Option<GeoPosition>,
    /// True when the fix is older than the configured maximum age.
    pub stale: bool,
    /// True while a continuous watch subscription is active.
    pub watching: bool,
}

impl LocationStatus {
    pub fn latitude(&self) -> Option<f64> {
        self.fix.map(|f| f.latitude())
    }

    pub fn longitude(&self) -> Option<f64> {
        self.fix.map(|f| f.longitude())
    }

    pub fn availability(&self) -> Availability {
        match self.state {
            ProviderState::Idle => Availability::Idle,
            ProviderState::Acquiring => Availability::Acquiring,
            ProviderState::Active | ProviderState::Watching => Availability::Available,
            ProviderState::Error(LocationError::PermissionDenied) => Availability::Denied,
            ProviderState::Error(LocationError::Unsupported) => Availability::Unsupported,
            ProviderState::Error(kind) => Availability::Failed(kind),
        }
    }

    pub fn recovery(&self) -> RecoveryAction {
        match self.availability() {
            Availability::Idle | Availability::Available => RecoveryAction::None,
            Availability::Acquiring => RecoveryAction::Wait,
            Availability::Failed(_) => RecoveryAction::Retry,
            Availability::Denied | Availability::Unsupported => {
                RecoveryAction::ProceedWithoutLocation
            }
        }
    }
}
