//! Device location acquisition.
//!
//! The [`GeolocationProvider`] drives a [`LocationDevice`] through the
//! acquisition lifecycle and holds the single current fix for the session.
//! Failures are captured into [`ProviderState::Error`] rather than returned,
//! so consumers only ever read a [`LocationStatus`] snapshot and decide
//! whether to wait, retry or proceed without a location.
//!
//! # Components
//!
//! - [`LocationDevice`] - host capability: one-shot request and continuous watch
//! - [`SimulatedDevice`] - scripted device for tests and the CLI
//! - [`GeolocationProvider`] - state machine with monotonic fix acceptance
//! - [`LocationConfig`] - acquisition options

mod device;
mod error;
mod provider;
mod simulated;
mod state;
mod watch;

pub use device::{FixSender, LocationDevice, WatchDelivery, WatchId};
pub use error::LocationError;
pub use provider::GeolocationProvider;
pub use simulated::{SimulatedDevice, SimulatedResponse};
pub use state::{
    Availability, LocationConfig, LocationStatus, PositionOptions, ProviderState,
    RecoveryAction, DEFAULT_MAXIMUM_AGE_MS, DEFAULT_TIMEOUT_MS,
};
