//! SafeZone - location-awareness core for a personal-safety application.
//!
//! This library acquires the device position, measures proximity between the
//! user and a catalog of points of interest (police stations, hospitals,
//! shelters, reported incidents) and lays those points out for display
//! without depending on a licensed mapping engine.
//!
//! # Data Flow
//!
//! ```text
//! GeolocationProvider ──► ProximityQuery ──► MapRenderer ──► MapInteractionController
//!   (current fix)          (sorted entries)   (markers)       (selection, handoffs)
//! ```
//!
//! Every screen that shows "nearby" information (safe zones, incident
//! hotspots, SOS countdown) is built from these pieces.

pub mod catalog;
pub mod config;
pub mod geo;
pub mod input;
pub mod interaction;
pub mod location;
pub mod logging;
pub mod map;
pub mod proximity;
pub mod sos;
