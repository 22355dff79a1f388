//! CLI command implementations.
//!
//! - [`nearby`] - distance-sorted list, optional map and hand-offs
//! - [`distance`] - great-circle distance between two coordinates
//! - [`sos`] - SOS countdown and alert
//! - [`config`] - configuration file management (init, show, path)

pub mod common;
pub mod config;
pub mod distance;
pub mod nearby;
pub mod sos;
