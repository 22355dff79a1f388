//! Scripted location device.
//!
//! [`SimulatedDevice`] stands in for the host location API in tests and in the
//! CLI. One-shot requests are answered from a queue of scripted responses
//! (falling back to a fixed position or error when the queue is empty), and
//! watch deliveries are pushed by hand with [`SimulatedDevice::deliver`].
//!
//! # Example
//!
//! ```
//! use safezone::location::{LocationError, SimulatedDevice};
//!
//! let device = SimulatedDevice::new();
//! device.push_error(LocationError::PermissionDenied);
//! assert_eq!(device.request_count(), 0);
//! ```

use std::collections::{HashMap, VecDeque};

use futures::future::{self, BoxFuture, FutureExt};
use parking_lot::Mutex;

use super::device::{FixSender, LocationDevice, WatchDelivery, WatchId};
use super::error::LocationError;
use super::state::PositionOptions;
use crate::geo::{Coordinate, GeoPosition};

/// Scripted answer to one `current_position` request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimulatedResponse {
    Fix(GeoPosition),
    Fail(LocationError),
    /// Never resolves; the provider's deadline turns it into a timeout.
    Hang,
}

/// Answer used when the script queue is empty.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Fallback {
    /// A fresh fix at this position on every request.
    Fixed {
        coordinate: Coordinate,
        accuracy_meters: f64,
    },
    Fail(LocationError),
}

#[derive(Debug)]
struct SimulatedInner {
    script: VecDeque<SimulatedResponse>,
    fallback: Fallback,
    request_count: usize,
    last_options: Option<PositionOptions>,
    watches: HashMap<WatchId, FixSender>,
    cleared: Vec<WatchId>,
    next_watch_id: u64,
}

/// A location device driven by a script.
#[derive(Debug)]
pub struct SimulatedDevice {
    supported: bool,
    inner: Mutex<SimulatedInner>,
}

impl Default for SimulatedDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedDevice {
    /// A supported device with an empty script.
    ///
    /// Requests beyond the script fail with `PositionUnavailable`.
    pub fn new() -> Self {
        Self::with_fallback(true, Fallback::Fail(LocationError::PositionUnavailable))
    }

    /// A device that always reports a fresh fix at the given position.
    pub fn fixed(latitude: f64, longitude: f64, accuracy_meters: f64) -> Self {
        Self::with_fallback(
            true,
            Fallback::Fixed {
                coordinate: Coordinate {
                    latitude,
                    longitude,
                },
                accuracy_meters,
            },
        )
    }

    /// A host without any location capability.
    pub fn unsupported() -> Self {
        Self::with_fallback(false, Fallback::Fail(LocationError::Unsupported))
    }

    fn with_fallback(supported: bool, fallback: Fallback) -> Self {
        Self {
            supported,
            inner: Mutex::new(SimulatedInner {
                script: VecDeque::new(),
                fallback,
                request_count: 0,
                last_options: None,
                watches: HashMap::new(),
                cleared: Vec::new(),
                next_watch_id: 1,
            }),
        }
    }

    /// Queue a successful response.
    pub fn push_fix(&self, fix: GeoPosition) {
        self.push_response(SimulatedResponse::Fix(fix));
    }

    /// Queue a failed response.
    pub fn push_error(&self, error: LocationError) {
        self.push_response(SimulatedResponse::Fail(error));
    }

    /// Queue a response that never arrives.
    pub fn push_hang(&self) {
        self.push_response(SimulatedResponse::Hang);
    }

    pub fn push_response(&self, response: SimulatedResponse) {
        self.inner.lock().script.push_back(response);
    }

    /// Push a delivery to every active watch. Returns how many watches got it.
    pub fn deliver(&self, delivery: WatchDelivery) -> usize {
        let inner = self.inner.lock();
        inner
            .watches
            .values()
            .filter(|sink| sink.send(delivery).is_ok())
            .count()
    }

    /// Number of one-shot requests issued so far.
    pub fn request_count(&self) -> usize {
        self.inner.lock().request_count
    }

    /// Options of the most recent one-shot request.
    pub fn last_options(&self) -> Option<PositionOptions> {
        self.inner.lock().last_options
    }

    /// Number of watches not yet cleared.
    pub fn active_watches(&self) -> usize {
        self.inner.lock().watches.len()
    }

    /// Watches cleared so far, in order.
    pub fn cleared_watches(&self) -> Vec<WatchId> {
        self.inner.lock().cleared.clone()
    }
}

impl LocationDevice for SimulatedDevice {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn current_position(
        &self,
        options: PositionOptions,
    ) -> BoxFuture<'_, Result<GeoPosition, LocationError>> {
        let mut inner = self.inner.lock();
        inner.request_count += 1;
        inner.last_options = Some(options);

        let response = match inner.script.pop_front() {
            Some(response) => response,
            None => match inner.fallback {
                Fallback::Fixed {
                    coordinate,
                    accuracy_meters,
                } => match GeoPosition::now(coordinate.latitude, coordinate.longitude, accuracy_meters)
                {
                    Ok(fix) => SimulatedResponse::Fix(fix),
                    Err(_) => SimulatedResponse::Fail(LocationError::PositionUnavailable),
                },
                Fallback::Fail(error) => SimulatedResponse::Fail(error),
            },
        };

        match response {
            SimulatedResponse::Fix(fix) => future::ready(Ok(fix)).boxed(),
            SimulatedResponse::Fail(error) => future::ready(Err(error)).boxed(),
            SimulatedResponse::Hang => future::pending::<Result<GeoPosition, LocationError>>().boxed(),
        }
    }

    fn watch_position(
        &self,
        _options: PositionOptions,
        sink: FixSender,
    ) -> Result<WatchId, LocationError> {
        if !self.supported {
            return Err(LocationError::Unsupported);
        }

        let mut inner = self.inner.lock();
        let id = WatchId(inner.next_watch_id);
        inner.next_watch_id += 1;
        inner.watches.insert(id, sink);
        Ok(id)
    }

    fn clear_watch(&self, id: WatchId) {
        let mut inner = self.inner.lock();
        if inner.watches.remove(&id).is_some() {
            inner.cleared.push(id);
        }
    }
}
