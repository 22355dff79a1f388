//! Marker selection and host hand-offs.
//!
//! [`MapInteractionController`] holds at most one selected marker id and
//! turns map events into selection changes or requests to the navigation
//! and dialer collaborators. Hand-offs are fire-and-forget: collaborator
//! failures never reach the caller.

mod handoff;

pub use handoff::{
    dial_uri, directions_uri, percent_encode, DialerHandoff, NavigationHandoff, UriHandoff,
    UriLauncher,
};

use std::sync::Arc;

use crate::catalog::{Catalog, PointOfInterest};
use crate::map::{MapEvent, MapEventReceiver};

/// Selection state plus collaborators for external actions.
pub struct MapInteractionController {
    selected_id: Option<String>,
    navigation: Arc<dyn NavigationHandoff>,
    dialer: Arc<dyn DialerHandoff>,
}

impl std::fmt::Debug for MapInteractionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapInteractionController")
            .field("selected_id", &self.selected_id)
            .finish_non_exhaustive()
    }
}

impl MapInteractionController {
    pub fn new(navigation: Arc<dyn NavigationHandoff>, dialer: Arc<dyn DialerHandoff>) -> Self {
        Self {
            selected_id: None,
            navigation,
            dialer,
        }
    }

    /// Controller whose hand-offs both go through one [`UriHandoff`].
    pub fn with_uri_handoff(handoff: UriHandoff) -> Self {
        let handoff = Arc::new(handoff);
        Self::new(handoff.clone(), handoff)
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    /// Select a marker. Selecting the current marker again keeps it selected.
    pub fn select_marker(&mut self, id: impl Into<String>) {
        let id = id.into();
        if self.selected_id.as_deref() != Some(id.as_str()) {
            tracing::debug!(id = %id, "Marker selected");
            self.selected_id = Some(id);
        }
    }

    pub fn clear_selection(&mut self) {
        if let Some(id) = self.selected_id.take() {
            tracing::debug!(id = %id, "Selection cleared");
        }
    }

    /// Pass `address` unchanged to the navigation collaborator.
    pub fn request_directions(&self, address: &str) {
        self.navigation.open_directions(address);
    }

    /// Pass `phone` unchanged to the dialer collaborator.
    pub fn request_call(&self, phone: &str) {
        self.dialer.open_dialer(phone);
    }

    /// Drop the selection if `catalog` no longer contains it.
    pub fn retain_catalog(&mut self, catalog: &Catalog) {
        if let Some(id) = &self.selected_id {
            if !catalog.contains(id) {
                tracing::debug!(id = %id, "Selected point left the catalog");
                self.selected_id = None;
            }
        }
    }

    /// The selected point, looked up in `catalog`.
    pub fn selected_point<'a>(&self, catalog: &'a Catalog) -> Option<&'a PointOfInterest> {
        self.selected_id.as_deref().and_then(|id| catalog.get(id))
    }

    /// Apply one map event.
    pub fn handle_event(&mut self, event: MapEvent, catalog: &Catalog) {
        match event {
            MapEvent::MarkerClicked { id } => {
                if catalog.contains(&id) {
                    self.select_marker(id);
                } else {
                    tracing::debug!(id = %id, "Click on point outside the catalog ignored");
                }
            }
            MapEvent::Dismissed => self.clear_selection(),
            MapEvent::DirectionsRequested { id } => match catalog.get(&id) {
                Some(point) => self.request_directions(&point.address),
                None => tracing::debug!(id = %id, "Directions for unknown point ignored"),
            },
            MapEvent::CallRequested { id } => {
                match catalog.get(&id).and_then(|p| p.phone.as_deref()) {
                    Some(phone) => self.request_call(phone),
                    None => tracing::debug!(id = %id, "No phone number, call ignored"),
                }
            }
        }
    }

    /// Apply events until every sender is gone.
    pub async fn run(&mut self, events: &mut MapEventReceiver, catalog: &Catalog) {
        while let Some(event) = events.recv().await {
            self.handle_event(event, catalog);
        }
    }
}
