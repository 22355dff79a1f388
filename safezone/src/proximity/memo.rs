//! Memoized proximity computation.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::geo::GeoPosition;

use super::{compute, CategoryFilter, ProximityEntry};

/// Inputs the cached result was computed from.
#[derive(Debug)]
struct MemoKey {
    catalog: Catalog,
    origin: Option<GeoPosition>,
    filter: Option<CategoryFilter>,
}

impl MemoKey {
    fn matches(
        &self,
        catalog: &Catalog,
        origin: Option<&GeoPosition>,
        filter: Option<&CategoryFilter>,
    ) -> bool {
        self.catalog.same_as(catalog)
            && self.origin.as_ref() == origin
            && self.filter.as_ref() == filter
    }
}

/// Caches the last [`compute`] result.
///
/// The result is reused while the catalog is the same list (by identity), the
/// origin fix is the same position and timestamp, and the filter is equal.
/// Returned lists are shared, so an unchanged result keeps its identity and
/// downstream layout caches stay valid.
#[derive(Debug, Default)]
pub struct MemoizedProximity {
    cached: Option<(MemoKey, Arc<Vec<ProximityEntry>>)>,
}

impl MemoizedProximity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(
        &mut self,
        catalog: &Catalog,
        origin: Option<&GeoPosition>,
        filter: Option<&CategoryFilter>,
    ) -> Arc<Vec<ProximityEntry>> {
        if let Some((key, entries)) = &self.cached {
            if key.matches(catalog, origin, filter) {
                return Arc::clone(entries);
            }
        }

        let entries = Arc::new(compute(catalog, origin, filter));
        self.cached = Some((
            MemoKey {
                catalog: catalog.clone(),
                origin: origin.copied(),
                filter: filter.cloned(),
            },
            Arc::clone(&entries),
        ));
        entries
    }

    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}
