//! Distance-annotated, filtered and sorted views of a catalog.
//!
//! [`compute`] combines a [`Catalog`] with the current fix:
//!
//! 1. keep points whose category passes the filter (all points if none)
//! 2. annotate each with its distance from the origin, or `None`
//! 3. stable-sort ascending; entries without a distance keep catalog order
//!    and come after every entry that has one
//!
//! Everything here is pure and reentrant. [`ProximityQuery`] layers radius,
//! limit and safe-zone restrictions on top, and [`MemoizedProximity`] avoids
//! recomputing while the inputs are unchanged.

mod memo;
mod query;

pub use memo::MemoizedProximity;
pub use query::{nearest_safe_zones, ProximityQuery};

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::Serialize;

use crate::catalog::{Catalog, Category, PointOfInterest};
use crate::geo::{distance_km, format_distance, GeoPosition};

/// A point with its distance from the origin.
///
/// `distance_km` is `None` when no origin fix was available, or when the
/// point's own coordinates are invalid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProximityEntry {
    pub point: PointOfInterest,
    pub distance_km: Option<f64>,
}

impl ProximityEntry {
    /// Human-readable distance, e.g. `"2.2 km away"`.
    pub fn distance_label(&self) -> Option<String> {
        self.distance_km.map(format_distance)
    }

    pub fn id(&self) -> &str {
        &self.point.id
    }
}

/// Set of categories to keep.
///
/// An empty filter keeps nothing; pass no filter at all to keep every point.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryFilter {
    categories: HashSet<Category>,
}

impl CategoryFilter {
    pub fn new(categories: impl IntoIterator<Item = Category>) -> Self {
        Self {
            categories: categories.into_iter().collect(),
        }
    }

    pub fn single(category: Category) -> Self {
        Self::new([category])
    }

    /// Police stations, hospitals, shelters and community centers.
    pub fn safe_zones() -> Self {
        Self::new(Category::SAFE_ZONES)
    }

    pub fn insert(&mut self, category: Category) {
        self.categories.insert(category);
    }

    pub fn contains(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }

    pub fn matches(&self, point: &PointOfInterest) -> bool {
        self.contains(point.category)
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl FromIterator<Category> for CategoryFilter {
    fn from_iter<T: IntoIterator<Item = Category>>(iter: T) -> Self {
        Self::new(iter)
    }
}

/// Filter, annotate and sort `catalog` relative to `origin`.
///
/// Returns a fresh list; the catalog is not modified. A point with invalid
/// coordinates gets no distance and is logged, the rest are still computed.
pub fn compute(
    catalog: &Catalog,
    origin: Option<&GeoPosition>,
    filter: Option<&CategoryFilter>,
) -> Vec<ProximityEntry> {
    let mut entries: Vec<ProximityEntry> = catalog
        .iter()
        .filter(|point| filter.map_or(true, |f| f.matches(point)))
        .map(|point| ProximityEntry {
            point: point.clone(),
            distance_km: origin.and_then(|origin| distance_to(origin, point)),
        })
        .collect();

    // sort_by is stable, so ties and missing distances keep catalog order
    entries.sort_by(compare_entries);

    tracing::trace!(
        catalog_len = catalog.len(),
        entries = entries.len(),
        has_origin = origin.is_some(),
        "Computed proximity"
    );
    entries
}

fn distance_to(origin: &GeoPosition, point: &PointOfInterest) -> Option<f64> {
    match distance_km(origin, point.coordinate()) {
        Ok(km) => Some(km),
        Err(e) => {
            tracing::warn!(id = %point.id, error = %e, "Point has invalid coordinates, distance skipped");
            None
        }
    }
}

fn compare_entries(a: &ProximityEntry, b: &ProximityEntry) -> Ordering {
    match (a.distance_km, b.distance_km) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
