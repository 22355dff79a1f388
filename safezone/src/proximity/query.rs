//! Query builder over [`compute`](super::compute).

use crate::catalog::{Catalog, Category};
use crate::geo::GeoPosition;

use super::{compute, CategoryFilter, ProximityEntry};

/// Restrictions applied on top of the sorted proximity view.
///
/// # Example
///
/// ```
/// use safezone::catalog::{Catalog, Category, PointOfInterest};
/// use safezone::geo::GeoPosition;
/// use safezone::proximity::ProximityQuery;
///
/// let catalog = Catalog::new(vec![
///     PointOfInterest::new("h1", "National Hospital", "Colombo 10", Category::Hospital, 6.9188, 79.8672),
///     PointOfInterest::new("h2", "Kandy Hospital", "Kandy", Category::Hospital, 7.2868, 80.6322),
/// ])
/// .unwrap();
/// let here = GeoPosition::now(6.9271, 79.8612, 10.0).unwrap();
///
/// let nearby = ProximityQuery::new()
///     .category(Category::Hospital)
///     .within_km(5.0)
///     .run(&catalog, Some(&here));
/// assert_eq!(nearby.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProximityQuery {
    filter: Option<CategoryFilter>,
    within_km: Option<f64>,
    limit: Option<usize>,
    safe_zones_only: bool,
}

impl ProximityQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a category to the filter. Without any category every point passes.
    pub fn category(mut self, category: Category) -> Self {
        self.filter
            .get_or_insert_with(CategoryFilter::default)
            .insert(category);
        self
    }

    pub fn categories(mut self, categories: impl IntoIterator<Item = Category>) -> Self {
        for category in categories {
            self = self.category(category);
        }
        self
    }

    /// Drop entries whose known distance exceeds `km`.
    ///
    /// Entries without a distance are kept so the degraded view still lists
    /// the catalog.
    pub fn within_km(mut self, km: f64) -> Self {
        self.within_km = Some(km);
        self
    }

    /// Keep at most `n` entries.
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// Keep only verified police stations, hospitals, shelters and community centers.
    pub fn safe_zones_only(mut self, yes: bool) -> Self {
        self.safe_zones_only = yes;
        self
    }

    pub fn filter(&self) -> Option<&CategoryFilter> {
        self.filter.as_ref()
    }

    pub fn run(&self, catalog: &Catalog, origin: Option<&GeoPosition>) -> Vec<ProximityEntry> {
        let entries = compute(catalog, origin, self.filter.as_ref());
        self.restrict(entries)
    }

    /// Apply radius, safe-zone and limit restrictions to an already sorted list.
    pub fn restrict(&self, entries: Vec<ProximityEntry>) -> Vec<ProximityEntry> {
        let iter = entries
            .into_iter()
            .filter(|e| !self.safe_zones_only || e.point.is_safe_zone())
            .filter(|e| match (self.within_km, e.distance_km) {
                (Some(radius), Some(km)) => km <= radius,
                _ => true,
            });

        match self.limit {
            Some(n) => iter.take(n).collect(),
            None => iter.collect(),
        }
    }
}

/// The `n` closest verified safe zones, used when assembling an SOS alert.
pub fn nearest_safe_zones(
    catalog: &Catalog,
    origin: Option<&GeoPosition>,
    n: usize,
) -> Vec<ProximityEntry> {
    ProximityQuery::new()
        .safe_zones_only(true)
        .limit(n)
        .run(catalog, origin)
}
