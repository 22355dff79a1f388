//! Point-of-interest catalogs.
//!
//! A [`Catalog`] is the externally supplied list of places the core measures
//! distances to: police stations, hospitals, shelters, community centers and
//! reported incidents. The core never fetches or mutates catalogs; it only
//! annotates copies of their points.
//!
//! Catalogs are cheap to clone and carry an identity, so callers can memoize
//! derived views (see [`crate::proximity::MemoizedProximity`]) and renderers
//! can skip recomputing layouts when the list has not changed.

mod point;

pub use point::{Category, ParseCategoryError, PointOfInterest};

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

const SAMPLE_CATALOG_JSON: &str = include_str!("../../data/sample_catalog.json");

/// Errors raised while building or loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Two points share the same id.
    #[error("Duplicate point id: {0}")]
    DuplicateId(String),

    /// A point has an empty id.
    #[error("Point '{name}' has an empty id")]
    EmptyId { name: String },

    /// The JSON document could not be parsed.
    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// The catalog file could not be read.
    #[error("Failed to read catalog {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
}

/// An immutable, shareable list of points of interest.
///
/// Cloning a catalog shares the underlying list; [`Catalog::same_as`] reports
/// whether two handles refer to the same list.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    points: Arc<Vec<PointOfInterest>>,
}

impl Catalog {
    /// Build a catalog, rejecting empty and duplicate ids.
    pub fn new(points: Vec<PointOfInterest>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(points.len());
        for point in &points {
            if point.id.is_empty() {
                return Err(CatalogError::EmptyId {
                    name: point.name.clone(),
                });
            }
            if !seen.insert(point.id.as_str()) {
                return Err(CatalogError::DuplicateId(point.id.clone()));
            }
        }

        Ok(Self {
            points: Arc::new(points),
        })
    }

    /// Parse a JSON array of points.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let points: Vec<PointOfInterest> = serde_json::from_str(json)?;
        Self::new(points)
    }

    /// Load a JSON catalog from disk.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_json_str(&json)?;
        tracing::debug!(path = %path.display(), points = catalog.len(), "Catalog loaded");
        Ok(catalog)
    }

    /// Built-in sample of places around Colombo.
    pub fn sample() -> Result<Self, CatalogError> {
        Self::from_json_str(SAMPLE_CATALOG_JSON)
    }

    /// The points in catalog order.
    pub fn points(&self) -> &[PointOfInterest] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PointOfInterest> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Look up a point by id.
    pub fn get(&self, id: &str) -> Option<&PointOfInterest> {
        self.points.iter().find(|p| p.id == id)
    }

    /// Whether a point with this id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// True when both handles share the same underlying list.
    pub fn same_as(&self, other: &Catalog) -> bool {
        Arc::ptr_eq(&self.points, &other.points)
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a PointOfInterest;
    type IntoIter = std::slice::Iter<'a, PointOfInterest>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
