//! Point-of-interest record and category.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// Kind of place a point of interest represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    PoliceStation,
    Hospital,
    Shelter,
    CommunityCenter,
    /// A reported incident (hotspot), not a place to go to.
    Incident,
    /// The user's own position when it is plotted alongside the catalog.
    UserLocation,
}

impl Category {
    /// All categories, in display order.
    pub const ALL: [Category; 6] = [
        Category::PoliceStation,
        Category::Hospital,
        Category::Shelter,
        Category::CommunityCenter,
        Category::Incident,
        Category::UserLocation,
    ];

    /// Categories that count as safe zones when verified.
    pub const SAFE_ZONES: [Category; 4] = [
        Category::PoliceStation,
        Category::Hospital,
        Category::Shelter,
        Category::CommunityCenter,
    ];

    /// Machine name, as used in catalogs and configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::PoliceStation => "police_station",
            Category::Hospital => "hospital",
            Category::Shelter => "shelter",
            Category::CommunityCenter => "community_center",
            Category::Incident => "incident",
            Category::UserLocation => "user_location",
        }
    }

    /// User-facing label.
    pub fn label(&self) -> &'static str {
        match self {
            Category::PoliceStation => "Police Station",
            Category::Hospital => "Hospital",
            Category::Shelter => "Shelter",
            Category::CommunityCenter => "Community Center",
            Category::Incident => "Incident",
            Category::UserLocation => "You",
        }
    }

    /// Single-character glyph for text renderings.
    pub fn glyph(&self) -> char {
        match self {
            Category::PoliceStation => 'P',
            Category::Hospital => 'H',
            Category::Shelter => 'S',
            Category::CommunityCenter => 'C',
            Category::Incident => '!',
            Category::UserLocation => '@',
        }
    }

    pub fn is_safe_zone_category(&self) -> bool {
        Self::SAFE_ZONES.contains(self)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a category name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category '{0}' (expected one of: police_station, hospital, shelter, community_center, incident, user_location)")]
pub struct ParseCategoryError(pub String);

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "police_station" | "police" => Ok(Category::PoliceStation),
            "hospital" => Ok(Category::Hospital),
            "shelter" => Ok(Category::Shelter),
            "community_center" | "community_centre" => Ok(Category::CommunityCenter),
            "incident" => Ok(Category::Incident),
            "user_location" => Ok(Category::UserLocation),
            _ => Err(ParseCategoryError(s.to_string())),
        }
    }
}

/// A place the core can measure distance to.
///
/// Points come from static or caller-supplied catalogs and are never mutated
/// by the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    /// Unique id within its catalog.
    pub id: String,
    pub name: String,
    pub address: String,
    pub category: Category,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PointOfInterest {
    /// Create a point with the required fields only.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        address: impl Into<String>,
        category: Category,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            address: address.into(),
            category,
            latitude,
            longitude,
            phone: None,
            verified: None,
            rating: None,
            description: None,
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_verified(mut self, verified: bool) -> Self {
        self.verified = Some(verified);
        self
    }

    pub fn with_rating(mut self, rating: f32) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The point's position. Not validated; catalogs may hold bad data.
    pub fn coordinate(&self) -> Coordinate {
        Coordinate {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    /// A verified police station, hospital, shelter or community center.
    pub fn is_safe_zone(&self) -> bool {
        self.verified.unwrap_or(false) && self.category.is_safe_zone_category()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trip_names() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn test_category_aliases() {
        assert_eq!("Police".parse::<Category>().unwrap(), Category::PoliceStation);
        assert_eq!(
            "community-centre".parse::<Category>().unwrap(),
            Category::CommunityCenter
        );
        assert!("bakery".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_serde_snake_case() {
        let json = serde_json::to_string(&Category::CommunityCenter).unwrap();
        assert_eq!(json, "\"community_center\"");
    }

    #[test]
    fn test_safe_zone_requires_verification() {
        let hospital = PointOfInterest::new("h", "H", "", Category::Hospital, 0.0, 0.0);
        assert!(!hospital.is_safe_zone());
        assert!(hospital.clone().with_verified(true).is_safe_zone());
    }

    #[test]
    fn test_incident_is_never_safe_zone() {
        let incident =
            PointOfInterest::new("i", "I", "", Category::Incident, 0.0, 0.0).with_verified(true);
        assert!(!incident.is_safe_zone());
    }

    #[test]
    fn test_optional_fields_skipped_when_absent() {
        let point = PointOfInterest::new("s", "S", "Addr", Category::Shelter, 1.0, 2.0);
        let json = serde_json::to_string(&point).unwrap();
        assert!(!json.contains("phone"));
        assert!(!json.contains("rating"));
    }
}
