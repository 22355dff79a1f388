//! Settings structs, one per `[section]` of the INI file.

use std::path::PathBuf;

use crate::input::InputMethodKind;
use crate::location::{LocationConfig, DEFAULT_MAXIMUM_AGE_MS, DEFAULT_TIMEOUT_MS};
use crate::map::RendererKind;
use crate::sos::{SosCountdown, DEFAULT_COUNTDOWN_SECS, DEFAULT_SAFE_ZONE_COUNT};

/// Complete configuration loaded from config.ini.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    pub location: LocationSettings,
    pub map: MapSettings,
    pub input: InputSettings,
    pub sos: SosSettings,
    pub catalog: CatalogSettings,
}

/// `[location]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationSettings {
    pub high_accuracy: bool,
    pub timeout_ms: u64,
    pub maximum_age_ms: u64,
    /// Keep watching for position changes after the first fix.
    pub watch: bool,
}

impl Default for LocationSettings {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            maximum_age_ms: DEFAULT_MAXIMUM_AGE_MS,
            watch: true,
        }
    }
}

impl LocationSettings {
    pub fn to_location_config(&self) -> LocationConfig {
        LocationConfig {
            high_accuracy: self.high_accuracy,
            timeout_ms: self.timeout_ms,
            maximum_age_ms: self.maximum_age_ms,
            watch: self.watch,
        }
    }
}

/// `[map]`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapSettings {
    pub renderer: RendererKind,
}

/// `[input]`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputSettings {
    pub method: InputMethodKind,
}

/// `[sos]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SosSettings {
    pub countdown_secs: u64,
    /// How many nearby safe zones go into an alert.
    pub safe_zone_count: usize,
}

impl Default for SosSettings {
    fn default() -> Self {
        Self {
            countdown_secs: DEFAULT_COUNTDOWN_SECS,
            safe_zone_count: DEFAULT_SAFE_ZONE_COUNT,
        }
    }
}

impl SosSettings {
    pub fn countdown(&self) -> SosCountdown {
        SosCountdown::new(self.countdown_secs).with_safe_zone_count(self.safe_zone_count)
    }
}

/// `[catalog]`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogSettings {
    /// JSON catalog to load; the built-in sample is used when unset.
    pub path: Option<PathBuf>,
}
