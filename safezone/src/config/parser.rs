//! INI parsing: `Ini` → `ConfigFile`.
//!
//! The single place where INI key names are mapped to struct fields.

use std::path::PathBuf;
use std::str::FromStr;

use ini::{Ini, Properties};

use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [location] section
    if let Some(section) = ini.section(Some("location")) {
        if let Some(v) = get_bool(section, "location", "high_accuracy")? {
            config.location.high_accuracy = v;
        }
        if let Some(v) = get_positive(section, "location", "timeout_ms", "milliseconds")? {
            config.location.timeout_ms = v;
        }
        if let Some(v) = get_parsed::<u64>(
            section,
            "location",
            "maximum_age_ms",
            "must be a non-negative integer (milliseconds)",
        )? {
            config.location.maximum_age_ms = v;
        }
        if let Some(v) = get_bool(section, "location", "watch")? {
            config.location.watch = v;
        }
    }

    // [map] section
    if let Some(section) = ini.section(Some("map")) {
        if let Some(v) = get_parsed(section, "map", "renderer", "must be 'synthetic' or 'native'")? {
            config.map.renderer = v;
        }
    }

    // [input] section
    if let Some(section) = ini.section(Some("input")) {
        if let Some(v) = get_parsed(
            section,
            "input",
            "method",
            "must be one of: default, sinhala, tamil",
        )? {
            config.input.method = v;
        }
    }

    // [sos] section
    if let Some(section) = ini.section(Some("sos")) {
        if let Some(v) = get_parsed::<u64>(
            section,
            "sos",
            "countdown_secs",
            "must be a non-negative integer (seconds)",
        )? {
            config.sos.countdown_secs = v;
        }
        if let Some(v) = get_positive(section, "sos", "safe_zone_count", "count")? {
            config.sos.safe_zone_count = v as usize;
        }
    }

    // [catalog] section
    if let Some(section) = ini.section(Some("catalog")) {
        if let Some(v) = section.get("path") {
            let v = v.trim();
            if !v.is_empty() {
                config.catalog.path = Some(expand_tilde(v));
            }
        }
    }

    Ok(config)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Parse `key` with `FromStr`, skipping empty values.
fn get_parsed<T: FromStr>(
    section: &Properties,
    section_name: &str,
    key: &str,
    reason: &str,
) -> Result<Option<T>, ConfigFileError> {
    match section.get(key).map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => v
            .parse()
            .map(Some)
            .map_err(|_| invalid(section_name, key, v, reason)),
    }
}

fn get_positive(
    section: &Properties,
    section_name: &str,
    key: &str,
    unit: &str,
) -> Result<Option<u64>, ConfigFileError> {
    let reason = format!("must be a positive integer ({unit})");
    match get_parsed::<u64>(section, section_name, key, &reason)? {
        Some(0) => Err(invalid(section_name, key, "0", &reason)),
        other => Ok(other),
    }
}

fn get_bool(
    section: &Properties,
    section_name: &str,
    key: &str,
) -> Result<Option<bool>, ConfigFileError> {
    match section.get(key).map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => parse_bool(v)
            .map(Some)
            .ok_or_else(|| invalid(section_name, key, v, "must be true or false")),
    }
}

/// Accepts true/false, yes/no, on/off and 1/0 in any case.
pub(super) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
