//! INI serialization: `ConfigFile` → commented INI string.

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let catalog_path = config
        .catalog
        .path
        .as_ref()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default();

    format!(
        r#"[location]
; Ask the device for its most accurate fix (GPS rather than network)
high_accuracy = {}
; Give up on a single position request after this many milliseconds
timeout_ms = {}
; Reuse a cached fix younger than this many milliseconds (default: 5 minutes)
maximum_age_ms = {}
; Keep following the device position after the first fix
watch = {}

[map]
; Map renderer:
;   synthetic - built-in ring layout, works offline (default)
;   native    - host mapping SDK, falls back to synthetic when unavailable
renderer = {}

[input]
; Keyboard for report text fields:
;   default - platform keyboard
;   sinhala - Sinhala keyboard plugin
;   tamil   - Tamil keyboard plugin
method = {}

[sos]
; Seconds to wait (and allow cancelling) before an alert is sent
countdown_secs = {}
; Number of nearby verified safe zones included in an alert
safe_zone_count = {}

[catalog]
; JSON file with points of interest. If empty, the built-in sample is used
; Example: path = ~/safezone/points.json
path = {}
"#,
        config.location.high_accuracy,
        config.location.timeout_ms,
        config.location.maximum_age_ms,
        config.location.watch,
        config.map.renderer,
        config.input.method,
        config.sos.countdown_secs,
        config.sos.safe_zone_count,
        catalog_path,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ini::Ini;

    #[test]
    fn test_output_is_valid_ini() {
        let content = to_config_string(&ConfigFile::default());
        let ini = Ini::load_from_str(&content).unwrap();

        for section in ["location", "map", "input", "sos", "catalog"] {
            assert!(ini.section(Some(section)).is_some(), "missing [{section}]");
        }
        assert_eq!(ini.get_from(Some("map"), "renderer"), Some("synthetic"));
        assert_eq!(ini.get_from(Some("location"), "watch"), Some("true"));
    }

    #[test]
    fn test_parses_back_to_same_config() {
        let config = ConfigFile::default();
        let ini = Ini::load_from_str(&to_config_string(&config)).unwrap();
        assert_eq!(super::super::parser::parse_ini(&ini).unwrap(), config);
    }
}
