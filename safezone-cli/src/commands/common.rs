//! Common types and utilities shared across CLI commands.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Args;
use console::style;
use safezone::catalog::Catalog;
use safezone::config::ConfigFile;
use safezone::geo::{Coordinate, GeoPosition};
use safezone::location::{Availability, GeolocationProvider, LocationStatus, SimulatedDevice};

use crate::error::CliError;

/// Where the simulated device says the user is.
///
/// Without coordinates the device reports location as unsupported and
/// commands fall back to catalog order.
#[derive(Debug, Clone, Args)]
pub struct PositionArgs {
    /// Current latitude in decimal degrees
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Current longitude in decimal degrees
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Reported accuracy of the position in meters
    #[arg(long, default_value = "10")]
    pub accuracy: f64,
}

impl PositionArgs {
    /// Build the location device for these arguments.
    pub fn device(&self) -> Result<Arc<SimulatedDevice>, CliError> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => {
                Coordinate::new(lat, lon)?;
                Ok(Arc::new(SimulatedDevice::fixed(lat, lon, self.accuracy)))
            }
            _ => Ok(Arc::new(SimulatedDevice::unsupported())),
        }
    }
}

/// Load the config file, falling back to defaults when it doesn't exist.
pub fn load_config(path: &Path) -> Result<ConfigFile, CliError> {
    Ok(ConfigFile::load_from(path)?)
}

/// Catalog from `--catalog`, then the config file, then the built-in sample.
pub fn load_catalog(cli_path: Option<&Path>, config: &ConfigFile) -> Result<Catalog, CliError> {
    let path: Option<PathBuf> = cli_path
        .map(Path::to_path_buf)
        .or_else(|| config.catalog.path.clone());

    let catalog = match path {
        Some(path) => Catalog::load(&path)?,
        None => Catalog::sample()?,
    };
    tracing::debug!(points = catalog.len(), "Catalog ready");
    Ok(catalog)
}

/// Current-thread runtime for the async parts of a command.
pub fn runtime() -> Result<tokio::runtime::Runtime, CliError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)
}

/// Start the provider with the configured options and report the outcome.
pub async fn acquire(device: Arc<SimulatedDevice>, config: &ConfigFile) -> GeolocationProvider {
    let provider = GeolocationProvider::new(device);
    provider.start(config.location.to_location_config()).await;
    print_status(&provider.status());
    provider
}

/// One line about location availability.
pub fn print_status(status: &LocationStatus) {
    match status.availability() {
        Availability::Available => {
            if let Some(fix) = &status.fix {
                println!("{}", style(format_fix(fix)).green());
            }
        }
        Availability::Acquiring => println!("{}", style("Still acquiring location...").dim()),
        Availability::Denied | Availability::Unsupported => println!(
            "{}",
            style("Location unavailable, showing catalog order without distances").yellow()
        ),
        Availability::Failed(kind) => {
            println!("{}", style(format!("Location failed: {kind}")).red());
            if let Some(fix) = &status.fix {
                println!("Using last known position: {}", format_fix(fix));
            }
        }
        Availability::Idle => {}
    }
}

pub fn format_fix(fix: &GeoPosition) -> String {
    format!(
        "Location: {:.5}, {:.5} (±{:.0} m)",
        fix.latitude(),
        fix.longitude(),
        fix.accuracy_meters()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use safezone::location::LocationDevice;

    #[test]
    fn test_device_without_position_is_unsupported() {
        let args = PositionArgs {
            lat: None,
            lon: None,
            accuracy: 10.0,
        };
        assert!(!args.device().unwrap().is_supported());
    }

    #[test]
    fn test_device_rejects_invalid_coordinate() {
        let args = PositionArgs {
            lat: Some(91.0),
            lon: Some(0.0),
            accuracy: 10.0,
        };
        assert!(matches!(args.device(), Err(CliError::InvalidCoordinate(_))));
    }

    #[test]
    fn test_catalog_falls_back_to_sample() {
        let catalog = load_catalog(None, &ConfigFile::default()).unwrap();
        assert!(catalog.contains("police-fort"));
    }

    #[test]
    fn test_catalog_from_cli_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("points.json");
        std::fs::write(
            &path,
            r#"[{"id": "x", "name": "X", "address": "Y", "category": "shelter", "latitude": 1.0, "longitude": 2.0}]"#,
        )
        .unwrap();

        let catalog = load_catalog(Some(&path), &ConfigFile::default()).unwrap();
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_format_fix() {
        let fix = GeoPosition::now(6.9271, 79.8612, 12.0).unwrap();
        assert_eq!(format_fix(&fix), "Location: 6.92710, 79.86120 (±12 m)");
    }
}
