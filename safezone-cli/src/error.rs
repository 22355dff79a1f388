//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use safezone::catalog::CatalogError;
use safezone::config::ConfigFileError;
use safezone::geo::GeoError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Config file could not be read, parsed or written
    ConfigFile(ConfigFileError),
    /// Catalog could not be loaded
    Catalog(CatalogError),
    /// A coordinate given on the command line is out of range
    InvalidCoordinate(GeoError),
    /// Failed to start the async runtime
    Runtime(std::io::Error),
    /// `--select` named a point that is not in the list
    UnknownPoint(String),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::ConfigFile(ConfigFileError::InvalidValue { .. }) => {
                eprintln!();
                eprintln!("Fix the value in the config file, or restore defaults with:");
                eprintln!("  safezone config init --force");
            }
            CliError::Catalog(_) => {
                eprintln!();
                eprintln!("A catalog is a JSON array of points, for example:");
                eprintln!(
                    r#"  [{{"id": "h1", "name": "City Hospital", "address": "Main St", "category": "hospital", "latitude": 6.91, "longitude": 79.86}}]"#
                );
            }
            CliError::InvalidCoordinate(_) => {
                eprintln!();
                eprintln!("Latitude must be within [-90, 90] and longitude within [-180, 180].");
            }
            CliError::UnknownPoint(_) => {
                eprintln!();
                eprintln!("Use 'safezone nearby' without --select to list point ids.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ConfigFile(e) => write!(f, "{}", e),
            CliError::Catalog(e) => write!(f, "{}", e),
            CliError::InvalidCoordinate(e) => write!(f, "{}", e),
            CliError::Runtime(e) => write!(f, "Failed to start runtime: {}", e),
            CliError::UnknownPoint(id) => write!(f, "No point with id '{}' in the list", id),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ConfigFile(e) => Some(e),
            CliError::Catalog(e) => Some(e),
            CliError::InvalidCoordinate(e) => Some(e),
            CliError::Runtime(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<CatalogError> for CliError {
    fn from(e: CatalogError) -> Self {
        CliError::Catalog(e)
    }
}

impl From<GeoError> for CliError {
    fn from(e: GeoError) -> Self {
        CliError::InvalidCoordinate(e)
    }
}
