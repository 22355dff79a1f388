//! User configuration in `~/.safezone/config.ini`.
//!
//! Settings structs live in [`settings`], INI parsing in `parser` and the
//! commented INI output in `writer`. A missing file yields defaults; an
//! invalid value is reported with its section and key.
//!
//! # Example
//!
//! ```
//! use safezone::config::ConfigFile;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let path = dir.path().join("config.ini");
//! std::fs::write(&path, "[sos]\ncountdown_secs = 3\n").unwrap();
//!
//! let config = ConfigFile::load_from(&path).unwrap();
//! assert_eq!(config.sos.countdown_secs, 3);
//! assert!(config.location.watch);
//! ```

mod file;
mod parser;
pub mod settings;
mod writer;

pub use file::{config_directory, config_file_path, ConfigFile, ConfigFileError};
pub use settings::{CatalogSettings, InputSettings, LocationSettings, MapSettings, SosSettings};
