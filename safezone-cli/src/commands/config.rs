//! `safezone config` - manage the configuration file.

use std::path::Path;

use clap::Subcommand;
use safezone::config::ConfigFile;

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Write a commented config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show the effective configuration
    Show,

    /// Show the configuration file path
    Path,
}

/// Run a config subcommand against the file at `path`.
pub fn run(command: ConfigCommands, path: &Path) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init { force } => run_init(path, force),
        ConfigCommands::Show => run_show(path),
        ConfigCommands::Path => {
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn run_init(path: &Path, force: bool) -> Result<(), CliError> {
    if force {
        ConfigFile::default().save_to(path)?;
        println!("Wrote default configuration to {}", path.display());
    } else if ConfigFile::ensure_exists_at(path)? {
        println!("Created {}", path.display());
    } else {
        println!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    Ok(())
}

fn run_show(path: &Path) -> Result<(), CliError> {
    let config = ConfigFile::load_from(path)?;
    if !path.exists() {
        println!("; {} not found, showing defaults", path.display());
    }
    print!("{}", render(&config));
    Ok(())
}

fn render(config: &ConfigFile) -> String {
    let catalog = config
        .catalog
        .path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(built-in sample)".to_string());

    format!(
        "[location]\n  high_accuracy = {}\n  timeout_ms = {}\n  maximum_age_ms = {}\n  watch = {}\n\
         [map]\n  renderer = {}\n\
         [input]\n  method = {}\n\
         [sos]\n  countdown_secs = {}\n  safe_zone_count = {}\n\
         [catalog]\n  path = {}\n",
        config.location.high_accuracy,
        config.location.timeout_ms,
        config.location.maximum_age_ms,
        config.location.watch,
        config.map.renderer,
        config.input.method,
        config.sos.countdown_secs,
        config.sos.safe_zone_count,
        catalog,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.ini");

        run(ConfigCommands::Init { force: false }, &path).unwrap();

        assert!(path.exists());
        assert_eq!(ConfigFile::load_from(&path).unwrap(), ConfigFile::default());
    }

    #[test]
    fn test_init_keeps_existing_without_force() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.ini");
        std::fs::write(&path, "[sos]\ncountdown_secs = 9\n").unwrap();

        run(ConfigCommands::Init { force: false }, &path).unwrap();
        assert_eq!(ConfigFile::load_from(&path).unwrap().sos.countdown_secs, 9);

        run(ConfigCommands::Init { force: true }, &path).unwrap();
        assert_eq!(ConfigFile::load_from(&path).unwrap().sos.countdown_secs, 5);
    }

    #[test]
    fn test_show_reports_invalid_value() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.ini");
        std::fs::write(&path, "[map]\nrenderer = globe\n").unwrap();

        let result = run(ConfigCommands::Show, &path);
        assert!(matches!(result, Err(CliError::ConfigFile(_))));
    }

    #[test]
    fn test_render_defaults() {
        let text = render(&ConfigFile::default());
        assert!(text.contains("renderer = synthetic"));
        assert!(text.contains("method = default"));
        assert!(text.contains("path = (built-in sample)"));
    }
}
