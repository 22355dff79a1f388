//! SafeZone CLI - Command-line interface
//!
//! Nearby safe zones, incident proximity and an SOS countdown on top of the
//! SafeZone library. Location comes from `--lat/--lon`; without them every
//! command still works and shows catalog order.

mod commands;
mod error;
mod host;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use safezone::config::config_file_path;
use safezone::logging::{default_log_dir, default_log_file, init_logging};

use commands::config::ConfigCommands;
use commands::distance::DistanceArgs;
use commands::nearby::NearbyArgs;
use commands::sos::SosArgs;
use error::CliError;

#[derive(Parser)]
#[command(name = "safezone")]
#[command(version, about = "Find nearby safe zones and raise SOS alerts", long_about = None)]
struct Cli {
    /// Config file to use instead of ~/.safezone/config.ini
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show info-level log output on the terminal
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List points of interest sorted by distance
    Nearby(NearbyArgs),

    /// Great-circle distance between two coordinates
    Distance(DistanceArgs),

    /// Count down and send an SOS alert with the nearest safe zones
    Sos(SosArgs),

    /// Manage the config file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    let _logging_guard = match init_logging(
        std::path::Path::new(default_log_dir()),
        default_log_file(),
        !cli.verbose,
    ) {
        Ok(guard) => Some(guard),
        Err(e) => {
            let err = CliError::LoggingInit(e.to_string());
            eprintln!("Warning: {}", err);
            None
        }
    };

    let config_path = cli.config.unwrap_or_else(config_file_path);
    tracing::debug!(config = %config_path.display(), "Starting");

    let result = match cli.command {
        Commands::Nearby(args) => commands::nearby::run(args, &config_path),
        Commands::Distance(args) => commands::distance::run(args),
        Commands::Sos(args) => commands::sos::run(args, &config_path),
        Commands::Config { command } => commands::config::run(command, &config_path),
    };

    if let Err(e) = result {
        e.exit();
    }
}
