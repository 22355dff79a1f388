//! `safezone sos` - countdown, then alert with the nearest safe zones.

use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use safezone::config::ConfigFile;
use safezone::sos::{SosCountdown, SosError};
use tokio_util::sync::CancellationToken;

use super::common::{acquire, load_catalog, load_config, runtime, PositionArgs};
use crate::error::CliError;
use crate::host::PrintDispatcher;

#[derive(Debug, Args)]
pub struct SosArgs {
    #[command(flatten)]
    pub position: PositionArgs,

    /// Seconds before the alert is sent (overrides the config file)
    #[arg(long)]
    pub countdown: Option<u64>,

    /// JSON catalog to use instead of the configured one
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}

fn countdown_for(args: &SosArgs, config: &ConfigFile) -> SosCountdown {
    match args.countdown {
        Some(seconds) => SosCountdown::new(seconds).with_safe_zone_count(config.sos.safe_zone_count),
        None => config.sos.countdown(),
    }
}

fn progress_bar(seconds: u64) -> ProgressBar {
    let bar = ProgressBar::new(seconds);
    bar.set_style(
        ProgressStyle::with_template("{msg:>24} [{bar:30.red/white}]")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar
}

pub fn run(args: SosArgs, config_path: &Path) -> Result<(), CliError> {
    let config = load_config(config_path)?;
    let catalog = load_catalog(args.catalog.as_deref(), &config)?;
    let device = args.position.device()?;
    let countdown = countdown_for(&args, &config);

    let token: CancellationToken = countdown.cancellation_token();
    ctrlc::set_handler(move || token.cancel())
        .map_err(|e| CliError::Config(format!("Failed to set signal handler: {}", e)))?;

    runtime()?.block_on(async {
        let provider = acquire(device, &config).await;

        println!(
            "{}",
            style(format!(
                "Sending SOS in {} seconds. Press Ctrl+C to cancel.",
                countdown.seconds()
            ))
            .bold()
        );
        let bar = progress_bar(countdown.seconds());
        let total = countdown.seconds();

        let result = countdown
            .run(&provider, &catalog, &PrintDispatcher, |remaining| {
                bar.set_position(total - remaining);
                if remaining == 0 {
                    bar.finish_with_message("Sending alert");
                } else {
                    bar.set_message(format!("Sending in {remaining}s"));
                }
            })
            .await;

        provider.stop();
        match result {
            Ok(_) => Ok(()),
            Err(SosError::Cancelled) => {
                bar.abandon_with_message("Cancelled");
                println!("{}", style("SOS cancelled, nothing was sent.").yellow());
                Ok(())
            }
        }
    })
}
