//! Terminal stand-ins for the host's external applications.

use console::style;
use safezone::interaction::UriLauncher;
use safezone::sos::{EmergencyDispatcher, SosAlert};

/// Prints URIs instead of opening them.
#[derive(Debug, Default)]
pub struct PrintLauncher;

impl UriLauncher for PrintLauncher {
    fn launch(&self, uri: &str) -> std::io::Result<()> {
        println!("  {} {}", style("open").cyan(), uri);
        Ok(())
    }
}

/// Prints the alert that would be sent to emergency contacts.
#[derive(Debug, Default)]
pub struct PrintDispatcher;

impl EmergencyDispatcher for PrintDispatcher {
    fn dispatch(&self, alert: &SosAlert) {
        println!("{}", style(alert.summary()).red().bold());
        match serde_json::to_string_pretty(alert) {
            Ok(json) => println!("{json}"),
            Err(e) => tracing::warn!(error = %e, "Could not serialize alert"),
        }
    }
}
