//! Hand-off of directions and calls to the host environment.

use std::sync::Arc;

/// Opens turn-by-turn directions in an external application.
pub trait NavigationHandoff: Send + Sync {
    fn open_directions(&self, address: &str);
}

/// Starts a phone call in an external application.
pub trait DialerHandoff: Send + Sync {
    fn open_dialer(&self, phone: &str);
}

/// Opens a URI on the host (browser, dialer, or just printing it).
pub trait UriLauncher: Send + Sync {
    fn launch(&self, uri: &str) -> std::io::Result<()>;
}

const DIRECTIONS_BASE: &str = "https://www.google.com/maps/dir/?api=1&destination=";

/// Directions URI for a free-form address.
pub fn directions_uri(address: &str) -> String {
    format!("{DIRECTIONS_BASE}{}", percent_encode(address.trim()))
}

/// `tel:` URI for a phone number. Formatting characters are dropped.
pub fn dial_uri(phone: &str) -> String {
    let number: String = phone
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '+' | '*' | '#'))
        .collect();
    format!("tel:{number}")
}

/// Percent-encode everything except RFC 3986 unreserved characters.
pub fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// Turns hand-off requests into URIs for a [`UriLauncher`].
///
/// Launch failures are logged and otherwise ignored.
#[derive(Clone)]
pub struct UriHandoff {
    launcher: Arc<dyn UriLauncher>,
}

impl UriHandoff {
    pub fn new(launcher: Arc<dyn UriLauncher>) -> Self {
        Self { launcher }
    }

    fn launch(&self, uri: &str) {
        match self.launcher.launch(uri) {
            Ok(()) => tracing::debug!(uri, "Handed off to host"),
            Err(e) => tracing::warn!(uri, error = %e, "Host hand-off failed"),
        }
    }
}

impl std::fmt::Debug for UriHandoff {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UriHandoff").finish_non_exhaustive()
    }
}

impl NavigationHandoff for UriHandoff {
    fn open_directions(&self, address: &str) {
        if address.trim().is_empty() {
            tracing::debug!("No address, directions skipped");
            return;
        }
        self.launch(&directions_uri(address));
    }
}

impl DialerHandoff for UriHandoff {
    fn open_dialer(&self, phone: &str) {
        let uri = dial_uri(phone);
        if uri == "tel:" {
            tracing::debug!(phone, "No dialable digits, call skipped");
            return;
        }
        self.launch(&uri);
    }
}
