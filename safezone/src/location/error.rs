//! Location acquisition errors.

use thiserror::Error;

/// Why the device could not produce a fix.
///
/// Errors are captured into provider state rather than returned to callers;
/// see [`super::ProviderState::Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum LocationError {
    /// The host environment has no location capability.
    #[error("Location services are not supported on this device")]
    Unsupported,

    /// The user refused access to their location.
    #[error("Location permission denied")]
    PermissionDenied,

    /// The device could not determine a position right now.
    #[error("Position unavailable")]
    PositionUnavailable,

    /// No fix arrived before the configured deadline.
    #[error("Timed out waiting for a position")]
    Timeout,
}

impl LocationError {
    /// Terminal errors end location use for the session.
    ///
    /// Callers degrade to the catalog without distances. Recoverable errors
    /// may clear on a later watch delivery or a forced refresh.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Unsupported | Self::PermissionDenied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_kinds() {
        assert!(LocationError::Unsupported.is_terminal());
        assert!(LocationError::PermissionDenied.is_terminal());
        assert!(!LocationError::PositionUnavailable.is_terminal());
        assert!(!LocationError::Timeout.is_terminal());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            LocationError::PermissionDenied.to_string(),
            "Location permission denied"
        );
    }
}
