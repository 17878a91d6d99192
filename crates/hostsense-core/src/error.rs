//! Error types shared by every sensor source.

use thiserror::Error;

/// Result alias used throughout the sensor API.
pub type SensorResult<T> = Result<T, SensorError>;

/// Failures a sensor source can surface to its caller.
///
/// Missing usernames, empty domains and unrecognised OS versions are not
/// errors; they are handled by the session classification rules.
#[derive(Debug, Error)]
pub enum SensorError {
    /// The platform session-table call failed. Carries the OS error code.
    #[error("session enumeration failed: {0}")]
    Enumeration(#[source] std::io::Error),

    /// The host has no session-table implementation.
    #[error("session enumeration is not supported on {0}")]
    Unsupported(&'static str),

    /// A source could not perform its one-time setup.
    #[error("failed to start source `{source_name}`: {reason}")]
    Start {
        source_name: &'static str,
        reason: String,
    },
}

impl SensorError {
    /// Wrap the calling thread's last OS error as an enumeration failure.
    pub fn last_os_error() -> Self {
        Self::Enumeration(std::io::Error::last_os_error())
    }
}
