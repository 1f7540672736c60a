//! Builder for creating FastIron drivers.

use super::Session;
use super::switch::FastIronDriver;
use crate::error::ConnectionError;

/// Default SSH port.
const DEFAULT_PORT: u16 = 22;

/// Marker FastIron prints when it rejects a command.
const DEFAULT_INVALID_INPUT_MARKER: &str = "% Invalid";

/// Settings shared by every operation of a [`FastIronDriver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverOptions {
    /// Switch address, used in logs and connection errors.
    pub hostname: String,
    /// SSH port of the switch. The driver only reports it; the [`Session`]
    /// owns the connection.
    pub port: u16,
    /// Line separating blocks in configuration text.
    pub config_delimiter: String,
    /// Substring that marks a command as rejected by the switch.
    pub invalid_input_marker: String,
}

impl DriverOptions {
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            port: DEFAULT_PORT,
            config_delimiter: crate::config::DEFAULT_DELIMITER.to_string(),
            invalid_input_marker: DEFAULT_INVALID_INPUT_MARKER.to_string(),
        }
    }

    /// `hostname:port`, the prefix of every driver log line.
    pub fn target(&self) -> String {
        format!("{}:{}", self.hostname, self.port)
    }

    /// Error for a [`Session`] that cannot reach this switch.
    pub fn unreachable(&self) -> ConnectionError {
        ConnectionError::Unreachable {
            host: self.hostname.clone(),
            port: self.port,
        }
    }
}

/// Builder for constructing a [`FastIronDriver`].
///
/// The driver does not open connections itself; it is handed an already
/// established [`Session`].
///
/// # Example
///
/// ```rust,no_run
/// use fastiron::driver::{DriverBuilder, Session};
///
/// # async fn example(session: impl Session) -> Result<(), fastiron::Error> {
/// let mut driver = DriverBuilder::new("192.168.1.1")
///     .port(2222)
///     .build(session);
///
/// let facts = driver.get_facts().await?;
/// println!("{} runs {}", facts.hostname, facts.os_version);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DriverBuilder {
    options: DriverOptions,
}

impl DriverBuilder {
    /// Create a new driver builder for the specified switch.
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            options: DriverOptions::new(hostname),
        }
    }

    /// Set the SSH port (default: 22).
    pub fn port(mut self, port: u16) -> Self {
        self.options.port = port;
        self
    }

    /// Set the configuration block delimiter (default: `!`).
    pub fn config_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.options.config_delimiter = delimiter.into();
        self
    }

    /// Set the invalid-input marker (default: `% Invalid`).
    pub fn invalid_input_marker(mut self, marker: impl Into<String>) -> Self {
        self.options.invalid_input_marker = marker.into();
        self
    }

    /// The options collected so far.
    pub fn options(&self) -> &DriverOptions {
        &self.options
    }

    /// Build the driver around an open session.
    pub fn build<S: Session>(self, session: S) -> FastIronDriver<S> {
        FastIronDriver::new(self.options, session)
    }
}
