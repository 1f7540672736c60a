//! Error types for fastiron.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Maximum number of characters of raw device output carried in an error.
const EXCERPT_LEN: usize = 80;

/// Main error type for fastiron operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Session/transport errors reported by the connection collaborator
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),

    /// Device output did not have the expected shape
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// A closed-set lookup received a value outside its set
    #[error("Unrecognized value: {0}")]
    UnrecognizedValue(#[from] UnrecognizedValueError),

    /// Candidate configuration could not be staged
    #[error("Config staging error: {0}")]
    Staging(#[from] StagingError),
}

/// Connection errors (session unreachable, closed mid-read).
#[derive(Error, Debug)]
pub enum ConnectionError {
    /// Cannot reach the switch. Raised by [`Session`](crate::driver::Session)
    /// implementations, usually through
    /// [`DriverOptions::unreachable`](crate::driver::DriverOptions::unreachable).
    #[error("Cannot connect to switch: {host}:{port}")]
    Unreachable { host: String, port: u16 },

    /// Session not open
    #[error("Session not connected")]
    NotConnected,

    /// The session dropped while reading a command's output
    #[error("Connection closed while running '{command}': {message}")]
    Closed { command: String, message: String },

    /// I/O error from the underlying session
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Errors raised when device output does not match the anchors an extractor expects.
#[derive(Error, Debug)]
pub enum ParseError {
    /// A required anchor word is missing from the output
    #[error("Anchor '{anchor}' not found in output: {excerpt:?}")]
    AnchorNotFound { anchor: String, excerpt: String },

    /// The token at the anchor's offset lies past the end of the output
    #[error("Token at offset {offset} from anchor '{anchor}' is out of range: {excerpt:?}")]
    TokenOutOfRange {
        anchor: String,
        offset: isize,
        excerpt: String,
    },

    /// A token that should be numeric is not
    #[error("Invalid number for {field}: '{token}'")]
    InvalidNumber { field: String, token: String },

    /// A row did not have the columns its report requires
    #[error("Malformed {report} row: {row:?}")]
    MalformedRow { report: String, row: String },
}

impl ParseError {
    /// Build an [`ParseError::AnchorNotFound`] carrying an excerpt of the output.
    pub fn anchor_not_found(anchor: &str, text: &str) -> Self {
        ParseError::AnchorNotFound {
            anchor: anchor.to_string(),
            excerpt: excerpt(text),
        }
    }

    /// Build an [`ParseError::InvalidNumber`].
    pub fn invalid_number(field: impl Into<String>, token: &str) -> Self {
        ParseError::InvalidNumber {
            field: field.into(),
            token: token.to_string(),
        }
    }
}

/// A value fell outside an enumerated mapping.
#[derive(Error, Debug)]
#[error("unexpected {kind} '{value}'")]
pub struct UnrecognizedValueError {
    /// What was being decoded (e.g. "interface speed").
    pub kind: &'static str,
    /// The raw token.
    pub value: String,
}

/// Errors raised while staging a candidate configuration.
#[derive(Error, Debug)]
pub enum StagingError {
    /// Neither a path nor inline text was supplied
    #[error("No filename or config was entered for {kind} candidate")]
    NoInput { kind: &'static str },

    /// The candidate file could not be read
    #[error("Cannot read candidate file '{}': {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type alias using fastiron's Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Truncate device output for inclusion in an error message.
pub(crate) fn excerpt(text: &str) -> String {
    let trimmed = text.trim();
    match trimmed.char_indices().nth(EXCERPT_LEN) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}
