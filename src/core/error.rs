//! Error types for the imgfetch library
//!
//! Every failure of a single fetch ends up as one of these variants. Skips
//! (wrong content type, declared size over the limit) are not errors; they
//! are reported through [`crate::FetchOutcome`].

use std::fmt;

/// Main error type for imgfetch operations
#[derive(Debug)]
pub enum Error {
    /// URL could not be parsed or uses an unsupported scheme
    InvalidUrl(String),

    /// Server answered with a non-success status
    HttpStatus(reqwest::StatusCode),

    /// HTTP-specific error (body decoding, protocol errors)
    HttpError(String),

    /// Connection failures and timeouts
    NetworkError(String),

    /// Body turned out larger than the allowed maximum after download
    SizeLimitExceeded { actual: u64, max_size: u64 },

    /// File I/O error
    IoError(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidUrl(msg) => {
                write!(f, "Invalid URL: {}", msg)
            }
            Error::HttpStatus(status) => {
                write!(f, "HTTP status {}", status)
            }
            Error::HttpError(msg) => {
                write!(f, "HTTP error: {}", msg)
            }
            Error::NetworkError(msg) => {
                write!(f, "Network error: {}", msg)
            }
            Error::SizeLimitExceeded { actual, max_size } => {
                write!(
                    f,
                    "Downloaded file too large: {} exceeds limit of {}",
                    format_megabytes(*actual),
                    format_megabytes(*max_size)
                )
            }
            Error::IoError(err) => {
                write!(f, "I/O error: {}", err)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            Error::NetworkError(err.to_string())
        } else if let Some(status) = err.status() {
            Error::HttpStatus(status)
        } else {
            Error::HttpError(err.to_string())
        }
    }
}

impl Error {
    /// Maps a failed body read, keeping the whole cause chain in the message
    pub fn body_read(err: std::io::Error) -> Self {
        let chain = error_chain(&err);
        if err.kind() == std::io::ErrorKind::TimedOut {
            Error::NetworkError(format!("Timed out reading response body ({chain})"))
        } else {
            Error::NetworkError(format!("Stream read error: {chain}"))
        }
    }
}

/// Formats an error followed by its sources ("outer: inner: root")
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        let text = inner.to_string();
        if !message.ends_with(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = inner.source();
    }
    message
}

/// Render a byte count as megabytes with two decimals ("1.50 MB")
pub fn format_megabytes(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / 1024.0 / 1024.0)
}

/// Convenience result type for imgfetch operations
pub type Result<T> = std::result::Result<T, Error>;
