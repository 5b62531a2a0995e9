// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for the Mustekala session layer
//!
//! Fatal conditions (malformed caller input, rejected cookie lines,
//! JSON encode/decode failures) surface as `Err`. Transport-level
//! failures are not errors: they come back as an error-flagged
//! [`Response`](crate::Response) and must be checked via `is_error()`.

use thiserror::Error;

/// Result type alias for Mustekala operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the session layer
#[derive(Error, Debug)]
pub enum Error {
    /// A raw header string had no `:` separator
    #[error("Malformed header line '{0}': missing ':' separator")]
    Header(String),

    /// Cookie handling error (rejected wire line, jar I/O)
    #[error("Cookie error: {0}")]
    Cookie(String),

    /// HTTP engine error (client construction, body assembly)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON encode/decode error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a new header error
    pub fn header<S: Into<String>>(line: S) -> Self {
        Error::Header(line.into())
    }

    /// Create a new cookie error
    pub fn cookie<S: Into<String>>(msg: S) -> Self {
        Error::Cookie(msg.into())
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_error_message() {
        let err = Error::header("X-Broken");
        assert!(err.to_string().contains("missing ':' separator"));
    }

    #[test]
    fn test_string_conversion() {
        let err: Error = "something odd".into();
        assert_eq!(err.to_string(), "something odd");
    }
}
