//! Error types for the Econet24 HTTP client

use thiserror::Error;

/// Errors that can occur when using the Econet24 HTTP client
#[derive(Error, Debug)]
pub enum EconetError {
    /// No authenticated session exists, or authentication did not produce one
    #[error("Login failed: no session cookie present")]
    LoginFailed,

    /// HTTP request failed (transport error or JSON decode error)
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Invalid HTTP status code received
    #[error("Invalid HTTP status: {status}")]
    InvalidStatus {
        /// The status code that was received
        status: reqwest::StatusCode,
    },

    /// Client initialization failed
    #[error("Client initialization failed: {0}")]
    ClientInit(String),
}
