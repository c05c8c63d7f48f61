//! Error types for the feed connection and message decoding.

use std::time::Duration;

use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Feed error type.
#[derive(Error, Debug)]
pub enum FeedError {
    /// The endpoint could not be parsed as a URL.
    #[error("Invalid endpoint '{endpoint}': {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    /// Only plain `ws://` endpoints are dialed.
    #[error("Unsupported endpoint scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Endpoint has no host: {0}")]
    MissingHost(String),

    /// The configured Origin header is not a valid header value.
    #[error("Invalid Origin header: {0}")]
    InvalidOrigin(String),

    /// The connection runtime could not be started.
    #[error("Failed to start connection runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[error("TCP connection failed: {0}")]
    Connect(#[source] std::io::Error),

    #[error("Handshake failed: {0}")]
    Handshake(#[from] tungstenite::Error),

    #[error("Connection timed out after {0:?}")]
    Timeout(Duration),

    /// A frame did not decode as a feed message.
    #[error("Malformed message: {0}")]
    MalformedMessage(#[from] serde_json::Error),
}

/// Result type alias for feed operations.
pub type Result<T> = std::result::Result<T, FeedError>;
