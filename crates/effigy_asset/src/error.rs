//! Asset source errors

use thiserror::Error;

/// Errors from asset byte sources
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP request to {url} failed: {reason}")]
    Http { url: String, reason: String },

    #[error("Invalid data URL: {0}")]
    InvalidDataUrl(String),
}
