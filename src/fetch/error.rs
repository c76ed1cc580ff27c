//! Error type for reading files and fetching URLs.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to obtain raw content from a file or URL.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid URL: {input}: {reason}")]
    InvalidUrl { input: String, reason: String },

    #[error("Unsupported URL scheme '{scheme}' in {url}. Only http and https are supported.")]
    UnsupportedScheme { scheme: String, url: String },

    #[error("Failed to create HTTP client: {source}")]
    Client { source: reqwest::Error },

    #[error("Network error: could not reach {url}: {source}")]
    Network { url: String, source: reqwest::Error },

    #[error("HTTP {status} when fetching: {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Failed to read response body: {source}")]
    BodyRead { source: reqwest::Error },
}
