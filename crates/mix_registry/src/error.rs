//! Error types for mixin installation.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors that can occur while resolving, fetching or pushing mixins.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Failed to fetch mixin catalog from {url}: {source}")]
    CatalogFetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid mixin catalog: {0}")]
    CatalogDecode(#[source] serde_json::Error),

    #[error("Could not find mixin with name {0}")]
    NotFound(String),

    #[error("Invalid URL {url}: {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Mixin entry file does not exist: {0}")]
    NotExist(PathBuf),

    #[error("Dependency fetch failed: {0}")]
    Fetch(String),

    #[error("Push failed with status {status}: {body}")]
    Push { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Mixer(#[from] mix_mixer::MixerError),
}
