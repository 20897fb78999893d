use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum RunnelError {
    #[error("Cache I/O error at {path}: {source}")]
    CacheIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cache at {path} is corrupt (run `runnel update` to rebuild it): {source}")]
    CacheDecode {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Unsupported cache version {found} at {path} (run `runnel update` to rebuild it)")]
    CacheVersion { path: PathBuf, found: u32 },

    #[error("Terminal error: {0}")]
    Terminal(#[source] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed parsing error: {0}")]
    FeedParse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Feed already subscribed: {0}")]
    DuplicateSource(String),

    #[error("Editor `{editor}` failed: {reason}")]
    Editor { editor: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Other(String),
}

impl RunnelError {
    /// Wrap an error reported by any terminal backend.
    pub fn terminal<E: std::fmt::Display>(source: E) -> Self {
        RunnelError::Terminal(std::io::Error::other(source.to_string()))
    }
}

pub type Result<T> = std::result::Result<T, RunnelError>;
