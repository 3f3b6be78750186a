//! Error types for the outer surfaces (config, layout fixtures, selectors).
//!
//! Classification and geometry never fail; only loading inputs can.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading configuration or layout data.
#[derive(Error, Debug)]
pub enum ReadablyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config in {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid selector '{0}'")]
    Selector(String),
}

pub type Result<T> = std::result::Result<T, ReadablyError>;
