use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExtractError>;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("could not parse `{0}`")]
    Parse(PathBuf, #[source] serde_json::Error),

    #[error("document root not found: {0}")]
    RootNotFound(String),

    #[error("document root is not a well-formed node tree")]
    InvalidDocument(#[source] serde_json::Error),

    #[error("invalid target pattern `{pattern}`")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("config file `{0}` could not be parsed")]
    Config(PathBuf, #[source] toml::de::Error),

    #[error("clipboard unavailable")]
    Clipboard(#[from] arboard::Error),
}
