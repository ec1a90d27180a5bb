use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::debug;
use crate::error::{ExtractError, Result};
use crate::search::MatchMode;

/// Looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "figma-extract.toml";

/// Contents of `figma-extract.toml`. Command-line flags override every key.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Exports to read, relative to the config file
    pub files: Vec<PathBuf>,
    pub node_id: Option<String>,
    pub pointer: Option<String>,
    /// `Some(vec![])` is an explicit empty target set
    pub targets: Option<Vec<String>>,
    pub match_mode: Option<MatchMode>,
    pub include_children: Option<bool>,
    pub compact: Option<bool>,
}

impl Config {
    /// Load `path`, or the default file when `path` is `None`.
    ///
    /// A missing default file yields an empty config; a missing explicit one is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p, true),
            None => (Path::new(DEFAULT_CONFIG_FILE), false),
        };
        if !required && !path.exists() {
            return Ok(Self::default());
        }

        let content =
            fs::read_to_string(path).map_err(|e| ExtractError::Io(path.to_path_buf(), e))?;
        let mut config: Self =
            toml::from_str(&content).map_err(|e| ExtractError::Config(path.to_path_buf(), e))?;

        if let Some(base) = path.parent() {
            config.files = config.files.into_iter().map(|f| base.join(f)).collect();
        }
        debug!("config"; "loaded {}", path.display());
        Ok(config)
    }
}
