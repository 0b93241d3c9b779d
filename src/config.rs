//! Configuration.
//!
//! Looked up in `./postgrest-select.toml`, then
//! `<config dir>/postgrest-select/config.toml`. Missing files mean defaults.
//! `POSTGREST_SELECT_MAX_DEPTH` and `POSTGREST_SELECT_MAX_LENGTH` override
//! the file.
//!
//! ```toml
//! max_depth = 16
//! max_length = 8192
//! schema = "schema.json"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::parser::{ParserOptions, DEFAULT_MAX_DEPTH, DEFAULT_MAX_LENGTH};

/// File name looked up in the working directory.
pub const CONFIG_FILE: &str = "postgrest-select.toml";

const ENV_MAX_DEPTH: &str = "POSTGREST_SELECT_MAX_DEPTH";
const ENV_MAX_LENGTH: &str = "POSTGREST_SELECT_MAX_LENGTH";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum nesting of embedded resources.
    pub max_depth: usize,
    /// Maximum query length in bytes.
    pub max_length: usize,
    /// Default catalog file for projection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_length: DEFAULT_MAX_LENGTH,
            schema: None,
        }
    }
}

impl Config {
    /// Load from the first existing search path, then apply the environment.
    pub fn load() -> Result<Self> {
        let mut config = match Self::search_paths().into_iter().find(|p| p.exists()) {
            Some(path) => Self::load_from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env_from(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Candidate config files, most specific first.
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_FILE)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("postgrest-select").join("config.toml"));
        }
        paths
    }

    /// Apply overrides from a variable lookup (the process environment in
    /// [`load`](Self::load)).
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(ENV_MAX_DEPTH) {
            self.max_depth = parse_limit(ENV_MAX_DEPTH, &v)?;
        }
        if let Some(v) = lookup(ENV_MAX_LENGTH) {
            self.max_length = parse_limit(ENV_MAX_LENGTH, &v)?;
        }
        Ok(())
    }

    pub fn parser_options(&self) -> ParserOptions {
        ParserOptions {
            max_depth: self.max_depth,
            max_length: self.max_length,
        }
    }
}

fn parse_limit(key: &str, value: &str) -> Result<usize> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("{} must be a non-negative integer, got '{}'", key, value)))
}
