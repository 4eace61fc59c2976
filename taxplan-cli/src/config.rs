//! `taxplan.toml` configuration.
//!
//! ```toml
//! log_level = "info"
//! log_file = "taxplan.log"
//! default_year = 2024
//!
//! [database]
//! backend = "sqlite"
//! connection_string = "taxplan.db"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use taxplan_core::{DbConfig, THAI_TAX_YEAR_2024};
use thiserror::Error;
use tracing::debug;

use crate::cli::GlobalArgs;

pub const DEFAULT_CONFIG_FILE: &str = "taxplan.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub database: DbConfig,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
    /// Tax year given to new plans when `--year` is omitted.
    pub default_year: i32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DbConfig::default(),
            log_level: "info".to_string(),
            log_file: None,
            default_year: THAI_TAX_YEAR_2024,
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(input)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `explicit` if given (it must exist), otherwise
    /// `taxplan.toml` from the working directory when present, otherwise
    /// the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            debug!(path = %path.display(), "loading config");
            return Self::load_from_file(path);
        }

        let fallback = Path::new(DEFAULT_CONFIG_FILE);
        if fallback.is_file() {
            debug!(path = DEFAULT_CONFIG_FILE, "loading config");
            return Self::load_from_file(fallback);
        }

        Ok(Self::default())
    }

    /// Applies command-line overrides on top of the file values.
    pub fn with_overrides(
        mut self,
        args: &GlobalArgs,
    ) -> Self {
        if let Some(backend) = &args.backend {
            self.database.backend = backend.clone();
        }
        if let Some(db) = &args.db {
            self.database.connection_string = db.clone();
        }
        if let Some(level) = &args.log_level {
            self.log_level = level.clone();
        }
        if let Some(file) = &args.log_file {
            self.log_file = Some(file.clone());
        }
        self
    }
}
