//! Configuration for vadacl
//!
//! Loads message tables and rule catalogs from JSON or TOML files and
//! reads the `VADACL_*` environment variables that drive startup.

pub mod env;
pub mod error;
pub mod loader;

pub use env::EnvLoader;
pub use error::{ConfigError, Result};
pub use loader::{ConfigLoader, FileFormat, load_typed};

use std::path::PathBuf;

/// Startup settings collected from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VadaclConfig {
    /// Locale message table to install process-wide (`VADACL_MESSAGES`).
    pub messages_path: Option<PathBuf>,
    /// Entity rule catalog (`VADACL_RULES`).
    pub rules_path: Option<PathBuf>,
    /// Default for showing errors only once a control was touched
    /// (`VADACL_ONLY_AFTER_TOUCHED`).
    pub only_after_touched: bool,
    /// Default for listing messages only for dirty controls
    /// (`VADACL_ONLY_WHEN_DIRTY`).
    pub only_when_dirty: bool,
}

impl Default for VadaclConfig {
    fn default() -> Self {
        Self {
            messages_path: None,
            rules_path: None,
            only_after_touched: true,
            only_when_dirty: true,
        }
    }
}

impl VadaclConfig {
    pub fn from_env() -> Self {
        Self::from_loader(&EnvLoader::vadacl())
    }

    pub fn from_loader(loader: &EnvLoader) -> Self {
        let defaults = Self::default();
        let path = |key: &str| {
            loader
                .load_var(key)
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from)
        };

        Self {
            messages_path: path("MESSAGES"),
            rules_path: path("RULES"),
            only_after_touched: loader.load_flag("ONLY_AFTER_TOUCHED", defaults.only_after_touched),
            only_when_dirty: loader.load_flag("ONLY_WHEN_DIRTY", defaults.only_when_dirty),
        }
    }
}

/// Load variables from a `.env` file into the process environment.
///
/// With no path the current directory is searched and a missing file is
/// not an error.
pub fn load_dotenv(path: Option<&str>) -> Result<()> {
    match path {
        Some(path) => {
            dotenvy::from_path(path).map_err(|e| ConfigError::LoadError(e.to_string()))?;
        }
        None => {
            if dotenvy::dotenv().is_err() {
                vadacl_log::trace!("No .env file found");
            }
        }
    }
    Ok(())
}
