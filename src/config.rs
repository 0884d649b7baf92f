//! Configuration loaded from `orderflow.toml`.
//!
//! [`OrderflowConfig`] holds every tunable. Keys missing from the file fall
//! back to defaults. `ORDERFLOW_FIXTURES` takes precedence over the file for
//! the fixture path.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::state_machine::GuardPolicy;

pub const CONFIG_FILE: &str = "orderflow.toml";
pub const FIXTURES_ENV: &str = "ORDERFLOW_FIXTURES";

#[derive(Debug, Clone, Deserialize)]
pub struct OrderflowConfig {
    /// JSON file holding the order array.
    #[serde(default = "default_fixtures_path")]
    pub fixtures_path: PathBuf,

    /// Guard used to admit transitions.
    #[serde(default)]
    pub guard_policy: GuardPolicy,

    /// Write the fixture back after a mutating command.
    #[serde(default = "default_save_changes")]
    pub save_changes: bool,

    /// `tracing` filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_fixtures_path() -> PathBuf {
    PathBuf::from("data/orders.json")
}

fn default_save_changes() -> bool {
    true
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for OrderflowConfig {
    fn default() -> Self {
        Self {
            fixtures_path: default_fixtures_path(),
            guard_policy: GuardPolicy::default(),
            save_changes: default_save_changes(),
            log_filter: default_log_filter(),
        }
    }
}

impl OrderflowConfig {
    /// Loads `orderflow.toml` from the current directory, or defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    /// Loads the given file, or defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            toml::from_str::<OrderflowConfig>(&contents)
                .with_context(|| format!("parsing {}", path.display()))?
        } else {
            Self::default()
        };

        Ok(config.with_fixtures_override(std::env::var(FIXTURES_ENV).ok()))
    }

    fn with_fixtures_override(mut self, value: Option<String>) -> Self {
        if let Some(path) = value.filter(|p| !p.trim().is_empty()) {
            self.fixtures_path = PathBuf::from(path);
        }
        self
    }
}
