use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::units::UnitRegistry;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_speed_unit")]
    pub speed_unit: String,
    #[serde(default)]
    pub always_show_decimal_places: bool,
    #[serde(default = "default_start_graphs_at_zero")]
    pub start_graphs_at_zero: bool,
    #[serde(default)]
    pub unsmoothed_raw: bool,
}

fn default_speed_unit() -> String {
    "wpm".to_string()
}
fn default_start_graphs_at_zero() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            speed_unit: default_speed_unit(),
            always_show_decimal_places: false,
            start_graphs_at_zero: default_start_graphs_at_zero(),
            unsmoothed_raw: false,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("scorebook")
            .join("config.toml")
    }

    /// Validate `speed_unit` against the registry, resetting to default if
    /// unknown. Call after deserialization to handle stale keys from old
    /// configs.
    pub fn normalize_speed_unit(&mut self, registry: &UnitRegistry) {
        if registry.get(&self.speed_unit).is_err() {
            self.speed_unit = default_speed_unit();
        }
    }
}
