//! Forge configuration
//!
//! Defaults used when a construction is created without explicit settings,
//! loaded from a TOML file or taken from `ForgeConfig::default()`.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::{ForgeError, Result};
use crate::core::types::TechLevel;
use crate::gunsmith::WeaponRule;
use crate::robots::RobotRule;

/// Highest tech level any rule table knows about
pub const MAX_TECH_LEVEL: TechLevel = 20;

/// Configuration for new constructions and the command line front end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForgeConfig {
    /// Tech level given to constructions that don't specify one
    pub default_tech_level: TechLevel,

    /// `tracing` filter used when `RUST_LOG` isn't set
    pub log_filter: String,

    /// Rule flags enabled on every new weapon
    pub weapon_rules: Vec<WeaponRule>,

    /// Rule flags enabled on every new robot
    pub robot_rules: Vec<RobotRule>,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            default_tech_level: 12,
            log_filter: "traveller_forge=info".to_string(),
            weapon_rules: Vec::new(),
            robot_rules: Vec::new(),
        }
    }
}

impl ForgeConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and validate a config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    /// Parse and validate a config from a TOML string
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: ForgeConfig = toml::from_str(content)?;
        config.validate().map_err(ForgeError::Config)?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.default_tech_level > MAX_TECH_LEVEL {
            return Err(format!(
                "default_tech_level ({}) is above the maximum of {}",
                self.default_tech_level, MAX_TECH_LEVEL
            ));
        }

        if self.log_filter.trim().is_empty() {
            return Err("log_filter must not be empty".into());
        }

        Ok(())
    }
}

// === GLOBAL CONFIG ACCESS ===

use std::sync::OnceLock;

static CONFIG: OnceLock<ForgeConfig> = OnceLock::new();

/// Get the global forge config (initializes with defaults if not set)
pub fn config() -> &'static ForgeConfig {
    CONFIG.get_or_init(ForgeConfig::default)
}

/// Set the global forge config (can only be called once)
///
/// Returns Err if config was already set.
pub fn set_config(config: ForgeConfig) -> std::result::Result<(), ForgeConfig> {
    CONFIG.set(config)
}
