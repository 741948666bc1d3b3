//! Tool configuration schema definitions

use serde::{Deserialize, Serialize};

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    /// Settings resolution overrides
    #[serde(default)]
    pub settings: SettingsConfig,

    /// Flutter SDK overrides
    #[serde(default)]
    pub sdk: SdkConfig,
}

/// Settings resolution configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsConfig {
    /// Properties file name, relative to the project directory
    #[serde(default = "default_properties_file")]
    pub properties_file: String,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            properties_file: default_properties_file(),
        }
    }
}

fn default_properties_file() -> String {
    "local.properties".to_string()
}

/// Flutter SDK configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SdkConfig {
    /// Engine artifact variants appended after the default three, ahead of
    /// the public repositories
    #[serde(default)]
    pub extra_engine_variants: Vec<String>,
}
