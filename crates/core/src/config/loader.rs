//! Tool configuration file loading

use super::schema::ConfigSchema;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Configuration wrapper
#[derive(Debug, Clone, Default)]
pub struct ToolConfig {
    /// Parsed schema, defaults when no file was found
    pub schema: ConfigSchema,
    /// Path the schema was loaded from, if any
    pub path: Option<PathBuf>,
}

impl ToolConfig {
    /// Load configuration from an explicit file, or search the project
    /// directory for one, or fall back to defaults
    pub fn load(project_dir: &Path, path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => find_config_file(project_dir),
        };

        let schema = if let Some(ref p) = config_path {
            load_config_file(p)?
        } else {
            ConfigSchema::default()
        };

        Ok(Self {
            schema,
            path: config_path,
        })
    }
}

/// Find a configuration file in the project directory
fn find_config_file(project_dir: &Path) -> Option<PathBuf> {
    let candidates = [".circle-build.toml", "circle-build.toml"];

    for candidate in candidates {
        let path = project_dir.join(candidate);
        if path.exists() {
            return Some(path);
        }
    }

    None
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &Path) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::config(format!(
            "Failed to read config file {}: {}",
            path.display(),
            e
        ))
    })?;

    toml::from_str(&content).map_err(|e| {
        Error::config(format!(
            "Failed to parse config file {}: {}",
            path.display(),
            e
        ))
    })
}
