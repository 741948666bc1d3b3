//! Project layout model

use serde::{Deserialize, Serialize};

/// The root project name and its included subproject modules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectLayout {
    /// Root project name
    pub root_name: String,
    /// Included module paths in `:module` form
    pub includes: Vec<String>,
}

impl ProjectLayout {
    /// The layout the circle_app settings file declares
    pub fn circle_app() -> Self {
        Self {
            root_name: "circle_app".to_string(),
            includes: vec![":app".to_string()],
        }
    }

    /// Module names with the leading `:` stripped
    pub fn module_names(&self) -> Vec<&str> {
        self.includes
            .iter()
            .map(|m| m.strip_prefix(':').unwrap_or(m))
            .collect()
    }
}
