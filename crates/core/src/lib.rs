//! Build settings resolution for the circle_app Android project
//!
//! This crate models the Gradle settings of the circle_app Flutter Android
//! build and resolves them from a project checkout:
//!
//! - **Error handling**: Structured errors with codes, context, and recovery suggestions
//! - **Properties**: `local.properties` parsing (Java properties subset)
//! - **Repositories**: Prioritized plugin and dependency repository lists
//! - **Plugins**: Versioned plugin declarations with two-phase activation
//! - **Health checks**: Verify the Flutter SDK installation the settings point at
//! - **Rendering**: Regenerate a canonical `settings.gradle.kts`
//!
//! # Example
//!
//! ```rust,no_run
//! use circle_build_core::settings::SettingsResolver;
//! use std::path::Path;
//!
//! let settings = SettingsResolver::new(Path::new("."))
//!     .resolve()
//!     .expect("failed to resolve build settings");
//!
//! assert_eq!(settings.project.root_name, "circle_app");
//! for repo in settings.dependency_repositories.iter() {
//!     println!("{}", repo.locator());
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod health;
pub mod plugin;
pub mod project;
pub mod properties;
pub mod render;
pub mod repository;
pub mod settings;

pub use error::{Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::ToolConfig;
    pub use crate::error::{exit_codes, Error, ErrorCode, Result, ResultExt};
    pub use crate::health::{HealthReport, HealthStatus, SdkHealthChecker};
    pub use crate::plugin::{Activation, PluginDeclaration, PluginSet};
    pub use crate::project::ProjectLayout;
    pub use crate::properties::LocalProperties;
    pub use crate::repository::{Repository, RepositoryList};
    pub use crate::settings::{BuildSettings, ResolutionMode, SettingsResolver};
}
