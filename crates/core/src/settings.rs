//! Build settings resolution
//!
//! One resolution pass reads `local.properties`, locates the Flutter SDK,
//! and produces an immutable [`BuildSettings`] value: prioritized plugin and
//! dependency repository lists, the pinned plugin declarations, the global
//! resolution mode, and the project layout. The pass is single-threaded and
//! runs once per invocation; identical input yields an identical value.

use crate::config::ToolConfig;
use crate::error::{Result, ResultExt};
use crate::plugin::{Activation, PluginDeclaration, PluginSet};
use crate::project::ProjectLayout;
use crate::properties::LocalProperties;
use crate::repository::{Repository, RepositoryList, ENGINE_VARIANTS};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// The properties key locating the Flutter SDK
pub const FLUTTER_SDK_KEY: &str = "flutter.sdk";

/// Where dependency lookups may occur, relative to repositories a subproject
/// declares on its own
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionMode {
    /// Settings-declared repositories win over subproject-declared ones
    #[default]
    PreferSettings,
    /// Subproject-declared repositories win
    PreferProject,
    /// Subproject-declared repositories abort the build
    FailOnProjectRepos,
}

impl fmt::Display for ResolutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionMode::PreferSettings => write!(f, "PREFER_SETTINGS"),
            ResolutionMode::PreferProject => write!(f, "PREFER_PROJECT"),
            ResolutionMode::FailOnProjectRepos => write!(f, "FAIL_ON_PROJECT_REPOS"),
        }
    }
}

/// The resolved, immutable configuration of one build session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSettings {
    /// Resolved Flutter SDK path, tilde-expanded
    pub sdk_path: String,
    /// Repositories consulted when resolving build plugins, in priority order
    pub plugin_repositories: RepositoryList,
    /// Repositories consulted when resolving dependencies, in priority order
    pub dependency_repositories: RepositoryList,
    /// Declared plugins with activation state
    pub plugins: PluginSet,
    /// Global dependency resolution policy
    pub resolution_mode: ResolutionMode,
    /// Root project name and included modules
    pub project: ProjectLayout,
}

impl BuildSettings {
    /// The four plugin declarations the circle_app settings pin
    pub fn default_plugins() -> Result<PluginSet> {
        let mut plugins = PluginSet::new();
        plugins.declare(PluginDeclaration::new(
            "dev.flutter.flutter-plugin-loader",
            "1.0.0",
            Activation::Apply,
        )?)?;
        plugins.declare(PluginDeclaration::new(
            "com.android.application",
            "8.7.0",
            Activation::Deferred,
        )?)?;
        plugins.declare(PluginDeclaration::new(
            "com.google.gms.google-services",
            "4.3.15",
            Activation::Deferred,
        )?)?;
        plugins.declare(PluginDeclaration::new(
            "org.jetbrains.kotlin.android",
            "1.8.22",
            Activation::Deferred,
        )?)?;
        Ok(plugins)
    }

    /// Every SDK-relative repository entry across both lists, in priority order
    pub fn sdk_repositories(&self) -> Vec<&Repository> {
        let mut repos = self.plugin_repositories.sdk_local();
        repos.extend(self.dependency_repositories.sdk_local());
        repos
    }
}

/// Resolves [`BuildSettings`] from a project checkout
#[derive(Debug, Clone)]
pub struct SettingsResolver {
    project_dir: PathBuf,
    config: ToolConfig,
}

impl SettingsResolver {
    /// Create a resolver for a project directory with default tool config
    pub fn new(project_dir: &Path) -> Self {
        Self {
            project_dir: project_dir.to_path_buf(),
            config: ToolConfig::default(),
        }
    }

    /// Use an explicit tool configuration
    #[must_use]
    pub fn with_config(mut self, config: ToolConfig) -> Self {
        self.config = config;
        self
    }

    /// Path of the properties file this resolver reads
    pub fn properties_path(&self) -> PathBuf {
        self.project_dir
            .join(&self.config.schema.settings.properties_file)
    }

    /// Run the resolution pass
    pub fn resolve(&self) -> Result<BuildSettings> {
        let properties_file = &self.config.schema.settings.properties_file;
        let properties_path = self.properties_path();

        tracing::debug!(path = %properties_path.display(), "loading properties");
        let properties = LocalProperties::load(&properties_path)?;

        let sdk_path = properties.require(FLUTTER_SDK_KEY, properties_file)?;
        let sdk_path = shellexpand::tilde(sdk_path).into_owned();
        tracing::debug!(sdk = %sdk_path, "resolved Flutter SDK");

        let plugin_repositories: RepositoryList = [
            Repository::flutter_tools_build(&sdk_path),
            Repository::Google,
            Repository::MavenCentral,
            Repository::GradlePluginPortal,
        ]
        .into_iter()
        .collect();

        let variants = ENGINE_VARIANTS
            .iter()
            .map(|v| (*v).to_string())
            .chain(self.config.schema.sdk.extra_engine_variants.iter().cloned());
        let dependency_repositories: RepositoryList = variants
            .map(|v| Repository::engine_cache(&sdk_path, &v))
            .chain([Repository::Google, Repository::MavenCentral])
            .collect();

        let plugins =
            BuildSettings::default_plugins().context("Constructing plugin declarations")?;

        Ok(BuildSettings {
            sdk_path,
            plugin_repositories,
            dependency_repositories,
            plugins,
            resolution_mode: ResolutionMode::PreferSettings,
            project: ProjectLayout::circle_app(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn project_with_properties(content: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("local.properties"), content).unwrap();
        dir
    }

    #[test]
    fn test_resolve_derives_sdk_repositories_from_path() {
        let dir = project_with_properties("flutter.sdk=/sdk\n");
        let settings = SettingsResolver::new(dir.path()).resolve().unwrap();

        let sdk_repos = settings.sdk_repositories();
        assert_eq!(sdk_repos.len(), 4);
        for repo in &sdk_repos {
            assert!(repo.locator().starts_with("/sdk/"), "{}", repo.locator());
        }
    }

    #[test]
    fn test_resolve_dependency_priority_order() {
        let dir = project_with_properties("flutter.sdk=/sdk\n");
        let settings = SettingsResolver::new(dir.path()).resolve().unwrap();

        let locators: Vec<&str> = settings
            .dependency_repositories
            .iter()
            .map(Repository::locator)
            .collect();
        assert_eq!(
            locators,
            [
                "/sdk/bin/cache/artifacts/engine/android-arm64-debug",
                "/sdk/bin/cache/artifacts/engine/android-arm-debug",
                "/sdk/bin/cache/artifacts/engine/android-x64-debug",
                "https://dl.google.com/dl/android/maven2/",
                "https://repo.maven.apache.org/maven2/",
            ]
        );
    }

    #[test]
    fn test_resolve_plugin_repositories() {
        let dir = project_with_properties("flutter.sdk=/opt/flutter\n");
        let settings = SettingsResolver::new(dir.path()).resolve().unwrap();

        assert_eq!(
            settings.plugin_repositories.first().unwrap().locator(),
            "/opt/flutter/packages/flutter_tools/gradle"
        );
        assert_eq!(settings.plugin_repositories.len(), 4);
    }

    #[test]
    fn test_resolve_missing_key_exact_message() {
        let dir = project_with_properties("sdk.dir=/opt/android\n");
        let err = SettingsResolver::new(dir.path()).resolve().unwrap_err();
        assert_eq!(err.message, "flutter.sdk not set in local.properties");
        assert_eq!(err.code, ErrorCode::MissingProperty);
    }

    #[test]
    fn test_resolve_absent_file_fails_at_open() {
        let dir = tempfile::tempdir().unwrap();
        let err = SettingsResolver::new(dir.path()).resolve().unwrap_err();
        assert_eq!(err.code, ErrorCode::FileNotFound);
    }

    #[test]
    fn test_resolve_project_layout() {
        let dir = project_with_properties("flutter.sdk=/opt/flutter\n");
        let settings = SettingsResolver::new(dir.path()).resolve().unwrap();
        assert_eq!(settings.project.root_name, "circle_app");
        assert_eq!(settings.project.module_names(), ["app"]);
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let dir = project_with_properties("flutter.sdk=/sdk\n");
        let resolver = SettingsResolver::new(dir.path());
        let first = resolver.resolve().unwrap();
        let second = resolver.resolve().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.plugins.active().len(), second.plugins.active().len());
    }

    #[test]
    fn test_resolve_default_plugins() {
        let dir = project_with_properties("flutter.sdk=/sdk\n");
        let settings = SettingsResolver::new(dir.path()).resolve().unwrap();

        assert_eq!(settings.plugins.len(), 4);
        assert!(settings.plugins.is_active("dev.flutter.flutter-plugin-loader"));
        assert!(!settings.plugins.is_active("com.android.application"));
        assert!(!settings.plugins.is_active("com.google.gms.google-services"));
        assert!(!settings.plugins.is_active("org.jetbrains.kotlin.android"));
        assert_eq!(settings.resolution_mode, ResolutionMode::PreferSettings);
    }

    #[test]
    fn test_resolve_with_extra_engine_variants() {
        let dir = project_with_properties("flutter.sdk=/sdk\n");
        let mut config = ToolConfig::default();
        config
            .schema
            .sdk
            .extra_engine_variants
            .push("android-arm64-release".to_string());

        let settings = SettingsResolver::new(dir.path())
            .with_config(config)
            .resolve()
            .unwrap();

        let locators: Vec<&str> = settings
            .dependency_repositories
            .iter()
            .map(Repository::locator)
            .collect();
        // Extra variants slot in after the defaults, before the public repos
        assert_eq!(
            locators[3],
            "/sdk/bin/cache/artifacts/engine/android-arm64-release"
        );
        assert_eq!(locators[4], "https://dl.google.com/dl/android/maven2/");
    }

    #[test]
    fn test_resolve_with_configured_properties_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ci.properties"), "flutter.sdk=/ci/flutter\n").unwrap();

        let mut config = ToolConfig::default();
        config.schema.settings.properties_file = "ci.properties".to_string();

        let settings = SettingsResolver::new(dir.path())
            .with_config(config)
            .resolve()
            .unwrap();
        assert_eq!(settings.sdk_path, "/ci/flutter");
    }

    #[test]
    fn test_settings_serialize_to_json() {
        let dir = project_with_properties("flutter.sdk=/sdk\n");
        let settings = SettingsResolver::new(dir.path()).resolve().unwrap();
        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains("circle_app"));
        assert!(json.contains("prefer_settings"));
    }
}
