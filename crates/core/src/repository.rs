//! Artifact repository model
//!
//! Repositories are consulted in declaration order when the build resolves a
//! plugin or dependency artifact, so `RepositoryList` is an ordered sequence:
//! SDK-local entries go first, public registries last.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Engine artifact cache variants shipped with the Flutter SDK, in the order
/// the settings file declares them
pub const ENGINE_VARIANTS: [&str; 3] = ["android-arm64-debug", "android-arm-debug", "android-x64-debug"];

/// SDK-relative path of the engine artifact caches
pub const ENGINE_CACHE_DIR: &str = "bin/cache/artifacts/engine";

/// SDK-relative path of the Flutter Gradle plugin source build
pub const FLUTTER_TOOLS_GRADLE_DIR: &str = "packages/flutter_tools/gradle";

/// A single artifact source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Repository {
    /// A Maven repository at a local path or remote URL
    Maven {
        /// Filesystem path or URL of the repository root
        url: String,
    },
    /// Google's Maven repository
    Google,
    /// Maven Central
    MavenCentral,
    /// The Gradle Plugin Portal
    GradlePluginPortal,
    /// A local Gradle build included as a plugin source
    IncludedBuild {
        /// Filesystem path of the included build
        path: String,
    },
}

impl Repository {
    /// The locator the build tool would query: a path for local entries, a
    /// well-known URL for public registries
    pub fn locator(&self) -> &str {
        match self {
            Repository::Maven { url } => url,
            Repository::Google => "https://dl.google.com/dl/android/maven2/",
            Repository::MavenCentral => "https://repo.maven.apache.org/maven2/",
            Repository::GradlePluginPortal => "https://plugins.gradle.org/m2/",
            Repository::IncludedBuild { path } => path,
        }
    }

    /// True for entries derived from the local SDK installation
    pub fn is_sdk_local(&self) -> bool {
        matches!(
            self,
            Repository::Maven { url } if !url.contains("://")
        ) || matches!(self, Repository::IncludedBuild { .. })
    }

    /// An engine artifact cache repository for one ABI/build-type variant
    pub fn engine_cache(sdk_path: &str, variant: &str) -> Self {
        Repository::Maven {
            url: format!("{}/{}/{}", sdk_path, ENGINE_CACHE_DIR, variant),
        }
    }

    /// The `flutter_tools` Gradle build shipped inside the SDK
    pub fn flutter_tools_build(sdk_path: &str) -> Self {
        Repository::IncludedBuild {
            path: format!("{}/{}", sdk_path, FLUTTER_TOOLS_GRADLE_DIR),
        }
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Repository::Maven { url } => write!(f, "maven({})", url),
            Repository::Google => write!(f, "google()"),
            Repository::MavenCentral => write!(f, "mavenCentral()"),
            Repository::GradlePluginPortal => write!(f, "gradlePluginPortal()"),
            Repository::IncludedBuild { path } => write!(f, "includeBuild({})", path),
        }
    }
}

/// An ordered repository list; earlier entries win resolution priority
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryList {
    repositories: Vec<Repository>,
}

impl RepositoryList {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a repository at the lowest priority so far
    pub fn push(&mut self, repository: Repository) {
        self.repositories.push(repository);
    }

    /// Repositories in priority order
    pub fn iter(&self) -> impl Iterator<Item = &Repository> {
        self.repositories.iter()
    }

    /// Highest-priority repository
    pub fn first(&self) -> Option<&Repository> {
        self.repositories.first()
    }

    /// Number of repositories
    pub fn len(&self) -> usize {
        self.repositories.len()
    }

    /// True when the list is empty
    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }

    /// The SDK-local entries, keeping priority order
    pub fn sdk_local(&self) -> Vec<&Repository> {
        self.repositories.iter().filter(|r| r.is_sdk_local()).collect()
    }
}

impl FromIterator<Repository> for RepositoryList {
    fn from_iter<T: IntoIterator<Item = Repository>>(iter: T) -> Self {
        Self {
            repositories: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_cache_locator() {
        let repo = Repository::engine_cache("/sdk", "android-arm64-debug");
        assert_eq!(
            repo.locator(),
            "/sdk/bin/cache/artifacts/engine/android-arm64-debug"
        );
        assert!(repo.is_sdk_local());
    }

    #[test]
    fn test_flutter_tools_build_locator() {
        let repo = Repository::flutter_tools_build("/opt/flutter");
        assert_eq!(repo.locator(), "/opt/flutter/packages/flutter_tools/gradle");
        assert!(repo.is_sdk_local());
    }

    #[test]
    fn test_public_repositories_are_not_sdk_local() {
        assert!(!Repository::Google.is_sdk_local());
        assert!(!Repository::MavenCentral.is_sdk_local());
        assert!(!Repository::GradlePluginPortal.is_sdk_local());
        let remote = Repository::Maven {
            url: "https://example.com/m2/".into(),
        };
        assert!(!remote.is_sdk_local());
    }

    #[test]
    fn test_list_preserves_order() {
        let list: RepositoryList = ENGINE_VARIANTS
            .iter()
            .map(|v| Repository::engine_cache("/sdk", v))
            .chain([Repository::Google, Repository::MavenCentral])
            .collect();

        assert_eq!(list.len(), 5);
        assert_eq!(
            list.first().unwrap().locator(),
            "/sdk/bin/cache/artifacts/engine/android-arm64-debug"
        );
        assert_eq!(list.sdk_local().len(), 3);
    }

    #[test]
    fn test_display_forms() {
        assert_eq!(Repository::Google.to_string(), "google()");
        assert_eq!(
            Repository::engine_cache("/sdk", "android-x64-debug").to_string(),
            "maven(/sdk/bin/cache/artifacts/engine/android-x64-debug)"
        );
    }
}
