//! Health checks for the Flutter SDK installation the settings point at
//!
//! The resolver trusts whatever `flutter.sdk` says; the doctor verifies it:
//! - `local.properties` present and readable
//! - `flutter.sdk` set
//! - SDK directory and the `flutter_tools` Gradle build present
//! - Engine artifact caches present (missing caches are degraded, not fatal,
//!   since the Flutter tool rebuilds them on demand)

use crate::config::ToolConfig;
use crate::properties::LocalProperties;
use crate::repository::{ENGINE_CACHE_DIR, ENGINE_VARIANTS, FLUTTER_TOOLS_GRADLE_DIR};
use crate::settings::FLUTTER_SDK_KEY;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Health check status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// All checks passed
    Healthy,
    /// Some optional checks failed
    Degraded,
    /// Required checks failed
    Unhealthy,
}

impl HealthStatus {
    /// Returns true if status is healthy
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy)
    }

    /// Returns true if status is healthy or degraded (still buildable)
    #[must_use]
    pub fn is_operational(&self) -> bool {
        matches!(self, HealthStatus::Healthy | HealthStatus::Degraded)
    }
}

/// Individual health check result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    /// Name of the check
    pub name: String,
    /// Status of the check
    pub status: HealthStatus,
    /// Optional message with details
    pub message: Option<String>,
    /// Additional details as key-value pairs
    pub details: HashMap<String, String>,
}

impl CheckResult {
    /// Create a healthy check result
    pub fn healthy(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: HealthStatus::Healthy,
            message: None,
            details: HashMap::new(),
        }
    }

    /// Create an unhealthy check result with a message
    pub fn unhealthy(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: HealthStatus::Unhealthy,
            message: Some(message.into()),
            details: HashMap::new(),
        }
    }

    /// Create a degraded check result with a message
    pub fn degraded(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: HealthStatus::Degraded,
            message: Some(message.into()),
            details: HashMap::new(),
        }
    }

    /// Add a detail key-value pair
    #[must_use]
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

/// Aggregated report of all checks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    /// Overall status
    pub status: HealthStatus,
    /// Individual check results
    pub checks: Vec<CheckResult>,
    /// Total duration of the run in milliseconds
    pub duration_ms: u64,
}

impl HealthReport {
    /// True when every check passed
    pub fn is_healthy(&self) -> bool {
        self.status.is_healthy()
    }

    /// Checks that did not pass
    pub fn failures(&self) -> Vec<&CheckResult> {
        self.checks
            .iter()
            .filter(|c| !c.status.is_healthy())
            .collect()
    }
}

/// Runs health checks against a project checkout and its Flutter SDK
#[derive(Debug, Clone)]
pub struct SdkHealthChecker {
    project_dir: PathBuf,
    config: ToolConfig,
}

impl SdkHealthChecker {
    /// Create a checker for a project directory
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

    /// Run all checks
    pub fn run(&self) -> HealthReport {
        let started = Instant::now();
        let mut checks = Vec::new();

        let sdk_path = self.check_properties(&mut checks);
        if let Some(sdk_path) = sdk_path {
            self.check_sdk(&sdk_path, &mut checks);
        }

        let status = aggregate(&checks);
        HealthReport {
            status,
            checks,
            duration_ms: started.elapsed().as_millis() as u64,
        }
    }

    /// Properties file and SDK key checks; returns the SDK path when usable
    fn check_properties(&self, checks: &mut Vec<CheckResult>) -> Option<String> {
        let file = &self.config.schema.settings.properties_file;
        let path = self.project_dir.join(file);

        let properties = match LocalProperties::load(&path) {
            Ok(props) => {
                checks.push(
                    CheckResult::healthy(file.clone())
                        .with_detail("path", path.display().to_string()),
                );
                props
            }
            Err(e) => {
                checks.push(CheckResult::unhealthy(file.clone(), e.message));
                return None;
            }
        };

        match properties.require(FLUTTER_SDK_KEY, file) {
            Ok(sdk) => {
                let sdk = shellexpand::tilde(sdk).into_owned();
                checks.push(
                    CheckResult::healthy(FLUTTER_SDK_KEY).with_detail("path", sdk.clone()),
                );
                Some(sdk)
            }
            Err(e) => {
                checks.push(CheckResult::unhealthy(FLUTTER_SDK_KEY, e.message));
                None
            }
        }
    }

    /// SDK directory, flutter_tools build, and engine cache checks
    fn check_sdk(&self, sdk_path: &str, checks: &mut Vec<CheckResult>) {
        let sdk = Path::new(sdk_path);
        if !sdk.is_dir() {
            checks.push(CheckResult::unhealthy(
                "sdk directory",
                format!("Flutter SDK not found at {}", sdk_path),
            ));
            return;
        }
        checks.push(CheckResult::healthy("sdk directory"));

        let tools = sdk.join(FLUTTER_TOOLS_GRADLE_DIR);
        if tools.is_dir() {
            checks.push(CheckResult::healthy("flutter_tools gradle build"));
        } else {
            checks.push(CheckResult::unhealthy(
                "flutter_tools gradle build",
                format!("Missing {}", tools.display()),
            ));
        }

        let variants = ENGINE_VARIANTS
            .iter()
            .map(|v| (*v).to_string())
            .chain(self.config.schema.sdk.extra_engine_variants.iter().cloned());
        for variant in variants {
            let cache = sdk.join(ENGINE_CACHE_DIR).join(&variant);
            if cache.is_dir() {
                checks.push(CheckResult::healthy(format!("engine cache {}", variant)));
            } else {
                checks.push(CheckResult::degraded(
                    format!("engine cache {}", variant),
                    "Not downloaded yet; the Flutter tool fetches it on first build",
                ));
            }
        }
    }
}

fn aggregate(checks: &[CheckResult]) -> HealthStatus {
    if checks.iter().any(|c| c.status == HealthStatus::Unhealthy) {
        HealthStatus::Unhealthy
    } else if checks.iter().any(|c| c.status == HealthStatus::Degraded) {
        HealthStatus::Degraded
    } else {
        HealthStatus::Healthy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_sdk(root: &Path) -> PathBuf {
        let sdk = root.join("flutter");
        std::fs::create_dir_all(sdk.join(FLUTTER_TOOLS_GRADLE_DIR)).unwrap();
        for variant in ENGINE_VARIANTS {
            std::fs::create_dir_all(sdk.join(ENGINE_CACHE_DIR).join(variant)).unwrap();
        }
        sdk
    }

    fn project_pointing_at(sdk: &Path) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("local.properties"),
            format!("flutter.sdk={}\n", sdk.display()),
        )
        .unwrap();
        dir
    }

    #[test]
    fn test_healthy_installation() {
        let sdk_root = tempfile::tempdir().unwrap();
        let sdk = fake_sdk(sdk_root.path());
        let project = project_pointing_at(&sdk);

        let report = SdkHealthChecker::new(project.path()).run();
        assert!(report.is_healthy(), "failures: {:?}", report.failures());
        assert_eq!(report.checks.len(), 7);
    }

    #[test]
    fn test_missing_properties_is_unhealthy() {
        let dir = tempfile::tempdir().unwrap();
        let report = SdkHealthChecker::new(dir.path()).run();
        assert_eq!(report.status, HealthStatus::Unhealthy);
        assert_eq!(report.checks.len(), 1);
    }

    #[test]
    fn test_missing_sdk_key_is_unhealthy() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("local.properties"), "sdk.dir=/x\n").unwrap();
        let report = SdkHealthChecker::new(dir.path()).run();
        assert_eq!(report.status, HealthStatus::Unhealthy);
        let failure = &report.failures()[0];
        assert_eq!(failure.name, "flutter.sdk");
    }

    #[test]
    fn test_missing_engine_cache_is_degraded() {
        let sdk_root = tempfile::tempdir().unwrap();
        let sdk = fake_sdk(sdk_root.path());
        std::fs::remove_dir_all(sdk.join(ENGINE_CACHE_DIR).join("android-x64-debug")).unwrap();
        let project = project_pointing_at(&sdk);

        let report = SdkHealthChecker::new(project.path()).run();
        assert_eq!(report.status, HealthStatus::Degraded);
        assert!(report.status.is_operational());
    }

    #[test]
    fn test_nonexistent_sdk_dir_is_unhealthy() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("local.properties"),
            "flutter.sdk=/does/not/exist\n",
        )
        .unwrap();
        let report = SdkHealthChecker::new(dir.path()).run();
        assert_eq!(report.status, HealthStatus::Unhealthy);
    }

    #[test]
    fn test_report_serializes() {
        let dir = tempfile::tempdir().unwrap();
        let report = SdkHealthChecker::new(dir.path()).run();
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("unhealthy"));
    }
}
