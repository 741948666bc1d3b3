//! Plugin declarations with two-phase activation
//!
//! The settings file pins every Gradle plugin to an exact version, but only
//! the Flutter plugin loader activates during settings evaluation. The rest
//! are declared `apply false` and activated later by the subproject that
//! needs them. `PluginSet` models that protocol explicitly: declare first,
//! then flip individual declarations to active.

use crate::error::{Error, ErrorCode, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Plugin ids are reverse-domain dotted segments, e.g. `com.android.application`
static PLUGIN_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+(\.[A-Za-z0-9_-]+)+$").unwrap());

/// When a declared plugin becomes active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    /// Activate during settings evaluation
    Apply,
    /// Declared with a pinned version, activated later by an explicit opt-in
    Deferred,
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Activation::Apply => write!(f, "apply"),
            Activation::Deferred => write!(f, "deferred"),
        }
    }
}

/// A named, versioned build plugin with an activation mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginDeclaration {
    /// Reverse-domain plugin id
    pub id: String,
    /// Pinned version string
    pub version: String,
    /// Whether the plugin activates now or on later opt-in
    pub activation: Activation,
}

impl PluginDeclaration {
    /// Create a declaration, validating the id format
    pub fn new(id: impl Into<String>, version: impl Into<String>, activation: Activation) -> Result<Self> {
        let id = id.into();
        if !PLUGIN_ID_PATTERN.is_match(&id) {
            return Err(Error::new(
                ErrorCode::InvalidPluginId,
                format!("Invalid plugin id: {}", id),
            )
            .with_suggestion("Plugin ids are dotted reverse-domain names, e.g. com.android.application"));
        }
        Ok(Self {
            id,
            version: version.into(),
            activation,
        })
    }

    /// True when the plugin activates during settings evaluation
    pub fn applies_immediately(&self) -> bool {
        self.activation == Activation::Apply
    }
}

impl fmt::Display for PluginDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.id, self.version, self.activation)
    }
}

/// The ordered set of declared plugins for one build session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginSet {
    declarations: Vec<PluginDeclaration>,
    /// Ids flipped from deferred to active by a later opt-in
    activated: Vec<String>,
}

impl PluginSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a plugin. Redeclaring an id is a fatal error; declarations
    /// are immutable once the configuration pass has constructed them.
    pub fn declare(&mut self, declaration: PluginDeclaration) -> Result<()> {
        if self.find(&declaration.id).is_some() {
            return Err(Error::new(
                ErrorCode::DuplicatePlugin,
                format!("Plugin declared twice: {}", declaration.id),
            ));
        }
        self.declarations.push(declaration);
        Ok(())
    }

    /// Activate a deferred plugin by id. Activating an undeclared id is
    /// fatal; re-activating is a no-op.
    pub fn activate(&mut self, id: &str) -> Result<()> {
        let Some(declaration) = self.find(id) else {
            return Err(Error::unknown_plugin(id));
        };
        if declaration.applies_immediately() || self.activated.iter().any(|a| a == id) {
            return Ok(());
        }
        self.activated.push(id.to_string());
        Ok(())
    }

    /// Look up a declaration by id
    pub fn find(&self, id: &str) -> Option<&PluginDeclaration> {
        self.declarations.iter().find(|d| d.id == id)
    }

    /// True when the plugin is active in this session, either applied at
    /// settings evaluation or opted in later
    pub fn is_active(&self, id: &str) -> bool {
        match self.find(id) {
            Some(d) if d.applies_immediately() => true,
            Some(_) => self.activated.iter().any(|a| a == id),
            None => false,
        }
    }

    /// All declarations in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &PluginDeclaration> {
        self.declarations.iter()
    }

    /// Declarations currently active
    pub fn active(&self) -> Vec<&PluginDeclaration> {
        self.declarations
            .iter()
            .filter(|d| self.is_active(&d.id))
            .collect()
    }

    /// Declarations still awaiting opt-in
    pub fn deferred(&self) -> Vec<&PluginDeclaration> {
        self.declarations
            .iter()
            .filter(|d| !self.is_active(&d.id))
            .collect()
    }

    /// Number of declarations
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// True when nothing is declared
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loader() -> PluginDeclaration {
        PluginDeclaration::new("dev.flutter.flutter-plugin-loader", "1.0.0", Activation::Apply)
            .unwrap()
    }

    fn agp() -> PluginDeclaration {
        PluginDeclaration::new("com.android.application", "8.7.0", Activation::Deferred).unwrap()
    }

    #[test]
    fn test_valid_plugin_ids() {
        assert!(PluginDeclaration::new("com.android.application", "8.7.0", Activation::Apply).is_ok());
        assert!(PluginDeclaration::new("org.jetbrains.kotlin.android", "1.8.22", Activation::Apply).is_ok());
    }

    #[test]
    fn test_invalid_plugin_ids() {
        for id in ["", "noseg", ".leading", "trailing.", "has space.x", "a..b"] {
            let err = PluginDeclaration::new(id, "1.0.0", Activation::Apply).unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidPluginId, "id: {:?}", id);
        }
    }

    #[test]
    fn test_apply_is_immediately_active() {
        let mut set = PluginSet::new();
        set.declare(loader()).unwrap();
        assert!(set.is_active("dev.flutter.flutter-plugin-loader"));
    }

    #[test]
    fn test_deferred_requires_opt_in() {
        let mut set = PluginSet::new();
        set.declare(agp()).unwrap();
        assert!(!set.is_active("com.android.application"));
        assert_eq!(set.deferred().len(), 1);

        set.activate("com.android.application").unwrap();
        assert!(set.is_active("com.android.application"));
        assert_eq!(set.deferred().len(), 0);
        assert_eq!(set.active().len(), 1);
    }

    #[test]
    fn test_activate_unknown_is_fatal() {
        let mut set = PluginSet::new();
        let err = set.activate("com.example.missing").unwrap_err();
        assert_eq!(err.code, ErrorCode::UnknownPlugin);
    }

    #[test]
    fn test_activate_is_idempotent() {
        let mut set = PluginSet::new();
        set.declare(agp()).unwrap();
        set.activate("com.android.application").unwrap();
        set.activate("com.android.application").unwrap();
        let snapshot = set.clone();
        set.activate("com.android.application").unwrap();
        assert_eq!(set, snapshot);
    }

    #[test]
    fn test_duplicate_declaration_rejected() {
        let mut set = PluginSet::new();
        set.declare(agp()).unwrap();
        let err = set.declare(agp()).unwrap_err();
        assert_eq!(err.code, ErrorCode::DuplicatePlugin);
    }

    #[test]
    fn test_declaration_order_preserved() {
        let mut set = PluginSet::new();
        set.declare(loader()).unwrap();
        set.declare(agp()).unwrap();
        let ids: Vec<&str> = set.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(
            ids,
            ["dev.flutter.flutter-plugin-loader", "com.android.application"]
        );
    }
}
