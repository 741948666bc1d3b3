//! `local.properties` parsing
//!
//! Android projects locate machine-specific paths (SDKs, toolchains) in a
//! `local.properties` file next to the Gradle settings. The file uses the
//! Java properties format; this module implements the subset that occurs in
//! practice: `#`/`!` comments, blank lines, `=` or `:` separators, and
//! whitespace trimming around keys and values.

use crate::error::{Error, Result};
use std::path::Path;

/// An ordered key-value store parsed from a properties file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalProperties {
    entries: Vec<(String, String)>,
}

impl LocalProperties {
    /// Parse properties from text. Parsing is total: malformed lines become
    /// a key with an empty value, matching `java.util.Properties`.
    pub fn parse(text: &str) -> Self {
        let mut props = Self::default();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }

            let split = line
                .find(|c| c == '=' || c == ':')
                .map(|idx| (&line[..idx], &line[idx + 1..]));

            let (key, value) = match split {
                Some((k, v)) => (k.trim_end(), v.trim_start()),
                // Bare key: present, but empty
                None => (line, ""),
            };

            if key.is_empty() {
                continue;
            }
            props.insert(key, value);
        }

        props
    }

    /// Load and parse a properties file. A missing or unreadable file is a
    /// fatal error raised before any property lookup happens.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::from(e).with_context(format!("Reading {}", path.display())))?;
        Ok(Self::parse(&content))
    }

    /// Insert a key-value pair, replacing an existing key in place
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    /// Look up a property value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Look up a required property. `file` names the source file in the
    /// error message, e.g. `"flutter.sdk not set in local.properties"`.
    pub fn require(&self, key: &str, file: &str) -> Result<&str> {
        // An empty value is as unusable as a missing one
        match self.get(key) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(Error::missing_property(key, file)),
        }
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no properties were parsed
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in file order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}
