//! Verifier configuration
//!
//! A verifier is a named list of rule-name patterns plus the warning
//! categories it treats as requirements. Configurations are read from TOML,
//! YAML or JSON, chosen by file extension.

use crate::error::ConfigError;
use crate::warning::WarningCategory;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Origin reported for configurations parsed from strings
const INLINE: &str = "<inline>";

/// Decoration applied to every rule whose name matches `regex`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulePattern {
    /// Pattern name, becomes the rule's `pattern`
    pub name: String,

    /// Regular expression matched against the whole rule name
    pub regex: String,

    /// Matching rules are reachable by construction
    #[serde(default)]
    pub reachable_by_construction: bool,

    /// Matching rules are mocks
    #[serde(default)]
    pub mock: bool,

    /// Matching rules are required by default
    #[serde(default)]
    pub required_by_default: bool,
}

impl RulePattern {
    /// Create plain pattern
    #[must_use]
    pub fn new(name: impl Into<String>, regex: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            regex: regex.into(),
            reachable_by_construction: false,
            mock: false,
            required_by_default: false,
        }
    }

    /// Mark matching rules as mocks
    #[inline]
    #[must_use]
    pub fn mock(mut self) -> Self {
        self.mock = true;
        self
    }

    /// Mark matching rules reachable by construction
    #[inline]
    #[must_use]
    pub fn reachable_by_construction(mut self) -> Self {
        self.reachable_by_construction = true;
        self
    }

    /// Mark matching rules required by default
    #[inline]
    #[must_use]
    pub fn required_by_default(mut self) -> Self {
        self.required_by_default = true;
        self
    }
}

fn default_main_requirements() -> Vec<WarningCategory> {
    vec![WarningCategory::UnreachableOperation]
}

/// Named verifier configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifierConfig {
    /// Verifier name
    pub name: String,

    /// Patterns in priority order, first match wins
    pub patterns: Vec<RulePattern>,

    /// Modules left out of the analyzed grammar
    #[serde(default)]
    pub ignored_modules: BTreeSet<String>,

    /// Categories that decide pass or fail
    #[serde(default = "default_main_requirements")]
    pub main_requirements: Vec<WarningCategory>,

    /// Categories reported separately from other warnings
    #[serde(default)]
    pub extra_requirements: Vec<WarningCategory>,
}

impl VerifierConfig {
    /// Create configuration without patterns
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            patterns: Vec::new(),
            ignored_modules: BTreeSet::new(),
            main_requirements: default_main_requirements(),
            extra_requirements: Vec::new(),
        }
    }

    /// Append a pattern
    #[must_use]
    pub fn with_pattern(mut self, pattern: RulePattern) -> Self {
        self.patterns.push(pattern);
        self
    }

    /// Ignore a module
    #[must_use]
    pub fn with_ignored_module(mut self, module: impl Into<String>) -> Self {
        self.ignored_modules.insert(module.into());
        self
    }

    /// Replace main requirement categories
    #[must_use]
    pub fn with_main_requirements(
        mut self,
        categories: impl IntoIterator<Item = WarningCategory>,
    ) -> Self {
        self.main_requirements = categories.into_iter().collect();
        self
    }

    /// Replace extra requirement categories
    #[must_use]
    pub fn with_extra_requirements(
        mut self,
        categories: impl IntoIterator<Item = WarningCategory>,
    ) -> Self {
        self.extra_requirements = categories.into_iter().collect();
        self
    }

    /// Load configuration, format chosen by extension
    ///
    /// # Errors
    /// [`ConfigError`] if the file cannot be read, has an unknown extension
    /// or does not parse.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        let config: Self = format.parse(&content, path)?;

        tracing::info!(
            "Loaded verifier '{}' from {} ({} patterns)",
            config.name,
            path.display(),
            config.patterns.len()
        );
        Ok(config)
    }

    /// Parse TOML configuration
    ///
    /// # Errors
    /// [`ConfigError::Parse`] on invalid content.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        ConfigFormat::Toml.parse(content, Path::new(INLINE))
    }

    /// Parse YAML configuration
    ///
    /// # Errors
    /// [`ConfigError::Parse`] on invalid content.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        ConfigFormat::Yaml.parse(content, Path::new(INLINE))
    }

    /// Parse JSON configuration
    ///
    /// # Errors
    /// [`ConfigError::Parse`] on invalid content.
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        ConfigFormat::Json.parse(content, Path::new(INLINE))
    }
}

/// Supported configuration formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.toml`
    Toml,
    /// `.yaml` / `.yml`
    Yaml,
    /// `.json`
    Json,
}

impl ConfigFormat {
    /// Format of `path` by extension, case-insensitive
    ///
    /// # Errors
    /// [`ConfigError::UnsupportedFormat`] for any other extension.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("toml") => Ok(Self::Toml),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// Deserialize `content`, reporting errors against `origin`
    ///
    /// # Errors
    /// [`ConfigError::Parse`] on invalid content.
    pub fn parse<T: DeserializeOwned>(
        self,
        content: &str,
        origin: &Path,
    ) -> Result<T, ConfigError> {
        match self {
            Self::Toml => toml::from_str(content).map_err(|e| ConfigError::parse(origin, e)),
            Self::Yaml => serde_yaml::from_str(content).map_err(|e| ConfigError::parse(origin, e)),
            Self::Json => serde_json::from_str(content).map_err(|e| ConfigError::parse(origin, e)),
        }
    }
}

/// Read a JSON document
///
/// # Errors
/// [`ConfigError`] if the file cannot be read or does not parse.
pub fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
    ConfigFormat::Json.parse(&content, path)
}
