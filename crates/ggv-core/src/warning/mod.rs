//! Warning framework
//!
//! Provides the [`WarningRule`] trait, one implementation per
//! [`WarningCategory`], and [`make_warnings`] to run a rule set over one
//! [`ExperimentData`] snapshot.

mod rules;

pub use rules::{
    DanglingResource, OptionalAttribute, OptionalModule, OptionalResource, OptionalRule,
    OutdatedAttribute, OutdatedAttributeRelay, StrictOptionalAttribute, UnreachableOperation,
};

use crate::experiment::ExperimentData;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Kind of diagnostic a warning rule emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarningCategory {
    /// Non-mock rule that can never fire
    UnreachableOperation,
    /// Rule nothing required depends on
    OptionalRule,
    /// Module touched by no needed rule
    OptionalModule,
    /// Resource touched by no needed rule
    OptionalResource,
    /// Attribute touched by no needed rule
    OptionalAttribute,
    /// Optional attribute no reachable rule touches
    StrictOptionalAttribute,
    /// Resource left dangling between two reachable rules
    DanglingResource,
    /// Attribute read after a reachable rule may have changed it
    OutdatedAttribute,
    /// Attribute value relayed through a mock rule
    OutdatedAttributeRelay,
}

impl WarningCategory {
    /// Every category, in registry order
    pub const ALL: [WarningCategory; 9] = [
        WarningCategory::UnreachableOperation,
        WarningCategory::OptionalRule,
        WarningCategory::OptionalModule,
        WarningCategory::OptionalResource,
        WarningCategory::OptionalAttribute,
        WarningCategory::StrictOptionalAttribute,
        WarningCategory::DanglingResource,
        WarningCategory::OutdatedAttribute,
        WarningCategory::OutdatedAttributeRelay,
    ];

    /// Kebab-case name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UnreachableOperation => "unreachable-operation",
            Self::OptionalRule => "optional-rule",
            Self::OptionalModule => "optional-module",
            Self::OptionalResource => "optional-resource",
            Self::OptionalAttribute => "optional-attribute",
            Self::StrictOptionalAttribute => "strict-optional-attribute",
            Self::DanglingResource => "dangling-resource",
            Self::OutdatedAttribute => "outdated-attribute",
            Self::OutdatedAttributeRelay => "outdated-attribute-relay",
        }
    }

    /// Rule implementing this category
    #[must_use]
    pub fn rule(self) -> &'static dyn WarningRule {
        match self {
            Self::UnreachableOperation => &UnreachableOperation,
            Self::OptionalRule => &OptionalRule,
            Self::OptionalModule => &OptionalModule,
            Self::OptionalResource => &OptionalResource,
            Self::OptionalAttribute => &OptionalAttribute,
            Self::StrictOptionalAttribute => &StrictOptionalAttribute,
            Self::DanglingResource => &DanglingResource,
            Self::OutdatedAttribute => &OutdatedAttribute,
            Self::OutdatedAttributeRelay => &OutdatedAttributeRelay,
        }
    }
}

impl fmt::Display for WarningCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown warning category name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown warning category: '{0}'")]
pub struct UnknownWarningCategory(pub String);

impl FromStr for WarningCategory {
    type Err = UnknownWarningCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| UnknownWarningCategory(s.to_string()))
    }
}

/// Typed diagnostic about a verification grammar
///
/// Equality only considers `kind` and `data`; `id` and `debug` are
/// informational.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Warning {
    /// Stable identifier, `<category>:<subject>`
    pub id: String,

    /// Warning category
    #[serde(rename = "type")]
    pub kind: WarningCategory,

    /// Flat description of the finding
    pub data: BTreeMap<String, String>,

    /// Opaque diagnostic payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<serde_json::Value>,
}

impl Warning {
    /// Create warning about `subject`
    #[must_use]
    pub fn new(kind: WarningCategory, subject: impl fmt::Display) -> Self {
        Self {
            id: format!("{kind}:{subject}"),
            kind,
            data: BTreeMap::new(),
            debug: None,
        }
    }

    /// Add a data entry
    #[inline]
    #[must_use]
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Attach debug payload
    #[inline]
    #[must_use]
    pub fn with_debug(mut self, debug: serde_json::Value) -> Self {
        self.debug = Some(debug);
        self
    }

    /// Data value for `key`
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }
}

impl PartialEq for Warning {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.data == other.data
    }
}

impl Eq for Warning {}

impl Hash for Warning {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.data.hash(state);
    }
}

/// Diagnostic rule over one experiment
///
/// `apply` must be pure and total over well-formed experiment data.
pub trait WarningRule: Send + Sync + fmt::Debug {
    /// Category of every warning this rule emits
    fn kind(&self) -> WarningCategory;

    /// Warnings found in `data`
    fn apply(&self, data: &ExperimentData) -> Vec<Warning>;
}

/// Ordered selection of warning categories to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarningRuleSet {
    categories: IndexSet<WarningCategory>,
}

impl WarningRuleSet {
    /// Every category in registry order
    #[must_use]
    pub fn all() -> Self {
        Self::only(WarningCategory::ALL)
    }

    /// Selected categories, in the given order, duplicates ignored
    #[must_use]
    pub fn only(categories: impl IntoIterator<Item = WarningCategory>) -> Self {
        Self {
            categories: categories.into_iter().collect(),
        }
    }

    /// Check if a category is selected
    #[inline]
    #[must_use]
    pub fn contains(&self, category: WarningCategory) -> bool {
        self.categories.contains(&category)
    }

    /// Number of selected categories
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Check if nothing is selected
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Selected rules in order
    pub fn rules(&self) -> impl Iterator<Item = &'static dyn WarningRule> + '_ {
        self.categories.iter().map(|category| category.rule())
    }
}

impl Default for WarningRuleSet {
    fn default() -> Self {
        Self::all()
    }
}

/// Apply every rule of `rules` to `data`
///
/// Results are concatenated in rule-set order; nothing is deduplicated.
#[must_use]
pub fn make_warnings(data: &ExperimentData, rules: &WarningRuleSet) -> Vec<Warning> {
    let mut warnings = Vec::new();
    for rule in rules.rules() {
        let found = rule.apply(data);
        tracing::debug!("{}: {} warnings", rule.kind(), found.len());
        warnings.extend(found);
    }
    warnings
}
