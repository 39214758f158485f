//! Rule model
//!
//! A [`Rule`] is one transformation of the verification grammar, decorated
//! with the provenance flags the verifier assigned from its name.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Module-net elements touched by a rule's graphs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleContents {
    /// Module ids
    #[serde(default)]
    pub modules: BTreeSet<String>,

    /// Resource ids
    #[serde(default)]
    pub resources: BTreeSet<String>,

    /// Attribute ids
    #[serde(default)]
    pub attributes: BTreeSet<String>,
}

impl RuleContents {
    /// Check if the rule touches nothing
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty() && self.resources.is_empty() && self.attributes.is_empty()
    }

    /// Add a module
    #[must_use]
    pub fn with_module(mut self, id: impl Into<String>) -> Self {
        self.modules.insert(id.into());
        self
    }

    /// Add a resource
    #[must_use]
    pub fn with_resource(mut self, id: impl Into<String>) -> Self {
        self.resources.insert(id.into());
        self
    }

    /// Add an attribute
    #[must_use]
    pub fn with_attribute(mut self, id: impl Into<String>) -> Self {
        self.attributes.insert(id.into());
        self
    }
}

/// One transformation rule of a verification grammar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    /// Unique rule name
    pub name: String,

    /// Name of the verifier pattern this rule matched
    pub pattern: String,

    /// Executable by how the grammar was built
    #[serde(default)]
    pub reachable_by_construction: bool,

    /// Synthetic placeholder for an operation whose graphs could not be derived
    #[serde(default)]
    pub mock: bool,

    /// Must be reachable for the module to be usable
    #[serde(default)]
    pub required_by_default: bool,

    /// Module-net operation implemented by this rule
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maps_to_operation: Option<String>,

    /// Elements touched by the rule
    #[serde(default)]
    pub contains: RuleContents,
}

impl Rule {
    /// Create undecorated rule
    #[must_use]
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
            reachable_by_construction: false,
            mock: false,
            required_by_default: false,
            maps_to_operation: None,
            contains: RuleContents::default(),
        }
    }

    /// Set mock flag
    #[inline]
    #[must_use]
    pub fn with_mock(mut self, mock: bool) -> Self {
        self.mock = mock;
        self
    }

    /// Set reachable-by-construction flag
    #[inline]
    #[must_use]
    pub fn with_reachable_by_construction(mut self, reachable: bool) -> Self {
        self.reachable_by_construction = reachable;
        self
    }

    /// Set required-by-default flag
    #[inline]
    #[must_use]
    pub fn with_required_by_default(mut self, required: bool) -> Self {
        self.required_by_default = required;
        self
    }

    /// Set implemented operation
    #[inline]
    #[must_use]
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.maps_to_operation = Some(operation.into());
        self
    }

    /// Set touched elements
    #[inline]
    #[must_use]
    pub fn with_contains(mut self, contains: RuleContents) -> Self {
        self.contains = contains;
        self
    }

    /// Check if this rule can pass reachability on to rules it enables
    #[inline]
    #[must_use]
    pub fn transmits_reachability(&self) -> bool {
        !self.mock
    }
}
