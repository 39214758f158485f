//! Verification grammar
//!
//! The rules of one module version together with the module-net elements
//! (modules, resources, attributes) they reference.

use crate::rule::Rule;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Module of the module net
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleElement {
    /// Module id
    pub id: String,
}

/// Resource owned by a module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceElement {
    /// Resource id
    pub id: String,
    /// Owning module id
    pub module: String,
}

/// Attribute of a resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeElement {
    /// Attribute id
    pub id: String,
    /// Owning resource id
    pub resource: String,
    /// Module owning the resource
    pub module: String,
}

/// Rules and referenced elements of one analyzed module version
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationGrammar {
    /// Decorated rules, names unique
    pub rules: Vec<Rule>,

    /// Referenced modules
    #[serde(default)]
    pub modules: Vec<ModuleElement>,

    /// Referenced resources
    #[serde(default)]
    pub resources: Vec<ResourceElement>,

    /// Referenced attributes
    #[serde(default)]
    pub attributes: Vec<AttributeElement>,
}

impl VerificationGrammar {
    /// Create grammar from rules only
    #[must_use]
    pub fn new(rules: Vec<Rule>) -> Self {
        Self {
            rules,
            ..Self::default()
        }
    }

    /// Add a module
    #[must_use]
    pub fn with_module(mut self, id: impl Into<String>) -> Self {
        self.modules.push(ModuleElement { id: id.into() });
        self
    }

    /// Add a resource owned by `module`
    #[must_use]
    pub fn with_resource(mut self, id: impl Into<String>, module: impl Into<String>) -> Self {
        self.resources.push(ResourceElement {
            id: id.into(),
            module: module.into(),
        });
        self
    }

    /// Add an attribute of `resource` in `module`
    #[must_use]
    pub fn with_attribute(
        mut self,
        id: impl Into<String>,
        resource: impl Into<String>,
        module: impl Into<String>,
    ) -> Self {
        self.attributes.push(AttributeElement {
            id: id.into(),
            resource: resource.into(),
            module: module.into(),
        });
        self
    }

    /// Look up a rule by name
    #[must_use]
    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.name == name)
    }

    /// Names of all rules
    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.name.as_str())
    }

    /// Grammar without the `ignored` modules
    ///
    /// Drops the modules, their resources and attributes, and removes them
    /// from every rule's contents. Rules themselves are kept.
    #[must_use]
    pub fn without_modules(&self, ignored: &BTreeSet<String>) -> Self {
        if ignored.is_empty() {
            return self.clone();
        }

        let resources: Vec<ResourceElement> = self
            .resources
            .iter()
            .filter(|r| !ignored.contains(&r.module))
            .cloned()
            .collect();
        let attributes: Vec<AttributeElement> = self
            .attributes
            .iter()
            .filter(|a| !ignored.contains(&a.module))
            .cloned()
            .collect();

        let dropped_resources: BTreeSet<&str> = self
            .resources
            .iter()
            .filter(|r| ignored.contains(&r.module))
            .map(|r| r.id.as_str())
            .collect();
        let dropped_attributes: BTreeSet<&str> = self
            .attributes
            .iter()
            .filter(|a| ignored.contains(&a.module))
            .map(|a| a.id.as_str())
            .collect();

        let rules = self
            .rules
            .iter()
            .map(|rule| {
                let mut rule = rule.clone();
                rule.contains.modules.retain(|m| !ignored.contains(m));
                rule.contains
                    .resources
                    .retain(|r| !dropped_resources.contains(r.as_str()));
                rule.contains
                    .attributes
                    .retain(|a| !dropped_attributes.contains(a.as_str()));
                rule
            })
            .collect();

        Self {
            rules,
            modules: self
                .modules
                .iter()
                .filter(|m| !ignored.contains(&m.id))
                .cloned()
                .collect(),
            resources,
            attributes,
        }
    }
}
