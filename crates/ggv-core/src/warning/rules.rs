//! Warning rule implementations, one unit struct per category

use super::{Warning, WarningCategory, WarningRule};
use crate::experiment::ExperimentData;
use crate::reachability::producers_by_rule;
use crate::rule::{Rule, RuleContents};
use ggv_pairs::PairCategory;
use std::collections::BTreeSet;

/// Non-mock rules that can never fire
#[derive(Debug, Clone, Copy, Default)]
pub struct UnreachableOperation;

impl WarningRule for UnreachableOperation {
    fn kind(&self) -> WarningCategory {
        WarningCategory::UnreachableOperation
    }

    fn apply(&self, data: &ExperimentData) -> Vec<Warning> {
        let producers = producers_by_rule(&data.dependencies);

        sorted_rules(data)
            .into_iter()
            .filter(|r| !r.mock && !data.is_reachable(&r.name))
            .map(|rule| {
                let mut warning = Warning::new(self.kind(), &rule.name)
                    .with_data("rule", rule.name.as_str())
                    .with_data("pattern", rule.pattern.as_str());
                if let Some(operation) = &rule.maps_to_operation {
                    warning = warning.with_data("operation", operation.as_str());
                }
                let enabled_by = producers.get(rule.name.as_str()).cloned().unwrap_or_default();
                warning.with_debug(serde_json::json!({ "producers": enabled_by }))
            })
            .collect()
    }
}

/// Non-mock rules nothing required depends on
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionalRule;

impl WarningRule for OptionalRule {
    fn kind(&self) -> WarningCategory {
        WarningCategory::OptionalRule
    }

    fn apply(&self, data: &ExperimentData) -> Vec<Warning> {
        let needed = data.needed_rules();

        sorted_rules(data)
            .into_iter()
            .filter(|r| !r.mock && !needed.contains(r.name.as_str()))
            .map(|rule| {
                Warning::new(self.kind(), &rule.name)
                    .with_data("rule", rule.name.as_str())
                    .with_data("pattern", rule.pattern.as_str())
            })
            .collect()
    }
}

/// Modules touched by no needed rule
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionalModule;

impl WarningRule for OptionalModule {
    fn kind(&self) -> WarningCategory {
        WarningCategory::OptionalModule
    }

    fn apply(&self, data: &ExperimentData) -> Vec<Warning> {
        let needed = data.needed_rules();
        let ids: BTreeSet<&str> = data.grammar.modules.iter().map(|m| m.id.as_str()).collect();

        ids.into_iter()
            .filter(|id| !touched_by_needed(data, &needed, |c| c.modules.contains(*id)))
            .map(|id| Warning::new(self.kind(), id).with_data("module", id))
            .collect()
    }
}

/// Resources touched by no needed rule
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionalResource;

impl WarningRule for OptionalResource {
    fn kind(&self) -> WarningCategory {
        WarningCategory::OptionalResource
    }

    fn apply(&self, data: &ExperimentData) -> Vec<Warning> {
        let needed = data.needed_rules();
        let mut resources: Vec<_> = data.grammar.resources.iter().collect();
        resources.sort_by(|a, b| a.id.cmp(&b.id));

        resources
            .into_iter()
            .filter(|r| !touched_by_needed(data, &needed, |c| c.resources.contains(&r.id)))
            .map(|r| {
                Warning::new(self.kind(), &r.id)
                    .with_data("resource", r.id.as_str())
                    .with_data("module", r.module.as_str())
            })
            .collect()
    }
}

/// Attributes touched by no needed rule
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionalAttribute;

impl WarningRule for OptionalAttribute {
    fn kind(&self) -> WarningCategory {
        WarningCategory::OptionalAttribute
    }

    fn apply(&self, data: &ExperimentData) -> Vec<Warning> {
        optional_attributes(data)
            .into_iter()
            .map(|(id, resource, module)| attribute_warning(self.kind(), id, resource, module))
            .collect()
    }
}

/// Optional attributes that no reachable rule touches either
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictOptionalAttribute;

impl WarningRule for StrictOptionalAttribute {
    fn kind(&self) -> WarningCategory {
        WarningCategory::StrictOptionalAttribute
    }

    fn apply(&self, data: &ExperimentData) -> Vec<Warning> {
        optional_attributes(data)
            .into_iter()
            .filter(|(id, _, _)| {
                data.rules_touching(|r| r.contains.attributes.contains(*id))
                    .all(|r| r.mock || !data.is_reachable(&r.name))
            })
            .map(|(id, resource, module)| attribute_warning(self.kind(), id, resource, module))
            .collect()
    }
}

/// Resources a reachable rule may leave dangling for another
#[derive(Debug, Clone, Copy, Default)]
pub struct DanglingResource;

impl WarningRule for DanglingResource {
    fn kind(&self) -> WarningCategory {
        WarningCategory::DanglingResource
    }

    fn apply(&self, data: &ExperimentData) -> Vec<Warning> {
        let mut warnings = Vec::new();
        for (producer, remover) in oriented_pairs(data, PairCategory::ProduceDanglingConflict) {
            let (Some(p), Some(r)) = (data.rule(&producer), data.rule(&remover)) else {
                continue;
            };
            if !data.is_reachable(&p.name) || !data.is_reachable(&r.name) {
                continue;
            }
            for resource in p.contains.resources.intersection(&r.contains.resources) {
                warnings.push(
                    Warning::new(self.kind(), format!("{resource}:{producer}:{remover}"))
                        .with_data("resource", resource.as_str())
                        .with_data("producer", producer.as_str())
                        .with_data("remover", remover.as_str()),
                );
            }
        }
        warnings
    }
}

/// Attributes read after a reachable rule may have changed them
#[derive(Debug, Clone, Copy, Default)]
pub struct OutdatedAttribute;

impl WarningRule for OutdatedAttribute {
    fn kind(&self) -> WarningCategory {
        WarningCategory::OutdatedAttribute
    }

    fn apply(&self, data: &ExperimentData) -> Vec<Warning> {
        let mut warnings = Vec::new();
        for (changer, reader) in oriented_pairs(data, PairCategory::ChangeUseAttrConflict) {
            let (Some(c), Some(r)) = (data.rule(&changer), data.rule(&reader)) else {
                continue;
            };
            if !data.is_reachable(&c.name) || !data.is_reachable(&r.name) {
                continue;
            }
            for attribute in c.contains.attributes.intersection(&r.contains.attributes) {
                warnings.push(
                    Warning::new(self.kind(), format!("{attribute}:{changer}:{reader}"))
                        .with_data("attribute", attribute.as_str())
                        .with_data("changed_by", changer.as_str())
                        .with_data("read_by", reader.as_str()),
                );
            }
        }
        warnings
    }
}

/// Attribute values that only reach a rule through a mock
#[derive(Debug, Clone, Copy, Default)]
pub struct OutdatedAttributeRelay;

impl WarningRule for OutdatedAttributeRelay {
    fn kind(&self) -> WarningCategory {
        WarningCategory::OutdatedAttributeRelay
    }

    fn apply(&self, data: &ExperimentData) -> Vec<Warning> {
        let mut warnings = Vec::new();
        for (relay, reader) in oriented_pairs(data, PairCategory::ChangeUseAttrDependency) {
            let (Some(m), Some(r)) = (data.rule(&relay), data.rule(&reader)) else {
                continue;
            };
            if !m.mock || r.mock || !data.is_reachable(&r.name) {
                continue;
            }
            for attribute in m.contains.attributes.intersection(&r.contains.attributes) {
                warnings.push(
                    Warning::new(self.kind(), format!("{attribute}:{relay}:{reader}"))
                        .with_data("attribute", attribute.as_str())
                        .with_data("relay", relay.as_str())
                        .with_data("read_by", reader.as_str()),
                );
            }
        }
        warnings
    }
}

fn sorted_rules(data: &ExperimentData) -> Vec<&Rule> {
    let mut rules: Vec<&Rule> = data.grammar.rules.iter().collect();
    rules.sort_by(|a, b| a.name.cmp(&b.name));
    rules
}

fn touched_by_needed(
    data: &ExperimentData,
    needed: &BTreeSet<&str>,
    touches: impl Fn(&RuleContents) -> bool,
) -> bool {
    data.rules_touching(|r| needed.contains(r.name.as_str()) && touches(&r.contains))
        .next()
        .is_some()
}

/// `(id, resource, module)` of every attribute no needed rule touches
fn optional_attributes(data: &ExperimentData) -> Vec<(&str, &str, &str)> {
    let needed = data.needed_rules();
    let mut attributes: Vec<_> = data
        .grammar
        .attributes
        .iter()
        .filter(|a| !touched_by_needed(data, &needed, |c| c.attributes.contains(&a.id)))
        .map(|a| (a.id.as_str(), a.resource.as_str(), a.module.as_str()))
        .collect();
    attributes.sort_unstable();
    attributes
}

fn attribute_warning(kind: WarningCategory, id: &str, resource: &str, module: &str) -> Warning {
    Warning::new(kind, id)
        .with_data("attribute", id)
        .with_data("resource", resource)
        .with_data("module", module)
}

/// Distinct `(first, second)` rule pairs of a table, in row-major order
///
/// Transposed tables are flipped back so `first` is always the rule whose
/// effect comes first.
fn oriented_pairs(data: &ExperimentData, kind: PairCategory) -> Vec<(String, String)> {
    let Some(table) = data.table(kind) else {
        return Vec::new();
    };
    let table = if table.transposed {
        table.transpose()
    } else {
        table.clone()
    };

    table
        .edges()
        .filter(|(first, second, _)| first != second)
        .map(|(first, second, _)| (first.to_string(), second.to_string()))
        .collect()
}
