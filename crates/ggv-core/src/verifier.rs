//! Verifier
//!
//! Decorates raw rules through the configured name patterns, assembles
//! [`ExperimentData`], runs every warning rule and groups the warnings by
//! the verifier's requirement categories.

use crate::analysis::{Report, VerifyAnalysis, VerifyResults};
use crate::config::{RulePattern, VerifierConfig};
use crate::error::VerifierError;
use crate::experiment::ExperimentData;
use crate::grammar::{AttributeElement, ModuleElement, ResourceElement, VerificationGrammar};
use crate::rule::{Rule, RuleContents};
use crate::warning::{make_warnings, WarningRuleSet};
use ggv_pairs::CriticalPairs;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Rule as emitted by the grammar translation, before decoration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRule {
    /// Unique rule name
    pub name: String,

    /// Module-net operation implemented by this rule
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maps_to_operation: Option<String>,

    /// Elements touched by the rule
    #[serde(default)]
    pub contains: RuleContents,
}

impl RawRule {
    /// Create raw rule touching nothing
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            maps_to_operation: None,
            contains: RuleContents::default(),
        }
    }
}

/// Grammar with undecorated rules
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawGrammar {
    /// Undecorated rules
    pub rules: Vec<RawRule>,

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

/// Experiment as handed over by the upstream pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperimentInput {
    /// Experiment name
    #[serde(default)]
    pub name: String,

    /// Raw grammar
    pub grammar: RawGrammar,

    /// Every computed critical-pair table
    pub critical_pairs: CriticalPairs,
}

#[derive(Debug, Clone)]
struct CompiledPattern {
    pattern: RulePattern,
    regex: Regex,
}

/// Compiled verifier configuration
#[derive(Debug, Clone)]
pub struct Verifier {
    config: VerifierConfig,
    patterns: Vec<CompiledPattern>,
    rules: WarningRuleSet,
}

impl Verifier {
    /// Compile the configured patterns
    ///
    /// Every regex is anchored to the whole rule name.
    ///
    /// # Errors
    /// [`VerifierError::InvalidPattern`] if a regex does not compile.
    pub fn new(config: VerifierConfig) -> Result<Self, VerifierError> {
        let patterns = config
            .patterns
            .iter()
            .map(|pattern| {
                Regex::new(&format!("^(?:{})$", pattern.regex))
                    .map(|regex| CompiledPattern {
                        pattern: pattern.clone(),
                        regex,
                    })
                    .map_err(|source| VerifierError::InvalidPattern {
                        verifier: config.name.clone(),
                        pattern: pattern.name.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            config,
            patterns,
            rules: WarningRuleSet::all(),
        })
    }

    /// Run only the given warning rules
    #[must_use]
    pub fn with_rules(mut self, rules: WarningRuleSet) -> Self {
        self.rules = rules;
        self
    }

    /// Verifier name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Underlying configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Decorate raw rules with the first pattern their name matches
    ///
    /// # Errors
    /// - [`VerifierError::DuplicateRule`] if a name repeats
    /// - [`VerifierError::UnmatchedRule`] if a name matches no pattern
    pub fn decorate_rules(&self, raw: &[RawRule]) -> Result<Vec<Rule>, VerifierError> {
        let mut seen = HashSet::new();
        let mut rules = Vec::with_capacity(raw.len());

        for raw_rule in raw {
            if !seen.insert(raw_rule.name.as_str()) {
                return Err(VerifierError::DuplicateRule {
                    verifier: self.config.name.clone(),
                    rule: raw_rule.name.clone(),
                });
            }

            let compiled = self
                .patterns
                .iter()
                .find(|p| p.regex.is_match(&raw_rule.name))
                .ok_or_else(|| VerifierError::UnmatchedRule {
                    verifier: self.config.name.clone(),
                    rule: raw_rule.name.clone(),
                })?;
            let pattern = &compiled.pattern;

            rules.push(Rule {
                name: raw_rule.name.clone(),
                pattern: pattern.name.clone(),
                reachable_by_construction: pattern.reachable_by_construction,
                mock: pattern.mock,
                required_by_default: pattern.required_by_default,
                maps_to_operation: raw_rule.maps_to_operation.clone(),
                contains: raw_rule.contains.clone(),
            });
        }

        Ok(rules)
    }

    /// Decorate, filter ignored modules and compute reachability
    ///
    /// # Errors
    /// Decoration errors and structural errors of the critical pairs.
    pub fn experiment(
        &self,
        grammar: &RawGrammar,
        pairs: &CriticalPairs,
    ) -> Result<ExperimentData, VerifierError> {
        let rules = self.decorate_rules(&grammar.rules)?;
        let grammar = VerificationGrammar {
            rules,
            modules: grammar.modules.clone(),
            resources: grammar.resources.clone(),
            attributes: grammar.attributes.clone(),
        }
        .without_modules(&self.config.ignored_modules);

        Ok(ExperimentData::new(grammar, pairs)?)
    }

    /// Run the warning rules and group the result
    #[must_use]
    pub fn verify(&self, experiment: impl Into<String>, data: ExperimentData) -> VerifyAnalysis {
        let experiment = experiment.into();
        let warnings = make_warnings(&data, &self.rules);
        let results = VerifyResults::partition(
            &warnings,
            &self.config.main_requirements,
            &self.config.extra_requirements,
        );

        tracing::info!(
            "Verifier '{}' on '{}': {} warnings, main requirements {}",
            self.config.name,
            experiment,
            warnings.len(),
            if results.main_requirements.passed { "passed" } else { "failed" }
        );

        VerifyAnalysis {
            experiment,
            verifier: self.config.name.clone(),
            report: Report { data, warnings },
            results,
        }
    }

    /// Build experiment data from `input` and verify it
    ///
    /// # Errors
    /// Errors of [`Verifier::experiment`].
    pub fn verify_input(&self, input: &ExperimentInput) -> Result<VerifyAnalysis, VerifierError> {
        let data = self.experiment(&input.grammar, &input.critical_pairs)?;
        Ok(self.verify(input.name.clone(), data))
    }
}

/// Decorate raw rules with `config`
///
/// # Errors
/// Pattern compilation and decoration errors of [`Verifier`].
pub fn decorate_rules(
    config: &VerifierConfig,
    raw: &[RawRule],
) -> Result<Vec<Rule>, VerifierError> {
    Verifier::new(config.clone())?.decorate_rules(raw)
}
