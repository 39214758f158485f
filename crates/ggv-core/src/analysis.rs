//! Verification results
//!
//! [`VerifyAnalysis`] is what one verifier run over one experiment produces;
//! [`VerifySummary`] aggregates several runs of the same verifier.

use crate::experiment::ExperimentData;
use crate::warning::{Warning, WarningCategory};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw output of a verification run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Analyzed experiment
    pub data: ExperimentData,
    /// Every warning, in rule-set order
    pub warnings: Vec<Warning>,
}

/// Warnings of one requirement group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementResult {
    /// True when no warning fell into this group
    pub passed: bool,
    /// Warnings of this group
    pub data: Vec<Warning>,
}

impl RequirementResult {
    /// Group warnings; passed iff there are none
    #[must_use]
    pub fn new(data: Vec<Warning>) -> Self {
        Self {
            passed: data.is_empty(),
            data,
        }
    }
}

/// Warnings split by the verifier's requirement groups
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResults {
    /// Warnings of the main requirement categories
    pub main_requirements: RequirementResult,
    /// Warnings of the extra requirement categories
    pub extra_requirements: RequirementResult,
    /// Every other warning
    pub extra_warnings: RequirementResult,
}

impl VerifyResults {
    /// Partition `warnings` by category, keeping order within each group
    ///
    /// A category listed as both main and extra requirement counts as main.
    #[must_use]
    pub fn partition(
        warnings: &[Warning],
        main: &[WarningCategory],
        extra: &[WarningCategory],
    ) -> Self {
        let mut main_data = Vec::new();
        let mut extra_data = Vec::new();
        let mut rest = Vec::new();

        for warning in warnings {
            if main.contains(&warning.kind) {
                main_data.push(warning.clone());
            } else if extra.contains(&warning.kind) {
                extra_data.push(warning.clone());
            } else {
                rest.push(warning.clone());
            }
        }

        Self {
            main_requirements: RequirementResult::new(main_data),
            extra_requirements: RequirementResult::new(extra_data),
            extra_warnings: RequirementResult::new(rest),
        }
    }
}

/// One verifier applied to one experiment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyAnalysis {
    /// Experiment name
    pub experiment: String,
    /// Verifier name
    pub verifier: String,
    /// Experiment data and all warnings
    pub report: Report,
    /// Warnings by requirement group
    pub results: VerifyResults,
}

impl VerifyAnalysis {
    /// Check if the main requirements hold
    #[inline]
    #[must_use]
    pub fn passed(&self) -> bool {
        self.results.main_requirements.passed
    }
}

/// Per-experiment line of a [`VerifySummary`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryEntry {
    /// Main requirements held
    pub main_requirements: bool,
    /// Extra requirements held
    pub extra_requirements: bool,
    /// Warning count per category
    pub warnings: BTreeMap<WarningCategory, usize>,
}

/// Aggregate of one verifier over several experiments
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifySummary {
    /// Verifier name
    pub verifier: String,
    /// Entries keyed by experiment name
    pub experiments: BTreeMap<String, SummaryEntry>,
}

impl VerifySummary {
    /// Empty summary for `verifier`
    #[must_use]
    pub fn new(verifier: impl Into<String>) -> Self {
        Self {
            verifier: verifier.into(),
            experiments: BTreeMap::new(),
        }
    }

    /// Record one analysis, replacing any entry of the same experiment name
    pub fn add(&mut self, analysis: &VerifyAnalysis) {
        let mut warnings: BTreeMap<WarningCategory, usize> = BTreeMap::new();
        for warning in &analysis.report.warnings {
            *warnings.entry(warning.kind).or_default() += 1;
        }

        self.experiments.insert(
            analysis.experiment.clone(),
            SummaryEntry {
                main_requirements: analysis.results.main_requirements.passed,
                extra_requirements: analysis.results.extra_requirements.passed,
                warnings,
            },
        );
    }

    /// Number of experiments whose main requirements held
    #[must_use]
    pub fn passed(&self) -> usize {
        self.experiments
            .values()
            .filter(|e| e.main_requirements)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn warning(kind: WarningCategory, subject: &str) -> Warning {
        Warning::new(kind, subject).with_data("subject", subject)
    }

    #[test]
    fn partition_prefers_main() {
        let warnings = vec![
            warning(WarningCategory::UnreachableOperation, "a"),
            warning(WarningCategory::OptionalRule, "b"),
            warning(WarningCategory::DanglingResource, "c"),
        ];
        let results = VerifyResults::partition(
            &warnings,
            &[WarningCategory::UnreachableOperation],
            &[
                WarningCategory::UnreachableOperation,
                WarningCategory::OptionalRule,
            ],
        );

        assert_eq!(results.main_requirements.data.len(), 1);
        assert!(!results.main_requirements.passed);
        assert_eq!(results.extra_requirements.data.len(), 1);
        assert_eq!(results.extra_warnings.data.len(), 1);
        assert_eq!(
            results.extra_warnings.data[0].kind,
            WarningCategory::DanglingResource
        );
    }

    #[test]
    fn empty_group_passes() {
        let results = VerifyResults::partition(&[], &[WarningCategory::UnreachableOperation], &[]);
        assert!(results.main_requirements.passed);
        assert!(results.extra_warnings.passed);
    }

    #[test]
    fn results_serialize_camel_case() {
        let json = serde_json::to_value(VerifyResults::default()).unwrap();
        assert!(json.get("mainRequirements").is_some());
        assert!(json.get("extraRequirements").is_some());
        assert!(json.get("extraWarnings").is_some());
    }
}
