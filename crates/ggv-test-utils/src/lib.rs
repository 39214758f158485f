//! Testing utilities for GGV workspace
//!
//! Shared rule builders, critical-pair fixtures, and analyses.

#![allow(missing_docs)]

use ggv_core::{
    ExperimentData, Report, Rule, VerificationGrammar, VerifyAnalysis, VerifyResults, Warning,
    WarningCategory, ENABLES, FORBIDS,
};
use ggv_pairs::{CriticalPairTable, CriticalPairs};

pub fn rule(name: &str) -> Rule {
    Rule::new(name, "GET")
}

pub fn mock(name: &str) -> Rule {
    Rule::new(name, "mockgenerate-attribute").with_mock(true)
}

pub fn by_construction(name: &str) -> Rule {
    Rule::new(name, "generate-resource").with_reachable_by_construction(true)
}

pub fn names(rules: &[Rule]) -> Vec<String> {
    rules.iter().map(|r| r.name.clone()).collect()
}

/// Enables and forbids tables over exactly `rules`
pub fn pairs(rules: &[Rule], enables: &[(&str, &str)], forbids: &[(&str, &str)]) -> CriticalPairs {
    let names = names(rules);
    let mut deps = CriticalPairTable::with_rows(ENABLES, &names);
    for (from, to) in enables {
        deps.insert(*from, *to, 1);
    }
    let mut conflicts = CriticalPairTable::with_rows(FORBIDS, &names);
    for (from, to) in forbids {
        conflicts.insert(*from, *to, 1);
    }
    CriticalPairs::new().with_table(deps).with_table(conflicts)
}

pub fn experiment(
    rules: Vec<Rule>,
    enables: &[(&str, &str)],
    forbids: &[(&str, &str)],
) -> ExperimentData {
    let pairs = pairs(&rules, enables, forbids);
    ExperimentData::new(VerificationGrammar::new(rules), &pairs).unwrap()
}

/// Ten rules mixing chains, a cycle fed by a mock, a nullified forbid and
/// a rule reachable by construction.
///
/// Reachable: init, login, fetch, read, mock_token, export, audit.
/// Unreachable: refresh, sync_a, sync_b.
pub fn ten_rule_example() -> (Vec<Rule>, CriticalPairs) {
    let rules = vec![
        rule("init"),
        rule("login"),
        rule("fetch"),
        rule("read"),
        mock("mock_token"),
        rule("refresh"),
        rule("sync_a"),
        rule("sync_b"),
        rule("export"),
        by_construction("audit"),
    ];
    let pairs = pairs(
        &rules,
        &[
            ("init", "login"),
            ("login", "fetch"),
            ("fetch", "read"),
            ("read", "fetch"),
            ("mock_token", "refresh"),
            ("mock_token", "sync_a"),
            ("sync_a", "sync_b"),
            ("sync_b", "sync_a"),
            ("mock_token", "export"),
            ("refresh", "audit"),
        ],
        &[("mock_token", "export"), ("login", "refresh")],
    );
    (rules, pairs)
}

pub fn warning(kind: WarningCategory, data: &[(&str, &str)]) -> Warning {
    let subject = data.first().map(|(_, v)| *v).unwrap_or_default();
    data.iter()
        .fold(Warning::new(kind, subject), |w, (k, v)| w.with_data(*k, *v))
}

/// Analysis whose extra warnings are exactly `warnings`
pub fn analysis_with_warnings(experiment: &str, warnings: Vec<Warning>) -> VerifyAnalysis {
    let data = self::experiment(vec![rule("r")], &[], &[]);
    let results = VerifyResults::partition(&warnings, &[], &[]);
    VerifyAnalysis {
        experiment: experiment.to_string(),
        verifier: "test".to_string(),
        report: Report { data, warnings },
        results,
    }
}
