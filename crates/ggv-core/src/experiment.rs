//! Experiment data
//!
//! [`ExperimentData`] is the snapshot every warning rule consumes: the
//! grammar, its dependency and conflict tables, and the derived reachability.

use crate::error::ReachabilityError;
use crate::grammar::VerificationGrammar;
use crate::reachability::{ReachabilityAnalysis, ENABLES};
use crate::rule::Rule;
use ggv_pairs::{CriticalPairTable, CriticalPairs, PairCategory};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Unit of analysis for one module version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentData {
    /// Verification grammar
    pub grammar: VerificationGrammar,

    /// Dependency tables, self-loops removed
    pub dependencies: CriticalPairs,

    /// Conflict tables, self-loops removed
    pub conflicts: CriticalPairs,

    /// Derived reachability of every rule
    pub reachability: ReachabilityAnalysis,
}

impl ExperimentData {
    /// Assemble experiment data and compute reachability
    ///
    /// # Errors
    /// Structural errors of [`ReachabilityAnalysis::analyze`].
    pub fn new(
        grammar: VerificationGrammar,
        pairs: &CriticalPairs,
    ) -> Result<Self, ReachabilityError> {
        let pairs = pairs.remove_self_loops();
        let reachability = ReachabilityAnalysis::analyze(&grammar.rules, &pairs)?;

        Ok(Self {
            grammar,
            dependencies: pairs.dependencies(),
            conflicts: pairs.conflicts(),
            reachability,
        })
    }

    /// Table of one category, dependency or conflict
    #[must_use]
    pub fn table(&self, kind: PairCategory) -> Option<&CriticalPairTable> {
        if kind.is_dependency() {
            self.dependencies.get(kind)
        } else {
            self.conflicts.get(kind)
        }
    }

    /// Check if a rule is reachable
    #[inline]
    #[must_use]
    pub fn is_reachable(&self, name: &str) -> bool {
        self.reachability.is_reachable(name)
    }

    /// Look up a rule by name
    #[inline]
    #[must_use]
    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.grammar.rule(name)
    }

    /// Rules that are required by default or enable a needed rule
    #[must_use]
    pub fn needed_rules(&self) -> BTreeSet<&str> {
        let enables = self.dependencies.get(ENABLES);

        let mut needed: BTreeSet<&str> = self
            .grammar
            .rules
            .iter()
            .filter(|r| r.required_by_default)
            .map(|r| r.name.as_str())
            .collect();
        let mut stack: Vec<&str> = needed.iter().copied().collect();

        while let Some(name) = stack.pop() {
            for producer in enables.into_iter().flat_map(|t| t.predecessors(name)) {
                if needed.insert(producer) {
                    stack.push(producer);
                }
            }
        }

        needed
    }

    /// Rules touching any element accepted by `touches`
    pub fn rules_touching<'a>(
        &'a self,
        touches: impl Fn(&Rule) -> bool + 'a,
    ) -> impl Iterator<Item = &'a Rule> + 'a {
        self.grammar.rules.iter().filter(move |r| touches(r))
    }
}
