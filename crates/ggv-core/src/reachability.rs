//! Rule reachability analysis
//!
//! Decides, per rule, whether it can ever fire given the enabling structure of
//! the `PRODUCE_USE_DEPENDENCY` table, the forbidding structure of the
//! `PRODUCE_FORBID_CONFLICT` table and the provenance flags of the rules.
//!
//! # Algorithm
//!
//! 1. Build the enables graph: `producer -> consumer` for every non-zero
//!    dependency entry (self-loops ignored).
//! 2. Seed every member of a strongly connected component that has no
//!    incoming edge from outside the component. For a rule outside any cycle
//!    this means "nothing has to fire first"; a closed cycle sustains itself.
//! 3. Seed every rule forbidden by a mock rule: the mock stands for no real
//!    operation, so the forbid relation is void.
//! 4. Seed every rule that is reachable by construction.
//! 5. Propagate to a least fixpoint: a rule enabled by a reachable, non-mock
//!    producer is reachable. Mock rules never pass reachability on.

use crate::error::ReachabilityError;
use crate::rule::Rule;
use ggv_pairs::{CriticalPairs, PairCategory};
use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

/// Table whose entries mean "producer makes consumer eligible to fire"
pub const ENABLES: PairCategory = PairCategory::ProduceUseDependency;

/// Table whose entries mean "blocker's effect forbids blocked's effect"
pub const FORBIDS: PairCategory = PairCategory::ProduceForbidConflict;

/// Why a rule was reachable before any propagation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "reason")]
pub enum SeedReason {
    /// No producer outside the rule's own cycle
    Unconstrained,

    /// Forbidden only by a mock rule
    Nullified {
        /// The mock blocker
        blocker: String,
    },

    /// Flagged reachable by construction
    ByConstruction,
}

/// Reachable rules of one rule collection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReachabilityAnalysis {
    reachable: BTreeSet<String>,
    seeds: BTreeMap<String, SeedReason>,
}

impl ReachabilityAnalysis {
    /// Compute reachability of every rule
    ///
    /// # Errors
    /// - [`ReachabilityError::DuplicateRule`] if a name repeats in `all_rules`
    /// - [`ReachabilityError::MissingTable`] if the enables or forbids table is absent
    /// - [`ReachabilityError::Pairs`] if either table names a different rule set
    pub fn analyze(all_rules: &[Rule], pairs: &CriticalPairs) -> Result<Self, ReachabilityError> {
        let rules = index_rules(all_rules)?;

        let enables = pairs
            .get(ENABLES)
            .ok_or(ReachabilityError::MissingTable(ENABLES))?;
        let forbids = pairs
            .get(FORBIDS)
            .ok_or(ReachabilityError::MissingTable(FORBIDS))?;

        enables.check_rule_names(rules.keys().copied())?;
        forbids.check_rule_names(rules.keys().copied())?;

        let enables = enables.remove_self_loops();

        let mut graph: DiGraphMap<&str, u32> = DiGraphMap::new();
        for name in rules.keys().copied() {
            graph.add_node(name);
        }
        for (producer, consumer, weight) in enables.edges() {
            graph.add_edge(producer, consumer, weight);
        }

        let mut seeds: BTreeMap<String, SeedReason> = BTreeMap::new();

        for component in tarjan_scc(&graph) {
            let members: BTreeSet<&str> = component.iter().copied().collect();
            let has_external_producer = component.iter().any(|&member| {
                graph
                    .neighbors_directed(member, Direction::Incoming)
                    .any(|producer| !members.contains(&producer))
            });

            if !has_external_producer {
                for member in members {
                    seeds
                        .entry(member.to_string())
                        .or_insert(SeedReason::Unconstrained);
                }
            }
        }

        for (blocker, blocked, _) in forbids.edges() {
            if blocker != blocked && rules[blocker].mock {
                seeds
                    .entry(blocked.to_string())
                    .or_insert_with(|| SeedReason::Nullified {
                        blocker: blocker.to_string(),
                    });
            }
        }

        for rule in rules.values().filter(|r| r.reachable_by_construction) {
            seeds
                .entry(rule.name.clone())
                .or_insert(SeedReason::ByConstruction);
        }

        tracing::debug!(
            "Reachability seeds: {} of {} rules",
            seeds.len(),
            rules.len()
        );

        let mut reachable: BTreeSet<String> = seeds.keys().cloned().collect();
        let mut worklist: VecDeque<&str> = seeds.keys().map(String::as_str).collect();

        while let Some(name) = worklist.pop_front() {
            if !rules[name].transmits_reachability() {
                continue;
            }
            for consumer in graph.neighbors_directed(name, Direction::Outgoing) {
                if reachable.insert(consumer.to_string()) {
                    worklist.push_back(consumer);
                }
            }
        }

        tracing::debug!("Reachable rules: {} of {}", reachable.len(), rules.len());

        Ok(Self { reachable, seeds })
    }

    /// Check if a rule is reachable
    #[inline]
    #[must_use]
    pub fn is_reachable(&self, name: &str) -> bool {
        self.reachable.contains(name)
    }

    /// All reachable rule names
    #[inline]
    #[must_use]
    pub fn reachable(&self) -> &BTreeSet<String> {
        &self.reachable
    }

    /// Why a rule was seeded, if it was
    #[inline]
    #[must_use]
    pub fn seed_reason(&self, name: &str) -> Option<&SeedReason> {
        self.seeds.get(name)
    }
}

/// Decide whether `rule` can ever fire
///
/// # Errors
/// [`ReachabilityError::UnknownRule`] if `rule` is not in `all_rules`, plus
/// every structural error of [`ReachabilityAnalysis::analyze`].
pub fn is_reachable(
    rule: &Rule,
    all_rules: &[Rule],
    pairs: &CriticalPairs,
) -> Result<bool, ReachabilityError> {
    if !all_rules.iter().any(|r| r.name == rule.name) {
        return Err(ReachabilityError::UnknownRule(rule.name.clone()));
    }

    Ok(ReachabilityAnalysis::analyze(all_rules, pairs)?.is_reachable(&rule.name))
}

fn index_rules(all_rules: &[Rule]) -> Result<BTreeMap<&str, &Rule>, ReachabilityError> {
    let mut index = BTreeMap::new();
    for rule in all_rules {
        if index.insert(rule.name.as_str(), rule).is_some() {
            return Err(ReachabilityError::DuplicateRule(rule.name.clone()));
        }
    }
    Ok(index)
}

/// Producers enabling each rule, in name order
#[must_use]
pub fn producers_by_rule(pairs: &CriticalPairs) -> HashMap<&str, Vec<&str>> {
    let mut producers: HashMap<&str, Vec<&str>> = HashMap::new();
    if let Some(enables) = pairs.get(ENABLES) {
        for (producer, consumer, _) in enables.edges() {
            if producer != consumer {
                producers.entry(consumer).or_default().push(producer);
            }
        }
    }
    producers
}
