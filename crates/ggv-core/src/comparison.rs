//! Warning set comparison
//!
//! Classifies how the warnings of two analyzed versions relate, so callers
//! can tell whether a candidate version still flags the defects of its
//! baseline.

use crate::analysis::VerifyAnalysis;
use crate::warning::Warning;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Relationship of two sets under an element equality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparison {
    /// Same elements
    Equal,
    /// First set strictly contains the second
    ProperSuperset,
    /// First set is strictly contained in the second
    ProperSubset,
    /// Overlapping, neither contains the other
    Different,
    /// No common element
    Disjunct,
}

impl Comparison {
    /// Candidate flags at least what the baseline flags
    #[inline]
    #[must_use]
    pub fn is_non_regressive_candidate(self) -> bool {
        matches!(self, Self::Equal | Self::ProperSuperset)
    }

    /// Baseline flags nothing the earlier version did not
    #[inline]
    #[must_use]
    pub fn is_non_regressive_baseline(self) -> bool {
        matches!(self, Self::Equal | Self::ProperSubset)
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Equal => "Equal",
            Self::ProperSuperset => "ProperSuperset",
            Self::ProperSubset => "ProperSubset",
            Self::Different => "Different",
            Self::Disjunct => "Disjunct",
        };
        f.write_str(name)
    }
}

/// Compare `a` against `b` under `eq`
///
/// Two empty sets are [`Comparison::Equal`]; an empty side is otherwise a
/// proper subset (or superset) of the other.
pub fn compare_sets<T, F>(a: &[T], b: &[T], eq: F) -> Comparison
where
    F: Fn(&T, &T) -> bool,
{
    let contains = |set: &[T], item: &T| set.iter().any(|other| eq(item, other));

    let a_in_b = a.iter().all(|x| contains(b, x));
    let b_in_a = b.iter().all(|y| contains(a, y));
    if a_in_b && b_in_a {
        return Comparison::Equal;
    }

    if a.is_empty() {
        return Comparison::ProperSubset;
    }
    if b.is_empty() {
        return Comparison::ProperSuperset;
    }

    let a = distinct(a, &eq);
    let b_len = distinct(b, &eq).len();
    let common = a.iter().filter(|x| contains(b, **x)).count();
    if common == 0 {
        Comparison::Disjunct
    } else if common == a.len() {
        Comparison::ProperSubset
    } else if common == b_len {
        Comparison::ProperSuperset
    } else {
        Comparison::Different
    }
}

/// First occurrence of every element under `eq`
fn distinct<'a, T, F>(set: &'a [T], eq: &F) -> Vec<&'a T>
where
    F: Fn(&T, &T) -> bool,
{
    let mut out: Vec<&T> = Vec::with_capacity(set.len());
    for item in set {
        if !out.iter().any(|seen| eq(item, seen)) {
            out.push(item);
        }
    }
    out
}

/// Outcome of comparing two analyzed versions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningsComparison {
    /// Experiment compared from
    pub from: String,
    /// Experiment compared to
    pub to: String,
    /// Classification of `from` against `to`
    pub comparison: Comparison,
}

/// Compare the extra warnings of two analyses
#[must_use]
pub fn compare_warnings(from: &VerifyAnalysis, to: &VerifyAnalysis) -> WarningsComparison {
    let comparison = compare_sets(
        &from.results.extra_warnings.data,
        &to.results.extra_warnings.data,
        |a: &Warning, b: &Warning| a == b,
    );
    tracing::debug!("{} vs {}: {}", from.experiment, to.experiment, comparison);

    WarningsComparison {
        from: from.experiment.clone(),
        to: to.experiment.clone(),
        comparison,
    }
}
