//! Critical-pair categories
//!
//! Provides [`PairCategory`], the closed set of relations the critical-pair
//! analysis reports between two rules.

use crate::error::PairsError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of critical pair between two rules
///
/// Dependencies mean the first rule's effect enables the second one,
/// conflicts mean the first rule's effect precludes the second one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PairCategory {
    /// First rule produces an element the second one uses
    ProduceUseDependency,

    /// First rule removes an edge that kept the second one from deleting a node
    RemoveDanglingDependency,

    /// First rule deletes an element forbidden by the second one
    DeleteForbidDependency,

    /// First rule changes an attribute the second one reads
    ChangeUseAttrDependency,

    /// First rule changes an attribute to a value no longer forbidden by the second one
    ChangeForbidAttrDependency,

    /// First rule deletes an element the second one uses
    DeleteUseConflict,

    /// First rule produces an edge that makes the second one's deletion dangling
    ProduceDanglingConflict,

    /// First rule produces an element forbidden by the second one
    ProduceForbidConflict,

    /// First rule changes an attribute the second one reads
    ChangeUseAttrConflict,

    /// First rule changes an attribute to a value forbidden by the second one
    ChangeForbidAttrConflict,
}

impl PairCategory {
    /// Every category, dependencies first
    pub const ALL: [PairCategory; 10] = [
        PairCategory::ProduceUseDependency,
        PairCategory::RemoveDanglingDependency,
        PairCategory::DeleteForbidDependency,
        PairCategory::ChangeUseAttrDependency,
        PairCategory::ChangeForbidAttrDependency,
        PairCategory::DeleteUseConflict,
        PairCategory::ProduceDanglingConflict,
        PairCategory::ProduceForbidConflict,
        PairCategory::ChangeUseAttrConflict,
        PairCategory::ChangeForbidAttrConflict,
    ];

    /// Check if this category is a dependency
    #[inline]
    #[must_use]
    pub fn is_dependency(self) -> bool {
        match self {
            Self::ProduceUseDependency
            | Self::RemoveDanglingDependency
            | Self::DeleteForbidDependency
            | Self::ChangeUseAttrDependency
            | Self::ChangeForbidAttrDependency => true,
            Self::DeleteUseConflict
            | Self::ProduceDanglingConflict
            | Self::ProduceForbidConflict
            | Self::ChangeUseAttrConflict
            | Self::ChangeForbidAttrConflict => false,
        }
    }

    /// Check if this category is a conflict
    #[inline]
    #[must_use]
    pub fn is_conflict(self) -> bool {
        !self.is_dependency()
    }

    /// Canonical name, as written by the critical-pair tool
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ProduceUseDependency => "PRODUCE_USE_DEPENDENCY",
            Self::RemoveDanglingDependency => "REMOVE_DANGLING_DEPENDENCY",
            Self::DeleteForbidDependency => "DELETE_FORBID_DEPENDENCY",
            Self::ChangeUseAttrDependency => "CHANGE_USE_ATTR_DEPENDENCY",
            Self::ChangeForbidAttrDependency => "CHANGE_FORBID_ATTR_DEPENDENCY",
            Self::DeleteUseConflict => "DELETE_USE_CONFLICT",
            Self::ProduceDanglingConflict => "PRODUCE_DANGLING_CONFLICT",
            Self::ProduceForbidConflict => "PRODUCE_FORBID_CONFLICT",
            Self::ChangeUseAttrConflict => "CHANGE_USE_ATTR_CONFLICT",
            Self::ChangeForbidAttrConflict => "CHANGE_FORBID_ATTR_CONFLICT",
        }
    }

    /// Short display code used in reports
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::ProduceUseDependency => "PUD",
            Self::RemoveDanglingDependency => "RDD",
            Self::DeleteForbidDependency => "DFD",
            Self::ChangeUseAttrDependency => "CUAD",
            Self::ChangeForbidAttrDependency => "CFAD",
            Self::DeleteUseConflict => "DUC",
            Self::ProduceDanglingConflict => "PDC",
            Self::ProduceForbidConflict => "PFC",
            Self::ChangeUseAttrConflict => "CUAC",
            Self::ChangeForbidAttrConflict => "CFAC",
        }
    }
}

impl fmt::Display for PairCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PairCategory {
    type Err = PairsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| PairsError::UnknownCategory(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_one_classification_holds() {
        for category in PairCategory::ALL {
            assert_ne!(category.is_dependency(), category.is_conflict(), "{category}");
        }
    }

    #[test]
    fn five_of_each() {
        let dependencies = PairCategory::ALL.iter().filter(|c| c.is_dependency()).count();
        assert_eq!(dependencies, 5);
        assert_eq!(PairCategory::ALL.len() - dependencies, 5);
    }

    #[test]
    fn name_round_trips_through_from_str() {
        for category in PairCategory::ALL {
            assert_eq!(category.as_str().parse::<PairCategory>(), Ok(category));
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = "PRODUCE_USE".parse::<PairCategory>().unwrap_err();
        assert_eq!(err, PairsError::UnknownCategory("PRODUCE_USE".to_string()));
    }

    #[test]
    fn codes_are_unique() {
        let mut codes: Vec<_> = PairCategory::ALL.iter().map(|c| c.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), PairCategory::ALL.len());
    }

    #[test]
    fn serde_uses_canonical_names() {
        let json = serde_json::to_string(&PairCategory::ChangeUseAttrConflict).unwrap();
        assert_eq!(json, "\"CHANGE_USE_ATTR_CONFLICT\"");

        let parsed: PairCategory = serde_json::from_str("\"PRODUCE_FORBID_CONFLICT\"").unwrap();
        assert_eq!(parsed, PairCategory::ProduceForbidConflict);
    }
}
