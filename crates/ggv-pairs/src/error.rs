//! Error types for critical-pair tables

use crate::category::PairCategory;

/// Structural errors in critical-pair input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PairsError {
    /// Category name not known to the analysis
    #[error("unknown critical pair category: '{0}'")]
    UnknownCategory(String),

    /// Table rule names differ from the analyzed rule set
    #[error("{kind} table does not match the rule set (missing: {missing:?}, unexpected: {unexpected:?})")]
    RuleMismatch {
        /// Category of the offending table
        kind: PairCategory,
        /// Rules of the analysis absent from the table
        missing: Vec<String>,
        /// Rules named by the table but unknown to the analysis
        unexpected: Vec<String>,
    },
}
