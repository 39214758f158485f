//! Error types for GGV Core
//!
//! Provides error handling for:
//! - Structural input defects (reachability preconditions)
//! - Verifier configuration defects (rule patterns)
//! - Configuration loading

use ggv_pairs::{PairCategory, PairsError};
use std::path::PathBuf;

/// Structural errors detected before reachability is computed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReachabilityError {
    /// Queried rule is not part of the rule collection
    #[error("rule '{0}' is not part of the analyzed rule set")]
    UnknownRule(String),

    /// Rule name appears twice in the rule collection
    #[error("rule '{0}' appears more than once in the analyzed rule set")]
    DuplicateRule(String),

    /// Required critical-pair table was not supplied
    #[error("missing {0} table")]
    MissingTable(PairCategory),

    /// Table does not enumerate exactly the analyzed rules
    #[error(transparent)]
    Pairs(#[from] PairsError),
}

/// Errors while decorating rules and verifying an experiment
#[derive(Debug, thiserror::Error)]
pub enum VerifierError {
    /// Rule name matches no configured pattern
    #[error("verifier '{verifier}': rule '{rule}' matches no pattern")]
    UnmatchedRule {
        /// Verifier name
        verifier: String,
        /// Offending rule name
        rule: String,
    },

    /// Rule name appears twice in the raw grammar
    #[error("verifier '{verifier}': duplicate rule '{rule}'")]
    DuplicateRule {
        /// Verifier name
        verifier: String,
        /// Duplicated rule name
        rule: String,
    },

    /// Configured pattern is not a valid regular expression
    #[error("verifier '{verifier}': invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        /// Verifier name
        verifier: String,
        /// Pattern name
        pattern: String,
        /// Regex compilation error
        #[source]
        source: regex::Error,
    },

    /// Structural input defect
    #[error("structural error: {0}")]
    Structure(#[from] ReachabilityError),
}

/// Errors while loading configuration and experiment files
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error during file read
    #[error("io error reading {path}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// File content could not be deserialized
    #[error("failed to parse {path}: {message}")]
    Parse {
        /// File path
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// File extension is not a supported format
    #[error("unsupported configuration format: {0}")]
    UnsupportedFormat(PathBuf),
}

impl ConfigError {
    /// Create parse error for path
    pub fn parse(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Create IO error for path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
