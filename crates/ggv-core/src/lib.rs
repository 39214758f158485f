//! GGV Core - critical-pair based verification
//!
//! Decides, for one version of a module's inferred interface, which
//! transformation rules can ever fire and which defects that implies:
//! - Decorates raw rules through a verifier's name patterns
//! - Computes rule reachability over the critical-pair tables
//! - Runs the warning rules over the resulting experiment
//! - Compares the warning sets of two versions
//!
//! # Example
//!
//! ```rust
//! use ggv_core::{Rule, VerificationGrammar, ExperimentData, ENABLES, FORBIDS};
//! use ggv_pairs::{CriticalPairs, CriticalPairTable};
//!
//! let names = ["login", "fetch"];
//! let pairs = CriticalPairs::new()
//!     .with_table(CriticalPairTable::with_rows(ENABLES, names).with_pair("login", "fetch", 1))
//!     .with_table(CriticalPairTable::with_rows(FORBIDS, names));
//! let grammar = VerificationGrammar::new(vec![
//!     Rule::new("login", "POST"),
//!     Rule::new("fetch", "GET"),
//! ]);
//!
//! let data = ExperimentData::new(grammar, &pairs).unwrap();
//! assert!(data.is_reachable("fetch"));
//! ```

#![warn(unreachable_pub)]
#![warn(missing_docs)]

// Core modules
pub mod analysis;
pub mod comparison;
pub mod config;
pub mod error;
pub mod experiment;
pub mod grammar;
pub mod reachability;
pub mod rule;
pub mod verifier;
pub mod warning;

// Re-exports for convenience
pub use analysis::{
    Report, RequirementResult, SummaryEntry, VerifyAnalysis, VerifyResults, VerifySummary,
};
pub use comparison::{compare_sets, compare_warnings, Comparison, WarningsComparison};
pub use config::{read_json, ConfigFormat, RulePattern, VerifierConfig};
pub use error::{ConfigError, ReachabilityError, VerifierError};
pub use experiment::ExperimentData;
pub use grammar::{AttributeElement, ModuleElement, ResourceElement, VerificationGrammar};
pub use reachability::{is_reachable, ReachabilityAnalysis, SeedReason, ENABLES, FORBIDS};
pub use rule::{Rule, RuleContents};
pub use verifier::{decorate_rules, ExperimentInput, RawGrammar, RawRule, Verifier};
pub use warning::{
    make_warnings, UnknownWarningCategory, Warning, WarningCategory, WarningRule, WarningRuleSet,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for running a verifier
    pub use crate::{
        compare_warnings, Comparison, ExperimentData, ExperimentInput, Rule, Verifier,
        VerifierConfig, VerifyAnalysis, Warning, WarningCategory,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
