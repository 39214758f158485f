//! GGV Critical Pairs
//!
//! Square relations over rule names, one per critical-pair category, as
//! computed by an external graph-transformation analysis.
//!
//! # Core Concepts
//!
//! - [`PairCategory`]: Closed set of conflict and dependency kinds
//! - [`CriticalPairTable`]: Weighted `row -> column` relation for one category
//! - [`CriticalPairs`]: All tables of one experiment, keyed by category
//!
//! # Example
//!
//! ```rust
//! use ggv_pairs::{CriticalPairTable, PairCategory};
//!
//! let table = CriticalPairTable::with_rows(PairCategory::ProduceUseDependency, ["a", "b"])
//!     .with_pair("a", "b", 1)
//!     .with_pair("b", "b", 2);
//!
//! let cleaned = table.remove_self_loops();
//! assert!(cleaned.has_pair("a", "b"));
//! assert!(!cleaned.has_pair("b", "b"));
//!
//! let flipped = cleaned.transpose();
//! assert!(flipped.transposed);
//! assert_eq!(flipped.weight("b", "a"), 1);
//! ```

#![warn(missing_docs)]

mod category;
mod error;
mod table;

pub use category::PairCategory;
pub use error::PairsError;
pub use table::{CriticalPairTable, CriticalPairs, PairRow};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
