//! Critical-pair tables and the algebra over them
//!
//! Provides [`CriticalPairTable`] for one category and [`CriticalPairs`] for
//! all categories of one experiment. Every operation returns a fresh value;
//! tables are never mutated in place once handed to an analysis.

use crate::category::PairCategory;
use crate::error::PairsError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Column name -> multiplicity for one row
pub type PairRow = BTreeMap<String, u32>;

/// Square relation over rule names for one pair category
///
/// A weight of `0` and an omitted entry are equivalent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriticalPairTable {
    /// Pair category of this table
    #[serde(rename = "type")]
    pub kind: PairCategory,

    /// Whether rows and columns are swapped relative to the tool's output
    #[serde(default)]
    pub transposed: bool,

    /// Row rule -> column rule -> multiplicity
    #[serde(default)]
    pub pairs: BTreeMap<String, PairRow>,
}

impl CriticalPairTable {
    /// Create empty table
    #[inline]
    #[must_use]
    pub fn new(kind: PairCategory) -> Self {
        Self {
            kind,
            transposed: false,
            pairs: BTreeMap::new(),
        }
    }

    /// Create table with an empty row for every rule
    #[must_use]
    pub fn with_rows<I, S>(kind: PairCategory, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind,
            transposed: false,
            pairs: names
                .into_iter()
                .map(|name| (name.into(), PairRow::new()))
                .collect(),
        }
    }

    /// Add a pair
    #[inline]
    #[must_use]
    pub fn with_pair(
        mut self,
        row: impl Into<String>,
        column: impl Into<String>,
        weight: u32,
    ) -> Self {
        self.insert(row, column, weight);
        self
    }

    /// Set the multiplicity of `row -> column`
    pub fn insert(&mut self, row: impl Into<String>, column: impl Into<String>, weight: u32) {
        self.pairs
            .entry(row.into())
            .or_default()
            .insert(column.into(), weight);
    }

    /// Multiplicity of `row -> column`, `0` when absent
    #[must_use]
    pub fn weight(&self, row: &str, column: &str) -> u32 {
        self.pairs
            .get(row)
            .and_then(|columns| columns.get(column))
            .copied()
            .unwrap_or(0)
    }

    /// Check if `row -> column` has a non-zero multiplicity
    #[inline]
    #[must_use]
    pub fn has_pair(&self, row: &str, column: &str) -> bool {
        self.weight(row, column) > 0
    }

    /// Non-zero entries as `(row, column, weight)`, ordered by row then column
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, u32)> + '_ {
        self.pairs.iter().flat_map(|(row, columns)| {
            columns
                .iter()
                .filter(|(_, weight)| **weight > 0)
                .map(move |(column, weight)| (row.as_str(), column.as_str(), *weight))
        })
    }

    /// Rows with a non-zero entry towards `column`
    pub fn predecessors<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(_, columns)| columns.get(column).is_some_and(|w| *w > 0))
            .map(|(row, _)| row.as_str())
    }

    /// Check if the table holds no non-zero entry
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges().next().is_none()
    }

    /// Rule names known to this table: every row plus every non-zero column
    #[must_use]
    pub fn rule_names(&self) -> BTreeSet<&str> {
        self.pairs
            .keys()
            .map(String::as_str)
            .chain(self.edges().map(|(_, column, _)| column))
            .collect()
    }

    /// Swap rows and columns
    ///
    /// Every rule name of the input keeps a row in the result, so transposing
    /// a table whose columns are all rows is an involution.
    #[must_use]
    pub fn transpose(&self) -> Self {
        let mut pairs: BTreeMap<String, PairRow> = self
            .pairs
            .keys()
            .map(|row| (row.clone(), PairRow::new()))
            .collect();

        for (row, columns) in &self.pairs {
            for (column, weight) in columns {
                pairs
                    .entry(column.clone())
                    .or_default()
                    .insert(row.clone(), *weight);
            }
        }

        Self {
            kind: self.kind,
            transposed: !self.transposed,
            pairs,
        }
    }

    /// Table in transposed orientation
    ///
    /// Returns a copy when already transposed, otherwise [`transpose`](Self::transpose).
    #[must_use]
    pub fn get_transposed(&self) -> Self {
        if self.transposed {
            self.clone()
        } else {
            self.transpose()
        }
    }

    /// Drop every entry whose row equals its column
    #[must_use]
    pub fn remove_self_loops(&self) -> Self {
        let pairs = self
            .pairs
            .iter()
            .map(|(row, columns)| {
                let kept = columns
                    .iter()
                    .filter(|(column, _)| *column != row)
                    .map(|(column, weight)| (column.clone(), *weight))
                    .collect();
                (row.clone(), kept)
            })
            .collect();

        Self {
            kind: self.kind,
            transposed: self.transposed,
            pairs,
        }
    }

    /// Check that the table names exactly the `expected` rules
    ///
    /// # Errors
    /// [`PairsError::RuleMismatch`] listing rules missing from the table and
    /// rules the table names without being expected.
    pub fn check_rule_names<'a, I>(&self, expected: I) -> Result<(), PairsError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let expected: BTreeSet<&str> = expected.into_iter().collect();
        let actual = self.rule_names();

        if expected == actual {
            return Ok(());
        }

        Err(PairsError::RuleMismatch {
            kind: self.kind,
            missing: expected.difference(&actual).map(|s| (*s).to_string()).collect(),
            unexpected: actual.difference(&expected).map(|s| (*s).to_string()).collect(),
        })
    }
}

/// All critical-pair tables of one experiment
///
/// Serialized as a list of tables; each table carries its own category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CriticalPairTable>", into = "Vec<CriticalPairTable>")]
pub struct CriticalPairs {
    tables: BTreeMap<PairCategory, CriticalPairTable>,
}

impl CriticalPairs {
    /// Create empty collection
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table, replacing any table of the same category
    #[inline]
    #[must_use]
    pub fn with_table(mut self, table: CriticalPairTable) -> Self {
        self.insert(table);
        self
    }

    /// Add a table, returning the replaced table of the same category
    pub fn insert(&mut self, table: CriticalPairTable) -> Option<CriticalPairTable> {
        self.tables.insert(table.kind, table)
    }

    /// Table of one category
    #[inline]
    #[must_use]
    pub fn get(&self, kind: PairCategory) -> Option<&CriticalPairTable> {
        self.tables.get(&kind)
    }

    /// Check if a table of this category is present
    #[inline]
    #[must_use]
    pub fn contains(&self, kind: PairCategory) -> bool {
        self.tables.contains_key(&kind)
    }

    /// Iterate tables in category order
    pub fn iter(&self) -> impl Iterator<Item = &CriticalPairTable> {
        self.tables.values()
    }

    /// Number of tables
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Check if no table is present
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Dependency tables only
    #[must_use]
    pub fn dependencies(&self) -> Self {
        self.filtered(PairCategory::is_dependency)
    }

    /// Conflict tables only
    #[must_use]
    pub fn conflicts(&self) -> Self {
        self.filtered(PairCategory::is_conflict)
    }

    /// Apply [`CriticalPairTable::remove_self_loops`] to every table
    #[must_use]
    pub fn remove_self_loops(&self) -> Self {
        self.iter().map(CriticalPairTable::remove_self_loops).collect()
    }

    fn filtered(&self, keep: impl Fn(PairCategory) -> bool) -> Self {
        self.iter().filter(|t| keep(t.kind)).cloned().collect()
    }
}

impl FromIterator<CriticalPairTable> for CriticalPairs {
    fn from_iter<I: IntoIterator<Item = CriticalPairTable>>(iter: I) -> Self {
        Self {
            tables: iter.into_iter().map(|t| (t.kind, t)).collect(),
        }
    }
}

impl Extend<CriticalPairTable> for CriticalPairs {
    fn extend<I: IntoIterator<Item = CriticalPairTable>>(&mut self, iter: I) {
        for table in iter {
            self.insert(table);
        }
    }
}

impl From<Vec<CriticalPairTable>> for CriticalPairs {
    fn from(tables: Vec<CriticalPairTable>) -> Self {
        tables.into_iter().collect()
    }
}

impl From<CriticalPairs> for Vec<CriticalPairTable> {
    fn from(pairs: CriticalPairs) -> Self {
        pairs.tables.into_values().collect()
    }
}
