//! # Join Metadata Types
//!
//! Join conditions are represented as two ordered sequences of `JoinColumn`s,
//! one per side: the i-th left key is compared against the i-th right key.
//! The sequences themselves are owned by the query graph during enumeration;
//! internal join nodes only borrow them (see `node`).

use serde::{Deserialize, Serialize};
use std::fmt;

/// One side of an equi-join key: a column of a named relation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JoinColumn {
    /// Relation label (table name or alias) the column belongs to.
    pub relation: String,
    /// Column name.
    pub column: String,
}

impl JoinColumn {
    pub fn new(relation: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            relation: relation.into(),
            column: column.into(),
        }
    }
}

impl fmt::Display for JoinColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.relation, self.column)
    }
}

/// SQL join kinds.
///
/// The kind constrains which reorderings are valid: only Inner and Cross
/// joins commute freely, while Left/Semi/Anti joins fix their sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JoinKind {
    /// Inner join: only matching rows from both sides.
    Inner,
    /// Left outer join: all rows from left, matching from right (or NULLs).
    Left,
    /// Right outer join: all rows from right, matching from left (or NULLs).
    Right,
    /// Full outer join: all rows from both sides, NULLs where no match.
    Full,
    /// Semi join: left rows that have at least one match on the right.
    Semi,
    /// Anti join: left rows that have no match on the right.
    Anti,
    /// Cross join: Cartesian product (no condition).
    Cross,
}

/// Physical join algorithm chosen for a join node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JoinAlgo {
    /// No algorithm chosen yet (candidate costed at the logical level).
    Undecided,
    /// Hash join: build on one side, probe with the other.
    Hash,
    /// Merge join over two sorted inputs.
    Merge,
    /// Nested loop join, the universal fallback.
    NestedLoop,
}
