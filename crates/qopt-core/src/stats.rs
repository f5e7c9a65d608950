//! # Statistics Values
//!
//! Every plan node carries a `Statistics` value describing the estimated
//! cardinality of the relation or join result it produces. For base relations
//! the numbers come from the statistics-aggregation tablet of the table's
//! domain (refreshed via the ANALYZE path in `qopt-analyze`); for joins they
//! are filled in by the cost model during enumeration.
//!
//! This crate treats statistics as opaque payload: nodes copy the value
//! around but never derive or recompute it. Selectivity formulas and cost
//! computation live with the enumeration algorithm, not here.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Cardinality and size estimates for a relation or a join result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Estimated number of output rows.
    pub row_count: f64,
    /// Estimated total output size in bytes.
    pub total_size_bytes: f64,
    /// Per-column statistics keyed by column name.
    pub column_stats: HashMap<String, ColumnStatistics>,
}

impl Statistics {
    pub fn new(row_count: f64, total_size_bytes: f64) -> Self {
        Self {
            row_count,
            total_size_bytes,
            column_stats: HashMap::new(),
        }
    }

    pub fn with_column(mut self, name: impl Into<String>, stats: ColumnStatistics) -> Self {
        self.column_stats.insert(name.into(), stats);
        self
    }
}

/// Per-column statistics used by the cost model for selectivity estimation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStatistics {
    /// Number of distinct values (NDV).
    pub distinct_count: f64,
    /// Fraction of rows that are NULL, in `[0.0, 1.0]`.
    pub null_fraction: f64,
    /// Average size of a single value in bytes.
    pub avg_value_size: f64,
}

impl ColumnStatistics {
    pub fn new(distinct_count: f64, null_fraction: f64) -> Self {
        Self {
            distinct_count,
            null_fraction,
            avg_value_size: 8.0,
        }
    }
}
