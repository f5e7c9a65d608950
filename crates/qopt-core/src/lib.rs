//! # qopt-core: Join Plan Representation for Cost-Based Optimization
//!
//! This crate implements the plan-tree data model used by the join-order
//! optimizer of a distributed SQL engine. During join enumeration the
//! optimizer constructs and discards an enormous number of candidate plans,
//! so the model comes in two parallel representations:
//!
//! - **Internal nodes** (`InternalNode`) are cheap, exploration-time nodes.
//!   They borrow join-key sequences from the query graph that owns the join
//!   conditions instead of copying them for every candidate, and they share
//!   sub-plans between candidate parents via reference counting.
//! - **External nodes** (`PlanNode`) own all of their data. The winning plan
//!   is materialized into this form before the query graph is torn down and
//!   survives for the rest of planning and execution.
//!
//! ## Module Overview
//!
//! - **`stats`**: The statistics value carried by every plan node (row count,
//!   size, per-column distinct counts).
//! - **`join`**: Join metadata types -- join-key columns, join kinds, and
//!   join algorithm choices.
//! - **`node`**: The two node hierarchies and `convert_from_internal`, the
//!   recursive materialization from the internal to the external form.
//!
//! The crate performs no I/O and has no opinion on how join orders are chosen
//! or how statistics are computed; it only defines the representation those
//! algorithms operate on.

pub mod join;
pub mod node;
pub mod stats;

pub use join::{JoinAlgo, JoinColumn, JoinKind};
pub use node::{
    convert_from_internal, make_join_internal, InternalJoinNode, InternalNode, JoinNode, NodeKind,
    PlanNode, RelNode,
};
pub use stats::{ColumnStatistics, Statistics};
