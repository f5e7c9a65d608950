//! # Plan Node Hierarchies
//!
//! Two closed node hierarchies with identical shape:
//!
//! - `InternalNode` is the exploration-time form. Join enumeration builds one
//!   internal join node per candidate considered, so construction must be
//!   cheap: children are shared via `Arc` (many candidate parents over the
//!   same sub-plan form a DAG, not a tree) and the join-key sequences are
//!   borrowed from the query graph that owns the join conditions. The `'g`
//!   lifetime ties every internal node to that graph.
//! - `PlanNode` is the owned, external form. Once enumeration picks a winner,
//!   `convert_from_internal` copies the reachable subtree into `PlanNode`s
//!   that carry their own key sequences and outlive the query graph.
//!
//! An internal tree may embed subtrees that were already finalized by a
//! separate optimization pass (non-orderable join branches are optimized on
//! their own). Such subtrees appear as `InternalNode::Materialized` and are
//! returned unchanged by the conversion instead of being materialized twice.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::join::{JoinAlgo, JoinColumn, JoinKind};
use crate::stats::Statistics;

/// Discriminant shared by both hierarchies, for dispatch without
/// inspecting variant payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Rel,
    Join,
}

/// Leaf node: a base relation with its current statistics.
///
/// The same struct is used by both hierarchies -- a relation leaf owns its
/// label and statistics in either form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelNode {
    /// Human-readable source label (table name or alias).
    pub label: String,
    pub stats: Statistics,
}

impl RelNode {
    pub fn new(label: impl Into<String>, stats: Statistics) -> Self {
        Self {
            label: label.into(),
            stats,
        }
    }
}

/// Exploration-time plan node.
///
/// Valid only while the query graph owning the referenced join conditions is
/// alive; the `'g` lifetime enforces this. Internal nodes are created in bulk
/// during enumeration and dropped in bulk when the exploration scope ends --
/// only the winner survives, via [`convert_from_internal`].
#[derive(Debug)]
pub enum InternalNode<'g> {
    Rel(RelNode),
    Join(InternalJoinNode<'g>),
    /// A subtree already finalized by a separate optimization pass.
    /// Conversion returns it as-is.
    Materialized(Arc<PlanNode>),
}

impl InternalNode<'_> {
    pub fn kind(&self) -> NodeKind {
        match self {
            InternalNode::Rel(_) => NodeKind::Rel,
            InternalNode::Join(_) => NodeKind::Join,
            InternalNode::Materialized(node) => node.kind(),
        }
    }

    pub fn stats(&self) -> &Statistics {
        match self {
            InternalNode::Rel(rel) => &rel.stats,
            InternalNode::Join(join) => &join.stats,
            InternalNode::Materialized(node) => node.stats(),
        }
    }
}

/// Exploration-time join node.
///
/// Does not own its join-key sequences: `left_keys` and `right_keys` point
/// into condition data owned by the surrounding query graph, so constructing
/// a candidate never copies predicate data. Children are shared -- the same
/// sub-plan instance may sit under many candidate parents.
#[derive(Debug)]
pub struct InternalJoinNode<'g> {
    pub left: Arc<InternalNode<'g>>,
    pub right: Arc<InternalNode<'g>>,
    /// Borrowed view into the query graph's join-condition data.
    pub left_keys: &'g [JoinColumn],
    /// Borrowed view into the query graph's join-condition data.
    pub right_keys: &'g [JoinColumn],
    pub kind: JoinKind,
    pub algo: JoinAlgo,
    /// At most one matching row per key on the left side.
    pub left_any: bool,
    /// At most one matching row per key on the right side.
    pub right_any: bool,
    pub stats: Statistics,
}

/// Owned, self-contained plan node.
///
/// Safe to retain for arbitrarily long lifetimes, independent of any
/// exploration context. Children are shared via `Arc` so a finalized subtree
/// can appear under more than one parent without copying.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlanNode {
    Rel(RelNode),
    Join(JoinNode),
}

impl PlanNode {
    pub fn kind(&self) -> NodeKind {
        match self {
            PlanNode::Rel(_) => NodeKind::Rel,
            PlanNode::Join(_) => NodeKind::Join,
        }
    }

    pub fn stats(&self) -> &Statistics {
        match self {
            PlanNode::Rel(rel) => &rel.stats,
            PlanNode::Join(join) => &join.stats,
        }
    }

    /// Render the plan tree with the given starting indentation.
    pub fn display(&self, indent: usize) -> String {
        let pad = "  ".repeat(indent);
        match self {
            PlanNode::Rel(rel) => {
                format!("{pad}Rel {} (rows={:.0})\n", rel.label, rel.stats.row_count)
            }
            PlanNode::Join(join) => {
                let mut out = format!(
                    "{pad}{:?}Join[{:?}] ON {} (rows={:.0})\n",
                    join.kind,
                    join.algo,
                    join.condition_display(),
                    join.stats.row_count
                );
                out.push_str(&join.left.display(indent + 1));
                out.push_str(&join.right.display(indent + 1));
                out
            }
        }
    }
}

impl fmt::Display for PlanNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display(0))
    }
}

/// Owned join node: the external mirror of [`InternalJoinNode`] with the key
/// sequences copied into owned storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinNode {
    pub left: Arc<PlanNode>,
    pub right: Arc<PlanNode>,
    pub left_keys: Vec<JoinColumn>,
    pub right_keys: Vec<JoinColumn>,
    pub kind: JoinKind,
    pub algo: JoinAlgo,
    pub left_any: bool,
    pub right_any: bool,
    pub stats: Statistics,
}

impl JoinNode {
    fn condition_display(&self) -> String {
        self.left_keys
            .iter()
            .zip(self.right_keys.iter())
            .map(|(l, r)| format!("{l} = {r}"))
            .collect::<Vec<_>>()
            .join(" AND ")
    }
}

/// Construct a new internal join node over two existing sub-plans.
///
/// The children are stored as additional owners (no subtree copy) and the
/// key sequences are stored by reference -- callers must keep the query graph
/// that owns them alive for as long as the returned node is used. No
/// validation beyond structural construction is performed; the statistics
/// value is stored as given.
#[allow(clippy::too_many_arguments)]
pub fn make_join_internal<'g>(
    stats: Statistics,
    left: Arc<InternalNode<'g>>,
    right: Arc<InternalNode<'g>>,
    left_keys: &'g [JoinColumn],
    right_keys: &'g [JoinColumn],
    kind: JoinKind,
    algo: JoinAlgo,
    left_any: bool,
    right_any: bool,
) -> Arc<InternalNode<'g>> {
    // The two sides of a join are never the same node instance, although the
    // same instance may be shared as a child of different join nodes.
    debug_assert!(
        !Arc::ptr_eq(&left, &right),
        "join children must be distinct node instances"
    );
    Arc::new(InternalNode::Join(InternalJoinNode {
        left,
        right,
        left_keys,
        right_keys,
        kind,
        algo,
        left_any,
        right_any,
        stats,
    }))
}

/// Recursively materialize an internal tree into owned external nodes.
///
/// The conversion is purely structural: labels, statistics, kinds,
/// algorithms, and flags are copied verbatim, and the borrowed key sequences
/// become owned copies. Nothing is recomputed.
///
/// A `Materialized` subtree (finalized by a separate pass) is returned
/// unchanged, keeping its referential identity. Converting a sub-plan that is
/// shared between two internal parents via two separate calls produces two
/// independent external subtrees -- structural sharing is preserved,
/// referential sharing is not.
pub fn convert_from_internal(internal: &InternalNode<'_>) -> Arc<PlanNode> {
    match internal {
        InternalNode::Rel(rel) => Arc::new(PlanNode::Rel(rel.clone())),
        InternalNode::Materialized(finalized) => Arc::clone(finalized),
        InternalNode::Join(join) => {
            let left = convert_from_internal(&join.left);
            let right = convert_from_internal(&join.right);
            Arc::new(PlanNode::Join(JoinNode {
                left,
                right,
                left_keys: join.left_keys.to_vec(),
                right_keys: join.right_keys.to_vec(),
                kind: join.kind,
                algo: join.algo,
                left_any: join.left_any,
                right_any: join.right_any,
                stats: join.stats.clone(),
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rel(label: &str, rows: f64) -> Arc<InternalNode<'static>> {
        Arc::new(InternalNode::Rel(RelNode::new(
            label,
            Statistics::new(rows, rows * 100.0),
        )))
    }

    #[test]
    fn kind_matches_variant() {
        let leaf = rel("orders", 1000.0);
        assert_eq!(leaf.kind(), NodeKind::Rel);

        let keys = vec![JoinColumn::new("orders", "o_custkey")];
        let join = make_join_internal(
            Statistics::new(10.0, 1000.0),
            leaf,
            rel("customer", 100.0),
            &keys,
            &keys,
            JoinKind::Inner,
            JoinAlgo::Hash,
            false,
            false,
        );
        assert_eq!(join.kind(), NodeKind::Join);
    }

    #[test]
    fn materialized_kind_delegates_to_inner() {
        let ext = Arc::new(PlanNode::Rel(RelNode::new(
            "nation",
            Statistics::new(25.0, 2500.0),
        )));
        let wrapped = InternalNode::Materialized(ext);
        assert_eq!(wrapped.kind(), NodeKind::Rel);
    }

    #[test]
    fn make_join_internal_shares_children() {
        let shared = rel("lineitem", 6_000_000.0);
        let keys = vec![JoinColumn::new("lineitem", "l_orderkey")];

        let a = make_join_internal(
            Statistics::new(1.0, 100.0),
            Arc::clone(&shared),
            rel("orders", 1_500_000.0),
            &keys,
            &keys,
            JoinKind::Inner,
            JoinAlgo::Undecided,
            false,
            false,
        );
        let b = make_join_internal(
            Statistics::new(1.0, 100.0),
            Arc::clone(&shared),
            rel("part", 200_000.0),
            &keys,
            &keys,
            JoinKind::Inner,
            JoinAlgo::Undecided,
            false,
            false,
        );

        // Both candidates plus the local binding own the same leaf instance.
        assert_eq!(Arc::strong_count(&shared), 3);
        drop(a);
        drop(b);
        assert_eq!(Arc::strong_count(&shared), 1);
    }

    #[test]
    fn display_renders_tree() {
        let keys_l = vec![JoinColumn::new("orders", "o_custkey")];
        let keys_r = vec![JoinColumn::new("customer", "c_custkey")];
        let join = make_join_internal(
            Statistics::new(1500.0, 150_000.0),
            rel("orders", 1_500_000.0),
            rel("customer", 150_000.0),
            &keys_l,
            &keys_r,
            JoinKind::Inner,
            JoinAlgo::Hash,
            false,
            true,
        );
        let plan = convert_from_internal(&join);
        let text = plan.to_string();
        assert!(text.contains("InnerJoin[Hash] ON orders.o_custkey = customer.c_custkey"));
        assert!(text.contains("Rel orders"));
        assert!(text.contains("Rel customer"));
    }
}
