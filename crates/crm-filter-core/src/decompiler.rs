//! Tree decompiler.
//!
//! Flattens a persisted [`FilterGroup`] back into the rows the filter panel
//! edits. Each leaf becomes one [`FilterCondition`] whose logical operator is
//! the `logic` of the group directly containing it.
//!
//! This is lossy. Nested structure with mixed AND/OR collapses, and multi-value
//! groups produced by the compiler come back as one row per value. Compiling
//! the result is equivalent in the values it tests, not in tree shape.

use tracing::{debug, trace};

use crate::logging;
use crate::models::{new_condition_id, FilterCondition, FilterGroup, FilterNode, LogicalOperator};

/// Flatten a filter tree into editor rows, depth-first.
pub fn decompile(group: &FilterGroup) -> Vec<FilterCondition> {
    let mut out = Vec::with_capacity(group.leaf_count());
    flatten_into(&group.rules, group.logic, &mut out);
    debug!(
        { logging::CONDITION_COUNT } = out.len(),
        depth = group.depth(),
        "Decompiled filter tree"
    );
    out
}

/// Flatten a single node. A bare rule takes `logic` as its operator.
pub fn decompile_node(node: &FilterNode, logic: LogicalOperator) -> Vec<FilterCondition> {
    let mut out = Vec::new();
    flatten_into(std::slice::from_ref(node), logic, &mut out);
    out
}

fn flatten_into(nodes: &[FilterNode], logic: LogicalOperator, out: &mut Vec<FilterCondition>) {
    for node in nodes {
        match node {
            FilterNode::Group(group) => flatten_into(&group.rules, group.logic, out),
            FilterNode::Rule(rule) => {
                trace!({ logging::FIELD_KEY } = %rule.field_key, { logging::CONDITION } = %rule.condition, %logic, "Flattened rule");
                out.push(FilterCondition {
                    id: new_condition_id(),
                    field: rule.field_key.clone(),
                    condition: rule.condition.clone(),
                    value: rule.editor_values(),
                    logical_operator: logic,
                });
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
