//! Condition compiler.
//!
//! Turns flat [`FilterCondition`] rows into filter tree nodes. The compiler is
//! permissive: rows without values are dropped, and operators it cannot expand
//! fall back to their first value. It never returns an error.
//!
//! # Encoding by category
//!
//! | Category | Output |
//! |----------|--------|
//! | NoValue  | rule with `value: ""` |
//! | Range    | rule with `values: [a, b]` and `value: "a,b"` |
//! | List     | rule with `values` and comma-joined `value` |
//! | OrMulti  | one value: rule; several: `OR` group of rules |
//! | AndMulti | one value: rule; several: `AND` group of rules |
//! | Single   | rule with the first value |

use tracing::{debug, trace};

use crate::defaults::{NO_VALUE, VALUE_SEPARATOR};
use crate::logging;
use crate::models::{FilterCondition, FilterGroup, FilterNode, FilterRule};
use crate::operators::OperatorCategory;

/// Compile one condition, appending zero or one node to `out`.
pub fn compile_condition(condition: &FilterCondition, out: &mut Vec<FilterNode>) {
    let field = condition.field.as_str();
    let op = &condition.condition;
    let category = op.category();

    if category == OperatorCategory::NoValue {
        trace!({ logging::FIELD_KEY } = field, { logging::CONDITION } = %op, "No-value rule");
        out.push(FilterRule::single(field, op.clone(), NO_VALUE).into());
        return;
    }

    let values = &condition.value;
    if values.is_empty() {
        debug!({ logging::FIELD_KEY } = field, { logging::CONDITION } = %op, "Dropping condition without values");
        return;
    }

    if !op.is_known() {
        debug!({ logging::FIELD_KEY } = field, { logging::CONDITION } = %op, "Unknown operator, compiling as single-value");
    }

    match category {
        OperatorCategory::Range => {
            let a = values[0].clone();
            let b = values.get(1).cloned().unwrap_or_default();
            let joined = [a.as_str(), b.as_str()]
                .iter()
                .filter(|s| !s.is_empty())
                .copied()
                .collect::<Vec<_>>()
                .join(VALUE_SEPARATOR);
            out.push(FilterRule::multi(field, op.clone(), vec![a, b], joined).into());
        }
        OperatorCategory::List => {
            let joined = values.join(VALUE_SEPARATOR);
            out.push(FilterRule::multi(field, op.clone(), values.clone(), joined).into());
        }
        _ if values.len() == 1 => {
            out.push(FilterRule::single(field, op.clone(), values[0].clone()).into());
        }
        _ => match op.multi_value_logic() {
            Some(logic) => {
                let rules = values
                    .iter()
                    .map(|v| FilterRule::single(field, op.clone(), v.clone()).into())
                    .collect();
                trace!({ logging::FIELD_KEY } = field, { logging::CONDITION } = %op, { logging::VALUE_COUNT } = values.len(), %logic, "Expanded multi-value condition");
                out.push(FilterGroup::new(logic, rules).into());
            }
            None => {
                debug!(
                    { logging::FIELD_KEY } = field,
                    { logging::CONDITION } = %op,
                    { logging::VALUE_COUNT } = values.len(),
                    "Operator does not expand multiple values, keeping the first"
                );
                out.push(FilterRule::single(field, op.clone(), values[0].clone()).into());
            }
        },
    }
}

/// Compile a list of conditions into nodes, in input order.
pub fn compile_nodes(conditions: &[FilterCondition]) -> Vec<FilterNode> {
    let mut out = Vec::with_capacity(conditions.len());
    for condition in conditions {
        compile_condition(condition, &mut out);
    }
    out
}

/// Compile the advanced filter rows into one group.
///
/// The group's logic is the first active row's `logical_operator`; rows that
/// compile to nothing never decide it, and later rows' operators are ignored.
/// Returns `None` when nothing compiles.
pub fn compile_conditions(conditions: &[FilterCondition]) -> Option<FilterGroup> {
    let first = conditions
        .iter()
        .find(|c| c.is_active())
        .or_else(|| conditions.first())?;
    let logic = first.logical_operator;

    if conditions
        .iter()
        .filter(|c| c.is_active())
        .any(|c| c.logical_operator != logic)
    {
        debug!(%logic, "Conditions disagree on logical operator, first one wins");
    }

    let rules = compile_nodes(conditions);
    if rules.is_empty() {
        debug!({ logging::CONDITION_COUNT } = conditions.len(), "No condition compiled");
        return None;
    }

    let group = FilterGroup::new(logic, rules);
    debug!(
        { logging::CONDITION_COUNT } = conditions.len(),
        { logging::RULE_COUNT } = group.leaf_count(),
        %logic,
        "Compiled advanced filter"
    );
    Some(group)
}

// =============================================================================
// TESTS
// =============================================================================
