//! Data model shared by the compiler, the decompiler and the remote store.
//!
//! Two shapes describe the same filter:
//!
//! - [`FilterCondition`]: the flat row the filter panel edits.
//! - [`FilterGroup`] / [`FilterRule`]: the boolean tree the query engine
//!   evaluates and the saved filter store persists.
//!
//! All wire names are camelCase to match the remote API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::Error;
use crate::operators::Operator;

// =============================================================================
// LOGICAL OPERATOR
// =============================================================================

/// Boolean connective of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LogicalOperator {
    #[default]
    #[serde(rename = "AND")]
    And,
    #[serde(rename = "OR")]
    Or,
}

impl LogicalOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogicalOperator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "AND" => Ok(Self::And),
            "OR" => Ok(Self::Or),
            _ => Err(Error::InvalidInput(format!(
                "logical operator must be AND or OR, got: {}",
                s
            ))),
        }
    }
}

// =============================================================================
// FILTER CONDITION (flat, editor-facing)
// =============================================================================

/// Generate an identifier for a freshly created condition row.
pub fn new_condition_id() -> String {
    Uuid::now_v7().to_string()
}

/// One row of the advanced filter panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCondition {
    /// Row identifier, stable while the row is being edited.
    #[serde(default = "new_condition_id")]
    pub id: String,

    /// Field key the row targets.
    pub field: String,

    /// Operator name.
    pub condition: Operator,

    /// Comparison values. Empty while the row is only partially filled.
    #[serde(default)]
    pub value: Vec<String>,

    /// Connective chosen for the row. Only the first row's value is honored
    /// when the rows are compiled into a group.
    #[serde(default)]
    pub logical_operator: LogicalOperator,
}

impl FilterCondition {
    /// Create a condition with a fresh id and AND logic.
    pub fn new<I, S>(field: impl Into<String>, condition: impl Into<Operator>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: new_condition_id(),
            field: field.into(),
            condition: condition.into(),
            value: values.into_iter().map(Into::into).collect(),
            logical_operator: LogicalOperator::And,
        }
    }

    /// Set the row's logical operator.
    pub fn with_logic(mut self, logic: LogicalOperator) -> Self {
        self.logical_operator = logic;
        self
    }

    /// True if compiling this row emits at least one node.
    pub fn is_active(&self) -> bool {
        self.condition.is_no_value() || !self.value.is_empty()
    }
}

// =============================================================================
// FILTER TREE (backend-facing)
// =============================================================================

/// Single-field leaf of a filter tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterRule {
    pub field_key: String,

    pub condition: Operator,

    /// Scalar value. For range and list rules this is the comma-joined
    /// mirror of `values` kept for older query engine versions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,
}

impl FilterRule {
    /// Rule carrying a single scalar value.
    pub fn single(
        field_key: impl Into<String>,
        condition: impl Into<Operator>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            field_key: field_key.into(),
            condition: condition.into(),
            value: Some(value.into()),
            values: None,
        }
    }

    /// Rule carrying both `values` and the joined scalar mirror.
    pub fn multi(
        field_key: impl Into<String>,
        condition: impl Into<Operator>,
        values: Vec<String>,
        joined: String,
    ) -> Self {
        Self {
            field_key: field_key.into(),
            condition: condition.into(),
            value: Some(joined),
            values: Some(values),
        }
    }

    /// Values of the rule as the editor sees them: `values` when present,
    /// otherwise the scalar as a one-element list.
    pub fn editor_values(&self) -> Vec<String> {
        match (&self.values, &self.value) {
            (Some(values), _) => values.clone(),
            (None, Some(value)) => vec![value.clone()],
            (None, None) => Vec::new(),
        }
    }
}

/// Boolean combination of rules and nested groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterGroup {
    pub logic: LogicalOperator,
    pub rules: Vec<FilterNode>,
}

impl FilterGroup {
    pub fn new(logic: LogicalOperator, rules: Vec<FilterNode>) -> Self {
        Self { logic, rules }
    }

    pub fn and(rules: Vec<FilterNode>) -> Self {
        Self::new(LogicalOperator::And, rules)
    }

    pub fn or(rules: Vec<FilterNode>) -> Self {
        Self::new(LogicalOperator::Or, rules)
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// All leaf rules in depth-first order.
    pub fn leaves(&self) -> Vec<&FilterRule> {
        let mut out = Vec::new();
        collect_leaves(&self.rules, &mut out);
        out
    }

    /// Number of leaf rules at any depth.
    pub fn leaf_count(&self) -> usize {
        self.rules.iter().map(FilterNode::leaf_count).sum()
    }

    /// Nesting depth; a group of plain rules has depth 1.
    pub fn depth(&self) -> usize {
        1 + self
            .rules
            .iter()
            .map(|node| match node {
                FilterNode::Group(group) => group.depth(),
                FilterNode::Rule(_) => 0,
            })
            .max()
            .unwrap_or(0)
    }
}

fn collect_leaves<'a>(nodes: &'a [FilterNode], out: &mut Vec<&'a FilterRule>) {
    for node in nodes {
        match node {
            FilterNode::Rule(rule) => out.push(rule),
            FilterNode::Group(group) => collect_leaves(&group.rules, out),
        }
    }
}

/// A node of a filter tree.
///
/// Untagged on the wire: an object carrying both `logic` and `rules` is a
/// group, anything else must be a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterNode {
    Group(FilterGroup),
    Rule(FilterRule),
}

impl FilterNode {
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Rule(_) => 1,
            Self::Group(group) => group.leaf_count(),
        }
    }

    pub fn as_group(&self) -> Option<&FilterGroup> {
        match self {
            Self::Group(group) => Some(group),
            Self::Rule(_) => None,
        }
    }

    pub fn as_rule(&self) -> Option<&FilterRule> {
        match self {
            Self::Rule(rule) => Some(rule),
            Self::Group(_) => None,
        }
    }
}

impl From<FilterRule> for FilterNode {
    fn from(rule: FilterRule) -> Self {
        Self::Rule(rule)
    }
}

impl From<FilterGroup> for FilterNode {
    fn from(group: FilterGroup) -> Self {
        Self::Group(group)
    }
}

// =============================================================================
// ENTITY TYPE
// =============================================================================

/// CRM entity a list query or saved filter belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Account,
    Contact,
    Opportunity,
    Activity,
    Payment,
}

impl EntityType {
    pub const ALL: [EntityType; 5] = [
        Self::Account,
        Self::Contact,
        Self::Opportunity,
        Self::Activity,
        Self::Payment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Account => "account",
            Self::Contact => "contact",
            Self::Opportunity => "opportunity",
            Self::Activity => "activity",
            Self::Payment => "payment",
        }
    }

    /// Collection path segment used by the remote API.
    pub fn plural(&self) -> &'static str {
        match self {
            Self::Account => "accounts",
            Self::Contact => "contacts",
            Self::Opportunity => "opportunities",
            Self::Activity => "activities",
            Self::Payment => "payments",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|entity| entity.as_str() == s || entity.plural() == s)
            .ok_or_else(|| Error::InvalidInput(format!("unknown entity type: {}", s)))
    }
}

// =============================================================================
// SAVED FILTER
// =============================================================================

/// A named filter persisted by the remote store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedFilter {
    pub id: String,
    pub name: String,
    pub entity_type: EntityType,
    pub filter_group: FilterGroup,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub is_shared: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Payload for persisting a new saved filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSavedFilterRequest {
    pub name: String,
    pub entity_type: EntityType,
    pub filter_group: FilterGroup,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub is_shared: bool,
}

impl CreateSavedFilterRequest {
    /// Private, non-default filter.
    pub fn new(name: impl Into<String>, entity_type: EntityType, filter_group: FilterGroup) -> Self {
        Self {
            name: name.into(),
            entity_type,
            filter_group,
            is_default: false,
            is_shared: false,
        }
    }

    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    pub fn shared(mut self) -> Self {
        self.is_shared = true;
        self
    }

    /// Reject payloads the store would refuse anyway.
    pub fn validate(&self) -> crate::Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidInput(
                "saved filter name cannot be empty".to_string(),
            ));
        }
        if self.filter_group.is_empty() {
            return Err(Error::InvalidInput(
                "saved filter must contain at least one rule".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
