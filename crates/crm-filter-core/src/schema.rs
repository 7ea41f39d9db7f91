//! Entity schemas.
//!
//! The set of filterable fields differs per entity and per tenant. Callers pass
//! an [`EntitySchema`] explicitly; the compiler never guesses fields from
//! record shapes. The schema answers three questions:
//!
//! - which columns the free-text search may target,
//! - which field names a person filter should hit,
//! - which operators a field's type offers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::defaults::{ASSIGNED_TO_FIELDS, CREATED_BY_FIELDS};
use crate::error::{Error, Result};
use crate::models::{EntityType, FilterCondition};
use crate::operators::Operator;

// =============================================================================
// FIELD TYPES
// =============================================================================

/// Value type of a field, used to offer operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    #[default]
    Text,
    Email,
    Phone,
    Number,
    Currency,
    Date,
    Boolean,
    Select,
    MultiSelect,
    User,
}

impl FieldType {
    /// Operators the filter panel offers for this type.
    pub fn operators(&self) -> &'static [Operator] {
        match self {
            Self::Text | Self::Email | Self::Phone => TEXT_OPERATORS,
            Self::Number | Self::Currency => NUMBER_OPERATORS,
            Self::Date => DATE_OPERATORS,
            Self::Boolean => BOOLEAN_OPERATORS,
            Self::Select => SELECT_OPERATORS,
            Self::MultiSelect => MULTI_SELECT_OPERATORS,
            Self::User => USER_OPERATORS,
        }
    }

    /// True if free-text search can target fields of this type.
    pub fn is_text_searchable(&self) -> bool {
        matches!(self, Self::Text | Self::Email | Self::Phone)
    }
}

const TEXT_OPERATORS: &[Operator] = &[
    Operator::Contains,
    Operator::DoesNotContain,
    Operator::Equals,
    Operator::NotEquals,
    Operator::StartsWith,
    Operator::EndsWith,
    Operator::IsEmpty,
    Operator::IsNotEmpty,
];

const NUMBER_OPERATORS: &[Operator] = &[
    Operator::Equals,
    Operator::NotEquals,
    Operator::GreaterThan,
    Operator::GreaterThanOrEqual,
    Operator::LessThan,
    Operator::LessThanOrEqual,
    Operator::Between,
    Operator::IsEmpty,
    Operator::IsNotEmpty,
];

const DATE_OPERATORS: &[Operator] = &[
    Operator::On,
    Operator::Before,
    Operator::After,
    Operator::DateBetween,
    Operator::IsToday,
    Operator::IsYesterday,
    Operator::IsThisWeek,
    Operator::IsLastWeek,
    Operator::IsNextWeek,
    Operator::IsThisMonth,
    Operator::IsLastMonth,
    Operator::IsNextMonth,
    Operator::IsEmpty,
    Operator::IsNotEmpty,
];

const BOOLEAN_OPERATORS: &[Operator] = &[Operator::IsTrue, Operator::IsFalse];

const SELECT_OPERATORS: &[Operator] = &[
    Operator::Is,
    Operator::IsNot,
    Operator::In,
    Operator::NotIn,
    Operator::IsEmpty,
    Operator::IsNotEmpty,
];

const MULTI_SELECT_OPERATORS: &[Operator] = &[
    Operator::Contains,
    Operator::DoesNotContain,
    Operator::In,
    Operator::NotIn,
    Operator::IsEmpty,
    Operator::IsNotEmpty,
];

const USER_OPERATORS: &[Operator] = &[
    Operator::Equals,
    Operator::NotEquals,
    Operator::In,
    Operator::NotIn,
    Operator::IsEmpty,
    Operator::IsNotEmpty,
];

// =============================================================================
// PERSON ROLE
// =============================================================================

/// Which person relationship a person filter targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PersonRole {
    #[default]
    #[serde(rename = "assignedTo")]
    AssignedTo,
    #[serde(rename = "createdBy")]
    CreatedBy,
}

impl PersonRole {
    /// Field names that may carry this role, in priority order.
    pub fn candidate_fields(&self) -> &'static [&'static str] {
        match self {
            Self::AssignedTo => ASSIGNED_TO_FIELDS,
            Self::CreatedBy => CREATED_BY_FIELDS,
        }
    }
}

impl fmt::Display for PersonRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AssignedTo => write!(f, "assignedTo"),
            Self::CreatedBy => write!(f, "createdBy"),
        }
    }
}

// =============================================================================
// FIELD DEFINITION
// =============================================================================

/// One field of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub field_type: FieldType,
    /// Whether the free-text search box may target this column.
    #[serde(default)]
    pub searchable: bool,
}

impl FieldDefinition {
    pub fn new(key: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            field_type,
            searchable: field_type.is_text_searchable(),
        }
    }

    pub fn searchable(mut self, searchable: bool) -> Self {
        self.searchable = searchable;
        self
    }

    pub fn supports(&self, op: &Operator) -> bool {
        self.field_type.operators().contains(op)
    }
}

// =============================================================================
// ENTITY SCHEMA
// =============================================================================

/// Filterable fields of one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySchema {
    pub entity_type: EntityType,
    pub fields: Vec<FieldDefinition>,
}

impl EntitySchema {
    pub fn new(entity_type: EntityType) -> Self {
        Self {
            entity_type,
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    pub fn field(&self, key: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn has_field(&self, key: &str) -> bool {
        self.field(key).is_some()
    }

    /// Keys of every column the search box may target.
    pub fn searchable_columns(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| f.searchable)
            .map(|f| f.key.as_str())
            .collect()
    }

    /// Candidate person fields for `role` that exist on this entity.
    pub fn person_field_candidates(&self, role: PersonRole) -> Vec<&'static str> {
        role.candidate_fields()
            .iter()
            .copied()
            .filter(|name| self.has_field(name))
            .collect()
    }

    /// Check a condition against the schema.
    ///
    /// Opt-in: the compiler accepts anything, this is for callers that want
    /// to reject rows before saving them.
    pub fn validate_condition(&self, condition: &FilterCondition) -> Result<()> {
        let field = self
            .field(&condition.field)
            .ok_or_else(|| Error::UnknownField {
                entity: self.entity_type.to_string(),
                field: condition.field.clone(),
            })?;

        if !field.supports(&condition.condition) {
            return Err(Error::UnsupportedOperator {
                field: field.key.clone(),
                operator: condition.condition.to_string(),
            });
        }

        Ok(())
    }

    /// Built-in schema for an entity.
    pub fn default_for(entity_type: EntityType) -> Self {
        use FieldType::*;

        let fields: Vec<FieldDefinition> = match entity_type {
            EntityType::Account => vec![
                FieldDefinition::new("name", "Name", Text),
                FieldDefinition::new("industry", "Industry", Select),
                FieldDefinition::new("website", "Website", Text),
                FieldDefinition::new("phone", "Phone", Phone),
                FieldDefinition::new("annualRevenue", "Annual Revenue", Currency),
                FieldDefinition::new("assignedTo", "Assigned To", User),
                FieldDefinition::new("createdBy", "Created By", User),
                FieldDefinition::new("createdAt", "Created", Date),
            ],
            EntityType::Contact => vec![
                FieldDefinition::new("firstName", "First Name", Text),
                FieldDefinition::new("lastName", "Last Name", Text),
                FieldDefinition::new("email", "Email", Email),
                FieldDefinition::new("phone", "Phone", Phone),
                FieldDefinition::new("accountId", "Account", Select),
                FieldDefinition::new("assignedTo", "Assigned To", User),
                FieldDefinition::new("createdBy", "Created By", User),
                FieldDefinition::new("createdAt", "Created", Date),
            ],
            EntityType::Opportunity => vec![
                FieldDefinition::new("name", "Name", Text),
                FieldDefinition::new("stage", "Stage", Select),
                FieldDefinition::new("status", "Status", Select),
                FieldDefinition::new("amount", "Amount", Currency),
                FieldDefinition::new("closeDate", "Close Date", Date),
                FieldDefinition::new("assignedTo", "Assigned To", User),
                FieldDefinition::new("assignTo", "Owner", User),
                FieldDefinition::new("createdBy", "Created By", User),
            ],
            EntityType::Activity => vec![
                FieldDefinition::new("subject", "Subject", Text),
                FieldDefinition::new("type", "Type", Select),
                FieldDefinition::new("dueDate", "Due Date", Date),
                FieldDefinition::new("completed", "Completed", Boolean),
                FieldDefinition::new("assignTo", "Assigned To", User),
                FieldDefinition::new("createdBy", "Created By", User),
            ],
            EntityType::Payment => vec![
                FieldDefinition::new("reference", "Reference", Text),
                FieldDefinition::new("amount", "Amount", Currency),
                FieldDefinition::new("method", "Method", Select),
                FieldDefinition::new("paidAt", "Paid At", Date),
                FieldDefinition::new("createdById", "Created By", User),
            ],
        };

        Self {
            entity_type,
            fields,
        }
    }
}
