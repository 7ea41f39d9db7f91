//! Operator catalog.
//!
//! Every operator name the CRM pages send belongs to exactly one
//! [`OperatorCategory`]. The category drives how the compiler encodes a
//! condition's values, so this table is the only place that decides it.
//!
//! Operator names are an open set on the wire: names this crate does not know
//! are kept verbatim in [`Operator::Other`] and compile with single-value
//! semantics.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::models::LogicalOperator;

// =============================================================================
// OPERATOR CATEGORY
// =============================================================================

/// Behavioral category of an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorCategory {
    /// Never reads a comparison value ("is empty", "is today", ...).
    NoValue,
    /// Takes exactly two bounds `[a, b]`.
    Range,
    /// Takes an array of scalars sent as one rule.
    List,
    /// Several values mean "any of these match".
    OrMulti,
    /// Several values mean "all of these must hold independently".
    AndMulti,
    /// Single comparison value.
    Single,
}

// =============================================================================
// OPERATOR
// =============================================================================

/// A filter operator name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operator {
    IsEmpty,
    IsNotEmpty,
    IsToday,
    IsYesterday,
    IsThisWeek,
    IsLastWeek,
    IsNextWeek,
    IsThisMonth,
    IsLastMonth,
    IsNextMonth,
    IsTrue,
    IsFalse,
    Between,
    DateBetween,
    In,
    NotIn,
    Contains,
    DoesNotContain,
    Is,
    IsNot,
    StartsWith,
    EndsWith,
    Equals,
    NotEquals,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Before,
    After,
    On,
    /// Operator name not known to this crate, preserved verbatim.
    Other(String),
}

impl Operator {
    /// Every operator known to the catalog.
    pub const KNOWN: &'static [Operator] = &[
        Operator::IsEmpty,
        Operator::IsNotEmpty,
        Operator::IsToday,
        Operator::IsYesterday,
        Operator::IsThisWeek,
        Operator::IsLastWeek,
        Operator::IsNextWeek,
        Operator::IsThisMonth,
        Operator::IsLastMonth,
        Operator::IsNextMonth,
        Operator::IsTrue,
        Operator::IsFalse,
        Operator::Between,
        Operator::DateBetween,
        Operator::In,
        Operator::NotIn,
        Operator::Contains,
        Operator::DoesNotContain,
        Operator::Is,
        Operator::IsNot,
        Operator::StartsWith,
        Operator::EndsWith,
        Operator::Equals,
        Operator::NotEquals,
        Operator::GreaterThan,
        Operator::GreaterThanOrEqual,
        Operator::LessThan,
        Operator::LessThanOrEqual,
        Operator::Before,
        Operator::After,
        Operator::On,
    ];

    /// Wire name of the operator.
    pub fn as_str(&self) -> &str {
        match self {
            Self::IsEmpty => "IS_EMPTY",
            Self::IsNotEmpty => "IS_NOT_EMPTY",
            Self::IsToday => "IS_TODAY",
            Self::IsYesterday => "IS_YESTERDAY",
            Self::IsThisWeek => "IS_THIS_WEEK",
            Self::IsLastWeek => "IS_LAST_WEEK",
            Self::IsNextWeek => "IS_NEXT_WEEK",
            Self::IsThisMonth => "IS_THIS_MONTH",
            Self::IsLastMonth => "IS_LAST_MONTH",
            Self::IsNextMonth => "IS_NEXT_MONTH",
            Self::IsTrue => "IS_TRUE",
            Self::IsFalse => "IS_FALSE",
            Self::Between => "BETWEEN",
            Self::DateBetween => "DATE_BETWEEN",
            Self::In => "IN",
            Self::NotIn => "NOT_IN",
            Self::Contains => "CONTAINS",
            Self::DoesNotContain => "DOES_NOT_CONTAIN",
            Self::Is => "IS",
            Self::IsNot => "IS_NOT",
            Self::StartsWith => "STARTS_WITH",
            Self::EndsWith => "ENDS_WITH",
            Self::Equals => "EQUALS",
            Self::NotEquals => "NOT_EQUALS",
            Self::GreaterThan => "GREATER_THAN",
            Self::GreaterThanOrEqual => "GREATER_THAN_OR_EQUAL",
            Self::LessThan => "LESS_THAN",
            Self::LessThanOrEqual => "LESS_THAN_OR_EQUAL",
            Self::Before => "BEFORE",
            Self::After => "AFTER",
            Self::On => "ON",
            Self::Other(name) => name,
        }
    }

    /// Parse a wire name. Never fails: unknown names become [`Operator::Other`].
    pub fn parse(name: &str) -> Self {
        Self::KNOWN
            .iter()
            .find(|op| op.as_str() == name)
            .cloned()
            .unwrap_or_else(|| Self::Other(name.to_string()))
    }

    /// The single category this operator belongs to.
    pub fn category(&self) -> OperatorCategory {
        match self {
            Self::IsEmpty
            | Self::IsNotEmpty
            | Self::IsToday
            | Self::IsYesterday
            | Self::IsThisWeek
            | Self::IsLastWeek
            | Self::IsNextWeek
            | Self::IsThisMonth
            | Self::IsLastMonth
            | Self::IsNextMonth
            | Self::IsTrue
            | Self::IsFalse => OperatorCategory::NoValue,
            Self::Between | Self::DateBetween => OperatorCategory::Range,
            Self::In | Self::NotIn => OperatorCategory::List,
            Self::Contains | Self::Is | Self::StartsWith | Self::EndsWith | Self::Equals => {
                OperatorCategory::OrMulti
            }
            // Negations: "not A and not B". DOES_NOT_CONTAIN expands with AND
            // here, not with the OR some list pages applied; do not move it.
            Self::IsNot | Self::NotEquals | Self::DoesNotContain => OperatorCategory::AndMulti,
            Self::GreaterThan
            | Self::GreaterThanOrEqual
            | Self::LessThan
            | Self::LessThanOrEqual
            | Self::Before
            | Self::After
            | Self::On
            | Self::Other(_) => OperatorCategory::Single,
        }
    }

    /// True for operators that never read a comparison value.
    pub fn is_no_value(&self) -> bool {
        self.category() == OperatorCategory::NoValue
    }

    /// True for two-bound operators.
    pub fn is_range(&self) -> bool {
        self.category() == OperatorCategory::Range
    }

    /// True for `IN` / `NOT_IN`.
    pub fn is_list(&self) -> bool {
        self.category() == OperatorCategory::List
    }

    /// Logic used to join per-value rules when a condition carries several
    /// values, or `None` when extra values are not expanded.
    pub fn multi_value_logic(&self) -> Option<LogicalOperator> {
        match self.category() {
            OperatorCategory::OrMulti => Some(LogicalOperator::Or),
            OperatorCategory::AndMulti => Some(LogicalOperator::And),
            _ => None,
        }
    }

    /// True if the name is one of [`Operator::KNOWN`].
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for Operator {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl Serialize for Operator {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Operator {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s))
    }
}

// =============================================================================
// TESTS
// =============================================================================
