//! Group assembler.
//!
//! A list page builds its filter from three independent contributions:
//!
//! 1. **search**: the free-text box, `CONTAINS` on every selected column
//! 2. **advanced**: the compiled rows of the filter panel
//! 3. **person**: the assignee / creator picker
//!
//! [`assemble`] merges them in that fixed order into one [`FilterSelection`].
//! An active saved filter short-circuits all three: the remote engine receives
//! only its id.

use tracing::debug;

use crate::compiler::compile_conditions;
use crate::logging;
use crate::models::{FilterCondition, FilterGroup, FilterNode, FilterRule};
use crate::operators::Operator;
use crate::schema::{EntitySchema, PersonRole};

// =============================================================================
// CONTRIBUTIONS
// =============================================================================

/// Search contribution: an `OR` of `CONTAINS` rules, one per column.
///
/// `None` when the trimmed query is empty or no column is selected.
pub fn search_filter<S: AsRef<str>>(query: &str, columns: &[S]) -> Option<FilterNode> {
    let query = query.trim();
    if query.is_empty() || columns.is_empty() {
        return None;
    }

    let rules = columns
        .iter()
        .map(|column| FilterRule::single(column.as_ref(), Operator::Contains, query).into())
        .collect();

    Some(FilterGroup::or(rules).into())
}

/// Advanced filter contribution: the compiled panel rows.
pub fn advanced_filter(conditions: &[FilterCondition]) -> Option<FilterNode> {
    compile_conditions(conditions).map(FilterNode::from)
}

/// Person contribution.
///
/// Each person gets one `EQUALS` rule per candidate field the schema carries
/// for `role`, OR-ed together; people are OR-ed again. One person on one field
/// collapses to a bare rule. Blank ids are skipped. When the schema carries
/// none of the candidates the role's canonical field name is used.
pub fn person_filter<S: AsRef<str>>(
    people: &[S],
    role: PersonRole,
    schema: &EntitySchema,
) -> Option<FilterNode> {
    let people: Vec<&str> = people
        .iter()
        .map(|p| p.as_ref().trim())
        .filter(|p| !p.is_empty())
        .collect();
    if people.is_empty() {
        return None;
    }

    let mut fields = schema.person_field_candidates(role);
    if fields.is_empty() {
        debug!(
            { logging::ENTITY_TYPE } = %schema.entity_type,
            %role,
            "Schema has no candidate person field, using role name"
        );
        fields.push(match role {
            PersonRole::AssignedTo => "assignedTo",
            PersonRole::CreatedBy => "createdBy",
        });
    }

    let mut per_person: Vec<FilterNode> = people
        .iter()
        .map(|person| {
            let mut rules: Vec<FilterNode> = fields
                .iter()
                .map(|field| FilterRule::single(*field, Operator::Equals, *person).into())
                .collect();
            if rules.len() == 1 {
                rules.remove(0)
            } else {
                FilterGroup::or(rules).into()
            }
        })
        .collect();

    if per_person.len() == 1 {
        return per_person.pop();
    }
    Some(FilterGroup::or(per_person).into())
}

// =============================================================================
// ASSEMBLY
// =============================================================================

/// Filter contributions collected from one list page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterContributions {
    pub search: Option<FilterNode>,
    pub advanced: Option<FilterNode>,
    pub person: Option<FilterNode>,
    /// Active saved filter. Replaces every other contribution.
    pub saved_filter_id: Option<String>,
}

impl FilterContributions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search<S: AsRef<str>>(mut self, query: &str, columns: &[S]) -> Self {
        self.search = search_filter(query, columns);
        self
    }

    pub fn with_advanced(mut self, conditions: &[FilterCondition]) -> Self {
        self.advanced = advanced_filter(conditions);
        self
    }

    pub fn with_people<S: AsRef<str>>(
        mut self,
        people: &[S],
        role: PersonRole,
        schema: &EntitySchema,
    ) -> Self {
        self.person = person_filter(people, role, schema);
        self
    }

    pub fn with_saved_filter(mut self, id: impl Into<String>) -> Self {
        let id = id.into();
        self.saved_filter_id = if id.trim().is_empty() { None } else { Some(id) };
        self
    }

    /// Merge into the selection sent to the query engine.
    pub fn assemble(self) -> FilterSelection {
        assemble(self)
    }
}

/// What a list query filters by.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FilterSelection {
    /// No filter parameter at all.
    #[default]
    None,
    /// Inline filter tree, sent as `filterGroup`.
    Tree(FilterNode),
    /// Saved filter reference, sent as `savedFilterId`.
    Saved(String),
}

impl FilterSelection {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    pub fn tree(&self) -> Option<&FilterNode> {
        match self {
            Self::Tree(node) => Some(node),
            _ => None,
        }
    }

    pub fn saved_filter_id(&self) -> Option<&str> {
        match self {
            Self::Saved(id) => Some(id),
            _ => None,
        }
    }
}

/// Merge contributions: saved filter wins; otherwise zero contributions give
/// no filter, one is used verbatim, several are AND-ed.
pub fn assemble(contributions: FilterContributions) -> FilterSelection {
    if let Some(id) = contributions.saved_filter_id {
        debug!({ logging::SAVED_FILTER_ID } = %id, "Using saved filter reference");
        return FilterSelection::Saved(id);
    }

    let mut parts: Vec<FilterNode> = [
        contributions.search,
        contributions.advanced,
        contributions.person,
    ]
    .into_iter()
    .flatten()
    .collect();

    debug!({ logging::CONTRIBUTION_COUNT } = parts.len(), "Assembling filter");

    match parts.len() {
        0 => FilterSelection::None,
        1 => FilterSelection::Tree(parts.remove(0)),
        _ => FilterSelection::Tree(FilterGroup::and(parts).into()),
    }
}

// =============================================================================
// TESTS
// =============================================================================
