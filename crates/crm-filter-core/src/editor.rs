//! Advanced filter panel state.
//!
//! One [`FilterEditor`] per open panel. It owns the rows, the single logical
//! operator joining them, and which cell is currently being edited, so
//! neighbouring dropdowns consult the editor they were handed instead of a
//! process-wide flag.

use tracing::debug;

use crate::compiler::compile_conditions;
use crate::decompiler::decompile;
use crate::logging;
use crate::models::{FilterCondition, FilterGroup, LogicalOperator};
use crate::operators::Operator;

/// Part of a row a dropdown edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditingPart {
    Field,
    Operator,
    Value,
}

/// Cell currently open for editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditingCell {
    pub condition_id: String,
    pub part: EditingPart,
}

/// Editing state of one filter panel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterEditor {
    logic: LogicalOperator,
    conditions: Vec<FilterCondition>,
    editing: Option<EditingCell>,
}

impl FilterEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Editor pre-filled from a persisted tree.
    ///
    /// The panel supports one operator for all rows, so the first flattened
    /// row's operator is adopted for every row.
    pub fn from_saved(group: &FilterGroup) -> Self {
        let mut editor = Self::new();
        editor.load_saved(group);
        editor
    }

    pub fn logic(&self) -> LogicalOperator {
        self.logic
    }

    pub fn conditions(&self) -> &[FilterCondition] {
        &self.conditions
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Append a row and return its id.
    pub fn add_condition(&mut self, mut condition: FilterCondition) -> String {
        condition.logical_operator = self.logic;
        let id = condition.id.clone();
        self.conditions.push(condition);
        id
    }

    /// Remove a row. Closes the editing cell if it belonged to that row.
    pub fn remove_condition(&mut self, id: &str) -> Option<FilterCondition> {
        let idx = self.conditions.iter().position(|c| c.id == id)?;
        if self.editing.as_ref().is_some_and(|cell| cell.condition_id == id) {
            self.editing = None;
        }
        Some(self.conditions.remove(idx))
    }

    /// Change a row's field. The operator and values no longer apply and are
    /// reset.
    pub fn update_field(&mut self, id: &str, field: impl Into<String>, default_op: Operator) -> bool {
        match self.find_mut(id) {
            Some(condition) => {
                condition.field = field.into();
                condition.condition = default_op;
                condition.value.clear();
                true
            }
            None => false,
        }
    }

    /// Change a row's operator. Switching to a no-value operator clears the
    /// values.
    pub fn set_operator(&mut self, id: &str, op: Operator) -> bool {
        match self.find_mut(id) {
            Some(condition) => {
                if op.is_no_value() {
                    condition.value.clear();
                }
                condition.condition = op;
                true
            }
            None => false,
        }
    }

    pub fn set_values<I, S>(&mut self, id: &str, values: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match self.find_mut(id) {
            Some(condition) => {
                condition.value = values.into_iter().map(Into::into).collect();
                true
            }
            None => false,
        }
    }

    /// Set the operator joining all rows.
    pub fn set_logic(&mut self, logic: LogicalOperator) {
        self.logic = logic;
        for condition in &mut self.conditions {
            condition.logical_operator = logic;
        }
    }

    pub fn begin_edit(&mut self, id: &str, part: EditingPart) -> bool {
        if !self.conditions.iter().any(|c| c.id == id) {
            return false;
        }
        self.editing = Some(EditingCell {
            condition_id: id.to_string(),
            part,
        });
        true
    }

    pub fn end_edit(&mut self) {
        self.editing = None;
    }

    pub fn editing(&self) -> Option<&EditingCell> {
        self.editing.as_ref()
    }

    /// True if any cell of the panel is open.
    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn clear(&mut self) {
        self.conditions.clear();
        self.editing = None;
    }

    /// Rows that will produce a rule when compiled.
    pub fn active_conditions(&self) -> Vec<&FilterCondition> {
        self.conditions.iter().filter(|c| c.is_active()).collect()
    }

    /// Replace the rows with a decompiled saved filter.
    pub fn load_saved(&mut self, group: &FilterGroup) {
        let conditions = decompile(group);
        let logic = conditions
            .first()
            .map(|c| c.logical_operator)
            .unwrap_or(group.logic);
        debug!({ logging::CONDITION_COUNT } = conditions.len(), %logic, "Loaded saved filter into editor");
        self.conditions = conditions;
        self.editing = None;
        self.set_logic(logic);
    }

    /// Compile the rows. `None` when no row is complete.
    pub fn to_filter_group(&self) -> Option<FilterGroup> {
        compile_conditions(&self.conditions)
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut FilterCondition> {
        self.conditions.iter_mut().find(|c| c.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FilterRule;

    #[test]
    fn test_add_condition_takes_editor_logic() {
        let mut editor = FilterEditor::new();
        editor.set_logic(LogicalOperator::Or);
        editor.add_condition(FilterCondition::new("name", "CONTAINS", ["acme"]));
        assert_eq!(editor.conditions()[0].logical_operator, LogicalOperator::Or);
    }

    #[test]
    fn test_set_logic_stamps_every_row() {
        let mut editor = FilterEditor::new();
        editor.add_condition(FilterCondition::new("name", "CONTAINS", ["acme"]));
        editor.add_condition(FilterCondition::new("city", "EQUALS", ["Oslo"]));
        editor.set_logic(LogicalOperator::Or);

        assert!(editor
            .conditions()
            .iter()
            .all(|c| c.logical_operator == LogicalOperator::Or));
        assert_eq!(editor.to_filter_group().unwrap().logic, LogicalOperator::Or);
    }

    #[test]
    fn test_set_operator_to_no_value_clears_values() {
        let mut editor = FilterEditor::new();
        let id = editor.add_condition(FilterCondition::new("phone", "EQUALS", ["123"]));
        assert!(editor.set_operator(&id, Operator::IsEmpty));
        assert!(editor.conditions()[0].value.is_empty());
        assert!(editor.conditions()[0].is_active());
    }

    #[test]
    fn test_update_field_resets_operator_and_values() {
        let mut editor = FilterEditor::new();
        let id = editor.add_condition(FilterCondition::new("phone", "EQUALS", ["123"]));
        assert!(editor.update_field(&id, "amount", Operator::GreaterThan));
        let row = &editor.conditions()[0];
        assert_eq!(row.field, "amount");
        assert_eq!(row.condition, Operator::GreaterThan);
        assert!(row.value.is_empty());
        assert!(!editor.update_field("missing", "x", Operator::Equals));
    }

    #[test]
    fn test_active_conditions_skip_partial_rows() {
        let mut editor = FilterEditor::new();
        editor.add_condition(FilterCondition::new("name", "CONTAINS", Vec::<String>::new()));
        let id = editor.add_condition(FilterCondition::new("stage", "IN", Vec::<String>::new()));
        assert!(editor.active_conditions().is_empty());
        assert!(editor.to_filter_group().is_none());

        editor.set_values(&id, ["won", "lost"]);
        assert_eq!(editor.active_conditions().len(), 1);
        assert_eq!(editor.to_filter_group().unwrap().leaf_count(), 1);
    }

    #[test]
    fn test_editing_state_is_scoped() {
        let mut first = FilterEditor::new();
        let second = FilterEditor::new();
        let id = first.add_condition(FilterCondition::new("name", "CONTAINS", ["a"]));

        assert!(first.begin_edit(&id, EditingPart::Value));
        assert!(first.is_editing());
        assert!(!second.is_editing());
        assert!(!first.begin_edit("nope", EditingPart::Field));

        first.remove_condition(&id);
        assert!(!first.is_editing());
    }

    #[test]
    fn test_end_edit_and_clear() {
        let mut editor = FilterEditor::new();
        let id = editor.add_condition(FilterCondition::new("name", "CONTAINS", ["a"]));
        editor.begin_edit(&id, EditingPart::Operator);
        assert_eq!(editor.editing().unwrap().part, EditingPart::Operator);
        editor.end_edit();
        assert!(editor.editing().is_none());

        editor.begin_edit(&id, EditingPart::Field);
        editor.clear();
        assert!(editor.is_empty());
        assert!(!editor.is_editing());
    }

    #[test]
    fn test_load_saved_adopts_first_row_logic() {
        let group = FilterGroup::and(vec![
            FilterGroup::or(vec![
                FilterRule::single("status", Operator::Equals, "open").into(),
                FilterRule::single("status", Operator::Equals, "won").into(),
            ])
            .into(),
            FilterRule::single("amount", Operator::GreaterThan, "100").into(),
        ]);

        let editor = FilterEditor::from_saved(&group);
        assert_eq!(editor.len(), 3);
        assert_eq!(editor.logic(), LogicalOperator::Or);
        assert!(editor
            .conditions()
            .iter()
            .all(|c| c.logical_operator == LogicalOperator::Or));
    }

    #[test]
    fn test_load_saved_empty_group_keeps_group_logic() {
        let editor = FilterEditor::from_saved(&FilterGroup::or(vec![]));
        assert!(editor.is_empty());
        assert_eq!(editor.logic(), LogicalOperator::Or);
    }
}
