//! End-to-end tests for compiling, assembling and decompiling filters.
//!
//! Exercises the public API the way a list page does: edit rows, build the
//! request body, save it, load it back into the editor.

use crm_filter_core::{
    compile_conditions, decompile, EntitySchema, EntityType, FilterCondition, FilterContributions,
    FilterEditor, FilterGroup, FilterNode, ListQuery, LogicalOperator, PersonRole, SortOrder,
};
use serde_json::json;

#[test]
fn test_saved_filter_payload_decodes_and_flattens() {
    let payload = json!({
        "logic": "OR",
        "rules": [
            {"logic": "AND", "rules": [
                {"fieldKey": "stage", "condition": "IN", "values": ["won", "open"], "value": "won,open"},
                {"fieldKey": "amount", "condition": "BETWEEN", "values": ["1000", "5000"], "value": "1000,5000"}
            ]},
            {"fieldKey": "closeDate", "condition": "IS_THIS_MONTH", "value": ""}
        ]
    });

    let group: FilterGroup = serde_json::from_value(payload).unwrap();
    let conditions = decompile(&group);

    assert_eq!(conditions.len(), 3);
    assert_eq!(conditions[0].value, vec!["won", "open"]);
    assert_eq!(conditions[0].logical_operator, LogicalOperator::And);
    assert_eq!(conditions[1].value, vec!["1000", "5000"]);
    assert_eq!(conditions[2].value, vec![""]);
    assert_eq!(conditions[2].logical_operator, LogicalOperator::Or);
}

#[test]
fn test_conditions_payload_compiles_to_expected_json() {
    let conditions: Vec<FilterCondition> = serde_json::from_value(json!([
        {"id": "c1", "field": "status", "condition": "EQUALS", "value": ["open", "won"], "logicalOperator": "AND"},
        {"id": "c2", "field": "name", "condition": "CONTAINS", "value": [], "logicalOperator": "AND"},
        {"id": "c3", "field": "email", "condition": "IS_NOT_EMPTY", "value": ["ignored"], "logicalOperator": "OR"}
    ]))
    .unwrap();

    let group = compile_conditions(&conditions).unwrap();
    assert_eq!(
        serde_json::to_value(&group).unwrap(),
        json!({"logic": "AND", "rules": [
            {"logic": "OR", "rules": [
                {"fieldKey": "status", "condition": "EQUALS", "value": "open"},
                {"fieldKey": "status", "condition": "EQUALS", "value": "won"}
            ]},
            {"fieldKey": "email", "condition": "IS_NOT_EMPTY", "value": ""}
        ]})
    );
}

#[test]
fn test_list_page_request_body() {
    let schema = EntitySchema::default_for(EntityType::Opportunity);
    let mut editor = FilterEditor::new();
    editor.add_condition(FilterCondition::new("amount", "GREATER_THAN", ["1000"]));

    let advanced: Vec<FilterCondition> = editor.conditions().to_vec();
    let columns = schema.searchable_columns();
    let selection = FilterContributions::new()
        .with_search("acme", columns.as_slice())
        .with_advanced(&advanced)
        .with_people(&["user-7"], PersonRole::AssignedTo, &schema)
        .assemble();

    let query = ListQuery::new()
        .page(2)
        .limit(25)
        .sort("closeDate", SortOrder::Desc)
        .filter(selection);

    let body = serde_json::to_value(&query).unwrap();
    assert_eq!(body["page"], 2);
    assert_eq!(body["limit"], 25);
    assert_eq!(body["filterGroup"]["logic"], "AND");
    assert_eq!(body["filterGroup"]["rules"].as_array().unwrap().len(), 3);
    assert_eq!(
        body["filterGroup"]["rules"][2],
        json!({"logic": "OR", "rules": [
            {"fieldKey": "assignedTo", "condition": "EQUALS", "value": "user-7"},
            {"fieldKey": "assignTo", "condition": "EQUALS", "value": "user-7"}
        ]})
    );
}

#[test]
fn test_editor_save_and_reload_cycle() {
    let mut editor = FilterEditor::new();
    editor.add_condition(FilterCondition::new("industry", "IS", ["biotech", "pharma"]));
    editor.add_condition(FilterCondition::new("website", "IS_EMPTY", Vec::<String>::new()));
    editor.set_logic(LogicalOperator::And);

    let saved = editor.to_filter_group().unwrap();
    let wire = serde_json::to_string(&saved).unwrap();
    let restored: FilterGroup = serde_json::from_str(&wire).unwrap();
    assert_eq!(saved, restored);

    let reloaded = FilterEditor::from_saved(&restored);
    // The two "IS" values come back as separate rows joined by the OR they
    // were expanded into.
    assert_eq!(reloaded.len(), 3);
    assert_eq!(reloaded.logic(), LogicalOperator::Or);
    assert_eq!(reloaded.conditions()[2].field, "website");
}

#[test]
fn test_top_level_rule_node_is_accepted() {
    let node: FilterNode = serde_json::from_value(json!(
        {"fieldKey": "assignedTo", "condition": "EQUALS", "value": "u1"}
    ))
    .unwrap();
    assert_eq!(node.leaf_count(), 1);
    assert!(node.as_rule().is_some());
}
