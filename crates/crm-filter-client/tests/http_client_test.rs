//! HTTP client tests against a mock CRM API.
//!
//! Verifies request paths, headers and bodies, and how remote failures
//! surface as errors.

use crm_filter_client::{ClientConfig, HttpCrmClient};
use crm_filter_core::{
    load_saved_conditions, CreateSavedFilterRequest, EntityType, Error, FilterCondition,
    FilterContributions, FilterGroup, FilterRule, ListQuery, LogicalOperator, Operator,
    RecordQueryEngine, SavedFilterStore,
};
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> HttpCrmClient {
    let config = ClientConfig::default()
        .with_base_url(server.uri())
        .with_api_key("test-key");
    HttpCrmClient::new(config).expect("Failed to create client")
}

fn saved_filter_json(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": "Big open deals",
        "entityType": "opportunity",
        "filterGroup": {
            "logic": "OR",
            "rules": [
                {"logic": "AND", "rules": [
                    {"fieldKey": "stage", "condition": "EQUALS", "value": "open"},
                    {"fieldKey": "amount", "condition": "GREATER_THAN", "value": "10000"}
                ]},
                {"fieldKey": "priority", "condition": "EQUALS", "value": "high"}
            ]
        },
        "isDefault": false,
        "isShared": true,
        "createdAt": "2026-09-01T12:00:00Z"
    })
}

#[tokio::test]
async fn test_list_records_posts_query_body() {
    let server = MockServer::start().await;

    let conditions = vec![FilterCondition::new("status", "EQUALS", ["open", "won"])];
    let query = ListQuery::new().limit(20).filter(
        FilterContributions::new()
            .with_advanced(&conditions)
            .assemble(),
    );

    Mock::given(method("POST"))
        .and(path("/accounts/query"))
        .and(header("Authorization", "Bearer test-key"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({
            "page": 1,
            "limit": 20,
            "filterGroup": {"logic": "AND", "rules": [
                {"logic": "OR", "rules": [
                    {"fieldKey": "status", "condition": "EQUALS", "value": "open"},
                    {"fieldKey": "status", "condition": "EQUALS", "value": "won"}
                ]}
            ]}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "acc_1", "name": "Acme"}],
            "total": 1,
            "page": 1,
            "limit": 20
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let page = client
        .list_records(EntityType::Account, &query)
        .await
        .unwrap();

    assert_eq!(page.total, 1);
    assert_eq!(page.data[0]["name"], "Acme");
}

#[tokio::test]
async fn test_list_records_sends_saved_filter_reference() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/opportunities/query"))
        .and(body_partial_json(json!({"savedFilterId": "flt_42"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [], "total": 0})))
        .expect(1)
        .mount(&server)
        .await;

    let query = ListQuery::new().filter(
        FilterContributions::new()
            .with_search("acme", &["name"])
            .with_saved_filter("flt_42")
            .assemble(),
    );
    assert!(query.filter_group.is_none());

    let page = client_for(&server)
        .list_records(EntityType::Opportunity, &query)
        .await
        .unwrap();
    assert!(page.data.is_empty());
}

#[tokio::test]
async fn test_server_error_surfaces_status_and_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/contacts/query"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"message": "query engine down"})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .list_records(EntityType::Contact, &ListQuery::new())
        .await
        .unwrap_err();

    match err {
        Error::Remote { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "query engine down");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_collection_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/accounts/query"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .list_records(EntityType::Account, &ListQuery::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(ref what) if what.contains("/accounts/query")));
}

#[tokio::test]
async fn test_malformed_response_is_serialization_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/payments/query"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .list_records(EntityType::Payment, &ListQuery::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Serialization(_)));
}

#[tokio::test]
async fn test_save_posts_request_and_returns_saved_filter() {
    let server = MockServer::start().await;

    let group = FilterGroup::and(vec![FilterRule::single(
        "stage",
        Operator::Equals,
        "open",
    )
    .into()]);

    Mock::given(method("POST"))
        .and(path("/saved-filters"))
        .and(body_partial_json(json!({
            "name": "Open deals",
            "entityType": "opportunity",
            "isShared": true,
            "filterGroup": {"logic": "AND"}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "flt_7",
            "name": "Open deals",
            "entityType": "opportunity",
            "filterGroup": {"logic": "AND", "rules": [
                {"fieldKey": "stage", "condition": "EQUALS", "value": "open"}
            ]},
            "isShared": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let req = CreateSavedFilterRequest::new("Open deals", EntityType::Opportunity, group).shared();
    let saved = client_for(&server).save(req).await.unwrap();

    assert_eq!(saved.id, "flt_7");
    assert!(saved.is_shared);
    assert_eq!(saved.filter_group.leaf_count(), 1);
}

#[tokio::test]
async fn test_save_rejects_empty_filter_without_calling_api() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/saved-filters"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let req = CreateSavedFilterRequest::new(
        "Empty",
        EntityType::Account,
        FilterGroup::and(Vec::new()),
    );
    let err = client_for(&server).save(req).await.unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}

#[tokio::test]
async fn test_load_saved_conditions_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/saved-filters/flt_1"))
        .and(header("Authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(saved_filter_json("flt_1")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let conditions = load_saved_conditions(&client, "flt_1").await.unwrap();

    assert_eq!(conditions.len(), 3);
    assert_eq!(conditions[0].field, "stage");
    assert_eq!(conditions[0].logical_operator, LogicalOperator::And);
    assert_eq!(conditions[1].logical_operator, LogicalOperator::And);
    assert_eq!(conditions[2].field, "priority");
    assert_eq!(conditions[2].logical_operator, LogicalOperator::Or);
}

#[tokio::test]
async fn test_load_missing_filter_maps_404() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/saved-filters/flt_missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client_for(&server).load("flt_missing").await.unwrap_err();
    assert!(matches!(err, Error::SavedFilterNotFound(ref id) if id == "flt_missing"));
}

#[tokio::test]
async fn test_list_filters_by_entity() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/saved-filters"))
        .and(query_param("entityType", "opportunity"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": [saved_filter_json("flt_1"), saved_filter_json("flt_2")]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let filters = client_for(&server)
        .list(EntityType::Opportunity)
        .await
        .unwrap();
    let ids: Vec<&str> = filters.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, vec!["flt_1", "flt_2"]);
}

#[tokio::test]
async fn test_delete_filter() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/saved-filters/flt_3"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/saved-filters/flt_gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.delete("flt_3").await.unwrap();

    let err = client.delete("flt_gone").await.unwrap_err();
    assert!(matches!(err, Error::SavedFilterNotFound(_)));
}

#[tokio::test]
async fn test_no_authorization_header_without_api_key() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/activities/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpCrmClient::new(ClientConfig::default().with_base_url(server.uri())).unwrap();
    client
        .list_records(EntityType::Activity, &ListQuery::new())
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("authorization"));
}
