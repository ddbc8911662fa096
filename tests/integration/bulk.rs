//! Bulk requests end to end.

use crate::common::{context, create_user, groups};
use scim_core::bulk::{BulkMethod, BulkRequest, BulkRequestOperation, BulkResponse};
use scim_core::protocol::ResourceQuery;
use scim_core::providers::{InMemoryProvider, ScimProvider};
use scim_core::schema::identifiers;
use serde_json::json;

fn wire_request(body: serde_json::Value) -> BulkRequest {
    serde_json::from_value(body).expect("bulk request")
}

#[tokio::test]
async fn test_group_references_user_created_in_same_request() {
    let provider = InMemoryProvider::new();
    let context = context("bulk-references");

    let request = wire_request(json!({
        "schemas": [identifiers::BULK_REQUEST],
        "Operations": [
            {
                "method": "POST",
                "path": "/Users",
                "bulkId": "qwerty",
                "data": {"schemas": [identifiers::CORE2_USER], "userName": "Alice"}
            },
            {
                "method": "POST",
                "path": "/Groups",
                "bulkId": "ytrewq",
                "data": {
                    "schemas": [identifiers::CORE2_GROUP],
                    "displayName": "Tour Guides",
                    "members": [{"type": "User", "value": "bulkId:qwerty"}]
                }
            }
        ]
    }));

    let response = provider.process(request, &context).await.unwrap();
    assert_eq!(response.operations.len(), 2);
    assert_eq!(response.failures(), 0);

    let user_location = response.operations[0].location.as_deref().unwrap();
    let user_id = user_location.rsplit('/').next().unwrap();
    assert!(user_location.contains("/Users/"));

    let page = groups(&provider)
        .query(&ResourceQuery::new(), &context)
        .await
        .unwrap();
    assert_eq!(page.total_results, 1);
    assert_eq!(page.resources[0]["members"][0]["value"], user_id);

    let wire = serde_json::to_value(&response).unwrap();
    assert_eq!(wire["schemas"], json!([identifiers::BULK_RESPONSE]));
    assert_eq!(wire["Operations"][0]["status"], "201");
    assert_eq!(wire["Operations"][1]["bulkId"], "ytrewq");
}

#[tokio::test]
async fn test_fail_on_errors_discards_remaining_operations() {
    let provider = InMemoryProvider::new();
    let context = context("bulk-fail-on-errors");

    let request = wire_request(json!({
        "schemas": [identifiers::BULK_REQUEST],
        "failOnErrors": 1,
        "Operations": [
            {"method": "POST", "path": "/Users", "bulkId": "1", "data": {"userName": "first"}},
            {
                "method": "POST",
                "path": "/Users",
                "bulkId": "2",
                "data": {"displayName": "no userName"}
            },
            {"method": "POST", "path": "/Users", "bulkId": "3", "data": {"userName": "third"}}
        ]
    }));

    let response = provider.process(request, &context).await.unwrap();

    assert_eq!(response.operations.len(), 2);
    assert_eq!(response.operations[0].status, 201);
    assert_eq!(response.operations[1].status, 400);
    let error = response.operations[1].response.as_ref().unwrap();
    assert_eq!(error["schemas"], json!([identifiers::ERROR]));
    assert_eq!(error["status"], 400);
}

#[tokio::test]
async fn test_without_fail_on_errors_every_operation_runs() {
    let provider = InMemoryProvider::new();
    let existing = create_user(&provider, "bjensen").await;
    let context = context("bulk-all");

    let request = BulkRequest::new()
        .with_operation(BulkRequestOperation::delete("/Users/unknown"))
        .unwrap()
        .with_operation(BulkRequestOperation::delete(format!("/Users/{}", existing)))
        .unwrap()
        .with_operation(BulkRequestOperation::new(BulkMethod::Put, format!("/Users/{}", existing)))
        .unwrap();

    let response: BulkResponse = provider.process(request, &context).await.unwrap();
    let statuses: Vec<u16> = response.operations.iter().map(|operation| operation.status).collect();
    assert_eq!(statuses, vec![404, 204, 400]);
    assert_eq!(response.failures(), 2);
}

#[tokio::test]
async fn test_duplicate_bulk_ids_are_dropped() {
    let request = wire_request(json!({
        "Operations": [
            {"method": "DELETE", "path": "/Users/1", "bulkId": "same"},
            {"method": "DELETE", "path": "/Users/2", "bulkId": "SAME"}
        ]
    }));
    assert_eq!(request.operations().len(), 1);
    assert!(request.schemas.contains(identifiers::BULK_REQUEST));

    let empty_id = serde_json::from_value::<BulkRequest>(json!({
        "Operations": [{"method": "DELETE", "path": "/Users/1", "bulkId": ""}]
    }));
    assert!(empty_id.is_err());
}

#[tokio::test]
async fn test_forward_reference_is_rejected() {
    let provider = InMemoryProvider::new();
    let context = context("bulk-forward");

    let request = wire_request(json!({
        "Operations": [
            {
                "method": "POST",
                "path": "/Groups",
                "bulkId": "group",
                "data": {"displayName": "Early", "members": [{"value": "bulkId:later"}]}
            },
            {"method": "POST", "path": "/Users", "bulkId": "later", "data": {"userName": "late"}}
        ]
    }));

    let response = provider.process(request, &context).await.unwrap();
    assert_eq!(response.operations[0].status, 409);
    assert_eq!(
        response.operations[0].response.as_ref().unwrap()["scimType"],
        "invalidValue"
    );
    assert_eq!(response.operations[1].status, 201);
}
