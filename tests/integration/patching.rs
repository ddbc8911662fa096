//! PATCH requests against stored resources.

use crate::common::{context, create_user, groups, users};
use scim_core::protocol::ResourceQuery;
use scim_core::providers::InMemoryProvider;
use scim_core::schema::identifiers;
use scim_core::ScimType;
use serde_json::json;

#[tokio::test]
async fn test_patch_user_attributes() {
    let provider = InMemoryProvider::new();
    let context = context("patch-user");
    let id = create_user(&provider, "bjensen").await;

    let patched = users(&provider)
        .update(
            &id,
            json!({
                "schemas": [identifiers::PATCH_OPERATION],
                "Operations": [
                    {"op": "replace", "path": "displayName", "value": "Babs Jensen"},
                    {
                        "op": "add",
                        "path": "emails",
                        "value": [{"type": "home", "value": "babs@jensen.org"}]
                    },
                    {"op": "remove", "path": "emails[type eq \"work\"]"},
                    {"op": "replace", "path": "active", "value": "False"}
                ]
            }),
            &context,
        )
        .await
        .unwrap();

    assert_eq!(patched["displayName"], "Babs Jensen");
    assert_eq!(patched["emails"], json!([{"type": "home", "value": "babs@jensen.org"}]));
    assert_eq!(patched["active"], false);

    let stored = users(&provider)
        .retrieve(&id, &ResourceQuery::new(), &context)
        .await
        .unwrap();
    assert_eq!(stored, patched);
}

#[tokio::test]
async fn test_patch_group_members() {
    let provider = InMemoryProvider::new();
    let context = context("patch-group");
    let alice = create_user(&provider, "alice").await;
    let bob = create_user(&provider, "bob").await;

    let created = groups(&provider)
        .create(
            json!({"displayName": "Tour Guides", "members": [{"value": alice, "type": "User"}]}),
            &context,
        )
        .await
        .unwrap();
    let id = created["id"].as_str().unwrap();

    let patched = groups(&provider)
        .update(
            id,
            json!({
                "schemas": [identifiers::PATCH_OPERATION],
                "Operations": [
                    {"op": "add", "path": "members", "value": [{"value": bob}]},
                    {"op": "remove", "path": format!("members[value eq \"{}\"]", alice)}
                ]
            }),
            &context,
        )
        .await
        .unwrap();

    assert_eq!(patched["members"].as_array().unwrap().len(), 1);
    assert_eq!(patched["members"][0]["value"], bob.as_str());
}

#[tokio::test]
async fn test_failed_patch_leaves_resource_unchanged() {
    let provider = InMemoryProvider::new();
    let context = context("patch-failure");
    let id = create_user(&provider, "bjensen").await;
    let before = users(&provider)
        .retrieve(&id, &ResourceQuery::new(), &context)
        .await
        .unwrap();

    let error = users(&provider)
        .update(
            &id,
            json!({
                "schemas": [identifiers::PATCH_OPERATION],
                "Operations": [
                    {"op": "replace", "path": "displayName", "value": "Babs"},
                    {"op": "remove"}
                ]
            }),
            &context,
        )
        .await
        .unwrap_err();
    assert_eq!(error.status(), 400);
    assert_eq!(error.scim_type(), Some(ScimType::NoTarget));

    let after = users(&provider)
        .retrieve(&id, &ResourceQuery::new(), &context)
        .await
        .unwrap();
    assert_eq!(after, before);
}
