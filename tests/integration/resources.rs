//! Resource lifecycle through the protocol adapter.

use crate::common::{context, create_user, groups, user_body, users};
use scim_core::protocol::ResourceQuery;
use scim_core::providers::{InMemoryProvider, InMemoryProviderConfig};
use scim_core::resource::Core2User;
use scim_core::schema::identifiers;
use scim_core::{ErrorKind, ScimType};
use serde_json::json;
use url::Url;

#[tokio::test]
async fn test_create_then_retrieve() {
    let provider = InMemoryProvider::with_config(
        InMemoryProviderConfig::default()
            .with_base_uri(Url::parse("https://example.com/scim/v2/").unwrap()),
    );
    let context = context("create-retrieve");

    let created = users(&provider)
        .create(
            json!({"userName": "bjensen", "externalId": "bjensen", "password": "t1meMa$heen"}),
            &context,
        )
        .await
        .unwrap();
    let id = created["id"].as_str().unwrap();

    assert_ne!(id, "bjensen");
    assert_eq!(created["externalId"], "bjensen");
    assert_eq!(created["meta"]["resourceType"], "User");
    assert!(created["meta"]["location"].as_str().unwrap().ends_with(&format!("/Users/{}", id)));
    assert!(created.get("password").is_none());

    let fetched = users(&provider)
        .retrieve(id, &ResourceQuery::new(), &context)
        .await
        .unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_schema_is_declared_once() {
    let mut user = Core2User::with_user_name("bjensen");
    assert!(!user.resource.add_schema(identifiers::CORE2_USER).unwrap());
    assert!(!user.resource.add_schema(&identifiers::CORE2_USER.to_uppercase()).unwrap());

    let provider = InMemoryProvider::new();
    let body = json!({
        "schemas": [identifiers::CORE2_USER, identifiers::CORE2_USER],
        "userName": "bjensen"
    });
    let created = users(&provider).create(body, &context("schemas")).await.unwrap();
    assert_eq!(created["schemas"], json!([identifiers::CORE2_USER]));
}

#[tokio::test]
async fn test_replace_keeps_identity() {
    let provider = InMemoryProvider::new();
    let context = context("replace");
    let id = create_user(&provider, "bjensen").await;
    let before = users(&provider)
        .retrieve(&id, &ResourceQuery::new(), &context)
        .await
        .unwrap();

    let replaced = users(&provider)
        .replace(&id, json!({"id": "ignored", "userName": "babs"}), &context)
        .await
        .unwrap();

    assert_eq!(replaced["id"], id.as_str());
    assert_eq!(replaced["userName"], "babs");
    assert!(replaced.get("emails").is_none());
    assert_eq!(replaced["meta"]["created"], before["meta"]["created"]);
    assert_ne!(replaced["meta"]["version"], before["meta"]["version"]);
}

#[tokio::test]
async fn test_uniqueness_conflict() {
    let provider = InMemoryProvider::new();
    let context = context("conflict");
    create_user(&provider, "bjensen").await;

    let error = users(&provider)
        .create(user_body("BJensen"), &context)
        .await
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Conflict);
    assert_eq!(error.scim_type(), Some(ScimType::Uniqueness));
}

#[tokio::test]
async fn test_delete_then_missing() {
    let provider = InMemoryProvider::new();
    let context = context("delete");
    let id = create_user(&provider, "bjensen").await;

    users(&provider).delete(&id, &context).await.unwrap();

    let error = users(&provider)
        .retrieve(&id, &ResourceQuery::new(), &context)
        .await
        .unwrap_err();
    assert_eq!(error.status(), 404);
    let error = users(&provider).delete(&id, &context).await.unwrap_err();
    assert_eq!(error.status(), 404);
}

#[tokio::test]
async fn test_users_and_groups_are_separate() {
    let provider = InMemoryProvider::new();
    let context = context("collections");
    let id = create_user(&provider, "bjensen").await;

    let error = groups(&provider)
        .retrieve(&id, &ResourceQuery::new(), &context)
        .await
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_attribute_projection() {
    let provider = InMemoryProvider::new();
    let context = context("projection");
    let id = create_user(&provider, "bjensen").await;

    let query = ResourceQuery::from_query_string("excludedAttributes=emails,name").unwrap();
    let fetched = users(&provider).retrieve(&id, &query, &context).await.unwrap();
    assert!(fetched.get("emails").is_none());
    assert!(fetched.get("name").is_none());
    assert_eq!(fetched["userName"], "bjensen");

    let query = ResourceQuery::from_query_string("attributes=name.givenName").unwrap();
    let fetched = users(&provider).retrieve(&id, &query, &context).await.unwrap();
    assert_eq!(fetched["name"], json!({"givenName": "bjensen"}));
    assert_eq!(fetched["id"], id.as_str());
}
