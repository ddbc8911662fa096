//! Query filters against a populated provider.

use crate::common::{context, create_user, users};
use scim_core::protocol::ResourceQuery;
use scim_core::providers::InMemoryProvider;
use scim_core::{ErrorKind, ErrorResponse, ScimType};

async fn seeded() -> InMemoryProvider {
    let provider = InMemoryProvider::new();
    create_user(&provider, "bjensen").await;
    create_user(&provider, "jsmith").await;
    provider
}

async fn user_names(provider: &InMemoryProvider, query: &str) -> Vec<String> {
    let query = ResourceQuery::from_query_string(query).unwrap();
    let page = users(provider).query(&query, &context("filter")).await.unwrap();
    page.resources
        .iter()
        .map(|user| user["userName"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_equality_filters() {
    let provider = seeded().await;

    assert_eq!(
        user_names(&provider, "filter=userName%20eq%20%22BJENSEN%22").await,
        vec!["bjensen"]
    );
    let either = "filter=userName%20eq%20%22bjensen%22%20or%20userName%20eq%20%22jsmith%22";
    assert_eq!(user_names(&provider, either).await.len(), 2);
    assert!(user_names(&provider, "filter=active%20eq%20false").await.is_empty());
    assert_eq!(user_names(&provider, "").await.len(), 2);
}

#[tokio::test]
async fn test_last_modified_range() {
    let provider = seeded().await;

    let everything = concat!(
        r#"filter=meta.lastModified ge "2000-01-01T00:00:00Z""#,
        r#" and meta.lastModified le "2999-01-01T00:00:00Z""#
    );
    let query =
        ResourceQuery::from_query_string(&everything.replace(' ', "%20").replace('"', "%22"))
            .unwrap();
    let page = users(&provider).query(&query, &context("range")).await.unwrap();
    assert_eq!(page.total_results, 2);
}

#[tokio::test]
async fn test_unsupported_operator_is_rejected() {
    let provider = seeded().await;

    let query = ResourceQuery::from_query_string("filter=userName%20gt%20%22a%22").unwrap();
    let error = users(&provider).query(&query, &context("gt")).await.unwrap_err();

    assert_eq!(error.kind(), ErrorKind::InvalidFilter);
    let envelope = ErrorResponse::from(&error);
    assert_eq!(envelope.status, 400);
    assert_eq!(envelope.scim_type, Some(ScimType::InvalidFilter));
    assert!(envelope.detail.unwrap().contains("gt"));
}

#[tokio::test]
async fn test_unknown_attribute_is_rejected() {
    let provider = InMemoryProvider::new();

    let query = ResourceQuery::from_query_string("filter=nickName%20eq%20%22Babs%22").unwrap();
    let error = users(&provider).query(&query, &context("unknown")).await.unwrap_err();
    assert_eq!(error.scim_type(), Some(ScimType::InvalidFilter));
}

#[tokio::test]
async fn test_malformed_filter() {
    let error = ResourceQuery::from_query_string("filter=userName%20eq").unwrap_err();
    assert_eq!(error.status(), 400);
}

#[test]
fn test_oversized_filters_are_rejected() {
    let nested = format!("{}userName eq \"a\"{}", "(".repeat(5000), ")".repeat(5000));
    let error =
        ResourceQuery::from_query_string(&format!("filter={}", nested)).unwrap_err();
    assert_eq!(error.scim_type(), Some(ScimType::InvalidFilter));

    let grouped = vec![r#"(a eq "1" or b eq "2")"#; 20].join(" and ");
    let error = ResourceQuery::from_query_string(
        &format!("filter={}", grouped).replace(' ', "%20").replace('"', "%22"),
    )
    .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::InvalidFilter);
    assert_eq!(error.status(), 400);
}

#[tokio::test]
async fn test_paging() {
    let provider = seeded().await;
    create_user(&provider, "mmorgan").await;

    let query = ResourceQuery::from_query_string("startIndex=2&count=1").unwrap();
    let page = users(&provider).query(&query, &context("paging")).await.unwrap();
    assert_eq!(page.total_results, 3);
    assert_eq!(page.items_per_page, 1);
    assert_eq!(page.start_index, Some(2));
    assert_eq!(page.resources.len(), 1);

    let query = ResourceQuery::from_query_string("startIndex=10").unwrap();
    let page = users(&provider).query(&query, &context("paging")).await.unwrap();
    assert_eq!(page.total_results, 3);
    assert!(page.resources.is_empty());
}
