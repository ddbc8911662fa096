//! Parallel writers against one provider.

use crate::common::{context, user_body, users};
use futures::future::join_all;
use scim_core::protocol::ResourceQuery;
use scim_core::providers::InMemoryProvider;
use scim_core::ErrorKind;

#[tokio::test]
async fn test_parallel_creates_get_distinct_identifiers() {
    let provider = InMemoryProvider::new();
    let context = context("parallel");
    let adapter = users(&provider);

    let results = join_all(
        (0..25).map(|n| adapter.create(user_body(&format!("user{}", n)), &context)),
    )
    .await;

    let mut ids: Vec<String> = results
        .into_iter()
        .map(|created| created.unwrap()["id"].as_str().unwrap().to_string())
        .collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 25);

    let page = adapter.query(&ResourceQuery::new(), &context).await.unwrap();
    assert_eq!(page.total_results, 25);
}

#[tokio::test]
async fn test_parallel_duplicates_create_one_resource() {
    let provider = InMemoryProvider::new();
    let context = context("duplicates");
    let adapter = users(&provider);

    let results = join_all((0..10).map(|_| adapter.create(user_body("bjensen"), &context))).await;

    let created = results.iter().filter(|result| result.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|result| matches!(result, Err(error) if error.kind() == ErrorKind::Conflict))
        .count();
    assert_eq!(created, 1);
    assert_eq!(conflicts, 9);
}

#[tokio::test]
async fn test_spawned_tasks_share_a_cloned_provider() {
    let provider = InMemoryProvider::new();

    let handles: Vec<_> = (0..8)
        .map(|n| {
            let provider = provider.clone();
            tokio::spawn(async move {
                users(&provider)
                    .create(user_body(&format!("task{}", n)), &context("spawned"))
                    .await
                    .map(|_| ())
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let page = users(&provider)
        .query(&ResourceQuery::new(), &context("spawned"))
        .await
        .unwrap();
    assert_eq!(page.total_results, 8);
}
