//! Property-based checks.

use crate::common::{context, user_body, users};
use proptest::prelude::*;
use scim_core::bulk::reference::{BulkIdentifiers, referenced_bulk_id};
use scim_core::patch::{OperationName, PatchOperation, PatchRequest, Patchable};
use scim_core::protocol::{PaginationParameters, QueryResponse, ResourceQuery};
use scim_core::providers::InMemoryProvider;
use scim_core::resource::{Core2Group, Member};
use serde_json::json;

fn group_of(values: &[String]) -> Core2Group {
    let mut group = Core2Group::with_display_name("Tour Guides");
    group.members = values.iter().map(|value| Member::user(value.clone())).collect();
    group
}

fn member_values(group: &Core2Group) -> Vec<String> {
    group.members.iter().map(|member| member.value.clone()).collect()
}

fn recased(value: &str, upper: bool) -> String {
    if upper {
        value.to_uppercase()
    } else {
        value.to_lowercase()
    }
}

/// Distinct member values, compared without case.
fn distinct_members(max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[a-z0-9]{1,8}", 0..max)
        .prop_map(|values| values.into_iter().collect())
}

proptest! {
    #[test]
    fn paging_never_exceeds_the_request(
        total in 0usize..60,
        start in 1usize..80,
        count in 0usize..80,
    ) {
        let items: Vec<usize> = (0..total).collect();
        let page = QueryResponse::paginate(
            items,
            Some(PaginationParameters::new(Some(start), Some(count))),
            None,
        );

        let available = total.saturating_sub(start - 1);
        prop_assert_eq!(page.total_results, total);
        prop_assert_eq!(page.items_per_page, count.min(available));
        prop_assert_eq!(page.resources.len(), page.items_per_page);
        if let Some(first) = page.resources.first() {
            prop_assert_eq!(*first, start - 1);
            prop_assert_eq!(page.start_index, Some(start));
        }
    }

    #[test]
    fn bulk_references_resolve_case_insensitively(
        bulk_id in "[A-Za-z0-9-]{1,24}",
        id in "[a-f0-9]{8}",
    ) {
        let reference = format!("bulkId:{}", bulk_id);
        prop_assert_eq!(referenced_bulk_id(&reference), Some(bulk_id.as_str()));

        let mut identifiers = BulkIdentifiers::new();
        identifiers.record(&bulk_id.to_uppercase(), id.clone());
        prop_assert_eq!(identifiers.resolve(&reference).unwrap(), id);
    }

    #[test]
    fn every_created_user_is_listed(count in 0usize..12) {
        let listed = tokio_test::block_on(async {
            let provider = InMemoryProvider::new();
            let context = context("proptest");
            for n in 0..count {
                users(&provider)
                    .create(user_body(&format!("user{}", n)), &context)
                    .await
                    .unwrap();
            }
            users(&provider)
                .query(&ResourceQuery::new(), &context)
                .await
                .unwrap()
                .total_results
        });
        prop_assert_eq!(listed, count);
    }

    #[test]
    fn adding_a_present_member_keeps_length_and_order(
        values in distinct_members(10).prop_filter("needs a member", |values| !values.is_empty()),
        pick in any::<prop::sample::Index>(),
        upper in any::<bool>(),
    ) {
        let mut group = group_of(&values);
        let present = recased(pick.get::<String>(&values), upper);

        let request = PatchRequest::new(vec![
            PatchOperation::add("members", json!([{"value": present}])).unwrap(),
        ]);
        group.apply(&request).unwrap();

        prop_assert_eq!(member_values(&group), values);
    }

    #[test]
    fn removing_members_without_a_value_empties_them(
        values in prop::collection::vec("[A-Za-z0-9]{1,8}", 0..12),
    ) {
        let mut group = group_of(&values);

        let request = PatchRequest::new(vec![PatchOperation::remove("members").unwrap()]);
        group.apply(&request).unwrap();

        prop_assert!(group.members.is_empty());
    }

    #[test]
    fn add_then_remove_restores_members(
        values in distinct_members(10),
        added in "[a-z0-9]{9,12}",
        upper in any::<bool>(),
    ) {
        let mut group = group_of(&values);

        let request = PatchRequest::new(vec![
            PatchOperation::add("members", json!([{"value": added.clone()}])).unwrap(),
            PatchOperation::new(
                OperationName::Remove,
                Some("members"),
                Some(json!([{"value": recased(&added, upper)}])),
            )
            .unwrap(),
        ]);
        group.apply(&request).unwrap();

        prop_assert_eq!(member_values(&group), values);
    }
}
