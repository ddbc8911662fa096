//! Query parameters of list requests and the list response envelope.

use crate::error::{ScimError, ScimResult};
use crate::filter::Filter;
use crate::resource::Schemas;
use crate::schema::identifiers;
use serde::{Deserialize, Serialize};

/// `startIndex` and `count` of a list request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaginationParameters {
    /// 1-based index of the first result
    pub start_index: Option<usize>,
    /// Maximum number of results
    pub count: Option<usize>,
}

impl PaginationParameters {
    pub fn new(start_index: Option<usize>, count: Option<usize>) -> Self {
        Self { start_index, count }
    }

    /// The 0-based offset of the first result.
    pub fn offset(&self) -> usize {
        self.start_index.unwrap_or(1).saturating_sub(1)
    }
}

/// A query against one resource collection.
///
/// `filters` are OR alternates as returned by [`Filter::parse`]; no filters
/// selects every resource.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceQuery {
    pub filters: Vec<Filter>,
    pub attributes: Vec<String>,
    pub excluded_attributes: Vec<String>,
    pub pagination: Option<PaginationParameters>,
}

impl ResourceQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the query string of `GET /Users?...`.
    ///
    /// Recognises `filter`, `attributes`, `excludedAttributes`, `startIndex`
    /// and `count`, case-insensitively. Other parameters are ignored. A
    /// `startIndex` below 1 is read as 1 and a negative `count` as 0.
    pub fn from_query_string(query: &str) -> ScimResult<Self> {
        let mut parsed = Self::new();
        let mut pagination = PaginationParameters::default();
        let mut paginated = false;

        let query = query.trim_start_matches('?');
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.to_ascii_lowercase().as_str() {
                "filter" => parsed.filters = Filter::parse(&value)?,
                "attributes" => parsed.attributes = attribute_list(&value),
                "excludedattributes" => parsed.excluded_attributes = attribute_list(&value),
                "startindex" => {
                    let start_index = integer_parameter("startIndex", &value)?.max(1);
                    pagination.start_index = Some(start_index as usize);
                    paginated = true;
                }
                "count" => {
                    pagination.count = Some(integer_parameter("count", &value)?.max(0) as usize);
                    paginated = true;
                }
                _ => {}
            }
        }

        if paginated {
            parsed.pagination = Some(pagination);
        }
        Ok(parsed)
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn with_attributes(mut self, attributes: &[&str]) -> Self {
        self.attributes = attributes.iter().map(|name| name.to_string()).collect();
        self
    }

    pub fn with_excluded_attributes(mut self, attributes: &[&str]) -> Self {
        self.excluded_attributes = attributes.iter().map(|name| name.to_string()).collect();
        self
    }

    pub fn with_pagination(mut self, start_index: Option<usize>, count: Option<usize>) -> Self {
        self.pagination = Some(PaginationParameters::new(start_index, count));
        self
    }
}

fn attribute_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

fn integer_parameter(name: &str, value: &str) -> ScimResult<i64> {
    value.trim().parse().map_err(|_| {
        ScimError::invalid_argument(name, format!("'{}' is not an integer", value))
    })
}

/// The `ListResponse` envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse<T> {
    pub schemas: Schemas,
    pub total_results: usize,
    pub items_per_page: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_index: Option<usize>,
    #[serde(rename = "Resources", default = "Vec::new")]
    pub resources: Vec<T>,
}

impl<T> QueryResponse<T> {
    /// One page of results out of `total_results` matches.
    ///
    /// `startIndex` is omitted when the page is empty.
    pub fn new(resources: Vec<T>, total_results: usize, start_index: usize) -> Self {
        Self {
            schemas: Schemas::declared(identifiers::LIST_RESPONSE),
            total_results,
            items_per_page: resources.len(),
            start_index: (!resources.is_empty()).then_some(start_index),
            resources,
        }
    }

    /// Slice one page out of every match.
    ///
    /// `default_count` applies when the request names no `count`; without
    /// either, the page runs to the end.
    pub fn paginate(
        mut matches: Vec<T>,
        pagination: Option<PaginationParameters>,
        default_count: Option<usize>,
    ) -> Self {
        let pagination = pagination.unwrap_or_default();
        let total_results = matches.len();
        let offset = pagination.offset().min(total_results);
        let count = pagination.count.or(default_count).unwrap_or(total_results);

        let page: Vec<T> = matches.drain(offset..).take(count).collect();
        Self::new(page, total_results, pagination.start_index.unwrap_or(1).max(1))
    }

    /// Transform every resource, keeping the counters.
    pub fn try_map<U, E>(
        self,
        transform: impl FnMut(T) -> Result<U, E>,
    ) -> Result<QueryResponse<U>, E> {
        Ok(QueryResponse {
            schemas: self.schemas,
            total_results: self.total_results,
            items_per_page: self.items_per_page,
            start_index: self.start_index,
            resources: self.resources.into_iter().map(transform).collect::<Result<_, E>>()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_from_query_string() {
        let query = ResourceQuery::from_query_string(
            "?filter=userName%20eq%20%22bjensen%22&attributes=userName,%20emails&startIndex=2&count=10",
        )
        .unwrap();
        assert_eq!(query.filters, vec![Filter::equals("userName", "bjensen")]);
        assert_eq!(query.attributes, vec!["userName", "emails"]);
        assert_eq!(query.pagination, Some(PaginationParameters::new(Some(2), Some(10))));
    }

    #[test]
    fn test_out_of_range_pagination_is_clamped() {
        let query = ResourceQuery::from_query_string("startIndex=0&COUNT=-5").unwrap();
        let pagination = query.pagination.unwrap();
        assert_eq!(pagination.start_index, Some(1));
        assert_eq!(pagination.count, Some(0));
        assert_eq!(pagination.offset(), 0);
    }

    #[test]
    fn test_invalid_parameters() {
        let error = ResourceQuery::from_query_string("count=many").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::BadRequest);

        let error = ResourceQuery::from_query_string("filter=userName%20xx%20%22a%22").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidFilter);
    }

    #[test]
    fn test_without_parameters() {
        let query = ResourceQuery::from_query_string("").unwrap();
        assert_eq!(query, ResourceQuery::new());
    }

    #[test]
    fn test_paginate() {
        let matches: Vec<u32> = (1..=5).collect();

        let page = QueryResponse::paginate(
            matches.clone(),
            Some(PaginationParameters::new(Some(2), Some(2))),
            None,
        );
        assert_eq!(page.resources, vec![2, 3]);
        assert_eq!(page.total_results, 5);
        assert_eq!(page.items_per_page, 2);
        assert_eq!(page.start_index, Some(2));

        let page = QueryResponse::paginate(matches.clone(), None, Some(3));
        assert_eq!(page.resources, vec![1, 2, 3]);
        assert_eq!(page.start_index, Some(1));

        let page = QueryResponse::paginate(
            matches,
            Some(PaginationParameters::new(Some(9), None)),
            None,
        );
        assert!(page.resources.is_empty());
        assert_eq!(page.total_results, 5);
        assert_eq!(page.start_index, None);
    }

    #[test]
    fn test_list_response_envelope() {
        let response = QueryResponse::new(vec![json!({"id": "1"})], 3, 1);
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            json!({
                "schemas": [identifiers::LIST_RESPONSE],
                "totalResults": 3,
                "itemsPerPage": 1,
                "startIndex": 1,
                "Resources": [{"id": "1"}]
            })
        );

        let empty: QueryResponse<serde_json::Value> = QueryResponse::new(Vec::new(), 0, 1);
        assert_eq!(empty.start_index, None);
    }
}
