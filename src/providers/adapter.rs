//! Protocol-level operations over a typed provider.
//!
//! [`ProviderAdapter`] is what an HTTP layer calls: it takes the pieces of a
//! SCIM request (identifier, query parameters, body) and answers with
//! response documents or a [`ScimError`]. Attribute selection, `id`-scoped
//! filters and error conversion happen here so providers only deal with
//! typed resources.

use crate::error::{ScimError, ScimResult};
use crate::filter::Filter;
use crate::patch::PatchRequest;
use crate::protocol::{QueryResponse, RequestContext, ResourceQuery};
use crate::providers::Provider;
use crate::resource::{ResourceKind, projection};
use log::{debug, info};
use serde_json::Value;
use std::marker::PhantomData;

/// Serves the resources of kind `R` from provider `P`.
pub struct ProviderAdapter<'a, R, P> {
    provider: &'a P,
    kind: PhantomData<fn() -> R>,
}

impl<'a, R, P> ProviderAdapter<'a, R, P>
where
    R: ResourceKind,
    P: Provider<R>,
{
    pub fn new(provider: &'a P) -> Self {
        Self {
            provider,
            kind: PhantomData,
        }
    }

    /// `POST /{collection}`
    pub async fn create(&self, body: Value, context: &RequestContext) -> ScimResult<Value> {
        info!(
            "Creating {} resource (request: '{}')",
            R::RESOURCE_TYPE,
            context.request_id
        );
        let resource = parse::<R>(body)?;
        let created = self
            .provider
            .create(resource, context)
            .await
            .map_err(Into::<ScimError>::into)?;
        render(&created, &[], &[])
    }

    /// `GET /{collection}/{id}`
    ///
    /// Filters in `query` further constrain the lookup: a resource that exists
    /// but does not match them is reported as not found.
    pub async fn retrieve(
        &self,
        id: &str,
        query: &ResourceQuery,
        context: &RequestContext,
    ) -> ScimResult<Value> {
        let id = required_identifier(id)?;
        debug!(
            "Retrieving {} '{}' (request: '{}')",
            R::RESOURCE_TYPE,
            id,
            context.request_id
        );

        let found = if query.filters.is_empty() {
            self.provider
                .retrieve(id, context)
                .await
                .map_err(Into::<ScimError>::into)?
        } else {
            let scoped = ResourceQuery {
                filters: query
                    .filters
                    .iter()
                    .map(|alternate| Filter::equals("id", id).and(alternate.clone()))
                    .collect(),
                ..ResourceQuery::new()
            };
            self.provider
                .query(&scoped, context)
                .await
                .map_err(Into::<ScimError>::into)?
                .into_iter()
                .next()
        };

        let resource = found.ok_or_else(|| ScimError::resource_not_found(R::RESOURCE_TYPE, id))?;
        render(&resource, &query.attributes, &query.excluded_attributes)
    }

    /// `PUT /{collection}/{id}`. The identifier in the path wins over one in
    /// the body.
    pub async fn replace(
        &self,
        id: &str,
        body: Value,
        context: &RequestContext,
    ) -> ScimResult<Value> {
        let id = required_identifier(id)?;
        info!(
            "Replacing {} '{}' (request: '{}')",
            R::RESOURCE_TYPE,
            id,
            context.request_id
        );

        let mut resource = parse::<R>(body)?;
        resource.resource_mut().id = Some(id.to_string());
        let replaced = self
            .provider
            .replace(resource, context)
            .await
            .map_err(Into::<ScimError>::into)?;
        render(&replaced, &[], &[])
    }

    /// `PATCH /{collection}/{id}`
    pub async fn update(
        &self,
        id: &str,
        body: Value,
        context: &RequestContext,
    ) -> ScimResult<Value> {
        let id = required_identifier(id)?;
        info!(
            "Patching {} '{}' (request: '{}')",
            R::RESOURCE_TYPE,
            id,
            context.request_id
        );

        let patch: PatchRequest = serde_json::from_value(body)?;
        let updated = self
            .provider
            .update(id, &patch, context)
            .await
            .map_err(Into::<ScimError>::into)?;
        render(&updated, &[], &[])
    }

    /// `DELETE /{collection}/{id}`
    pub async fn delete(&self, id: &str, context: &RequestContext) -> ScimResult<()> {
        let id = required_identifier(id)?;
        info!(
            "Deleting {} '{}' (request: '{}')",
            R::RESOURCE_TYPE,
            id,
            context.request_id
        );
        self.provider.delete(id, context).await.map_err(Into::into)
    }

    /// `GET /{collection}?filter=...`
    pub async fn query(
        &self,
        query: &ResourceQuery,
        context: &RequestContext,
    ) -> ScimResult<QueryResponse<Value>> {
        debug!(
            "Querying {} with {} filter alternates (request: '{}')",
            R::RESOURCE_TYPE,
            query.filters.len(),
            context.request_id
        );

        let page = self
            .provider
            .paginate_query(query, context)
            .await
            .map_err(Into::<ScimError>::into)?;
        page.try_map(|resource| render(&resource, &query.attributes, &query.excluded_attributes))
    }
}

fn required_identifier(id: &str) -> ScimResult<&str> {
    let id = id.trim();
    if id.is_empty() {
        return Err(ScimError::invalid_argument("id", "a resource identifier is required"));
    }
    Ok(id)
}

fn parse<R: ResourceKind>(body: Value) -> ScimResult<R> {
    let mut resource: R = serde_json::from_value(body)?;
    resource.normalize();
    Ok(resource)
}

fn render<R: ResourceKind>(
    resource: &R,
    attributes: &[String],
    excluded_attributes: &[String],
) -> ScimResult<Value> {
    projection::project(resource, attributes, excluded_attributes)
        .map_err(|e| ScimError::internal(format!("failed to render {}: {}", R::RESOURCE_TYPE, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::providers::InMemoryProvider;
    use crate::resource::{Core2Group, Core2User};
    use crate::schema::identifiers;
    use serde_json::json;

    fn users(provider: &InMemoryProvider) -> ProviderAdapter<'_, Core2User, InMemoryProvider> {
        ProviderAdapter::new(provider)
    }

    #[tokio::test]
    async fn test_create_hides_password() {
        let provider = InMemoryProvider::default();
        let context = RequestContext::new("create");

        let created = users(&provider)
            .create(
                json!({"userName": "bjensen", "password": "t1meMa$heen", "externalId": "bjensen"}),
                &context,
            )
            .await
            .unwrap();

        assert!(created.get("password").is_none());
        assert_ne!(created["id"], created["externalId"]);
        assert_eq!(created["schemas"], json!([identifiers::CORE2_USER]));
    }

    #[tokio::test]
    async fn test_retrieve_with_filter() {
        let provider = InMemoryProvider::default();
        let context = RequestContext::new("retrieve");
        let adapter = users(&provider);

        let created = adapter
            .create(json!({"userName": "bjensen", "active": true}), &context)
            .await
            .unwrap();
        let id = created["id"].as_str().unwrap();

        let matching =
            ResourceQuery::from_query_string("filter=active%20eq%20true&attributes=userName")
                .unwrap();
        let found = adapter.retrieve(id, &matching, &context).await.unwrap();
        assert_eq!(found["userName"], "bjensen");
        assert!(found.get("active").is_none());

        let other = ResourceQuery::from_query_string("filter=active%20eq%20false").unwrap();
        let error = adapter.retrieve(id, &other, &context).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_missing_identifier() {
        let provider = InMemoryProvider::default();
        let context = RequestContext::new("delete");

        let error = users(&provider).delete("  ", &context).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::BadRequest);

        let error = users(&provider).delete("nope", &context).await.unwrap_err();
        assert_eq!(error.status(), 404);
    }

    #[tokio::test]
    async fn test_patch_and_query_groups() {
        let provider = InMemoryProvider::default();
        let context = RequestContext::new("groups");
        let groups: ProviderAdapter<'_, Core2Group, _> = ProviderAdapter::new(&provider);

        let created = groups
            .create(json!({"displayName": "Admins"}), &context)
            .await
            .unwrap();
        let id = created["id"].as_str().unwrap();

        let patched = groups
            .update(
                id,
                json!({
                    "schemas": [identifiers::PATCH_OPERATION],
                    "Operations": [{"op": "add", "path": "members", "value": [{"value": "u1"}]}]
                }),
                &context,
            )
            .await
            .unwrap();
        assert_eq!(patched["members"][0]["value"], "u1");

        let query =
            ResourceQuery::from_query_string("filter=members.value%20eq%20%22u1%22").unwrap();
        let page = groups.query(&query, &context).await.unwrap();
        assert_eq!(page.total_results, 1);
        assert_eq!(page.resources[0]["displayName"], "Admins");
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let provider = InMemoryProvider::default();
        let context = RequestContext::new("bad");

        let error = users(&provider)
            .create(json!({"userName": ["not", "a", "string"]}), &context)
            .await
            .unwrap_err();
        assert_eq!(error.status(), 400);
    }
}
