//! Provider traits: the seam between protocol handling and resource
//! persistence.
//!
//! A backend implements [`Provider<R>`] once per resource kind it serves, plus
//! [`ServiceCatalog`] to describe itself. Protocol-level concerns (attribute
//! selection, error envelopes, bulk dispatch) are layered on top by
//! [`ProviderAdapter`](crate::providers::ProviderAdapter) and
//! [`BulkProcessor`](crate::bulk::BulkProcessor).
//!
//! Every operation has a default that fails with
//! [`ProviderError::NotImplemented`], so a read-only backend implements only
//! `retrieve` and `query`.

use crate::addressing::SchemaExtension;
use crate::bulk::{BulkProcessor, BulkRequest, BulkResponse};
use crate::error::{ScimError, ScimResult};
use crate::patch::PatchRequest;
use crate::protocol::{QueryResponse, RequestContext, ResourceQuery};
use crate::providers::ProviderError;
use crate::resource::{Core2Group, Core2ResourceType, Core2User, ResourceKind};
use crate::schema::{ServiceConfiguration, TypeScheme, catalog};
use std::future::Future;

/// What a service provider advertises about itself.
///
/// The defaults describe the built-in User and Group resource types with a
/// conservative configuration and no custom schema collections.
pub trait ServiceCatalog: Send + Sync {
    fn configuration(&self) -> ServiceConfiguration {
        ServiceConfiguration::default()
    }

    fn resource_types(&self) -> Vec<&Core2ResourceType> {
        catalog::resource_types()
    }

    fn schema(&self) -> Vec<&TypeScheme> {
        catalog::schemas()
    }

    /// Custom schemas served from their own collections.
    fn extensions(&self) -> &[SchemaExtension] {
        &[]
    }
}

/// CRUD, query and patch for one resource kind.
pub trait Provider<R: ResourceKind>: ServiceCatalog {
    /// The error type returned by provider operations.
    type Error: std::error::Error + Send + Sync + 'static + From<ProviderError> + Into<ScimError>;

    /// Create a resource. The provider assigns `id` and `meta`.
    fn create(
        &self,
        resource: R,
        context: &RequestContext,
    ) -> impl Future<Output = Result<R, Self::Error>> + Send {
        let _ = (resource, context);
        async { Err(ProviderError::not_implemented("create").into()) }
    }

    /// Retrieve a resource by identifier. `None` when it does not exist.
    fn retrieve(
        &self,
        id: &str,
        context: &RequestContext,
    ) -> impl Future<Output = Result<Option<R>, Self::Error>> + Send {
        let _ = (id, context);
        async { Err(ProviderError::not_implemented("retrieve").into()) }
    }

    /// Replace the resource identified by `resource.id` wholesale.
    fn replace(
        &self,
        resource: R,
        context: &RequestContext,
    ) -> impl Future<Output = Result<R, Self::Error>> + Send {
        let _ = (resource, context);
        async { Err(ProviderError::not_implemented("replace").into()) }
    }

    /// Delete a resource. Deleting a missing resource is an error.
    fn delete(
        &self,
        id: &str,
        context: &RequestContext,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send {
        let _ = (id, context);
        async { Err(ProviderError::not_implemented("delete").into()) }
    }

    /// Every resource matching the query's filters, unpaginated.
    fn query(
        &self,
        query: &ResourceQuery,
        context: &RequestContext,
    ) -> impl Future<Output = Result<Vec<R>, Self::Error>> + Send {
        let _ = (query, context);
        async { Err(ProviderError::not_implemented("query").into()) }
    }

    /// Apply a PATCH request to the resource identified by `id`.
    fn update(
        &self,
        id: &str,
        patch: &PatchRequest,
        context: &RequestContext,
    ) -> impl Future<Output = Result<R, Self::Error>> + Send {
        let _ = (id, patch, context);
        async { Err(ProviderError::not_implemented("update").into()) }
    }

    /// One page of [`query`](Provider::query) results.
    fn paginate_query(
        &self,
        query: &ResourceQuery,
        context: &RequestContext,
    ) -> impl Future<Output = Result<QueryResponse<R>, Self::Error>> + Send {
        async move {
            let matches = self.query(query, context).await?;
            Ok(QueryResponse::paginate(matches, query.pagination, None))
        }
    }
}

/// A provider serving both Users and Groups, which is what a bulk request
/// needs.
pub trait ScimProvider: Provider<Core2User> + Provider<Core2Group> + Sized {
    /// Process a bulk request against this provider.
    fn process(
        &self,
        request: BulkRequest,
        context: &RequestContext,
    ) -> impl Future<Output = ScimResult<BulkResponse>> + Send {
        async move { BulkProcessor::new(self).process(request, context).await }
    }
}

impl<P> ScimProvider for P where P: Provider<Core2User> + Provider<Core2Group> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    struct ReadOnly;

    impl ServiceCatalog for ReadOnly {}

    impl Provider<Core2Group> for ReadOnly {
        type Error = ProviderError;

        async fn retrieve(
            &self,
            id: &str,
            _context: &RequestContext,
        ) -> Result<Option<Core2Group>, Self::Error> {
            let mut group = Core2Group::with_display_name("Everyone");
            group.resource.id = Some(id.to_string());
            Ok(Some(group))
        }
    }

    #[tokio::test]
    async fn test_unimplemented_operations() {
        let provider = ReadOnly;
        let context = RequestContext::new("test");

        let found = Provider::<Core2Group>::retrieve(&provider, "1", &context)
            .await
            .unwrap();
        assert_eq!(found.unwrap().display_name.as_deref(), Some("Everyone"));

        let error = Provider::<Core2Group>::delete(&provider, "1", &context)
            .await
            .unwrap_err();
        assert_eq!(ScimError::from(error).kind(), ErrorKind::NotImplemented);
    }

    #[test]
    fn test_default_catalog() {
        let provider = ReadOnly;
        assert_eq!(provider.resource_types().len(), 2);
        assert!(provider.extensions().is_empty());
        assert!(
            provider
                .schema()
                .iter()
                .any(|scheme| scheme.identifier() == crate::schema::identifiers::CORE2_USER)
        );
    }
}
