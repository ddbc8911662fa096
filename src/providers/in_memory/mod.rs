//! Reference provider serving Users and Groups from a [`StorageProvider`].
//!
//! [`InMemoryProvider`] owns the SCIM semantics (identifier assignment,
//! `meta` stamping, uniqueness, filtering, patching) and delegates
//! persistence to its storage backend, [`InMemoryStorage`] unless another one
//! is supplied.
//!
//! # Example
//!
//! ```rust
//! use scim_core::protocol::RequestContext;
//! use scim_core::providers::{InMemoryProvider, Provider};
//! use scim_core::resource::Core2User;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = InMemoryProvider::new();
//! let context = RequestContext::new("example");
//!
//! let user = provider
//!     .create(Core2User::with_user_name("bjensen"), &context)
//!     .await?;
//! assert!(user.resource.id.is_some());
//! # Ok(())
//! # }
//! ```

mod filter;

use crate::addressing::{self, SchemaExtension};
use crate::filter::{FilterTarget, matches_any};
use crate::patch::{PatchRequest, Patchable};
use crate::protocol::{PaginationParameters, QueryResponse, RequestContext, ResourceQuery};
use crate::providers::{Provider, ProviderError, ServiceCatalog};
use crate::resource::{Core2Group, Core2User, Metadata, ResourceKind, ResourceVersion};
use crate::schema::{ServiceConfiguration, catalog};
use crate::storage::{InMemoryStorage, StorageKey, StoragePrefix, StorageProvider};
use chrono::{DateTime, Utc};
use filter::{GROUP_FILTERS, USER_FILTERS};
use log::{debug, info, trace, warn};
use std::sync::Arc;
use tokio::sync::Mutex;
use url::Url;
use uuid::Uuid;

/// A resource kind the in-memory provider knows how to store and filter.
pub trait StoredResource: ResourceKind + FilterTarget + Patchable {
    /// Filterable attributes and the operators each one answers.
    const FILTERABLE: &'static [(&'static str, &'static [crate::filter::ComparisonOperator])];

    /// Check attributes the provider requires before storing.
    fn validate(&self) -> Result<(), ProviderError> {
        Ok(())
    }

    /// `(attribute, value)` pairs that must be unique among resources of
    /// this kind.
    fn unique_attributes(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

impl StoredResource for Core2User {
    const FILTERABLE: &'static [(&'static str, &'static [crate::filter::ComparisonOperator])] =
        USER_FILTERS;

    fn validate(&self) -> Result<(), ProviderError> {
        match self.user_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => Ok(()),
            _ => Err(ProviderError::MissingAttribute {
                resource_type: Self::RESOURCE_TYPE.to_string(),
                attribute: "userName".to_string(),
            }),
        }
    }

    fn unique_attributes(&self) -> Vec<(&'static str, String)> {
        self.user_name
            .iter()
            .map(|name| ("userName", name.clone()))
            .collect()
    }
}

impl StoredResource for Core2Group {
    const FILTERABLE: &'static [(&'static str, &'static [crate::filter::ComparisonOperator])] =
        GROUP_FILTERS;
}

/// Settings of an [`InMemoryProvider`].
#[derive(Debug, Clone)]
pub struct InMemoryProviderConfig {
    /// Base of `meta.location`; no locations are stamped without one
    pub base_uri: Option<Url>,
    /// Page size used when a query names no `count`
    pub default_page_size: usize,
    pub service_configuration: ServiceConfiguration,
    pub extensions: Vec<SchemaExtension>,
}

impl Default for InMemoryProviderConfig {
    fn default() -> Self {
        Self {
            base_uri: None,
            default_page_size: 100,
            service_configuration: ServiceConfiguration::new()
                .with_patch(true)
                .with_bulk(1000, 1_048_576)
                .with_filter(200),
            extensions: Vec::new(),
        }
    }
}

impl InMemoryProviderConfig {
    pub fn with_base_uri(mut self, base_uri: Url) -> Self {
        self.base_uri = Some(base_uri);
        self
    }

    pub fn with_default_page_size(mut self, page_size: usize) -> Self {
        self.default_page_size = page_size;
        self
    }

    pub fn with_service_configuration(mut self, configuration: ServiceConfiguration) -> Self {
        self.service_configuration = configuration;
        self
    }

    pub fn with_extension(mut self, extension: SchemaExtension) -> Self {
        self.extensions.push(extension);
        self
    }
}

/// Users and Groups over a pluggable storage backend.
///
/// Mutations are serialized so uniqueness checks and read-modify-write
/// patches see a consistent store.
#[derive(Debug, Clone)]
pub struct InMemoryProvider<S: StorageProvider = InMemoryStorage> {
    storage: S,
    config: InMemoryProviderConfig,
    writes: Arc<Mutex<()>>,
}

impl InMemoryProvider<InMemoryStorage> {
    /// Create a provider over a fresh [`InMemoryStorage`] with the default
    /// configuration.
    pub fn new() -> Self {
        Self::with_config(InMemoryProviderConfig::default())
    }

    pub fn with_config(config: InMemoryProviderConfig) -> Self {
        Self::with_storage(InMemoryStorage::new(), config)
    }
}

impl Default for InMemoryProvider<InMemoryStorage> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: StorageProvider> InMemoryProvider<S> {
    pub fn with_storage(storage: S, config: InMemoryProviderConfig) -> Self {
        Self {
            storage,
            config,
            writes: Arc::new(Mutex::new(())),
        }
    }

    pub fn config(&self) -> &InMemoryProviderConfig {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Remove every stored resource.
    pub async fn clear(&self) {
        let _guard = self.writes.lock().await;
        if let Err(e) = self.storage.clear().await {
            warn!("Failed to clear storage: {}", e);
        }
    }

    async fn load<R: ResourceKind>(&self, id: &str) -> Result<Option<R>, ProviderError> {
        let data = self
            .storage
            .get(StorageKey::new(R::RESOURCE_TYPE, id))
            .await
            .map_err(ProviderError::storage)?;

        match data {
            Some(data) => Ok(Some(serde_json::from_value(data)?)),
            None => Ok(None),
        }
    }

    async fn save<R: ResourceKind>(&self, id: &str, resource: &R) -> Result<(), ProviderError> {
        let data = serde_json::to_value(resource)?;
        self.storage
            .put(StorageKey::new(R::RESOURCE_TYPE, id), data)
            .await
            .map_err(ProviderError::storage)?;
        Ok(())
    }

    /// Reject `resource` when another stored resource holds one of its
    /// unique attribute values.
    async fn check_unique<R: StoredResource>(
        &self,
        resource: &R,
        exclude_id: Option<&str>,
    ) -> Result<(), ProviderError> {
        for (attribute, value) in resource.unique_attributes() {
            let case_exact = catalog::attribute(R::SCHEMA, attribute)
                .is_some_and(|definition| definition.case_exact);
            let matches = self
                .storage
                .find_by_attribute(
                    &StoragePrefix::new(R::RESOURCE_TYPE),
                    attribute,
                    &value,
                    case_exact,
                )
                .await
                .map_err(ProviderError::storage)?;

            if matches
                .iter()
                .any(|(key, _)| Some(key.resource_id()) != exclude_id)
            {
                return Err(ProviderError::DuplicateAttribute {
                    resource_type: R::RESOURCE_TYPE.to_string(),
                    attribute: attribute.to_string(),
                    value,
                });
            }
        }
        Ok(())
    }

    /// Bring `resource` into canonical form and stamp its `meta`.
    ///
    /// `created` is kept from the stored copy on replace and patch; the
    /// version is derived from the content including `lastModified`.
    fn stamp<R: ResourceKind>(
        &self,
        resource: &mut R,
        created: Option<DateTime<Utc>>,
    ) -> Result<(), ProviderError> {
        resource.normalize();

        let location = match &self.config.base_uri {
            Some(base_uri) => Some(
                addressing::resource_uri(&*resource, base_uri, &self.config.extensions)
                    .map_err(|e| ProviderError::InvalidData {
                        message: e.to_string(),
                    })?
                    .to_string(),
            ),
            None => None,
        };

        let now = Utc::now();
        let mut meta = Metadata::new(R::RESOURCE_TYPE);
        meta.created = Some(created.unwrap_or(now));
        meta.last_modified = Some(now);
        meta.location = location;
        resource.resource_mut().meta = Some(meta);

        let version = ResourceVersion::from_resource(&*resource)?;
        if let Some(meta) = resource.resource_mut().meta.as_mut() {
            meta.version = Some(version.to_string());
        }
        Ok(())
    }

    /// Apply the default page size and the configured result cap.
    fn page(&self, requested: Option<PaginationParameters>) -> PaginationParameters {
        let mut pagination = requested.unwrap_or_default();
        let mut count = pagination.count.unwrap_or(self.config.default_page_size);

        let filter = &self.config.service_configuration.filter;
        if filter.supported {
            count = count.min(filter.max_results);
        }
        pagination.count = Some(count);
        pagination
    }
}

impl<S: StorageProvider> ServiceCatalog for InMemoryProvider<S> {
    fn configuration(&self) -> ServiceConfiguration {
        self.config.service_configuration.clone()
    }

    fn extensions(&self) -> &[SchemaExtension] {
        &self.config.extensions
    }
}

impl<S, R> Provider<R> for InMemoryProvider<S>
where
    S: StorageProvider,
    R: StoredResource,
{
    type Error = ProviderError;

    async fn create(&self, mut resource: R, context: &RequestContext) -> Result<R, Self::Error> {
        info!(
            "Creating {} resource (request: '{}')",
            R::RESOURCE_TYPE,
            context.request_id
        );

        if resource.identifier().is_some() {
            return Err(ProviderError::IdentifierNotAllowed {
                resource_type: R::RESOURCE_TYPE.to_string(),
            });
        }
        resource.validate()?;

        let _guard = self.writes.lock().await;
        self.check_unique(&resource, None).await?;

        let id = Uuid::new_v4().to_string();
        resource.resource_mut().id = Some(id.clone());
        self.stamp(&mut resource, None)?;
        self.save(&id, &resource).await?;

        trace!(
            "Created {} '{}' (request: '{}')",
            R::RESOURCE_TYPE,
            id,
            context.request_id
        );
        Ok(resource)
    }

    async fn retrieve(&self, id: &str, context: &RequestContext) -> Result<Option<R>, Self::Error> {
        debug!(
            "Getting {} resource with ID '{}' (request: '{}')",
            R::RESOURCE_TYPE,
            id,
            context.request_id
        );

        let found = self.load::<R>(id).await?;
        if found.is_none() {
            debug!(
                "{} '{}' not found (request: '{}')",
                R::RESOURCE_TYPE,
                id,
                context.request_id
            );
        }
        Ok(found)
    }

    async fn replace(&self, mut resource: R, context: &RequestContext) -> Result<R, Self::Error> {
        let id = resource
            .identifier()
            .map(str::to_string)
            .ok_or_else(|| ProviderError::MissingIdentifier {
                resource_type: R::RESOURCE_TYPE.to_string(),
            })?;

        info!(
            "Replacing {} resource with ID '{}' (request: '{}')",
            R::RESOURCE_TYPE,
            id,
            context.request_id
        );

        resource.validate()?;

        let _guard = self.writes.lock().await;
        let existing = self
            .load::<R>(&id)
            .await?
            .ok_or_else(|| ProviderError::not_found(R::RESOURCE_TYPE, &id))?;
        self.check_unique(&resource, Some(&id)).await?;

        let created = existing.resource().meta.as_ref().and_then(|meta| meta.created);
        self.stamp(&mut resource, created)?;
        self.save(&id, &resource).await?;
        Ok(resource)
    }

    async fn delete(&self, id: &str, context: &RequestContext) -> Result<(), Self::Error> {
        info!(
            "Deleting {} resource with ID '{}' (request: '{}')",
            R::RESOURCE_TYPE,
            id,
            context.request_id
        );

        let _guard = self.writes.lock().await;
        let existed = self
            .storage
            .delete(StorageKey::new(R::RESOURCE_TYPE, id))
            .await
            .map_err(ProviderError::storage)?;

        if existed {
            Ok(())
        } else {
            Err(ProviderError::not_found(R::RESOURCE_TYPE, id))
        }
    }

    async fn query(
        &self,
        query: &ResourceQuery,
        context: &RequestContext,
    ) -> Result<Vec<R>, Self::Error> {
        debug!(
            "Querying {} resources (request: '{}')",
            R::RESOURCE_TYPE,
            context.request_id
        );

        for alternate in &query.filters {
            filter::check_supported::<R>(alternate)?;
        }

        let stored = self
            .storage
            .list(&StoragePrefix::new(R::RESOURCE_TYPE))
            .await
            .map_err(ProviderError::storage)?;

        let mut matches = Vec::new();
        for (key, data) in stored {
            let resource: R = match serde_json::from_value(data) {
                Ok(resource) => resource,
                Err(e) => {
                    warn!(
                        "Failed to deserialize {} '{}' during query: {} (request: '{}')",
                        R::RESOURCE_TYPE,
                        key.resource_id(),
                        e,
                        context.request_id
                    );
                    continue;
                }
            };
            if matches_any(&resource, &query.filters)? {
                matches.push(resource);
            }
        }

        debug!(
            "Found {} {} resources (request: '{}')",
            matches.len(),
            R::RESOURCE_TYPE,
            context.request_id
        );
        Ok(matches)
    }

    async fn update(
        &self,
        id: &str,
        patch: &PatchRequest,
        context: &RequestContext,
    ) -> Result<R, Self::Error> {
        info!(
            "Patching {} resource with ID '{}' (request: '{}')",
            R::RESOURCE_TYPE,
            id,
            context.request_id
        );

        if !self.config.service_configuration.patch.supported {
            return Err(ProviderError::not_implemented("patch"));
        }

        let _guard = self.writes.lock().await;
        let mut resource = self
            .load::<R>(id)
            .await?
            .ok_or_else(|| ProviderError::not_found(R::RESOURCE_TYPE, id))?;
        let created = resource.resource().meta.as_ref().and_then(|meta| meta.created);

        let applied = resource.apply(patch)?;
        trace!(
            "Applied {} of {} operations to {} '{}' (request: '{}')",
            applied,
            patch.operations.len(),
            R::RESOURCE_TYPE,
            id,
            context.request_id
        );

        resource.resource_mut().id = Some(id.to_string());
        resource.validate()?;
        self.check_unique(&resource, Some(id)).await?;

        self.stamp(&mut resource, created)?;
        self.save(id, &resource).await?;
        Ok(resource)
    }

    async fn paginate_query(
        &self,
        query: &ResourceQuery,
        context: &RequestContext,
    ) -> Result<QueryResponse<R>, Self::Error> {
        let matches = <Self as Provider<R>>::query(self, query, context).await?;
        Ok(QueryResponse::paginate(matches, Some(self.page(query.pagination)), None))
    }
}
