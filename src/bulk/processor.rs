//! Sequential execution of bulk requests.

use crate::bulk::context::{BulkOperationContext, Collection, OperationRequest};
use crate::bulk::operation::{BulkRequest, BulkResponse};
use crate::bulk::reference::{BulkIdentifiers, UnresolvedReference};
use crate::error::{ScimError, ScimResult, ScimType};
use crate::protocol::{ErrorResponse, RequestContext, ResourceQuery};
use crate::providers::{Provider, ProviderAdapter, ScimProvider};
use crate::resource::{Core2Group, Core2User, ResourceKind};
use log::{debug, info, warn};
use serde_json::Value;
use std::collections::VecDeque;

/// What a successfully executed operation reports.
struct Executed {
    status: u16,
    resource_id: Option<String>,
    location: Option<String>,
    response: Option<Value>,
}

#[derive(Debug)]
enum OperationFailure {
    Unresolved(UnresolvedReference),
    Scim(ScimError),
}

impl From<ScimError> for OperationFailure {
    fn from(error: ScimError) -> Self {
        OperationFailure::Scim(error)
    }
}

impl From<UnresolvedReference> for OperationFailure {
    fn from(error: UnresolvedReference) -> Self {
        OperationFailure::Unresolved(error)
    }
}

impl From<OperationFailure> for ErrorResponse {
    fn from(failure: OperationFailure) -> Self {
        match failure {
            OperationFailure::Unresolved(error) => {
                ErrorResponse::new(409, error.to_string()).with_scim_type(ScimType::InvalidValue)
            }
            OperationFailure::Scim(error) => ErrorResponse::from(&error),
        }
    }
}

/// Runs the operations of a bulk request, in order, against one provider.
///
/// Operations are validated up front, then dispatched one at a time so a
/// `bulkId:` reference always sees the resources created before it. There
/// is no rollback: operations that completed before a failure stay applied.
pub struct BulkProcessor<'a, P> {
    provider: &'a P,
}

impl<'a, P: ScimProvider> BulkProcessor<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        Self { provider }
    }

    pub async fn process(
        &self,
        request: BulkRequest,
        context: &RequestContext,
    ) -> ScimResult<BulkResponse> {
        let bulk = self.provider.configuration().bulk;
        if !bulk.supported {
            return Err(ScimError::not_implemented("bulk"));
        }
        let count = request.operations().len();
        if count > bulk.max_operations {
            warn!(
                "Rejecting bulk request with {} operations, the maximum is {} (request: '{}')",
                count, bulk.max_operations, context.request_id
            );
            return Err(ScimError::TooManyOperations {
                count,
                maximum: bulk.max_operations,
            });
        }

        info!(
            "Processing bulk request with {} operations (request: '{}')",
            count, context.request_id
        );

        let fail_on_errors = request.fail_on_errors;
        let mut queue: VecDeque<BulkOperationContext> = request
            .into_operations()
            .into_iter()
            .map(BulkOperationContext::new)
            .collect();
        for operation in queue.iter_mut() {
            operation.prepare();
        }

        let mut identifiers = BulkIdentifiers::new();
        let mut response = BulkResponse::new();
        let mut failures = 0;

        while let Some(mut operation) = queue.pop_front() {
            if let Some(prepared) = operation.dispatch() {
                let operation_context = context.for_bulk_operation(operation.bulk_id());
                match self.execute(prepared, &identifiers, &operation_context).await {
                    Ok(executed) => {
                        if let Some(resource_id) = &executed.resource_id {
                            identifiers.record(operation.bulk_id(), resource_id.clone());
                        }
                        operation.succeed(executed.status, executed.location, executed.response);
                    }
                    Err(failure) => operation.fail(ErrorResponse::from(failure)),
                }
            }

            let Some(result) = operation.into_response() else {
                continue;
            };
            if result.is_error() {
                failures += 1;
                warn!(
                    "Bulk operation '{}' ({}) failed with status {} (request: '{}')",
                    result.bulk_id, result.method, result.status, context.request_id
                );
            }
            response.add_operation(result);

            if let Some(limit) = fail_on_errors {
                if failures > 0 && failures >= limit {
                    if !queue.is_empty() {
                        warn!(
                            "Stopping bulk request after {} failures, {} skipped (request: '{}')",
                            failures,
                            queue.len(),
                            context.request_id
                        );
                    }
                    break;
                }
            }
        }

        debug!(
            "Bulk request completed {} operations with {} failures (request: '{}')",
            response.operations.len(),
            failures,
            context.request_id
        );
        Ok(response)
    }

    async fn execute(
        &self,
        request: OperationRequest,
        identifiers: &BulkIdentifiers,
        context: &RequestContext,
    ) -> Result<Executed, OperationFailure> {
        match request.collection() {
            Collection::Users => {
                self.execute_on::<Core2User>(request, identifiers, context)
                    .await
            }
            Collection::Groups => {
                self.execute_on::<Core2Group>(request, identifiers, context)
                    .await
            }
        }
    }

    async fn execute_on<R>(
        &self,
        request: OperationRequest,
        identifiers: &BulkIdentifiers,
        context: &RequestContext,
    ) -> Result<Executed, OperationFailure>
    where
        R: ResourceKind,
        P: Provider<R>,
    {
        let adapter = ProviderAdapter::<R, P>::new(self.provider);

        match request {
            OperationRequest::Create { collection, mut data } => {
                identifiers.resolve_value(&mut data)?;
                let created = adapter.create(data, context).await?;
                let resource_id = identifier_of(&created);
                Ok(Executed {
                    status: 201,
                    location: location_of(&created, collection, resource_id.as_deref()),
                    resource_id,
                    response: None,
                })
            }
            OperationRequest::Retrieve {
                id: Some(id),
                query,
                ..
            } => {
                let id = identifiers.resolve(&id)?;
                let query = ResourceQuery::from_query_string(&query)?;
                let found = adapter.retrieve(&id, &query, context).await?;
                Ok(Executed {
                    status: 200,
                    resource_id: None,
                    location: None,
                    response: Some(found),
                })
            }
            OperationRequest::Retrieve { id: None, query, .. } => {
                let query = ResourceQuery::from_query_string(&query)?;
                let page = adapter.query(&query, context).await?;
                Ok(Executed {
                    status: 200,
                    resource_id: None,
                    location: None,
                    response: Some(serde_json::to_value(page).map_err(ScimError::from)?),
                })
            }
            OperationRequest::Update {
                collection,
                id,
                mut data,
            } => {
                let id = identifiers.resolve(&id)?;
                identifiers.resolve_value(&mut data)?;
                let updated = adapter.update(&id, data, context).await?;
                Ok(Executed {
                    status: 200,
                    location: location_of(&updated, collection, Some(&id)),
                    resource_id: None,
                    response: None,
                })
            }
            OperationRequest::Delete { id, .. } => {
                let id = identifiers.resolve(&id)?;
                adapter.delete(&id, context).await?;
                Ok(Executed {
                    status: 204,
                    resource_id: None,
                    location: None,
                    response: None,
                })
            }
        }
    }
}

fn identifier_of(document: &Value) -> Option<String> {
    document.get("id").and_then(Value::as_str).map(str::to_string)
}

/// `meta.location` when the provider stamps one, the relative resource path
/// otherwise.
fn location_of(document: &Value, collection: Collection, id: Option<&str>) -> Option<String> {
    document
        .pointer("/meta/location")
        .and_then(Value::as_str)
        .map(str::to_string)
        .or_else(|| id.map(|id| format!("/{}/{}", collection.path(), id)))
}
