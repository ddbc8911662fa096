//! Per-operation state of a bulk request.
//!
//! Every operation moves `Pending → Prepared → Dispatched → Completed`. An
//! operation that fails validation in the build phase skips straight to
//! `Completed` with a 400 response; it is still reported but never reaches
//! the provider.

use crate::bulk::operation::{BulkMethod, BulkRequestOperation, BulkResponseOperation};
use crate::error::{ScimError, ScimResult};
use crate::protocol::{ErrorResponse, ProtocolConstants};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationState {
    Pending,
    Prepared,
    Dispatched,
    Completed,
}

/// The collections a bulk request can address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Users,
    Groups,
}

impl Collection {
    pub fn parse(segment: &str) -> ScimResult<Self> {
        if segment.eq_ignore_ascii_case(ProtocolConstants::PATH_USERS) {
            Ok(Collection::Users)
        } else if segment.eq_ignore_ascii_case(ProtocolConstants::PATH_GROUPS) {
            Ok(Collection::Groups)
        } else {
            Err(ScimError::UnsupportedType(segment.to_string()))
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Collection::Users => ProtocolConstants::PATH_USERS,
            Collection::Groups => ProtocolConstants::PATH_GROUPS,
        }
    }
}

/// A validated operation, ready to be dispatched once its references are
/// resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationRequest {
    Create {
        collection: Collection,
        data: Value,
    },
    Retrieve {
        collection: Collection,
        id: Option<String>,
        query: String,
    },
    Update {
        collection: Collection,
        id: String,
        data: Value,
    },
    Delete {
        collection: Collection,
        id: String,
    },
}

impl OperationRequest {
    /// Check `operation` against the rules for its method.
    pub fn build(operation: &BulkRequestOperation) -> ScimResult<Self> {
        let (path, query) = match operation.path.split_once('?') {
            Some((path, query)) => (path, query.to_string()),
            None => (operation.path.as_str(), String::new()),
        };

        let mut segments = path.trim().trim_matches('/').split('/');
        let collection = match segments.next() {
            Some(segment) if !segment.trim().is_empty() => Collection::parse(segment.trim())?,
            _ => {
                return Err(ScimError::invalid_request(format!(
                    "operation '{}' has no path",
                    operation.bulk_id
                )));
            }
        };
        let id = segments
            .next()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string);
        if segments.next().is_some() {
            return Err(ScimError::invalid_request(format!(
                "'{}' is not a collection or resource path",
                operation.path
            )));
        }

        match (&operation.method, id) {
            (BulkMethod::Post, None) => Ok(OperationRequest::Create {
                collection,
                data: required_data(operation)?,
            }),
            (BulkMethod::Post, Some(_)) => Err(ScimError::invalid_request(
                "POST addresses a collection, not a resource",
            )),
            (BulkMethod::Delete, Some(id)) => Ok(OperationRequest::Delete { collection, id }),
            (BulkMethod::Patch, Some(id)) => Ok(OperationRequest::Update {
                collection,
                id,
                data: required_data(operation)?,
            }),
            (BulkMethod::Delete | BulkMethod::Patch, None) => Err(ScimError::invalid_request(
                format!("{} requires a resource identifier in the path", operation.method),
            )),
            (BulkMethod::Get, id) => Ok(OperationRequest::Retrieve {
                collection,
                id,
                query,
            }),
            (method, _) => Err(ScimError::invalid_request(format!(
                "method '{}' is not supported in bulk requests",
                method
            ))),
        }
    }

    pub fn collection(&self) -> Collection {
        match self {
            OperationRequest::Create { collection, .. }
            | OperationRequest::Retrieve { collection, .. }
            | OperationRequest::Update { collection, .. }
            | OperationRequest::Delete { collection, .. } => *collection,
        }
    }
}

fn required_data(operation: &BulkRequestOperation) -> ScimResult<Value> {
    match &operation.data {
        Some(data @ Value::Object(_)) => Ok(data.clone()),
        _ => Err(ScimError::invalid_request(format!(
            "{} requires an object as data",
            operation.method
        ))),
    }
}

/// Tracks one operation through the build and dispatch phases.
#[derive(Debug, Clone)]
pub struct BulkOperationContext {
    operation: BulkRequestOperation,
    state: OperationState,
    request: Option<OperationRequest>,
    response: Option<BulkResponseOperation>,
}

impl BulkOperationContext {
    pub fn new(operation: BulkRequestOperation) -> Self {
        Self {
            operation,
            state: OperationState::Pending,
            request: None,
            response: None,
        }
    }

    pub fn bulk_id(&self) -> &str {
        &self.operation.bulk_id
    }

    pub fn method(&self) -> &BulkMethod {
        &self.operation.method
    }

    pub fn state(&self) -> OperationState {
        self.state
    }

    /// Build phase. A validation failure completes the operation.
    pub fn prepare(&mut self) {
        if self.state != OperationState::Pending {
            return;
        }
        match OperationRequest::build(&self.operation) {
            Ok(request) => {
                self.request = Some(request);
                self.state = OperationState::Prepared;
            }
            Err(error) => self.fail(ErrorResponse::from(&error)),
        }
    }

    /// Hand out the prepared request for execution. `None` when the
    /// operation is not ready, such as after a build failure.
    pub fn dispatch(&mut self) -> Option<OperationRequest> {
        if self.state != OperationState::Prepared {
            return None;
        }
        self.state = OperationState::Dispatched;
        self.request.take()
    }

    pub fn succeed(&mut self, status: u16, location: Option<String>, response: Option<Value>) {
        self.complete(status, location, response);
    }

    pub fn fail(&mut self, error: ErrorResponse) {
        let status = error.status;
        let response = serde_json::to_value(&error).ok();
        self.complete(status, None, response);
    }

    fn complete(&mut self, status: u16, location: Option<String>, response: Option<Value>) {
        self.response = Some(BulkResponseOperation {
            method: self.operation.method.clone(),
            bulk_id: self.operation.bulk_id.clone(),
            location,
            response,
            status,
        });
        self.state = OperationState::Completed;
    }

    /// The response of a completed operation.
    pub fn into_response(self) -> Option<BulkResponseOperation> {
        self.response
    }
}
