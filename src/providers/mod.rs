//! Resource providers.
//!
//! A provider persists typed resources and answers queries over them. This
//! module defines the provider contract and ships one implementation:
//!
//! * [`Provider`] / [`ServiceCatalog`] - The contract a backend implements
//! * [`ScimProvider`] - Any provider of both Users and Groups; runs bulk requests
//! * [`ProviderAdapter`] - Protocol-level calls (JSON in, projected JSON out)
//! * [`InMemoryProvider`] - Reference provider over a [`StorageProvider`](crate::storage::StorageProvider)

pub mod adapter;
pub mod error;
pub mod in_memory;
pub mod provider;

pub use adapter::ProviderAdapter;
pub use error::ProviderError;
pub use in_memory::{InMemoryProvider, InMemoryProviderConfig, StoredResource};
pub use provider::{Provider, ScimProvider, ServiceCatalog};
