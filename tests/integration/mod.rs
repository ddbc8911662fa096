//! Integration tests against the in-memory provider.

pub mod bulk;
pub mod concurrency;
pub mod filtering;
pub mod patching;
pub mod properties;
pub mod resources;
