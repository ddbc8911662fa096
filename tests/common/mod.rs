//! Common test utilities.

use scim_core::protocol::RequestContext;
use scim_core::providers::{InMemoryProvider, ProviderAdapter};
use scim_core::resource::{Core2Group, Core2User};
use serde_json::{Value, json};

/// Route library logging to the test output. Safe to call from every test.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn context(name: &str) -> RequestContext {
    init_logging();
    RequestContext::new(name)
}

pub fn users(provider: &InMemoryProvider) -> ProviderAdapter<'_, Core2User, InMemoryProvider> {
    ProviderAdapter::new(provider)
}

pub fn groups(provider: &InMemoryProvider) -> ProviderAdapter<'_, Core2Group, InMemoryProvider> {
    ProviderAdapter::new(provider)
}

/// A minimal user body in the shape of RFC 7643 §8.1.
pub fn user_body(user_name: &str) -> Value {
    json!({
        "schemas": ["urn:ietf:params:scim:schemas:core:2.0:User"],
        "userName": user_name,
        "name": {"givenName": user_name, "familyName": "Jensen"},
        "emails": [{
            "type": "work",
            "value": format!("{}@example.com", user_name),
            "primary": true
        }],
        "active": true
    })
}

/// Create a user and return its assigned identifier.
pub async fn create_user(provider: &InMemoryProvider, user_name: &str) -> String {
    let created = users(provider)
        .create(user_body(user_name), &context("fixture"))
        .await
        .expect("fixture user");
    created["id"].as_str().expect("assigned id").to_string()
}
