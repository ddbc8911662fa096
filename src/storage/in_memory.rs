//! Process-local [`StorageProvider`].

use crate::storage::{StorageError, StorageKey, StoragePrefix, StorageProvider};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

type Collection = BTreeMap<String, Value>;

/// Documents held in memory behind an async `RwLock`.
///
/// Clones share the same documents.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorage {
    collections: Arc<RwLock<HashMap<String, Collection>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(prefix: &StoragePrefix, collection: &Collection) -> Vec<(StorageKey, Value)> {
        collection
            .iter()
            .map(|(id, data)| (prefix.key(id.as_str()), data.clone()))
            .collect()
    }
}

/// The scalar at a dotted `attribute` path, rendered as text.
fn scalar_at(data: &Value, attribute: &str) -> Option<String> {
    let pointer: String = attribute.split('.').map(|segment| format!("/{}", segment)).collect();
    match data.pointer(&pointer)? {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

impl StorageProvider for InMemoryStorage {
    type Error = StorageError;

    async fn put(&self, key: StorageKey, data: Value) -> Result<(), Self::Error> {
        if key.resource_id().trim().is_empty() {
            return Err(StorageError::invalid_data(format!(
                "a {} needs an identifier to be stored",
                key.resource_type()
            )));
        }
        let mut collections = self.collections.write().await;
        collections
            .entry(key.resource_type().to_string())
            .or_default()
            .insert(key.resource_id().to_string(), data);
        Ok(())
    }

    async fn get(&self, key: StorageKey) -> Result<Option<Value>, Self::Error> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(key.resource_type())
            .and_then(|collection| collection.get(key.resource_id()))
            .cloned())
    }

    async fn delete(&self, key: StorageKey) -> Result<bool, Self::Error> {
        let mut collections = self.collections.write().await;
        Ok(collections
            .get_mut(key.resource_type())
            .and_then(|collection| collection.remove(key.resource_id()))
            .is_some())
    }

    async fn list(&self, prefix: &StoragePrefix) -> Result<Vec<(StorageKey, Value)>, Self::Error> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(prefix.resource_type())
            .map(|collection| Self::entries(prefix, collection))
            .unwrap_or_default())
    }

    async fn find_by_attribute(
        &self,
        prefix: &StoragePrefix,
        attribute: &str,
        value: &str,
        case_exact: bool,
    ) -> Result<Vec<(StorageKey, Value)>, Self::Error> {
        let collections = self.collections.read().await;
        let Some(collection) = collections.get(prefix.resource_type()) else {
            return Ok(Vec::new());
        };

        Ok(Self::entries(prefix, collection)
            .into_iter()
            .filter(|(_, data)| {
                scalar_at(data, attribute).is_some_and(|found| {
                    if case_exact {
                        found == value
                    } else {
                        found.eq_ignore_ascii_case(value)
                    }
                })
            })
            .collect())
    }

    async fn clear(&self) -> Result<(), Self::Error> {
        self.collections.write().await.clear();
        Ok(())
    }
}
