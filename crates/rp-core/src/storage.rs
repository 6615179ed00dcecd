//! # Storage Adapter
//!
//! Typed whole-collection access over a [`KeyValueStore`]. Each collection is
//! one JSON array under its key; a write replaces the array wholesale.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::Collection;
use crate::traits::KeyValueStore;

#[derive(Clone)]
pub struct Storage {
    store: Arc<dyn KeyValueStore>,
}

impl Storage {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The raw store, shared with session and theme preferences.
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Whether the collection key holds anything. An empty value counts as absent.
    pub async fn contains(&self, collection: Collection) -> Result<bool> {
        let key = collection.key();
        let item = self
            .store
            .get_item(key)
            .await
            .map_err(|e| AppError::storage(key, e))?;
        Ok(item.is_some_and(|text| !text.is_empty()))
    }

    /// Raw records in storage order; empty when the key is absent or blank.
    pub async fn read_raw(&self, collection: Collection) -> Result<Vec<Value>> {
        let key = collection.key();
        let text = self
            .store
            .get_item(key)
            .await
            .map_err(|e| AppError::storage(key, e))?
            .unwrap_or_default();
        if text.is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&text).map_err(|e| AppError::serialization(key, e))
    }

    pub async fn write_raw(&self, collection: Collection, records: &[Value]) -> Result<()> {
        let key = collection.key();
        let text = serde_json::to_string(records).map_err(|e| AppError::serialization(key, e))?;
        self.store
            .set_item(key, &text)
            .await
            .map_err(|e| AppError::storage(key, e))
    }

    /// Typed read. One record of the wrong shape fails the whole collection.
    pub async fn read<E: DeserializeOwned>(&self, collection: Collection) -> Result<Vec<E>> {
        let raw = self.read_raw(collection).await?;
        raw.iter().map(|value| decode(collection, value)).collect()
    }

    pub async fn write<E: Serialize>(&self, collection: Collection, records: &[E]) -> Result<()> {
        let raw = records
            .iter()
            .map(|record| encode(collection, record))
            .collect::<Result<Vec<_>>>()?;
        self.write_raw(collection, &raw).await
    }
}

pub(crate) fn decode<E: DeserializeOwned>(collection: Collection, raw: &Value) -> Result<E> {
    E::deserialize(raw).map_err(|e| AppError::serialization(collection.key(), e))
}

pub(crate) fn encode<E: Serialize>(collection: Collection, record: &E) -> Result<Value> {
    serde_json::to_value(record).map_err(|e| AppError::serialization(collection.key(), e))
}

/// Lays `after` over `stored`, keeping stored fields neither typed version knows.
pub(crate) fn overlay(stored: Value, before: &Value, after: Value) -> Value {
    match (stored, before, after) {
        (Value::Object(mut merged), Value::Object(before), Value::Object(after)) => {
            merged.retain(|field, _| !before.contains_key(field) && !after.contains_key(field));
            merged.extend(after);
            Value::Object(merged)
        }
        (_, _, after) => after,
    }
}
