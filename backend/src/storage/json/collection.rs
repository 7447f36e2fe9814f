//! Whole-collection load and store over a [`DocumentStore`] key.
//!
//! A collection is a JSON array of records. The read path never fails: a
//! missing document, a read error, a document that is not a JSON array, and
//! any individual element that does not parse are all logged and treated as
//! absent.
//!
//! The write path is stricter. A store read error fails the write, and
//! elements that do not parse are kept as raw JSON and written back
//! unchanged.

use anyhow::{Context, Result};
use log::{debug, error, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::storage::traits::DocumentStore;

/// Elements of a JSON array document. Anything else counts as empty.
fn array_elements(raw: &str, key: &str) -> Vec<Value> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(elements)) => elements,
        Ok(_) => {
            warn!("Unexpected data format under {}, treating as empty", key);
            Vec::new()
        }
        Err(e) => {
            error!("Failed to parse {} as JSON: {}", key, e);
            Vec::new()
        }
    }
}

/// Load every parseable record stored under `key`
pub(crate) async fn load_records<T: DeserializeOwned>(store: &dyn DocumentStore, key: &str) -> Vec<T> {
    let raw = match store.get(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!("No document stored under {}", key);
            return Vec::new();
        }
        Err(e) => {
            error!("Failed to read {}: {:#}", key, e);
            return Vec::new();
        }
    };

    let elements = array_elements(&raw, key);
    let total = elements.len();
    let records: Vec<T> = elements
        .into_iter()
        .enumerate()
        .filter_map(|(index, element)| match serde_json::from_value(element) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping malformed record {} in {}: {}", index, key, e);
                None
            }
        })
        .collect();

    debug!("Loaded {} of {} records from {}", records.len(), total, key);
    records
}

/// A collection loaded for a read-modify-write cycle
#[derive(Debug)]
pub(crate) struct LoadedCollection<T> {
    pub records: Vec<T>,
    /// Elements `parse` rejected, in their original form
    pub unreadable: Vec<Value>,
}

impl<T> LoadedCollection<T> {
    /// Drop unreadable elements whose `id` is `id`
    pub fn forget_unreadable(&mut self, id: &str) {
        self.unreadable
            .retain(|element| element.get("id").and_then(Value::as_str) != Some(id));
    }
}

/// Load the collection under `key` for a write.
///
/// Fails when the store cannot be read. Elements that `parse` rejects are kept
/// in [`LoadedCollection::unreadable`] so the write can carry them through.
pub(crate) async fn load_for_write<T, F>(store: &dyn DocumentStore, key: &str, parse: F) -> Result<LoadedCollection<T>>
where
    F: Fn(Value) -> Result<T>,
{
    let raw = store
        .get(key)
        .await
        .with_context(|| format!("Failed to read {}", key))?;

    let mut collection = LoadedCollection {
        records: Vec::new(),
        unreadable: Vec::new(),
    };
    let raw = match raw {
        Some(raw) => raw,
        None => return Ok(collection),
    };

    for (index, element) in array_elements(&raw, key).into_iter().enumerate() {
        match parse(element.clone()) {
            Ok(record) => collection.records.push(record),
            Err(e) => {
                warn!("Keeping unreadable record {} in {} as is: {:#}", index, key, e);
                collection.unreadable.push(element);
            }
        }
    }
    Ok(collection)
}

/// Serialize `records` followed by the `unreadable` raw elements as one JSON
/// array and replace the document under `key`
pub(crate) async fn store_records<T: Serialize>(
    store: &dyn DocumentStore,
    key: &str,
    records: &[T],
    unreadable: &[Value],
) -> Result<()> {
    let mut elements = Vec::with_capacity(records.len() + unreadable.len());
    for record in records {
        elements.push(serde_json::to_string(record).with_context(|| format!("Failed to serialize {}", key))?);
    }
    for element in unreadable {
        elements.push(element.to_string());
    }
    if !unreadable.is_empty() {
        debug!("Writing {} unreadable records back to {}", unreadable.len(), key);
    }

    let json = format!("[{}]", elements.join(","));
    store
        .set(key, &json)
        .await
        .with_context(|| format!("Failed to persist {}", key))
}
