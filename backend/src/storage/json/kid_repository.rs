//! # JSON Kid Repository
//!
//! Stores all kid profiles in one JSON array under the `kids_list` document key.
//!
//! ## Document Format
//!
//! ```json
//! [
//!   { "id": "9f1e...", "name": "Mia", "birthdate": "2024-03-01", "gender": "girl", "photoUri": "file:///..." }
//! ]
//! ```
//!
//! Updates overwrite every mutable field. Deleting a kid leaves that kid's
//! activities in place.

use async_trait::async_trait;
use chrono::Local;
use log::{debug, info, warn};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::collection::{load_for_write, load_records, store_records, LoadedCollection};
use super::mappers::KidMapper;
use crate::domain::models::{Kid, KidFields};
use crate::error::{RepositoryError, RepositoryResult};
use crate::storage::traits::{DocumentStore, KidStorage};

/// Document key owned by this repository
pub const KIDS_KEY: &str = "kids_list";

/// JSON-document kid repository
#[derive(Clone)]
pub struct KidRepository {
    store: Arc<dyn DocumentStore>,
    write_lock: Arc<Mutex<()>>,
}

impl KidRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    async fn load(&self) -> Vec<Kid> {
        load_records::<shared::Kid>(self.store.as_ref(), KIDS_KEY)
            .await
            .into_iter()
            .filter_map(|record| {
                let id = record.id.clone();
                match KidMapper::to_domain(record) {
                    Ok(kid) => Some(kid),
                    Err(e) => {
                        warn!("Skipping kid {}: {:#}", id, e);
                        None
                    }
                }
            })
            .collect()
    }

    /// Load for a read-modify-write cycle; fails if the store cannot be read
    async fn load_collection(&self) -> RepositoryResult<LoadedCollection<Kid>> {
        let loaded = load_for_write(self.store.as_ref(), KIDS_KEY, |value| {
            let record: shared::Kid = serde_json::from_value(value)?;
            KidMapper::to_domain(record)
        })
        .await?;
        Ok(loaded)
    }

    async fn persist(&self, collection: &LoadedCollection<Kid>) -> RepositoryResult<()> {
        let records: Vec<shared::Kid> = collection.records.iter().map(KidMapper::to_record).collect();
        store_records(self.store.as_ref(), KIDS_KEY, &records, &collection.unreadable).await?;
        Ok(())
    }

    fn validated(fields: KidFields) -> RepositoryResult<KidFields> {
        let fields = fields.normalized();
        fields.validate(Local::now().date_naive())?;
        Ok(fields)
    }
}

#[async_trait]
impl KidStorage for KidRepository {
    async fn get_all(&self) -> Vec<Kid> {
        let kids = self.load().await;
        debug!("Fetched {} kids", kids.len());
        kids
    }

    async fn get(&self, kid_id: &str) -> Option<Kid> {
        self.load().await.into_iter().find(|kid| kid.id == kid_id)
    }

    async fn add(&self, fields: KidFields) -> RepositoryResult<Kid> {
        let fields = Self::validated(fields)?;
        let _guard = self.write_lock.lock().await;

        let kid = Kid::from_fields(Kid::generate_id(), fields);
        let mut collection = self.load_collection().await.map_err(|e| {
            warn!("Failed to add kid {}: {}", kid.name, e);
            e
        })?;
        collection.records.push(kid.clone());

        if let Err(e) = self.persist(&collection).await {
            warn!("Failed to add kid {}: {}", kid.name, e);
            return Err(e);
        }

        info!("Added kid {} with ID: {}", kid.name, kid.id);
        Ok(kid)
    }

    async fn update(&self, kid_id: &str, fields: KidFields) -> RepositoryResult<Kid> {
        let fields = Self::validated(fields)?;
        let _guard = self.write_lock.lock().await;

        let mut collection = self.load_collection().await.map_err(|e| {
            warn!("Failed to update kid {}: {}", kid_id, e);
            e
        })?;
        let slot = match collection.records.iter_mut().find(|kid| kid.id == kid_id) {
            Some(slot) => slot,
            None => {
                warn!("Kid not found: {}", kid_id);
                return Err(RepositoryError::NotFound(kid_id.to_string()));
            }
        };
        *slot = Kid::from_fields(kid_id.to_string(), fields);
        let updated = slot.clone();

        if let Err(e) = self.persist(&collection).await {
            warn!("Failed to update kid {}: {}", kid_id, e);
            return Err(e);
        }

        info!("Updated kid {} with ID: {}", updated.name, updated.id);
        Ok(updated)
    }

    async fn delete(&self, kid_id: &str) -> bool {
        let _guard = self.write_lock.lock().await;

        let mut collection = match self.load_collection().await {
            Ok(collection) => collection,
            Err(e) => {
                warn!("Failed to delete kid {}: {}", kid_id, e);
                return false;
            }
        };
        collection.records.retain(|kid| kid.id != kid_id);
        collection.forget_unreadable(kid_id);

        match self.persist(&collection).await {
            Ok(()) => {
                info!("Deleted kid {}", kid_id);
                true
            }
            Err(e) => {
                warn!("Failed to delete kid {}: {}", kid_id, e);
                false
            }
        }
    }
}
