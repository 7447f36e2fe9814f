//! # JSON Activity Repository
//!
//! Stores every activity, for every kid, in one JSON array under the
//! `activity_list` document key.
//!
//! ## Document Format
//!
//! ```json
//! [
//!   {
//!     "id": "5b0c...",
//!     "kidId": "9f1e...",
//!     "type": "feeding",
//!     "timestamp": 1704103200000,
//!     "createdAt": 1704103260000,
//!     "updatedAt": 1704103260000,
//!     "details": { "method": "bottle", "amount": 90 }
//!   }
//! ]
//! ```
//!
//! ## Behavior
//!
//! - Every write is a full load-modify-store of the array
//! - Writes are serialized through a per-repository lock, so two concurrent
//!   writers cannot drop each other's changes
//! - Reads fail soft: malformed documents or records are logged and skipped
//! - Writes fail if the document cannot be read, and carry unreadable records
//!   through unchanged
//! - `type` is immutable after creation

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use log::{debug, info, warn};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::collection::{load_for_write, load_records, store_records, LoadedCollection};
use super::mappers::ActivityMapper;
use crate::domain::commands::{ActivityPatch, NewActivity};
use crate::domain::models::activity::{normalize_instant, now};
use crate::domain::models::{Activity, ActivityValidationError};
use crate::error::{RepositoryError, RepositoryResult};
use crate::storage::traits::{ActivityStorage, DocumentStore};

/// Document key owned by this repository
pub const ACTIVITY_KEY: &str = "activity_list";

/// JSON-document activity repository
#[derive(Clone)]
pub struct ActivityRepository {
    store: Arc<dyn DocumentStore>,
    write_lock: Arc<Mutex<()>>,
}

impl ActivityRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Load and map every valid activity
    async fn load(&self) -> Vec<Activity> {
        load_records::<shared::Activity>(self.store.as_ref(), ACTIVITY_KEY)
            .await
            .into_iter()
            .filter_map(|record| {
                let id = record.id.clone();
                match ActivityMapper::to_domain(record) {
                    Ok(activity) => Some(activity),
                    Err(e) => {
                        warn!("Skipping activity {}: {:#}", id, e);
                        None
                    }
                }
            })
            .collect()
    }

    /// Load for a read-modify-write cycle; fails if the store cannot be read
    async fn load_collection(&self) -> RepositoryResult<LoadedCollection<Activity>> {
        let loaded = load_for_write(self.store.as_ref(), ACTIVITY_KEY, |value| {
            let record: shared::Activity = serde_json::from_value(value)?;
            ActivityMapper::to_domain(record)
        })
        .await?;
        Ok(loaded)
    }

    async fn persist(&self, collection: &LoadedCollection<Activity>) -> RepositoryResult<()> {
        let records = collection
            .records
            .iter()
            .map(ActivityMapper::to_record)
            .collect::<anyhow::Result<Vec<_>>>()?;
        store_records(self.store.as_ref(), ACTIVITY_KEY, &records, &collection.unreadable).await?;
        Ok(())
    }
}

/// Next `updated_at` for a record: now, but always strictly after `previous`
fn next_updated_at(previous: DateTime<Utc>) -> DateTime<Utc> {
    now().max(previous + Duration::milliseconds(1))
}

#[async_trait]
impl ActivityStorage for ActivityRepository {
    async fn get_all(&self) -> Vec<Activity> {
        let activities = self.load().await;
        debug!("Fetched {} activities", activities.len());
        activities
    }

    async fn get_for_kid(&self, kid_id: &str) -> Vec<Activity> {
        self.get_all()
            .await
            .into_iter()
            .filter(|activity| activity.kid_id == kid_id)
            .collect()
    }

    async fn add(&self, input: NewActivity) -> RepositoryResult<Activity> {
        input.validate().map_err(|e| {
            warn!("Rejected new {} activity: {}", input.activity_type(), e);
            RepositoryError::from(e)
        })?;

        let _guard = self.write_lock.lock().await;

        let mut collection = self.load_collection().await.map_err(|e| {
            warn!("Failed to add activity: {}", e);
            e
        })?;

        let created_at = now();
        let activity = Activity {
            id: Activity::generate_id(),
            kid_id: input.kid_id,
            timestamp: normalize_instant(input.timestamp),
            created_at,
            updated_at: created_at,
            details: input.details,
        };
        collection.records.push(activity.clone());

        if let Err(e) = self.persist(&collection).await {
            warn!("Failed to add activity: {}", e);
            return Err(e);
        }

        info!("Added {} activity {} for kid {}", activity.activity_type(), activity.id, activity.kid_id);
        Ok(activity)
    }

    async fn update(&self, id: &str, patch: ActivityPatch) -> RepositoryResult<Activity> {
        let _guard = self.write_lock.lock().await;

        let mut collection = self.load_collection().await.map_err(|e| {
            warn!("Failed to update activity {}: {}", id, e);
            e
        })?;
        let index = match collection.records.iter().position(|activity| activity.id == id) {
            Some(index) => index,
            None => {
                warn!("Activity not found: {}", id);
                return Err(RepositoryError::NotFound(id.to_string()));
            }
        };

        let existing = &collection.records[index];
        let stored = existing.activity_type();
        if let Some(attempted) = patch.activity_type {
            if attempted != stored {
                warn!("Cannot change type of activity {} from {} to {}", id, stored, attempted);
                return Err(RepositoryError::TypeMismatch { stored, attempted });
            }
        }

        let details = match &patch.details {
            Some(changes) => existing.details.merged_with(changes)?,
            None => existing.details.clone(),
        };
        details.validate()?;

        let kid_id = match patch.kid_id {
            Some(kid_id) if kid_id.trim().is_empty() => {
                return Err(ActivityValidationError::EmptyKidId.into())
            }
            Some(kid_id) => kid_id,
            None => existing.kid_id.clone(),
        };

        // The stored id always wins over one supplied in the patch
        let updated = Activity {
            id: existing.id.clone(),
            kid_id,
            timestamp: patch.timestamp.map(normalize_instant).unwrap_or(existing.timestamp),
            created_at: existing.created_at,
            updated_at: next_updated_at(existing.updated_at),
            details,
        };
        collection.records[index] = updated.clone();

        if let Err(e) = self.persist(&collection).await {
            warn!("Failed to update activity {}: {}", id, e);
            return Err(e);
        }

        info!("Updated activity {}", id);
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> bool {
        let _guard = self.write_lock.lock().await;

        let mut collection = match self.load_collection().await {
            Ok(collection) => collection,
            Err(e) => {
                warn!("Failed to delete activity {}: {}", id, e);
                return false;
            }
        };
        let before = collection.records.len() + collection.unreadable.len();
        collection.records.retain(|a| a.id != id);
        collection.forget_unreadable(id);
        let removed = before > collection.records.len() + collection.unreadable.len();

        match self.persist(&collection).await {
            Ok(()) => {
                if removed {
                    info!("Deleted activity {}", id);
                } else {
                    debug!("Delete of unknown activity {} was a no-op", id);
                }
                true
            }
            Err(e) => {
                warn!("Failed to delete activity {}: {}", id, e);
                false
            }
        }
    }

    async fn clear_all(&self) -> RepositoryResult<()> {
        let _guard = self.write_lock.lock().await;
        self.store.remove(ACTIVITY_KEY).await?;
        info!("All activities cleared");
        Ok(())
    }
}
