//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow different
//! storage backends to be used interchangeably in the domain layer.

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::commands::{ActivityPatch, NewActivity};
use crate::domain::models::{Activity, Kid, KidFields};
use crate::error::RepositoryResult;

/// Key-value store holding one serialized document per logical key.
///
/// This is the only I/O primitive the repositories use. A `set` replaces the
/// whole document; no partial write is ever observable.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read the document stored under `key`, or `None` if there is none
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the document stored under `key`
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the document stored under `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Trait defining the interface for activity storage operations
///
/// Every mutating call is a full load-modify-store cycle over the whole
/// collection. No method orders its results; callers sort as needed.
#[async_trait]
pub trait ActivityStorage: Send + Sync {
    /// All activities in stored order. Fails soft: unreadable data yields an empty list.
    async fn get_all(&self) -> Vec<Activity>;

    /// Activities belonging to one kid, in stored order
    async fn get_for_kid(&self, kid_id: &str) -> Vec<Activity>;

    /// Assign id and timestamps, append, persist, and return the stored record
    async fn add(&self, input: NewActivity) -> RepositoryResult<Activity>;

    /// Merge a patch over an existing record; the type can never change
    async fn update(&self, id: &str, patch: ActivityPatch) -> RepositoryResult<Activity>;

    /// Remove a record by id. Returns true whenever the collection was persisted,
    /// including when no record had this id.
    async fn delete(&self, id: &str) -> bool;

    /// Remove the whole collection document (reset/test use)
    async fn clear_all(&self) -> RepositoryResult<()>;
}

/// Trait defining the interface for kid storage operations
#[async_trait]
pub trait KidStorage: Send + Sync {
    /// All kids in stored order. Fails soft like [`ActivityStorage::get_all`].
    async fn get_all(&self) -> Vec<Kid>;

    /// Retrieve a specific kid by ID
    async fn get(&self, kid_id: &str) -> Option<Kid>;

    /// Store a new kid with a generated id
    async fn add(&self, fields: KidFields) -> RepositoryResult<Kid>;

    /// Overwrite every mutable field of an existing kid
    async fn update(&self, kid_id: &str, fields: KidFields) -> RepositoryResult<Kid>;

    /// Remove a kid by id. Idempotent; activities are not touched.
    async fn delete(&self, kid_id: &str) -> bool;
}

/// Trait defining the interface for global configuration storage
#[async_trait]
pub trait GlobalConfigStorage: Send + Sync {
    /// The remembered kid selection, if any
    async fn get_selected_kid_id(&self) -> Option<String>;

    /// Remember (or forget, with `None`) the kid selection
    async fn set_selected_kid_id(&self, kid_id: Option<&str>) -> Result<()>;
}
