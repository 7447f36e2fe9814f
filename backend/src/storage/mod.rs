//! # Storage Module
//!
//! Handles all data persistence for the kid tracker.
//!
//! Each collection (kids, activities, global config) lives in one serialized
//! document in a key-value [`DocumentStore`]. Repositories own exactly one key
//! each and perform whole-document load-modify-store cycles.
//!
//! ## Design Principles
//!
//! - **Repository Pattern**: Clean separation between domain and data access
//! - **Dependency Inversion**: The app context depends on the storage traits, not the JSON implementation
//! - **Testability**: An in-memory document store stands in for the file system

pub mod json;
pub mod traits;

pub use json::{
    ActivityRepository, FileDocumentStore, GlobalConfigRepository, KidRepository, MemoryDocumentStore,
};
pub use traits::{ActivityStorage, DocumentStore, GlobalConfigStorage, KidStorage};
