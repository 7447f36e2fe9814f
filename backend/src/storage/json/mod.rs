//! JSON document storage: every collection is one JSON document in a
//! [`DocumentStore`](crate::storage::traits::DocumentStore).

pub mod activity_repository;
pub mod collection;
pub mod connection;
pub mod global_config_repository;
pub mod kid_repository;
pub mod mappers;
pub mod memory;

#[cfg(test)]
pub mod test_utils;

pub use activity_repository::{ActivityRepository, ACTIVITY_KEY};
pub use connection::FileDocumentStore;
pub use global_config_repository::{GlobalConfig, GlobalConfigRepository, GLOBAL_CONFIG_KEY};
pub use kid_repository::{KidRepository, KIDS_KEY};
pub use memory::MemoryDocumentStore;
