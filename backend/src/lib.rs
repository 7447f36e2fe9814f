//! # Kid Tracker Backend
//!
//! Local-first record keeping for a family tracker: kid profiles and their
//! timestamped activities, persisted as JSON documents on the local machine.
//!
//! Hosts call [`initialize_backend`] once and then work through the returned
//! [`AppContext`](domain::AppContext).

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod storage;

use anyhow::Result;
use log::info;
use std::sync::Arc;

use config::BackendConfig;
use domain::AppContext;
use storage::{ActivityRepository, DocumentStore, FileDocumentStore, GlobalConfigRepository, KidRepository};

pub use error::{RepositoryError, RepositoryResult};

/// Everything a host needs after startup
pub struct BackendState {
    pub config: BackendConfig,
    pub context: AppContext,
}

/// Open the data directory, wire the repositories and load the context
pub async fn initialize_backend(config: BackendConfig) -> Result<BackendState> {
    info!("Initializing backend with data directory {:?}", config.data_directory);

    let store: Arc<dyn DocumentStore> = Arc::new(FileDocumentStore::new(&config.data_directory)?);
    let mut context = AppContext::new(
        Arc::new(KidRepository::new(store.clone())),
        Arc::new(ActivityRepository::new(store.clone())),
        Arc::new(GlobalConfigRepository::new(store)),
    );
    context.load().await;

    info!("Backend initialized");
    Ok(BackendState { config, context })
}
