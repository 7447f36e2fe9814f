//! # JSON Global Config Repository
//!
//! Keeps application-wide settings in a single `global_config` document.
//!
//! ## Document Format
//!
//! ```json
//! {
//!   "selectedKidId": "9f1e...",
//!   "dataFormatVersion": "1.0",
//!   "createdAt": "2025-01-21T19:30:00Z",
//!   "updatedAt": "2025-01-21T19:35:00Z"
//! }
//! ```

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::storage::traits::{DocumentStore, GlobalConfigStorage};

/// Document key owned by this repository
pub const GLOBAL_CONFIG_KEY: &str = "global_config";

pub const DATA_FORMAT_VERSION: &str = "1.0";

/// Global configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalConfig {
    /// Id of the kid the user last selected
    #[serde(default)]
    pub selected_kid_id: Option<String>,
    /// Data format version for future migrations
    pub data_format_version: String,
    /// When the global config was first created (RFC 3339)
    pub created_at: String,
    /// When the global config was last updated (RFC 3339)
    pub updated_at: String,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            selected_kid_id: None,
            data_format_version: DATA_FORMAT_VERSION.to_string(),
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// Document-backed global config repository
#[derive(Clone)]
pub struct GlobalConfigRepository {
    store: Arc<dyn DocumentStore>,
}

impl GlobalConfigRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Load the global config, falling back to defaults when it is missing or unreadable
    pub async fn load_global_config(&self) -> GlobalConfig {
        match self.store.get(GLOBAL_CONFIG_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<GlobalConfig>(&raw) {
                Ok(config) => {
                    debug!("Loaded global config");
                    config
                }
                Err(e) => {
                    warn!("Unreadable global config, using defaults: {}", e);
                    GlobalConfig::default()
                }
            },
            Ok(None) => GlobalConfig::default(),
            Err(e) => {
                warn!("Failed to read global config, using defaults: {:#}", e);
                GlobalConfig::default()
            }
        }
    }

    /// Save the global config, stamping `updated_at`
    pub async fn save_global_config(&self, config: &GlobalConfig) -> Result<()> {
        let mut config = config.clone();
        config.updated_at = Utc::now().to_rfc3339();
        let json = serde_json::to_string_pretty(&config).context("Failed to serialize global config")?;
        self.store
            .set(GLOBAL_CONFIG_KEY, &json)
            .await
            .context("Failed to persist global config")
    }
}

#[async_trait]
impl GlobalConfigStorage for GlobalConfigRepository {
    async fn get_selected_kid_id(&self) -> Option<String> {
        self.load_global_config().await.selected_kid_id
    }

    async fn set_selected_kid_id(&self, kid_id: Option<&str>) -> Result<()> {
        let mut config = self.load_global_config().await;
        if config.selected_kid_id.as_deref() == kid_id {
            return Ok(());
        }
        config.selected_kid_id = kid_id.map(str::to_string);
        self.save_global_config(&config).await?;
        info!("Set selected kid to: {:?}", kid_id);
        Ok(())
    }
}
