//! # App Context
//!
//! In-memory snapshot of all kids and activities for presentation code, plus
//! the current kid selection.
//!
//! The context never patches its cache. After every mutation it exposes,
//! successful or not, it re-fetches both collections from the repositories.
//! It never writes to the document store directly.

use chrono::{Local, NaiveDate, TimeZone};
use log::{info, warn};
use std::sync::Arc;

use super::activity_queries;
use super::commands::{ActivityPatch, NewActivity};
use super::models::{Activity, Kid, KidFields};
use super::selection::resolve_selection;
use crate::error::{RepositoryError, RepositoryResult};
use crate::storage::traits::{ActivityStorage, GlobalConfigStorage, KidStorage};

/// Explicitly owned application state handle
pub struct AppContext {
    kid_storage: Arc<dyn KidStorage>,
    activity_storage: Arc<dyn ActivityStorage>,
    global_config: Arc<dyn GlobalConfigStorage>,
    kids: Vec<Kid>,
    activities: Vec<Activity>,
    selected_kid_id: Option<String>,
}

impl AppContext {
    /// Create an empty context; call [`AppContext::load`] to populate it
    pub fn new(
        kid_storage: Arc<dyn KidStorage>,
        activity_storage: Arc<dyn ActivityStorage>,
        global_config: Arc<dyn GlobalConfigStorage>,
    ) -> Self {
        Self {
            kid_storage,
            activity_storage,
            global_config,
            kids: Vec::new(),
            activities: Vec::new(),
            selected_kid_id: None,
        }
    }

    /// Initial load: both collections plus the remembered selection
    pub async fn load(&mut self) {
        self.selected_kid_id = self.global_config.get_selected_kid_id().await;
        self.refresh().await;
        info!(
            "Loaded {} kids and {} activities",
            self.kids.len(),
            self.activities.len()
        );
    }

    /// Re-fetch both collections
    pub async fn refresh(&mut self) {
        self.reload_kids().await;
        self.reload_activities().await;
    }

    /// Re-fetch kids and re-resolve the selection against them
    pub async fn reload_kids(&mut self) {
        self.kids = self.kid_storage.get_all().await;

        let resolved = resolve_selection(self.selected_kid_id.as_deref(), &self.kids);
        if resolved != self.selected_kid_id {
            info!("Selection changed from {:?} to {:?}", self.selected_kid_id, resolved);
            self.selected_kid_id = resolved;
            self.remember_selection().await;
        }
    }

    pub async fn reload_activities(&mut self) {
        self.activities = self.activity_storage.get_all().await;
    }

    async fn remember_selection(&self) {
        if let Err(e) = self
            .global_config
            .set_selected_kid_id(self.selected_kid_id.as_deref())
            .await
        {
            warn!("Failed to remember kid selection: {:#}", e);
        }
    }

    pub fn kids(&self) -> &[Kid] {
        &self.kids
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn kid(&self, kid_id: &str) -> Option<&Kid> {
        self.kids.iter().find(|kid| kid.id == kid_id)
    }

    pub fn selected_kid_id(&self) -> Option<&str> {
        self.selected_kid_id.as_deref()
    }

    pub fn selected_kid(&self) -> Option<&Kid> {
        self.selected_kid_id.as_deref().and_then(|id| self.kid(id))
    }

    /// Select a kid that is currently loaded and remember the choice
    pub async fn select_kid(&mut self, kid_id: &str) -> RepositoryResult<()> {
        if self.kid(kid_id).is_none() {
            warn!("Cannot select unknown kid: {}", kid_id);
            return Err(RepositoryError::NotFound(kid_id.to_string()));
        }
        self.selected_kid_id = Some(kid_id.to_string());
        self.global_config.set_selected_kid_id(Some(kid_id)).await?;
        Ok(())
    }

    /// Forget the current selection. With exactly one kid it is re-selected on
    /// the next reload, as the resolution policy requires.
    pub async fn clear_selection(&mut self) {
        self.selected_kid_id = None;
        self.remember_selection().await;
    }

    pub async fn add_kid(&mut self, fields: KidFields) -> RepositoryResult<Kid> {
        let result = self.kid_storage.add(fields).await;
        if let Err(e) = &result {
            warn!("[AppContext] Failed to add kid: {}", e);
        }
        self.refresh().await;
        result
    }

    pub async fn update_kid(&mut self, kid_id: &str, fields: KidFields) -> RepositoryResult<Kid> {
        let result = self.kid_storage.update(kid_id, fields).await;
        if let Err(e) = &result {
            warn!("[AppContext] Failed to update kid {}: {}", kid_id, e);
        }
        self.refresh().await;
        result
    }

    /// Delete a kid. Its activities stay in the activity collection.
    pub async fn delete_kid(&mut self, kid_id: &str) -> bool {
        let deleted = self.kid_storage.delete(kid_id).await;
        if !deleted {
            warn!("[AppContext] Failed to delete kid {}", kid_id);
        }
        self.refresh().await;
        deleted
    }

    pub async fn add_activity(&mut self, input: NewActivity) -> RepositoryResult<Activity> {
        let result = self.activity_storage.add(input).await;
        if let Err(e) = &result {
            warn!("[AppContext] Failed to add new activity: {}", e);
        }
        self.refresh().await;
        result
    }

    pub async fn update_activity(&mut self, id: &str, patch: ActivityPatch) -> RepositoryResult<Activity> {
        let result = self.activity_storage.update(id, patch).await;
        if let Err(e) = &result {
            warn!("[AppContext] Failed to update activity with id {}: {}", id, e);
        }
        self.refresh().await;
        result
    }

    pub async fn delete_activity(&mut self, id: &str) -> bool {
        let deleted = self.activity_storage.delete(id).await;
        if !deleted {
            warn!("[AppContext] Failed to delete activity with id {}", id);
        }
        self.refresh().await;
        deleted
    }

    pub fn activities_for_kid(&self, kid_id: &str) -> Vec<&Activity> {
        activity_queries::for_kid(&self.activities, kid_id)
    }

    /// The selected kid's activities, newest first
    pub fn selected_kid_activities(&self) -> Vec<&Activity> {
        match self.selected_kid_id.as_deref() {
            Some(kid_id) => activity_queries::newest_first(self.activities_for_kid(kid_id)),
            None => Vec::new(),
        }
    }

    /// Activities on a calendar day in `tz`, optionally for one kid only
    pub fn activities_on<Tz: TimeZone>(
        &self,
        day: NaiveDate,
        tz: &Tz,
        kid_filter: Option<&str>,
    ) -> Vec<&Activity> {
        activity_queries::on_day(&self.activities, day, tz)
            .into_iter()
            .filter(|a| kid_filter.map_or(true, |kid_id| a.kid_id == kid_id))
            .collect()
    }

    /// Today's activities in the local time zone, optionally for one kid only
    pub fn todays_activities(&self, kid_filter: Option<&str>) -> Vec<&Activity> {
        self.activities_on(Local::now().date_naive(), &Local, kid_filter)
    }
}
