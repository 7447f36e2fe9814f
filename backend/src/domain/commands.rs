// backend/src/domain/commands.rs

//! Inputs to the repository operations.
//! These carry caller-supplied fields only; ids and creation/modification
//! times are always assigned by the repositories.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use shared::ActivityType;

use super::models::activity::{ActivityDetails, ActivityValidationError};

/// Input for adding an activity. Type is carried by the details variant.
#[derive(Debug, Clone, PartialEq)]
pub struct NewActivity {
    pub kid_id: String,
    pub timestamp: DateTime<Utc>,
    pub details: ActivityDetails,
}

impl NewActivity {
    pub fn new(kid_id: impl Into<String>, timestamp: DateTime<Utc>, details: ActivityDetails) -> Self {
        Self {
            kid_id: kid_id.into(),
            timestamp,
            details,
        }
    }

    pub fn activity_type(&self) -> ActivityType {
        self.details.activity_type()
    }

    pub fn validate(&self) -> Result<(), ActivityValidationError> {
        if self.kid_id.trim().is_empty() {
            return Err(ActivityValidationError::EmptyKidId);
        }
        self.details.validate()
    }
}

/// Partial update for an activity.
///
/// `id` is accepted so callers can pass back a whole record, but it never
/// overrides the stored id. `activity_type`, when present, must equal the
/// stored type. `details` is merged key by key over the stored payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityPatch {
    pub id: Option<String>,
    pub kid_id: Option<String>,
    pub activity_type: Option<ActivityType>,
    pub timestamp: Option<DateTime<Utc>>,
    pub details: Option<Map<String, Value>>,
}

impl ActivityPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn kid_id(mut self, kid_id: impl Into<String>) -> Self {
        self.kid_id = Some(kid_id.into());
        self
    }

    pub fn activity_type(mut self, activity_type: ActivityType) -> Self {
        self.activity_type = Some(activity_type);
        self
    }

    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Set a single details field; `Value::Null` clears it
    pub fn detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    /// Replace the whole payload. Also pins the type to the payload's variant,
    /// so passing details of another type is rejected as a type change.
    pub fn with_details(mut self, details: &ActivityDetails) -> serde_json::Result<Self> {
        let fields = match details.to_value()? {
            Value::Object(fields) => fields,
            _ => Map::new(),
        };
        self.activity_type = Some(details.activity_type());
        self.details = Some(fields);
        Ok(self)
    }
}
