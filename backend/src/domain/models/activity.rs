//! backend/src/domain/models/activity.rs

use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use shared::{ActivityType, BreastSide, FeedingMethod, MedicationUnit, MilkType};
use uuid::Uuid;

/// Truncate an instant to the millisecond precision used on disk, so a record
/// built in memory compares equal to the same record after a reload.
pub fn normalize_instant(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant.trunc_subsecs(3)
}

/// Current time at storage precision
pub fn now() -> DateTime<Utc> {
    normalize_instant(Utc::now())
}

/// Rounded number of whole minutes between two instants
fn minutes_between(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let millis = (end - start).num_milliseconds();
    (millis as f64 / 60_000.0).round() as i64
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedingDetails {
    pub method: FeedingMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub milk_type: Option<MilkType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<BreastSide>,
    /// Millilitres
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    /// Minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solid_quantity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solid_notes: Option<String>,
}

impl FeedingDetails {
    pub fn new(method: FeedingMethod) -> Self {
        Self {
            method,
            milk_type: None,
            side: None,
            amount: None,
            duration: None,
            food_name: None,
            solid_quantity: None,
            solid_notes: None,
        }
    }
}

/// A sleep interval. `end` is always `start + duration` for records built
/// through [`SleepDetails::from_range`] or [`SleepDetails::with_duration`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepDetails {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub start: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub end: DateTime<Utc>,
    /// Minutes. Older records kept the duration outside `details`, so it may be
    /// missing on disk and is then derived from the range.
    #[serde(default)]
    pub duration: i64,
}

impl SleepDetails {
    /// Build from a start and an end; the end must be strictly after the start
    pub fn from_range(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Self, ActivityValidationError> {
        let start = normalize_instant(start);
        let end = normalize_instant(end);
        if end <= start {
            return Err(ActivityValidationError::SleepEndNotAfterStart);
        }
        Ok(Self {
            start,
            end,
            duration: minutes_between(start, end),
        })
    }

    /// Build from a start and an explicit duration; the end is derived
    pub fn with_duration(
        start: DateTime<Utc>,
        minutes: i64,
    ) -> Result<Self, ActivityValidationError> {
        if minutes <= 0 {
            return Err(ActivityValidationError::NonPositiveSleepDuration);
        }
        let start = normalize_instant(start);
        let end = Duration::try_minutes(minutes)
            .and_then(|length| start.checked_add_signed(length))
            .ok_or(ActivityValidationError::SleepDurationOutOfRange(minutes))?;
        Ok(Self {
            start,
            end,
            duration: minutes,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiaperDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wet: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dirty: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl DiaperDetails {
    pub fn new(wet: bool, dirty: bool) -> Self {
        Self {
            wet: Some(wet),
            dirty: Some(dirty),
            notes: None,
        }
    }

    pub fn is_wet(&self) -> bool {
        self.wet.unwrap_or(false)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BathDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationDetails {
    pub name: String,
    pub dose: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<MedicationUnit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl MedicationDetails {
    pub fn new(name: impl Into<String>, dose: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dose: dose.into(),
            unit: None,
            reason: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteDetails {
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MilestoneDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
}

/// Variant-specific payload of an activity. The variant is the activity's type,
/// so type and details can never disagree in memory.
#[derive(Debug, Clone, PartialEq)]
pub enum ActivityDetails {
    Feeding(FeedingDetails),
    Sleep(SleepDetails),
    Diaper(DiaperDetails),
    Bath(BathDetails),
    Medication(MedicationDetails),
    Note(NoteDetails),
    Milestone(MilestoneDetails),
}

impl ActivityDetails {
    pub fn activity_type(&self) -> ActivityType {
        match self {
            ActivityDetails::Feeding(_) => ActivityType::Feeding,
            ActivityDetails::Sleep(_) => ActivityType::Sleep,
            ActivityDetails::Diaper(_) => ActivityType::Diaper,
            ActivityDetails::Bath(_) => ActivityType::Bath,
            ActivityDetails::Medication(_) => ActivityType::Medication,
            ActivityDetails::Note(_) => ActivityType::Note,
            ActivityDetails::Milestone(_) => ActivityType::Milestone,
        }
    }

    /// Serialize the payload to the JSON object stored under `details`
    pub fn to_value(&self) -> serde_json::Result<Value> {
        match self {
            ActivityDetails::Feeding(d) => serde_json::to_value(d),
            ActivityDetails::Sleep(d) => serde_json::to_value(d),
            ActivityDetails::Diaper(d) => serde_json::to_value(d),
            ActivityDetails::Bath(d) => serde_json::to_value(d),
            ActivityDetails::Medication(d) => serde_json::to_value(d),
            ActivityDetails::Note(d) => serde_json::to_value(d),
            ActivityDetails::Milestone(d) => serde_json::to_value(d),
        }
    }

    /// Parse an untrusted `details` value as the payload of the given type.
    ///
    /// Only the shape is checked here; business rules live in [`Self::validate`].
    pub fn from_value(
        activity_type: ActivityType,
        value: Value,
    ) -> Result<Self, ActivityValidationError> {
        let value = match value {
            Value::Null => Value::Object(Map::new()),
            other => other,
        };
        let malformed = |e: serde_json::Error| ActivityValidationError::MalformedDetails {
            activity_type,
            reason: e.to_string(),
        };

        let details = match activity_type {
            ActivityType::Feeding => {
                ActivityDetails::Feeding(serde_json::from_value(value).map_err(malformed)?)
            }
            ActivityType::Sleep => {
                let mut sleep: SleepDetails = serde_json::from_value(value).map_err(malformed)?;
                if sleep.duration == 0 && sleep.end > sleep.start {
                    sleep.duration = minutes_between(sleep.start, sleep.end);
                }
                ActivityDetails::Sleep(sleep)
            }
            ActivityType::Diaper => {
                ActivityDetails::Diaper(serde_json::from_value(value).map_err(malformed)?)
            }
            ActivityType::Bath => {
                ActivityDetails::Bath(serde_json::from_value(value).map_err(malformed)?)
            }
            ActivityType::Medication => {
                ActivityDetails::Medication(serde_json::from_value(value).map_err(malformed)?)
            }
            ActivityType::Note => {
                ActivityDetails::Note(serde_json::from_value(value).map_err(malformed)?)
            }
            ActivityType::Milestone => {
                ActivityDetails::Milestone(serde_json::from_value(value).map_err(malformed)?)
            }
        };
        Ok(details)
    }

    /// Check the write-side business rules for this payload
    pub fn validate(&self) -> Result<(), ActivityValidationError> {
        match self {
            ActivityDetails::Feeding(d) => {
                if d.amount.is_some_and(|a| a < 0.0) {
                    return Err(ActivityValidationError::NegativeFeedingQuantity { field: "amount" });
                }
                if d.duration.is_some_and(|m| m < 0.0) {
                    return Err(ActivityValidationError::NegativeFeedingQuantity { field: "duration" });
                }
            }
            ActivityDetails::Sleep(d) => {
                if d.end <= d.start {
                    return Err(ActivityValidationError::SleepEndNotAfterStart);
                }
                if d.duration <= 0 {
                    return Err(ActivityValidationError::NonPositiveSleepDuration);
                }
            }
            ActivityDetails::Diaper(d) => {
                if !d.is_wet() && !d.is_dirty() {
                    return Err(ActivityValidationError::DiaperNeitherWetNorDirty);
                }
            }
            ActivityDetails::Medication(d) => {
                if d.name.trim().is_empty() {
                    return Err(ActivityValidationError::EmptyMedicationName);
                }
                let dose_is_positive = d
                    .dose
                    .trim()
                    .parse::<f64>()
                    .map(|dose| dose.is_finite() && dose > 0.0)
                    .unwrap_or(false);
                if !dose_is_positive {
                    return Err(ActivityValidationError::InvalidMedicationDose(d.dose.clone()));
                }
            }
            ActivityDetails::Note(d) => {
                if d.content.trim().is_empty() {
                    return Err(ActivityValidationError::EmptyNoteContent);
                }
            }
            ActivityDetails::Bath(_) | ActivityDetails::Milestone(_) => {}
        }
        Ok(())
    }

    /// Merge a partial `details` object over this payload and parse the result
    /// as the same type.
    ///
    /// Keys set to `null` clear the field. For sleep, an explicit `duration`
    /// re-derives `end`; a changed `start` or `end` re-derives `duration`.
    pub fn merged_with(&self, changes: &Map<String, Value>) -> Result<Self, ActivityValidationError> {
        let activity_type = self.activity_type();
        let mut object = match self.to_value() {
            Ok(Value::Object(object)) => object,
            Ok(_) => Map::new(),
            Err(e) => {
                return Err(ActivityValidationError::MalformedDetails {
                    activity_type,
                    reason: e.to_string(),
                })
            }
        };

        for (key, value) in changes {
            if value.is_null() {
                object.remove(key);
            } else {
                object.insert(key.clone(), value.clone());
            }
        }

        let mut merged = Self::from_value(activity_type, Value::Object(object))?;
        if let ActivityDetails::Sleep(sleep) = &mut merged {
            if changes.contains_key("duration") {
                *sleep = SleepDetails::with_duration(sleep.start, sleep.duration)?;
            } else if changes.contains_key("start") || changes.contains_key("end") {
                *sleep = SleepDetails::from_range(sleep.start, sleep.end)?;
            }
        }
        Ok(merged)
    }
}

/// A single timestamped caregiving event
#[derive(Debug, Clone, PartialEq)]
pub struct Activity {
    pub id: String,
    pub kid_id: String,
    /// When the event happened, as entered by the caregiver
    pub timestamp: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub details: ActivityDetails,
}

impl Activity {
    /// Generate a unique ID for an activity
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }

    pub fn activity_type(&self) -> ActivityType {
        self.details.activity_type()
    }

    /// One-line description used by list views
    pub fn summary(&self) -> String {
        match &self.details {
            ActivityDetails::Feeding(d) => match d.amount {
                Some(amount) if amount > 0.0 => format!("{}, {}ml", d.method, amount),
                _ => d.method.to_string(),
            },
            ActivityDetails::Sleep(d) => format!("Duration: {} min", d.duration),
            ActivityDetails::Diaper(d) => {
                let parts: Vec<&str> = [(d.is_wet(), "Wet"), (d.is_dirty(), "Dirty")]
                    .into_iter()
                    .filter_map(|(set, label)| set.then_some(label))
                    .collect();
                if parts.is_empty() {
                    "Dry".to_string()
                } else {
                    parts.join(", ")
                }
            }
            ActivityDetails::Bath(_) => "Bath given".to_string(),
            ActivityDetails::Medication(d) => format!("{} - {}", d.name, d.dose),
            ActivityDetails::Note(d) => d.content.clone(),
            ActivityDetails::Milestone(d) => d.event.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ActivityValidationError {
    #[error("Kid id cannot be empty")]
    EmptyKidId,
    #[error("Details do not match activity type {activity_type}: {reason}")]
    MalformedDetails {
        activity_type: ActivityType,
        reason: String,
    },
    #[error("Sleep end must be after sleep start")]
    SleepEndNotAfterStart,
    #[error("Sleep duration must be positive")]
    NonPositiveSleepDuration,
    #[error("Sleep duration of {0} minutes is out of range")]
    SleepDurationOutOfRange(i64),
    #[error("Diaper change must be wet, dirty, or both")]
    DiaperNeitherWetNorDirty,
    #[error("Medication name cannot be empty")]
    EmptyMedicationName,
    #[error("Medication dose must be a positive number, got {0:?}")]
    InvalidMedicationDose(String),
    #[error("Note content cannot be empty")]
    EmptyNoteContent,
    #[error("Feeding {field} cannot be negative")]
    NegativeFeedingQuantity { field: &'static str },
}
