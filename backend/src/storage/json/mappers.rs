//! Conversions between the persisted records in `shared` and the domain models.

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use shared::{Activity as ActivityRecord, Kid as KidRecord};

use crate::domain::models::{Activity, ActivityDetails, Kid};

const BIRTHDATE_FORMAT: &str = "%Y-%m-%d";

fn instant_from_millis(millis: i64, field: &str) -> Result<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| anyhow!("{} is out of range: {}", field, millis))
}

/// Mapper to convert between stored activity records and domain activities.
pub struct ActivityMapper;

impl ActivityMapper {
    /// Converts a stored record to a domain activity, checking that `details`
    /// has the shape required by `type`.
    pub fn to_domain(record: ActivityRecord) -> Result<Activity> {
        let details = ActivityDetails::from_value(record.activity_type, record.details)
            .with_context(|| format!("Activity {} has invalid details", record.id))?;

        Ok(Activity {
            id: record.id,
            kid_id: record.kid_id,
            timestamp: instant_from_millis(record.timestamp, "timestamp")?,
            created_at: instant_from_millis(record.created_at, "createdAt")?,
            updated_at: instant_from_millis(record.updated_at, "updatedAt")?,
            details,
        })
    }

    /// Converts a domain activity to its stored record.
    pub fn to_record(activity: &Activity) -> Result<ActivityRecord> {
        let details = activity
            .details
            .to_value()
            .with_context(|| format!("Failed to serialize details of activity {}", activity.id))?;

        Ok(ActivityRecord {
            id: activity.id.clone(),
            kid_id: activity.kid_id.clone(),
            activity_type: activity.activity_type(),
            timestamp: activity.timestamp.timestamp_millis(),
            created_at: activity.created_at.timestamp_millis(),
            updated_at: activity.updated_at.timestamp_millis(),
            details,
        })
    }
}

/// Mapper to convert between stored kid records and domain kids.
pub struct KidMapper;

impl KidMapper {
    /// Converts a stored kid record to a domain kid.
    pub fn to_domain(record: KidRecord) -> Result<Kid> {
        let birthdate = NaiveDate::parse_from_str(&record.birthdate, BIRTHDATE_FORMAT)
            .with_context(|| format!("Failed to parse birthdate of kid {}", record.id))?;

        Ok(Kid {
            id: record.id,
            name: record.name,
            birthdate,
            gender: record.gender,
            photo_uri: record.photo_uri,
        })
    }

    /// Converts a domain kid to its stored record.
    pub fn to_record(kid: &Kid) -> KidRecord {
        KidRecord {
            id: kid.id.clone(),
            name: kid.name.clone(),
            birthdate: kid.birthdate.format(BIRTHDATE_FORMAT).to_string(),
            gender: kid.gender,
            photo_uri: kid.photo_uri.clone(),
        }
    }
}
