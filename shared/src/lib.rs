//! Persisted record shapes shared between the storage layer and any consumer
//! that reads the raw `kids_list` / `activity_list` documents.
//!
//! These types mirror the JSON exactly: camelCase field names, instants as
//! epoch milliseconds, birthdates as `YYYY-MM-DD` strings. The backend maps
//! them onto its typed domain models.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of caregiving event, stored as the `type` field of an activity record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Feeding,
    Sleep,
    Diaper,
    Bath,
    Medication,
    Note,
    Milestone,
}

impl ActivityType {
    pub const ALL: [ActivityType; 7] = [
        ActivityType::Feeding,
        ActivityType::Sleep,
        ActivityType::Diaper,
        ActivityType::Bath,
        ActivityType::Medication,
        ActivityType::Note,
        ActivityType::Milestone,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Feeding => "feeding",
            ActivityType::Sleep => "sleep",
            ActivityType::Diaper => "diaper",
            ActivityType::Bath => "bath",
            ActivityType::Medication => "medication",
            ActivityType::Note => "note",
            ActivityType::Milestone => "milestone",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActivityType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("Unknown activity type: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Boy,
    Girl,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeedingMethod {
    Breast,
    Bottle,
    InfantCup,
    Solid,
}

impl fmt::Display for FeedingMethod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            FeedingMethod::Breast => "breast",
            FeedingMethod::Bottle => "bottle",
            FeedingMethod::InfantCup => "infant-cup",
            FeedingMethod::Solid => "solid",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MilkType {
    Formula,
    BreastmilkDirect,
    BreastmilkExpressed,
    Mixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreastSide {
    Left,
    Right,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MedicationUnit {
    Ml,
    Drops,
    Tablet,
}

/// A child profile as stored in the `kids_list` document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kid {
    pub id: String,
    pub name: String,
    /// ISO 8601 date (YYYY-MM-DD)
    pub birthdate: String,
    pub gender: Gender,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_uri: Option<String>,
}

/// An activity as stored in the `activity_list` document.
///
/// `details` is kept untyped here; its shape depends on `activity_type` and is
/// checked when the record is mapped to a domain activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub kid_id: String,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    /// When the event happened (epoch millis)
    pub timestamp: i64,
    /// Epoch millis
    pub created_at: i64,
    /// Epoch millis
    pub updated_at: i64,
    #[serde(default)]
    pub details: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_activity_record_uses_camel_case_and_type_field() {
        let record = Activity {
            id: "a1".to_string(),
            kid_id: "k1".to_string(),
            activity_type: ActivityType::Note,
            timestamp: 1000,
            created_at: 2000,
            updated_at: 3000,
            details: json!({ "content": "hello" }),
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["kidId"], "k1");
        assert_eq!(value["type"], "note");
        assert_eq!(value["createdAt"], 2000);
        assert_eq!(value["details"]["content"], "hello");
    }

    #[test]
    fn test_unknown_activity_type_is_rejected() {
        let raw = json!({
            "id": "a1", "kidId": "k1", "type": "teleport",
            "timestamp": 1, "createdAt": 1, "updatedAt": 1, "details": {}
        });
        assert!(serde_json::from_value::<Activity>(raw).is_err());
        assert!("teleport".parse::<ActivityType>().is_err());
        assert_eq!("milestone".parse::<ActivityType>(), Ok(ActivityType::Milestone));
    }

    #[test]
    fn test_feeding_enums_use_kebab_case() {
        assert_eq!(serde_json::to_value(FeedingMethod::InfantCup).unwrap(), "infant-cup");
        assert_eq!(serde_json::to_value(MilkType::BreastmilkExpressed).unwrap(), "breastmilk-expressed");
        assert_eq!(FeedingMethod::InfantCup.to_string(), "infant-cup");
    }

    #[test]
    fn test_kid_record_omits_missing_photo() {
        let kid = Kid {
            id: "k1".to_string(),
            name: "Mia".to_string(),
            birthdate: "2024-03-01".to_string(),
            gender: Gender::Girl,
            photo_uri: None,
        };
        let value = serde_json::to_value(&kid).unwrap();
        assert!(value.get("photoUri").is_none());
        assert_eq!(value["gender"], "girl");
    }
}
