//! backend/src/domain/models/kid.rs

use chrono::{Datelike, NaiveDate};
use shared::Gender;
use uuid::Uuid;

use super::stage::BabyStage;

pub const MAX_NAME_LENGTH: usize = 100;

/// Domain model representing a child profile
#[derive(Debug, Clone, PartialEq)]
pub struct Kid {
    pub id: String,
    pub name: String,
    pub birthdate: NaiveDate,
    pub gender: Gender,
    pub photo_uri: Option<String>,
}

impl Kid {
    /// Generate a unique ID for a kid
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// Build a kid from already-normalized fields
    pub fn from_fields(id: String, fields: KidFields) -> Self {
        Self {
            id,
            name: fields.name,
            birthdate: fields.birthdate,
            gender: fields.gender,
            photo_uri: fields.photo_uri,
        }
    }

    pub fn stage_on(&self, date: NaiveDate) -> BabyStage {
        BabyStage::from_birthdate(self.birthdate, date)
    }
}

/// The mutable fields of a kid, used for both add and update.
///
/// An update overwrites every field; there is no partial merge for kids.
#[derive(Debug, Clone, PartialEq)]
pub struct KidFields {
    pub name: String,
    pub birthdate: NaiveDate,
    pub gender: Gender,
    pub photo_uri: Option<String>,
}

impl KidFields {
    pub fn new(name: impl Into<String>, birthdate: NaiveDate, gender: Gender) -> Self {
        Self {
            name: name.into(),
            birthdate,
            gender,
            photo_uri: None,
        }
    }

    pub fn with_photo(mut self, photo_uri: impl Into<String>) -> Self {
        self.photo_uri = Some(photo_uri.into());
        self
    }

    /// Trim the name and drop a blank photo URI
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            photo_uri: self
                .photo_uri
                .map(|uri| uri.trim().to_string())
                .filter(|uri| !uri.is_empty()),
            ..self
        }
    }

    /// Validate against the given "today"
    pub fn validate(&self, today: NaiveDate) -> Result<(), KidValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(KidValidationError::EmptyName);
        }
        let length = name.chars().count();
        if length > MAX_NAME_LENGTH {
            return Err(KidValidationError::NameTooLong(length));
        }
        if self.birthdate.year() < 1900 {
            return Err(KidValidationError::BirthdateTooEarly(self.birthdate));
        }
        if self.birthdate > today {
            return Err(KidValidationError::BirthdateInFuture(self.birthdate));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KidValidationError {
    #[error("Kid name cannot be empty")]
    EmptyName,
    #[error("Kid name cannot exceed 100 characters (got {0})")]
    NameTooLong(usize),
    #[error("Birthdate {0} is before 1900")]
    BirthdateTooEarly(NaiveDate),
    #[error("Birthdate {0} is in the future")]
    BirthdateInFuture(NaiveDate),
}
