//! backend/src/domain/models/stage.rs

use chrono::NaiveDate;

use super::activity::MedicationDetails;

/// Average month length used to turn an age in days into months
const DAYS_PER_MONTH: f64 = 30.44;

/// Developmental stage derived from a birthdate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BabyStage {
    /// 0-2 months
    Newborn,
    /// 2-12 months
    Infant,
    /// 12 months and up
    Toddler,
}

impl BabyStage {
    pub fn from_birthdate(birthdate: NaiveDate, on: NaiveDate) -> Self {
        let age_in_months = (on - birthdate).num_days() as f64 / DAYS_PER_MONTH;
        if age_in_months < 2.0 {
            BabyStage::Newborn
        } else if age_in_months < 12.0 {
            BabyStage::Infant
        } else {
            BabyStage::Toddler
        }
    }

    /// Suggested medications for the stage, used to pre-fill medication entries
    pub fn default_medications(&self) -> Vec<MedicationDetails> {
        match self {
            BabyStage::Newborn => vec![
                MedicationDetails::new("Vitamin D", "400 IU"),
                MedicationDetails::new("Iron", "as prescribed"),
            ],
            BabyStage::Infant => vec![MedicationDetails::new("Vitamin D", "400 IU")],
            BabyStage::Toddler => Vec::new(),
        }
    }
}
