use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::enums::{FeedingType, FoodTexture, Sex};

/// A dated snapshot of one child's measurements and care details.
///
/// The child is identified by `name`; several rows with the same name form
/// a time series distinguished by `record_date`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfantProfile {
    pub id: i64,
    pub name: String,
    pub sex: Sex,
    pub birth_date: NaiveDate,
    pub is_preterm: bool,
    pub gestational_weeks: Option<u32>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub head_circumference_cm: Option<f64>,
    pub feeding_type: Option<FeedingType>,
    pub daily_milk_ml: Option<f64>,
    pub solids_start_month: Option<f64>,
    pub allergies: Option<String>,
    pub health_conditions: Option<String>,
    pub supplements: Option<String>,
    pub food_texture: Option<FoodTexture>,
    pub disliked_foods: Option<String>,
    pub eats_independently: bool,
    pub family_dietary_notes: Option<String>,
    pub city: Option<String>,
    pub record_date: NaiveDate,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Form input for creating or editing a snapshot (no id, no timestamps).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileDraft {
    pub name: String,
    pub sex: Sex,
    pub birth_date: NaiveDate,
    #[serde(default)]
    pub is_preterm: bool,
    #[serde(default)]
    pub gestational_weeks: Option<u32>,
    #[serde(default)]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub height_cm: Option<f64>,
    #[serde(default)]
    pub head_circumference_cm: Option<f64>,
    #[serde(default)]
    pub feeding_type: Option<FeedingType>,
    #[serde(default)]
    pub daily_milk_ml: Option<f64>,
    #[serde(default)]
    pub solids_start_month: Option<f64>,
    #[serde(default)]
    pub allergies: Option<String>,
    #[serde(default)]
    pub health_conditions: Option<String>,
    #[serde(default)]
    pub supplements: Option<String>,
    #[serde(default)]
    pub food_texture: Option<FoodTexture>,
    #[serde(default)]
    pub disliked_foods: Option<String>,
    #[serde(default)]
    pub eats_independently: bool,
    #[serde(default)]
    pub family_dietary_notes: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    /// Snapshot date; defaults to today when absent.
    #[serde(default)]
    pub record_date: Option<NaiveDate>,
}

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Name is required")]
    MissingName,

    #[error("Birth date {0} is in the future")]
    BirthDateInFuture(NaiveDate),

    #[error("A preterm profile needs the gestational week")]
    MissingGestationalWeeks,

    #[error("Gestational week {0} is outside the plausible 22-36 range")]
    ImplausibleGestationalWeeks(u32),

    #[error("{field} must be a positive number")]
    NonPositiveMeasurement { field: &'static str },
}

impl ProfileDraft {
    /// Validate the form input. Mirrors the required-field checks the entry
    /// form performs before a snapshot is saved.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.validate_at(Local::now().date_naive())
    }

    /// Validation against an explicit "today" (deterministic in tests).
    pub fn validate_at(&self, today: NaiveDate) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }
        if self.birth_date > today {
            return Err(ValidationError::BirthDateInFuture(self.birth_date));
        }
        if self.is_preterm {
            match self.gestational_weeks {
                None => return Err(ValidationError::MissingGestationalWeeks),
                Some(w) if !(22..=36).contains(&w) => {
                    return Err(ValidationError::ImplausibleGestationalWeeks(w))
                }
                Some(_) => {}
            }
        }
        for (field, value) in [
            ("weight_kg", self.weight_kg),
            ("height_cm", self.height_cm),
            ("head_circumference_cm", self.head_circumference_cm),
            ("daily_milk_ml", self.daily_milk_ml),
            ("solids_start_month", self.solids_start_month),
        ] {
            if let Some(v) = value {
                if v <= 0.0 {
                    return Err(ValidationError::NonPositiveMeasurement { field });
                }
            }
        }
        Ok(())
    }

    /// Trimmed name as stored in the database.
    pub fn normalized_name(&self) -> String {
        self.name.trim().to_string()
    }

    /// Gestational weeks only make sense for a preterm profile; the form
    /// clears the field when "full term" is selected.
    pub fn effective_gestational_weeks(&self) -> Option<u32> {
        if self.is_preterm {
            self.gestational_weeks
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ProfileDraft {
        ProfileDraft {
            name: "Mei".into(),
            sex: Sex::Female,
            birth_date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            is_preterm: false,
            gestational_weeks: None,
            weight_kg: Some(7.2),
            height_cm: Some(66.0),
            head_circumference_cm: None,
            feeding_type: Some(FeedingType::Mixed),
            daily_milk_ml: Some(600.0),
            solids_start_month: Some(6.0),
            allergies: None,
            health_conditions: None,
            supplements: Some("vitamin D".into()),
            food_texture: Some(FoodTexture::Puree),
            disliked_foods: None,
            eats_independently: false,
            family_dietary_notes: None,
            city: Some("Hangzhou".into()),
            record_date: None,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 10).unwrap()
    }

    #[test]
    fn valid_draft_passes() {
        assert_eq!(draft().validate_at(today()), Ok(()));
    }

    #[test]
    fn blank_name_rejected() {
        let mut d = draft();
        d.name = "   ".into();
        assert_eq!(d.validate_at(today()), Err(ValidationError::MissingName));
    }

    #[test]
    fn future_birth_date_rejected() {
        let mut d = draft();
        d.birth_date = NaiveDate::from_ymd_opt(2027, 1, 1).unwrap();
        assert!(matches!(
            d.validate_at(today()),
            Err(ValidationError::BirthDateInFuture(_))
        ));
    }

    #[test]
    fn preterm_requires_gestational_weeks() {
        let mut d = draft();
        d.is_preterm = true;
        d.gestational_weeks = None;
        assert_eq!(
            d.validate_at(today()),
            Err(ValidationError::MissingGestationalWeeks)
        );

        d.gestational_weeks = Some(40);
        assert_eq!(
            d.validate_at(today()),
            Err(ValidationError::ImplausibleGestationalWeeks(40))
        );

        d.gestational_weeks = Some(34);
        assert_eq!(d.validate_at(today()), Ok(()));
    }

    #[test]
    fn full_term_draft_drops_gestational_weeks() {
        let mut d = draft();
        d.gestational_weeks = Some(34);
        assert_eq!(d.effective_gestational_weeks(), None);

        d.is_preterm = true;
        assert_eq!(d.effective_gestational_weeks(), Some(34));
    }

    #[test]
    fn non_positive_measurement_rejected() {
        let mut d = draft();
        d.weight_kg = Some(0.0);
        assert_eq!(
            d.validate_at(today()),
            Err(ValidationError::NonPositiveMeasurement { field: "weight_kg" })
        );
    }

    #[test]
    fn name_is_trimmed() {
        let mut d = draft();
        d.name = "  Mei ".into();
        assert_eq!(d.normalized_name(), "Mei");
    }
}
