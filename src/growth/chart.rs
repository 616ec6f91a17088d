use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::enums::Sex;
use crate::models::InfantProfile;

use super::age::age_in_months;
use super::reference::{classify, Measure, PercentileBand};
use super::ChartError;

/// One charted measurement: the snapshot's month offset from birth and the
/// recorded value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthPoint {
    pub age_months: u32,
    pub value: f64,
    pub record_date: NaiveDate,
}

/// A child's measurements for one measure, ready to draw over the
/// reference curves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthSeries {
    pub child_name: String,
    pub sex: Sex,
    pub measure: Measure,
    pub points: Vec<GrowthPoint>,
}

impl GrowthSeries {
    /// Percentile band of the most recent measurement, when the reference
    /// tables cover its age.
    pub fn latest_band(&self) -> Option<PercentileBand> {
        let last = self.points.last()?;
        classify(self.sex, self.measure, last.age_months as f64, last.value)
    }
}

fn measure_value(profile: &InfantProfile, measure: Measure) -> Option<f64> {
    match measure {
        Measure::WeightKg => profile.weight_kg,
        Measure::HeightCm => profile.height_cm,
        Measure::HeadCircumferenceCm => profile.head_circumference_cm,
    }
}

/// Build a series from a child's snapshot history (any order). Snapshots
/// without the measurement are skipped; the rest are sorted by record date.
pub fn build_series(
    history: &[InfantProfile],
    measure: Measure,
) -> Result<GrowthSeries, ChartError> {
    let first = history.first().ok_or_else(|| ChartError::NoSnapshots {
        name: String::new(),
    })?;

    let mut snapshots: Vec<&InfantProfile> = history.iter().collect();
    snapshots.sort_by_key(|p| (p.record_date, p.id));

    let points: Vec<GrowthPoint> = snapshots
        .iter()
        .filter_map(|p| {
            measure_value(p, measure).map(|value| GrowthPoint {
                age_months: age_in_months(p.birth_date, p.record_date),
                value,
                record_date: p.record_date,
            })
        })
        .collect();

    if points.is_empty() {
        return Err(ChartError::NoMeasurements {
            name: first.name.clone(),
            measure: measure.column_name(),
        });
    }

    Ok(GrowthSeries {
        child_name: first.name.clone(),
        sex: first.sex,
        measure,
        points,
    })
}
