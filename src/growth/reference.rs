//! Static WHO child-growth reference tables, 0-36 months.
//!
//! Anchor rows hold the P3/P15/P50/P85/P97 values at selected months;
//! values between anchors are linearly interpolated. Figures follow the
//! WHO Child Growth Standards tables, rounded to one decimal.

use serde::{Deserialize, Serialize};

use crate::models::enums::Sex;

/// Oldest age the reference tables cover.
pub const MAX_REFERENCE_MONTHS: u32 = 36;

/// Which recorded measurement a chart tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    WeightKg,
    HeightCm,
    HeadCircumferenceCm,
}

impl Measure {
    pub fn label(&self) -> &'static str {
        match self {
            Self::WeightKg => "Weight-for-age",
            Self::HeightCm => "Length/height-for-age",
            Self::HeadCircumferenceCm => "Head circumference-for-age",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Self::WeightKg => "kg",
            Self::HeightCm => "cm",
            Self::HeadCircumferenceCm => "cm",
        }
    }

    pub fn column_name(&self) -> &'static str {
        match self {
            Self::WeightKg => "weight_kg",
            Self::HeightCm => "height_cm",
            Self::HeadCircumferenceCm => "head_circumference_cm",
        }
    }
}

/// Percentile band a measurement falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PercentileBand {
    BelowP3,
    P3ToP15,
    P15ToP85,
    P85ToP97,
    AboveP97,
}

impl PercentileBand {
    pub fn label(&self) -> &'static str {
        match self {
            Self::BelowP3 => "below the 3rd percentile",
            Self::P3ToP15 => "between the 3rd and 15th percentiles",
            Self::P15ToP85 => "between the 15th and 85th percentiles",
            Self::P85ToP97 => "between the 85th and 97th percentiles",
            Self::AboveP97 => "above the 97th percentile",
        }
    }
}

/// One anchor row of a reference table.
#[derive(Debug, Clone, Copy)]
pub struct Anchor {
    pub month: u32,
    pub p3: f64,
    pub p15: f64,
    pub p50: f64,
    pub p85: f64,
    pub p97: f64,
}

/// Interpolated percentile values at one age.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PercentilePoint {
    pub age_months: f64,
    pub p3: f64,
    pub p15: f64,
    pub p50: f64,
    pub p85: f64,
    pub p97: f64,
}

macro_rules! anchors {
    ($($month:literal : $p3:literal, $p15:literal, $p50:literal, $p85:literal, $p97:literal;)+) => {
        &[$(Anchor { month: $month, p3: $p3, p15: $p15, p50: $p50, p85: $p85, p97: $p97 }),+]
    };
}

const WEIGHT_BOYS: &[Anchor] = anchors![
    0:  2.5, 2.9, 3.3, 3.9, 4.3;
    1:  3.4, 3.9, 4.5, 5.1, 5.7;
    2:  4.4, 4.9, 5.6, 6.3, 7.0;
    3:  5.1, 5.6, 6.4, 7.2, 7.9;
    4:  5.6, 6.2, 7.0, 7.9, 8.6;
    5:  6.1, 6.7, 7.5, 8.4, 9.2;
    6:  6.4, 7.1, 7.9, 8.9, 9.7;
    8:  7.0, 7.7, 8.6, 9.6, 10.5;
    10: 7.5, 8.2, 9.2, 10.3, 11.2;
    12: 7.8, 8.6, 9.6, 10.8, 11.8;
    15: 8.4, 9.2, 10.3, 11.6, 12.7;
    18: 8.9, 9.7, 10.9, 12.3, 13.5;
    21: 9.3, 10.2, 11.5, 13.0, 14.3;
    24: 9.8, 10.8, 12.2, 13.7, 15.1;
    30: 10.7, 11.8, 13.3, 15.0, 16.6;
    36: 11.4, 12.7, 14.3, 16.2, 18.0;
];

const WEIGHT_GIRLS: &[Anchor] = anchors![
    0:  2.4, 2.8, 3.2, 3.7, 4.2;
    1:  3.2, 3.6, 4.2, 4.8, 5.4;
    2:  3.9, 4.5, 5.1, 5.9, 6.5;
    3:  4.5, 5.1, 5.8, 6.7, 7.4;
    4:  5.0, 5.6, 6.4, 7.3, 8.1;
    5:  5.4, 6.1, 6.9, 7.8, 8.7;
    6:  5.7, 6.4, 7.3, 8.3, 9.2;
    8:  6.3, 7.0, 7.9, 9.0, 10.0;
    10: 6.7, 7.5, 8.5, 9.6, 10.7;
    12: 7.0, 7.9, 8.9, 10.2, 11.3;
    15: 7.6, 8.5, 9.6, 11.0, 12.2;
    18: 8.1, 9.1, 10.2, 11.8, 13.1;
    21: 8.6, 9.6, 10.9, 12.5, 13.9;
    24: 9.0, 10.2, 11.5, 13.2, 14.8;
    30: 10.0, 11.2, 12.7, 14.7, 16.5;
    36: 10.8, 12.1, 13.9, 16.1, 18.1;
];

const HEIGHT_BOYS: &[Anchor] = anchors![
    0:  46.1, 48.0, 49.9, 51.8, 53.7;
    1:  50.8, 52.8, 54.7, 56.7, 58.6;
    2:  54.4, 56.4, 58.4, 60.4, 62.4;
    3:  57.3, 59.3, 61.4, 63.5, 65.5;
    4:  59.7, 61.7, 63.9, 66.0, 68.0;
    5:  61.7, 63.7, 65.9, 68.1, 70.1;
    6:  63.3, 65.4, 67.6, 69.8, 71.9;
    8:  66.2, 68.3, 70.6, 72.9, 75.0;
    10: 68.7, 71.0, 73.3, 75.6, 77.9;
    12: 71.0, 73.3, 75.7, 78.1, 80.5;
    15: 74.1, 76.6, 79.1, 81.7, 84.2;
    18: 76.9, 79.6, 82.3, 85.0, 87.7;
    21: 79.4, 82.3, 85.1, 88.0, 90.9;
    24: 81.7, 84.8, 87.8, 90.9, 93.9;
    30: 85.5, 88.9, 92.3, 95.6, 98.9;
    36: 88.7, 92.4, 96.1, 99.8, 103.5;
];

const HEIGHT_GIRLS: &[Anchor] = anchors![
    0:  45.4, 47.3, 49.1, 51.0, 52.9;
    1:  49.8, 51.7, 53.7, 55.6, 57.6;
    2:  53.0, 55.0, 57.1, 59.1, 61.1;
    3:  55.6, 57.7, 59.8, 61.9, 64.0;
    4:  57.8, 59.9, 62.1, 64.3, 66.4;
    5:  59.6, 61.8, 64.0, 66.2, 68.5;
    6:  61.2, 63.5, 65.7, 68.0, 70.3;
    8:  64.0, 66.4, 68.7, 71.1, 73.5;
    10: 66.5, 69.0, 71.5, 73.9, 76.4;
    12: 68.9, 71.4, 74.0, 76.6, 79.2;
    15: 72.0, 74.8, 77.5, 80.2, 83.0;
    18: 74.9, 77.8, 80.7, 83.6, 86.5;
    21: 77.5, 80.6, 83.7, 86.7, 89.8;
    24: 80.0, 83.2, 86.4, 89.6, 92.9;
    30: 83.6, 87.1, 90.7, 94.2, 97.7;
    36: 87.4, 91.2, 95.1, 98.9, 102.7;
];

const HEAD_BOYS: &[Anchor] = anchors![
    0:  32.1, 33.2, 34.5, 35.8, 36.9;
    1:  35.1, 36.1, 37.3, 38.5, 39.5;
    2:  36.9, 37.9, 39.1, 40.3, 41.3;
    3:  38.1, 39.2, 40.5, 41.8, 42.7;
    4:  39.2, 40.3, 41.6, 42.9, 43.9;
    5:  40.1, 41.2, 42.6, 43.8, 44.8;
    6:  40.9, 42.0, 43.3, 44.6, 45.6;
    8:  42.0, 43.1, 44.5, 45.8, 46.9;
    10: 42.9, 44.0, 45.4, 46.7, 47.8;
    12: 43.5, 44.7, 46.1, 47.4, 48.5;
    15: 44.2, 45.4, 46.8, 48.2, 49.3;
    18: 44.7, 45.9, 47.4, 48.8, 49.9;
    21: 45.2, 46.4, 47.8, 49.2, 50.4;
    24: 45.5, 46.8, 48.3, 49.7, 50.8;
    30: 46.1, 47.4, 48.9, 50.3, 51.4;
    36: 46.6, 47.9, 49.5, 50.9, 52.0;
];

const HEAD_GIRLS: &[Anchor] = anchors![
    0:  31.7, 32.7, 33.9, 35.1, 36.1;
    1:  34.3, 35.3, 36.5, 37.8, 38.8;
    2:  36.0, 37.0, 38.3, 39.5, 40.5;
    3:  37.2, 38.2, 39.5, 40.8, 41.9;
    4:  38.2, 39.3, 40.6, 41.9, 43.0;
    5:  39.0, 40.1, 41.5, 42.8, 43.9;
    6:  39.7, 40.8, 42.2, 43.5, 44.6;
    8:  40.7, 41.9, 43.4, 44.8, 45.9;
    10: 41.5, 42.7, 44.2, 45.7, 46.9;
    12: 42.2, 43.4, 44.9, 46.4, 47.6;
    15: 42.9, 44.2, 45.7, 47.2, 48.4;
    18: 43.5, 44.7, 46.2, 47.7, 49.0;
    21: 43.9, 45.2, 46.7, 48.2, 49.5;
    24: 44.3, 45.6, 47.2, 48.8, 50.1;
    30: 44.9, 46.3, 47.9, 49.5, 50.8;
    36: 45.4, 46.8, 48.5, 50.1, 51.4;
];

/// Anchor table for one sex and measure.
pub fn anchor_table(sex: Sex, measure: Measure) -> &'static [Anchor] {
    match (sex, measure) {
        (Sex::Male, Measure::WeightKg) => WEIGHT_BOYS,
        (Sex::Female, Measure::WeightKg) => WEIGHT_GIRLS,
        (Sex::Male, Measure::HeightCm) => HEIGHT_BOYS,
        (Sex::Female, Measure::HeightCm) => HEIGHT_GIRLS,
        (Sex::Male, Measure::HeadCircumferenceCm) => HEAD_BOYS,
        (Sex::Female, Measure::HeadCircumferenceCm) => HEAD_GIRLS,
    }
}

/// Percentile values at an age, linearly interpolated between anchors.
/// None outside the 0-36 month range.
pub fn percentiles_at(sex: Sex, measure: Measure, age_months: f64) -> Option<PercentilePoint> {
    if !(0.0..=MAX_REFERENCE_MONTHS as f64).contains(&age_months) {
        return None;
    }

    let table = anchor_table(sex, measure);
    let upper_idx = table
        .iter()
        .position(|a| a.month as f64 >= age_months)
        .unwrap_or(table.len() - 1);

    let upper = table[upper_idx];
    if upper.month as f64 == age_months || upper_idx == 0 {
        return Some(PercentilePoint {
            age_months,
            p3: upper.p3,
            p15: upper.p15,
            p50: upper.p50,
            p85: upper.p85,
            p97: upper.p97,
        });
    }

    let lower = table[upper_idx - 1];
    let span = (upper.month - lower.month) as f64;
    let t = (age_months - lower.month as f64) / span;
    let lerp = |a: f64, b: f64| a + (b - a) * t;

    Some(PercentilePoint {
        age_months,
        p3: lerp(lower.p3, upper.p3),
        p15: lerp(lower.p15, upper.p15),
        p50: lerp(lower.p50, upper.p50),
        p85: lerp(lower.p85, upper.p85),
        p97: lerp(lower.p97, upper.p97),
    })
}

/// Which band a measured value falls into at a given age.
pub fn classify(sex: Sex, measure: Measure, age_months: f64, value: f64) -> Option<PercentileBand> {
    let p = percentiles_at(sex, measure, age_months)?;
    Some(if value < p.p3 {
        PercentileBand::BelowP3
    } else if value < p.p15 {
        PercentileBand::P3ToP15
    } else if value <= p.p85 {
        PercentileBand::P15ToP85
    } else if value <= p.p97 {
        PercentileBand::P85ToP97
    } else {
        PercentileBand::AboveP97
    })
}
