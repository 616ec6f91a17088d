use chrono::{Datelike, NaiveDate};

/// Whole-month offset between a birth date and a later date: twelve per
/// calendar year plus the month difference, ignoring days of the month.
/// A date before birth clamps to zero.
pub fn age_in_months(birth_date: NaiveDate, on: NaiveDate) -> u32 {
    let months = (on.year() - birth_date.year()) * 12 + (on.month() as i32 - birth_date.month() as i32);
    months.max(0) as u32
}
