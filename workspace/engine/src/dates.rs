//! Calendar helpers shared by the expander, the installment scheduler, and
//! the invoice calculator.

use chrono::{Datelike, NaiveDate};

use crate::error::{EngineError, Result};

/// Advances a (year, month) pair by `delta` calendar months.
pub(crate) fn add_months(year: i32, month: u32, delta: u32) -> (i32, u32) {
    let zero_based = (month - 1) + delta;
    (year + (zero_based / 12) as i32, zero_based % 12 + 1)
}

/// Number of days in the given month.
pub(crate) fn days_in_month(year: i32, month: u32) -> Result<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| EngineError::Date(format!("invalid month {}-{:02}", year, month)))?;
    let (next_year, next_month) = add_months(year, month, 1);
    let next_first = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .ok_or_else(|| EngineError::Date(format!("invalid month {}-{:02}", next_year, next_month)))?;
    Ok(next_first.signed_duration_since(first).num_days() as u32)
}

/// Builds a date in the given month, clamping the day to the month's last
/// day when the month is shorter. Clamping never rolls over into the next
/// month: a day-31 target in April yields April 30.
pub(crate) fn clamped_date(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    let last = days_in_month(year, month)?;
    let day = day.min(last);
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| EngineError::Date(format!("invalid date {}-{:02}-{:02}", year, month, day)))
}

/// The date `delta` months after `anchor`, keeping `anchor`'s day-of-month
/// with end-of-month clamping.
pub(crate) fn months_after(anchor: NaiveDate, delta: u32, day: u32) -> Result<NaiveDate> {
    let (year, month) = add_months(anchor.year(), anchor.month(), delta);
    clamped_date(year, month, day)
}
