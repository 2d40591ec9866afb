//! Installment purchase scheduling.
//!
//! An installment purchase becomes `count` transaction rows: the first is
//! the principal of the series, the rest link back to it. The per-row
//! amounts are integer cents that sum exactly to the purchase total, and
//! the dates advance monthly with the same end-of-month clamping the
//! recurrence expander uses.

use chrono::{Datelike, NaiveDate};
use tracing::trace;

use crate::dates::months_after;
use crate::error::{EngineError, Result};

/// Splits a signed cent total into `count` parts that sum exactly to the
/// total. Remainder cents land on the earliest installments, so a 10000
/// cent purchase in 3 parts becomes 3334 + 3333 + 3333.
pub fn split_installments(total_cents: i64, count: u32) -> Result<Vec<i64>> {
    if count == 0 {
        return Err(EngineError::InvalidInstallmentCount(count));
    }

    let sign = if total_cents < 0 { -1 } else { 1 };
    let magnitude = total_cents.abs();
    let base = magnitude / count as i64;
    let remainder = magnitude % count as i64;

    let parts: Vec<i64> = (0..count as i64)
        .map(|i| sign * (base + if i < remainder { 1 } else { 0 }))
        .collect();

    trace!(
        "Split {} cents into {} installments of base {}",
        total_cents, count, sign * base
    );
    Ok(parts)
}

/// The due dates of an installment series: the purchase date itself, then
/// one calendar month per installment, anchored to the purchase
/// day-of-month with end-of-month clamping.
pub fn installment_dates(first_date: NaiveDate, count: u32) -> Result<Vec<NaiveDate>> {
    if count == 0 {
        return Err(EngineError::InvalidInstallmentCount(count));
    }

    let anchor_day = first_date.day();
    let mut dates = Vec::with_capacity(count as usize);
    dates.push(first_date);
    for step in 1..count {
        dates.push(months_after(first_date, step, anchor_day)?);
    }
    Ok(dates)
}
