//! Credit-card invoice cycle derivation.
//!
//! Given an account's closing/due day configuration and a reference month,
//! derives the invoice's closing and due dates and classifies it as
//! closed/open and paid/pending. The current time is an injected parameter
//! so the calculator stays pure; callers pass today's date alongside the
//! aggregated bill amount and linked payment amounts they already hold.

use chrono::NaiveDate;
use tracing::trace;

use crate::dates::{add_months, clamped_date};
use crate::error::{EngineError, Result};

/// The resolved billing cycle of one reference month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceCycle {
    /// The day the invoice closes in the reference month.
    pub closing_date: NaiveDate,
    /// The payment deadline. Falls in the following month whenever the due
    /// day is numerically on or before the closing day.
    pub due_date: NaiveDate,
    /// Whether the closing date has passed.
    pub is_closed: bool,
    /// Whether nothing remains to be paid on this invoice.
    pub is_paid: bool,
    /// The outstanding amount; never negative, a credit in favor is not due.
    pub amount_due_cents: i64,
}

/// Derives the invoice cycle of `(year, month)`.
///
/// `bill_amount_cents` is the invoice balance supplied by the caller
/// (positive when something is owed). `payment_amounts_cents` are the
/// signed amounts of the payment transactions linked to this invoice;
/// their absolute values count toward settling it.
pub fn compute_cycle(
    closing_day: u32,
    due_day: u32,
    year: i32,
    month: u32,
    today: NaiveDate,
    bill_amount_cents: i64,
    payment_amounts_cents: &[i64],
) -> Result<InvoiceCycle> {
    if !(1..=31).contains(&closing_day) {
        return Err(EngineError::InvalidDay(closing_day));
    }
    if !(1..=31).contains(&due_day) {
        return Err(EngineError::InvalidDay(due_day));
    }

    let closing_date = clamped_date(year, month, closing_day)?;

    // When the due day is numerically on or before the closing day the
    // invoice closes first and is due the following month.
    let (due_year, due_month) = if due_day <= closing_day {
        add_months(year, month, 1)
    } else {
        (year, month)
    };
    let due_date = clamped_date(due_year, due_month, due_day)?;

    let is_closed = closing_date < today;
    let amount_due_cents = bill_amount_cents.max(0);
    let paid_cents: i64 = payment_amounts_cents.iter().map(|a| a.abs()).sum();
    let is_paid = bill_amount_cents <= 0 || (is_closed && paid_cents >= amount_due_cents);

    trace!(
        "Cycle {}-{:02}: closes {}, due {}, closed={}, paid={} ({} of {} cents)",
        year, month, closing_date, due_date, is_closed, is_paid, paid_cents, amount_due_cents
    );

    Ok(InvoiceCycle {
        closing_date,
        due_date,
        is_closed,
        is_paid,
        amount_due_cents,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 25).unwrap()
    }

    #[test]
    fn due_day_after_closing_day_stays_in_the_reference_month() {
        let cycle = compute_cycle(5, 20, 2024, 3, today(), 50_000, &[]).unwrap();
        assert_eq!(cycle.closing_date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(cycle.due_date, NaiveDate::from_ymd_opt(2024, 3, 20).unwrap());
    }

    #[test]
    fn due_day_on_or_before_closing_day_wraps_to_the_next_month() {
        let cycle = compute_cycle(30, 7, 2024, 3, today(), 50_000, &[]).unwrap();
        assert_eq!(cycle.closing_date, NaiveDate::from_ymd_opt(2024, 3, 30).unwrap());
        assert_eq!(cycle.due_date, NaiveDate::from_ymd_opt(2024, 4, 7).unwrap());

        let cycle = compute_cycle(20, 10, 2024, 3, today(), 50_000, &[]).unwrap();
        assert_eq!(cycle.closing_date, NaiveDate::from_ymd_opt(2024, 3, 20).unwrap());
        assert_eq!(cycle.due_date, NaiveDate::from_ymd_opt(2024, 4, 10).unwrap());
    }

    #[test]
    fn december_cycle_wraps_into_january() {
        let cycle = compute_cycle(28, 5, 2024, 12, today(), 0, &[]).unwrap();
        assert_eq!(cycle.due_date, NaiveDate::from_ymd_opt(2025, 1, 5).unwrap());
    }

    #[test]
    fn closing_day_clamps_in_short_months() {
        let cycle = compute_cycle(31, 10, 2024, 2, today(), 0, &[]).unwrap();
        assert_eq!(cycle.closing_date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(cycle.due_date, NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
    }

    #[test]
    fn closed_is_strictly_in_the_past() {
        // Closing on the 20th, today the 25th: closed.
        let closed = compute_cycle(20, 10, 2024, 3, today(), 50_000, &[]).unwrap();
        assert!(closed.is_closed);

        // Reference month in the future: open.
        let open = compute_cycle(20, 10, 2024, 4, today(), 50_000, &[]).unwrap();
        assert!(!open.is_closed);

        // Closing exactly today is not yet past.
        let today_cycle = compute_cycle(25, 10, 2024, 3, today(), 50_000, &[]).unwrap();
        assert!(!today_cycle.is_closed);
    }

    #[test]
    fn non_positive_bills_are_always_paid() {
        // Zero balance, open cycle, no payment history.
        let zero = compute_cycle(20, 10, 2024, 4, today(), 0, &[]).unwrap();
        assert!(zero.is_paid);
        assert_eq!(zero.amount_due_cents, 0);

        // Credit in favor is never due.
        let in_favor = compute_cycle(20, 10, 2024, 3, today(), -12_345, &[]).unwrap();
        assert!(in_favor.is_paid);
        assert_eq!(in_favor.amount_due_cents, 0);
    }

    #[test]
    fn closed_invoice_is_paid_once_payments_cover_the_bill() {
        let unpaid = compute_cycle(20, 10, 2024, 3, today(), 50_000, &[-20_000]).unwrap();
        assert!(unpaid.is_closed);
        assert!(!unpaid.is_paid);

        // Payment legs carry signed amounts; their absolute values settle
        // the invoice.
        let paid = compute_cycle(20, 10, 2024, 3, today(), 50_000, &[-30_000, -20_000]).unwrap();
        assert!(paid.is_paid);
    }

    #[test]
    fn open_invoice_with_a_positive_bill_is_not_paid_regardless_of_payments() {
        let cycle = compute_cycle(20, 10, 2024, 4, today(), 50_000, &[-50_000]).unwrap();
        assert!(!cycle.is_closed);
        assert!(!cycle.is_paid);
    }

    #[test]
    fn out_of_range_days_are_rejected() {
        assert!(matches!(
            compute_cycle(0, 10, 2024, 3, today(), 0, &[]),
            Err(EngineError::InvalidDay(0))
        ));
        assert!(matches!(
            compute_cycle(20, 32, 2024, 3, today(), 0, &[]),
            Err(EngineError::InvalidDay(32))
        ));
    }
}
