//! Expansion of fixed (recurring) definitions into concrete occurrences.
//!
//! A fixed definition is itself a transaction row (`is_fixed = true`) whose
//! date fixes the day-of-month of the whole series. Expansion materializes
//! the next `month_count` months as pending rows linked to the definition.
//! The starting month is always derived from the latest existing child, so
//! repeated expansion without new data never covers a month twice.

use chrono::{Datelike, NaiveDate};
use model::entities::transaction::{
    Model as Transaction, TransactionKind, TransactionStatus,
};
use tracing::{debug, trace};

use crate::dates::months_after;
use crate::error::{EngineError, Result};

/// A concrete occurrence to be inserted by the storage layer. Plain data;
/// ids are assigned on insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOccurrence {
    pub description: String,
    pub amount_cents: i64,
    pub date: NaiveDate,
    pub kind: TransactionKind,
    pub status: TransactionStatus,
    pub account_id: i32,
    pub category_id: Option<i32>,
    pub parent_transaction_id: i32,
}

/// Materializes the next `month_count` monthly occurrences of `definition`.
///
/// Each step advances one calendar month from the anchor (the latest
/// existing child, or the definition itself when none exist), targeting the
/// definition's original day-of-month and clamping to the last day of
/// shorter months. Generated rows are pending, non-fixed, and linked to the
/// definition.
pub fn generate_occurrences(
    definition: &Transaction,
    existing_children: &[Transaction],
    month_count: u32,
) -> Result<Vec<NewOccurrence>> {
    if !definition.is_fixed {
        return Err(EngineError::NotADefinition(definition.id));
    }

    // The day the series is anchored to, taken from the definition even
    // when the latest child was clamped into a shorter month.
    let anchor_day = definition.date.day();

    let anchor = existing_children
        .iter()
        .filter(|child| child.parent_transaction_id == Some(definition.id))
        .map(|child| child.date)
        .max()
        .unwrap_or(definition.date);

    trace!(
        "Expanding definition {} from anchor {} for {} months",
        definition.id, anchor, month_count
    );

    let mut occurrences = Vec::with_capacity(month_count as usize);
    for step in 1..=month_count {
        let date = months_after(anchor, step, anchor_day)?;
        occurrences.push(NewOccurrence {
            description: definition.description.clone(),
            amount_cents: definition.amount_cents,
            date,
            kind: definition.kind,
            status: TransactionStatus::Pending,
            account_id: definition.account_id,
            category_id: definition.category_id,
            parent_transaction_id: definition.id,
        });
    }

    debug!(
        "Definition {} expanded into {} occurrences ending {}",
        definition.id,
        occurrences.len(),
        occurrences.last().map(|o| o.date).unwrap_or(anchor)
    );
    Ok(occurrences)
}
