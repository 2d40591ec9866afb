//! Edit/delete scope resolution for recurring and installment series.
//!
//! A user acts on one occurrence of a series and picks how far the action
//! reaches: just that occurrence, that occurrence and the remaining pending
//! ones, or the whole series. This module turns that choice into the exact
//! row sets the storage layer must mutate, delete, or detach. It performs
//! no I/O: the caller fetches the sibling set (all rows of the series,
//! principal included) and applies the returned decision.
//!
//! A dangling parent link (the target references a principal that no longer
//! exists) is a recoverable condition: callers pass an empty sibling set
//! and resolution degrades to the target row alone.

use std::str::FromStr;

use model::entities::transaction::{Model as Transaction, TransactionStatus};
use tracing::trace;

/// What the user is doing to the target occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeAction {
    Edit,
    Delete,
}

/// How far an edit/delete action reaches across an occurrence series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditScope {
    /// Only the selected occurrence.
    Current,
    /// The selected occurrence plus every pending sibling that falls on or
    /// after it.
    CurrentAndRemaining,
    /// Every row of the series, settled rows included.
    All,
}

impl EditScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditScope::Current => "current",
            EditScope::CurrentAndRemaining => "current-and-remaining",
            EditScope::All => "all",
        }
    }
}

impl FromStr for EditScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "current" => Ok(EditScope::Current),
            "current-and-remaining" => Ok(EditScope::CurrentAndRemaining),
            "all" => Ok(EditScope::All),
            other => Err(format!(
                "Invalid scope '{}'. Valid values: current, current-and-remaining, all",
                other
            )),
        }
    }
}

/// The row sets a scope action resolves to. Plain data consumed by the
/// storage layer; ids are emitted in deterministic (date, id) series order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeDecision {
    /// Rows that receive the edit.
    pub ids_to_mutate: Vec<i32>,
    /// Rows removed from storage.
    pub ids_to_delete: Vec<i32>,
    /// Settled principals that stay in history with `is_fixed` cleared
    /// instead of being deleted.
    pub ids_to_detach: Vec<i32>,
}

impl ScopeDecision {
    fn single(action: ScopeAction, id: i32) -> Self {
        match action {
            ScopeAction::Edit => Self {
                ids_to_mutate: vec![id],
                ..Default::default()
            },
            ScopeAction::Delete => Self {
                ids_to_delete: vec![id],
                ..Default::default()
            },
        }
    }

    /// Total number of rows touched by this decision.
    pub fn affected_count(&self) -> usize {
        self.ids_to_mutate.len() + self.ids_to_delete.len() + self.ids_to_detach.len()
    }
}

/// Resolves which rows of a series an action under the given scope touches.
///
/// `siblings` is the series as fetched by parent id. The target itself and
/// transfer-like rows are ignored if present, so callers do not need to
/// pre-filter.
pub fn resolve_scope(
    action: ScopeAction,
    target: &Transaction,
    siblings: &[Transaction],
    scope: EditScope,
) -> ScopeDecision {
    // Rows outside series semantics resolve to the target alone, without
    // ever consulting siblings.
    if target.is_transfer_like() || !target.is_series_member() {
        trace!(
            "Target {} is not a series member, resolving to identity",
            target.id
        );
        return ScopeDecision::single(action, target.id);
    }

    let mut affected: Vec<&Transaction> = vec![target];
    for sibling in siblings {
        if sibling.id == target.id || sibling.is_transfer_like() {
            continue;
        }
        let included = match scope {
            EditScope::Current => false,
            EditScope::CurrentAndRemaining => {
                sibling.status == TransactionStatus::Pending && is_remaining(sibling, target)
            }
            EditScope::All => true,
        };
        if included {
            affected.push(sibling);
        }
    }

    // Ties on date break by id so "current and remaining" stays
    // deterministic for same-day series.
    affected.sort_by_key(|row| (row.date, row.id));

    let mut decision = ScopeDecision::default();
    for row in affected {
        match action {
            ScopeAction::Edit => decision.ids_to_mutate.push(row.id),
            ScopeAction::Delete => {
                let preserve_principal = row.is_principal()
                    && scope != EditScope::All
                    && row.status == TransactionStatus::Completed;
                if preserve_principal {
                    decision.ids_to_detach.push(row.id);
                } else {
                    decision.ids_to_delete.push(row.id);
                }
            }
        }
    }

    trace!(
        "Resolved scope {} on transaction {}: {} mutated, {} deleted, {} detached",
        scope.as_str(),
        target.id,
        decision.ids_to_mutate.len(),
        decision.ids_to_delete.len(),
        decision.ids_to_detach.len()
    );
    decision
}

/// Whether `sibling` falls on or after `target` within the series.
/// Installment series compare by installment position; everything else
/// compares by date.
fn is_remaining(sibling: &Transaction, target: &Transaction) -> bool {
    match (sibling.installment_number, target.installment_number) {
        (Some(s), Some(t)) => s >= t,
        _ => sibling.date >= target.date,
    }
}
