//! Pure domain logic for the finance tracker: expanding fixed (recurring)
//! definitions into occurrences, resolving how far edits and deletes reach
//! across a series, scheduling installment purchases, and deriving
//! credit-card invoice cycles.
//!
//! Nothing in this crate performs I/O. Every function consumes plain
//! transaction rows and configuration values supplied by the caller
//! (including "today", which is always injected) and returns plain decision
//! data for the storage layer to apply.

pub mod error;
pub mod installment;
pub mod invoice;
pub mod recurrence;
pub mod scope;

mod dates;

pub use error::{EngineError, Result};

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use model::entities::transaction::{
        Model, TransactionKind, TransactionStatus,
    };

    use crate::recurrence::generate_occurrences;
    use crate::scope::{EditScope, ScopeAction, resolve_scope};

    /// End-to-end: a day-31 definition expands with clamping, the expanded
    /// series is then trimmed with "current and remaining" while the
    /// settled principal survives.
    #[test]
    fn expand_then_trim_series_scenario() {
        let definition = Model {
            id: 1,
            description: "Gym membership".to_string(),
            amount_cents: -5_000,
            date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            kind: TransactionKind::Expense,
            status: TransactionStatus::Completed,
            account_id: 1,
            category_id: None,
            parent_transaction_id: None,
            installment_number: None,
            installment_count: None,
            is_fixed: true,
            to_account_id: None,
            linked_transaction_id: None,
        };

        let generated = generate_occurrences(&definition, &[], 2).unwrap();
        assert_eq!(generated.len(), 2);
        assert_eq!(generated[0].date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(generated[1].date, NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());
        assert!(generated.iter().all(|o| o.status == TransactionStatus::Pending));
        assert!(generated.iter().all(|o| o.parent_transaction_id == definition.id));

        // Persisted shape of the series: principal + the two children.
        let series: Vec<Model> = std::iter::once(definition.clone())
            .chain(generated.iter().enumerate().map(|(i, o)| Model {
                id: 2 + i as i32,
                description: o.description.clone(),
                amount_cents: o.amount_cents,
                date: o.date,
                kind: o.kind,
                status: o.status,
                account_id: o.account_id,
                category_id: o.category_id,
                parent_transaction_id: Some(o.parent_transaction_id),
                installment_number: None,
                installment_count: None,
                is_fixed: false,
                to_account_id: None,
                linked_transaction_id: None,
            }))
            .collect();

        // Cancel the membership from the principal onward: the settled
        // principal is detached, the pending occurrences are removed.
        let decision = resolve_scope(
            ScopeAction::Delete,
            &series[0],
            &series,
            EditScope::CurrentAndRemaining,
        );
        assert_eq!(decision.ids_to_detach, vec![1]);
        assert_eq!(decision.ids_to_delete, vec![2, 3]);
        assert!(decision.ids_to_mutate.is_empty());
    }
}
