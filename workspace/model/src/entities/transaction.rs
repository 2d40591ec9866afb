use chrono::NaiveDate;
use sea_orm::entity::prelude::*;

use super::{account, category};

/// Direction of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum TransactionKind {
    #[sea_orm(string_value = "Income")]
    Income,
    #[sea_orm(string_value = "Expense")]
    Expense,
    #[sea_orm(string_value = "Transfer")]
    Transfer,
}

/// Settlement state of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum TransactionStatus {
    #[sea_orm(string_value = "Pending")]
    Pending, // Expected but not yet settled against the account balance.
    #[sea_orm(string_value = "Completed")]
    Completed, // Settled; its amount has been applied to the account balance.
}

/// A single transaction row.
///
/// This one table holds every shape the tracker knows about:
/// - plain one-off income/expense rows,
/// - fixed (recurring) definitions (`is_fixed = true`) and the occurrences
///   generated from them (`parent_transaction_id` set),
/// - installment purchases (`installment_number` / `installment_count`),
/// - transfer legs (`to_account_id` / `linked_transaction_id`).
///
/// Amounts are signed integer cents: positive for income, negative for
/// expense. This convention holds at rest and at every boundary.
///
/// A row whose id is referenced by other rows' `parent_transaction_id` is
/// the *principal* of its series and is itself a legitimate occurrence.
/// The parent link is intentionally not backed by a foreign key: deleting a
/// principal while keeping settled children is a supported outcome, and a
/// dangling parent id is handled as "no siblings" by the scope logic.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub description: String,
    /// Signed amount in cents. Positive income, negative expense.
    pub amount_cents: i64,
    /// Due date (pending) or settlement date (completed).
    pub date: NaiveDate,
    pub kind: TransactionKind,
    pub status: TransactionStatus,
    /// The account this row belongs to.
    pub account_id: i32,
    pub category_id: Option<i32>,
    /// Link to the principal row of a recurring/installment series.
    pub parent_transaction_id: Option<i32>,
    /// 1-based position within an installment series.
    pub installment_number: Option<i32>,
    /// Total number of installments in the series. Stable across the series.
    pub installment_count: Option<i32>,
    /// Marks a fixed (recurring) definition. Cleared when a settled
    /// principal is detached from its series instead of deleted.
    #[sea_orm(default_value = "false")]
    pub is_fixed: bool,
    /// Destination account for transfers.
    pub to_account_id: Option<i32>,
    /// The opposite leg of a transfer pair.
    pub linked_transaction_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "account::Entity",
        from = "Column::AccountId",
        to = "account::Column::Id",
        on_delete = "Cascade"
    )]
    Account,
    #[sea_orm(
        belongs_to = "account::Entity",
        from = "Column::ToAccountId",
        to = "account::Column::Id",
        on_delete = "SetNull"
    )]
    ToAccount,
    #[sea_orm(
        belongs_to = "category::Entity",
        from = "Column::CategoryId",
        to = "category::Column::Id",
        on_delete = "SetNull"
    )]
    Category,
    /// Occurrences point at the principal row of their series.
    #[sea_orm(belongs_to = "Entity", from = "Column::ParentTransactionId", to = "Column::Id")]
    Parent,
}

impl Related<account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl Related<category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Transfer legs are excluded from recurrence and scope logic.
    pub fn is_transfer_like(&self) -> bool {
        self.to_account_id.is_some() || self.linked_transaction_id.is_some()
    }

    /// Whether this row participates in a recurring/installment series,
    /// either as the principal or as a generated occurrence.
    pub fn is_series_member(&self) -> bool {
        self.parent_transaction_id.is_some()
            || self.is_fixed
            || self.installment_number.is_some()
    }

    /// Whether this row is the principal (defining/first) row of its series.
    pub fn is_principal(&self) -> bool {
        self.parent_transaction_id.is_none()
    }

    /// The id of the principal row of this row's series (its own id when it
    /// is the principal).
    pub fn series_parent_id(&self) -> i32 {
        self.parent_transaction_id.unwrap_or(self.id)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn row(id: i32) -> Model {
        Model {
            id,
            description: "Rent".to_string(),
            amount_cents: -150_000,
            date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            kind: TransactionKind::Expense,
            status: TransactionStatus::Pending,
            account_id: 1,
            category_id: None,
            parent_transaction_id: None,
            installment_number: None,
            installment_count: None,
            is_fixed: false,
            to_account_id: None,
            linked_transaction_id: None,
        }
    }

    #[test]
    fn plain_row_is_not_a_series_member() {
        let tx = row(1);
        assert!(!tx.is_series_member());
        assert!(tx.is_principal());
        assert_eq!(tx.series_parent_id(), 1);
    }

    #[test]
    fn fixed_definition_is_its_own_principal() {
        let mut tx = row(7);
        tx.is_fixed = true;
        assert!(tx.is_series_member());
        assert!(tx.is_principal());
        assert_eq!(tx.series_parent_id(), 7);
    }

    #[test]
    fn occurrence_points_at_its_principal() {
        let mut tx = row(9);
        tx.parent_transaction_id = Some(7);
        assert!(tx.is_series_member());
        assert!(!tx.is_principal());
        assert_eq!(tx.series_parent_id(), 7);
    }

    #[test]
    fn transfer_legs_are_transfer_like() {
        let mut out_leg = row(2);
        out_leg.to_account_id = Some(3);
        assert!(out_leg.is_transfer_like());

        let mut in_leg = row(3);
        in_leg.linked_transaction_id = Some(2);
        assert!(in_leg.is_transfer_like());

        assert!(!row(4).is_transfer_like());
    }
}
