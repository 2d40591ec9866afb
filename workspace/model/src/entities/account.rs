use sea_orm::entity::prelude::*;

/// The kind of account
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum AccountKind {
    #[sea_orm(string_value = "Checking")]
    Checking,
    #[sea_orm(string_value = "Savings")]
    Savings,
    #[sea_orm(string_value = "Credit")]
    Credit,
    #[sea_orm(string_value = "Investment")]
    Investment,
    #[sea_orm(string_value = "MealVoucher")]
    MealVoucher,
}

/// Represents a financial account: a bank account, credit card, investment
/// account, or meal voucher card.
///
/// All monetary values are stored as signed integer cents. The balance is
/// mutated exclusively by transaction application (settling, reopening, or
/// removing completed transactions); nothing else writes to it.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    /// The kind of account
    pub kind: AccountKind,
    /// Current balance in signed cents.
    #[sea_orm(default_value = "0")]
    pub balance_cents: i64,
    /// Credit limit in cents. Only meaningful for `Credit` accounts.
    pub limit_cents: Option<i64>,
    /// Day of month (1-31) the credit-card invoice closes. Credit only.
    pub closing_day: Option<i32>,
    /// Day of month (1-31) the credit-card invoice is due. Credit only.
    pub due_day: Option<i32>,
    /// Display color as a hex string, e.g. "#3b82f6".
    pub color: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// An account has many transactions.
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transaction,
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transaction.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Whether this account carries a billing cycle configuration.
    pub fn is_credit(&self) -> bool {
        self.kind == AccountKind::Credit
    }
}
