use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The total spent in one category over the summarized month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CategoryTotal {
    /// `None` collects uncategorized transactions.
    pub category_id: Option<i32>,
    pub category_name: Option<String>,
    /// Signed cents; expenses are negative.
    pub total_cents: i64,
}

/// One account's settled activity for a calendar month, plus what is still
/// pending. All amounts are signed integer cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MonthlySummary {
    pub account_id: i32,
    pub year: i32,
    pub month: u32,
    /// Settled income (positive).
    pub income_cents: i64,
    /// Settled expenses (negative).
    pub expense_cents: i64,
    /// `income_cents + expense_cents`.
    pub net_cents: i64,
    /// Signed sum of rows still pending in the month.
    pub pending_cents: i64,
    /// Settled activity grouped by category.
    pub by_category: Vec<CategoryTotal>,
}
