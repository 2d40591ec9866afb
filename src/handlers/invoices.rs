use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::{Datelike, NaiveDate, Utc};
use engine::invoice::compute_cycle;
use model::entities::{account, transaction};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument, trace, warn};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::transactions::{bad_request, db_error};

/// Query parameters for the invoice endpoint
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
pub struct InvoiceQuery {
    /// Reference year (default: current year)
    pub year: Option<i32>,
    /// Reference month 1-12 (default: current month)
    #[validate(range(min = 1, max = 12))]
    pub month: Option<u32>,
}

/// One credit-card invoice cycle, resolved for a reference month
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InvoiceResponse {
    pub account_id: i32,
    pub year: i32,
    pub month: u32,
    /// The day this invoice closes
    pub closing_date: NaiveDate,
    /// The payment deadline; next month when the due day precedes closing
    pub due_date: NaiveDate,
    /// Whether the closing date has passed
    pub is_closed: bool,
    /// Whether nothing remains to be paid
    pub is_paid: bool,
    /// Outstanding amount in cents, never negative
    pub amount_due_cents: i64,
    /// Sum of the cycle's purchases (and refunds) in cents
    pub bill_cents: i64,
    /// Sum of linked payments credited against this invoice, in cents
    pub payments_cents: i64,
}

/// Get the invoice cycle of a credit account for a reference month
///
/// The bill aggregates the account's purchases dated after the previous
/// closing date up to this cycle's closing date. Payments are the incoming
/// transfer legs on the account between closing and due date.
#[utoipa::path(
    get,
    path = "/api/v1/accounts/{account_id}/invoice",
    tag = "invoices",
    params(
        ("account_id" = i32, Path, description = "Account ID"),
        InvoiceQuery,
    ),
    responses(
        (status = 200, description = "Invoice cycle retrieved successfully", body = ApiResponse<InvoiceResponse>),
        (status = 400, description = "Not a credit account", body = ErrorResponse),
        (status = 404, description = "Account not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_account_invoice(
    Path(account_id): Path<i32>,
    Valid(Query(query)): Valid<Query<InvoiceQuery>>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<InvoiceResponse>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering get_account_invoice function");

    let account_model = match account::Entity::find_by_id(account_id).one(&state.db).await {
        Ok(Some(model)) => model,
        Ok(None) => {
            warn!("Account with ID {} not found", account_id);
            return Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Account with id {} does not exist", account_id),
                    code: "ACCOUNT_NOT_FOUND".to_string(),
                    success: false,
                }),
            ));
        }
        Err(e) => {
            error!("Failed to retrieve account {}: {}", account_id, e);
            return Err(db_error("Failed to retrieve account"));
        }
    };

    if !account_model.is_credit() {
        warn!("Account {} is not a credit account", account_id);
        return Err(bad_request(
            format!("Account {} is not a credit account", account_id),
            "NOT_A_CREDIT_ACCOUNT",
        ));
    }

    let today = Utc::now().date_naive();
    let year = query.year.unwrap_or_else(|| today.year());
    let month = query.month.unwrap_or_else(|| today.month());

    // Unconfigured cycle days fall back to the 1st.
    let closing_day = account_model.closing_day.unwrap_or(1) as u32;
    let due_day = account_model.due_day.unwrap_or(1) as u32;

    debug!(
        "Resolving invoice for account {} in {}-{:02} (closing day {}, due day {})",
        account_id, year, month, closing_day, due_day
    );

    // First pass with an empty bill fixes the cycle boundaries; the
    // previous cycle's closing date opens this cycle's purchase window.
    let boundaries = compute_cycle(closing_day, due_day, year, month, today, 0, &[])
        .map_err(|e| bad_request(e.to_string(), "INVALID_CYCLE_DAYS"))?;
    let (prev_year, prev_month) = if month == 1 { (year - 1, 12) } else { (year, month - 1) };
    let previous = compute_cycle(closing_day, due_day, prev_year, prev_month, today, 0, &[])
        .map_err(|e| bad_request(e.to_string(), "INVALID_CYCLE_DAYS"))?;

    let rows = transaction::Entity::find()
        .filter(transaction::Column::AccountId.eq(account_id))
        .filter(transaction::Column::Date.gt(previous.closing_date))
        .filter(transaction::Column::Date.lte(boundaries.due_date))
        .all(&state.db)
        .await
        .map_err(|e| {
            error!("Failed to fetch account transactions: {}", e);
            db_error("Failed to compute invoice")
        })?;

    // Purchases and refunds within the cycle window make up the bill;
    // expenses are negative at rest, so the bill flips the sign.
    let bill_cents: i64 = rows
        .iter()
        .filter(|row| !row.is_transfer_like() && row.date <= boundaries.closing_date)
        .map(|row| -row.amount_cents)
        .sum();

    // Incoming transfer legs after closing are payments toward the invoice.
    let payments: Vec<i64> = rows
        .iter()
        .filter(|row| {
            row.is_transfer_like() && row.amount_cents > 0 && row.date > boundaries.closing_date
        })
        .map(|row| row.amount_cents)
        .collect();

    let cycle = compute_cycle(
        closing_day,
        due_day,
        year,
        month,
        today,
        bill_cents,
        &payments,
    )
    .map_err(|e| bad_request(e.to_string(), "INVALID_CYCLE_DAYS"))?;

    let payments_cents: i64 = payments.iter().map(|a| a.abs()).sum();

    debug!(
        "Invoice for account {} {}-{:02}: bill {} cents, payments {} cents, closed={}, paid={}",
        account_id, year, month, bill_cents, payments_cents, cycle.is_closed, cycle.is_paid
    );

    Ok(Json(ApiResponse {
        data: InvoiceResponse {
            account_id,
            year,
            month,
            closing_date: cycle.closing_date,
            due_date: cycle.due_date,
            is_closed: cycle.is_closed,
            is_paid: cycle.is_paid,
            amount_due_cents: cycle.amount_due_cents,
            bill_cents,
            payments_cents,
        },
        message: "Invoice cycle retrieved successfully".to_string(),
        success: true,
    }))
}
