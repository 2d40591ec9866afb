use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{extract::State, http::StatusCode, response::Json};
use chrono::NaiveDate;
use engine::installment::{installment_dates, split_installments};
use model::entities::transaction::{self, TransactionKind, TransactionStatus};
use sea_orm::{ActiveModelTrait, Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace};
use utoipa::ToSchema;

use super::{TransactionResponse, bad_request, db_error};

/// Request body for creating an installment purchase
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateInstallmentRequest {
    /// Description; each row is suffixed with its position, e.g. "(2/6)"
    pub description: String,
    /// Total purchase amount in cents; stored as an expense
    pub total_cents: i64,
    /// Number of monthly installments
    pub installments: u32,
    /// Date of the first installment; its day-of-month anchors the series
    pub first_date: NaiveDate,
    /// Account ID (typically a credit account)
    pub account_id: i32,
    /// Optional category ID
    pub category_id: Option<i32>,
}

/// Create an installment purchase
///
/// Splits the total into per-month cent amounts that sum exactly to it and
/// inserts the whole series in one database transaction. The first row is
/// the principal; the remaining rows link back to it.
#[utoipa::path(
    post,
    path = "/api/v1/installments",
    tag = "transactions",
    request_body = CreateInstallmentRequest,
    responses(
        (status = 201, description = "Installment purchase created successfully", body = ApiResponse<Vec<TransactionResponse>>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn create_installment_purchase(
    State(state): State<AppState>,
    Json(request): Json<CreateInstallmentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<TransactionResponse>>>), (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering create_installment_purchase function");
    debug!(
        "Creating installment purchase '{}': {} cents over {} months",
        request.description, request.total_cents, request.installments
    );

    // Installment purchases are expenses; store the total negative.
    let total_cents = -request.total_cents.abs();

    let amounts = split_installments(total_cents, request.installments)
        .map_err(|e| bad_request(e.to_string(), "INVALID_INSTALLMENTS"))?;
    let dates = installment_dates(request.first_date, request.installments)
        .map_err(|e| bad_request(e.to_string(), "INVALID_INSTALLMENTS"))?;

    let count = request.installments as i32;

    let txn = state.db.begin().await.map_err(|e| {
        error!("Failed to open database transaction: {}", e);
        db_error("Failed to create installment purchase")
    })?;

    let mut created: Vec<transaction::Model> = Vec::with_capacity(amounts.len());
    let mut principal_id: Option<i32> = None;
    for (index, (amount_cents, date)) in amounts.into_iter().zip(dates).enumerate() {
        let number = index as i32 + 1;
        let row = transaction::ActiveModel {
            description: Set(format!("{} ({}/{})", request.description, number, count)),
            amount_cents: Set(amount_cents),
            date: Set(date),
            kind: Set(TransactionKind::Expense),
            status: Set(TransactionStatus::Pending),
            account_id: Set(request.account_id),
            category_id: Set(request.category_id),
            parent_transaction_id: Set(principal_id),
            installment_number: Set(Some(number)),
            installment_count: Set(Some(count)),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| {
            error!("Failed to insert installment {}: {}", number, e);
            db_error("Failed to create installment purchase")
        })?;

        if principal_id.is_none() {
            principal_id = Some(row.id);
        }
        created.push(row);
    }

    txn.commit().await.map_err(|e| {
        error!("Failed to commit installment purchase: {}", e);
        db_error("Failed to create installment purchase")
    })?;

    info!(
        "Installment purchase created: {} rows, principal {}",
        created.len(),
        principal_id.unwrap_or_default()
    );
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: created.into_iter().map(TransactionResponse::from).collect(),
            message: "Installment purchase created successfully".to_string(),
            success: true,
        }),
    ))
}
