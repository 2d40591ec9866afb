use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::NaiveDate;
use engine::recurrence::generate_occurrences;
use model::entities::transaction::{self, TransactionKind, TransactionStatus};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;

use super::{
    TransactionResponse, bad_request, db_error, normalize_amount, parse_transaction_kind,
    transaction_not_found,
};

/// Request body for creating a fixed (recurring) transaction definition
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateFixedTransactionRequest {
    /// Description copied onto every occurrence
    pub description: String,
    /// Amount in cents; the sign is derived from the kind
    pub amount_cents: i64,
    /// Transaction kind: Income or Expense (transfers cannot recur)
    pub kind: String,
    /// Date of the first occurrence; its day-of-month anchors the series
    pub date: NaiveDate,
    /// Account ID
    pub account_id: i32,
    /// Optional category ID
    pub category_id: Option<i32>,
}

/// Request body for generating occurrences of a fixed definition
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct GenerateOccurrencesRequest {
    /// Number of months to materialize (default: 12)
    pub months: Option<u32>,
}

/// Create a fixed (recurring) transaction definition
///
/// The definition is itself the first occurrence of the series and the
/// principal every generated occurrence links back to.
#[utoipa::path(
    post,
    path = "/api/v1/fixed",
    tag = "fixed-transactions",
    request_body = CreateFixedTransactionRequest,
    responses(
        (status = 201, description = "Fixed transaction created successfully", body = ApiResponse<TransactionResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn create_fixed_transaction(
    State(state): State<AppState>,
    Json(request): Json<CreateFixedTransactionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TransactionResponse>>), (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering create_fixed_transaction function");
    debug!(
        "Creating fixed transaction '{}' anchored to day {}",
        request.description,
        request.date
    );

    let kind = parse_transaction_kind(&request.kind)
        .map_err(|e| bad_request(e, "INVALID_KIND"))?;
    if kind == TransactionKind::Transfer {
        return Err(bad_request(
            "Transfers cannot be fixed transactions".to_string(),
            "INVALID_KIND",
        ));
    }

    let row = transaction::ActiveModel {
        description: Set(request.description.clone()),
        amount_cents: Set(normalize_amount(kind, request.amount_cents)),
        date: Set(request.date),
        kind: Set(kind),
        status: Set(TransactionStatus::Pending),
        account_id: Set(request.account_id),
        category_id: Set(request.category_id),
        is_fixed: Set(true),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(|e| {
        error!("Failed to insert fixed transaction: {}", e);
        db_error("Failed to create fixed transaction")
    })?;

    info!("Fixed transaction created successfully with ID: {}", row.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: TransactionResponse::from(row),
            message: "Fixed transaction created successfully".to_string(),
            success: true,
        }),
    ))
}

/// Get all fixed transaction definitions
#[utoipa::path(
    get,
    path = "/api/v1/fixed",
    tag = "fixed-transactions",
    responses(
        (status = 200, description = "Fixed transactions retrieved successfully", body = ApiResponse<Vec<TransactionResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_fixed_transactions(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<TransactionResponse>>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering get_fixed_transactions function");

    match transaction::Entity::find()
        .filter(transaction::Column::IsFixed.eq(true))
        .order_by_asc(transaction::Column::Date)
        .all(&state.db)
        .await
    {
        Ok(rows) => {
            info!("Successfully retrieved {} fixed transactions", rows.len());
            Ok(Json(ApiResponse {
                data: rows.into_iter().map(TransactionResponse::from).collect(),
                message: "Fixed transactions retrieved successfully".to_string(),
                success: true,
            }))
        }
        Err(e) => {
            error!("Failed to retrieve fixed transactions: {}", e);
            Err(db_error("Failed to retrieve fixed transactions"))
        }
    }
}

/// Generate the next occurrences of a fixed definition
///
/// Expands the definition by the requested number of months (default 12),
/// one pending row per calendar month, resuming after the latest already
/// generated occurrence. The sibling lookup and the inserts share one
/// database transaction, so repeating the call cannot duplicate a month.
#[utoipa::path(
    post,
    path = "/api/v1/fixed/{transaction_id}/generate",
    tag = "fixed-transactions",
    request_body = GenerateOccurrencesRequest,
    params(
        ("transaction_id" = i32, Path, description = "Fixed definition ID"),
    ),
    responses(
        (status = 201, description = "Occurrences generated successfully", body = ApiResponse<Vec<TransactionResponse>>),
        (status = 400, description = "Transaction is not a fixed definition", body = ErrorResponse),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn generate_fixed_occurrences(
    Path(transaction_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<GenerateOccurrencesRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<TransactionResponse>>>), (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering generate_fixed_occurrences function");

    let months = request.months.unwrap_or(12);
    debug!(
        "Generating {} months of occurrences for definition {}",
        months, transaction_id
    );

    let definition = match transaction::Entity::find_by_id(transaction_id).one(&state.db).await {
        Ok(Some(row)) => row,
        Ok(None) => {
            warn!("Transaction with ID {} not found", transaction_id);
            return Err(transaction_not_found(transaction_id));
        }
        Err(e) => {
            error!("Failed to retrieve transaction {}: {}", transaction_id, e);
            return Err(db_error("Failed to retrieve transaction"));
        }
    };

    if !definition.is_fixed {
        warn!(
            "Transaction {} is not a fixed definition, refusing to generate",
            transaction_id
        );
        return Err(bad_request(
            format!("Transaction {} is not a fixed definition", transaction_id),
            "NOT_A_FIXED_TRANSACTION",
        ));
    }

    let txn = state.db.begin().await.map_err(|e| {
        error!("Failed to open database transaction: {}", e);
        db_error("Failed to generate occurrences")
    })?;

    let children = transaction::Entity::find()
        .filter(transaction::Column::ParentTransactionId.eq(definition.id))
        .all(&txn)
        .await
        .map_err(|e| {
            error!("Failed to fetch existing occurrences: {}", e);
            db_error("Failed to generate occurrences")
        })?;

    let occurrences = generate_occurrences(&definition, &children, months).map_err(|e| {
        error!("Occurrence generation failed: {}", e);
        bad_request(e.to_string(), "GENERATION_FAILED")
    })?;

    let mut created = Vec::with_capacity(occurrences.len());
    for occurrence in occurrences {
        let row = transaction::ActiveModel {
            description: Set(occurrence.description),
            amount_cents: Set(occurrence.amount_cents),
            date: Set(occurrence.date),
            kind: Set(occurrence.kind),
            status: Set(occurrence.status),
            account_id: Set(occurrence.account_id),
            category_id: Set(occurrence.category_id),
            parent_transaction_id: Set(Some(occurrence.parent_transaction_id)),
            is_fixed: Set(false),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| {
            error!("Failed to insert generated occurrence: {}", e);
            db_error("Failed to generate occurrences")
        })?;
        created.push(row);
    }

    txn.commit().await.map_err(|e| {
        error!("Failed to commit generated occurrences: {}", e);
        db_error("Failed to generate occurrences")
    })?;

    info!(
        "Generated {} occurrences for definition {}",
        created.len(),
        transaction_id
    );
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: created.into_iter().map(TransactionResponse::from).collect(),
            message: "Occurrences generated successfully".to_string(),
            success: true,
        }),
    ))
}
