use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::NaiveDate;
use engine::scope::{EditScope, ScopeAction, ScopeDecision, resolve_scope};
use model::entities::{account, transaction};
use model::entities::transaction::{TransactionKind, TransactionStatus};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

pub mod fixed;
pub mod installments;

/// Request body for creating a transaction.
///
/// Amounts are normalized at this boundary: income rows are stored
/// positive, expense rows negative, whatever sign the client sent. A
/// `Transfer` kind additionally requires `to_account_id` and produces two
/// linked rows, one leg per account.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateTransactionRequest {
    /// Transaction description
    pub description: String,
    /// Amount in cents; the sign is derived from the kind
    pub amount_cents: i64,
    /// Due date (pending) or settlement date (completed)
    pub date: NaiveDate,
    /// Transaction kind: Income, Expense or Transfer
    pub kind: String,
    /// Transaction status: Pending (default) or Completed
    pub status: Option<String>,
    /// Account ID
    pub account_id: i32,
    /// Optional category ID
    pub category_id: Option<i32>,
    /// Destination account for transfers
    pub to_account_id: Option<i32>,
}

/// Request body for updating a transaction (optionally across its series,
/// see the `scope` query parameter).
///
/// The date only ever applies to the targeted row; bulk-moving a whole
/// series onto one date is never what the user means.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateTransactionRequest {
    /// Transaction description
    pub description: Option<String>,
    /// Amount in cents; the sign is derived from each row's kind
    pub amount_cents: Option<i64>,
    /// New date for the targeted row
    pub date: Option<NaiveDate>,
    /// Category ID
    pub category_id: Option<i32>,
}

/// Query parameters for listing transactions
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
pub struct TransactionQuery {
    /// Page number (default: 1)
    #[validate(range(min = 1, max = 10000))]
    pub page: Option<u64>,
    /// Page size (default: 100)
    #[validate(range(min = 1, max = 1000))]
    pub limit: Option<u64>,
    /// Filter by account ID
    pub account_id: Option<i32>,
    /// Filter by status
    pub status: Option<String>,
    /// Filter by series principal ID
    pub parent_transaction_id: Option<i32>,
}

/// Query parameter selecting how far an edit/delete reaches across a
/// recurring/installment series.
#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct ScopeQuery {
    /// One of: current (default), current-and-remaining, all
    pub scope: Option<String>,
}

/// Transaction response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TransactionResponse {
    pub id: i32,
    pub description: String,
    pub amount_cents: i64,
    pub date: NaiveDate,
    pub kind: String,
    pub status: String,
    pub account_id: i32,
    pub category_id: Option<i32>,
    pub parent_transaction_id: Option<i32>,
    pub installment_number: Option<i32>,
    pub installment_count: Option<i32>,
    pub is_fixed: bool,
    pub to_account_id: Option<i32>,
    pub linked_transaction_id: Option<i32>,
}

impl From<transaction::Model> for TransactionResponse {
    fn from(model: transaction::Model) -> Self {
        Self {
            id: model.id,
            description: model.description,
            amount_cents: model.amount_cents,
            date: model.date,
            kind: kind_to_string(model.kind),
            status: status_to_string(model.status),
            account_id: model.account_id,
            category_id: model.category_id,
            parent_transaction_id: model.parent_transaction_id,
            installment_number: model.installment_number,
            installment_count: model.installment_count,
            is_fixed: model.is_fixed,
            to_account_id: model.to_account_id,
            linked_transaction_id: model.linked_transaction_id,
        }
    }
}

/// The row sets a scoped action ended up touching, echoed back so the UI
/// can refresh exactly what changed.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ScopeOutcomeResponse {
    /// Rows that received the edit
    pub mutated: Vec<i32>,
    /// Rows removed from storage
    pub deleted: Vec<i32>,
    /// Settled principals kept in history with `is_fixed` cleared
    pub detached: Vec<i32>,
}

impl From<ScopeDecision> for ScopeOutcomeResponse {
    fn from(decision: ScopeDecision) -> Self {
        Self {
            mutated: decision.ids_to_mutate,
            deleted: decision.ids_to_delete,
            detached: decision.ids_to_detach,
        }
    }
}

pub(crate) fn kind_to_string(kind: TransactionKind) -> String {
    match kind {
        TransactionKind::Income => "Income",
        TransactionKind::Expense => "Expense",
        TransactionKind::Transfer => "Transfer",
    }
    .to_string()
}

pub(crate) fn status_to_string(status: TransactionStatus) -> String {
    match status {
        TransactionStatus::Pending => "Pending",
        TransactionStatus::Completed => "Completed",
    }
    .to_string()
}

pub(crate) fn parse_transaction_kind(s: &str) -> Result<TransactionKind, String> {
    match s {
        "Income" | "income" => Ok(TransactionKind::Income),
        "Expense" | "expense" => Ok(TransactionKind::Expense),
        "Transfer" | "transfer" => Ok(TransactionKind::Transfer),
        other => Err(format!(
            "Invalid transaction kind '{}'. Valid values: Income, Expense, Transfer",
            other
        )),
    }
}

pub(crate) fn parse_transaction_status(s: &str) -> Result<TransactionStatus, String> {
    match s {
        "Pending" | "pending" => Ok(TransactionStatus::Pending),
        "Completed" | "completed" => Ok(TransactionStatus::Completed),
        other => Err(format!(
            "Invalid transaction status '{}'. Valid values: Pending, Completed",
            other
        )),
    }
}

/// Canonical sign convention: income positive, expense negative, transfers
/// keep the caller's signed leg amount.
pub(crate) fn normalize_amount(kind: TransactionKind, amount_cents: i64) -> i64 {
    match kind {
        TransactionKind::Income => amount_cents.abs(),
        TransactionKind::Expense => -amount_cents.abs(),
        TransactionKind::Transfer => amount_cents,
    }
}

pub(crate) fn db_error(message: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: message.to_string(),
            code: "DATABASE_ERROR".to_string(),
            success: false,
        }),
    )
}

pub(crate) fn bad_request(error: String, code: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error,
            code: code.to_string(),
            success: false,
        }),
    )
}

pub(crate) fn transaction_not_found(transaction_id: i32) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("Transaction with id {} does not exist", transaction_id),
            code: "TRANSACTION_NOT_FOUND".to_string(),
            success: false,
        }),
    )
}

/// Applies a settled amount change to an account's balance.
pub(crate) async fn apply_balance_delta<C: ConnectionTrait>(
    conn: &C,
    account_id: i32,
    delta_cents: i64,
) -> Result<(), DbErr> {
    if delta_cents == 0 {
        return Ok(());
    }
    let Some(account_model) = account::Entity::find_by_id(account_id).one(conn).await? else {
        return Err(DbErr::RecordNotFound(format!("account {}", account_id)));
    };
    let new_balance = account_model.balance_cents + delta_cents;
    trace!(
        "Adjusting balance of account {} by {} cents to {}",
        account_id, delta_cents, new_balance
    );
    let mut active: account::ActiveModel = account_model.into();
    active.balance_cents = Set(new_balance);
    active.update(conn).await?;
    Ok(())
}

/// Fetches the full series a target belongs to: every child of the
/// principal plus the principal row itself.
///
/// Degrades to an empty set for rows outside series semantics and for the
/// recoverable dangling-parent case (the target references a principal
/// that no longer exists).
pub(crate) async fn fetch_series_siblings<C: ConnectionTrait>(
    conn: &C,
    target: &transaction::Model,
) -> Result<Vec<transaction::Model>, DbErr> {
    if target.is_transfer_like() || !target.is_series_member() {
        return Ok(Vec::new());
    }

    let parent_id = target.series_parent_id();
    let principal = transaction::Entity::find_by_id(parent_id).one(conn).await?;
    if target.parent_transaction_id.is_some() && principal.is_none() {
        warn!(
            "Transaction {} references missing principal {}; resolving with no siblings",
            target.id, parent_id
        );
        return Ok(Vec::new());
    }

    let mut rows = transaction::Entity::find()
        .filter(transaction::Column::ParentTransactionId.eq(parent_id))
        .all(conn)
        .await?;
    if let Some(principal) = principal {
        rows.push(principal);
    }
    Ok(rows)
}

fn parse_scope_param(scope: Option<&str>) -> Result<EditScope, (StatusCode, Json<ErrorResponse>)> {
    match scope {
        None => Ok(EditScope::Current),
        Some(raw) => raw
            .parse::<EditScope>()
            .map_err(|e| bad_request(e, "INVALID_SCOPE")),
    }
}

/// Create a new transaction
///
/// A `Transfer` request creates both legs (outgoing and incoming) inside
/// one database transaction and returns the outgoing leg.
#[utoipa::path(
    post,
    path = "/api/v1/transactions",
    tag = "transactions",
    request_body = CreateTransactionRequest,
    responses(
        (status = 201, description = "Transaction created successfully", body = ApiResponse<TransactionResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn create_transaction(
    State(state): State<AppState>,
    Json(request): Json<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TransactionResponse>>), (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering create_transaction function");
    debug!(
        "Creating transaction '{}' of {} cents on account {}",
        request.description, request.amount_cents, request.account_id
    );

    let kind = parse_transaction_kind(&request.kind)
        .map_err(|e| bad_request(e, "INVALID_KIND"))?;
    let status = match &request.status {
        Some(raw) => parse_transaction_status(raw)
            .map_err(|e| bad_request(e, "INVALID_STATUS"))?,
        None => TransactionStatus::Pending,
    };

    if kind == TransactionKind::Transfer {
        return create_transfer_pair(&state, &request, status).await;
    }

    let amount_cents = normalize_amount(kind, request.amount_cents);

    let txn = state.db.begin().await.map_err(|e| {
        error!("Failed to open database transaction: {}", e);
        db_error("Failed to create transaction")
    })?;

    let row = transaction::ActiveModel {
        description: Set(request.description.clone()),
        amount_cents: Set(amount_cents),
        date: Set(request.date),
        kind: Set(kind),
        status: Set(status),
        account_id: Set(request.account_id),
        category_id: Set(request.category_id),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(|e| {
        error!("Failed to insert transaction: {}", e);
        db_error("Failed to create transaction")
    })?;

    if status == TransactionStatus::Completed {
        apply_balance_delta(&txn, row.account_id, row.amount_cents)
            .await
            .map_err(|e| {
                error!("Failed to apply balance: {}", e);
                db_error("Failed to create transaction")
            })?;
    }

    txn.commit().await.map_err(|e| {
        error!("Failed to commit transaction creation: {}", e);
        db_error("Failed to create transaction")
    })?;

    info!("Transaction created successfully with ID: {}", row.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: TransactionResponse::from(row),
            message: "Transaction created successfully".to_string(),
            success: true,
        }),
    ))
}

/// Creates both legs of a transfer inside one database transaction: an
/// outgoing (negative) leg on the source account and an incoming
/// (positive) leg on the destination, cross-referenced through
/// `linked_transaction_id`.
async fn create_transfer_pair(
    state: &AppState,
    request: &CreateTransactionRequest,
    status: TransactionStatus,
) -> Result<(StatusCode, Json<ApiResponse<TransactionResponse>>), (StatusCode, Json<ErrorResponse>)> {
    let Some(to_account_id) = request.to_account_id else {
        return Err(bad_request(
            "Transfers require to_account_id".to_string(),
            "MISSING_TO_ACCOUNT",
        ));
    };
    if to_account_id == request.account_id {
        return Err(bad_request(
            "Transfers require two distinct accounts".to_string(),
            "SAME_ACCOUNT",
        ));
    }

    let magnitude = request.amount_cents.abs();

    let txn = state.db.begin().await.map_err(|e| {
        error!("Failed to open database transaction: {}", e);
        db_error("Failed to create transfer")
    })?;

    let out_leg = transaction::ActiveModel {
        description: Set(request.description.clone()),
        amount_cents: Set(-magnitude),
        date: Set(request.date),
        kind: Set(TransactionKind::Transfer),
        status: Set(status),
        account_id: Set(request.account_id),
        category_id: Set(request.category_id),
        to_account_id: Set(Some(to_account_id)),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(|e| {
        error!("Failed to insert outgoing transfer leg: {}", e);
        db_error("Failed to create transfer")
    })?;

    let in_leg = transaction::ActiveModel {
        description: Set(request.description.clone()),
        amount_cents: Set(magnitude),
        date: Set(request.date),
        kind: Set(TransactionKind::Transfer),
        status: Set(status),
        account_id: Set(to_account_id),
        category_id: Set(request.category_id),
        linked_transaction_id: Set(Some(out_leg.id)),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(|e| {
        error!("Failed to insert incoming transfer leg: {}", e);
        db_error("Failed to create transfer")
    })?;

    let mut out_active: transaction::ActiveModel = out_leg.into();
    out_active.linked_transaction_id = Set(Some(in_leg.id));
    let out_leg = out_active.update(&txn).await.map_err(|e| {
        error!("Failed to link transfer legs: {}", e);
        db_error("Failed to create transfer")
    })?;

    if status == TransactionStatus::Completed {
        apply_balance_delta(&txn, request.account_id, -magnitude)
            .await
            .map_err(|e| {
                error!("Failed to apply transfer balances: {}", e);
                db_error("Failed to create transfer")
            })?;
        apply_balance_delta(&txn, to_account_id, magnitude)
            .await
            .map_err(|e| {
                error!("Failed to apply transfer balances: {}", e);
                db_error("Failed to create transfer")
            })?;
    }

    txn.commit().await.map_err(|e| {
        error!("Failed to commit transfer creation: {}", e);
        db_error("Failed to create transfer")
    })?;

    info!(
        "Transfer created successfully: legs {} and {}",
        out_leg.id, in_leg.id
    );
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: TransactionResponse::from(out_leg),
            message: "Transfer created successfully".to_string(),
            success: true,
        }),
    ))
}

/// Get all transactions
#[utoipa::path(
    get,
    path = "/api/v1/transactions",
    tag = "transactions",
    params(TransactionQuery),
    responses(
        (status = 200, description = "Transactions retrieved successfully", body = ApiResponse<Vec<TransactionResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_transactions(
    Valid(Query(query)): Valid<Query<TransactionQuery>>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<TransactionResponse>>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering get_transactions function");

    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(100);
    debug!("Fetching transactions - page: {}, limit: {}", page, limit);

    let mut query_builder = transaction::Entity::find();

    if let Some(account_id) = query.account_id {
        query_builder = query_builder.filter(transaction::Column::AccountId.eq(account_id));
    }
    if let Some(status_str) = &query.status {
        let status = parse_transaction_status(status_str)
            .map_err(|e| bad_request(e, "INVALID_STATUS"))?;
        query_builder = query_builder.filter(transaction::Column::Status.eq(status));
    }
    if let Some(parent_id) = query.parent_transaction_id {
        query_builder =
            query_builder.filter(transaction::Column::ParentTransactionId.eq(parent_id));
    }

    match query_builder
        .order_by_desc(transaction::Column::Date)
        .order_by_desc(transaction::Column::Id)
        .paginate(&state.db, limit)
        .fetch_page(page - 1)
        .await
    {
        Ok(rows) => {
            info!("Successfully retrieved {} transactions", rows.len());
            Ok(Json(ApiResponse {
                data: rows.into_iter().map(TransactionResponse::from).collect(),
                message: "Transactions retrieved successfully".to_string(),
                success: true,
            }))
        }
        Err(e) => {
            error!("Failed to retrieve transactions: {}", e);
            Err(db_error("Failed to retrieve transactions"))
        }
    }
}

/// Get a specific transaction by ID
#[utoipa::path(
    get,
    path = "/api/v1/transactions/{transaction_id}",
    tag = "transactions",
    params(
        ("transaction_id" = i32, Path, description = "Transaction ID"),
    ),
    responses(
        (status = 200, description = "Transaction retrieved successfully", body = ApiResponse<TransactionResponse>),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_transaction(
    Path(transaction_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<TransactionResponse>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering get_transaction function");

    match transaction::Entity::find_by_id(transaction_id).one(&state.db).await {
        Ok(Some(row)) => Ok(Json(ApiResponse {
            data: TransactionResponse::from(row),
            message: "Transaction retrieved successfully".to_string(),
            success: true,
        })),
        Ok(None) => {
            warn!("Transaction with ID {} not found", transaction_id);
            Err(transaction_not_found(transaction_id))
        }
        Err(e) => {
            error!("Failed to retrieve transaction {}: {}", transaction_id, e);
            Err(db_error("Failed to retrieve transaction"))
        }
    }
}

/// Update a transaction, optionally across its series
///
/// The `scope` query parameter controls the reach: `current` edits only
/// the targeted row, `current-and-remaining` also edits pending siblings
/// on or after it, `all` edits the entire series including settled rows.
/// Settled rows whose amount changes have the difference applied to their
/// account balance, all inside one database transaction.
#[utoipa::path(
    put,
    path = "/api/v1/transactions/{transaction_id}",
    tag = "transactions",
    request_body = UpdateTransactionRequest,
    params(
        ("transaction_id" = i32, Path, description = "Transaction ID"),
        ScopeQuery,
    ),
    responses(
        (status = 200, description = "Transaction(s) updated successfully", body = ApiResponse<ScopeOutcomeResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn update_transaction(
    Path(transaction_id): Path<i32>,
    Query(scope_query): Query<ScopeQuery>,
    State(state): State<AppState>,
    Json(request): Json<UpdateTransactionRequest>,
) -> Result<Json<ApiResponse<ScopeOutcomeResponse>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering update_transaction function");

    let scope = parse_scope_param(scope_query.scope.as_deref())?;
    debug!(
        "Updating transaction {} under scope {}",
        transaction_id,
        scope.as_str()
    );

    let target = match transaction::Entity::find_by_id(transaction_id).one(&state.db).await {
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

    let txn = state.db.begin().await.map_err(|e| {
        error!("Failed to open database transaction: {}", e);
        db_error("Failed to update transaction")
    })?;

    let siblings = fetch_series_siblings(&txn, &target).await.map_err(|e| {
        error!("Failed to fetch series siblings: {}", e);
        db_error("Failed to update transaction")
    })?;

    let decision = resolve_scope(ScopeAction::Edit, &target, &siblings, scope);

    let rows = transaction::Entity::find()
        .filter(transaction::Column::Id.is_in(decision.ids_to_mutate.clone()))
        .all(&txn)
        .await
        .map_err(|e| {
            error!("Failed to fetch rows to update: {}", e);
            db_error("Failed to update transaction")
        })?;

    let mut balance_deltas: HashMap<i32, i64> = HashMap::new();
    for row in &rows {
        let mut active: transaction::ActiveModel = row.clone().into();
        if let Some(description) = &request.description {
            active.description = Set(description.clone());
        }
        if let Some(amount) = request.amount_cents {
            let normalized = normalize_amount(row.kind, amount);
            if row.status == TransactionStatus::Completed && normalized != row.amount_cents {
                *balance_deltas.entry(row.account_id).or_insert(0) +=
                    normalized - row.amount_cents;
            }
            active.amount_cents = Set(normalized);
        }
        if let Some(category_id) = request.category_id {
            active.category_id = Set(Some(category_id));
        }
        if let Some(date) = request.date {
            if row.id == target.id {
                active.date = Set(date);
            }
        }
        active.update(&txn).await.map_err(|e| {
            error!("Failed to update transaction {}: {}", row.id, e);
            db_error("Failed to update transaction")
        })?;
    }

    for (account_id, delta) in balance_deltas {
        apply_balance_delta(&txn, account_id, delta).await.map_err(|e| {
            error!("Failed to apply balance to account {}: {}", account_id, e);
            db_error("Failed to update transaction")
        })?;
    }

    txn.commit().await.map_err(|e| {
        error!("Failed to commit transaction update: {}", e);
        db_error("Failed to update transaction")
    })?;

    info!(
        "Updated {} transaction(s) from target {}",
        decision.ids_to_mutate.len(),
        transaction_id
    );
    Ok(Json(ApiResponse {
        data: ScopeOutcomeResponse::from(decision),
        message: "Transaction(s) updated successfully".to_string(),
        success: true,
    }))
}

/// Delete a transaction, optionally across its series
///
/// Settled rows are never swept away by `current-and-remaining`; a settled
/// principal is detached (kept in history with `is_fixed` cleared) instead
/// of deleted unless the scope is `all`. Settled rows that are removed get
/// their amount reverted from the account balance.
#[utoipa::path(
    delete,
    path = "/api/v1/transactions/{transaction_id}",
    tag = "transactions",
    params(
        ("transaction_id" = i32, Path, description = "Transaction ID"),
        ScopeQuery,
    ),
    responses(
        (status = 200, description = "Transaction(s) deleted successfully", body = ApiResponse<ScopeOutcomeResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn delete_transaction(
    Path(transaction_id): Path<i32>,
    Query(scope_query): Query<ScopeQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ScopeOutcomeResponse>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering delete_transaction function");

    let scope = parse_scope_param(scope_query.scope.as_deref())?;
    debug!(
        "Deleting transaction {} under scope {}",
        transaction_id,
        scope.as_str()
    );

    let target = match transaction::Entity::find_by_id(transaction_id).one(&state.db).await {
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

    let txn = state.db.begin().await.map_err(|e| {
        error!("Failed to open database transaction: {}", e);
        db_error("Failed to delete transaction")
    })?;

    let siblings = fetch_series_siblings(&txn, &target).await.map_err(|e| {
        error!("Failed to fetch series siblings: {}", e);
        db_error("Failed to delete transaction")
    })?;

    let decision = resolve_scope(ScopeAction::Delete, &target, &siblings, scope);

    // Settled rows being removed must give their amounts back first.
    let doomed = transaction::Entity::find()
        .filter(transaction::Column::Id.is_in(decision.ids_to_delete.clone()))
        .all(&txn)
        .await
        .map_err(|e| {
            error!("Failed to fetch rows to delete: {}", e);
            db_error("Failed to delete transaction")
        })?;

    let mut balance_deltas: HashMap<i32, i64> = HashMap::new();
    for row in &doomed {
        if row.status == TransactionStatus::Completed {
            *balance_deltas.entry(row.account_id).or_insert(0) -= row.amount_cents;
        }
    }

    if !decision.ids_to_delete.is_empty() {
        transaction::Entity::delete_many()
            .filter(transaction::Column::Id.is_in(decision.ids_to_delete.clone()))
            .exec(&txn)
            .await
            .map_err(|e| {
                error!("Failed to delete transactions: {}", e);
                db_error("Failed to delete transaction")
            })?;
    }

    if !decision.ids_to_detach.is_empty() {
        let detached = transaction::Entity::find()
            .filter(transaction::Column::Id.is_in(decision.ids_to_detach.clone()))
            .all(&txn)
            .await
            .map_err(|e| {
                error!("Failed to fetch rows to detach: {}", e);
                db_error("Failed to delete transaction")
            })?;
        for row in detached {
            let mut active: transaction::ActiveModel = row.into();
            active.is_fixed = Set(false);
            active.update(&txn).await.map_err(|e| {
                error!("Failed to detach principal: {}", e);
                db_error("Failed to delete transaction")
            })?;
        }
    }

    for (account_id, delta) in balance_deltas {
        apply_balance_delta(&txn, account_id, delta).await.map_err(|e| {
            error!("Failed to revert balance on account {}: {}", account_id, e);
            db_error("Failed to delete transaction")
        })?;
    }

    txn.commit().await.map_err(|e| {
        error!("Failed to commit transaction deletion: {}", e);
        db_error("Failed to delete transaction")
    })?;

    info!(
        "Deleted {} and detached {} transaction(s) from target {}",
        decision.ids_to_delete.len(),
        decision.ids_to_detach.len(),
        transaction_id
    );
    Ok(Json(ApiResponse {
        data: ScopeOutcomeResponse::from(decision),
        message: "Transaction(s) deleted successfully".to_string(),
        success: true,
    }))
}

/// Settle a pending transaction
///
/// Marks the row completed and applies its amount to the account balance.
#[utoipa::path(
    post,
    path = "/api/v1/transactions/{transaction_id}/settle",
    tag = "transactions",
    params(
        ("transaction_id" = i32, Path, description = "Transaction ID"),
    ),
    responses(
        (status = 200, description = "Transaction settled successfully", body = ApiResponse<TransactionResponse>),
        (status = 400, description = "Transaction already completed", body = ErrorResponse),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn settle_transaction(
    Path(transaction_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<TransactionResponse>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering settle_transaction function");
    flip_status(
        &state,
        transaction_id,
        TransactionStatus::Pending,
        TransactionStatus::Completed,
    )
    .await
}

/// Reopen a completed transaction
///
/// Marks the row pending again and reverts its amount from the account
/// balance.
#[utoipa::path(
    post,
    path = "/api/v1/transactions/{transaction_id}/reopen",
    tag = "transactions",
    params(
        ("transaction_id" = i32, Path, description = "Transaction ID"),
    ),
    responses(
        (status = 200, description = "Transaction reopened successfully", body = ApiResponse<TransactionResponse>),
        (status = 400, description = "Transaction is not completed", body = ErrorResponse),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn reopen_transaction(
    Path(transaction_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<TransactionResponse>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering reopen_transaction function");
    flip_status(
        &state,
        transaction_id,
        TransactionStatus::Completed,
        TransactionStatus::Pending,
    )
    .await
}

async fn flip_status(
    state: &AppState,
    transaction_id: i32,
    from: TransactionStatus,
    to: TransactionStatus,
) -> Result<Json<ApiResponse<TransactionResponse>>, (StatusCode, Json<ErrorResponse>)> {
    let target = match transaction::Entity::find_by_id(transaction_id).one(&state.db).await {
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

    if target.status != from {
        return Err(bad_request(
            format!(
                "Transaction {} is {}, expected {}",
                transaction_id,
                status_to_string(target.status),
                status_to_string(from)
            ),
            "INVALID_STATUS_TRANSITION",
        ));
    }

    // Settling adds the amount to the balance; reopening takes it back.
    let delta = match to {
        TransactionStatus::Completed => target.amount_cents,
        TransactionStatus::Pending => -target.amount_cents,
    };

    let txn = state.db.begin().await.map_err(|e| {
        error!("Failed to open database transaction: {}", e);
        db_error("Failed to change transaction status")
    })?;

    let mut active: transaction::ActiveModel = target.clone().into();
    active.status = Set(to);
    let updated = active.update(&txn).await.map_err(|e| {
        error!("Failed to update transaction status: {}", e);
        db_error("Failed to change transaction status")
    })?;

    apply_balance_delta(&txn, target.account_id, delta)
        .await
        .map_err(|e| {
            error!("Failed to apply balance: {}", e);
            db_error("Failed to change transaction status")
        })?;

    txn.commit().await.map_err(|e| {
        error!("Failed to commit status change: {}", e);
        db_error("Failed to change transaction status")
    })?;

    info!(
        "Transaction {} moved to {}",
        transaction_id,
        status_to_string(to)
    );
    Ok(Json(ApiResponse {
        data: TransactionResponse::from(updated),
        message: "Transaction status updated successfully".to_string(),
        success: true,
    }))
}

/// Get all transactions of one account
#[utoipa::path(
    get,
    path = "/api/v1/accounts/{account_id}/transactions",
    tag = "transactions",
    params(
        ("account_id" = i32, Path, description = "Account ID"),
    ),
    responses(
        (status = 200, description = "Account transactions retrieved successfully", body = ApiResponse<Vec<TransactionResponse>>),
        (status = 404, description = "Account not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_account_transactions(
    Path(account_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<TransactionResponse>>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering get_account_transactions function");

    match account::Entity::find_by_id(account_id).one(&state.db).await {
        Ok(Some(_)) => {}
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
    }

    match transaction::Entity::find()
        .filter(transaction::Column::AccountId.eq(account_id))
        .order_by_desc(transaction::Column::Date)
        .order_by_desc(transaction::Column::Id)
        .all(&state.db)
        .await
    {
        Ok(rows) => {
            info!(
                "Successfully retrieved {} transactions for account {}",
                rows.len(),
                account_id
            );
            Ok(Json(ApiResponse {
                data: rows.into_iter().map(TransactionResponse::from).collect(),
                message: "Account transactions retrieved successfully".to_string(),
                success: true,
            }))
        }
        Err(e) => {
            error!(
                "Failed to retrieve transactions for account {}: {}",
                account_id, e
            );
            Err(db_error("Failed to retrieve account transactions"))
        }
    }
}
