use crate::schemas::{ApiResponse, AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use model::entities::account::{self, AccountKind};
use sea_orm::{ActiveModelTrait, EntityTrait, ModelTrait, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;

/// Request body for creating a new account
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateAccountRequest {
    /// Account name
    pub name: String,
    /// Account kind: Checking, Savings, Credit, Investment or MealVoucher
    pub kind: String,
    /// Opening balance in signed cents (default: 0)
    pub balance_cents: Option<i64>,
    /// Credit limit in cents (credit accounts)
    pub limit_cents: Option<i64>,
    /// Invoice closing day of month, 1-31 (credit accounts)
    pub closing_day: Option<i32>,
    /// Invoice due day of month, 1-31 (credit accounts)
    pub due_day: Option<i32>,
    /// Display color as a hex string (default: "#64748b")
    pub color: Option<String>,
}

/// Request body for updating an account
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateAccountRequest {
    /// Account name
    pub name: Option<String>,
    /// Account kind: Checking, Savings, Credit, Investment or MealVoucher
    pub kind: Option<String>,
    /// Credit limit in cents
    pub limit_cents: Option<i64>,
    /// Invoice closing day of month, 1-31
    pub closing_day: Option<i32>,
    /// Invoice due day of month, 1-31
    pub due_day: Option<i32>,
    /// Display color as a hex string
    pub color: Option<String>,
}

/// Account response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AccountResponse {
    pub id: i32,
    pub name: String,
    pub kind: String,
    pub balance_cents: i64,
    pub limit_cents: Option<i64>,
    pub closing_day: Option<i32>,
    pub due_day: Option<i32>,
    pub color: String,
}

impl From<account::Model> for AccountResponse {
    fn from(model: account::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            kind: kind_to_string(model.kind),
            balance_cents: model.balance_cents,
            limit_cents: model.limit_cents,
            closing_day: model.closing_day,
            due_day: model.due_day,
            color: model.color,
        }
    }
}

pub(crate) fn kind_to_string(kind: AccountKind) -> String {
    match kind {
        AccountKind::Checking => "Checking",
        AccountKind::Savings => "Savings",
        AccountKind::Credit => "Credit",
        AccountKind::Investment => "Investment",
        AccountKind::MealVoucher => "MealVoucher",
    }
    .to_string()
}

pub(crate) fn parse_account_kind(s: &str) -> Result<AccountKind, String> {
    match s {
        "Checking" | "checking" => Ok(AccountKind::Checking),
        "Savings" | "savings" => Ok(AccountKind::Savings),
        "Credit" | "credit" => Ok(AccountKind::Credit),
        "Investment" | "investment" => Ok(AccountKind::Investment),
        "MealVoucher" | "meal_voucher" => Ok(AccountKind::MealVoucher),
        other => Err(format!(
            "Invalid account kind '{}'. Valid values: Checking, Savings, Credit, Investment, MealVoucher",
            other
        )),
    }
}

fn day_in_range(day: Option<i32>) -> bool {
    day.map_or(true, |d| (1..=31).contains(&d))
}

/// Create a new account
#[utoipa::path(
    post,
    path = "/api/v1/accounts",
    tag = "accounts",
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account created successfully", body = ApiResponse<AccountResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn create_account(
    State(state): State<AppState>,
    Json(request): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AccountResponse>>), StatusCode> {
    trace!("Entering create_account function");
    debug!("Creating account with name: {}, kind: {}", request.name, request.kind);

    let kind = match parse_account_kind(&request.kind) {
        Ok(kind) => kind,
        Err(e) => {
            warn!("Invalid account kind: {}", e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    if !day_in_range(request.closing_day) || !day_in_range(request.due_day) {
        warn!(
            "Rejected out-of-range cycle days: closing_day={:?}, due_day={:?}",
            request.closing_day, request.due_day
        );
        return Err(StatusCode::BAD_REQUEST);
    }

    let new_account = account::ActiveModel {
        name: Set(request.name.clone()),
        kind: Set(kind),
        balance_cents: Set(request.balance_cents.unwrap_or(0)),
        limit_cents: Set(request.limit_cents),
        closing_day: Set(request.closing_day),
        due_day: Set(request.due_day),
        color: Set(request.color.clone().unwrap_or_else(|| "#64748b".to_string())),
        ..Default::default()
    };

    trace!("Attempting to insert new account into database");
    match new_account.insert(&state.db).await {
        Ok(account_model) => {
            info!(
                "Account created successfully with ID: {}, name: {}",
                account_model.id, account_model.name
            );
            let response = ApiResponse {
                data: AccountResponse::from(account_model),
                message: "Account created successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(db_error) => {
            error!("Failed to create account '{}': {}", request.name, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get all accounts
#[utoipa::path(
    get,
    path = "/api/v1/accounts",
    tag = "accounts",
    responses(
        (status = 200, description = "Accounts retrieved successfully", body = ApiResponse<Vec<AccountResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_accounts(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<AccountResponse>>>, StatusCode> {
    trace!("Entering get_accounts function");
    debug!("Fetching all accounts from database");

    match account::Entity::find().all(&state.db).await {
        Ok(accounts) => {
            let account_count = accounts.len();
            let account_responses: Vec<AccountResponse> =
                accounts.into_iter().map(AccountResponse::from).collect();

            info!("Successfully retrieved {} accounts", account_count);
            let response = ApiResponse {
                data: account_responses,
                message: "Accounts retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to retrieve accounts: {}", db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get a specific account by ID
#[utoipa::path(
    get,
    path = "/api/v1/accounts/{account_id}",
    tag = "accounts",
    params(
        ("account_id" = i32, Path, description = "Account ID"),
    ),
    responses(
        (status = 200, description = "Account retrieved successfully", body = ApiResponse<AccountResponse>),
        (status = 404, description = "Account not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_account(
    Path(account_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<AccountResponse>>, StatusCode> {
    trace!("Entering get_account function");
    debug!("Fetching account with ID: {}", account_id);

    match account::Entity::find_by_id(account_id).one(&state.db).await {
        Ok(Some(account_model)) => {
            info!("Successfully retrieved account ID: {}", account_model.id);
            let response = ApiResponse {
                data: AccountResponse::from(account_model),
                message: "Account retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Ok(None) => {
            warn!("Account with ID {} not found", account_id);
            Err(StatusCode::NOT_FOUND)
        }
        Err(db_error) => {
            error!("Failed to retrieve account {}: {}", account_id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Update an account
///
/// The balance is intentionally absent from the request: balances change
/// only through transaction settlement.
#[utoipa::path(
    put,
    path = "/api/v1/accounts/{account_id}",
    tag = "accounts",
    request_body = UpdateAccountRequest,
    params(
        ("account_id" = i32, Path, description = "Account ID"),
    ),
    responses(
        (status = 200, description = "Account updated successfully", body = ApiResponse<AccountResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Account not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn update_account(
    Path(account_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<UpdateAccountRequest>,
) -> Result<Json<ApiResponse<AccountResponse>>, StatusCode> {
    trace!("Entering update_account function");
    debug!("Updating account with ID: {}", account_id);

    let existing = match account::Entity::find_by_id(account_id).one(&state.db).await {
        Ok(Some(account_model)) => account_model,
        Ok(None) => {
            warn!("Account with ID {} not found", account_id);
            return Err(StatusCode::NOT_FOUND);
        }
        Err(db_error) => {
            error!("Failed to retrieve account {}: {}", account_id, db_error);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    if !day_in_range(request.closing_day) || !day_in_range(request.due_day) {
        warn!(
            "Rejected out-of-range cycle days: closing_day={:?}, due_day={:?}",
            request.closing_day, request.due_day
        );
        return Err(StatusCode::BAD_REQUEST);
    }

    let mut active: account::ActiveModel = existing.into();
    if let Some(name) = request.name {
        active.name = Set(name);
    }
    if let Some(kind_str) = request.kind {
        match parse_account_kind(&kind_str) {
            Ok(kind) => active.kind = Set(kind),
            Err(e) => {
                warn!("Invalid account kind: {}", e);
                return Err(StatusCode::BAD_REQUEST);
            }
        }
    }
    if let Some(limit) = request.limit_cents {
        active.limit_cents = Set(Some(limit));
    }
    if let Some(closing) = request.closing_day {
        active.closing_day = Set(Some(closing));
    }
    if let Some(due) = request.due_day {
        active.due_day = Set(Some(due));
    }
    if let Some(color) = request.color {
        active.color = Set(color);
    }

    match active.update(&state.db).await {
        Ok(account_model) => {
            info!("Account {} updated successfully", account_model.id);
            let response = ApiResponse {
                data: AccountResponse::from(account_model),
                message: "Account updated successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to update account {}: {}", account_id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Delete an account
#[utoipa::path(
    delete,
    path = "/api/v1/accounts/{account_id}",
    tag = "accounts",
    params(
        ("account_id" = i32, Path, description = "Account ID"),
    ),
    responses(
        (status = 200, description = "Account deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Account not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn delete_account(
    Path(account_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, StatusCode> {
    trace!("Entering delete_account function");
    debug!("Deleting account with ID: {}", account_id);

    let existing = match account::Entity::find_by_id(account_id).one(&state.db).await {
        Ok(Some(account_model)) => account_model,
        Ok(None) => {
            warn!("Account with ID {} not found", account_id);
            return Err(StatusCode::NOT_FOUND);
        }
        Err(db_error) => {
            error!("Failed to retrieve account {}: {}", account_id, db_error);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    match existing.delete(&state.db).await {
        Ok(_) => {
            info!("Account {} deleted successfully", account_id);
            let response = ApiResponse {
                data: format!("Account {} deleted", account_id),
                message: "Account deleted successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to delete account {}: {}", account_id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
