use crate::schemas::{ApiResponse, AppState, CachedData, ErrorResponse};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::{Datelike, Utc};
use common::{CategoryTotal, DateRange, MonthlySummary};
use model::entities::{category, transaction};
use model::entities::transaction::TransactionStatus;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, error, instrument, trace, warn};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::transactions::{bad_request, db_error};

/// Query parameters for statistics endpoints
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
pub struct StatisticsQuery {
    /// Year for statistics (default: current year)
    pub year: Option<i32>,
    /// Month for statistics 1-12 (default: current month)
    #[validate(range(min = 1, max = 12))]
    pub month: Option<u32>,
}

/// Get the monthly summary of one account
///
/// Sums the account's settled income and expenses for the month, what is
/// still pending, and the per-category breakdown. Transfer legs are moves
/// between own accounts and stay out of the totals. Responses are cached.
#[utoipa::path(
    get,
    path = "/api/v1/accounts/{account_id}/statistics",
    tag = "statistics",
    params(
        ("account_id" = i32, Path, description = "Account ID"),
        StatisticsQuery,
    ),
    responses(
        (status = 200, description = "Account statistics retrieved successfully", body = ApiResponse<MonthlySummary>),
        (status = 404, description = "Account not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_account_statistics(
    Path(account_id): Path<i32>,
    Valid(Query(query)): Valid<Query<StatisticsQuery>>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<MonthlySummary>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering get_account_statistics function");

    let today = Utc::now().date_naive();
    let year = query.year.unwrap_or_else(|| today.year());
    let month = query.month.unwrap_or_else(|| today.month());

    // Check cache first
    let cache_key = format!("stats_{}_{}_{}", account_id, year, month);
    if let Some(CachedData::Statistics(summary)) = state.cache.get(&cache_key).await {
        debug!("Statistics cache hit for {}", cache_key);
        return Ok(Json(ApiResponse {
            data: summary,
            message: "Account statistics retrieved from cache".to_string(),
            success: true,
        }));
    }

    let account_exists = model::entities::account::Entity::find_by_id(account_id)
        .one(&state.db)
        .await
        .map_err(|e| {
            error!("Failed to retrieve account {}: {}", account_id, e);
            db_error("Failed to retrieve account")
        })?
        .is_some();
    if !account_exists {
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

    let Some(range) = DateRange::month(year, month) else {
        return Err(bad_request(
            format!("Invalid month {}-{:02}", year, month),
            "INVALID_MONTH",
        ));
    };

    let rows = transaction::Entity::find()
        .filter(transaction::Column::AccountId.eq(account_id))
        .filter(transaction::Column::Date.between(range.start, range.end))
        .all(&state.db)
        .await
        .map_err(|e| {
            error!("Failed to fetch transactions for account {}: {}", account_id, e);
            db_error("Failed to compute statistics")
        })?;

    let mut income_cents = 0;
    let mut expense_cents = 0;
    let mut pending_cents = 0;
    let mut per_category: HashMap<Option<i32>, i64> = HashMap::new();
    for row in &rows {
        if row.is_transfer_like() {
            continue;
        }
        match row.status {
            TransactionStatus::Pending => pending_cents += row.amount_cents,
            TransactionStatus::Completed => {
                if row.amount_cents >= 0 {
                    income_cents += row.amount_cents;
                } else {
                    expense_cents += row.amount_cents;
                }
                *per_category.entry(row.category_id).or_insert(0) += row.amount_cents;
            }
        }
    }

    // Resolve category names for the breakdown.
    let category_ids: Vec<i32> = per_category.keys().filter_map(|id| *id).collect();
    let names: HashMap<i32, String> = category::Entity::find()
        .filter(category::Column::Id.is_in(category_ids))
        .all(&state.db)
        .await
        .map_err(|e| {
            error!("Failed to fetch categories: {}", e);
            db_error("Failed to compute statistics")
        })?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();

    let mut by_category: Vec<CategoryTotal> = per_category
        .into_iter()
        .map(|(category_id, total_cents)| CategoryTotal {
            category_id,
            category_name: category_id.and_then(|id| names.get(&id).cloned()),
            total_cents,
        })
        .collect();
    by_category.sort_by_key(|t| t.total_cents);

    let summary = MonthlySummary {
        account_id,
        year,
        month,
        income_cents,
        expense_cents,
        net_cents: income_cents + expense_cents,
        pending_cents,
        by_category,
    };

    // Cache the result
    state
        .cache
        .insert(cache_key, CachedData::Statistics(summary.clone()))
        .await;

    debug!(
        "Computed statistics for account {} {}-{:02}: net {} cents",
        account_id, year, month, summary.net_cents
    );
    Ok(Json(ApiResponse {
        data: summary,
        message: "Account statistics retrieved successfully".to_string(),
        success: true,
    }))
}
