use common::{CategoryTotal, DateRange, MonthlySummary};
use moka::future::Cache;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Cache for expensive operations
    pub cache: Cache<String, CachedData>,
}

/// Cached data types
#[derive(Clone, Debug)]
pub enum CachedData {
    Statistics(MonthlySummary),
}

/// API response wrapper
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

/// Error response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::statistics::get_account_statistics,
        crate::handlers::invoices::get_account_invoice,
    ),
    components(
        schemas(
            ApiResponse<MonthlySummary>,
            ApiResponse<crate::handlers::invoices::InvoiceResponse>,
            ErrorResponse,
            HealthResponse,
            MonthlySummary,
            CategoryTotal,
            DateRange,
            crate::handlers::invoices::InvoiceResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "accounts", description = "Account management endpoints"),
        (name = "categories", description = "Category management endpoints"),
        (name = "transactions", description = "Transaction endpoints, including scoped series edits"),
        (name = "fixed-transactions", description = "Fixed (recurring) transaction endpoints"),
        (name = "invoices", description = "Credit-card invoice cycle endpoints"),
        (name = "statistics", description = "Account statistics endpoints"),
    ),
    info(
        title = "Hearth API",
        description = "Family Finance Tracker API - accounts, transactions, recurring series, and credit-card cycles",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
