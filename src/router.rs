use crate::handlers::{
    accounts::{create_account, delete_account, get_account, get_accounts, update_account},
    categories::{
        create_category, delete_category, get_categories, get_category, update_category,
    },
    health::health_check,
    invoices::get_account_invoice,
    statistics::get_account_statistics,
    transactions::{
        create_transaction, delete_transaction, get_account_transactions, get_transaction,
        get_transactions, reopen_transaction, settle_transaction, update_transaction,
        fixed::{create_fixed_transaction, generate_fixed_occurrences, get_fixed_transactions},
        installments::create_installment_purchase,
    },
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Account CRUD routes
        .route("/api/v1/accounts", post(create_account))
        .route("/api/v1/accounts", get(get_accounts))
        .route("/api/v1/accounts/:account_id", get(get_account))
        .route("/api/v1/accounts/:account_id", put(update_account))
        .route("/api/v1/accounts/:account_id", delete(delete_account))
        .route("/api/v1/accounts/:account_id/transactions", get(get_account_transactions))
        .route("/api/v1/accounts/:account_id/invoice", get(get_account_invoice))
        .route("/api/v1/accounts/:account_id/statistics", get(get_account_statistics))
        // Category CRUD routes
        .route("/api/v1/categories", post(create_category))
        .route("/api/v1/categories", get(get_categories))
        .route("/api/v1/categories/:category_id", get(get_category))
        .route("/api/v1/categories/:category_id", put(update_category))
        .route("/api/v1/categories/:category_id", delete(delete_category))
        // Transaction routes; updates and deletes honor the ?scope= parameter
        .route("/api/v1/transactions", post(create_transaction))
        .route("/api/v1/transactions", get(get_transactions))
        .route("/api/v1/transactions/:transaction_id", get(get_transaction))
        .route("/api/v1/transactions/:transaction_id", put(update_transaction))
        .route("/api/v1/transactions/:transaction_id", delete(delete_transaction))
        .route("/api/v1/transactions/:transaction_id/settle", post(settle_transaction))
        .route("/api/v1/transactions/:transaction_id/reopen", post(reopen_transaction))
        // Fixed (recurring) transaction routes
        .route("/api/v1/fixed", post(create_fixed_transaction))
        .route("/api/v1/fixed", get(get_fixed_transactions))
        .route("/api/v1/fixed/:transaction_id/generate", post(generate_fixed_occurrences))
        // Installment purchase routes
        .route("/api/v1/installments", post(create_installment_purchase))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
