use crate::schemas::{ApiResponse, AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use model::entities::category;
use sea_orm::{ActiveModelTrait, EntityTrait, ModelTrait, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;

/// Request body for creating a category
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateCategoryRequest {
    /// Category name (unique)
    pub name: String,
    /// Display color as a hex string (default: "#94a3b8")
    pub color: Option<String>,
    /// Optional parent category for subcategories
    pub parent_id: Option<i32>,
}

/// Request body for updating a category
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateCategoryRequest {
    /// Category name
    pub name: Option<String>,
    /// Display color as a hex string
    pub color: Option<String>,
    /// Parent category
    pub parent_id: Option<i32>,
}

/// Category response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponse {
    pub id: i32,
    pub name: String,
    pub color: String,
    pub parent_id: Option<i32>,
}

impl From<category::Model> for CategoryResponse {
    fn from(model: category::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            color: model.color,
            parent_id: model.parent_id,
        }
    }
}

/// Create a new category
#[utoipa::path(
    post,
    path = "/api/v1/categories",
    tag = "categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created successfully", body = ApiResponse<CategoryResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn create_category(
    State(state): State<AppState>,
    Json(request): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CategoryResponse>>), StatusCode> {
    trace!("Entering create_category function");
    debug!("Creating category with name: {}", request.name);

    let new_category = category::ActiveModel {
        name: Set(request.name.clone()),
        color: Set(request.color.clone().unwrap_or_else(|| "#94a3b8".to_string())),
        parent_id: Set(request.parent_id),
        ..Default::default()
    };

    match new_category.insert(&state.db).await {
        Ok(category_model) => {
            info!("Category created successfully with ID: {}", category_model.id);
            let response = ApiResponse {
                data: CategoryResponse::from(category_model),
                message: "Category created successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(db_error) => {
            error!("Failed to create category '{}': {}", request.name, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get all categories
#[utoipa::path(
    get,
    path = "/api/v1/categories",
    tag = "categories",
    responses(
        (status = 200, description = "Categories retrieved successfully", body = ApiResponse<Vec<CategoryResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_categories(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<CategoryResponse>>>, StatusCode> {
    trace!("Entering get_categories function");

    match category::Entity::find().all(&state.db).await {
        Ok(categories) => {
            let count = categories.len();
            let responses: Vec<CategoryResponse> =
                categories.into_iter().map(CategoryResponse::from).collect();

            info!("Successfully retrieved {} categories", count);
            Ok(Json(ApiResponse {
                data: responses,
                message: "Categories retrieved successfully".to_string(),
                success: true,
            }))
        }
        Err(db_error) => {
            error!("Failed to retrieve categories: {}", db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get a specific category by ID
#[utoipa::path(
    get,
    path = "/api/v1/categories/{category_id}",
    tag = "categories",
    params(
        ("category_id" = i32, Path, description = "Category ID"),
    ),
    responses(
        (status = 200, description = "Category retrieved successfully", body = ApiResponse<CategoryResponse>),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_category(
    Path(category_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<CategoryResponse>>, StatusCode> {
    trace!("Entering get_category function");

    match category::Entity::find_by_id(category_id).one(&state.db).await {
        Ok(Some(category_model)) => Ok(Json(ApiResponse {
            data: CategoryResponse::from(category_model),
            message: "Category retrieved successfully".to_string(),
            success: true,
        })),
        Ok(None) => {
            warn!("Category with ID {} not found", category_id);
            Err(StatusCode::NOT_FOUND)
        }
        Err(db_error) => {
            error!("Failed to retrieve category {}: {}", category_id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Update a category
#[utoipa::path(
    put,
    path = "/api/v1/categories/{category_id}",
    tag = "categories",
    request_body = UpdateCategoryRequest,
    params(
        ("category_id" = i32, Path, description = "Category ID"),
    ),
    responses(
        (status = 200, description = "Category updated successfully", body = ApiResponse<CategoryResponse>),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn update_category(
    Path(category_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<UpdateCategoryRequest>,
) -> Result<Json<ApiResponse<CategoryResponse>>, StatusCode> {
    trace!("Entering update_category function");

    let existing = match category::Entity::find_by_id(category_id).one(&state.db).await {
        Ok(Some(category_model)) => category_model,
        Ok(None) => {
            warn!("Category with ID {} not found", category_id);
            return Err(StatusCode::NOT_FOUND);
        }
        Err(db_error) => {
            error!("Failed to retrieve category {}: {}", category_id, db_error);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let mut active: category::ActiveModel = existing.into();
    if let Some(name) = request.name {
        active.name = Set(name);
    }
    if let Some(color) = request.color {
        active.color = Set(color);
    }
    if let Some(parent_id) = request.parent_id {
        active.parent_id = Set(Some(parent_id));
    }

    match active.update(&state.db).await {
        Ok(category_model) => {
            info!("Category {} updated successfully", category_model.id);
            Ok(Json(ApiResponse {
                data: CategoryResponse::from(category_model),
                message: "Category updated successfully".to_string(),
                success: true,
            }))
        }
        Err(db_error) => {
            error!("Failed to update category {}: {}", category_id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Delete a category
#[utoipa::path(
    delete,
    path = "/api/v1/categories/{category_id}",
    tag = "categories",
    params(
        ("category_id" = i32, Path, description = "Category ID"),
    ),
    responses(
        (status = 200, description = "Category deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn delete_category(
    Path(category_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, StatusCode> {
    trace!("Entering delete_category function");

    let existing = match category::Entity::find_by_id(category_id).one(&state.db).await {
        Ok(Some(category_model)) => category_model,
        Ok(None) => {
            warn!("Category with ID {} not found", category_id);
            return Err(StatusCode::NOT_FOUND);
        }
        Err(db_error) => {
            error!("Failed to retrieve category {}: {}", category_id, db_error);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    match existing.delete(&state.db).await {
        Ok(_) => {
            info!("Category {} deleted successfully", category_id);
            Ok(Json(ApiResponse {
                data: format!("Category {} deleted", category_id),
                message: "Category deleted successfully".to_string(),
                success: true,
            }))
        }
        Err(db_error) => {
            error!("Failed to delete category {}: {}", category_id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
