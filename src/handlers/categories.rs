use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    AppState,
    auth::AuthUser,
    error::ApiError,
    models::{Category, CreateCategoryRequest, MessageResponse, Role},
};

/// get_categories
///
/// [Public Route] Lists all categories with both language names, sorted by
/// the Arabic name.
#[utoipa::path(
    get,
    path = "/categories",
    responses((status = 200, description = "All categories", body = [Category]))
)]
pub async fn get_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, ApiError> {
    Ok(Json(state.repo.list_categories().await?))
}

/// create_category
///
/// [Admin Route] Creates a bilingual category. Both names are required and
/// each must be unique across existing categories.
#[utoipa::path(
    post,
    path = "/categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Created", body = Category),
        (status = 400, description = "Missing name or duplicate")
    )
)]
pub async fn create_category(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    auth.require_role(Role::Admin)?;

    let name_ar = payload.name_ar.trim().to_string();
    let name_fr = payload.name_fr.trim().to_string();

    if name_ar.is_empty() || name_fr.is_empty() {
        return Err(ApiError::Validation(
            "Both Arabic and French category names are required".to_string(),
        ));
    }

    if state.repo.category_name_taken(&name_ar, &name_fr).await? {
        return Err(ApiError::Conflict("Category already exists".to_string()));
    }

    let category = state.repo.create_category(&name_ar, &name_fr).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// delete_category
///
/// [Admin Route] Removes a category. Menu items keep their denormalized
/// category names; no cascade is applied.
#[utoipa::path(
    delete,
    path = "/categories/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_category(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    auth.require_role(Role::Admin)?;

    if !state.repo.delete_category(id).await? {
        return Err(ApiError::NotFound("Category not found".to_string()));
    }

    Ok(Json(MessageResponse::new("Category deleted successfully")))
}
