use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    AppState,
    auth::AuthUser,
    error::ApiError,
    models::{
        Lang, MenuItem, MenuItemChanges, MessageResponse, NewMenuItem, PublicMenuItem, Role,
    },
    uploader::ALLOWED_IMAGE_TYPES,
};

// --- Filter Structs ---

/// PublicMenuFilter
///
/// Query parameters for the public menu listing: the display language
/// (default Arabic) and an optional category name in that language.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct PublicMenuFilter {
    pub lang: Option<Lang>,
    pub category: Option<String>,
}

/// AdminMenuFilter
///
/// Query parameters for the admin listing: an optional category name matched
/// against either language column.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct AdminMenuFilter {
    pub category: Option<String>,
}

// --- Multipart Form ---

/// ImagePart
///
/// The raw image file lifted out of a multipart request.
#[derive(Debug, Clone)]
pub struct ImagePart {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// MenuItemForm
///
/// The untyped multipart payload of the create/update endpoints: every field
/// optional at this stage, validation happens in `create_item`/`update_item`.
#[derive(Debug, Clone, Default)]
pub struct MenuItemForm {
    pub name_ar: Option<String>,
    pub name_fr: Option<String>,
    pub description_ar: Option<String>,
    pub description_fr: Option<String>,
    pub price: Option<String>,
    pub category_ar: Option<String>,
    pub category_fr: Option<String>,
    pub show_on_main_page: Option<bool>,
    pub image: Option<ImagePart>,
}

impl MenuItemForm {
    /// Drains a multipart stream into the form. Unknown field names are
    /// skipped rather than rejected.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = MenuItemForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::Validation(format!("Invalid multipart payload: {e}")))?
        {
            let name = field.name().unwrap_or_default().to_string();

            if name == "image" {
                let filename = field.file_name().unwrap_or("image").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::Validation(format!("Invalid image upload: {e}")))?;
                form.image = Some(ImagePart {
                    filename,
                    content_type,
                    data: data.to_vec(),
                });
                continue;
            }

            let value = field
                .text()
                .await
                .map_err(|e| ApiError::Validation(format!("Invalid multipart payload: {e}")))?;

            match name.as_str() {
                "name_ar" => form.name_ar = Some(value),
                "name_fr" => form.name_fr = Some(value),
                "description_ar" => form.description_ar = Some(value),
                "description_fr" => form.description_fr = Some(value),
                "price" => form.price = Some(value),
                "category_ar" => form.category_ar = Some(value),
                "category_fr" => form.category_fr = Some(value),
                "show_on_main_page" => {
                    form.show_on_main_page = Some(value == "true" || value == "1");
                }
                _ => {}
            }
        }

        Ok(form)
    }
}

/// Parses and range-checks a price string from a multipart field.
fn parse_price(raw: &str) -> Result<f64, ApiError> {
    let price: f64 = raw
        .trim()
        .parse()
        .map_err(|_| ApiError::Validation("Price must be a valid number".to_string()))?;
    if !price.is_finite() || price < 0.0 {
        return Err(ApiError::Validation(
            "Price must be a non-negative number".to_string(),
        ));
    }
    Ok(price)
}

/// Rejects image uploads outside the accepted formats.
fn check_image_type(image: &ImagePart) -> Result<(), ApiError> {
    if ALLOWED_IMAGE_TYPES.contains(&image.content_type.as_str()) {
        Ok(())
    } else {
        Err(ApiError::Validation(
            "Only JPEG, PNG, or WebP images are allowed".to_string(),
        ))
    }
}

// --- Handlers ---

/// get_menu
///
/// [Public Route] Lists visible menu items collapsed to the requested display
/// language, sorted by (category, name) in that language.
///
/// *Security*: the repository query applies `show_on_main_page = true`
/// unconditionally, so hidden items never leak to anonymous callers.
#[utoipa::path(
    get,
    path = "/menu",
    params(PublicMenuFilter),
    responses((status = 200, description = "Visible menu items", body = [PublicMenuItem]))
)]
pub async fn get_menu(
    State(state): State<AppState>,
    Query(filter): Query<PublicMenuFilter>,
) -> Result<Json<Vec<PublicMenuItem>>, ApiError> {
    let lang = filter.lang.unwrap_or_default();
    let items = state
        .repo
        .list_menu_public(lang, filter.category.as_deref())
        .await?;

    Ok(Json(
        items.into_iter().map(|item| item.localized(lang)).collect(),
    ))
}

/// get_admin_menu
///
/// [Admin Route] Lists ALL items in both languages, regardless of visibility.
#[utoipa::path(
    get,
    path = "/menu/admin-menu",
    params(AdminMenuFilter),
    responses((status = 200, description = "All menu items", body = [MenuItem]))
)]
pub async fn get_admin_menu(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(filter): Query<AdminMenuFilter>,
) -> Result<Json<Vec<MenuItem>>, ApiError> {
    auth.require_role(Role::Admin)?;
    Ok(Json(
        state.repo.list_menu_admin(filter.category.as_deref()).await?,
    ))
}

/// create_menu_item
///
/// [Admin Route] Creates an item from a multipart form. The image is uploaded
/// to the media host before the insert; an upload failure aborts the request
/// with nothing written locally.
#[utoipa::path(
    post,
    path = "/menu",
    responses(
        (status = 201, description = "Created", body = MenuItem),
        (status = 400, description = "Missing bilingual fields or image")
    )
)]
pub async fn create_menu_item(
    auth: AuthUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<MenuItem>), ApiError> {
    auth.require_role(Role::Admin)?;

    let form = MenuItemForm::from_multipart(multipart).await?;
    let item = create_item(&state, form).await?;

    Ok((StatusCode::CREATED, Json(item)))
}

/// The validation and persistence half of menu creation, split from the
/// multipart extractor so it can be exercised directly in tests.
///
/// Bilingual pairs are required together: a French name without an Arabic
/// one (or vice versa) fails validation and nothing is persisted.
pub async fn create_item(state: &AppState, form: MenuItemForm) -> Result<MenuItem, ApiError> {
    let mut missing = Vec::new();

    let required = |value: &Option<String>, name: &'static str, missing: &mut Vec<&'static str>| {
        match value.as_deref().map(str::trim) {
            Some(v) if !v.is_empty() => Some(v.to_string()),
            _ => {
                missing.push(name);
                None
            }
        }
    };

    let name_ar = required(&form.name_ar, "name_ar", &mut missing);
    let name_fr = required(&form.name_fr, "name_fr", &mut missing);
    let category_ar = required(&form.category_ar, "category_ar", &mut missing);
    let category_fr = required(&form.category_fr, "category_fr", &mut missing);
    let price_raw = required(&form.price, "price", &mut missing);

    if !missing.is_empty() {
        return Err(ApiError::Validation(format!(
            "All required bilingual fields must be provided (missing: {})",
            missing.join(", ")
        )));
    }

    let price = parse_price(&price_raw.unwrap_or_default())?;

    let image = form
        .image
        .ok_or_else(|| ApiError::Validation("Menu item image is required".to_string()))?;
    check_image_type(&image)?;

    // Synchronous, on the critical path: failure here means no local write
    // has happened yet, so there is nothing to roll back.
    let image_url = state
        .uploader
        .upload_image(&image.filename, &image.content_type, image.data)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "image upload failed");
            ApiError::Internal(format!("image upload failed: {e}"))
        })?;

    let item = NewMenuItem {
        name_ar: name_ar.unwrap_or_default(),
        name_fr: name_fr.unwrap_or_default(),
        description_ar: form.description_ar.unwrap_or_default().trim().to_string(),
        description_fr: form.description_fr.unwrap_or_default().trim().to_string(),
        price,
        image: image_url,
        category_ar: category_ar.unwrap_or_default(),
        category_fr: category_fr.unwrap_or_default(),
        show_on_main_page: form.show_on_main_page.unwrap_or(false),
    };

    state.repo.create_menu_item(item).await
}

/// update_menu_item
///
/// [Admin Route] Partial update from a multipart form. A new image replaces
/// the old reference only when one is attached; the previous URI is not
/// cleaned up on the media host.
#[utoipa::path(
    put,
    path = "/menu/{id}",
    params(("id" = Uuid, Path, description = "Menu item ID")),
    responses(
        (status = 200, description = "Updated", body = MenuItem),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_menu_item(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<MenuItem>, ApiError> {
    auth.require_role(Role::Admin)?;

    let form = MenuItemForm::from_multipart(multipart).await?;
    let item = update_item(&state, id, form).await?;

    Ok(Json(item))
}

/// The validation and persistence half of menu updates, split out for tests.
/// Provided fields are re-validated; absent fields stay untouched.
pub async fn update_item(
    state: &AppState,
    id: Uuid,
    form: MenuItemForm,
) -> Result<MenuItem, ApiError> {
    if state.repo.get_menu_item(id).await?.is_none() {
        return Err(ApiError::NotFound("Menu item not found".to_string()));
    }

    let trimmed_required = |value: Option<String>, name: &'static str| match value {
        Some(v) => {
            let v = v.trim().to_string();
            if v.is_empty() {
                Err(ApiError::Validation(format!("{name} must not be empty")))
            } else {
                Ok(Some(v))
            }
        }
        None => Ok(None),
    };

    let price = form.price.as_deref().map(parse_price).transpose()?;

    let image = match form.image {
        Some(image) => {
            check_image_type(&image)?;
            let url = state
                .uploader
                .upload_image(&image.filename, &image.content_type, image.data)
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, "image upload failed");
                    ApiError::Internal(format!("image upload failed: {e}"))
                })?;
            Some(url)
        }
        None => None,
    };

    let changes = MenuItemChanges {
        name_ar: trimmed_required(form.name_ar, "name_ar")?,
        name_fr: trimmed_required(form.name_fr, "name_fr")?,
        description_ar: form.description_ar.map(|v| v.trim().to_string()),
        description_fr: form.description_fr.map(|v| v.trim().to_string()),
        price,
        image,
        category_ar: trimmed_required(form.category_ar, "category_ar")?,
        category_fr: trimmed_required(form.category_fr, "category_fr")?,
        show_on_main_page: form.show_on_main_page,
    };

    state
        .repo
        .update_menu_item(id, changes)
        .await?
        .ok_or_else(|| ApiError::NotFound("Menu item not found".to_string()))
}

/// delete_menu_item
///
/// [Admin Route] Hard delete. The stored image reference is dropped with the
/// row; the hosted file itself is not cleaned up.
#[utoipa::path(
    delete,
    path = "/menu/{id}",
    params(("id" = Uuid, Path, description = "Menu item ID")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_menu_item(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    auth.require_role(Role::Admin)?;

    if !state.repo.delete_menu_item(id).await? {
        return Err(ApiError::NotFound("Menu item not found".to_string()));
    }

    Ok(Json(MessageResponse::new("Menu item deleted successfully")))
}

/// toggle_visibility
///
/// [Admin Route] Inverts the item's public-menu flag. Deliberately not
/// idempotent: calling twice restores the original state.
#[utoipa::path(
    patch,
    path = "/menu/{id}/toggle-visibility",
    params(("id" = Uuid, Path, description = "Menu item ID")),
    responses(
        (status = 200, description = "Toggled", body = MenuItem),
        (status = 404, description = "Not Found")
    )
)]
pub async fn toggle_visibility(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MenuItem>, ApiError> {
    auth.require_role(Role::Admin)?;

    state
        .repo
        .toggle_menu_visibility(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Menu item not found".to_string()))
}
