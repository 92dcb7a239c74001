use std::str::FromStr;

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    AppState,
    auth::AuthUser,
    error::ApiError,
    models::{MessageResponse, Platform, Role, SocialLink, UpdateSocialLinkRequest},
};

/// get_social_links
///
/// [Public Route] Lists active links with a non-empty URL, sorted by
/// platform name.
#[utoipa::path(
    get,
    path = "/social-media",
    responses((status = 200, description = "Active social links", body = [SocialLink]))
)]
pub async fn get_social_links(
    State(state): State<AppState>,
) -> Result<Json<Vec<SocialLink>>, ApiError> {
    Ok(Json(state.repo.list_social_links(true).await?))
}

/// get_admin_social_links
///
/// [Admin Route] Lists every stored link, inactive and empty ones included.
#[utoipa::path(
    get,
    path = "/social-media/admin",
    responses((status = 200, description = "All social links", body = [SocialLink]))
)]
pub async fn get_admin_social_links(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<SocialLink>>, ApiError> {
    auth.require_role(Role::Admin)?;
    Ok(Json(state.repo.list_social_links(false).await?))
}

/// update_social_link
///
/// [Admin Route] Upserts the link for one platform. An empty URL with
/// `active: false` clears the entry without URL validation; otherwise the
/// URL must start with http:// or https://.
#[utoipa::path(
    put,
    path = "/social-media/{platform}",
    params(("platform" = String, Path, description = "Platform name")),
    request_body = UpdateSocialLinkRequest,
    responses(
        (status = 200, description = "Upserted", body = SocialLink),
        (status = 400, description = "Unknown platform or malformed URL")
    )
)]
pub async fn update_social_link(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(platform): Path<String>,
    Json(payload): Json<UpdateSocialLinkRequest>,
) -> Result<Json<SocialLink>, ApiError> {
    auth.require_role(Role::Admin)?;

    let platform = Platform::from_str(&platform)
        .map_err(|_| ApiError::Validation(format!("Unknown platform: {platform}")))?;

    let url = payload.url.trim().to_string();
    let active = payload.active.unwrap_or(true);

    // An empty URL paired with active=false unsets the link entirely.
    let unsetting = url.is_empty() && !active;
    let well_formed = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .is_some_and(|rest| !rest.is_empty());
    if !unsetting && !well_formed {
        return Err(ApiError::Validation(
            "URL must start with http:// or https://".to_string(),
        ));
    }

    Ok(Json(
        state.repo.upsert_social_link(platform, &url, active).await?,
    ))
}

/// delete_social_link
///
/// [Admin Route] Removes the stored link for a platform. Unknown platform
/// names map to 404 here rather than 400, matching delete-by-id semantics.
#[utoipa::path(
    delete,
    path = "/social-media/{platform}",
    params(("platform" = String, Path, description = "Platform name")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_social_link(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(platform): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    auth.require_role(Role::Admin)?;

    let platform = Platform::from_str(&platform)
        .map_err(|_| ApiError::NotFound(format!("Unknown platform: {platform}")))?;

    if !state.repo.delete_social_link(platform).await? {
        return Err(ApiError::NotFound("Social link not found".to_string()));
    }

    Ok(Json(MessageResponse::new("Social link deleted successfully")))
}
