use axum::{Json, extract::State};

use crate::{
    AppState,
    auth::AuthUser,
    error::ApiError,
    models::{Role, UpdateWorkingHoursRequest, WorkingHours},
};

/// Accepts wall-clock times as `H:MM` or `HH:MM`, 24-hour.
pub fn is_valid_time(value: &str) -> bool {
    let Some((hours, minutes)) = value.split_once(':') else {
        return false;
    };
    if hours.is_empty() || hours.len() > 2 || minutes.len() != 2 {
        return false;
    }
    let Ok(h) = hours.parse::<u8>() else {
        return false;
    };
    let Ok(m) = minutes.parse::<u8>() else {
        return false;
    };
    h <= 23 && m <= 59
}

/// get_working_hours
///
/// [Public Route] Returns the single stored schedule, or the built-in
/// 09:00-23:00 default when nothing has been saved yet.
#[utoipa::path(
    get,
    path = "/working-times",
    responses((status = 200, description = "Current schedule", body = WorkingHours))
)]
pub async fn get_working_hours(
    State(state): State<AppState>,
) -> Result<Json<WorkingHours>, ApiError> {
    Ok(Json(state.repo.get_working_hours().await?.unwrap_or_default()))
}

/// update_working_hours
///
/// [Admin Route] Replaces the schedule. Both times must be well-formed
/// `HH:MM`; overnight spans where close precedes open are accepted as-is.
#[utoipa::path(
    patch,
    path = "/working-times",
    request_body = UpdateWorkingHoursRequest,
    responses(
        (status = 200, description = "Updated", body = WorkingHours),
        (status = 400, description = "Malformed time")
    )
)]
pub async fn update_working_hours(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<UpdateWorkingHoursRequest>,
) -> Result<Json<WorkingHours>, ApiError> {
    auth.require_role(Role::Admin)?;

    let open = payload.open.trim();
    let close = payload.close.trim();

    if !is_valid_time(open) || !is_valid_time(close) {
        return Err(ApiError::Validation(
            "Times must be in HH:MM 24-hour format".to_string(),
        ));
    }

    Ok(Json(state.repo.upsert_working_hours(open, close).await?))
}
