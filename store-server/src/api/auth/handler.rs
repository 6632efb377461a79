//! Auth API Handlers

use axum::{extract::State, Extension, Json};
use serde_json::json;

use shared::models::{LoginRequest, LoginResponse, UserInfo};

use crate::activity::ActivityAction;
use crate::auth::{self, CurrentUser};
use crate::core::ServerState;
use crate::db::repository::user;
use crate::utils::validation::{validate_required_text, MAX_PASSWORD_LEN, MAX_SHORT_TEXT_LEN};
use crate::utils::{AppError, AppResult};

/// POST /api/auth/login
///
/// A fixed delay and a single error message for every failure mode keep
/// responses from leaking whether the username exists.
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    tokio::time::sleep(std::time::Duration::from_millis(500)).await;

    validate_required_text(&payload.username, "username", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&payload.password, "password", MAX_PASSWORD_LEN)?;

    let user = user::find_by_username(&state.pool, &payload.username).await?;
    let user = match user {
        Some(u) if u.is_active && auth::verify_password(&payload.password, &u.password_hash) => u,
        _ => {
            state.activity.record(
                None,
                None,
                ActivityAction::LoginFailed,
                &payload.username,
                json!({}),
            );
            return Err(AppError::invalid_credentials());
        }
    };

    let token = state
        .jwt_service
        .generate_token(user.id, &user.username, &user.role)
        .map_err(|e| AppError::internal(e.to_string()))?;

    tracing::info!(username = %user.username, "Login succeeded");
    Ok(Json(LoginResponse {
        token,
        expires_in: state.jwt_service.config.expiration_minutes * 60,
        user: UserInfo::from(&user),
    }))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<UserInfo>> {
    let user = user::find_by_id(&state.pool, current.id)
        .await?
        .ok_or_else(|| AppError::not_found("User no longer exists"))?;
    Ok(Json(UserInfo::from(&user)))
}
