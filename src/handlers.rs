//! API handlers for the back-office auth endpoints

use axum::{extract::State, Extension, Json};
use validator::Validate;

use crate::app_state::AppState;
use crate::auth::{AuthError, AuthenticatedMember};
use crate::models::{ApiResponse, LoginRequest, LoginResponse, MemberSummary};

/// Authenticate a member and return a session token.
pub async fn login(
    State(app_state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, AuthError> {
    request
        .validate()
        .map_err(|e| AuthError::Validation(e.to_string()))?;

    let issued = app_state
        .auth_service
        .login(&request.email, &request.password)
        .await?;

    Ok(Json(ApiResponse::ok(LoginResponse {
        token: issued.token,
        expiration_time_epoch_millis: issued.expires_at_epoch_millis,
    })))
}

/// Summary of the authenticated member.
pub async fn me(
    State(app_state): State<AppState>,
    Extension(member): Extension<AuthenticatedMember>,
) -> Result<Json<ApiResponse<MemberSummary>>, AuthError> {
    let summary = app_state.auth_service.current_member(member.id).await?;
    Ok(Json(ApiResponse::ok(summary)))
}

/// Invalidate the authenticated member's current session.
pub async fn logout(
    State(app_state): State<AppState>,
    Extension(member): Extension<AuthenticatedMember>,
) -> Result<Json<ApiResponse<()>>, AuthError> {
    app_state.auth_service.logout(member.id).await?;
    Ok(Json(ApiResponse::ok(())))
}
