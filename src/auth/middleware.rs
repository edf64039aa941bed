//! Session gate middleware for protected routes
//!
//! Runs the full token check (signature, claims, whitelist) before any
//! protected handler executes, and inserts the verified member into request
//! extensions for handlers to extract.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};

use crate::app_state::AppState;

use super::error::AuthError;

/// Require a valid, currently whitelisted bearer token.
pub async fn require_auth(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let Some(TypedHeader(Authorization(bearer))) = bearer else {
        return Err(AuthError::InvalidToken("missing bearer token".into()));
    };

    let member = state.auth_service.authenticate(bearer.token()).await?;

    request.extensions_mut().insert(member);
    Ok(next.run(request).await)
}
