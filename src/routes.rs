//! Route definitions for the back-office API

use axum::{middleware, routing::get, routing::post, Router};

use crate::app_state::AppState;
use crate::auth::require_auth;
use crate::handlers::*;

/// Auth routes. `/auth/me` and `/auth/logout` sit behind the session gate;
/// `/auth/login` is open.
pub fn auth_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/auth/me", get(me))
        .route("/auth/logout", post(logout))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    Router::new()
        .route("/auth/login", post(login))
        .merge(protected)
}
