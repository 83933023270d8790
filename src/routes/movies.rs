use crate::{
    AppState,
    auth::{PermissionGuard, require_permission},
    handlers,
    permissions::{DELETE_MOVIES, GET_MOVIES, PATCH_MOVIES, POST_MOVIES},
};
use axum::{
    Router, middleware,
    routing::{delete, get, patch, post},
};

/// Movie Router Module
///
/// Each verb is its own method router with its own guard layer, so `GET /movies` and
/// `POST /movies` share a path but demand different permissions. Registering the same path
/// twice merges the method routers.
pub fn movie_routes(state: &AppState) -> Router<AppState> {
    let guard = |permission: &'static str| {
        middleware::from_fn_with_state(
            PermissionGuard::new(state.verifier.clone(), permission),
            require_permission,
        )
    };

    Router::new()
        // GET /movies
        .route(
            "/movies",
            get(handlers::get_movies).route_layer(guard(GET_MOVIES)),
        )
        // POST /movies
        .route(
            "/movies",
            post(handlers::create_movie).route_layer(guard(POST_MOVIES)),
        )
        // PATCH /movies/{id}
        .route(
            "/movies/{id}",
            patch(handlers::update_movie).route_layer(guard(PATCH_MOVIES)),
        )
        // DELETE /movies/{id}
        .route(
            "/movies/{id}",
            delete(handlers::delete_movie).route_layer(guard(DELETE_MOVIES)),
        )
}
