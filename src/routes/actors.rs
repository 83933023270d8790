use crate::{
    AppState,
    auth::{PermissionGuard, require_permission},
    handlers,
    permissions::{DELETE_ACTORS, GET_ACTORS, PATCH_ACTORS, POST_ACTORS},
};
use axum::{
    Router, middleware,
    routing::{delete, get, patch, post},
};

/// Actor Router Module
///
/// Each verb is its own method router with its own guard layer, so `GET /actors` and
/// `POST /actors` share a path but demand different permissions. Registering the same path
/// twice merges the method routers.
pub fn actor_routes(state: &AppState) -> Router<AppState> {
    let guard = |permission: &'static str| {
        middleware::from_fn_with_state(
            PermissionGuard::new(state.verifier.clone(), permission),
            require_permission,
        )
    };

    Router::new()
        // GET /actors
        .route(
            "/actors",
            get(handlers::get_actors).route_layer(guard(GET_ACTORS)),
        )
        // POST /actors
        .route(
            "/actors",
            post(handlers::create_actor).route_layer(guard(POST_ACTORS)),
        )
        // PATCH /actors/{id}
        .route(
            "/actors/{id}",
            patch(handlers::update_actor).route_layer(guard(PATCH_ACTORS)),
        )
        // DELETE /actors/{id}
        .route(
            "/actors/{id}",
            delete(handlers::delete_actor).route_layer(guard(DELETE_ACTORS)),
        )
}
