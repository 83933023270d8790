use axum::{Router, http::HeaderName};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod permissions;
pub mod repository;

// Routers grouped by resource.
pub mod routes;
use routes::{actors, movies, public};

// --- Public Re-exports ---

pub use auth::{Claims, JwtVerifier, TokenVerifier, VerifierState};
pub use config::AppConfig;
pub use repository::{MemoryRepository, PostgresRepository, RepositoryState};

/// ApiDoc
///
/// OpenAPI document for the whole service, served at `/api-docs/openapi.json` and browsable
/// under `/swagger-ui`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::index,
        handlers::get_movies, handlers::create_movie, handlers::update_movie, handlers::delete_movie,
        handlers::get_actors, handlers::create_actor, handlers::update_actor, handlers::delete_actor,
    ),
    components(
        schemas(
            models::Movie, models::Actor, models::NewMovie, models::NewActor,
            models::MoviePatch, models::ActorPatch, models::MoviesResponse,
            models::ActorsResponse, models::SuccessResponse, models::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "casting-agency", description = "Casting Agency API")
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by every protected path.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// AppState
///
/// The explicitly constructed application context handed to every handler. It is cheap to
/// clone (two `Arc`s) and holds no mutable state of its own.
#[derive(Clone)]
pub struct AppState {
    /// Persistence: Postgres in deployment, in-memory locally and in tests.
    pub repo: RepositoryState,
    /// Bearer token verification.
    pub verifier: VerifierState,
}

/// create_router
///
/// Assembles every route, the permission guards, the JSON 404 fallback and the
/// observability layers.
pub fn create_router(state: AppState) -> Router {
    // Any origin may call the API; the bearer token is the only gate.
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .merge(movies::movie_routes(&state))
        .merge(actors::actor_routes(&state))
        // Applies to every route registered above.
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .fallback(handlers::not_found)
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(
                    x_request_id.clone(),
                    MakeRequestUuid,
                ))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span for one request, tagged with the `x-request-id` set by the layer above it so every
/// log line of a request can be correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
