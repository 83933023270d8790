use crate::{
    AppState,
    auth::Claims,
    error::{ApiError, ApiResult},
    extract::{JsonBody, ResourceId},
    models::{
        ActorPatch, ActorsResponse, ErrorResponse, MoviePatch, MoviesResponse, NewActor,
        NewMovie, SuccessResponse,
    },
    repository::Repository,
};
use axum::{
    Extension, Json,
    extract::State,
};

// --- Public Handlers ---

/// index
///
/// [Public Route] Fixed greeting, kept as the root health probe.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Greeting", body = String))
)]
pub async fn index() -> &'static str {
    "hello world"
}

/// not_found
///
/// Router fallback: every unmatched path gets the JSON 404 body.
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

/// method_not_allowed
///
/// Known path, unsupported verb (`PUT /movies`, `GET /movies/1`).
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

// --- Movies ---

/// get_movies
///
/// [get:movies] Lists every movie ordered by id.
#[utoipa::path(
    get,
    path = "/movies",
    security(("bearer_auth" = ["get:movies"])),
    responses(
        (status = 200, description = "All movies", body = MoviesResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Permission not granted", body = ErrorResponse)
    )
)]
pub async fn get_movies(
    Extension(_claims): Extension<Claims>,
    State(state): State<AppState>,
) -> ApiResult<Json<MoviesResponse>> {
    let movies = state.repo.list_movies().await?;
    Ok(Json(MoviesResponse {
        success: true,
        movies,
    }))
}

/// create_movie
///
/// [post:movies] Inserts a movie from a complete payload.
#[utoipa::path(
    post,
    path = "/movies",
    security(("bearer_auth" = ["post:movies"])),
    request_body = NewMovie,
    responses(
        (status = 200, description = "Created", body = SuccessResponse),
        (status = 400, description = "Missing or incomplete body", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Permission not granted", body = ErrorResponse)
    )
)]
pub async fn create_movie(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<NewMovie>,
) -> ApiResult<Json<SuccessResponse>> {
    let movie = state.repo.create_movie(payload).await?;
    tracing::info!(movie_id = movie.id, sub = claims.subject(), "movie created");
    Ok(Json(SuccessResponse::ok()))
}

/// update_movie
///
/// [patch:movies] Loads the movie, overwrites only the fields present in the body and
/// saves it. An unknown id answers 404 rather than failing inside the update.
#[utoipa::path(
    patch,
    path = "/movies/{id}",
    security(("bearer_auth" = ["patch:movies"])),
    params(("id" = i32, Path, description = "Movie id")),
    request_body = MoviePatch,
    responses(
        (status = 200, description = "Updated", body = SuccessResponse),
        (status = 400, description = "Missing or malformed body", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Permission not granted", body = ErrorResponse),
        (status = 404, description = "No movie with that id", body = ErrorResponse)
    )
)]
pub async fn update_movie(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
    JsonBody(patch): JsonBody<MoviePatch>,
) -> ApiResult<Json<SuccessResponse>> {
    let mut movie = state.repo.get_movie(id).await?.ok_or(ApiError::NotFound)?;
    patch.apply_to(&mut movie);
    state.repo.update_movie(&movie).await?;
    tracing::info!(movie_id = id, sub = claims.subject(), "movie updated");
    Ok(Json(SuccessResponse::ok()))
}

/// delete_movie
///
/// [delete:movies] Removes a movie. Deleting an id twice answers 404 the second time.
#[utoipa::path(
    delete,
    path = "/movies/{id}",
    security(("bearer_auth" = ["delete:movies"])),
    params(("id" = i32, Path, description = "Movie id")),
    responses(
        (status = 200, description = "Deleted", body = SuccessResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Permission not granted", body = ErrorResponse),
        (status = 404, description = "No movie with that id", body = ErrorResponse)
    )
)]
pub async fn delete_movie(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> ApiResult<Json<SuccessResponse>> {
    let movie = state.repo.get_movie(id).await?.ok_or(ApiError::NotFound)?;
    state.repo.delete_movie(movie.id).await?;
    tracing::info!(movie_id = id, sub = claims.subject(), "movie deleted");
    Ok(Json(SuccessResponse::ok()))
}

// --- Actors ---

/// get_actors
///
/// [get:actors] Lists every actor ordered by id.
#[utoipa::path(
    get,
    path = "/actors",
    security(("bearer_auth" = ["get:actors"])),
    responses(
        (status = 200, description = "All actors", body = ActorsResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Permission not granted", body = ErrorResponse)
    )
)]
pub async fn get_actors(
    Extension(_claims): Extension<Claims>,
    State(state): State<AppState>,
) -> ApiResult<Json<ActorsResponse>> {
    let actors = state.repo.list_actors().await?;
    Ok(Json(ActorsResponse {
        success: true,
        actors,
    }))
}

/// create_actor
///
/// [post:actors] Inserts an actor from a complete payload.
#[utoipa::path(
    post,
    path = "/actors",
    security(("bearer_auth" = ["post:actors"])),
    request_body = NewActor,
    responses(
        (status = 200, description = "Created", body = SuccessResponse),
        (status = 400, description = "Missing or incomplete body", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Permission not granted", body = ErrorResponse)
    )
)]
pub async fn create_actor(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<NewActor>,
) -> ApiResult<Json<SuccessResponse>> {
    let actor = state.repo.create_actor(payload).await?;
    tracing::info!(actor_id = actor.id, sub = claims.subject(), "actor created");
    Ok(Json(SuccessResponse::ok()))
}

/// update_actor
///
/// [patch:actors] Partial update; fields absent from the body keep their stored value.
#[utoipa::path(
    patch,
    path = "/actors/{id}",
    security(("bearer_auth" = ["patch:actors"])),
    params(("id" = i32, Path, description = "Actor id")),
    request_body = ActorPatch,
    responses(
        (status = 200, description = "Updated", body = SuccessResponse),
        (status = 400, description = "Missing or malformed body", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Permission not granted", body = ErrorResponse),
        (status = 404, description = "No actor with that id", body = ErrorResponse)
    )
)]
pub async fn update_actor(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
    JsonBody(patch): JsonBody<ActorPatch>,
) -> ApiResult<Json<SuccessResponse>> {
    let mut actor = state.repo.get_actor(id).await?.ok_or(ApiError::NotFound)?;
    patch.apply_to(&mut actor);
    state.repo.update_actor(&actor).await?;
    tracing::info!(actor_id = id, sub = claims.subject(), "actor updated");
    Ok(Json(SuccessResponse::ok()))
}

/// delete_actor
///
/// [delete:actors] Removes an actor.
#[utoipa::path(
    delete,
    path = "/actors/{id}",
    security(("bearer_auth" = ["delete:actors"])),
    params(("id" = i32, Path, description = "Actor id")),
    responses(
        (status = 200, description = "Deleted", body = SuccessResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Permission not granted", body = ErrorResponse),
        (status = 404, description = "No actor with that id", body = ErrorResponse)
    )
)]
pub async fn delete_actor(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> ApiResult<Json<SuccessResponse>> {
    let actor = state.repo.get_actor(id).await?.ok_or(ApiError::NotFound)?;
    state.repo.delete_actor(actor.id).await?;
    tracing::info!(actor_id = id, sub = claims.subject(), "actor deleted");
    Ok(Json(SuccessResponse::ok()))
}
