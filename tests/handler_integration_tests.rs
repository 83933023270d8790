use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use casting_agency::{
    AppState,
    auth::{Claims, JwtVerifier},
    config::AppConfig,
    error::ApiError,
    extract::{JsonBody, ResourceId},
    handlers,
    models::{Actor, ActorPatch, Movie, MoviePatch, NewActor, NewMovie},
    repository::{MemoryRepository, RepoError, RepoResult, Repository},
};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::test;

// --- TEST UTILITIES ---

// Creates an AppState around a fresh in-memory repository.
fn create_test_state() -> AppState {
    let config = AppConfig::default();
    AppState {
        repo: Arc::new(MemoryRepository::new()),
        verifier: Arc::new(JwtVerifier::from_settings(&config.jwt).unwrap()),
    }
}

// A store whose every call fails the way an exhausted pool does.
struct UnavailableRepository;

fn unavailable<T>() -> RepoResult<T> {
    Err(RepoError::Database(sqlx::Error::PoolTimedOut))
}

#[async_trait]
impl Repository for UnavailableRepository {
    async fn list_movies(&self) -> RepoResult<Vec<Movie>> {
        unavailable()
    }
    async fn get_movie(&self, _id: i32) -> RepoResult<Option<Movie>> {
        unavailable()
    }
    async fn create_movie(&self, _movie: NewMovie) -> RepoResult<Movie> {
        unavailable()
    }
    async fn update_movie(&self, _movie: &Movie) -> RepoResult<Movie> {
        unavailable()
    }
    async fn delete_movie(&self, _id: i32) -> RepoResult<()> {
        unavailable()
    }
    async fn list_actors(&self) -> RepoResult<Vec<Actor>> {
        unavailable()
    }
    async fn get_actor(&self, _id: i32) -> RepoResult<Option<Actor>> {
        unavailable()
    }
    async fn create_actor(&self, _actor: NewActor) -> RepoResult<Actor> {
        unavailable()
    }
    async fn update_actor(&self, _actor: &Actor) -> RepoResult<Actor> {
        unavailable()
    }
    async fn delete_actor(&self, _id: i32) -> RepoResult<()> {
        unavailable()
    }
}

fn create_failing_state() -> AppState {
    let config = AppConfig::default();
    AppState {
        repo: Arc::new(UnavailableRepository),
        verifier: Arc::new(JwtVerifier::from_settings(&config.jwt).unwrap()),
    }
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// Claims as the guard would have injected them.
fn producer() -> Extension<Claims> {
    Extension(Claims {
        sub: Some("auth0|producer".to_string()),
        exp: 0,
        permissions: Some(vec![]),
    })
}

fn kingdom() -> NewMovie {
    NewMovie {
        title: "kingdom".to_string(),
        release_date: "25-10-2019".to_string(),
    }
}

fn mennsa() -> NewActor {
    NewActor {
        name: "mennsa shelaby".to_string(),
        age: 30,
        gender: "female".to_string(),
    }
}

// --- HANDLER TESTS ---

#[test]
async fn test_index_greeting() {
    assert_eq!(handlers::index().await, "hello world");
}

#[test]
async fn test_create_movie_then_list() {
    let state = create_test_state();

    let Json(created) =
        handlers::create_movie(producer(), State(state.clone()), JsonBody(kingdom()))
            .await
            .unwrap();
    assert!(created.success);

    let Json(listing) = handlers::get_movies(producer(), State(state)).await.unwrap();
    assert!(listing.success);
    assert_eq!(listing.movies.len(), 1);
    assert_eq!(listing.movies[0].title, "kingdom");
    assert_eq!(listing.movies[0].release_date, "25-10-2019");
}

#[test]
async fn test_create_actor_then_list() {
    let state = create_test_state();

    handlers::create_actor(producer(), State(state.clone()), JsonBody(mennsa()))
        .await
        .unwrap();

    let Json(listing) = handlers::get_actors(producer(), State(state)).await.unwrap();
    assert_eq!(listing.actors.len(), 1);
    assert_eq!(listing.actors[0].name, "mennsa shelaby");
    assert_eq!(listing.actors[0].age, 30);
}

#[test]
async fn test_update_movie_partially_keeps_other_fields() {
    let state = create_test_state();
    handlers::create_movie(producer(), State(state.clone()), JsonBody(kingdom()))
        .await
        .unwrap();

    let patch = MoviePatch {
        title: Some("new-title".to_string()),
        release_date: None,
    };
    handlers::update_movie(producer(), State(state.clone()), ResourceId(1), JsonBody(patch))
        .await
        .unwrap();

    let movie = state.repo.get_movie(1).await.unwrap().unwrap();
    assert_eq!(movie.title, "new-title");
    assert_eq!(movie.release_date, "25-10-2019");
}

#[test]
async fn test_update_actor_partially_keeps_other_fields() {
    let state = create_test_state();
    handlers::create_actor(producer(), State(state.clone()), JsonBody(mennsa()))
        .await
        .unwrap();

    let patch = ActorPatch {
        name: Some("new-name".to_string()),
        ..ActorPatch::default()
    };
    handlers::update_actor(producer(), State(state.clone()), ResourceId(1), JsonBody(patch))
        .await
        .unwrap();

    let actor = state.repo.get_actor(1).await.unwrap().unwrap();
    assert_eq!(actor.name, "new-name");
    assert_eq!(actor.age, 30);
    assert_eq!(actor.gender, "female");
}

// PATCH on an id with no record answers 404 instead of faulting.
#[test]
async fn test_update_unknown_movie_is_not_found() {
    let state = create_test_state();

    let result = handlers::update_movie(
        producer(),
        State(state),
        ResourceId(42),
        JsonBody(MoviePatch::default()),
    )
    .await;

    let err = result.unwrap_err();
    assert!(matches!(err, ApiError::NotFound));
    assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
}

#[test]
async fn test_update_unknown_actor_is_not_found() {
    let state = create_test_state();

    let result = handlers::update_actor(
        producer(),
        State(state),
        ResourceId(42),
        JsonBody(ActorPatch::default()),
    )
    .await;

    assert!(matches!(result, Err(ApiError::NotFound)));
}

#[test]
async fn test_delete_movie_removes_it() {
    let state = create_test_state();
    handlers::create_movie(producer(), State(state.clone()), JsonBody(kingdom()))
        .await
        .unwrap();
    handlers::create_movie(producer(), State(state.clone()), JsonBody(kingdom()))
        .await
        .unwrap();

    let Json(deleted) = handlers::delete_movie(producer(), State(state.clone()), ResourceId(2))
        .await
        .unwrap();
    assert!(deleted.success);

    assert!(state.repo.get_movie(2).await.unwrap().is_none());
    let Json(listing) = handlers::get_movies(producer(), State(state)).await.unwrap();
    assert_eq!(listing.movies.iter().map(|m| m.id).collect::<Vec<_>>(), vec![1]);
}

// The second delete of the same id finds nothing and answers 404.
#[test]
async fn test_delete_actor_twice() {
    let state = create_test_state();
    handlers::create_actor(producer(), State(state.clone()), JsonBody(mennsa()))
        .await
        .unwrap();

    assert!(
        handlers::delete_actor(producer(), State(state.clone()), ResourceId(1))
            .await
            .is_ok()
    );

    let second = handlers::delete_actor(producer(), State(state), ResourceId(1)).await;
    assert!(matches!(second, Err(ApiError::NotFound)));
}

#[test]
async fn test_fallback_is_json_not_found() {
    let response = handlers::not_found().await.into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], 404);
    assert_eq!(body["code"], "not_found");
}

#[test]
async fn test_database_failure_is_sanitized_500() {
    let err = handlers::get_movies(producer(), State(create_failing_state()))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Repository(RepoError::Database(_))));

    let response = err.into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], 500);
    assert_eq!(body["code"], "internal_server_error");
    let message = body["message"].as_str().unwrap();
    assert!(!message.to_lowercase().contains("pool"));
    assert!(!message.contains("database error"));
}

#[test]
async fn test_failed_write_is_500_not_404() {
    let response = handlers::create_actor(
        producer(),
        State(create_failing_state()),
        JsonBody(mennsa()),
    )
    .await
    .unwrap_err()
    .into_response();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["code"], "internal_server_error");
}

#[test]
async fn test_method_not_allowed_fallback_is_json() {
    let response = handlers::method_not_allowed().await.into_response();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], 405);
    assert_eq!(body["code"], "method_not_allowed");
}
