use casting_agency::{
    models::{Actor, ActorPatch, ErrorResponse, Movie, MoviePatch, NewActor, NewMovie},
    permissions::{
        DELETE_ACTORS, DELETE_MOVIES, GET_ACTORS, GET_MOVIES, PATCH_ACTORS, PATCH_MOVIES,
        POST_ACTORS, POST_MOVIES, Role,
    },
};
use serde_json::json;

// --- Serialization ---

#[test]
fn test_movie_serializes_with_flat_keys() {
    let movie = Movie {
        id: 1,
        title: "kingdom".to_string(),
        release_date: "25-10-2019".to_string(),
    };

    assert_eq!(
        serde_json::to_value(&movie).unwrap(),
        json!({ "id": 1, "title": "kingdom", "release_date": "25-10-2019" })
    );
}

#[test]
fn test_actor_serializes_with_flat_keys() {
    let actor = Actor {
        id: 3,
        name: "Ahmed Helmy".to_string(),
        age: 50,
        gender: "male".to_string(),
    };

    assert_eq!(
        serde_json::to_value(&actor).unwrap(),
        json!({ "id": 3, "name": "Ahmed Helmy", "age": 50, "gender": "male" })
    );
}

#[test]
fn test_error_response_shape() {
    let body = ErrorResponse {
        success: false,
        error: 403,
        code: "unauthorized".to_string(),
        message: "Permission not found.".to_string(),
    };

    assert_eq!(
        serde_json::to_value(&body).unwrap(),
        json!({
            "success": false,
            "error": 403,
            "code": "unauthorized",
            "message": "Permission not found.",
        })
    );
}

// --- Create payloads ---

#[test]
fn test_new_movie_requires_every_field() {
    let missing = serde_json::from_value::<NewMovie>(json!({ "title": "kingdom" }));
    assert!(missing.is_err());

    let complete: NewMovie =
        serde_json::from_value(json!({ "title": "kingdom", "release_date": "25-10-2019" }))
            .unwrap();
    assert_eq!(complete.title, "kingdom");
}

#[test]
fn test_new_actor_rejects_non_integer_age() {
    let result = serde_json::from_value::<NewActor>(json!({
        "name": "Ahmed Helmy",
        "age": "fifty",
        "gender": "male",
    }));

    assert!(result.is_err());
}

// --- Partial updates ---

#[test]
fn test_movie_patch_keeps_absent_fields() {
    let mut movie = Movie {
        id: 1,
        title: "kingdom".to_string(),
        release_date: "25-10-2019".to_string(),
    };

    let patch: MoviePatch = serde_json::from_value(json!({ "title": "kingdom II" })).unwrap();
    patch.apply_to(&mut movie);

    assert_eq!(movie.id, 1);
    assert_eq!(movie.title, "kingdom II");
    assert_eq!(movie.release_date, "25-10-2019");
}

#[test]
fn test_empty_actor_patch_changes_nothing() {
    let original = Actor {
        id: 2,
        name: "Mona Zaki".to_string(),
        age: 47,
        gender: "female".to_string(),
    };
    let mut actor = original.clone();

    let patch: ActorPatch = serde_json::from_value(json!({})).unwrap();
    patch.apply_to(&mut actor);

    assert_eq!(actor, original);
}

#[test]
fn test_actor_patch_ignores_unknown_keys() {
    let mut actor = Actor {
        id: 2,
        name: "Mona Zaki".to_string(),
        age: 47,
        gender: "female".to_string(),
    };

    let patch: ActorPatch =
        serde_json::from_value(json!({ "age": 48, "id": 99, "nickname": "x" })).unwrap();
    patch.apply_to(&mut actor);

    assert_eq!(actor.id, 2);
    assert_eq!(actor.age, 48);
}

// --- Roles ---

#[test]
fn test_casting_assistant_is_read_only() {
    let role = Role::CastingAssistant;

    assert!(role.grants(GET_MOVIES));
    assert!(role.grants(GET_ACTORS));
    for permission in [POST_MOVIES, PATCH_MOVIES, DELETE_MOVIES, POST_ACTORS, PATCH_ACTORS, DELETE_ACTORS] {
        assert!(!role.grants(permission), "assistant must not hold {permission}");
    }
}

#[test]
fn test_casting_director_manages_actors_but_not_movie_lifecycle() {
    let role = Role::CastingDirector;

    for permission in [GET_MOVIES, GET_ACTORS, POST_ACTORS, PATCH_ACTORS, DELETE_ACTORS, PATCH_MOVIES] {
        assert!(role.grants(permission), "director must hold {permission}");
    }
    assert!(!role.grants(POST_MOVIES));
    assert!(!role.grants(DELETE_MOVIES));
}

#[test]
fn test_executive_producer_holds_every_permission() {
    let role = Role::ExecutiveProducer;

    assert_eq!(role.permissions().len(), 8);
    assert!(role.grants(POST_MOVIES));
    assert!(role.grants(DELETE_MOVIES));
}
