use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;

// --- Core Application Schemas (Mapped to Database) ---

/// Movie
///
/// A row of the `movies` table. The identity is assigned by the database sequence and is
/// never changed after insertion. The release date is kept as the text the client supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Movie {
    pub id: i32,
    pub title: String,
    #[schema(example = "25-10-2019")]
    pub release_date: String,
}

/// Actor
///
/// A row of the `actors` table. Same lifecycle as [`Movie`]; no relationship between the two
/// is modelled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Actor {
    pub id: i32,
    pub name: String,
    pub age: i32,
    pub gender: String,
}

// --- Request Payloads (Input Schemas) ---

/// NewMovie
///
/// Input payload for POST /movies. Every field is required.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct NewMovie {
    pub title: String,
    #[schema(example = "25-10-2019")]
    pub release_date: String,
}

/// NewActor
///
/// Input payload for POST /actors. Every field is required.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct NewActor {
    pub name: String,
    pub age: i32,
    pub gender: String,
}

/// MoviePatch
///
/// Partial update payload for PATCH /movies/{id}. Absent fields keep their stored value.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct MoviePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
}

impl MoviePatch {
    /// Overwrites only the fields present in the patch.
    pub fn apply_to(self, movie: &mut Movie) {
        if let Some(title) = self.title {
            movie.title = title;
        }
        if let Some(release_date) = self.release_date {
            movie.release_date = release_date;
        }
    }
}

/// ActorPatch
///
/// Partial update payload for PATCH /actors/{id}. Absent fields keep their stored value.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ActorPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

impl ActorPatch {
    pub fn apply_to(self, actor: &mut Actor) {
        if let Some(name) = self.name {
            actor.name = name;
        }
        if let Some(age) = self.age {
            actor.age = age;
        }
        if let Some(gender) = self.gender {
            actor.gender = gender;
        }
    }
}

// --- Response Envelopes (Output Schemas) ---

/// MoviesResponse
///
/// Body of GET /movies.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct MoviesResponse {
    pub success: bool,
    pub movies: Vec<Movie>,
}

/// ActorsResponse
///
/// Body of GET /actors.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ActorsResponse {
    pub success: bool,
    pub actors: Vec<Actor>,
}

/// SuccessResponse
///
/// Body returned by every successful write (POST, PATCH, DELETE).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// ErrorResponse
///
/// The single error shape used by every failure, whether raised by the auth guard,
/// body parsing, routing or the repository.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ErrorResponse {
    pub success: bool,
    /// The HTTP status code, repeated in the body.
    #[schema(example = 401)]
    pub error: u16,
    /// Machine-readable failure code, e.g. `authorization_header_missing`.
    #[schema(example = "authorization_header_missing")]
    pub code: String,
    #[schema(example = "Authorization header is expected.")]
    pub message: String,
}
