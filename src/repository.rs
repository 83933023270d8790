use crate::models::{Actor, Movie, NewActor, NewMovie};
use async_trait::async_trait;
use sqlx::PgPool;
use std::{collections::BTreeMap, sync::Arc};
use tokio::sync::RwLock;

/// RepoError
///
/// Typed failure for every persistence operation. A lookup that finds nothing is *not* an
/// error (it yields `Ok(None)`); `NotFound` is reserved for writes aimed at an identity that
/// does not exist.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository Trait
///
/// The persistence contract the handlers depend on. Entities are plain data; all reads and
/// writes go through these functions so the HTTP layer never touches a connection directly.
///
/// **Send + Sync + async_trait** are required so `Arc<dyn Repository>` can live in the
/// shared application state across Axum's task boundaries.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Movies ---
    /// All movies ordered by ascending id.
    async fn list_movies(&self) -> RepoResult<Vec<Movie>>;
    async fn get_movie(&self, id: i32) -> RepoResult<Option<Movie>>;
    async fn create_movie(&self, movie: NewMovie) -> RepoResult<Movie>;
    /// Persists the current field values of an already loaded movie.
    async fn update_movie(&self, movie: &Movie) -> RepoResult<Movie>;
    async fn delete_movie(&self, id: i32) -> RepoResult<()>;

    // --- Actors ---
    /// All actors ordered by ascending id.
    async fn list_actors(&self) -> RepoResult<Vec<Actor>>;
    async fn get_actor(&self, id: i32) -> RepoResult<Option<Actor>>;
    async fn create_actor(&self, actor: NewActor) -> RepoResult<Actor>;
    /// Persists the current field values of an already loaded actor.
    async fn update_actor(&self, actor: &Actor) -> RepoResult<Actor>;
    async fn delete_actor(&self, id: i32) -> RepoResult<()>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// The production implementation of [`Repository`], backed by a PostgreSQL pool.
/// Every write runs inside its own transaction; returning early drops the transaction
/// uncommitted, which rolls it back.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the `movies` and `actors` tables if they are missing.
    pub async fn migrate(&self) -> RepoResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    async fn list_movies(&self) -> RepoResult<Vec<Movie>> {
        let movies = sqlx::query_as::<_, Movie>(
            "SELECT id, title, release_date FROM movies ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(movies)
    }

    async fn get_movie(&self, id: i32) -> RepoResult<Option<Movie>> {
        let movie = sqlx::query_as::<_, Movie>(
            "SELECT id, title, release_date FROM movies WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(movie)
    }

    async fn create_movie(&self, movie: NewMovie) -> RepoResult<Movie> {
        let mut tx = self.pool.begin().await?;
        let created = sqlx::query_as::<_, Movie>(
            r#"INSERT INTO movies (title, release_date) VALUES ($1, $2)
               RETURNING id, title, release_date"#,
        )
        .bind(movie.title)
        .bind(movie.release_date)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;

        tracing::debug!(movie_id = created.id, "movie inserted");
        Ok(created)
    }

    async fn update_movie(&self, movie: &Movie) -> RepoResult<Movie> {
        let mut tx = self.pool.begin().await?;
        let updated = sqlx::query_as::<_, Movie>(
            r#"UPDATE movies SET title = $2, release_date = $3 WHERE id = $1
               RETURNING id, title, release_date"#,
        )
        .bind(movie.id)
        .bind(&movie.title)
        .bind(&movie.release_date)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepoError::NotFound {
            entity: "movie",
            id: movie.id,
        })?;
        tx.commit().await?;
        Ok(updated)
    }

    async fn delete_movie(&self, id: i32) -> RepoResult<()> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound { entity: "movie", id });
        }
        tx.commit().await?;
        Ok(())
    }

    async fn list_actors(&self) -> RepoResult<Vec<Actor>> {
        let actors = sqlx::query_as::<_, Actor>(
            "SELECT id, name, age, gender FROM actors ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(actors)
    }

    async fn get_actor(&self, id: i32) -> RepoResult<Option<Actor>> {
        let actor = sqlx::query_as::<_, Actor>(
            "SELECT id, name, age, gender FROM actors WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(actor)
    }

    async fn create_actor(&self, actor: NewActor) -> RepoResult<Actor> {
        let mut tx = self.pool.begin().await?;
        let created = sqlx::query_as::<_, Actor>(
            r#"INSERT INTO actors (name, age, gender) VALUES ($1, $2, $3)
               RETURNING id, name, age, gender"#,
        )
        .bind(actor.name)
        .bind(actor.age)
        .bind(actor.gender)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;

        tracing::debug!(actor_id = created.id, "actor inserted");
        Ok(created)
    }

    async fn update_actor(&self, actor: &Actor) -> RepoResult<Actor> {
        let mut tx = self.pool.begin().await?;
        let updated = sqlx::query_as::<_, Actor>(
            r#"UPDATE actors SET name = $2, age = $3, gender = $4 WHERE id = $1
               RETURNING id, name, age, gender"#,
        )
        .bind(actor.id)
        .bind(&actor.name)
        .bind(actor.age)
        .bind(&actor.gender)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepoError::NotFound {
            entity: "actor",
            id: actor.id,
        })?;
        tx.commit().await?;
        Ok(updated)
    }

    async fn delete_actor(&self, id: i32) -> RepoResult<()> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("DELETE FROM actors WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound { entity: "actor", id });
        }
        tx.commit().await?;
        Ok(())
    }
}

/// One in-memory table: rows keyed by id plus the last id handed out.
/// Ids are never reused, mirroring a SERIAL column.
struct Table<T> {
    rows: BTreeMap<i32, T>,
    last_id: i32,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

impl<T> Table<T> {
    fn next_id(&mut self) -> i32 {
        self.last_id += 1;
        self.last_id
    }
}

/// MemoryRepository
///
/// An in-process implementation of [`Repository`]. Used when running locally without
/// `DATABASE_URL` and by the test suites in place of Postgres.
#[derive(Default)]
pub struct MemoryRepository {
    movies: RwLock<Table<Movie>>,
    actors: RwLock<Table<Actor>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn list_movies(&self) -> RepoResult<Vec<Movie>> {
        Ok(self.movies.read().await.rows.values().cloned().collect())
    }

    async fn get_movie(&self, id: i32) -> RepoResult<Option<Movie>> {
        Ok(self.movies.read().await.rows.get(&id).cloned())
    }

    async fn create_movie(&self, movie: NewMovie) -> RepoResult<Movie> {
        let mut table = self.movies.write().await;
        let created = Movie {
            id: table.next_id(),
            title: movie.title,
            release_date: movie.release_date,
        };
        table.rows.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_movie(&self, movie: &Movie) -> RepoResult<Movie> {
        let mut table = self.movies.write().await;
        let stored = table.rows.get_mut(&movie.id).ok_or(RepoError::NotFound {
            entity: "movie",
            id: movie.id,
        })?;
        *stored = movie.clone();
        Ok(movie.clone())
    }

    async fn delete_movie(&self, id: i32) -> RepoResult<()> {
        self.movies
            .write()
            .await
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound { entity: "movie", id })
    }

    async fn list_actors(&self) -> RepoResult<Vec<Actor>> {
        Ok(self.actors.read().await.rows.values().cloned().collect())
    }

    async fn get_actor(&self, id: i32) -> RepoResult<Option<Actor>> {
        Ok(self.actors.read().await.rows.get(&id).cloned())
    }

    async fn create_actor(&self, actor: NewActor) -> RepoResult<Actor> {
        let mut table = self.actors.write().await;
        let created = Actor {
            id: table.next_id(),
            name: actor.name,
            age: actor.age,
            gender: actor.gender,
        };
        table.rows.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_actor(&self, actor: &Actor) -> RepoResult<Actor> {
        let mut table = self.actors.write().await;
        let stored = table.rows.get_mut(&actor.id).ok_or(RepoError::NotFound {
            entity: "actor",
            id: actor.id,
        })?;
        *stored = actor.clone();
        Ok(actor.clone())
    }

    async fn delete_actor(&self, id: i32) -> RepoResult<()> {
        self.actors
            .write()
            .await
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound { entity: "actor", id })
    }
}
