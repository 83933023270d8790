use casting_agency::{
    AppState,
    auth::{JwtVerifier, VerifierState},
    config::{AppConfig, Env},
    create_router,
    repository::{MemoryRepository, PostgresRepository, RepositoryState},
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Loads configuration, initialises logging, opens the store, builds the token verifier
/// and serves the router.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Configuration (fail-fast on missing production secrets).
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging: RUST_LOG wins, otherwise sensible development defaults.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "casting_agency=debug,tower_http=info".into());

    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    // 3. Persistence: Postgres when configured, in-memory otherwise (local only).
    let repo = match &config.db_url {
        Some(db_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(db_url)
                .await?;
            let postgres = PostgresRepository::new(pool);
            postgres.migrate().await?;
            tracing::info!("Connected to Postgres; schema is up to date.");
            Arc::new(postgres) as RepositoryState
        }
        None => {
            tracing::warn!("DATABASE_URL not set; records live in memory only.");
            Arc::new(MemoryRepository::new()) as RepositoryState
        }
    };

    // 4. Token verification.
    let verifier = Arc::new(JwtVerifier::from_settings(&config.jwt)?) as VerifierState;

    // 5. Router and server startup.
    let bind_addr = config.bind_addr;
    let app = create_router(AppState { repo, verifier });

    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!("Listening on {}", bind_addr);
    tracing::info!("API documentation available at http://{}/swagger-ui", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
