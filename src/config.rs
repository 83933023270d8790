use jsonwebtoken::Algorithm;
use std::env;

/// Secret used in local mode when `JWT_SECRET` is not set.
pub const LOCAL_JWT_SECRET: &str = "casting-agency-local-secret";

/// Default listen address, the same host and port the service has always used.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

/// AppConfig
///
/// The application's whole configuration, loaded once at startup and shared immutably
/// through the application state.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Controls log format and which secrets are mandatory.
    pub env: Env,
    // Postgres connection string. `None` is only accepted locally and selects the in-memory store.
    pub db_url: Option<String>,
    // Socket address the HTTP server binds to.
    pub bind_addr: String,
    // Everything the token verifier needs.
    pub jwt: JwtSettings,
}

/// Env
///
/// Defines the runtime context: pretty logs and relaxed defaults locally, JSON logs and
/// mandatory secrets in production.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

/// JwtSettings
///
/// How bearer tokens issued by the external identity provider are verified.
/// `key` is the shared secret for HMAC algorithms or a PEM public key for RSA ones.
#[derive(Clone, Debug)]
pub struct JwtSettings {
    pub algorithm: Algorithm,
    pub key: String,
    pub audience: Option<String>,
    pub issuer: Option<String>,
}

impl Default for AppConfig {
    /// Safe, non-panicking values for test state setup.
    fn default() -> Self {
        Self {
            env: Env::Local,
            db_url: None,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            jwt: JwtSettings {
                algorithm: Algorithm::HS256,
                key: LOCAL_JWT_SECRET.to_string(),
                audience: None,
                issuer: None,
            },
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from environment variables.
    ///
    /// | Env Var          | Local default                 | Production |
    /// |------------------|-------------------------------|------------|
    /// | `APP_ENV`        | `local`                       | `production` |
    /// | `DATABASE_URL`   | unset (in-memory store)       | **required** |
    /// | `BIND_ADDR`      | `127.0.0.1:8080`              | same default |
    /// | `JWT_ALGORITHM`  | `HS256`                       | `RS256` |
    /// | `JWT_SECRET`     | [`LOCAL_JWT_SECRET`]          | **required** for HS* |
    /// | `JWT_PUBLIC_KEY` | unset                         | **required** otherwise |
    /// | `JWT_AUDIENCE`   | unset                         | optional |
    /// | `JWT_ISSUER`     | unset                         | optional |
    ///
    /// # Panics
    /// Panics if a variable required for the current environment is missing or malformed,
    /// so the service never starts with an incomplete or insecure configuration.
    pub fn load() -> Self {
        let env = match env::var("APP_ENV").as_deref() {
            Ok("production") => Env::Production,
            _ => Env::Local,
        };

        let algorithm = match env::var("JWT_ALGORITHM") {
            Ok(name) => name
                .parse::<Algorithm>()
                .unwrap_or_else(|_| panic!("FATAL: unsupported JWT_ALGORITHM '{name}'")),
            Err(_) if env == Env::Production => Algorithm::RS256,
            Err(_) => Algorithm::HS256,
        };

        let hmac = matches!(
            algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        );
        let key = match (hmac, &env) {
            (false, _) => env::var("JWT_PUBLIC_KEY")
                .expect("FATAL: JWT_PUBLIC_KEY must be set for asymmetric token verification."),
            (true, Env::Production) => env::var("JWT_SECRET")
                .expect("FATAL: JWT_SECRET must be set in production."),
            (true, Env::Local) => {
                env::var("JWT_SECRET").unwrap_or_else(|_| LOCAL_JWT_SECRET.to_string())
            }
        };

        let db_url = match env {
            Env::Production => Some(
                env::var("DATABASE_URL").expect("FATAL: DATABASE_URL required in production"),
            ),
            Env::Local => env::var("DATABASE_URL").ok(),
        };

        Self {
            env,
            db_url,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            jwt: JwtSettings {
                algorithm,
                key,
                audience: env::var("JWT_AUDIENCE").ok(),
                issuer: env::var("JWT_ISSUER").ok(),
            },
        }
    }
}
