use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{config::JwtSettings, error::error_response};

/// Claims
///
/// The part of the identity provider's JWT payload this service reads. `permissions` is
/// optional at the type level so a token that omits it can be told apart from one that
/// grants nothing.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Claims {
    /// Subject: the identity provider's user id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Expiration time (seconds since the epoch). Defaulted here so a token without it
    /// reaches jsonwebtoken's required-claim check instead of failing to deserialize.
    #[serde(default)]
    pub exp: u64,
    /// Permission strings such as `get:movies`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
}

impl Claims {
    /// Subject for log lines.
    pub fn subject(&self) -> &str {
        self.sub.as_deref().unwrap_or("unknown")
    }
}

/// AuthError
///
/// Every reason the auth guard can refuse a request. Each carries an HTTP status, a
/// machine-readable code and a human description (the `Display` text).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Authorization header is expected.")]
    HeaderMissing,

    /// The header is present but is not `Bearer <token>`.
    #[error("{0}")]
    MalformedHeader(&'static str),

    #[error("Token expired.")]
    TokenExpired,

    /// Wrong audience or issuer, a missing registered claim, or no `permissions` list.
    #[error("{0}")]
    InvalidClaims(&'static str),

    /// Bad signature, wrong key or an unparsable token.
    #[error("Unable to parse authentication token.")]
    InvalidToken,

    /// A valid token that does not carry the route's permission.
    #[error("Permission not found.")]
    PermissionDenied,
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::PermissionDenied => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AuthError::HeaderMissing => "authorization_header_missing",
            AuthError::MalformedHeader(_) | AuthError::InvalidToken => "invalid_header",
            AuthError::TokenExpired => "token_expired",
            AuthError::InvalidClaims(_) => "invalid_claims",
            AuthError::PermissionDenied => "unauthorized",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        error_response(self.status(), self.code(), self.to_string())
    }
}

/// extract_bearer_token
///
/// Pulls the raw token out of `Authorization: Bearer <token>`. The scheme is matched
/// case-insensitively; anything other than exactly two parts is rejected.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::HeaderMissing)?
        .to_str()
        .map_err(|_| AuthError::MalformedHeader("Authorization header must be visible ASCII."))?;

    let parts: Vec<&str> = value.split_whitespace().collect();
    match parts.as_slice() {
        [] => Err(AuthError::HeaderMissing),
        [scheme, ..] if !scheme.eq_ignore_ascii_case("bearer") => Err(
            AuthError::MalformedHeader("Authorization header must start with \"Bearer\"."),
        ),
        [_] => Err(AuthError::MalformedHeader("Token not found.")),
        [_, token] => Ok(*token),
        _ => Err(AuthError::MalformedHeader(
            "Authorization header must be bearer token.",
        )),
    }
}

/// check_permissions
///
/// Requires the claims to carry a `permissions` list containing `permission`.
pub fn check_permissions(permission: &str, claims: &Claims) -> Result<(), AuthError> {
    let granted = claims
        .permissions
        .as_ref()
        .ok_or(AuthError::InvalidClaims("Permissions not included in JWT."))?;

    if granted.iter().any(|p| p == permission) {
        Ok(())
    } else {
        Err(AuthError::PermissionDenied)
    }
}

/// TokenVerifier
///
/// The seam to the token-verification collaborator: given the raw bearer string it returns
/// decoded claims or one of the token failures (expired, invalid claims, invalid token).
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<Claims, AuthError>;
}

/// VerifierState
///
/// The shared handle to the verifier held in the application state.
pub type VerifierState = Arc<dyn TokenVerifier>;

/// JwtVerifier
///
/// [`TokenVerifier`] backed by `jsonwebtoken`. The signing key is supplied by configuration
/// (shared secret for HS*, PEM public key otherwise); expiry is always checked, audience and
/// issuer only when configured.
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn from_settings(settings: &JwtSettings) -> Result<Self, jsonwebtoken::errors::Error> {
        let pem = settings.key.as_bytes();
        let key = match settings.algorithm {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => DecodingKey::from_secret(pem),
            Algorithm::RS256
            | Algorithm::RS384
            | Algorithm::RS512
            | Algorithm::PS256
            | Algorithm::PS384
            | Algorithm::PS512 => DecodingKey::from_rsa_pem(pem)?,
            Algorithm::ES256 | Algorithm::ES384 => DecodingKey::from_ec_pem(pem)?,
            _ => DecodingKey::from_ed_pem(pem)?,
        };

        let mut validation = Validation::new(settings.algorithm);
        validation.validate_exp = true;
        match &settings.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }
        if let Some(issuer) = &settings.issuer {
            validation.set_issuer(&[issuer]);
        }

        Ok(Self { key, validation })
    }
}

impl TokenVerifier for JwtVerifier {
    fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        match decode::<Claims>(token, &self.key, &self.validation) {
            Ok(data) => Ok(data.claims),
            Err(e) => match e.kind() {
                ErrorKind::ExpiredSignature => Err(AuthError::TokenExpired),
                ErrorKind::InvalidAudience
                | ErrorKind::InvalidIssuer
                | ErrorKind::ImmatureSignature
                | ErrorKind::MissingRequiredClaim(_) => Err(AuthError::InvalidClaims(
                    "Incorrect claims. Please, check the audience and issuer.",
                )),
                _ => Err(AuthError::InvalidToken),
            },
        }
    }
}

/// PermissionGuard
///
/// State for one instance of the [`require_permission`] middleware: the verifier plus the
/// single permission the wrapped route demands.
#[derive(Clone)]
pub struct PermissionGuard {
    verifier: VerifierState,
    permission: &'static str,
}

impl PermissionGuard {
    pub fn new(verifier: VerifierState, permission: &'static str) -> Self {
        Self {
            verifier,
            permission,
        }
    }

    pub fn permission(&self) -> &'static str {
        self.permission
    }

    /// Runs the whole guard against a set of request headers.
    pub fn authorize(&self, headers: &HeaderMap) -> Result<Claims, AuthError> {
        let token = extract_bearer_token(headers)?;
        let claims = self.verifier.verify(token)?;
        check_permissions(self.permission, &claims)?;
        Ok(claims)
    }
}

/// require_permission
///
/// Middleware that runs before handler dispatch. On success the verified [`Claims`] are
/// inserted into the request extensions, where handlers pick them up with
/// `Extension<Claims>`. On failure the request never reaches the handler.
pub async fn require_permission(
    State(guard): State<PermissionGuard>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    match guard.authorize(request.headers()) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            Ok(next.run(request).await)
        }
        Err(err) => {
            tracing::warn!(
                code = err.code(),
                permission = guard.permission(),
                "request rejected by auth guard"
            );
            Err(err)
        }
    }
}
