/// Router Module Index
///
/// Routes are grouped by resource. Every route outside `public` is wrapped in the
/// permission guard with exactly one required permission.

/// Routes accessible without a token.
pub mod public;

/// `/movies` and `/movies/{id}`.
pub mod movies;

/// `/actors` and `/actors/{id}`.
pub mod actors;
