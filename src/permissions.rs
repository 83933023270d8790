//! Permission strings carried in the `permissions` claim, and the role presets the identity
//! provider bundles them into.

pub const GET_MOVIES: &str = "get:movies";
pub const POST_MOVIES: &str = "post:movies";
pub const PATCH_MOVIES: &str = "patch:movies";
pub const DELETE_MOVIES: &str = "delete:movies";

pub const GET_ACTORS: &str = "get:actors";
pub const POST_ACTORS: &str = "post:actors";
pub const PATCH_ACTORS: &str = "patch:actors";
pub const DELETE_ACTORS: &str = "delete:actors";

/// Role
///
/// The three roles configured at the identity provider. The API never sees a role name,
/// only the permissions a role expands to; these presets exist so tokens for each role can
/// be described (and minted in tests) in one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Read-only access to both resources.
    CastingAssistant,
    /// Assistant rights plus managing actors and editing movies.
    CastingDirector,
    /// Every permission.
    ExecutiveProducer,
}

impl Role {
    pub fn permissions(self) -> &'static [&'static str] {
        match self {
            Role::CastingAssistant => &[GET_MOVIES, GET_ACTORS],
            Role::CastingDirector => &[
                GET_MOVIES,
                GET_ACTORS,
                POST_ACTORS,
                PATCH_ACTORS,
                DELETE_ACTORS,
                PATCH_MOVIES,
            ],
            Role::ExecutiveProducer => &[
                GET_MOVIES,
                GET_ACTORS,
                POST_ACTORS,
                PATCH_ACTORS,
                DELETE_ACTORS,
                PATCH_MOVIES,
                POST_MOVIES,
                DELETE_MOVIES,
            ],
        }
    }

    pub fn grants(self, permission: &str) -> bool {
        self.permissions().contains(&permission)
    }
}
