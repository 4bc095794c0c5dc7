//! User accounts

/// A user account, created lazily on first reference by email
///
/// The credential is an opaque randomly generated secret set once at
/// creation; this system never rotates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Row identifier
    pub id: i64,

    /// Unique email address (normalized at the boundary)
    pub email: String,

    /// Opaque generated credential
    pub credential: String,

    /// Creation timestamp (Unix epoch seconds)
    pub created_at: u64,
}
