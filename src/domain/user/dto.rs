//! User DTOs.

/// Input for account creation. Carries the raw password; the service hashes
/// it before anything touches a repository.
#[derive(Debug, Clone)]
pub struct CreateUserDto {
    pub email: String,
    pub name: String,
    pub password: String,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub family_id: Option<String>,
}

/// Partial profile update. `None` leaves a field untouched. There is no role
/// field: roles are immutable after creation.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserDto {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub family_id: Option<String>,
    pub password: Option<String>,
}

/// Repository-level patch, produced by the service after password hashing.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub family_id: Option<String>,
    pub password_hash: Option<String>,
}
