use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use models::user::ROLE_ADMIN;

/// Login input. Missing fields deserialize as empty and fail as bad credentials.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginInput {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Domain user (business view)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub role: String,
}

/// User plus the stored password hash; never leaves the service.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user: AuthUser,
    pub password_hash: String,
}

/// Decoded session identity carried by the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn is_admin(&self) -> bool { self.role == ROLE_ADMIN }
}

/// Login result (session)
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: AuthUser,
    pub token: String,
    pub expires_in_secs: u64,
}
