use async_trait::async_trait;

use super::domain::{AuthUser, UserRecord};
use super::errors::AuthError;

/// Repository abstraction for auth-related persistence.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, AuthError>;
    async fn create_user(&self, email: &str, password_hash: String, role: &str) -> Result<AuthUser, AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use tokio::sync::RwLock;
    use uuid::Uuid;

    #[derive(Default)]
    pub struct MockAuthRepository {
        users: RwLock<HashMap<String, UserRecord>>, // key: email
    }

    #[async_trait]
    impl AuthRepository for MockAuthRepository {
        async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, AuthError> {
            Ok(self.users.read().await.get(email).cloned())
        }

        async fn create_user(&self, email: &str, password_hash: String, role: &str) -> Result<AuthUser, AuthError> {
            let mut users = self.users.write().await;
            if users.contains_key(email) {
                return Err(AuthError::Validation(format!("user {} already exists", email)));
            }
            let user = AuthUser { id: Uuid::new_v4(), email: email.to_string(), role: role.to_string() };
            users.insert(email.to_string(), UserRecord { user: user.clone(), password_hash });
            Ok(user)
        }
    }
}
