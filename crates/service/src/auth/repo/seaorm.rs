use sea_orm::DatabaseConnection;

use crate::auth::domain::{AuthUser, UserRecord};
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;
use models::errors::ModelError;

pub struct SeaOrmAuthRepository {
    pub db: DatabaseConnection,
}

fn to_user(u: &models::user::Model) -> AuthUser {
    AuthUser { id: u.id, email: u.email.clone(), role: u.role.clone() }
}

#[async_trait::async_trait]
impl AuthRepository for SeaOrmAuthRepository {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, AuthError> {
        let res = models::user::find_by_email(&self.db, email)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(res.map(|u| UserRecord { user: to_user(&u), password_hash: u.password_hash }))
    }

    async fn create_user(&self, email: &str, password_hash: String, role: &str) -> Result<AuthUser, AuthError> {
        let created = models::user::create(&self.db, email, password_hash, role)
            .await
            .map_err(|e| match e {
                ModelError::Validation(msg) => AuthError::Validation(msg),
                ModelError::Db(msg) => AuthError::Repository(msg),
            })?;
        Ok(to_user(&created))
    }
}
