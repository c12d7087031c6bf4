use std::sync::Arc;

use argon2::{Argon2, password_hash::{PasswordHasher, PasswordVerifier, SaltString}, PasswordHash};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use rand::rngs::OsRng;
use tracing::{debug, info, instrument};

use super::domain::{AuthSession, AuthUser, Claims, LoginInput};
use super::errors::AuthError;
use super::repository::AuthRepository;

/// Token settings for the auth service
#[derive(Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub session_ttl_secs: u64,
}

/// Auth business service independent of web framework
pub struct AuthService {
    repo: Arc<dyn AuthRepository>,
    settings: AuthSettings,
}

impl AuthService {
    pub fn new(repo: Arc<dyn AuthRepository>, settings: AuthSettings) -> Self { Self { repo, settings } }

    pub fn session_ttl_secs(&self) -> u64 { self.settings.session_ttl_secs }

    pub fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        Ok(Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashError(e.to_string()))?
            .to_string())
    }

    /// Authenticate a user and issue a session token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthService, AuthSettings, repository::mock::MockAuthRepository};
    /// use service::auth::domain::LoginInput;
    /// use std::sync::Arc;
    /// let svc = AuthService::new(Arc::new(MockAuthRepository::default()), AuthSettings { jwt_secret: "secret".into(), session_ttl_secs: 3600 });
    /// tokio_test::block_on(svc.ensure_user("admin@example.com", "Passw0rd", "admin")).unwrap();
    /// let session = tokio_test::block_on(svc.login(LoginInput { email: "admin@example.com".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(session.user.role, "admin");
    /// assert!(svc.verify_token(Some(&session.token)).unwrap().is_admin());
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let email = input.email.trim();
        if email.is_empty() || input.password.is_empty() {
            return Err(AuthError::Unauthorized);
        }
        let record = self.repo.find_user_by_email(email).await?.ok_or(AuthError::Unauthorized)?;

        let parsed = PasswordHash::new(&record.password_hash).map_err(|e| AuthError::HashError(e.to_string()))?;
        if Argon2::default().verify_password(input.password.as_bytes(), &parsed).is_err() {
            debug!("password mismatch");
            return Err(AuthError::Unauthorized);
        }

        let token = self.issue_token(&record.user)?;
        info!(user_id = %record.user.id, role = %record.user.role, "login_succeeded");
        Ok(AuthSession { user: record.user, token, expires_in_secs: self.settings.session_ttl_secs })
    }

    /// Sign `{id, role, iat, exp}` with the configured secret.
    pub fn issue_token(&self, user: &AuthUser) -> Result<String, AuthError> {
        let iat = chrono::Utc::now().timestamp();
        let ttl = i64::try_from(self.settings.session_ttl_secs).map_err(|e| AuthError::TokenError(e.to_string()))?;
        let claims = Claims { id: user.id.to_string(), role: user.role.clone(), iat, exp: iat + ttl };
        encode(&JwtHeader::default(), &claims, &EncodingKey::from_secret(self.settings.jwt_secret.as_bytes()))
            .map_err(|e| AuthError::TokenError(e.to_string()))
    }

    /// Missing token -> `MissingToken`; bad signature or expiry -> `InvalidToken`.
    pub fn verify_token(&self, token: Option<&str>) -> Result<Claims, AuthError> {
        let token = token.map(str::trim).filter(|t| !t.is_empty()).ok_or(AuthError::MissingToken)?;
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &DecodingKey::from_secret(self.settings.jwt_secret.as_bytes()), &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "token rejected");
                AuthError::InvalidToken
            })
    }

    pub fn require_admin(&self, claims: &Claims) -> Result<(), AuthError> {
        if claims.is_admin() { Ok(()) } else { Err(AuthError::Forbidden) }
    }

    /// Create the user unless one with that email already exists.
    /// Returns the user and whether it was created.
    #[instrument(skip(self, password))]
    pub async fn ensure_user(&self, email: &str, password: &str, role: &str) -> Result<(AuthUser, bool), AuthError> {
        let email = email.trim();
        if let Some(existing) = self.repo.find_user_by_email(email).await? {
            return Ok((existing.user, false));
        }
        if password.len() < 8 {
            return Err(AuthError::Validation("password too short (>=8)".into()));
        }
        let hash = self.hash_password(password)?;
        let user = self.repo.create_user(email, hash, role).await?;
        info!(user_id = %user.id, role = %user.role, "user_created");
        Ok((user, true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repository::mock::MockAuthRepository;

    fn svc(secret: &str) -> AuthService {
        AuthService::new(
            Arc::new(MockAuthRepository::default()),
            AuthSettings { jwt_secret: secret.into(), session_ttl_secs: 3600 },
        )
    }

    fn login(email: &str, password: &str) -> LoginInput {
        LoginInput { email: email.into(), password: password.into() }
    }

    #[tokio::test]
    async fn login_issues_token_with_identity() -> anyhow::Result<()> {
        let svc = svc("secret");
        let (user, created) = svc.ensure_user("admin@example.com", "Passw0rd!", "admin").await?;
        assert!(created);

        let session = svc.login(login("admin@example.com", "Passw0rd!")).await?;
        let claims = svc.verify_token(Some(&session.token))?;
        assert_eq!(claims.id, user.id.to_string());
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.exp - claims.iat, 3600);
        assert!(svc.require_admin(&claims).is_ok());
        Ok(())
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_are_unauthorized() -> anyhow::Result<()> {
        let svc = svc("secret");
        svc.ensure_user("a@example.com", "Passw0rd!", "user").await?;
        assert!(matches!(svc.login(login("a@example.com", "nope")).await, Err(AuthError::Unauthorized)));
        assert!(matches!(svc.login(login("b@example.com", "Passw0rd!")).await, Err(AuthError::Unauthorized)));
        assert!(matches!(svc.login(login("", "")).await, Err(AuthError::Unauthorized)));
        Ok(())
    }

    #[tokio::test]
    async fn ensure_user_is_idempotent() -> anyhow::Result<()> {
        let svc = svc("secret");
        let (first, created) = svc.ensure_user("a@example.com", "Passw0rd!", "admin").await?;
        let (second, created_again) = svc.ensure_user("a@example.com", "other-pass", "admin").await?;
        assert!(created);
        assert!(!created_again);
        assert_eq!(first.id, second.id);
        Ok(())
    }

    #[test]
    fn missing_token_differs_from_invalid_token() {
        let svc = svc("secret");
        assert!(matches!(svc.verify_token(None), Err(AuthError::MissingToken)));
        assert!(matches!(svc.verify_token(Some("")), Err(AuthError::MissingToken)));
        assert!(matches!(svc.verify_token(Some("not.a.jwt")), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() -> anyhow::Result<()> {
        let user = AuthUser { id: uuid::Uuid::new_v4(), email: "x@example.com".into(), role: "admin".into() };
        let token = svc("one").issue_token(&user)?;
        assert!(matches!(svc("two").verify_token(Some(&token)), Err(AuthError::InvalidToken)));
        Ok(())
    }

    #[test]
    fn expired_token_is_rejected() -> anyhow::Result<()> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims { id: "x".into(), role: "admin".into(), iat: now - 7200, exp: now - 3600 };
        let token = encode(&JwtHeader::default(), &claims, &EncodingKey::from_secret(b"secret"))?;
        assert!(matches!(svc("secret").verify_token(Some(&token)), Err(AuthError::InvalidToken)));
        Ok(())
    }

    #[test]
    fn non_admin_is_forbidden() {
        let claims = Claims { id: "x".into(), role: "user".into(), iat: 0, exp: 0 };
        assert!(matches!(svc("s").require_admin(&claims), Err(AuthError::Forbidden)));
    }
}
