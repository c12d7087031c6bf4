use std::sync::Arc;

use axum_extra::extract::cookie::{Cookie, SameSite};
use configs::{AppConfig, SameSitePolicy};
use sea_orm::DatabaseConnection;
use service::auth::repo::SeaOrmAuthRepository;
use service::auth::{AuthService, AuthSettings};
use service::blob::seaorm::SeaOrmBlobStore;
use service::product::repo::SeaOrmProductRepository;
use service::product::ProductService;

/// Session cookie attributes.
#[derive(Clone, Debug)]
pub struct SessionCookie {
    pub name: String,
    pub ttl_secs: u64,
    pub secure: bool,
    pub same_site: SameSitePolicy,
}

impl SessionCookie {
    pub fn from_config(cfg: &configs::AuthConfig) -> Self {
        Self {
            name: cfg.cookie_name.clone(),
            ttl_secs: cfg.session_ttl_secs,
            secure: cfg.cookie_secure,
            same_site: cfg.cookie_same_site,
        }
    }

    fn base(&self, value: String) -> Cookie<'static> {
        let same_site = match self.same_site {
            SameSitePolicy::Lax => SameSite::Lax,
            SameSitePolicy::Strict => SameSite::Strict,
            SameSitePolicy::None => SameSite::None,
        };
        Cookie::build((self.name.clone(), value))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(same_site)
            .build()
    }

    pub fn session(&self, token: String) -> Cookie<'static> {
        let mut cookie = self.base(token);
        cookie.set_max_age(time::Duration::seconds(i64::try_from(self.ttl_secs).unwrap_or(i64::MAX)));
        cookie
    }

    /// Expired cookie with the same attributes, so browsers drop the session.
    pub fn removal(&self) -> Cookie<'static> {
        let mut cookie = self.base(String::new());
        cookie.make_removal();
        cookie
    }
}

#[derive(Clone)]
pub struct ServerState {
    pub products: Arc<ProductService>,
    pub auth: Arc<AuthService>,
    pub session: SessionCookie,
    pub upload_limit: usize,
}

impl ServerState {
    /// Wire the SeaORM-backed repositories and blob store around one pool.
    pub fn from_db(db: DatabaseConnection, cfg: &AppConfig) -> Self {
        let blobs = Arc::new(SeaOrmBlobStore::new(db.clone(), cfg.uploads.chunk_size));
        let products = Arc::new(ProductService::new(Arc::new(SeaOrmProductRepository { db: db.clone() }), blobs));
        let auth = Arc::new(AuthService::new(
            Arc::new(SeaOrmAuthRepository { db }),
            AuthSettings { jwt_secret: cfg.auth.jwt_secret.clone(), session_ttl_secs: cfg.auth.session_ttl_secs },
        ));
        Self { products, auth, session: SessionCookie::from_config(&cfg.auth), upload_limit: cfg.uploads.max_bytes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookie_carries_configured_attributes() {
        let session = SessionCookie { name: "token".into(), ttl_secs: 3600, secure: false, same_site: SameSitePolicy::Lax };
        let rendered = session.session("abc".into()).to_string();
        assert!(rendered.starts_with("token=abc"));
        assert!(rendered.contains("HttpOnly"));
        assert!(rendered.contains("Path=/"));
        assert!(rendered.contains("Max-Age=3600"));
        assert!(rendered.contains("SameSite=Lax"));
        assert!(!rendered.contains("Secure"));
    }

    #[test]
    fn removal_cookie_expires_immediately() {
        let session = SessionCookie { name: "token".into(), ttl_secs: 3600, secure: true, same_site: SameSitePolicy::None };
        let rendered = session.removal().to_string();
        assert!(rendered.starts_with("token=;"));
        assert!(rendered.contains("Max-Age=0"));
        assert!(rendered.contains("Secure"));
        assert!(rendered.contains("SameSite=None"));
    }
}
