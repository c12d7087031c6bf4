use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub uploads: UploadConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port(), worker_threads: Some(4) }
    }
}

fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 4000 }

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
    #[serde(default = "default_true")]
    pub auto_migrate: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
            auto_migrate: true,
        }
    }
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 1 }
fn default_connect_timeout() -> u64 { 5 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }
fn default_true() -> bool { true }

/// SameSite attribute of the session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SameSitePolicy {
    #[default]
    Lax,
    Strict,
    None,
}

impl std::str::FromStr for SameSitePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lax" => Ok(Self::Lax),
            "strict" => Ok(Self::Strict),
            "none" => Ok(Self::None),
            other => Err(anyhow!("unknown same_site policy: {other}")),
        }
    }
}

pub const DEV_JWT_SECRET: &str = "dev-secret-change-me";

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: u64,
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    #[serde(default)]
    pub cookie_secure: bool,
    #[serde(default)]
    pub cookie_same_site: SameSitePolicy,
    #[serde(default)]
    pub bootstrap_admin_email: Option<String>,
    #[serde(default)]
    pub bootstrap_admin_password: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            session_ttl_secs: default_session_ttl(),
            cookie_name: default_cookie_name(),
            cookie_secure: false,
            cookie_same_site: SameSitePolicy::Lax,
            bootstrap_admin_email: None,
            bootstrap_admin_password: None,
        }
    }
}

fn default_session_ttl() -> u64 { 60 * 60 }
fn default_cookie_name() -> String { "token".into() }

#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self { max_bytes: default_max_bytes(), chunk_size: default_chunk_size() }
    }
}

fn default_max_bytes() -> usize { 5 * 1024 * 1024 }
fn default_chunk_size() -> usize { 255 * 1024 }

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CorsConfig {
    /// Empty means mirror the caller's origin.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`) when present, otherwise start from
    /// defaults, then fill gaps from the environment and validate.
    pub fn load_and_validate() -> Result<Self> {
        let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        let mut cfg = if std::path::Path::new(&path).exists() {
            load_from_file(&path)?
        } else {
            AppConfig::default()
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.normalize_with(&|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::normalize_and_validate`] with an injectable env lookup.
    pub fn normalize_with(&mut self, env: &dyn Fn(&str) -> Option<String>) -> Result<()> {
        self.server.normalize(env)?;
        self.database.normalize_from_env(env);
        self.database.validate()?;
        self.auth.normalize(env)?;
        self.auth.validate()?;
        self.uploads.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self, env: &dyn Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(host) = env("SERVER_HOST") {
            self.host = host;
        }
        if let Some(port) = env("SERVER_PORT") {
            self.port = port
                .parse::<u16>()
                .map_err(|e| anyhow!("SERVER_PORT is not a valid port: {e}"))?;
        }
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn normalize_from_env(&mut self, env: &dyn Fn(&str) -> Option<String>) {
        if self.url.trim().is_empty() {
            if let Some(url) = env("DATABASE_URL") {
                self.url = url;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://")) {
            return Err(anyhow!("database.url must start with postgresql:// or postgres://"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive"));
        }
        Ok(())
    }
}

impl AuthConfig {
    fn normalize(&mut self, env: &dyn Fn(&str) -> Option<String>) -> Result<()> {
        if self.jwt_secret.trim().is_empty() {
            self.jwt_secret = env("JWT_SECRET").unwrap_or_else(|| DEV_JWT_SECRET.to_string());
        }
        if self.bootstrap_admin_email.is_none() {
            self.bootstrap_admin_email = env("ADMIN_EMAIL");
        }
        if self.bootstrap_admin_password.is_none() {
            self.bootstrap_admin_password = env("ADMIN_PASSWORD");
        }
        if self.cookie_name.trim().is_empty() {
            self.cookie_name = default_cookie_name();
        }
        if let Some(policy) = env("COOKIE_SAME_SITE") {
            self.cookie_same_site = policy.parse()?;
        }
        if let Some(secure) = env("COOKIE_SECURE") {
            self.cookie_secure = secure
                .trim()
                .parse::<bool>()
                .map_err(|e| anyhow!("COOKIE_SECURE must be true or false: {e}"))?;
        }
        Ok(())
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }

    pub fn validate(&self) -> Result<()> {
        if self.session_ttl_secs == 0 {
            return Err(anyhow!("auth.session_ttl_secs must be positive"));
        }
        if self.cookie_same_site == SameSitePolicy::None && !self.cookie_secure {
            return Err(anyhow!("auth.cookie_same_site = \"none\" requires cookie_secure = true"));
        }
        if self.bootstrap_admin_email.is_some() != self.bootstrap_admin_password.is_some() {
            return Err(anyhow!("bootstrap admin needs both email and password"));
        }
        Ok(())
    }
}

impl UploadConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_bytes == 0 {
            return Err(anyhow!("uploads.max_bytes must be positive"));
        }
        if self.chunk_size == 0 {
            return Err(anyhow!("uploads.chunk_size must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> { None }

    #[test]
    fn empty_toml_uses_defaults() -> Result<()> {
        let cfg: AppConfig = toml::from_str("")?;
        assert_eq!(cfg.server.port, 4000);
        assert_eq!(cfg.auth.session_ttl_secs, 3600);
        assert_eq!(cfg.auth.cookie_name, "token");
        assert_eq!(cfg.auth.cookie_same_site, SameSitePolicy::Lax);
        assert_eq!(cfg.uploads.max_bytes, 5 * 1024 * 1024);
        assert!(cfg.database.auto_migrate);
        Ok(())
    }

    #[test]
    fn env_fills_database_url_and_secret() -> Result<()> {
        let mut cfg = AppConfig::default();
        cfg.normalize_with(&|key| match key {
            "DATABASE_URL" => Some("postgres://u:p@localhost/catalog".into()),
            "JWT_SECRET" => Some("s3cret".into()),
            "SERVER_PORT" => Some("8088".into()),
            _ => None,
        })?;
        assert_eq!(cfg.database.url, "postgres://u:p@localhost/catalog");
        assert_eq!(cfg.auth.jwt_secret, "s3cret");
        assert_eq!(cfg.server.port, 8088);
        assert!(!cfg.auth.uses_dev_secret());
        Ok(())
    }

    #[test]
    fn missing_database_url_is_rejected() {
        let mut cfg = AppConfig::default();
        assert!(cfg.normalize_with(&no_env).is_err());
    }

    #[test]
    fn same_site_none_requires_secure() -> Result<()> {
        let mut cfg: AppConfig = toml::from_str(
            r#"
            [database]
            url = "postgres://localhost/catalog"
            [auth]
            cookie_same_site = "none"
            "#,
        )?;
        assert!(cfg.normalize_with(&no_env).is_err());
        cfg.auth.cookie_secure = true;
        cfg.normalize_with(&no_env)?;
        assert!(cfg.auth.uses_dev_secret());
        Ok(())
    }

    #[test]
    fn bootstrap_admin_requires_both_fields() -> Result<()> {
        let mut cfg: AppConfig = toml::from_str(
            r#"
            [database]
            url = "postgres://localhost/catalog"
            [auth]
            bootstrap_admin_email = "admin@example.com"
            "#,
        )?;
        assert!(cfg.normalize_with(&no_env).is_err());
        Ok(())
    }

    #[test]
    fn cookie_policy_env_overrides_file() -> Result<()> {
        let mut cfg: AppConfig = toml::from_str(
            r#"
            [database]
            url = "postgres://localhost/catalog"
            [auth]
            cookie_same_site = "lax"
            "#,
        )?;
        cfg.normalize_with(&|key| match key {
            "COOKIE_SAME_SITE" => Some("Strict".into()),
            _ => None,
        })?;
        assert_eq!(cfg.auth.cookie_same_site, SameSitePolicy::Strict);

        cfg.normalize_with(&|key| match key {
            "COOKIE_SAME_SITE" => Some("none".into()),
            "COOKIE_SECURE" => Some("true".into()),
            _ => None,
        })?;
        assert_eq!(cfg.auth.cookie_same_site, SameSitePolicy::None);
        assert!(cfg.auth.cookie_secure);
        Ok(())
    }

    #[test]
    fn bad_cookie_env_values_are_rejected() {
        let mut cfg = AppConfig::default();
        cfg.database.url = "postgres://localhost/catalog".into();
        assert!(cfg
            .normalize_with(&|key| (key == "COOKIE_SAME_SITE").then(|| "sideways".to_string()))
            .is_err());

        let mut cfg = AppConfig::default();
        cfg.database.url = "postgres://localhost/catalog".into();
        assert!(cfg
            .normalize_with(&|key| (key == "COOKIE_SAME_SITE").then(|| "none".to_string()))
            .is_err());
    }
}
