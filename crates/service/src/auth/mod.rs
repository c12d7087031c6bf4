//! Auth module: domain, repository, service.
//!
//! Login against stored users, stateless session tokens (HS256 JWT) and the
//! admin role gate used by the HTTP access middleware.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::{AuthService, AuthSettings};
