//! Authentication module for the back-office API
//!
//! Provides email/password authentication for members.
//! - bcrypt password verification
//! - HS256 JWT issuance and validation
//! - Redis-backed single-active-token whitelist per member

pub mod error;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod service;
pub mod store;

pub use error::AuthError;
pub use jwt::{Claims, IssuedToken, TokenIssuer};
pub use middleware::require_auth;
pub use service::{AuthService, AuthenticatedMember};
pub use store::{MemoryTokenStore, RedisTokenStore, TokenStore};
