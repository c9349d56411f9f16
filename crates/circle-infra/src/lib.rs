//! # Circle Infrastructure
//!
//! Concrete implementations of the ports defined in `circle-core`:
//! document storage, token/credential services and upload storage.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL document storage via SeaORM
//! - `auth` - JWT + Argon2 authentication

pub mod database;
pub mod media;

#[cfg(feature = "auth")]
pub mod auth;

pub use database::{DatabaseConfig, InMemoryStore};
pub use media::{LocalMediaStore, MediaConfig};

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};

#[cfg(feature = "postgres")]
pub use database::{
    PostgresAccountRepository, PostgresPostRepository, PostgresProfileRepository,
    PostgresUserRepository,
};
