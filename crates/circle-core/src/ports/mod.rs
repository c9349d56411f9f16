//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod media;
mod repository;

pub use auth::{AuthError, PasswordService, TokenClaims, TokenService};
pub use media::{MediaError, MediaStore, StoredMedia};
pub use repository::{
    AccountRemoval, AccountRepository, BaseRepository, PostRepository, ProfileRepository,
    UserRepository,
};
