use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Post, PostChange, Profile, ProfileChange, ProfileFields, User};
use crate::error::{DomainError, RepoError};

/// Generic repository trait defining standard document operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity. Unique-field clashes yield `RepoError::Constraint`.
    async fn create(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Fetch several users at once; missing ids are skipped.
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError>;
}

/// Profile repository. Every nested-list change is applied atomically.
#[async_trait]
pub trait ProfileRepository: BaseRepository<Profile, Uuid> {
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<Profile>, RepoError>;

    async fn list(&self) -> Result<Vec<Profile>, RepoError>;

    /// Create the user's profile, or overwrite its top-level fields.
    async fn upsert(&self, user_id: Uuid, fields: ProfileFields) -> Result<Profile, RepoError>;

    /// Load the user's profile, apply `change` and persist it as one unit.
    async fn modify(&self, user_id: Uuid, change: ProfileChange) -> Result<Profile, DomainError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<Post>, RepoError>;

    /// All posts, newest first.
    async fn list_recent(&self) -> Result<Vec<Post>, RepoError>;

    /// Load the post, apply `change` and persist it as one unit.
    /// A rejected change leaves the stored post untouched.
    async fn modify(&self, post_id: Uuid, change: PostChange) -> Result<Post, DomainError>;
}

/// What an account removal deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountRemoval {
    pub posts: u64,
    pub profile: bool,
}

/// Cross-document operations on a whole account.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Delete the user's posts, then profile, then the user, as one unit.
    async fn delete_account(&self, user_id: Uuid) -> Result<AccountRemoval, RepoError>;
}
