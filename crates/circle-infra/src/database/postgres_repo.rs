//! PostgreSQL repository implementations.
//!
//! Nested-list changes run as `SELECT ... FOR UPDATE` → apply → `UPDATE`
//! inside one transaction, so concurrent changes to the same document
//! serialize instead of overwriting each other.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, EntityTrait, ModelTrait, QueryFilter, QueryOrder,
    QuerySelect, TransactionTrait,
};
use uuid::Uuid;

use circle_core::domain::{Post, PostChange, Profile, ProfileChange, ProfileFields, User};
use circle_core::error::{DomainError, RepoError};
use circle_core::ports::{
    AccountRemoval, AccountRepository, PostRepository, ProfileRepository, UserRepository,
};

use super::entity::post::{self, Entity as PostEntity};
use super::entity::profile::{self, Entity as ProfileEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, repo_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL profile repository.
pub type PostgresProfileRepository = PostgresBaseRepository<ProfileEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// Mask an email for logging to avoid PII in logs.
fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let first = local.chars().next().filter(|_| local.chars().count() > 1);
            match first {
                Some(c) => format!("{c}***@{domain}"),
                None => format!("***@{domain}"),
            }
        }
        None => "***".to_string(),
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        let result = UserEntity::find()
            .filter(user::Column::Id.is_in(ids.to_vec()))
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl ProfileRepository for PostgresProfileRepository {
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<Profile>, RepoError> {
        let result = ProfileEntity::find()
            .filter(profile::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.map(Into::into))
    }

    async fn list(&self) -> Result<Vec<Profile>, RepoError> {
        let result = ProfileEntity::find()
            .order_by_asc(profile::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn upsert(&self, user_id: Uuid, fields: ProfileFields) -> Result<Profile, RepoError> {
        let txn = self.db.begin().await.map_err(repo_err)?;

        let existing = ProfileEntity::find()
            .filter(profile::Column::UserId.eq(user_id))
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(repo_err)?;

        let model = match existing {
            Some(model) => {
                let mut profile = Profile::from(model);
                profile.replace_fields(fields);
                profile::ActiveModel::from(profile)
                    .update(&txn)
                    .await
                    .map_err(repo_err)?
            }
            None => profile::ActiveModel::from(Profile::new(user_id, fields))
                .insert(&txn)
                .await
                .map_err(repo_err)?,
        };

        txn.commit().await.map_err(repo_err)?;
        Ok(model.into())
    }

    async fn modify(&self, user_id: Uuid, change: ProfileChange) -> Result<Profile, DomainError> {
        let txn = self.db.begin().await.map_err(repo_err)?;

        let mut profile: Profile = ProfileEntity::find()
            .filter(profile::Column::UserId.eq(user_id))
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(repo_err)?
            .ok_or(DomainError::not_found("Profile", user_id))?
            .into();

        profile.apply(change);
        let model = profile::ActiveModel::from(profile)
            .update(&txn)
            .await
            .map_err(repo_err)?;

        txn.commit().await.map_err(repo_err)?;
        Ok(model.into())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::UserId.eq(user_id))
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn list_recent(&self) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .order_by_desc(post::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn modify(&self, post_id: Uuid, change: PostChange) -> Result<Post, DomainError> {
        let txn = self.db.begin().await.map_err(repo_err)?;

        let mut post: Post = PostEntity::find_by_id(post_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(repo_err)?
            .ok_or(DomainError::not_found("Post", post_id))?
            .into();

        // A rejected change drops `txn`, rolling back and releasing the lock.
        post.apply(change)?;
        let model = post::ActiveModel::from(post)
            .update(&txn)
            .await
            .map_err(repo_err)?;

        txn.commit().await.map_err(repo_err)?;
        Ok(model.into())
    }
}

/// Account-wide operations spanning all three tables.
pub struct PostgresAccountRepository {
    db: DbConn,
}

impl PostgresAccountRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn delete_account(&self, user_id: Uuid) -> Result<AccountRemoval, RepoError> {
        let txn = self.db.begin().await.map_err(repo_err)?;

        let user = UserEntity::find_by_id(user_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(repo_err)?
            .ok_or(RepoError::NotFound)?;

        let posts = PostEntity::delete_many()
            .filter(post::Column::UserId.eq(user_id))
            .exec(&txn)
            .await
            .map_err(repo_err)?
            .rows_affected;

        let profile = ProfileEntity::delete_many()
            .filter(profile::Column::UserId.eq(user_id))
            .exec(&txn)
            .await
            .map_err(repo_err)?
            .rows_affected
            > 0;

        user.delete(&txn).await.map_err(repo_err)?;

        txn.commit().await.map_err(repo_err)?;
        Ok(AccountRemoval { posts, profile })
    }
}
