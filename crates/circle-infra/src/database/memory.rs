//! In-memory document store - used when no database is configured, and in tests.
//!
//! All three collections sit behind one async `RwLock`, so every change to a
//! document (and the account cascade across collections) happens in a single
//! critical section. Data is lost on process restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use circle_core::domain::{Post, PostChange, Profile, ProfileChange, ProfileFields, User};
use circle_core::error::{DomainError, RepoError};
use circle_core::ports::{
    AccountRemoval, AccountRepository, BaseRepository, PostRepository, ProfileRepository,
    UserRepository,
};

#[derive(Default)]
struct Documents {
    users: HashMap<Uuid, User>,
    profiles: HashMap<Uuid, Profile>,
    posts: HashMap<Uuid, Post>,
}

impl Documents {
    fn profile_of(&mut self, user_id: Uuid) -> Option<&mut Profile> {
        self.profiles.values_mut().find(|p| p.user_id == user_id)
    }

    /// Profiles and posts must point at a stored user.
    fn ensure_owner(&self, user_id: Uuid) -> Result<(), RepoError> {
        if self.users.contains_key(&user_id) {
            Ok(())
        } else {
            Err(RepoError::NotFound)
        }
    }
}

/// Users, profiles and posts held in process memory.
#[derive(Default)]
pub struct InMemoryStore {
    docs: RwLock<Documents>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.docs.read().await.users.get(&id).cloned())
    }

    async fn create(&self, user: User) -> Result<User, RepoError> {
        let mut docs = self.docs.write().await;
        if docs.users.contains_key(&user.id) || docs.users.values().any(|u| u.email == user.email)
        {
            return Err(RepoError::Constraint("User already exists".to_string()));
        }
        docs.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.docs
            .write()
            .await
            .users
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let docs = self.docs.read().await;
        Ok(docs.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        let docs = self.docs.read().await;
        Ok(ids.iter().filter_map(|id| docs.users.get(id).cloned()).collect())
    }
}

#[async_trait]
impl BaseRepository<Profile, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Profile>, RepoError> {
        Ok(self.docs.read().await.profiles.get(&id).cloned())
    }

    async fn create(&self, profile: Profile) -> Result<Profile, RepoError> {
        let mut docs = self.docs.write().await;
        docs.ensure_owner(profile.user_id)?;
        if docs.profiles.contains_key(&profile.id) || docs.profile_of(profile.user_id).is_some() {
            return Err(RepoError::Constraint("Profile already exists".to_string()));
        }
        docs.profiles.insert(profile.id, profile.clone());
        Ok(profile)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.docs
            .write()
            .await
            .profiles
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl ProfileRepository for InMemoryStore {
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<Profile>, RepoError> {
        let docs = self.docs.read().await;
        Ok(docs.profiles.values().find(|p| p.user_id == user_id).cloned())
    }

    async fn list(&self) -> Result<Vec<Profile>, RepoError> {
        let docs = self.docs.read().await;
        let mut profiles: Vec<Profile> = docs.profiles.values().cloned().collect();
        profiles.sort_by_key(|p| p.created_at);
        Ok(profiles)
    }

    async fn upsert(&self, user_id: Uuid, fields: ProfileFields) -> Result<Profile, RepoError> {
        let mut docs = self.docs.write().await;
        docs.ensure_owner(user_id)?;
        if let Some(profile) = docs.profile_of(user_id) {
            profile.replace_fields(fields);
            return Ok(profile.clone());
        }

        let profile = Profile::new(user_id, fields);
        docs.profiles.insert(profile.id, profile.clone());
        Ok(profile)
    }

    async fn modify(&self, user_id: Uuid, change: ProfileChange) -> Result<Profile, DomainError> {
        let mut docs = self.docs.write().await;
        let profile = docs
            .profile_of(user_id)
            .ok_or(DomainError::not_found("Profile", user_id))?;
        profile.apply(change);
        Ok(profile.clone())
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.docs.read().await.posts.get(&id).cloned())
    }

    async fn create(&self, post: Post) -> Result<Post, RepoError> {
        let mut docs = self.docs.write().await;
        docs.ensure_owner(post.user_id)?;
        if docs.posts.contains_key(&post.id) {
            return Err(RepoError::Constraint("Post already exists".to_string()));
        }
        docs.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.docs
            .write()
            .await
            .posts
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let docs = self.docs.read().await;
        Ok(docs
            .posts
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_recent(&self) -> Result<Vec<Post>, RepoError> {
        let docs = self.docs.read().await;
        let mut posts: Vec<Post> = docs.posts.values().cloned().collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn modify(&self, post_id: Uuid, change: PostChange) -> Result<Post, DomainError> {
        let mut docs = self.docs.write().await;
        let stored = docs
            .posts
            .get_mut(&post_id)
            .ok_or(DomainError::not_found("Post", post_id))?;

        let mut updated = stored.clone();
        updated.apply(change)?;
        *stored = updated.clone();
        Ok(updated)
    }
}

#[async_trait]
impl AccountRepository for InMemoryStore {
    async fn delete_account(&self, user_id: Uuid) -> Result<AccountRemoval, RepoError> {
        let mut docs = self.docs.write().await;
        if !docs.users.contains_key(&user_id) {
            return Err(RepoError::NotFound);
        }

        let before = docs.posts.len();
        docs.posts.retain(|_, p| p.user_id != user_id);
        let posts = (before - docs.posts.len()) as u64;

        let before = docs.profiles.len();
        docs.profiles.retain(|_, p| p.user_id != user_id);
        let profile = docs.profiles.len() < before;

        docs.users.remove(&user_id);

        Ok(AccountRemoval { posts, profile })
    }
}
