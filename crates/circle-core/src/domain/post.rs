use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::User;
use crate::error::DomainError;

/// A like - at most one per user on a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
    pub user: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub user: Uuid,
    pub text: String,
    pub name: String,
    pub avatar: String,
    pub date: DateTime<Utc>,
}

impl Comment {
    /// New comment by `author`, snapshotting their name and avatar.
    pub fn new(author: &User, text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            user: author.id,
            text,
            name: author.name.clone(),
            avatar: author.avatar.clone(),
            date: Utc::now(),
        }
    }
}

/// A change to a post's likes or comments.
#[derive(Debug, Clone)]
pub enum PostChange {
    Like { user: Uuid },
    Unlike { user: Uuid },
    Comment(Comment),
    RemoveComment { comment_id: Uuid, user: Uuid },
}

/// Post entity - short text by a user, with likes and comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    #[serde(rename = "user")]
    pub user_id: Uuid,
    pub text: String,
    pub name: String,
    pub avatar: String,
    pub likes: Vec<Like>,
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post by `author`.
    pub fn new(author: &User, text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: author.id,
            text,
            name: author.name.clone(),
            avatar: author.avatar.clone(),
            likes: Vec::new(),
            comments: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn is_liked_by(&self, user: Uuid) -> bool {
        self.likes.iter().any(|like| like.user == user)
    }

    /// Only the author may delete a post.
    pub fn ensure_author(&self, user: Uuid) -> Result<(), DomainError> {
        if self.user_id != user {
            return Err(DomainError::Unauthorized);
        }
        Ok(())
    }

    /// Apply a like/comment change, enforcing ownership and like uniqueness.
    ///
    /// On error the post is left untouched.
    pub fn apply(&mut self, change: PostChange) -> Result<(), DomainError> {
        match change {
            PostChange::Like { user } => {
                if self.is_liked_by(user) {
                    return Err(DomainError::AlreadyLiked);
                }
                self.likes.insert(0, Like { user });
            }
            PostChange::Unlike { user } => {
                if !self.is_liked_by(user) {
                    return Err(DomainError::NotLiked);
                }
                self.likes.retain(|like| like.user != user);
            }
            PostChange::Comment(mut comment) => {
                while self.comments.iter().any(|c| c.id == comment.id) {
                    comment.id = Uuid::new_v4();
                }
                self.comments.insert(0, comment);
            }
            PostChange::RemoveComment { comment_id, user } => {
                let comment = self
                    .comments
                    .iter()
                    .find(|c| c.id == comment_id)
                    .ok_or(DomainError::not_found("Comment", comment_id))?;
                if comment.user != user {
                    return Err(DomainError::Unauthorized);
                }
                self.comments.retain(|c| c.id != comment_id);
            }
        }
        Ok(())
    }
}
