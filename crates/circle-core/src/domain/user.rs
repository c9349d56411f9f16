use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Avatar assigned at registration (gravatar "mystery person").
pub const DEFAULT_AVATAR: &str =
    "https://www.gravatar.com/avatar/00000000000000000000000000000000?d=mp&f=y";

/// User entity - an account that can log in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub avatar: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with generated ID, default avatar and timestamp.
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            avatar: DEFAULT_AVATAR.to_string(),
            created_at: Utc::now(),
        }
    }
}
