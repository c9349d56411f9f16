use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::normalize::{normalize_skills, normalize_url};

/// Named social links shown on a profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinks {
    pub youtube: String,
    pub twitter: String,
    pub facebook: String,
    pub linkedin: String,
    pub instagram: String,
    pub github: String,
}

impl SocialLinks {
    fn normalized(self) -> Self {
        Self {
            youtube: normalize_url(&self.youtube),
            twitter: normalize_url(&self.twitter),
            facebook: normalize_url(&self.facebook),
            linkedin: normalize_url(&self.linkedin),
            instagram: normalize_url(&self.instagram),
            github: normalize_url(&self.github),
        }
    }
}

/// The top-level profile fields replaced wholesale on every submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileFields {
    pub company: String,
    pub website: String,
    pub country: String,
    pub location: String,
    pub status: String,
    pub skills: Vec<String>,
    pub bio: String,
    pub social: SocialLinks,
}

impl ProfileFields {
    /// Canonical form: https links, trimmed non-empty skills.
    pub fn normalized(self) -> Self {
        Self {
            website: normalize_url(&self.website),
            skills: normalize_skills(self.skills),
            social: self.social.normalized(),
            ..self
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub from: NaiveDate,
    pub to: Option<NaiveDate>,
    pub current: bool,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Education {
    pub id: Uuid,
    pub school: String,
    pub degree: String,
    #[serde(rename = "fieldofstudy")]
    pub field_of_study: String,
    pub from: NaiveDate,
    pub to: Option<NaiveDate>,
    pub current: bool,
    pub description: Option<String>,
}

/// One entry of a `following` / `followers` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowEntry {
    pub user: Uuid,
    pub name: String,
    pub avatar: String,
    pub date: DateTime<Utc>,
}

impl FollowEntry {
    pub fn new(user: Uuid, name: String, avatar: String) -> Self {
        Self {
            user,
            name,
            avatar,
            date: Utc::now(),
        }
    }
}

/// A change to one of a profile's nested lists.
///
/// Stores apply these atomically against the persisted document.
#[derive(Debug, Clone)]
pub enum ProfileChange {
    AddExperience(Experience),
    RemoveExperience(Uuid),
    AddEducation(Education),
    RemoveEducation(Uuid),
    Follow(FollowEntry),
    Unfollow(Uuid),
}

/// Profile entity - at most one per user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    #[serde(rename = "user")]
    pub user_id: Uuid,
    #[serde(flatten)]
    pub fields: ProfileFields,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub followers: Vec<FollowEntry>,
    pub following: Vec<FollowEntry>,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    /// Create a profile for `user_id` from submitted fields.
    pub fn new(user_id: Uuid, fields: ProfileFields) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            fields: fields.normalized(),
            experience: Vec::new(),
            education: Vec::new(),
            followers: Vec::new(),
            following: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Overwrite every top-level field. Lists of entries and follows are kept.
    pub fn replace_fields(&mut self, fields: ProfileFields) {
        self.fields = fields.normalized();
    }

    /// Apply a nested-list change.
    ///
    /// Removing an unknown entry id is a no-op. Follows are not deduplicated
    /// and the target's `followers` list is maintained separately.
    pub fn apply(&mut self, change: ProfileChange) {
        match change {
            ProfileChange::AddExperience(mut entry) => {
                entry.id = fresh_id(&self.experience, |e| e.id);
                self.experience.insert(0, entry);
            }
            ProfileChange::RemoveExperience(id) => self.experience.retain(|e| e.id != id),
            ProfileChange::AddEducation(mut entry) => {
                entry.id = fresh_id(&self.education, |e| e.id);
                self.education.insert(0, entry);
            }
            ProfileChange::RemoveEducation(id) => self.education.retain(|e| e.id != id),
            ProfileChange::Follow(entry) => self.following.insert(0, entry),
            ProfileChange::Unfollow(user) => self.following.retain(|f| f.user != user),
        }
    }
}

fn fresh_id<T>(existing: &[T], id_of: impl Fn(&T) -> Uuid) -> Uuid {
    loop {
        let id = Uuid::new_v4();
        if !existing.iter().any(|e| id_of(e) == id) {
            return id;
        }
    }
}
