//! Data Transfer Objects - request/response types for the API.
//!
//! Request fields default when absent so that missing values surface as
//! per-field validation errors instead of a body parse failure.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Request to register a new user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisterUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Request to login.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// A user's public information (never the password).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar: String,
    pub created_at: String,
}

/// Response containing an issued token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Body for a new post or comment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TextRequest {
    pub text: String,
}

/// Skills as typed by the user: `"a, b, c"` or `["a", "b", "c"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SkillsInput {
    List(Vec<String>),
    Csv(String),
}

impl SkillsInput {
    /// Raw items, split on commas for the string form.
    pub fn into_items(self) -> Vec<String> {
        match self {
            SkillsInput::List(items) => items,
            SkillsInput::Csv(csv) => csv.split(',').map(str::to_string).collect(),
        }
    }

    pub fn has_items(&self) -> bool {
        match self {
            SkillsInput::List(items) => items.iter().any(|s| !s.trim().is_empty()),
            SkillsInput::Csv(csv) => csv.split(',').any(|s| !s.trim().is_empty()),
        }
    }
}

/// Profile submission; social links arrive flat, as in the profile form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileRequest {
    pub company: String,
    pub website: String,
    pub country: String,
    pub location: String,
    pub status: String,
    pub skills: Option<SkillsInput>,
    pub bio: String,
    pub youtube: String,
    pub twitter: String,
    pub facebook: String,
    pub linkedin: String,
    pub instagram: String,
    pub github: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceRequest {
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    #[serde(with = "date_input")]
    pub from: Option<NaiveDate>,
    #[serde(with = "date_input")]
    pub to: Option<NaiveDate>,
    pub current: bool,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationRequest {
    pub school: String,
    pub degree: String,
    #[serde(alias = "field_of_study")]
    pub fieldofstudy: String,
    #[serde(with = "date_input")]
    pub from: Option<NaiveDate>,
    #[serde(with = "date_input")]
    pub to: Option<NaiveDate>,
    pub current: bool,
    pub description: Option<String>,
}

/// Where an uploaded image was stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub url: String,
    pub file_name: String,
    pub size: usize,
}

/// Dates accepted as `YYYY-MM-DD` or a full RFC 3339 timestamp.
mod date_input {
    use chrono::{DateTime, NaiveDate};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => s.serialize_str(&d.format("%Y-%m-%d").to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        let Some(raw) = raw.map(|r| r.trim().to_string()).filter(|r| !r.is_empty()) else {
            return Ok(None);
        };

        if let Ok(date) = NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
            return Ok(Some(date));
        }
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| Some(dt.date_naive()))
            .map_err(|_| D::Error::custom(format!("invalid date: {raw}")))
    }
}
