//! Request validation - every failing field is reported, not just the first.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::dto::{
    EducationRequest, ExperienceRequest, LoginRequest, ProfileRequest, RegisterUserRequest,
    TextRequest,
};

const MIN_PASSWORD_LENGTH: usize = 6;
const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321 SMTP limit

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap());

/// A single field failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Types that can check themselves before reaching a handler's logic.
pub trait Validate {
    fn validate(&self) -> Result<(), Vec<FieldError>>;
}

#[derive(Default)]
struct Checks(Vec<FieldError>);

impl Checks {
    fn check(&mut self, ok: bool, field: &str, message: &str) -> &mut Self {
        if !ok {
            self.0.push(FieldError {
                field: field.to_string(),
                message: message.to_string(),
            });
        }
        self
    }

    fn required(&mut self, value: &str, field: &str, message: &str) -> &mut Self {
        self.check(!value.trim().is_empty(), field, message)
    }

    fn finish(&mut self) -> Result<(), Vec<FieldError>> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(std::mem::take(&mut self.0))
        }
    }
}

pub fn is_valid_email(email: &str) -> bool {
    email.len() <= MAX_EMAIL_LENGTH && EMAIL_REGEX.is_match(email.trim())
}

impl Validate for RegisterUserRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Checks::default()
            .required(&self.name, "name", "Name is required")
            .check(is_valid_email(&self.email), "email", "Please include a valid email")
            .check(
                self.password.chars().count() >= MIN_PASSWORD_LENGTH,
                "password",
                "Please enter a password with 6 or more characters",
            )
            .finish()
    }
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Checks::default()
            .check(is_valid_email(&self.email), "email", "Please include a valid email")
            .check(!self.password.is_empty(), "password", "Password is required")
            .finish()
    }
}

impl Validate for TextRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Checks::default()
            .required(&self.text, "text", "Text is required")
            .finish()
    }
}

impl Validate for ProfileRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Checks::default()
            .required(&self.status, "status", "Status is required")
            .check(
                self.skills.as_ref().is_some_and(|s| s.has_items()),
                "skills",
                "Skills is required",
            )
            .finish()
    }
}

impl Validate for ExperienceRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Checks::default()
            .required(&self.title, "title", "Title is required")
            .required(&self.company, "company", "Company is required")
            .check(self.from.is_some(), "from", "From date is required")
            .check(
                dates_ordered(self.from, self.to),
                "to",
                "To date must not precede from date",
            )
            .finish()
    }
}

impl Validate for EducationRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Checks::default()
            .required(&self.school, "school", "School is required")
            .required(&self.degree, "degree", "Degree is required")
            .required(&self.fieldofstudy, "fieldofstudy", "Field of study is required")
            .check(self.from.is_some(), "from", "From date is required")
            .check(
                dates_ordered(self.from, self.to),
                "to",
                "To date must not precede from date",
            )
            .finish()
    }
}

fn dates_ordered(from: Option<chrono::NaiveDate>, to: Option<chrono::NaiveDate>) -> bool {
    match (from, to) {
        (Some(from), Some(to)) => to >= from,
        _ => true,
    }
}
