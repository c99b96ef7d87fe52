//! Contact form model and subject flags
//!
//! Enquiries carry two review flags, `[READ]` and `[CONTACTED]`, encoded as
//! bracketed tokens at the end of the subject line. The client reads the flags
//! back out of the subject, so the encoding is part of the wire format.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use uuid::Uuid;

use crate::validation::{FieldError, require_text, validate_email};

/// Contact form entity
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactForm {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for `POST /api/contact-forms`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContactForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

impl NewContactForm {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        require_text(&self.first_name, "firstName", &mut errors);
        require_text(&self.last_name, "lastName", &mut errors);
        if let Err(message) = validate_email(self.email.trim()) {
            errors.push(FieldError::new("email", message));
        }
        require_text(&self.subject, "subject", &mut errors);
        require_text(&self.message, "message", &mut errors);

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Request body for `PUT /api/contact-forms/:id`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactFormChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

impl ContactFormChanges {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        if let Some(email) = &self.email {
            if let Err(message) = validate_email(email.trim()) {
                errors.push(FieldError::new("email", message));
            }
        }
        if let Some(subject) = &self.subject {
            require_text(subject, "subject", &mut errors);
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Request body for `PATCH /api/contact-forms/:id/flags`; absent flags keep
/// their current value
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct FlagChanges {
    pub read: Option<bool>,
    pub contacted: Option<bool>,
}

/// Review flags encoded in a subject line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubjectFlags {
    pub read: bool,
    pub contacted: bool,
}

fn read_regex() -> &'static Regex {
    static READ_REGEX: OnceLock<Regex> = OnceLock::new();
    READ_REGEX
        .get_or_init(|| Regex::new(r"(?i)\s*\[READ\]").expect("Failed to compile READ regex"))
}

fn contacted_regex() -> &'static Regex {
    static CONTACTED_REGEX: OnceLock<Regex> = OnceLock::new();
    CONTACTED_REGEX.get_or_init(|| {
        Regex::new(r"(?i)\s*\[CONTACTED\]").expect("Failed to compile CONTACTED regex")
    })
}

impl SubjectFlags {
    /// Read the flags currently present in `subject` (case-insensitive)
    pub fn parse(subject: &str) -> Self {
        Self {
            read: read_regex().is_match(subject),
            contacted: contacted_regex().is_match(subject),
        }
    }

    /// Merge requested changes over these flags
    pub fn merge(self, changes: FlagChanges) -> Self {
        Self {
            read: changes.read.unwrap_or(self.read),
            contacted: changes.contacted.unwrap_or(self.contacted),
        }
    }

    /// Rewrite `subject` so it carries exactly these flags.
    ///
    /// Existing flags are stripped wherever they appear, the remainder is
    /// trimmed, and enabled flags are appended as ` [READ] [CONTACTED]`.
    pub fn apply(self, subject: &str) -> String {
        let base = read_regex().replace_all(subject, "");
        let base = contacted_regex().replace_all(&base, "");
        let mut rewritten = base.trim().to_string();

        for (enabled, token) in [(self.read, "[READ]"), (self.contacted, "[CONTACTED]")] {
            if enabled {
                rewritten.push(' ');
                rewritten.push_str(token);
            }
        }
        rewritten
    }
}
