//! User model and related functionality

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

use crate::validation::{FieldError, require_text, validate_email, validate_password};

/// Authorization tier carried in every token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

/// User entity
///
/// The password hash is skipped on serialization so a `User` can be returned
/// to clients directly.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated user creation payload; `password` is still plain text here
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
    pub role: Role,
}

/// User update payload; `password` is plain text until the handler hashes it
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
}

/// Request body for `POST /api/users/signup`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub password: String,
    pub role: Option<Role>,
}

impl SignupRequest {
    pub fn validate(self) -> Result<NewUser, Vec<FieldError>> {
        let mut errors = Vec::new();
        require_text(&self.first_name, "firstName", &mut errors);
        require_text(&self.last_name, "lastName", &mut errors);

        let email = normalize_email(&self.email);
        if let Err(message) = validate_email(&email) {
            errors.push(FieldError::new("email", message));
        }
        if let Err(message) = validate_password(&self.password) {
            errors.push(FieldError::new("password", message));
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(NewUser {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email,
            phone_number: self.phone_number.trim().to_string(),
            password: self.password,
            role: self.role.unwrap_or_default(),
        })
    }
}

/// Request body for `POST /api/users/login`
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `PUT /api/users/:id`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
}

impl UpdateUserRequest {
    pub fn validate(self) -> Result<UpdateUser, Vec<FieldError>> {
        let mut errors = Vec::new();

        if let Some(first_name) = &self.first_name {
            require_text(first_name, "firstName", &mut errors);
        }
        if let Some(last_name) = &self.last_name {
            require_text(last_name, "lastName", &mut errors);
        }
        let email = self.email.as_deref().map(normalize_email);
        if let Some(email) = &email {
            if let Err(message) = validate_email(email) {
                errors.push(FieldError::new("email", message));
            }
        }
        if let Some(password) = &self.password {
            if let Err(message) = validate_password(password) {
                errors.push(FieldError::new("password", message));
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(UpdateUser {
            first_name: self.first_name.map(|s| s.trim().to_string()),
            last_name: self.last_name.map(|s| s.trim().to_string()),
            email,
            phone_number: self.phone_number.map(|s| s.trim().to_string()),
            password: self.password,
            role: self.role,
        })
    }
}

/// Emails are compared and stored trimmed and lowercased
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup() -> SignupRequest {
        SignupRequest {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "  Jane.Doe@Example.org ".to_string(),
            phone_number: "555-0101".to_string(),
            password: "Secret123".to_string(),
            role: None,
        }
    }

    #[test]
    fn role_round_trips_through_text() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(Role::User.to_string(), "user");
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn signup_defaults_to_user_role_and_normalizes_email() {
        let new_user = signup().validate().unwrap();
        assert_eq!(new_user.role, Role::User);
        assert_eq!(new_user.email, "jane.doe@example.org");
    }

    #[test]
    fn signup_reports_every_bad_field() {
        let request = SignupRequest {
            first_name: String::new(),
            email: "nope".to_string(),
            password: "short".to_string(),
            ..signup()
        };
        let errors = request.validate().unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["firstName", "email", "password"]);
    }

    #[test]
    fn signup_request_reads_camel_case() {
        let request: SignupRequest = serde_json::from_str(
            r#"{"firstName":"A","lastName":"B","email":"a@b.co","phoneNumber":"1","password":"abcdefg1","role":"admin"}"#,
        )
        .unwrap();
        assert_eq!(request.role, Some(Role::Admin));
        assert_eq!(request.phone_number, "1");
    }

    #[test]
    fn user_json_hides_password_hash() {
        let user = User {
            id: Uuid::new_v4(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane@example.org".to_string(),
            phone_number: String::new(),
            password_hash: "$argon2id$secret".to_string(),
            role: Role::Admin,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["_id"], user.id.to_string());
        assert_eq!(json["role"], "admin");
        assert_eq!(json["firstName"], "Jane");
    }
}
