//! Adoption form model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

use super::pet::PetSummary;
use crate::validation::{FieldError, require_text, validate_email};

/// Review state of an adoption form. Any state may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AdoptionStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl AdoptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdoptionStatus::Pending => "Pending",
            AdoptionStatus::Accepted => "Accepted",
            AdoptionStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for AdoptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdoptionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(AdoptionStatus::Pending),
            "Accepted" => Ok(AdoptionStatus::Accepted),
            "Rejected" => Ok(AdoptionStatus::Rejected),
            other => Err(format!(
                "status must be one of Pending, Accepted, Rejected (got '{other}')"
            )),
        }
    }
}

/// Adoption form as stored
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdoptionForm {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(rename = "user")]
    pub user_id: Uuid,
    #[serde(rename = "pet")]
    pub pet_id: Uuid,
    pub name: String,
    pub phone_number: String,
    pub email: String,
    pub address_line: String,
    pub city: String,
    pub zip_code: String,
    pub status: AdoptionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Adoption form with its pet populated; `pet` is `null` once the pet is gone
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdoptionFormDetails {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub user: Uuid,
    pub pet: Option<PetSummary>,
    pub name: String,
    pub phone_number: String,
    pub email: String,
    pub address_line: String,
    pub city: String,
    pub zip_code: String,
    pub status: AdoptionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for `POST /api/adoption-forms`.
///
/// A `user` field sent by the client is ignored; the owner always comes from
/// the bearer token.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAdoptionForm {
    pub pet: Option<Uuid>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address_line: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub zip_code: String,
}

impl NewAdoptionForm {
    /// Check required fields, returning the pet id on success
    pub fn validate(&self) -> Result<Uuid, Vec<FieldError>> {
        let mut errors = Vec::new();
        if self.pet.is_none() {
            errors.push(FieldError::new("pet", "pet is required"));
        }
        require_text(&self.name, "name", &mut errors);
        require_text(&self.phone_number, "phoneNumber", &mut errors);
        if let Err(message) = validate_email(self.email.trim()) {
            errors.push(FieldError::new("email", message));
        }
        require_text(&self.address_line, "addressLine", &mut errors);
        require_text(&self.city, "city", &mut errors);
        require_text(&self.zip_code, "zipCode", &mut errors);

        match self.pet {
            Some(pet_id) if errors.is_empty() => Ok(pet_id),
            _ => Err(errors),
        }
    }
}

/// Request body for `PUT /api/adoption-forms/:id`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdoptionFormChanges {
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub address_line: Option<String>,
    pub city: Option<String>,
    pub zip_code: Option<String>,
    pub status: Option<String>,
}

impl AdoptionFormChanges {
    /// Check the supplied fields and parse the status, if one was sent.
    ///
    /// Fields that are present follow the same rules as on submission.
    pub fn validate(&self) -> Result<Option<AdoptionStatus>, Vec<FieldError>> {
        let mut errors = Vec::new();

        let required = [
            (&self.name, "name"),
            (&self.phone_number, "phoneNumber"),
            (&self.address_line, "addressLine"),
            (&self.city, "city"),
            (&self.zip_code, "zipCode"),
        ];
        for (value, field) in required {
            if let Some(value) = value {
                require_text(value, field, &mut errors);
            }
        }
        if let Some(email) = &self.email {
            if let Err(message) = validate_email(email.trim()) {
                errors.push(FieldError::new("email", message));
            }
        }

        let status = match self.status.as_deref().map(str::parse::<AdoptionStatus>) {
            Some(Ok(status)) => Some(status),
            Some(Err(message)) => {
                errors.push(FieldError::new("status", message));
                None
            }
            None => None,
        };

        if errors.is_empty() { Ok(status) } else { Err(errors) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission() -> NewAdoptionForm {
        serde_json::from_str(&format!(
            r#"{{"user":"{}","pet":"{}","name":"Jane","phoneNumber":"555","email":"jane@example.org","addressLine":"1 Main St","city":"Pune","zipCode":"411001"}}"#,
            Uuid::new_v4(),
            Uuid::new_v4()
        ))
        .unwrap()
    }

    #[test]
    fn complete_submission_validates() {
        let form = submission();
        assert_eq!(form.validate(), Ok(form.pet.unwrap()));
    }

    #[test]
    fn missing_pet_and_address_are_reported() {
        let form = NewAdoptionForm {
            pet: None,
            city: String::new(),
            ..submission()
        };
        let errors = form.validate().unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["pet", "city"]);
    }

    #[test]
    fn status_parses_only_known_states() {
        let changes = AdoptionFormChanges {
            status: Some("Accepted".to_string()),
            ..Default::default()
        };
        assert_eq!(changes.validate(), Ok(Some(AdoptionStatus::Accepted)));

        let changes = AdoptionFormChanges {
            status: Some("accepted".to_string()),
            ..Default::default()
        };
        assert!(changes.validate().is_err());

        assert_eq!(AdoptionFormChanges::default().validate(), Ok(None));
    }

    #[test]
    fn changes_cannot_blank_fields_or_break_the_email() {
        let changes = AdoptionFormChanges {
            name: Some("  ".to_string()),
            email: Some("not-an-email".to_string()),
            city: Some(String::new()),
            ..Default::default()
        };
        let errors = changes.validate().unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "city", "email"]);
    }

    #[test]
    fn changes_leave_absent_fields_alone() {
        let changes = AdoptionFormChanges {
            phone_number: Some("555-0101".to_string()),
            status: Some("Rejected".to_string()),
            ..Default::default()
        };
        assert_eq!(changes.validate(), Ok(Some(AdoptionStatus::Rejected)));
    }
}
