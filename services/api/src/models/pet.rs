//! Pet model and form-field coercion
//!
//! Pet writes arrive either as multipart form fields (everything is a string)
//! or as JSON (numbers and booleans may already be typed). Both shapes are read
//! from a `serde_json::Map` and coerced here before anything is stored.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::validation::{FieldError, require_text, text_field};

/// Pet entity
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub species: String,
    pub breed: String,
    pub size: String,
    pub age: f64,
    pub gender: String,
    pub color: String,
    pub about: String,
    pub vaccinated: bool,
    pub neutered: bool,
    pub medical_conditions: String,
    pub adoption_fee: f64,
    pub picture: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The slice of a pet embedded in adoption form listings
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PetSummary {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub species: String,
    pub breed: String,
    pub picture: Option<String>,
}

/// Pet creation payload with every field coerced
#[derive(Debug, Clone, PartialEq)]
pub struct NewPet {
    pub name: String,
    pub species: String,
    pub breed: String,
    pub size: String,
    pub age: f64,
    pub gender: String,
    pub color: String,
    pub about: String,
    pub vaccinated: bool,
    pub neutered: bool,
    pub medical_conditions: String,
    pub adoption_fee: f64,
    pub picture: Option<String>,
}

/// Partial pet update; `None` leaves the stored value untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PetChanges {
    pub name: Option<String>,
    pub species: Option<String>,
    pub breed: Option<String>,
    pub size: Option<String>,
    pub age: Option<f64>,
    pub gender: Option<String>,
    pub color: Option<String>,
    pub about: Option<String>,
    pub vaccinated: Option<bool>,
    pub neutered: Option<bool>,
    pub medical_conditions: Option<String>,
    pub adoption_fee: Option<f64>,
    pub picture: Option<String>,
}

const REQUIRED_TEXT: [&str; 7] = ["name", "species", "breed", "size", "gender", "color", "about"];

impl NewPet {
    /// Build a pet from raw fields. An uploaded picture path wins over a
    /// `picture` string in the body.
    pub fn from_fields(
        fields: &Map<String, Value>,
        uploaded_picture: Option<String>,
    ) -> Result<Self, Vec<FieldError>> {
        let mut errors = Vec::new();

        let text = |field: &str, errors: &mut Vec<FieldError>| {
            let value = text_field(fields, field, errors).unwrap_or_default();
            if REQUIRED_TEXT.contains(&field) {
                require_text(&value, field, errors);
            }
            value
        };

        let name = text("name", &mut errors);
        let species = text("species", &mut errors);
        let breed = text("breed", &mut errors);
        let size = text("size", &mut errors);
        let gender = text("gender", &mut errors);
        let color = text("color", &mut errors);
        let about = text("about", &mut errors);
        let medical_conditions = text("medicalConditions", &mut errors);

        let age = required_number(fields, "age", &mut errors);
        let adoption_fee = required_number(fields, "adoptionFee", &mut errors);

        let vaccinated = fields.get("vaccinated").is_some_and(coerce_bool);
        let neutered = fields.get("neutered").is_some_and(coerce_bool);

        let picture = uploaded_picture.or_else(|| body_picture(fields));

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(NewPet {
            name,
            species,
            breed,
            size,
            age: age.unwrap_or_default(),
            gender,
            color,
            about,
            vaccinated,
            neutered,
            medical_conditions,
            adoption_fee: adoption_fee.unwrap_or_default(),
            picture,
        })
    }
}

impl PetChanges {
    /// Build a partial update from raw fields; only supplied fields are
    /// validated and coerced.
    pub fn from_fields(
        fields: &Map<String, Value>,
        uploaded_picture: Option<String>,
    ) -> Result<Self, Vec<FieldError>> {
        let mut errors = Vec::new();

        let text = |field: &str, errors: &mut Vec<FieldError>| {
            let value = text_field(fields, field, errors)?;
            if REQUIRED_TEXT.contains(&field) {
                require_text(&value, field, errors);
            }
            Some(value)
        };

        let changes = PetChanges {
            name: text("name", &mut errors),
            species: text("species", &mut errors),
            breed: text("breed", &mut errors),
            size: text("size", &mut errors),
            gender: text("gender", &mut errors),
            color: text("color", &mut errors),
            about: text("about", &mut errors),
            medical_conditions: text("medicalConditions", &mut errors),
            age: optional_number(fields, "age", &mut errors),
            adoption_fee: optional_number(fields, "adoptionFee", &mut errors),
            vaccinated: fields.get("vaccinated").map(coerce_bool),
            neutered: fields.get("neutered").map(coerce_bool),
            picture: uploaded_picture.or_else(|| body_picture(fields)),
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(changes)
    }
}

/// `true` only for the boolean `true` or the exact string `"true"`
pub fn coerce_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s == "true",
        _ => false,
    }
}

/// Numbers pass through; strings are trimmed and parsed, with the empty
/// string reading as zero.
pub fn coerce_number(value: &Value) -> Result<f64, String> {
    let number = match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| "is not a number".to_string())?,
        Value::String(s) if s.trim().is_empty() => 0.0,
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("'{s}' is not a number"))?,
        _ => return Err("is not a number".to_string()),
    };

    if !number.is_finite() {
        return Err("must be a finite number".to_string());
    }
    if number < 0.0 {
        return Err("must not be negative".to_string());
    }
    Ok(number)
}

fn optional_number(
    fields: &Map<String, Value>,
    field: &str,
    errors: &mut Vec<FieldError>,
) -> Option<f64> {
    let value = fields.get(field).filter(|v| !v.is_null())?;
    match coerce_number(value) {
        Ok(number) => Some(number),
        Err(message) => {
            errors.push(FieldError::new(field, format!("{field} {message}")));
            None
        }
    }
}

fn required_number(
    fields: &Map<String, Value>,
    field: &str,
    errors: &mut Vec<FieldError>,
) -> Option<f64> {
    if fields.get(field).is_none_or(Value::is_null) {
        errors.push(FieldError::new(field, format!("{field} is required")));
        return None;
    }
    optional_number(fields, field, errors)
}

fn body_picture(fields: &Map<String, Value>) -> Option<String> {
    fields
        .get("picture")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
