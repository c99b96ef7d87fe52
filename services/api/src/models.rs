//! API models for stored records and request payloads
//!
//! Every record serializes its identifier as `_id` and its fields in
//! camelCase, which is the shape the web client reads.

pub mod adoption_form;
pub mod contact_form;
pub mod pet;
pub mod user;

pub use adoption_form::{
    AdoptionForm, AdoptionFormChanges, AdoptionFormDetails, AdoptionStatus, NewAdoptionForm,
};
pub use contact_form::{ContactForm, ContactFormChanges, FlagChanges, NewContactForm};
pub use pet::{NewPet, Pet, PetChanges, PetSummary};
pub use user::{LoginRequest, NewUser, Role, SignupRequest, UpdateUser, UpdateUserRequest, User};
