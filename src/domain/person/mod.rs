//! Person domain module
//!
//! A person is a phonebook contact: a validated name and phone number with a
//! system-assigned identity.

mod entity;
mod repository;
mod validation;

pub use entity::{NewPerson, Person, PersonFields, PersonId, PersonPatch};
pub use repository::PersonRepository;
pub use validation::{
    MIN_NAME_LENGTH, PersonValidationError, is_valid_name, is_valid_phone_number,
    validate_person_name, validate_person_number,
};
