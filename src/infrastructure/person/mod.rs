//! Person infrastructure implementations

mod repository;
mod service;

pub use repository::StoragePersonRepository;
pub use service::{CreatePersonRequest, PersonService, PersonServiceTrait, UpdatePersonRequest};
