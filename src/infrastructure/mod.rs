//! Infrastructure layer - Storage backends, adapters and services

pub mod logging;
pub mod person;
pub mod storage;
