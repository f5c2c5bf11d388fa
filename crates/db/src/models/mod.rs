//! Stored entities and the DTOs that create or update them.

pub mod request;
