//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&RequestStore` as the first argument.

pub mod request_repo;

pub use request_repo::RequestRepo;
