//! Domain logic for the service account request portal.
//!
//! Everything here is free of I/O: account and status vocabularies,
//! request validation, file naming and the PowerShell script generator.

pub mod account;
pub mod error;
pub mod naming;
pub mod script;
pub mod types;
pub mod validation;
