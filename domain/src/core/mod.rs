//! Core domain concepts shared across all subdomains.
//!
//! - [`backend::BackendConfig`]: one configured model and how to reach it
//! - [`backend::Provider`]: the API family behind a backend
//! - [`error::DomainError`]: domain-level errors

pub mod backend;
pub mod error;
pub mod string;
