//! Port definitions (interfaces for external adapters)

pub mod backend_gateway;
pub mod progress;
