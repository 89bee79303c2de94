//! Core Service Layer
//!
//! Shared infrastructure for the Reunion server: token handling, the
//! authenticated-request context, and the error taxonomy.

pub mod auth;
pub mod ctx;
pub mod error;

// Re-exports for convenience
pub use ctx::Ctx;
pub use error::{Error, Result};
