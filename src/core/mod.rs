//! Core utilities and common types for bizhours_sla.

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::*;
