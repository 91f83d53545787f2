//! Utility modules for cross-cutting concerns

pub mod error;

// Re-export commonly used items
pub use error::{ExpireError, Result};
