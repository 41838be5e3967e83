//! fp-core: stable foundation for fepost.
//!
//! Contains:
//! - ids (load case / frame / element identifiers, internal sequential index)
//! - error (shared error types)

pub mod error;
pub mod ids;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use ids::*;
