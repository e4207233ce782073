//! sk-core: stable foundation for surfkin.
//!
//! Contains:
//! - numeric (Real + tolerances + float helpers)
//! - backend (pluggable arithmetic: exp, linear solve, norm)
//! - constants (kB, h in eV units, operating temperature)
//! - error (shared error types)

pub mod backend;
pub mod constants;
pub mod error;
pub mod numeric;

// Re-exports: nice ergonomics for downstream crates
pub use backend::{NativeFloat, NumericBackend};
pub use constants::*;
pub use error::{SkError, SkResult};
pub use numeric::*;
