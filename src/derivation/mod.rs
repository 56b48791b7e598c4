//! Key-derivation functions exposed by the crate.
//!
//! Currently includes the Argon2 family of memory-hard password hashing
//! functions.

pub mod argon2;

/// Re-export of the Argon2 entry points and supporting types.
pub use argon2::core::{argon2, argon2d, argon2ds, argon2i, argon2id, Argon2Error, Context};
pub use argon2::params::{Argon2ParamError, Params, Variant, Version};
