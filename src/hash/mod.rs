//! Hash algorithms exposed by the crate.
//!
//! Currently includes BLAKE2b with a pure-Rust implementation, together
//! with the H' output-stretching construction used by Argon2.

pub mod blake2b;

/// Re-export of the BLAKE2b convenience functions and streaming hasher.
pub use blake2b::core::{blake2b, Blake2b};
pub use blake2b::long::blake2b_long;
