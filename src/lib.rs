//! Memory-hard password hashing for Nebula
//!
//! This crate implements the Argon2 family of memory-hard password hashing
//! functions: Argon2d, Argon2i, Argon2id, and the multiplication-hardened
//! Argon2ds. It is intended for password storage, key derivation, and
//! proof-of-work-like workloads where an attacker must spend large amounts
//! of both time and memory.
//!
//! The focus is on **clarity, predictability, and auditability**, rather
//! than on providing a large or high-level cryptographic API. The hashing
//! primitive (BLAKE2b) is implemented in-crate, explicit in its semantics,
//! and suitable for security-critical code.
//!
//! # Module overview
//!
//! - `hash`
//!   BLAKE2b with variable digest length, plus the output-stretching
//!   construction H' used to expand digests to arbitrary lengths. These
//!   implementations are intended for internal use and protocol-level
//!   constructions.
//!
//! - `derivation`
//!   The Argon2 core: the 1024-byte block algebra and compression
//!   function, reference-block indexing, the lane/slice fill schedule with
//!   its per-slice synchronization barriers, and the boundary operations
//!   that turn passwords into tags.
//!
//! # Design goals
//!
//! - No heap allocations beyond the working memory and the returned tag
//! - Minimal and explicit APIs
//! - Stable, well-defined semantics, bit-exact against the published
//!   Argon2 test vectors
//! - Sensitive material wiped when the caller asks for it
//!
//! This crate is not intended to replace full-featured, externally audited
//! cryptographic libraries, but to serve as a small, controlled foundation
//! for Nebula's internal key-derivation needs.

pub mod derivation;
pub mod hash;
