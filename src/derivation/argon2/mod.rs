//! The Argon2 family of memory-hard password hashing functions.
//!
//! Argon2 derives a fixed-length tag from a password, salt, and tuning
//! parameters by allocating a large working memory and mixing it
//! repeatedly with a compression function built on a reduced BLAKE2b
//! permutation. An attacker must spend large amounts of both time and
//! memory to search the password space.
//!
//! # Variants
//!
//! The four variants differ only in how reference blocks are selected and
//! whether the compression function is hardened with a lookup table:
//!
//! - **Argon2d**: data-dependent addressing everywhere. Strongest against
//!   time-memory trade-offs, but the memory access pattern leaks input
//!   material through side channels.
//! - **Argon2i**: data-independent addressing everywhere. The access
//!   pattern is a pure function of the position, so timing observations
//!   reveal nothing about the password.
//! - **Argon2id**: data-independent for the first half of the first pass,
//!   data-dependent afterwards. The recommended default.
//! - **Argon2ds**: Argon2d extended with a per-call S-box; each
//!   compression walks a 96-step multiplication chain through the table,
//!   adding memory latency and multiplier pressure against GPU and ASIC
//!   attackers.
//!
//! # Memory Organization
//!
//! Memory is a matrix of 1024-byte blocks:
//! - **Lanes**: independent rows that can be processed in parallel.
//! - **Slices**: each lane is divided into 4 slices (sync points).
//! - **Segments**: the blocks of one lane within one slice.
//!
//! Within a slice, lanes are filled by parallel workers; a barrier between
//! slices guarantees that every block a worker references has already been
//! produced.

pub(crate) mod block;
pub(crate) mod boundary;
pub mod core;
pub(crate) mod memory;
pub mod params;
pub(crate) mod reference;
pub(crate) mod sbox;
