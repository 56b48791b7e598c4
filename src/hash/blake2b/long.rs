//! Variable-length output extension H' for BLAKE2b.
//!
//! Argon2 needs digests far larger than the 64 bytes BLAKE2b can produce:
//! 1024 bytes for the first blocks of each lane, and up to 2^32 - 1 bytes
//! for the output tag. H' stretches BLAKE2b by chaining 64-byte digests,
//! emitting the first half of each intermediate and the whole final one.

use crate::hash::blake2b::core::{blake2b, Blake2b};
use crate::hash::blake2b::MAX_DIGEST_LENGTH;

/// Half of a full digest, the stride at which chained output is emitted.
const HALF_DIGEST_LENGTH: usize = MAX_DIGEST_LENGTH / 2;

/// Computes H'(out_len, input): BLAKE2b stretched to `out_len` bytes.
///
/// For `out_len <= 64` this is a single digest of the length-prefixed
/// input: `BLAKE2b(out_len, LE32(out_len) || input)`. For longer outputs,
/// a chain of 64-byte digests V_1, V_2, ... is produced, where V_1 hashes
/// the prefixed input and each V_{i+1} = BLAKE2b(64, V_i). The first 32
/// bytes of each intermediate digest are emitted; the final digest is
/// sized to fill the remainder exactly and emitted whole.
///
/// # Panics
/// Panics if `out_len` is zero.
pub fn blake2b_long(out_len: usize, input: &[u8]) -> Vec<u8> {
    assert!(out_len >= 1);

    let prefix = (out_len as u32).to_le_bytes();

    if out_len <= MAX_DIGEST_LENGTH {
        let mut hasher = Blake2b::new(out_len);
        hasher.update(&prefix);
        hasher.update(input);

        let mut out = vec![0u8; out_len];
        hasher.finalize_into(&mut out);
        return out;
    }

    let mut out = vec![0u8; out_len];

    // V_1 covers the length-prefixed input; later links hash only their
    // predecessor.
    let mut hasher = Blake2b::new(MAX_DIGEST_LENGTH);
    hasher.update(&prefix);
    hasher.update(input);
    let mut link = [0u8; MAX_DIGEST_LENGTH];
    hasher.finalize_into(&mut link);

    // r half-digests are emitted, then a final digest sized to fill the
    // remainder exactly (between 33 and 64 bytes) hashed from V_r.
    let r = out_len.div_ceil(HALF_DIGEST_LENGTH) - 2;
    out[..HALF_DIGEST_LENGTH].copy_from_slice(&link[..HALF_DIGEST_LENGTH]);
    for chunk in out[HALF_DIGEST_LENGTH..r * HALF_DIGEST_LENGTH]
        .chunks_exact_mut(HALF_DIGEST_LENGTH)
    {
        let next = blake2b(MAX_DIGEST_LENGTH, &link);
        link.copy_from_slice(&next);
        chunk.copy_from_slice(&link[..HALF_DIGEST_LENGTH]);
    }

    let tail = out_len - r * HALF_DIGEST_LENGTH;
    out[r * HALF_DIGEST_LENGTH..].copy_from_slice(&blake2b(tail, &link));

    out
}
