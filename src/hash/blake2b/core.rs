//! BLAKE2b core hashing functions
//!
//! This module implements the BLAKE2b cryptographic hash function as
//! defined in RFC 7693, restricted to what the rest of the crate needs:
//! unkeyed hashing with a digest length between 1 and 64 bytes.
//!
//! It provides:
//! - the compression function operating on 1024-bit blocks
//! - a streaming hasher for multi-part input
//! - a one-shot convenience function
//!
//! The implementation is intentionally minimal, explicit, and designed
//! for use as a low-level primitive within the Nebula ecosystem.

use crate::hash::blake2b::{BLOCK_SIZE, IV, MAX_DIGEST_LENGTH, SIGMA};

/// G mixing function (RFC 7693 §3.1).
#[inline(always)]
fn g(v: &mut [u64; 16], a: usize, b: usize, c: usize, d: usize, x: u64, y: u64) {
    v[a] = v[a].wrapping_add(v[b]).wrapping_add(x);
    v[d] = (v[d] ^ v[a]).rotate_right(32);
    v[c] = v[c].wrapping_add(v[d]);
    v[b] = (v[b] ^ v[c]).rotate_right(24);
    v[a] = v[a].wrapping_add(v[b]).wrapping_add(y);
    v[d] = (v[d] ^ v[a]).rotate_right(16);
    v[c] = v[c].wrapping_add(v[d]);
    v[b] = (v[b] ^ v[c]).rotate_right(63);
}

/// Compresses a single 128-byte message block into the hash state.
///
/// # Parameters
/// - `h`: The current hash state (8 × 64-bit words)
/// - `block`: A 128-byte message block
/// - `t`: Total number of input bytes hashed so far, including this block
/// - `last`: Whether this is the final block of the message
///
/// # Notes
/// - Message words are interpreted as little-endian, as required by
///   BLAKE2b.
pub(crate) fn compress(h: &mut [u64; 8], block: &[u8; BLOCK_SIZE], t: u128, last: bool) {
    let mut m = [0u64; 16];
    for (slot, chunk) in m.iter_mut().zip(block.chunks_exact(8)) {
        *slot = u64::from_le_bytes(chunk.try_into().unwrap());
    }

    let mut v = [0u64; 16];
    v[..8].copy_from_slice(h);
    v[8..].copy_from_slice(&IV);

    v[12] ^= t as u64;
    v[13] ^= (t >> 64) as u64;

    if last {
        v[14] = !v[14];
    }

    for s in &SIGMA {
        g(&mut v, 0, 4, 8, 12, m[s[0]], m[s[1]]);
        g(&mut v, 1, 5, 9, 13, m[s[2]], m[s[3]]);
        g(&mut v, 2, 6, 10, 14, m[s[4]], m[s[5]]);
        g(&mut v, 3, 7, 11, 15, m[s[6]], m[s[7]]);
        g(&mut v, 0, 5, 10, 15, m[s[8]], m[s[9]]);
        g(&mut v, 1, 6, 11, 12, m[s[10]], m[s[11]]);
        g(&mut v, 2, 7, 8, 13, m[s[12]], m[s[13]]);
        g(&mut v, 3, 4, 9, 14, m[s[14]], m[s[15]]);
    }

    for (slot, i) in h.iter_mut().zip(0..8) {
        *slot ^= v[i] ^ v[i + 8];
    }
}

/// Streaming BLAKE2b hasher with a digest length fixed at construction.
///
/// The digest length is part of the parameter block, so two hashers with
/// different output lengths produce unrelated digests even on identical
/// input.
pub struct Blake2b {
    h: [u64; 8],
    buf: [u8; BLOCK_SIZE],
    buf_len: usize,
    counter: u128,
    out_len: usize,
}

impl Blake2b {
    /// Creates a hasher producing an `out_len`-byte digest.
    ///
    /// # Panics
    /// Panics if `out_len` is 0 or larger than 64 bytes. Callers inside
    /// this crate only construct digests in that range.
    pub fn new(out_len: usize) -> Self {
        assert!(out_len >= 1 && out_len <= MAX_DIGEST_LENGTH);

        let mut h = IV;
        // Parameter block: digest length, no key, fanout = depth = 1
        h[0] ^= 0x0101_0000 ^ out_len as u64;

        Self {
            h,
            buf: [0u8; BLOCK_SIZE],
            buf_len: 0,
            counter: 0,
            out_len,
        }
    }

    /// Absorbs `input` into the hash state.
    ///
    /// A full buffer is only compressed once more input arrives, because
    /// the final block must be flagged as such when the message ends.
    pub fn update(&mut self, mut input: &[u8]) {
        if input.is_empty() {
            return;
        }

        if self.buf_len > 0 {
            let fill = BLOCK_SIZE - self.buf_len;
            if input.len() <= fill {
                self.buf[self.buf_len..self.buf_len + input.len()].copy_from_slice(input);
                self.buf_len += input.len();
                return;
            }
            self.buf[self.buf_len..].copy_from_slice(&input[..fill]);
            self.counter += BLOCK_SIZE as u128;
            let block = self.buf;
            compress(&mut self.h, &block, self.counter, false);
            self.buf_len = 0;
            input = &input[fill..];
        }

        while input.len() > BLOCK_SIZE {
            let block: &[u8; BLOCK_SIZE] = input[..BLOCK_SIZE].try_into().unwrap();
            self.counter += BLOCK_SIZE as u128;
            compress(&mut self.h, block, self.counter, false);
            input = &input[BLOCK_SIZE..];
        }

        self.buf[..input.len()].copy_from_slice(input);
        self.buf_len = input.len();
    }

    /// Consumes the hasher and writes the digest into `out`.
    ///
    /// # Panics
    /// Panics if `out.len()` differs from the length given to [`new`].
    ///
    /// [`new`]: Blake2b::new
    pub fn finalize_into(mut self, out: &mut [u8]) {
        assert_eq!(out.len(), self.out_len);

        self.counter += self.buf_len as u128;
        let mut block = [0u8; BLOCK_SIZE];
        block[..self.buf_len].copy_from_slice(&self.buf[..self.buf_len]);
        compress(&mut self.h, &block, self.counter, true);

        let mut digest = [0u8; MAX_DIGEST_LENGTH];
        for (chunk, word) in digest.chunks_exact_mut(8).zip(self.h.iter()) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        out.copy_from_slice(&digest[..self.out_len]);
    }
}

/// Computes an `out_len`-byte BLAKE2b digest of `input` in one shot.
pub fn blake2b(out_len: usize, input: &[u8]) -> Vec<u8> {
    let mut hasher = Blake2b::new(out_len);
    hasher.update(input);

    let mut out = vec![0u8; out_len];
    hasher.finalize_into(&mut out);
    out
}
