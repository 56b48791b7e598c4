//! Block operations for Argon2.
//!
//! This module defines the fundamental 1024-byte block structure and the
//! compression function G that forms the core of the Argon2 algorithm.
//! The compression function is based on the BLAKE2b round function but
//! uses additional multiplication operations for enhanced diffusion.

use zeroize::Zeroize;

use crate::derivation::argon2::sbox::{self, Sbox};

/// Memory block size in bytes.
pub const BLOCK_SIZE: usize = 1024;

/// Number of 64-bit words in a block.
pub(crate) const WORDS_IN_BLOCK: usize = BLOCK_SIZE / 8;

/// A 1024-byte memory block (128 × 64-bit words).
///
/// Blocks are the fundamental unit of memory in Argon2. The algorithm
/// operates by filling and mixing these blocks with the compression
/// function G. Bytes are interpreted as little-endian words.
#[derive(Debug, Clone)]
pub struct Block(pub [u64; WORDS_IN_BLOCK]);

impl Block {
    pub(crate) const ZERO: Self = Self([0u64; WORDS_IN_BLOCK]);

    pub(crate) fn xor_assign(&mut self, other: &Block) {
        self.0
            .iter_mut()
            .zip(other.0.iter())
            .for_each(|(a, b)| *a ^= b);
    }

    pub(crate) fn from_bytes(bytes: &[u8; BLOCK_SIZE]) -> Self {
        let words = core::array::from_fn(|i| {
            let start = i * 8;
            u64::from_le_bytes(bytes[start..start + 8].try_into().unwrap())
        });
        Block(words)
    }

    pub(crate) fn to_bytes(&self) -> [u8; BLOCK_SIZE] {
        let mut out = [0u8; BLOCK_SIZE];
        self.0.iter().enumerate().for_each(|(i, word)| {
            let start = i * 8;
            out[start..start + 8].copy_from_slice(&word.to_le_bytes());
        });
        out
    }

    /// Compression function G.
    ///
    /// Computes G(X, Y) = P(P(X ⊕ Y)) ⊕ X ⊕ Y, where P is a permutation
    /// based on the BLAKE2b round function. The permutation is applied
    /// twice: first on rows of 16 consecutive words, then on columns of
    /// interleaved word pairs.
    ///
    /// When `sbox` is present (the ds variant), the multiplication-chain
    /// transform runs on the permuted state before the final XOR.
    pub(crate) fn compress(x: &Self, y: &Self, sbox: Option<&Sbox>) -> Self {
        let mut r = x.clone();
        r.xor_assign(y);

        let mut z = r.clone();

        // First pass: P on 8 rows of 16 consecutive words
        for row in z.0.chunks_exact_mut(16) {
            permute(row.try_into().unwrap());
        }

        // Second pass: P on 8 columns, each gathering the word pair
        // (2i, 2i + 1) from every row
        for i in 0..8 {
            let base = 2 * i;
            let mut v = [0u64; 16];
            for j in 0..8 {
                v[2 * j] = z.0[base + 16 * j];
                v[2 * j + 1] = z.0[base + 16 * j + 1];
            }

            permute(&mut v);

            for j in 0..8 {
                z.0[base + 16 * j] = v[2 * j];
                z.0[base + 16 * j + 1] = v[2 * j + 1];
            }
        }

        if let Some(sbox) = sbox {
            sbox::transform(&mut z.0, sbox);
        }

        z.xor_assign(&r);
        z
    }

    /// Advances the data-independent address stream by one block.
    ///
    /// `input` holds the position parameters with a counter in word 6;
    /// the counter is incremented and the fresh addresses are computed as
    /// G(0, G(0, input)). Each call yields 128 pseudo-random words.
    pub(crate) fn next_addresses(&mut self, input: &mut Block) {
        input.0[6] += 1;
        let once = Block::compress(&Block::ZERO, input, None);
        *self = Block::compress(&Block::ZERO, &once, None);
    }
}

impl Zeroize for Block {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

/// GB mixing function (Argon2 variant of BLAKE2b's G).
///
/// Unlike the original BLAKE2b G function which adds message words,
/// Argon2's GB function mixes in the product of the lower 32 bits of its
/// first two operands:
///
/// ```text
/// a = a + b + 2 × trunc(a) × trunc(b)
/// d = (d ⊕ a) >>> rotation
/// ```
///
/// where trunc() extracts the lower 32 bits. The rotation amounts are
/// 32, 24, 16, and 63 bits respectively.
#[inline(always)]
fn gb(a: u64, b: u64, c: u64, d: u64) -> (u64, u64, u64, u64) {
    let a = a.wrapping_add(b).wrapping_add(
        2u64.wrapping_mul((a as u32) as u64)
            .wrapping_mul((b as u32) as u64),
    );
    let d = (d ^ a).rotate_right(32);

    let c = c.wrapping_add(d).wrapping_add(
        2u64.wrapping_mul((c as u32) as u64)
            .wrapping_mul((d as u32) as u64),
    );
    let b = (b ^ c).rotate_right(24);

    let a = a.wrapping_add(b).wrapping_add(
        2u64.wrapping_mul((a as u32) as u64)
            .wrapping_mul((b as u32) as u64),
    );
    let d = (d ^ a).rotate_right(16);

    let c = c.wrapping_add(d).wrapping_add(
        2u64.wrapping_mul((c as u32) as u64)
            .wrapping_mul((d as u32) as u64),
    );
    let b = (b ^ c).rotate_right(63);

    (a, b, c, d)
}

/// P permutation: one round of the BLAKE2-like mixing.
///
/// Applies GB to a 4×4 matrix of 64-bit words, first along columns, then
/// along diagonals, with the modified GB function.
#[inline(always)]
fn permute(v: &mut [u64; 16]) {
    (v[0], v[4], v[8], v[12]) = gb(v[0], v[4], v[8], v[12]);
    (v[1], v[5], v[9], v[13]) = gb(v[1], v[5], v[9], v[13]);
    (v[2], v[6], v[10], v[14]) = gb(v[2], v[6], v[10], v[14]);
    (v[3], v[7], v[11], v[15]) = gb(v[3], v[7], v[11], v[15]);

    (v[0], v[5], v[10], v[15]) = gb(v[0], v[5], v[10], v[15]);
    (v[1], v[6], v[11], v[12]) = gb(v[1], v[6], v[11], v[12]);
    (v[2], v[7], v[8], v[13]) = gb(v[2], v[7], v[8], v[13]);
    (v[3], v[4], v[9], v[14]) = gb(v[3], v[4], v[9], v[14]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counting_block() -> Block {
        let mut block = Block::ZERO;
        for (i, word) in block.0.iter_mut().enumerate() {
            *word = i as u64;
        }
        block
    }

    #[test]
    fn byte_round_trip() {
        let block = counting_block();
        assert_eq!(Block::from_bytes(&block.to_bytes()).0, block.0);
    }

    #[test]
    fn compress_is_deterministic_and_mixes() {
        let x = counting_block();
        let mut y = counting_block();
        y.0[17] = 0xdead_beef;

        let a = Block::compress(&x, &y, None);
        let b = Block::compress(&x, &y, None);
        assert_eq!(a.0, b.0);

        // G must not degenerate to the XOR of its inputs
        let mut xor = x.clone();
        xor.xor_assign(&y);
        assert_ne!(a.0, xor.0);
    }

    #[test]
    fn address_stream_depends_on_counter() {
        let mut input = Block::ZERO;
        input.0[0] = 1; // pass
        input.0[3] = 32; // memory blocks

        let mut first = Block::ZERO;
        let mut second = Block::ZERO;
        first.next_addresses(&mut input);
        second.0 = first.0;
        second.next_addresses(&mut input);

        assert_eq!(input.0[6], 2);
        assert_ne!(first.0, second.0);
    }
}
