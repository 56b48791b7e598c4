//! S-box generation and transform for the Argon2ds variant.
//!
//! Argon2ds hardens the compression function with a 1024-entry table of
//! 64-bit words derived from the working memory itself. Every compression
//! then walks a 96-step chain of 32×32-bit multiplications and table
//! lookups across the whole block, which costs an attacker both memory
//! latency (the lookups are data-dependent) and multiplier depth (the
//! chain is sequential).

use crate::derivation::argon2::block::{Block, WORDS_IN_BLOCK};

/// Number of 64-bit entries in the S-box.
pub(crate) const SBOX_SIZE: usize = 1 << 10;

/// Mask applied to an address before it indexes the S-box.
pub(crate) const SBOX_MASK: u64 = (SBOX_SIZE as u64) / 2 - 1;

/// S-box lookups in the multiplication chain of one compression.
const SBOX_STEPS: usize = 96;

/// Words absorbed and written back per chain segment. The 16 groups of a
/// block split the 96 lookups into runs of 6.
const GROUP_WORDS: usize = 8;

pub(crate) type Sbox = [u64; SBOX_SIZE];

/// Derives the S-box from the first block of lane 0.
///
/// The table is built by repeatedly applying G to the seed block and its
/// own previous output, starting from the all-zero block, and emitting
/// the 128 words of each output until the 1024 entries are filled. It is
/// regenerated from the current B[0][0] at the start of every pass, so
/// each pass reads a table the previous pass produced.
pub(crate) fn generate(seed: &Block) -> Box<Sbox> {
    let mut sbox: Box<Sbox> = Box::new([0u64; SBOX_SIZE]);

    let mut output = Block::ZERO;
    for chunk in sbox.chunks_exact_mut(WORDS_IN_BLOCK) {
        output = Block::compress(seed, &output, None);
        chunk.copy_from_slice(&output.0);
    }

    sbox
}

/// Multiplication-chain transform applied inside G.
///
/// Runs after the row and column permutations and before the feedback
/// XOR, traversing the 128 words in fixed order as 16 groups of 8. Each
/// group is absorbed into the running value (starting with word 0 of the
/// permuted state), the chain advances by 6 steps of
/// `x = high32(x) · low32(x) + Sbox[x & mask]`, and the value is folded
/// back into every word of the group. All 128 words both drive the
/// lookup addresses and receive the chain's output.
pub(crate) fn transform(words: &mut [u64; WORDS_IN_BLOCK], sbox: &Sbox) {
    let mut x = 0u64;
    for group in words.chunks_exact_mut(GROUP_WORDS) {
        for word in group.iter() {
            x ^= *word;
        }

        for _ in 0..SBOX_STEPS / (WORDS_IN_BLOCK / GROUP_WORDS) {
            let hi = x >> 32;
            let lo = x & 0xffff_ffff;
            x = hi
                .wrapping_mul(lo)
                .wrapping_add(sbox[(x & SBOX_MASK) as usize]);
        }

        for word in group.iter_mut() {
            *word = word.wrapping_add(x);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed() -> Block {
        let mut block = Block::ZERO;
        for (i, word) in block.0.iter_mut().enumerate() {
            *word = (i as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15);
        }
        block
    }

    #[test]
    fn generation_is_deterministic() {
        let a = generate(&seed());
        let b = generate(&seed());
        assert_eq!(a[..], b[..]);
    }

    #[test]
    fn generation_depends_on_the_seed() {
        let mut other = seed();
        other.0[0] ^= 1;
        let a = generate(&seed());
        let b = generate(&other);
        // every emitted chunk hashes the seed directly
        assert_ne!(a[..WORDS_IN_BLOCK], b[..WORDS_IN_BLOCK]);
        assert_ne!(a[SBOX_SIZE - WORDS_IN_BLOCK..], b[SBOX_SIZE - WORDS_IN_BLOCK..]);
    }

    #[test]
    fn chunks_differ() {
        let sbox = generate(&seed());
        assert_ne!(sbox[..WORDS_IN_BLOCK], sbox[WORDS_IN_BLOCK..2 * WORDS_IN_BLOCK]);
    }

    #[test]
    fn transform_touches_every_word() {
        let sbox = generate(&seed());
        let mut words = seed().0;
        let before = words;
        transform(&mut words, &sbox);

        let changed = words
            .iter()
            .zip(before.iter())
            .filter(|(after, before)| after != before)
            .count();
        assert_eq!(changed, WORDS_IN_BLOCK);
    }

    #[test]
    fn transform_propagates_late_words() {
        // a difference in the last word reaches the chain through the
        // final group's absorption: groups before it see identical input,
        // the rest of its own group diverges with the chain value
        let sbox = generate(&seed());
        let mut a = seed().0;
        let mut b = seed().0;
        b[WORDS_IN_BLOCK - 1] ^= 1;

        transform(&mut a, &sbox);
        transform(&mut b, &sbox);
        assert_eq!(a[..WORDS_IN_BLOCK - GROUP_WORDS], b[..WORDS_IN_BLOCK - GROUP_WORDS]);
        assert_ne!(
            a[WORDS_IN_BLOCK - GROUP_WORDS..WORDS_IN_BLOCK - 1],
            b[WORDS_IN_BLOCK - GROUP_WORDS..WORDS_IN_BLOCK - 1]
        );
    }
}
