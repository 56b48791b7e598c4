//! Initialization and finalization for Argon2.
//!
//! This module handles the boundary operations of the algorithm:
//! hashing all inputs into the 64-byte pre-hashing digest H0, seeding the
//! first two blocks of each lane from it, and folding the filled memory
//! into the output tag.

use zeroize::Zeroize;

use crate::derivation::argon2::block::{Block, BLOCK_SIZE};
use crate::derivation::argon2::core::Context;
use crate::derivation::argon2::memory::Instance;
use crate::derivation::argon2::params::{Params, Variant, Version};
use crate::hash::{blake2b_long, Blake2b};

/// Length of the pre-hashing digest H0 in bytes.
pub(crate) const PREHASH_DIGEST_LENGTH: usize = 64;

/// H0 plus the column and lane words appended when seeding first blocks.
const PREHASH_SEED_LENGTH: usize = PREHASH_DIGEST_LENGTH + 8;

/// Computes the pre-hashing digest H0 from all inputs.
///
/// H0 is a 64-byte BLAKE2b digest of the concatenation of all parameters
/// and inputs, each variable-length field prefixed with its length. The
/// memory cost hashed here is the requested block count, before rounding
/// to whole segments.
///
/// ```text
/// H0 = BLAKE2b(p || T || m || t || v || y || |P| || P || |S| || S ||
///              |K| || K || |X| || X)
/// ```
///
/// The first-generation format (version 0x10) predates the version word
/// and omits it.
pub(crate) fn initial_hash(
    context: &Context,
    params: &Params,
    variant: Variant,
) -> [u8; PREHASH_DIGEST_LENGTH] {
    let mut hasher = Blake2b::new(PREHASH_DIGEST_LENGTH);

    hasher.update(&params.lanes.to_le_bytes());
    hasher.update(&(params.tag_len as u32).to_le_bytes());
    hasher.update(&params.mem_kib.to_le_bytes());
    hasher.update(&params.time.to_le_bytes());
    if params.version != Version::V0x10 {
        hasher.update(&params.version.code().to_le_bytes());
    }
    hasher.update(&variant.code().to_le_bytes());

    for input in [
        &context.password,
        &context.salt,
        &context.secret,
        &context.ad,
    ] {
        hasher.update(&(input.len() as u32).to_le_bytes());
        hasher.update(input);
    }

    let mut h0 = [0u8; PREHASH_DIGEST_LENGTH];
    hasher.finalize_into(&mut h0);
    h0
}

/// Seeds the first two blocks of each lane.
///
/// B[l][0] = H'(1024, H0 || LE32(0) || LE32(l))
/// B[l][1] = H'(1024, H0 || LE32(1) || LE32(l))
///
/// The seed buffer carries H0 and is wiped before returning.
pub(crate) fn fill_first_blocks(
    h0: &[u8; PREHASH_DIGEST_LENGTH],
    instance: &Instance,
    memory: &mut [Block],
) {
    let mut seed = [0u8; PREHASH_SEED_LENGTH];
    seed[..PREHASH_DIGEST_LENGTH].copy_from_slice(h0);

    for lane in 0..instance.lanes {
        seed[PREHASH_DIGEST_LENGTH + 4..].copy_from_slice(&lane.to_le_bytes());
        for column in 0..2u32 {
            seed[PREHASH_DIGEST_LENGTH..PREHASH_DIGEST_LENGTH + 4]
                .copy_from_slice(&column.to_le_bytes());

            let bytes: [u8; BLOCK_SIZE] = blake2b_long(BLOCK_SIZE, &seed)
                .try_into()
                .unwrap();
            memory[instance.block_index(lane, column)] = Block::from_bytes(&bytes);
        }
    }

    seed.zeroize();
}

/// Folds the filled memory into the output tag.
///
/// The last block of every lane is XORed into a single block C and the
/// tag is H'(tag_len, C). All lanes contribute, so none of them can be
/// skipped. The working memory is wiped afterwards when the caller asked
/// for it.
pub(crate) fn finalize(
    instance: &Instance,
    memory: &mut [Block],
    tag_len: usize,
    clear_memory: bool,
) -> Vec<u8> {
    let mut final_block = memory[instance.block_index(0, instance.lane_length - 1)].clone();
    for lane in 1..instance.lanes {
        final_block.xor_assign(&memory[instance.block_index(lane, instance.lane_length - 1)]);
    }

    let tag = blake2b_long(tag_len, &final_block.to_bytes());

    final_block.zeroize();
    if clear_memory {
        for block in memory.iter_mut() {
            block.zeroize();
        }
    }

    tag
}
