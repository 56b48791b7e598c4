//! Reference block selection for Argon2.
//!
//! When filling the block at some position, Argon2 mixes the previous
//! block of the lane with a reference block chosen pseudo-randomly from
//! the set of already-finished blocks. This module maps the 32-bit
//! pseudo-random value J1 onto that set with a quadratically skewed
//! distribution, which concentrates references on recently produced
//! blocks and penalises time-memory trade-offs.

use crate::derivation::argon2::memory::{Instance, Position};
use crate::derivation::argon2::params::SYNC_POINTS;

/// Computes the in-lane index of the reference block.
///
/// The reference set depends on where we are:
/// - Pass 0, slice 0: only the blocks already produced in this segment,
///   excluding the previous block.
/// - Pass 0, later slices: everything the reference lane finished in
///   earlier slices, plus (same lane only) this segment up to the
///   previous block.
/// - Later passes: the three slices finished most recently, plus (same
///   lane only) this segment up to the previous block. The window starts
///   right after the current slice and wraps around the lane.
///
/// `pseudo_rand` is J1; `same_lane` says whether the reference lane is
/// the current lane (cross-lane references may not touch the current
/// slice, since the reference lane may not have filled it yet).
pub(crate) fn index_alpha(
    instance: &Instance,
    position: &Position,
    pseudo_rand: u32,
    same_lane: bool,
) -> u32 {
    let segment_length = instance.segment_length;
    let lane_length = instance.lane_length;

    let reference_area_size = if position.pass == 0 {
        if position.slice == 0 {
            position.index - 1
        } else if same_lane {
            position.slice * segment_length + position.index - 1
        } else if position.index == 0 {
            position.slice * segment_length - 1
        } else {
            position.slice * segment_length
        }
    } else if same_lane {
        lane_length - segment_length + position.index - 1
    } else if position.index == 0 {
        lane_length - segment_length - 1
    } else {
        lane_length - segment_length
    };

    // Skewed mapping: x = J1^2 / 2^32, picked index = |R| - 1 - |R|x / 2^32
    let area = reference_area_size as u64;
    let x = (pseudo_rand as u64 * pseudo_rand as u64) >> 32;
    let relative_position = area - 1 - ((area * x) >> 32);

    let start_position = if position.pass == 0 {
        0
    } else {
        (position.slice + 1) % SYNC_POINTS * segment_length
    };

    ((start_position as u64 + relative_position) % lane_length as u64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derivation::argon2::params::{Params, Variant, Version};

    fn small_instance(lanes: u32, mem_kib: u32) -> Instance {
        let params = Params {
            mem_kib,
            time: 2,
            lanes,
            threads: 1,
            tag_len: 32,
            version: Version::V0x13,
        };
        Instance::new(&params, Variant::Argon2d, false)
    }

    /// Columns a reference may legally point at, given the position and
    /// the slice barrier.
    fn allowed(instance: &Instance, position: &Position, same_lane: bool, column: u32) -> bool {
        let segment_length = instance.segment_length;
        let current = position.slice * segment_length + position.index;
        let slice_of = |col: u32| col / segment_length;

        if position.pass == 0 {
            if same_lane {
                // strictly older, and never the previous block
                column + 1 < current
            } else {
                slice_of(column) < position.slice
            }
        } else if same_lane {
            (column + 1 != current && column != current && slice_of(column) != position.slice)
                || (slice_of(column) == position.slice && column + 1 < current)
        } else {
            slice_of(column) != position.slice
        }
    }

    #[test]
    fn every_reference_is_finished() {
        let instance = small_instance(2, 32);
        let mut rng = 0x1234_5678_u64;

        for pass in 0..2 {
            for slice in 0..SYNC_POINTS {
                let start = if pass == 0 && slice == 0 { 2 } else { 0 };
                for index in start..instance.segment_length {
                    let position = Position {
                        pass,
                        lane: 0,
                        slice,
                        index,
                    };
                    for same_lane in [true, false] {
                        if pass == 0 && slice == 0 && !same_lane {
                            continue;
                        }
                        // xorshift to cover a spread of J1 values
                        rng ^= rng << 13;
                        rng ^= rng >> 7;
                        rng ^= rng << 17;
                        for j1 in [0u32, 1, u32::MAX, rng as u32, (rng >> 32) as u32] {
                            let column = index_alpha(&instance, &position, j1, same_lane);
                            assert!(column < instance.lane_length);
                            assert!(
                                allowed(&instance, &position, same_lane, column),
                                "pass {pass} slice {slice} index {index} same_lane \
                                 {same_lane} j1 {j1} -> column {column}"
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn first_filled_block_references_block_zero() {
        // At pass 0, slice 0, index 2 the reference area holds a single
        // block, so every J1 resolves to column 0. This is why the
        // data-dependent and data-independent variants agree on the first
        // block they write.
        let instance = small_instance(4, 32);
        let position = Position {
            pass: 0,
            lane: 1,
            slice: 0,
            index: 2,
        };
        for j1 in [0u32, 1, 0xdead_beef, u32::MAX] {
            assert_eq!(index_alpha(&instance, &position, j1, true), 0);
        }
    }

    #[test]
    fn skew_prefers_recent_blocks() {
        // x = J1^2 / 2^32 is biased toward small values for uniform J1,
        // and the window index |R| - 1 - |R|x / 2^32 is correspondingly
        // biased toward its upper end, the most recently written blocks.
        // J1 = 0 hits the newest allowed block, J1 = MAX the oldest.
        let instance = small_instance(1, 64);
        let position = Position {
            pass: 0,
            lane: 0,
            slice: 3,
            index: instance.segment_length - 1,
        };
        let current = position.slice * instance.segment_length + position.index;
        let newest = index_alpha(&instance, &position, 0, true);
        let oldest = index_alpha(&instance, &position, u32::MAX, true);
        assert_eq!(oldest, 0);
        assert_eq!(newest + 2, current);
    }
}
