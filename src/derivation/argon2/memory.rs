//! Memory organization and filling algorithm for Argon2.
//!
//! This module implements the core memory-filling loop. Memory is a
//! matrix of lanes (rows) and columns, each cell a 1024-byte block. Every
//! lane is split into four slices; within a slice the lanes are filled by
//! parallel workers, and a barrier between slices guarantees that every
//! block a worker references has already been produced.

use std::marker::PhantomData;
use std::thread;

use crate::derivation::argon2::block::Block;
use crate::derivation::argon2::params::{Params, Variant, Version, SYNC_POINTS};
use crate::derivation::argon2::reference::index_alpha;
use crate::derivation::argon2::sbox::{self, Sbox};
use crate::derivation::argon2::core::Argon2Error;

/// Pseudo-random values delivered by one address block.
pub(crate) const ADDRESSES_IN_BLOCK: u32 = 128;

/// Invariant description of one hash computation: the matrix geometry,
/// cost parameters, and variant. Everything here is fixed before the
/// first block is written.
#[derive(Debug, Clone)]
pub(crate) struct Instance {
    pub passes: u32,
    pub memory_blocks: u32,
    pub segment_length: u32,
    pub lane_length: u32,
    pub lanes: u32,
    pub threads: u32,
    pub variant: Variant,
    pub version: Version,
    pub print_internals: bool,
}

/// Cursor for the block being constructed: which pass, lane, and slice,
/// and the index inside the segment.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Position {
    pub pass: u32,
    pub lane: u32,
    pub slice: u32,
    pub index: u32,
}

impl Instance {
    /// Derives the matrix geometry from the requested parameters.
    ///
    /// The requested block count is rounded down to a multiple of
    /// 4 × lanes so that every segment has the same length. Thread count
    /// is clamped to the number of lanes; extra threads would have no
    /// lane to work on.
    pub(crate) fn new(params: &Params, variant: Variant, print_internals: bool) -> Self {
        let group = SYNC_POINTS * params.lanes;
        let memory_blocks = (params.mem_kib / group) * group;
        let lane_length = memory_blocks / params.lanes;

        Self {
            passes: params.time,
            memory_blocks,
            segment_length: lane_length / SYNC_POINTS,
            lane_length,
            lanes: params.lanes,
            threads: params.threads.min(params.lanes),
            variant,
            version: params.version,
            print_internals,
        }
    }

    /// Flat index of the block at `column` in `lane`.
    #[inline]
    pub(crate) fn block_index(&self, lane: u32, column: u32) -> usize {
        lane as usize * self.lane_length as usize + column as usize
    }
}

/// Shared view of the block matrix while a slice is being filled.
///
/// Within a slice, the worker for lane `l` writes only the blocks of
/// lane `l`'s current segment and reads only blocks finished before the
/// slice started (or written by itself earlier in the segment). The
/// scope join in `fill_memory_blocks` orders every write of slice `s`
/// before any cross-lane read in slice `s + 1`. Accesses from different
/// workers therefore never alias, and the view can hand out references
/// without locking.
#[derive(Clone, Copy)]
pub(crate) struct BlockView<'a> {
    ptr: *mut Block,
    len: usize,
    _memory: PhantomData<&'a mut [Block]>,
}

unsafe impl Send for BlockView<'_> {}
unsafe impl Sync for BlockView<'_> {}

impl<'a> BlockView<'a> {
    fn new(memory: &'a mut [Block]) -> Self {
        Self {
            ptr: memory.as_mut_ptr(),
            len: memory.len(),
            _memory: PhantomData,
        }
    }

    /// # Safety
    /// The caller must hold no mutable reference to the block at `index`.
    #[inline]
    unsafe fn block(&self, index: usize) -> &Block {
        debug_assert!(index < self.len);
        &*self.ptr.add(index)
    }

    /// # Safety
    /// The caller must be the only worker touching the block at `index`.
    #[inline]
    #[allow(clippy::mut_from_ref)]
    unsafe fn block_mut(&self, index: usize) -> &mut Block {
        debug_assert!(index < self.len);
        &mut *self.ptr.add(index)
    }
}

/// Fills the whole matrix `passes` times based on the first two blocks of
/// each lane.
///
/// Slices are processed in order; within a slice, lanes are dispatched to
/// `min(threads, lanes)` workers per batch, the calling thread taking the
/// last lane of each batch, and the scope join is the barrier before the
/// next slice. For Argon2ds the S-box is regenerated from the current
/// B[0][0] at the start of every pass.
pub(crate) fn fill_memory_blocks(
    instance: &Instance,
    memory: &mut [Block],
) -> Result<(), Argon2Error> {
    let mut sbox: Option<Box<Sbox>> = None;

    for pass in 0..instance.passes {
        if instance.variant.uses_sbox() {
            sbox = Some(sbox::generate(&memory[0]));
        }

        for slice in 0..SYNC_POINTS {
            fill_slice(instance, memory, pass, slice, sbox.as_deref())?;
        }

        if instance.print_internals {
            print_memory(memory, pass);
        }
    }

    Ok(())
}

/// Fills one slice across all lanes, in parallel batches.
fn fill_slice(
    instance: &Instance,
    memory: &mut [Block],
    pass: u32,
    slice: u32,
    sbox: Option<&Sbox>,
) -> Result<(), Argon2Error> {
    let view = BlockView::new(memory);

    let mut lane = 0;
    while lane < instance.lanes {
        let batch_end = (lane + instance.threads).min(instance.lanes);

        thread::scope(|scope| {
            for worker_lane in lane..batch_end - 1 {
                let position = Position {
                    pass,
                    lane: worker_lane,
                    slice,
                    index: 0,
                };
                thread::Builder::new()
                    .spawn_scoped(scope, move || fill_segment(instance, view, position, sbox))
                    .map_err(|_| Argon2Error::AllocationFailed)?;
            }

            // the calling thread takes the last lane of the batch
            fill_segment(
                instance,
                view,
                Position {
                    pass,
                    lane: batch_end - 1,
                    slice,
                    index: 0,
                },
                sbox,
            );
            Ok::<(), Argon2Error>(())
        })?;

        lane = batch_end;
    }

    Ok(())
}

/// Fills one segment (the portion of a lane within a slice).
///
/// For each block position this determines the pseudo-random value
/// (from the address stream or the previous block), resolves the
/// reference block, and stores G(previous, reference). On later passes
/// the result is XORed over the old block under version 0x13 and
/// overwrites it under version 0x10.
fn fill_segment(
    instance: &Instance,
    memory: BlockView<'_>,
    mut position: Position,
    sbox: Option<&Sbox>,
) {
    let data_independent = instance
        .variant
        .data_independent(position.pass, position.slice);

    let mut input_block = Block::ZERO;
    let mut address_block = Block::ZERO;

    if data_independent {
        input_block.0[0] = position.pass as u64;
        input_block.0[1] = position.lane as u64;
        input_block.0[2] = position.slice as u64;
        input_block.0[3] = instance.memory_blocks as u64;
        input_block.0[4] = instance.passes as u64;
        input_block.0[5] = instance.variant.code() as u64;
    }

    let mut starting_index = 0;
    if position.pass == 0 && position.slice == 0 {
        // columns 0 and 1 hold the seeded first blocks
        starting_index = 2;

        if data_independent {
            address_block.next_addresses(&mut input_block);
        }
    }

    for i in starting_index..instance.segment_length {
        let column = position.slice * instance.segment_length + i;
        let prev_column = if column == 0 {
            instance.lane_length - 1
        } else {
            column - 1
        };
        let prev_index = instance.block_index(position.lane, prev_column);

        let pseudo_rand = if data_independent {
            // a fresh address block every 128 addresses; the first one of
            // a pass-0 slice-0 segment was produced before the loop
            if i % ADDRESSES_IN_BLOCK == 0 {
                address_block.next_addresses(&mut input_block);
            }
            address_block.0[(i % ADDRESSES_IN_BLOCK) as usize]
        } else {
            // SAFETY: the previous block of this lane was written by this
            // worker (or before the slice started) and nobody writes it now.
            unsafe { memory.block(prev_index).0[0] }
        };

        let ref_lane = if position.pass == 0 && position.slice == 0 {
            position.lane
        } else {
            (pseudo_rand >> 32) as u32 % instance.lanes
        };

        position.index = i;
        let ref_column = index_alpha(
            instance,
            &position,
            pseudo_rand as u32,
            ref_lane == position.lane,
        );
        let ref_index = instance.block_index(ref_lane, ref_column);
        let cur_index = instance.block_index(position.lane, column);
        debug_assert!(ref_index != cur_index && prev_index != cur_index);

        // SAFETY: the reference block is finished (index_alpha only
        // resolves into slices sealed by the barrier, or into this
        // worker's own segment), and the current block is written by
        // this worker alone.
        let new_block = unsafe {
            Block::compress(memory.block(prev_index), memory.block(ref_index), sbox)
        };
        let current = unsafe { memory.block_mut(cur_index) };

        if position.pass == 0 || instance.version == Version::V0x10 {
            *current = new_block;
        } else {
            current.xor_assign(&new_block);
        }
    }
}

/// Dumps the whole matrix after a pass, in the layout of the reference
/// implementation's test-vector generator.
fn print_memory(memory: &[Block], pass: u32) {
    println!("\n After pass {pass}:");
    for (i, block) in memory.iter().enumerate() {
        for (j, word) in block.0.iter().enumerate() {
            println!("Block {i:04} [{j:>3}]: {word:016x}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance(lanes: u32, mem_kib: u32, threads: u32) -> Instance {
        let params = Params {
            mem_kib,
            time: 1,
            lanes,
            threads,
            tag_len: 32,
            version: Version::V0x13,
        };
        Instance::new(&params, Variant::Argon2d, false)
    }

    #[test]
    fn geometry_rounds_down_to_segments() {
        let instance = instance(4, 35, 1);
        assert_eq!(instance.memory_blocks, 32);
        assert_eq!(instance.lane_length, 8);
        assert_eq!(instance.segment_length, 2);
    }

    #[test]
    fn threads_are_clamped_to_lanes() {
        assert_eq!(instance(2, 32, 8).threads, 2);
        assert_eq!(instance(4, 32, 3).threads, 3);
    }

    #[test]
    fn block_index_is_row_major() {
        let instance = instance(4, 32, 1);
        assert_eq!(instance.block_index(0, 0), 0);
        assert_eq!(instance.block_index(1, 0), 8);
        assert_eq!(instance.block_index(3, 7), 31);
    }
}
