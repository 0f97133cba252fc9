//! # Allocator-Parameterized Storage
//!
//! Raw memory blocks, the allocator capability that hands them out, and the
//! growable double-ended buffer built on top of them.
//!
//! ## Design goals
//!
//! __Allocator agnostic__
//! Every container is parameterized over a [`Heap`]; nothing assumes the
//! process allocator, and nothing assumes allocated memory is zeroed.
//!
//! __Robust__
//! Handle out-of-memory conditions rigorously, and recoverably. A failed
//! allocation never discards live elements.
//!
//! __Strongly failure safe__
//! A failed insertion leaves a container observably unchanged.
//!
//! ## Terminology
//!
//! - _Memory block_: a sequential range of memory addresses.
//! - _Region_: a memory block sliced into front slack, live elements, and
//!   back slack.
//! - _Slack_: reserved, unmaterialized slots at either end of a region.
//! - _Compaction_: shifting live elements within a region to reclaim slack
//!   on the opposite side, without reallocating.
//! - _Relocation_: moving every live element into a fresh memory block,
//!   after which the old block is released.
//!
//! ## Components
//!
//! __Physical memory model__
//! - __[`Block`]__: the address and size of a particular memory block.
//! - __[`Layout`]__: size and alignment constraints for a memory block.
//!
//! __Memory allocators__
//! - __[`Heap`]__: an abstract memory block allocator.
//! - __[`Global`]__: `Heap` backed by the process allocator.
//! - __[`Metered`]__: `Heap` that accounts for, limits, and optionally fails,
//!   the allocations of another `Heap`.
//!
//! __Buffers__
//! - __[`DequeBuf`]__: a contiguous, growable, double-ended buffer of values.
//! - __[`GrowthPolicy`]__: the capacity growth and compaction rules of a
//!   `DequeBuf`.
//!
//! [`Block`]: block::Block
//! [`Layout`]: block::Layout
//!
//! [`Heap`]: alloc::Heap
//! [`Global`]: alloc::Global
//! [`Metered`]: alloc::Metered
//!
//! [`DequeBuf`]: buf::DequeBuf
//! [`GrowthPolicy`]: buf::GrowthPolicy

#![no_std]

extern crate alloc as core_alloc;

pub mod block;
pub mod alloc;
pub mod buf;
