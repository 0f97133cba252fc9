//! # Collection Data Structures
//!
//! Containers composed from the storage primitives of `ark_mem`.
//!
//! - __[`BlockingQueue`]__: a thread-safe, unbounded FIFO queue with blocking
//!   consumers, stored in a `DequeBuf`.
//!
//! [`BlockingQueue`]: blocking_queue::BlockingQueue

pub mod blocking_queue;
