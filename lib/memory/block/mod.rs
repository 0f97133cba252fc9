//! Untyped memory model.

mod block;
mod layout;

pub use self::block::Block;
pub use self::layout::{Layout, LayoutError};
