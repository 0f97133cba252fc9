//! Dynamic memory allocators.

mod heap;
mod global;
mod metered;

pub use self::heap::{Heap, HeapError};
pub use self::global::Global;
pub use self::metered::Metered;
