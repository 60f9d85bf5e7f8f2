//! # ABX Core
//!
//! Foundational, allocation-free-on-the-hot-path mechanisms shared by the
//! rest of the ASIO output bridge workspace: a lock-free SPSC ring used by
//! the event mailbox, a stack-allocated vector used for scratch buffer
//! bookkeeping, and the shared low-level error type.

pub mod error;
pub mod spsc;
pub mod stack_vec;

pub use error::{AbxError, Result};
pub use spsc::{Consumer, Producer, SpscRingBuffer};
pub use stack_vec::StackVec;
