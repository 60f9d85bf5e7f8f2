//! Shared low-level error type for the ASIO output bridge workspace.
//!
//! This module provides a C-compatible error enum and a `Result` type alias
//! used by the foundational collections in this crate, and reused by the
//! higher crates in the workspace for their own leaf-level failures.

use core::fmt;

/// Error codes shared across the ASIO output bridge workspace.
///
/// Uses `#[repr(C)]` for C-compatible memory layout, since the controller
/// this workspace serves ultimately sits behind a foreign driver ABI.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbxError {
    /// A null pointer was passed where a valid pointer was expected.
    NullPointer = 1,
    /// An invalid parameter value was provided.
    InvalidParameter = 2,
    /// A fixed-capacity collection could not accept another element.
    CapacityExceeded = 3,
    /// Memory allocation failed.
    AllocationFailed = 4,
}

impl fmt::Display for AbxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbxError::NullPointer => write!(f, "null pointer"),
            AbxError::InvalidParameter => write!(f, "invalid parameter"),
            AbxError::CapacityExceeded => write!(f, "capacity exceeded"),
            AbxError::AllocationFailed => write!(f, "allocation failed"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for AbxError {}

/// Result type alias for low-level `abx_core` operations.
pub type Result<T> = core::result::Result<T, AbxError>;
