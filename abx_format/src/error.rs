//! Error type returned when constructing a [`crate::dispatch::Dispatcher`].
//!
//! Every variant corresponds to a precondition rejected once, at dispatcher
//! construction time, rather than re-checked on every call (see
//! `dispatch::Dispatcher::new`).

use core::fmt;

/// Reasons a source [`crate::format::AudioFormat`] cannot be dispatched.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConverterError {
    /// `format_kind` was not `Pcm`. DSD conversion is not implemented.
    UnsupportedEncoding,
    /// A `PACKED` format declared a `sample_width` outside `{1, 2, 3, 4}`.
    UnsupportedPackedWidth,
    /// A non-packed format declared a container outside `{1, 2, 3, 4}` bytes,
    /// or `bits_per_channel` outside `{8, 16, 24}`.
    UnsupportedAlignedWidth,
}

impl fmt::Display for ConverterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConverterError::UnsupportedEncoding => write!(f, "unsupported encoding (only PCM is convertible)"),
            ConverterError::UnsupportedPackedWidth => write!(f, "unsupported packed sample width"),
            ConverterError::UnsupportedAlignedWidth => write!(f, "unsupported aligned sample width"),
        }
    }
}

impl std::error::Error for ConverterError {}

/// Result alias for `abx_format` operations.
pub type Result<T> = core::result::Result<T, ConverterError>;
