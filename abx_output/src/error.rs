//! Error taxonomy for the output controller (§7).

use core::fmt;

/// Reasons a controller operation can fail.
///
/// Control-domain operations return one of these plus a logged reason; the
/// RT callback never surfaces a variant of this type (§7: underruns become
/// silence, unexpected driver states are ignored).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputError {
    /// Enumeration, load, instantiation, or `init` of the driver failed.
    DriverUnavailable,
    /// The decoder's format was neither PCM nor DSD, or the driver rejected
    /// the requested IO format.
    FormatUnsupported,
    /// `can_sample_rate` returned non-OK for the requested rate.
    RateUnsupported,
    /// Allocation of `buffer_info`, `channel_info`, or the scratch view
    /// failed.
    ResourceExhausted,
    /// A specific driver call returned a non-OK status, carried here for
    /// logging.
    DriverCallFailed(i32),
    /// The operation's precondition did not hold in the controller's
    /// current state (e.g. `Start` while already running).
    StateViolation,
}

impl fmt::Display for OutputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputError::DriverUnavailable => write!(f, "driver unavailable"),
            OutputError::FormatUnsupported => write!(f, "format unsupported"),
            OutputError::RateUnsupported => write!(f, "sample rate unsupported"),
            OutputError::ResourceExhausted => write!(f, "resource exhausted"),
            OutputError::DriverCallFailed(code) => write!(f, "driver call failed (code {code})"),
            OutputError::StateViolation => write!(f, "state violation"),
        }
    }
}

impl std::error::Error for OutputError {}

/// Result alias for `abx_output` operations.
pub type Result<T> = core::result::Result<T, OutputError>;
