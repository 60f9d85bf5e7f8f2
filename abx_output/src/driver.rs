//! The driver contract this workspace consumes (§6).
//!
//! Loading and enumerating driver libraries is out of scope (§1): this
//! module defines the trait the controller drives once a driver instance
//! exists, plus the small value types the trait's methods pass across the
//! boundary. A real ABI wrapper (or, in tests, the mock in
//! `controller::tests`) implements [`Driver`] and [`DriverFactory`].

use abx_format::DriverFormatDescriptor;
use bitflags::bitflags;

/// A single output channel request passed to `create_buffers`.
#[derive(Debug, Clone, Copy)]
pub struct ChannelRequest {
    pub channel_num: u32,
    pub is_input: bool,
}

/// Generic status a driver call can report. `Ok` maps to the spec's
/// `status = 0`; other variants are carried into `OutputError::DriverCallFailed`
/// by the caller, using the wrapped code for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverStatus {
    Ok,
    NotPresent,
    InvalidParameter,
    Failed(i32),
}

impl DriverStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, DriverStatus::Ok)
    }
}

/// Driver-reported buffer size negotiation range (§6: `getBufferSize`).
#[derive(Debug, Clone, Copy)]
pub struct BufferSizeRange {
    pub min: u32,
    pub max: u32,
    pub preferred: u32,
    pub granularity: i32,
}

bitflags! {
    /// Which fields of a [`TimeInfo`] the driver populated.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    pub struct TimeInfoFlags: u32 {
        const SYSTEM_TIME_VALID     = 1 << 0;
        const SAMPLE_POSITION_VALID = 1 << 1;
        const SAMPLE_RATE_VALID     = 1 << 2;
        const SPEED_VALID           = 1 << 3;
    }
}

/// Time information passed to (or synthesized for) `buffer_switch_time_info`
/// (§4.6).
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeInfo {
    pub system_time: u64,
    pub sample_position: u64,
    pub sample_rate: f64,
    pub flags: TimeInfoFlags,
}

/// Result alias for driver calls: `Err` carries the driver's raw status
/// code, which the caller wraps into `OutputError::DriverCallFailed`.
pub type DriverResult<T> = core::result::Result<T, i32>;

/// The operations the output controller drives on a loaded driver instance
/// (§6). Loading/enumeration/instantiation are the `DriverFactory`'s job;
/// once a `Driver` exists, the controller owns it exclusively.
pub trait Driver: Send {
    /// Initializes the driver with the given protocol version. Returns
    /// `false` on failure.
    fn init(&mut self, version: i32) -> bool;

    /// Queries (and, when invoked mid-stream, exercises) the `outputReady`
    /// hint. `NotPresent` means the driver does not support the
    /// optimization.
    fn output_ready(&mut self) -> DriverStatus;

    /// `(input_channels, output_channels)` the driver exposes.
    fn get_channels(&self) -> (u32, u32);

    fn get_buffer_size(&self) -> DriverResult<BufferSizeRange>;

    /// Allocates the driver's double buffers for the given channel
    /// requests at `buffer_size` frames. Returns one `BufferInfo` per
    /// request, same order.
    fn create_buffers(&mut self, requests: &[ChannelRequest], buffer_size: u32) -> DriverResult<Vec<crate::negotiated::BufferInfo>>;

    fn dispose_buffers(&mut self);

    fn get_channel_info(&self, channel: u32, is_input: bool) -> DriverResult<DriverFormatDescriptor>;

    /// `(input_latency, output_latency)` in frames. Only valid after
    /// `create_buffers`.
    fn get_latencies(&self) -> DriverResult<(u32, u32)>;

    /// `(sample_position, system_time)`.
    fn get_sample_position(&self) -> DriverResult<(u64, u64)>;

    fn get_sample_rate(&self) -> DriverResult<f64>;

    fn set_sample_rate(&mut self, rate: f64) -> DriverResult<()>;

    fn can_sample_rate(&self, rate: f64) -> bool;

    fn start(&mut self) -> DriverResult<()>;

    fn stop(&mut self) -> DriverResult<()>;

    fn get_io_format(&self) -> abx_format::FormatKind;

    fn set_io_format(&mut self, kind: abx_format::FormatKind) -> DriverResult<()>;
}

/// One enumerated driver library entry (§9: driver selection is exposed to
/// the caller rather than hard-coded).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverDescriptor {
    pub name: String,
}

/// A caller-supplied hint for which enumerated driver to instantiate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverSelection {
    Index(usize),
}

/// Enumerates and instantiates driver library entries. Stands in for the
/// out-of-scope ABI/loader wrapper described in §1.
pub trait DriverFactory {
    fn enumerate(&self) -> Vec<DriverDescriptor>;
    fn instantiate(&self, index: usize) -> Option<Box<dyn Driver>>;
}
