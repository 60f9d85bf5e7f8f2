//! Driver-negotiated configuration (§3, C6): the process-wide state that is
//! immutable between `Start` and `Stop`, mutated only by control-domain
//! operations.

use abx_format::{BufferList, SampleType};

/// One double-buffer pair as handed back by the driver's `create_buffers`.
///
/// Ownership of the pointed-to memory is always the driver's; the
/// controller holds only a borrow, and only for the duration of a single
/// RT callback.
#[derive(Debug, Clone, Copy)]
pub struct BufferInfo {
    pub is_input: bool,
    pub channel_num: u32,
    /// The two halves of the double buffer; index picks the currently
    /// inactive one, per the callback's `index` argument.
    pub buffers: [*mut u8; 2],
}

// SAFETY: a `BufferInfo` is a bare pointer pair; the driver guarantees the
// memory outlives the buffers and synchronizes access via the
// buffer-switch protocol itself, not via Rust's aliasing rules.
unsafe impl Send for BufferInfo {}

/// Per-channel wire format, as reported by the driver's `get_channel_info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelInfo {
    pub channel: u32,
    pub is_input: bool,
    pub sample_type: SampleType,
    /// Per-channel container width in bytes, precomputed at negotiation
    /// time so the RT callback never has to derive it from `sample_type`.
    pub bytes_per_frame: u32,
}

/// The negotiated state produced by `Controller::setup_for_decoder` and
/// consumed by the RT callback adapter.
///
/// `buffer_info` and `channel_info` are equal length and identically
/// indexed; the first `input_count` entries are inputs (always `0` in this
/// workspace — inputs are out of scope) and the remainder are outputs.
pub struct DriverNegotiated {
    pub min_buf: u32,
    pub max_buf: u32,
    pub preferred_buf: u32,
    pub buf_granularity: i32,
    pub input_latency: u32,
    pub output_latency: u32,
    pub sample_rate: f64,
    pub post_output: bool,
    pub buffer_info: Vec<BufferInfo>,
    pub channel_info: Vec<ChannelInfo>,
    pub input_count: usize,
    pub output_count: usize,
}

impl DriverNegotiated {
    /// Index of the `n`th output channel's entry within `buffer_info` /
    /// `channel_info` (outputs always follow the — here empty — input
    /// run).
    #[inline]
    pub fn output_index(&self, output_channel: usize) -> usize {
        self.input_count + output_channel
    }
}

/// The channel layout of the producer's ring buffer, returned alongside
/// `ring_format` from `setup_for_decoder`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingLayout {
    pub channels: u32,
}

/// The scratch scatter/gather view the RT callback rebinds onto the
/// driver's currently-inactive double buffer each switch. A type alias over
/// `abx_format::BufferList`: both are a fixed-capacity array of non-owning
/// `{data, byte_size, channel_count = 1}` views (§3).
pub type ScratchView = BufferList;
