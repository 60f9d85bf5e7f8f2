//! The decoder-format argument to `Controller::setup_for_decoder` (§4.5).

use abx_format::FormatKind;

/// What the upstream decoder (out of scope, §1) asks the controller to
/// configure the driver for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecoderFormat {
    pub kind: FormatKind,
    pub sample_rate: f64,
    pub channels: u32,
}

impl DecoderFormat {
    pub const fn new(kind: FormatKind, sample_rate: f64, channels: u32) -> Self {
        Self { kind, sample_rate, channels }
    }
}
