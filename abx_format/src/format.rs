//! The `AudioFormat` value type: encoding, flags, width, channel count, and rate.

use bitflags::bitflags;

/// Top-level encoding family of an [`AudioFormat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatKind {
    /// Ordinary pulse-code modulation, integer or floating point.
    Pcm,
    /// Direct Stream Digital: one-bit high-rate PCM.
    Dsd,
}

bitflags! {
    /// Bitset describing the layout of samples within an [`AudioFormat`].
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FormatFlags: u8 {
        /// Samples are signed integers.
        const SIGNED_INTEGER  = 1 << 0;
        /// Samples are IEEE-754 floating point.
        const FLOAT           = 1 << 1;
        /// `bits_per_channel == 8 * sample_width`; no padding.
        const PACKED          = 1 << 2;
        /// Channels are stored in separate buffers rather than interleaved.
        const NON_INTERLEAVED = 1 << 3;
        /// Multi-byte samples are stored most-significant-byte first.
        const BIG_ENDIAN      = 1 << 4;
        /// A sub-container sample occupies the high-order bits of its container.
        const ALIGNED_HIGH    = 1 << 5;
    }
}

/// A value type describing the memory layout of one frame of audio.
///
/// Mirrors the negotiated wire format exchanged with a driver: encoding
/// family, layout flags, per-channel bit width, and the derived byte
/// geometry of a packet/frame. Constructed once via [`AudioFormat::new`]
/// and never mutated afterwards — any change in format is represented as
/// a new value, never an in-place edit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioFormat {
    pub format_kind: FormatKind,
    pub flags: FormatFlags,
    pub bits_per_channel: u32,
    pub bytes_per_packet: u32,
    pub frames_per_packet: u32,
    pub bytes_per_frame: u32,
    pub sample_rate: f64,
    pub channels_per_frame: u32,
}

impl AudioFormat {
    /// Build a format from explicit fields, enforcing the one invariant that
    /// is cheap to check at construction time: `bytes_per_frame =
    /// bytes_per_packet * frames_per_packet`, except for the DSD-1-bit
    /// sentinel case where `bytes_per_frame == 0` by convention (a 1-bit DSD
    /// frame does not occupy a whole byte).
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        format_kind: FormatKind,
        flags: FormatFlags,
        bits_per_channel: u32,
        bytes_per_packet: u32,
        frames_per_packet: u32,
        sample_rate: f64,
        channels_per_frame: u32,
    ) -> Self {
        let bytes_per_frame = if bits_per_channel == 1 {
            0
        } else {
            bytes_per_packet.saturating_mul(frames_per_packet)
        };
        debug_assert!(
            bytes_per_frame == 0 || bytes_per_frame == bytes_per_packet * frames_per_packet,
            "bytes_per_frame must equal bytes_per_packet * frames_per_packet"
        );
        Self {
            format_kind,
            flags,
            bits_per_channel,
            bytes_per_packet,
            frames_per_packet,
            bytes_per_frame,
            sample_rate,
            channels_per_frame,
        }
    }

    /// An all-zero format, used as the sentinel return value for
    /// unrecognized sample-type codes (see `sample_type::describe`).
    pub const fn zeroed() -> Self {
        Self {
            format_kind: FormatKind::Pcm,
            flags: FormatFlags::empty(),
            bits_per_channel: 0,
            bytes_per_packet: 0,
            frames_per_packet: 0,
            bytes_per_frame: 0,
            sample_rate: 0.0,
            channels_per_frame: 0,
        }
    }

    #[inline]
    pub fn is_pcm(&self) -> bool {
        matches!(self.format_kind, FormatKind::Pcm)
    }

    #[inline]
    pub fn is_dsd(&self) -> bool {
        matches!(self.format_kind, FormatKind::Dsd)
    }

    #[inline]
    pub fn is_float(&self) -> bool {
        self.flags.contains(FormatFlags::FLOAT)
    }

    #[inline]
    pub fn is_packed(&self) -> bool {
        self.flags.contains(FormatFlags::PACKED)
    }

    #[inline]
    pub fn is_aligned_high(&self) -> bool {
        self.flags.contains(FormatFlags::ALIGNED_HIGH)
    }

    #[inline]
    pub fn is_non_interleaved(&self) -> bool {
        self.flags.contains(FormatFlags::NON_INTERLEAVED)
    }

    #[inline]
    pub fn is_big_endian(&self) -> bool {
        self.flags.contains(FormatFlags::BIG_ENDIAN)
    }

    /// Number of bytes occupied by `n` frames of this format.
    #[inline]
    pub fn frame_count_to_byte_count(&self, n: u32) -> u32 {
        n.saturating_mul(self.bytes_per_frame)
    }

    /// The number of interleaved channels present in one packet: 1 for
    /// non-interleaved formats (each channel arrives in its own buffer),
    /// or `channels_per_frame` otherwise.
    #[inline]
    pub fn interleaved_channels(&self) -> u32 {
        if self.is_non_interleaved() { 1 } else { self.channels_per_frame.max(1) }
    }

    /// The width, in bytes, of a single channel's sample container.
    #[inline]
    pub fn sample_width(&self) -> u32 {
        let interleaved = self.interleaved_channels();
        if interleaved == 0 { 0 } else { self.bytes_per_frame / interleaved }
    }
}
