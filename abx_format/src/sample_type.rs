//! Driver-reported sample-type codes and the pure `describe()` mapping from
//! a [`SampleType`] to the [`AudioFormat`] it denotes.

use crate::format::{AudioFormat, FormatFlags, FormatKind};

/// The ~18 sample-type codes a driver can report for one channel.
///
/// Named after the ASIOSTxxx constants this mirrors: packed containers,
/// 32-bit containers carrying fewer significant bits, and DSD variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleType {
    Int16Lsb,
    Int16Msb,
    Int24Lsb,
    Int24Msb,
    Int32Lsb,
    Int32Msb,
    Float32Lsb,
    Float32Msb,
    Float64Lsb,
    Float64Msb,

    /// 32-bit container, 16 significant bits, little-endian.
    Int32Lsb16,
    /// 32-bit container, 16 significant bits, big-endian.
    Int32Msb16,
    /// 32-bit container, 18 significant bits, little-endian.
    Int32Lsb18,
    /// 32-bit container, 18 significant bits, big-endian.
    Int32Msb18,
    /// 32-bit container, 20 significant bits, little-endian.
    Int32Lsb20,
    /// 32-bit container, 20 significant bits, big-endian.
    Int32Msb20,
    /// 32-bit container, 24 significant bits, little-endian.
    Int32Lsb24,
    /// 32-bit container, 24 significant bits, big-endian.
    Int32Msb24,

    /// DSD, one bit per sample, eight samples packed per byte.
    DsdInt8Lsb1,
    /// DSD, one byte per sample, only the low nibble significant.
    DsdInt8Nsb,
}

/// Per-driver-channel descriptor: which channel, direction, and the wire
/// sample type the driver negotiated for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DriverFormatDescriptor {
    pub channel_index: u32,
    pub is_input: bool,
    pub sample_type: SampleType,
}

impl DriverFormatDescriptor {
    pub const fn new(channel_index: u32, is_input: bool, sample_type: SampleType) -> Self {
        Self { channel_index, is_input, sample_type }
    }

    /// The [`AudioFormat`] this channel's wire type denotes, at the given
    /// sample rate and channel count (both supplied by the caller since
    /// `SampleType` alone doesn't carry them).
    pub fn describe(&self, sample_rate: f64, channels_per_frame: u32) -> AudioFormat {
        describe(self.sample_type, sample_rate, channels_per_frame)
    }
}

/// Total function mapping a driver sample-type code to the `AudioFormat` it
/// denotes. Every `SampleType` variant is handled; there is no "unrecognized
/// code" path because the enum itself is exhaustive over the wire types this
/// workspace understands (see §4.2 and §9 of the design notes).
pub fn describe(sample_type: SampleType, sample_rate: f64, channels_per_frame: u32) -> AudioFormat {
    use SampleType::*;

    const PACKED_PCM: FormatFlags =
        FormatFlags::SIGNED_INTEGER.union(FormatFlags::NON_INTERLEAVED).union(FormatFlags::PACKED);
    const PACKED_FLOAT: FormatFlags =
        FormatFlags::FLOAT.union(FormatFlags::NON_INTERLEAVED).union(FormatFlags::PACKED);
    const CONTAINER_32: FormatFlags = FormatFlags::SIGNED_INTEGER.union(FormatFlags::NON_INTERLEAVED);

    match sample_type {
        Int16Lsb => AudioFormat::new(FormatKind::Pcm, PACKED_PCM, 16, 2, 1, sample_rate, channels_per_frame),
        Int16Msb => AudioFormat::new(
            FormatKind::Pcm,
            PACKED_PCM | FormatFlags::BIG_ENDIAN,
            16,
            2,
            1,
            sample_rate,
            channels_per_frame,
        ),
        Int24Lsb => AudioFormat::new(FormatKind::Pcm, PACKED_PCM, 24, 3, 1, sample_rate, channels_per_frame),
        Int24Msb => AudioFormat::new(
            FormatKind::Pcm,
            PACKED_PCM | FormatFlags::BIG_ENDIAN,
            24,
            3,
            1,
            sample_rate,
            channels_per_frame,
        ),
        Int32Lsb => AudioFormat::new(FormatKind::Pcm, PACKED_PCM, 32, 4, 1, sample_rate, channels_per_frame),
        Int32Msb => AudioFormat::new(
            FormatKind::Pcm,
            PACKED_PCM | FormatFlags::BIG_ENDIAN,
            32,
            4,
            1,
            sample_rate,
            channels_per_frame,
        ),
        Float32Lsb => AudioFormat::new(FormatKind::Pcm, PACKED_FLOAT, 32, 4, 1, sample_rate, channels_per_frame),
        Float32Msb => AudioFormat::new(
            FormatKind::Pcm,
            PACKED_FLOAT | FormatFlags::BIG_ENDIAN,
            32,
            4,
            1,
            sample_rate,
            channels_per_frame,
        ),
        Float64Lsb => AudioFormat::new(FormatKind::Pcm, PACKED_FLOAT, 64, 8, 1, sample_rate, channels_per_frame),
        Float64Msb => AudioFormat::new(
            FormatKind::Pcm,
            PACKED_FLOAT | FormatFlags::BIG_ENDIAN,
            64,
            8,
            1,
            sample_rate,
            channels_per_frame,
        ),

        Int32Lsb16 => AudioFormat::new(FormatKind::Pcm, CONTAINER_32, 16, 4, 1, sample_rate, channels_per_frame),
        Int32Msb16 => AudioFormat::new(
            FormatKind::Pcm,
            CONTAINER_32 | FormatFlags::BIG_ENDIAN,
            16,
            4,
            1,
            sample_rate,
            channels_per_frame,
        ),
        Int32Lsb18 => AudioFormat::new(FormatKind::Pcm, CONTAINER_32, 18, 4, 1, sample_rate, channels_per_frame),
        Int32Msb18 => AudioFormat::new(
            FormatKind::Pcm,
            CONTAINER_32 | FormatFlags::BIG_ENDIAN,
            18,
            4,
            1,
            sample_rate,
            channels_per_frame,
        ),
        Int32Lsb20 => AudioFormat::new(FormatKind::Pcm, CONTAINER_32, 20, 4, 1, sample_rate, channels_per_frame),
        Int32Msb20 => AudioFormat::new(
            FormatKind::Pcm,
            CONTAINER_32 | FormatFlags::BIG_ENDIAN,
            20,
            4,
            1,
            sample_rate,
            channels_per_frame,
        ),
        Int32Lsb24 => AudioFormat::new(FormatKind::Pcm, CONTAINER_32, 24, 4, 1, sample_rate, channels_per_frame),
        Int32Msb24 => AudioFormat::new(
            FormatKind::Pcm,
            CONTAINER_32 | FormatFlags::BIG_ENDIAN,
            24,
            4,
            1,
            sample_rate,
            channels_per_frame,
        ),

        DsdInt8Lsb1 => {
            AudioFormat::new(FormatKind::Dsd, FormatFlags::NON_INTERLEAVED, 1, 1, 8, sample_rate, channels_per_frame)
        }
        DsdInt8Nsb => {
            AudioFormat::new(FormatKind::Dsd, FormatFlags::NON_INTERLEAVED, 8, 1, 1, sample_rate, channels_per_frame)
        }
    }
}
