//! The sample-format dispatcher (§4.3): validates a source `AudioFormat`
//! once at construction, then on every call walks the dispatch tree to pick
//! a conversion kernel and run it.

use crate::{
    buffer::BufferList,
    error::{ConverterError, Result},
    format::AudioFormat,
    kernels,
};

/// Which leaf family a validated source format resolves to. Computed once
/// at construction so the per-call path is a single match, not a chain of
/// flag checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Float { width: usize },
    Packed { width: usize },
    AlignedHigh { container: usize },
    AlignedLow { container: usize, shift_bits: u32 },
}

/// Converts one interleaved (or pre-deinterleaved) frame block of a fixed
/// source `AudioFormat` into deinterleaved `f64` channel buffers.
///
/// Construction validates the source format once (§4.3 preconditions);
/// after that, [`Dispatcher::convert`] never fails and never allocates —
/// the scratch buffer used by low-aligned kernels is sized and owned here,
/// at construction time, for exactly this reason.
pub struct Dispatcher {
    format: AudioFormat,
    shape: Shape,
    channels: usize,
    interleaved: bool,
    big_endian: bool,
    max_frames: usize,
    /// Bytes needed per frame across *all* channels when copying into
    /// `scratch`: `bytes_per_frame` already spans every channel for an
    /// interleaved source, but for a non-interleaved source it is a
    /// per-channel width, so it must be multiplied by `channels` there.
    scratch_frame_stride: usize,
    scratch: Vec<u8>,
}

impl Dispatcher {
    /// Validates `format` and allocates the scratch buffer used by
    /// low-aligned kernels, sized for up to `max_frames` per call. Calling
    /// [`Dispatcher::convert`] with more than `max_frames` is a logic error
    /// (debug-asserted); the RT caller is expected to size `max_frames` to
    /// the driver's negotiated `preferred_buf`.
    pub fn new(format: AudioFormat, max_frames: usize) -> Result<Self> {
        if !format.is_pcm() {
            return Err(ConverterError::UnsupportedEncoding);
        }

        let channels = format.interleaved_channels() as usize;
        let sample_width = format.sample_width() as usize;
        let big_endian = format.is_big_endian();
        let interleaved = !format.is_non_interleaved();
        // The number of *output* channels is always `channels_per_frame`;
        // `interleaved_channels()` degenerates to 1 for non-interleaved
        // sources because each input buffer already holds one channel.
        let output_channels = format.channels_per_frame.max(1) as usize;

        let shape = if format.is_float() {
            match format.bits_per_channel {
                32 | 64 => Shape::Float { width: sample_width },
                _ => return Err(ConverterError::UnsupportedPackedWidth),
            }
        } else if format.is_packed() {
            match sample_width {
                1 | 2 | 3 | 4 => Shape::Packed { width: sample_width },
                _ => return Err(ConverterError::UnsupportedPackedWidth),
            }
        } else {
            // Non-packed: container must be 1..=4 bytes and declared bits
            // one of {8, 16, 24}.
            if !(1..=4).contains(&sample_width) || !matches!(format.bits_per_channel, 8 | 16 | 24) {
                return Err(ConverterError::UnsupportedAlignedWidth);
            }
            if format.is_aligned_high() {
                Shape::AlignedHigh { container: sample_width }
            } else {
                let shift_bits = sample_width as u32 * 8 - format.bits_per_channel;
                Shape::AlignedLow { container: sample_width, shift_bits }
            }
        };

        // `bytes_per_frame` is per-channel for non-interleaved sources (see
        // `AudioFormat::sample_width`), so the scratch buffer needs enough
        // room for every channel's copy, not just one.
        let scratch_frame_stride = format.bytes_per_frame as usize * if interleaved { 1 } else { output_channels };
        let scratch_len = max_frames * scratch_frame_stride;
        Ok(Self {
            format,
            shape,
            channels: output_channels,
            interleaved,
            big_endian,
            max_frames,
            scratch_frame_stride,
            scratch: vec![0u8; scratch_len],
        })
    }

    pub fn format(&self) -> &AudioFormat {
        &self.format
    }

    /// Converts `frames` frames from `input` into `output`. Returns the
    /// number of frames written, which is always `frames` (§4.3: failure
    /// modes are rejected at construction, not per call).
    ///
    /// # Safety
    ///
    /// `input` and `output` must be bound over memory large enough to hold
    /// `frames` frames of this dispatcher's source/`f64` formats
    /// respectively — the same obligation `ChannelBuffer::new` already
    /// carries.
    pub fn convert(&mut self, input: &BufferList, output: &mut BufferList, frames: usize) -> usize {
        if frames == 0 {
            output.zero_all_byte_sizes();
            return 0;
        }
        debug_assert!(frames <= self.max_frames, "frame count exceeds dispatcher's pre-sized scratch buffer");

        match self.shape {
            Shape::Float { width: 4 } => {
                kernels::convert_float32(input, output, frames, self.channels, self.interleaved, self.big_endian)
            }
            Shape::Float { width: 8 } => {
                kernels::convert_float64(input, output, frames, self.channels, self.interleaved, self.big_endian)
            }
            Shape::Float { .. } => unreachable!("validated at construction"),

            Shape::Packed { width: 3 } => {
                kernels::convert_packed24(input, output, frames, self.channels, self.interleaved, self.big_endian)
            }
            Shape::Packed { width } if self.format.flags.contains(crate::format::FormatFlags::SIGNED_INTEGER) => {
                kernels::convert_packed_signed(input, output, frames, self.channels, self.interleaved, width, self.big_endian)
            }
            Shape::Packed { width } => {
                kernels::convert_packed_unsigned(input, output, frames, self.channels, self.interleaved, width, self.big_endian)
            }

            Shape::AlignedHigh { container: 4 } if self.format.bits_per_channel == 24 => kernels::convert_high_aligned_24_in_32(
                input,
                output,
                frames,
                self.channels,
                self.interleaved,
                self.big_endian,
            ),
            Shape::AlignedHigh { container } => {
                kernels::convert_high_aligned(input, output, frames, self.channels, self.interleaved, container, self.big_endian)
            }

            Shape::AlignedLow { container, shift_bits } => {
                self.convert_low_aligned(input, output, frames, container, shift_bits)
            }
        }

        frames
    }

    /// Copies the input frame block into the dispatcher's scratch buffer,
    /// shifts every container from low-aligned to high-aligned in place
    /// *within the copy*, then delegates to the high-aligned kernel over
    /// the scratch. The caller's `input` is never mutated (§4.4, §9).
    fn convert_low_aligned(&mut self, input: &BufferList, output: &mut BufferList, frames: usize, container: usize, shift_bits: u32) {
        let bytes_needed = frames * self.scratch_frame_stride;
        let scratch = &mut self.scratch[..bytes_needed];

        let mut cursor = 0;
        for ch in input.iter() {
            let src = unsafe { ch.as_bytes() };
            let len = src.len().min(scratch.len() - cursor);
            scratch[cursor..cursor + len].copy_from_slice(&src[..len]);
            cursor += len;
        }

        kernels::shift_low_aligned_to_high(scratch, container, shift_bits, self.big_endian);

        let mut scratch_list = BufferList::new();
        if self.interleaved {
            scratch_list.push(unsafe { crate::buffer::ChannelBuffer::new(scratch.as_mut_ptr(), scratch.len()) }).ok();
        } else {
            let per_channel = frames * container;
            for chunk in scratch.chunks_mut(per_channel) {
                scratch_list.push(unsafe { crate::buffer::ChannelBuffer::new(chunk.as_mut_ptr(), chunk.len()) }).ok();
            }
        }

        if container == 4 && self.format.bits_per_channel == 24 {
            kernels::convert_high_aligned_24_in_32(&scratch_list, output, frames, self.channels, self.interleaved, self.big_endian);
        } else {
            kernels::convert_high_aligned(&scratch_list, output, frames, self.channels, self.interleaved, container, self.big_endian);
        }
    }
}
