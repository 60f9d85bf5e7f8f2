//! # ABX Format
//!
//! The sample-format descriptor and the dispatch matrix that converts
//! arbitrary interleaved (or pre-deinterleaved) PCM layouts into a
//! canonical deinterleaved `f64` representation.
//!
//! This crate has no knowledge of a driver or a producer — it is a pure,
//! allocation-free-on-the-hot-path conversion engine. [`dispatch::Dispatcher`]
//! is the entry point: validate a source [`format::AudioFormat`] once, then
//! call [`dispatch::Dispatcher::convert`] once per buffer switch.

pub mod buffer;
pub mod dispatch;
pub mod error;
pub mod format;
pub mod kernels;
pub mod sample_type;

pub use buffer::{BufferList, ChannelBuffer};
pub use dispatch::Dispatcher;
pub use error::{ConverterError, Result};
pub use format::{AudioFormat, FormatFlags, FormatKind};
pub use sample_type::{DriverFormatDescriptor, SampleType, describe};
