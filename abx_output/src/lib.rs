//! # ABX Output
//!
//! The ASIO-style output controller: driver lifecycle, buffer negotiation,
//! and the realtime callback adapter that pulls audio from a [`Producer`]
//! once per buffer switch.
//!
//! This crate owns no driver ABI and no decoder — both are supplied by the
//! caller through the [`driver`] and [`producer`] traits. What it owns is
//! the state machine in [`controller`] and the lock-free event path in
//! [`mailbox`] that lets the realtime callback ask the control domain to
//! stop or reset without itself blocking or allocating.

pub mod controller;
pub mod decoder;
pub mod driver;
pub mod error;
pub mod mailbox;
pub mod negotiated;
pub mod producer;

pub use controller::{Controller, ControllerState};
pub use decoder::DecoderFormat;
pub use driver::{
    BufferSizeRange, ChannelRequest, Driver, DriverDescriptor, DriverFactory, DriverResult, DriverSelection, DriverStatus, TimeInfo,
    TimeInfoFlags,
};
pub use error::{OutputError, Result};
pub use mailbox::{EventCode, EventDrain, EventMailbox};
pub use negotiated::{BufferInfo, ChannelInfo, DriverNegotiated, RingLayout, ScratchView};
pub use producer::Producer;
