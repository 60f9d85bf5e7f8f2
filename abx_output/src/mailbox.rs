//! The RT→housekeeping event mailbox (§3, §4.7, C5).
//!
//! Built directly on `abx_core::spsc`, specialized to a small `Copy` event
//! enum rather than a raw byte stream. A typed slot is written and read
//! atomically from the caller's point of view, so there is no partial-record
//! state to detect — the spec's "short read" corruption case does not arise.
//! The bounded drop policy survives: `post` treats a full ring as a dropped,
//! retriable event, which is acceptable because every event here is either
//! idempotent (`ResetNeeded`) or advisory (`Overload`).

use abx_core::spsc::{Consumer, Producer, SpscRingBuffer};

/// Minimum mailbox capacity (§3: "capacity >= 1024" for the byte-ring this
/// is specialized from; kept as the default event-slot count here).
pub const DEFAULT_CAPACITY: usize = 1024;

/// Fixed-size control events the RT callback can post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventCode {
    StopPlayback,
    ResetNeeded,
    Overload,
}

/// RT-side handle: posts events, never blocks, never allocates.
pub struct EventMailbox {
    producer: Producer<EventCode>,
}

impl EventMailbox {
    /// Posts an event. Dropped silently if the mailbox is full (§9: a
    /// bounded drop policy is acceptable for idempotent/advisory events).
    #[inline]
    pub fn post(&mut self, event: EventCode) {
        let _ = self.producer.try_push(event);
    }
}

/// Housekeeping-side handle: drains events in FIFO order.
pub struct EventDrain {
    consumer: Consumer<EventCode>,
}

impl EventDrain {
    /// Pops and returns the next queued event, or `None` if the mailbox is
    /// empty.
    #[inline]
    pub fn try_recv(&mut self) -> Option<EventCode> {
        self.consumer.try_pop()
    }
}

/// Builds a mailbox pair with the given capacity (rounded up to a power of
/// two by the underlying ring).
pub fn channel(capacity: usize) -> (EventMailbox, EventDrain) {
    let (producer, consumer) = SpscRingBuffer::new(capacity);
    (EventMailbox { producer }, EventDrain { consumer })
}
