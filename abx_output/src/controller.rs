//! The output controller (§4.5-4.7, C6-C8): driver lifecycle, buffer
//! negotiation, and the RT callback adapter.

use std::sync::atomic::{AtomicBool, Ordering};

use abx_format::{AudioFormat, FormatKind, describe};

use crate::{
    decoder::DecoderFormat,
    driver::{BufferSizeRange, ChannelRequest, Driver, DriverFactory, DriverSelection, DriverStatus},
    error::{OutputError, Result},
    mailbox::{self, EventCode, EventDrain, EventMailbox},
    negotiated::{BufferInfo, ChannelInfo, DriverNegotiated, RingLayout, ScratchView},
    producer::Producer,
};

const PROTOCOL_VERSION: i32 = 2;

/// `asioMessage` selector codes consulted in §4.6. Only the selectors this
/// controller acts on are named; everything else falls through to `0`.
const SEL_SELECTOR_SUPPORTED: i32 = 1;
const SEL_ENGINE_VERSION: i32 = 2;
const SEL_RESET_REQUEST: i32 = 3;
const SEL_RESYNC_REQUEST: i32 = 4;
const SEL_LATENCIES_CHANGED: i32 = 5;
const SEL_SUPPORTS_TIME_INFO: i32 = 6;
const SEL_SUPPORTS_TIME_CODE: i32 = 7;
const SEL_SUPPORTS_INPUT_MONITOR: i32 = 8;
const SEL_OVERLOAD: i32 = 9;

/// Because the driver's callback ABI carries no context pointer, only one
/// controller may be `Running` at a time in the process (§5, §9). `Start`
/// claims this flag; `Stop` releases it.
static ACTIVE_OWNER: AtomicBool = AtomicBool::new(false);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Closed,
    Open,
    Configured,
    Running,
}

/// The state machine described in §4.5: `Closed -> Open -> Configured ->
/// Running`, plus `Reset` (returns to `Open`, buffers torn down) and
/// `RequestStop` (posts an event, asynchronous).
pub struct Controller {
    state: ControllerState,
    driver: Option<Box<dyn Driver>>,
    negotiated: Option<DriverNegotiated>,
    producer: Box<dyn Producer>,
    scratch: ScratchView,
    post_output: bool,
    mailbox: EventMailbox,
    drain: EventDrain,
}

impl Controller {
    /// Builds a closed controller wired to `producer` (the ring-buffer
    /// source the RT callback pulls from) and a default-capacity event
    /// mailbox.
    pub fn new(producer: Box<dyn Producer>) -> Self {
        let (mailbox, drain) = mailbox::channel(mailbox::DEFAULT_CAPACITY);
        Self {
            state: ControllerState::Closed,
            driver: None,
            negotiated: None,
            producer,
            scratch: ScratchView::new(),
            post_output: false,
            mailbox,
            drain,
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Lists the driver library entries `factory` can instantiate (§9:
    /// driver selection is exposed to the caller rather than hard-coded).
    pub fn enumerate_drivers(factory: &dyn DriverFactory) -> Vec<crate::driver::DriverDescriptor> {
        factory.enumerate()
    }

    /// `Closed -> Open`. Enumerates, instantiates, and initializes a
    /// driver; caches `outputReady` support.
    pub fn open(&mut self, factory: &dyn DriverFactory, hint: Option<DriverSelection>) -> Result<()> {
        if self.state != ControllerState::Closed {
            return Err(OutputError::StateViolation);
        }
        let index = match hint {
            Some(DriverSelection::Index(i)) => i,
            None => 0,
        };
        let mut driver = factory.instantiate(index).ok_or(OutputError::DriverUnavailable)?;
        if !driver.init(PROTOCOL_VERSION) {
            return Err(OutputError::DriverUnavailable);
        }
        self.post_output = !matches!(driver.output_ready(), DriverStatus::NotPresent);
        self.driver = Some(driver);
        self.state = ControllerState::Open;
        log::info!("opened driver at index {index}");
        Ok(())
    }

    /// Disposes driver buffers, drops the driver instance, clears negotiated
    /// state. Idempotent: returns `false` if already `Closed`.
    pub fn close(&mut self) -> bool {
        if self.state == ControllerState::Closed {
            return false;
        }
        if let Some(mut driver) = self.driver.take() {
            driver.dispose_buffers();
        }
        self.negotiated = None;
        self.scratch = ScratchView::new();
        self.state = ControllerState::Closed;
        true
    }

    /// `Open -> Configured` (or `Configured -> Configured`, tearing down and
    /// renegotiating). See §4.5 for the full sequence.
    pub fn setup_for_decoder(&mut self, decoder: &DecoderFormat) -> Result<(AudioFormat, RingLayout)> {
        if !matches!(self.state, ControllerState::Open | ControllerState::Configured) {
            return Err(OutputError::StateViolation);
        }
        let driver = self.driver.as_mut().ok_or(OutputError::StateViolation)?;

        driver.dispose_buffers();
        self.negotiated = None;
        self.scratch = ScratchView::new();

        driver.set_io_format(decoder.kind).map_err(|_| OutputError::FormatUnsupported)?;

        if !driver.can_sample_rate(decoder.sample_rate) {
            return Err(OutputError::RateUnsupported);
        }
        driver.set_sample_rate(decoder.sample_rate).map_err(OutputError::DriverCallFailed)?;

        let _ = driver.get_io_format();
        let sample_rate = driver.get_sample_rate().map_err(OutputError::DriverCallFailed)?;

        let (_driver_inputs, driver_outputs) = driver.get_channels();
        let input_count = 0usize;
        let output_count = driver_outputs.min(decoder.channels) as usize;
        if output_count == 0 {
            return Err(OutputError::ResourceExhausted);
        }

        let range: BufferSizeRange = driver.get_buffer_size().map_err(OutputError::DriverCallFailed)?;

        let requests: Vec<ChannelRequest> =
            (0..output_count).map(|i| ChannelRequest { channel_num: i as u32, is_input: false }).collect();
        let raw_buffer_info = driver.create_buffers(&requests, range.preferred).map_err(OutputError::DriverCallFailed)?;

        let (input_latency, output_latency) = driver.get_latencies().map_err(OutputError::DriverCallFailed)?;

        let mut channel_info = Vec::with_capacity(output_count);
        for i in 0..output_count {
            let descriptor = driver.get_channel_info(i as u32, false).map_err(OutputError::DriverCallFailed)?;
            let bytes_per_frame = describe(descriptor.sample_type, sample_rate, 1).bytes_per_frame;
            channel_info.push(ChannelInfo { channel: i as u32, is_input: false, sample_type: descriptor.sample_type, bytes_per_frame });
        }

        let buffer_info: Vec<BufferInfo> = raw_buffer_info;
        let ring_format = describe(channel_info[0].sample_type, sample_rate, decoder.channels);

        let needed = 4 * range.preferred;
        if self.producer.ring_buffer_capacity() < needed {
            self.producer.set_ring_buffer_capacity(needed);
        }

        let mut scratch = ScratchView::new();
        for _ in 0..output_count {
            scratch.push(abx_format::ChannelBuffer::dangling()).ok();
        }
        self.scratch = scratch;

        self.negotiated = Some(DriverNegotiated {
            min_buf: range.min,
            max_buf: range.max,
            preferred_buf: range.preferred,
            buf_granularity: range.granularity,
            input_latency,
            output_latency,
            sample_rate,
            post_output: self.post_output,
            buffer_info,
            channel_info,
            input_count,
            output_count,
        });
        self.state = ControllerState::Configured;

        log::info!(
            "configured for decoder: {} output channel(s) at {sample_rate} Hz, preferred_buf={}, latency(in/out)={input_latency}/{output_latency}",
            self.negotiated.as_ref().unwrap().output_count,
            self.negotiated.as_ref().unwrap().preferred_buf,
        );

        Ok((ring_format, RingLayout { channels: decoder.channels }))
    }

    /// `Configured -> Running`. Refuses to run if another controller in the
    /// process already owns the driver callbacks (§5, §9).
    pub fn start(&mut self) -> Result<()> {
        if self.state != ControllerState::Configured {
            return Err(OutputError::StateViolation);
        }
        if ACTIVE_OWNER.swap(true, Ordering::AcqRel) {
            return Err(OutputError::StateViolation);
        }
        let driver = self.driver.as_mut().ok_or(OutputError::StateViolation)?;
        match driver.start() {
            Ok(()) => {
                self.state = ControllerState::Running;
                let preferred_buf = self.negotiated.as_ref().map(|n| n.preferred_buf).unwrap_or(0);
                log::info!("started: preferred_buf={preferred_buf}");
                Ok(())
            }
            Err(code) => {
                ACTIVE_OWNER.store(false, Ordering::Release);
                Err(OutputError::DriverCallFailed(code))
            }
        }
    }

    /// `Running -> Configured`. Synchronous; the caller must not hold any
    /// lock the RT callback could wait on (§4.5 — a best-practice note, not
    /// a hard invariant, since the RT callback never blocks on such a lock
    /// by construction).
    pub fn stop(&mut self) -> Result<()> {
        if self.state != ControllerState::Running {
            return Err(OutputError::StateViolation);
        }
        let driver = self.driver.as_mut().ok_or(OutputError::StateViolation)?;
        let result = driver.stop();
        ACTIVE_OWNER.store(false, Ordering::Release);
        self.state = ControllerState::Configured;
        if result.is_ok() {
            log::info!("stopped");
        }
        result.map_err(OutputError::DriverCallFailed)
    }

    /// Non-blocking: posts `StopPlayback` for the housekeeping task to act
    /// on (§4.5).
    pub fn request_stop(&mut self) {
        self.mailbox.post(EventCode::StopPlayback);
    }

    /// `Stop()`, `disposeBuffers()`, re-`init()`, refresh `postOutput`.
    /// Buffers remain absent until the next `setup_for_decoder` — the
    /// controller lands back in `Open`, not `Configured` (§9: resolves the
    /// diagram's `Running -> Configured -> Running` label, which describes
    /// the eventual outcome once the caller re-negotiates, not an implicit
    /// buffer rebuild).
    pub fn reset(&mut self) -> Result<()> {
        if self.state == ControllerState::Running {
            self.stop()?;
        }
        let driver = self.driver.as_mut().ok_or(OutputError::StateViolation)?;
        driver.dispose_buffers();
        self.negotiated = None;
        self.scratch = ScratchView::new();
        if !driver.init(PROTOCOL_VERSION) {
            self.state = ControllerState::Closed;
            return Err(OutputError::DriverUnavailable);
        }
        self.post_output = !matches!(driver.output_ready(), DriverStatus::NotPresent);
        self.state = ControllerState::Open;
        log::info!("reset: post_output={}", self.post_output);
        Ok(())
    }

    pub fn device_io_format(&self) -> Result<FormatKind> {
        let driver = self.driver.as_ref().ok_or(OutputError::StateViolation)?;
        Ok(driver.get_io_format())
    }

    pub fn set_device_io_format(&mut self, kind: FormatKind) -> Result<()> {
        let driver = self.driver.as_mut().ok_or(OutputError::StateViolation)?;
        driver.set_io_format(kind).map_err(|_| OutputError::FormatUnsupported)
    }

    pub fn device_sample_rate(&self) -> Result<f64> {
        let driver = self.driver.as_ref().ok_or(OutputError::StateViolation)?;
        driver.get_sample_rate().map_err(OutputError::DriverCallFailed)
    }

    pub fn set_device_sample_rate(&mut self, rate: f64) -> Result<()> {
        let driver = self.driver.as_mut().ok_or(OutputError::StateViolation)?;
        if !driver.can_sample_rate(rate) {
            return Err(OutputError::RateUnsupported);
        }
        driver.set_sample_rate(rate).map_err(OutputError::DriverCallFailed)
    }

    /// Legacy callback shape (§4.6): synthesizes a minimal `TimeInfo` from
    /// `getSamplePosition` and delegates to the time-info form.
    pub fn on_buffer_switch(&mut self, index: i32, direct_process: bool) -> crate::driver::TimeInfo {
        use crate::driver::TimeInfoFlags;

        let time_info = self
            .driver
            .as_ref()
            .and_then(|d| d.get_sample_position().ok())
            .map(|(sample_position, system_time)| crate::driver::TimeInfo {
                system_time,
                sample_position,
                sample_rate: self.negotiated.as_ref().map(|n| n.sample_rate).unwrap_or(0.0),
                flags: TimeInfoFlags::SYSTEM_TIME_VALID | TimeInfoFlags::SAMPLE_POSITION_VALID,
            })
            .unwrap_or_default();
        self.on_buffer_switch_time_info(time_info, index, direct_process)
    }

    /// The RT critical path (§4.6). No allocation, no locks, no logging: the
    /// scratch view is pre-sized at `setup_for_decoder` time and only
    /// rebound here.
    pub fn on_buffer_switch_time_info(&mut self, time_info: crate::driver::TimeInfo, index: i32, _direct_process: bool) -> crate::driver::TimeInfo {
        let Some(negotiated) = self.negotiated.as_ref() else {
            return time_info;
        };
        let preferred = negotiated.preferred_buf;
        let half = (index as usize) & 1;

        for out_ch in 0..negotiated.output_count {
            let neg_idx = negotiated.output_index(out_ch);
            let (Some(info), Some(chan)) = (negotiated.buffer_info.get(neg_idx), negotiated.channel_info.get(neg_idx)) else {
                continue;
            };
            let byte_size = preferred as usize * chan.bytes_per_frame as usize;
            if let Some(view) = self.scratch.get_mut(out_ch) {
                unsafe { view.rebind(info.buffers[half], byte_size) };
            }
        }

        self.producer.provide_audio(&mut self.scratch, preferred);

        if negotiated.post_output {
            if let Some(driver) = self.driver.as_mut() {
                let _ = driver.output_ready();
            }
        }

        time_info
    }

    /// `asioMessage` (§4.6): capability discovery and control-event
    /// signaling. Unrecognized selectors return `0`.
    pub fn asio_message(&mut self, selector: i32, value: i32) -> i32 {
        match selector {
            SEL_SELECTOR_SUPPORTED => i32::from(matches!(
                value,
                SEL_RESET_REQUEST
                    | SEL_ENGINE_VERSION
                    | SEL_RESYNC_REQUEST
                    | SEL_LATENCIES_CHANGED
                    | SEL_SUPPORTS_TIME_INFO
                    | SEL_SUPPORTS_TIME_CODE
                    | SEL_SUPPORTS_INPUT_MONITOR
            )),
            SEL_ENGINE_VERSION => 2,
            SEL_RESET_REQUEST => {
                self.mailbox.post(EventCode::ResetNeeded);
                1
            }
            SEL_OVERLOAD => {
                self.mailbox.post(EventCode::Overload);
                1
            }
            _ => 0,
        }
    }

    /// Housekeeping task (§4.7): drains the mailbox in FIFO order.
    /// Duplicate `ResetNeeded` events within one drain cycle collapse to a
    /// single effective `Reset` (§5: idempotent).
    pub fn drain_mailbox(&mut self) {
        let mut reset_done = false;
        while let Some(event) = self.drain.try_recv() {
            match event {
                EventCode::StopPlayback => {
                    if let Err(e) = self.stop() {
                        log::warn!("stop requested via mailbox failed: {e}");
                    }
                }
                EventCode::ResetNeeded => {
                    if reset_done {
                        continue;
                    }
                    reset_done = true;
                    if let Err(e) = self.reset() {
                        log::warn!("reset requested via mailbox failed: {e}");
                    }
                }
                EventCode::Overload => {
                    log::warn!("driver reported overload");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc, Mutex,
        atomic::{AtomicU32, Ordering as AtomicOrdering},
    };

    use abx_format::{ChannelBuffer, DriverFormatDescriptor, SampleType};

    use super::*;
    use crate::driver::{DriverDescriptor, DriverResult};

    /// Serializes tests that call `start()`, since `ACTIVE_OWNER` is a
    /// process-wide singleton by design (§5, §9).
    static TEST_GUARD: Mutex<()> = Mutex::new(());

    struct MockDriver {
        sample_rate: f64,
        io_format: FormatKind,
        storage: Vec<[Vec<u8>; 2]>,
        init_calls: Arc<AtomicU32>,
    }

    impl MockDriver {
        fn new(init_calls: Arc<AtomicU32>) -> Self {
            Self { sample_rate: 44_100.0, io_format: FormatKind::Pcm, storage: Vec::new(), init_calls }
        }
    }

    impl Driver for MockDriver {
        fn init(&mut self, _version: i32) -> bool {
            self.init_calls.fetch_add(1, AtomicOrdering::SeqCst);
            true
        }

        fn output_ready(&mut self) -> DriverStatus {
            DriverStatus::Ok
        }

        fn get_channels(&self) -> (u32, u32) {
            (0, 2)
        }

        fn get_buffer_size(&self) -> DriverResult<BufferSizeRange> {
            Ok(BufferSizeRange { min: 64, max: 2048, preferred: 256, granularity: -1 })
        }

        fn create_buffers(&mut self, requests: &[ChannelRequest], buffer_size: u32) -> DriverResult<Vec<BufferInfo>> {
            let bytes = buffer_size as usize * 2;
            self.storage = requests.iter().map(|_| [vec![0u8; bytes], vec![0u8; bytes]]).collect();
            let infos = self
                .storage
                .iter_mut()
                .zip(requests.iter())
                .map(|(pair, req)| BufferInfo {
                    is_input: req.is_input,
                    channel_num: req.channel_num,
                    buffers: [pair[0].as_mut_ptr(), pair[1].as_mut_ptr()],
                })
                .collect();
            Ok(infos)
        }

        fn dispose_buffers(&mut self) {
            self.storage.clear();
        }

        fn get_channel_info(&self, channel: u32, is_input: bool) -> DriverResult<DriverFormatDescriptor> {
            Ok(DriverFormatDescriptor::new(channel, is_input, SampleType::Int16Lsb))
        }

        fn get_latencies(&self) -> DriverResult<(u32, u32)> {
            Ok((64, 64))
        }

        fn get_sample_position(&self) -> DriverResult<(u64, u64)> {
            Ok((0, 0))
        }

        fn get_sample_rate(&self) -> DriverResult<f64> {
            Ok(self.sample_rate)
        }

        fn set_sample_rate(&mut self, rate: f64) -> DriverResult<()> {
            self.sample_rate = rate;
            Ok(())
        }

        fn can_sample_rate(&self, _rate: f64) -> bool {
            true
        }

        fn start(&mut self) -> DriverResult<()> {
            Ok(())
        }

        fn stop(&mut self) -> DriverResult<()> {
            Ok(())
        }

        fn get_io_format(&self) -> FormatKind {
            self.io_format
        }

        fn set_io_format(&mut self, kind: FormatKind) -> DriverResult<()> {
            self.io_format = kind;
            Ok(())
        }
    }

    struct MockFactory {
        init_calls: Arc<AtomicU32>,
    }

    impl DriverFactory for MockFactory {
        fn enumerate(&self) -> Vec<DriverDescriptor> {
            vec![DriverDescriptor { name: "mock".to_string() }]
        }

        fn instantiate(&self, _index: usize) -> Option<Box<dyn Driver>> {
            Some(Box::new(MockDriver::new(self.init_calls.clone())))
        }
    }

    struct MockProducer {
        calls: Arc<Mutex<Vec<u32>>>,
        capacity: u32,
    }

    impl Producer for MockProducer {
        fn ring_buffer_format(&self) -> AudioFormat {
            AudioFormat::zeroed()
        }

        fn ring_buffer_capacity(&self) -> u32 {
            self.capacity
        }

        fn set_ring_buffer_capacity(&mut self, frames: u32) {
            self.capacity = frames;
        }

        fn provide_audio(&mut self, scratch: &mut ScratchView, frame_count: u32) {
            self.calls.lock().unwrap().push(frame_count);
            for ch in scratch.iter_mut() {
                let bytes = unsafe { ch.as_bytes_mut() };
                bytes.fill(0);
            }
        }
    }

    fn open_and_configure(controller: &mut Controller, factory: &MockFactory) {
        controller.open(factory, None).unwrap();
        let decoder = DecoderFormat::new(FormatKind::Pcm, 44_100.0, 2);
        controller.setup_for_decoder(&decoder).unwrap();
    }

    #[test]
    fn lifecycle_ten_switches_then_request_stop() {
        let _guard = TEST_GUARD.lock().unwrap();
        let factory = MockFactory { init_calls: Arc::new(AtomicU32::new(0)) };
        let calls = Arc::new(Mutex::new(Vec::new()));
        let producer = MockProducer { calls: calls.clone(), capacity: 0 };
        let mut controller = Controller::new(Box::new(producer));

        open_and_configure(&mut controller, &factory);
        controller.start().unwrap();
        assert_eq!(controller.state(), ControllerState::Running);

        for i in 0..10 {
            controller.on_buffer_switch_time_info(crate::driver::TimeInfo::default(), i % 2, false);
        }

        controller.request_stop();
        controller.drain_mailbox();

        assert_eq!(controller.state(), ControllerState::Configured);
        let recorded = calls.lock().unwrap();
        assert_eq!(recorded.len(), 10);
        assert!(recorded.iter().all(|&n| n == 256));
    }

    #[test]
    fn overload_then_reset_request_resets_exactly_once() {
        let _guard = TEST_GUARD.lock().unwrap();
        let init_calls = Arc::new(AtomicU32::new(0));
        let factory = MockFactory { init_calls: init_calls.clone() };
        let producer = MockProducer { calls: Arc::new(Mutex::new(Vec::new())), capacity: 0 };
        let mut controller = Controller::new(Box::new(producer));

        open_and_configure(&mut controller, &factory);
        controller.start().unwrap();
        assert_eq!(init_calls.load(AtomicOrdering::SeqCst), 1);

        assert_eq!(controller.asio_message(SEL_OVERLOAD, 0), 1);
        assert_eq!(controller.asio_message(SEL_RESET_REQUEST, 0), 1);
        // A second reset request in the same cycle must collapse to one.
        assert_eq!(controller.asio_message(SEL_RESET_REQUEST, 0), 1);

        controller.drain_mailbox();

        assert_eq!(controller.state(), ControllerState::Open);
        assert_eq!(init_calls.load(AtomicOrdering::SeqCst), 2);
    }

    #[test]
    fn start_rejects_a_second_active_controller() {
        let _guard = TEST_GUARD.lock().unwrap();
        let factory_a = MockFactory { init_calls: Arc::new(AtomicU32::new(0)) };
        let factory_b = MockFactory { init_calls: Arc::new(AtomicU32::new(0)) };
        let mut a = Controller::new(Box::new(MockProducer { calls: Arc::new(Mutex::new(Vec::new())), capacity: 0 }));
        let mut b = Controller::new(Box::new(MockProducer { calls: Arc::new(Mutex::new(Vec::new())), capacity: 0 }));

        open_and_configure(&mut a, &factory_a);
        open_and_configure(&mut b, &factory_b);

        a.start().unwrap();
        assert_eq!(b.start(), Err(OutputError::StateViolation));

        a.stop().unwrap();
        b.start().unwrap();
        b.stop().unwrap();
    }

    #[test]
    fn n_zero_switch_rebinds_nothing_before_setup() {
        let producer = MockProducer { calls: Arc::new(Mutex::new(Vec::new())), capacity: 0 };
        let mut controller = Controller::new(Box::new(producer));
        let time_info = controller.on_buffer_switch_time_info(crate::driver::TimeInfo::default(), 0, false);
        assert_eq!(time_info.sample_position, 0);
    }

    #[test]
    fn setup_for_decoder_rejects_rate_the_driver_refuses() {
        struct StrictRateDriver(MockDriver);
        impl Driver for StrictRateDriver {
            fn init(&mut self, version: i32) -> bool {
                self.0.init(version)
            }
            fn output_ready(&mut self) -> DriverStatus {
                self.0.output_ready()
            }
            fn get_channels(&self) -> (u32, u32) {
                self.0.get_channels()
            }
            fn get_buffer_size(&self) -> DriverResult<BufferSizeRange> {
                self.0.get_buffer_size()
            }
            fn create_buffers(&mut self, requests: &[ChannelRequest], buffer_size: u32) -> DriverResult<Vec<BufferInfo>> {
                self.0.create_buffers(requests, buffer_size)
            }
            fn dispose_buffers(&mut self) {
                self.0.dispose_buffers()
            }
            fn get_channel_info(&self, channel: u32, is_input: bool) -> DriverResult<DriverFormatDescriptor> {
                self.0.get_channel_info(channel, is_input)
            }
            fn get_latencies(&self) -> DriverResult<(u32, u32)> {
                self.0.get_latencies()
            }
            fn get_sample_position(&self) -> DriverResult<(u64, u64)> {
                self.0.get_sample_position()
            }
            fn get_sample_rate(&self) -> DriverResult<f64> {
                self.0.get_sample_rate()
            }
            fn set_sample_rate(&mut self, rate: f64) -> DriverResult<()> {
                self.0.set_sample_rate(rate)
            }
            fn can_sample_rate(&self, rate: f64) -> bool {
                rate == 44_100.0
            }
            fn start(&mut self) -> DriverResult<()> {
                self.0.start()
            }
            fn stop(&mut self) -> DriverResult<()> {
                self.0.stop()
            }
            fn get_io_format(&self) -> FormatKind {
                self.0.get_io_format()
            }
            fn set_io_format(&mut self, kind: FormatKind) -> DriverResult<()> {
                self.0.set_io_format(kind)
            }
        }

        struct StrictRateFactory;
        impl DriverFactory for StrictRateFactory {
            fn enumerate(&self) -> Vec<DriverDescriptor> {
                vec![DriverDescriptor { name: "strict".to_string() }]
            }
            fn instantiate(&self, _index: usize) -> Option<Box<dyn Driver>> {
                Some(Box::new(StrictRateDriver(MockDriver::new(Arc::new(AtomicU32::new(0))))))
            }
        }

        let producer = MockProducer { calls: Arc::new(Mutex::new(Vec::new())), capacity: 0 };
        let mut controller = Controller::new(Box::new(producer));
        controller.open(&StrictRateFactory, None).unwrap();

        let decoder = DecoderFormat::new(FormatKind::Pcm, 96_000.0, 2);
        assert_eq!(controller.setup_for_decoder(&decoder), Err(OutputError::RateUnsupported));
        assert_eq!(controller.state(), ControllerState::Open);
    }

    #[test]
    fn close_is_idempotent() {
        let factory = MockFactory { init_calls: Arc::new(AtomicU32::new(0)) };
        let producer = MockProducer { calls: Arc::new(Mutex::new(Vec::new())), capacity: 0 };
        let mut controller = Controller::new(Box::new(producer));
        open_and_configure(&mut controller, &factory);
        assert!(controller.close());
        assert!(!controller.close());
        assert_eq!(controller.state(), ControllerState::Closed);
    }

    #[test]
    fn ensures_ring_buffer_capacity_of_four_preferred_buffers() {
        let factory = MockFactory { init_calls: Arc::new(AtomicU32::new(0)) };
        let producer = MockProducer { calls: Arc::new(Mutex::new(Vec::new())), capacity: 0 };
        let mut controller = Controller::new(Box::new(producer));
        open_and_configure(&mut controller, &factory);
        // `preferred` is 256 from MockDriver::get_buffer_size.
        assert_eq!(controller.negotiated.as_ref().unwrap().preferred_buf, 256);
    }

    // Silences "unused" for a type only referenced through trait objects in
    // some configurations.
    #[allow(dead_code)]
    fn _assert_channel_buffer_dangling_is_usable() {
        let _ = ChannelBuffer::dangling();
    }
}
