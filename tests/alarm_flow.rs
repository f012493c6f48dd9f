//! Host-level tests for the four cooperating parts: debouncer, synchronizer, display
//! controller and sounder, driven by hand over one shared state.

use core::cell::{Cell, RefCell};
use core::pin::pin;
use core::task::Poll;
use std::collections::VecDeque;

use embassy_futures::{block_on, poll_once};
use embedded_hal_async::delay::DelayNs;
use net_alarm_clock::{
    AlarmClock, AlarmSetting, AlarmSounder, AudioSink, ButtonEvent, ButtonInputs, ButtonLine,
    ClockSource, ClockTime, DisplayController, DisplaySink, Error, FallbackSource, Frame,
    InputDebouncer, LineLevels, LineMask, Mode, QueryError, SharedState, SyncOutcome, TimeSync,
    Wake,
};

// ============================================================================
// Test doubles
// ============================================================================

fn at(hour: u8, minute: u8) -> ClockTime {
    ClockTime::new(hour, minute).expect("valid time")
}

/// Lines that read asserted when sampled.
struct Levels(LineMask);

impl LineLevels for Levels {
    fn asserted(&mut self) -> LineMask {
        self.0
    }
}

/// Returns immediately, calling `hook` with the 1-based call number.
struct HookDelay<F: FnMut(usize)> {
    calls: usize,
    hook: F,
}

impl<F: FnMut(usize)> HookDelay<F> {
    fn new(hook: F) -> Self {
        Self { calls: 0, hook }
    }

    fn tick(&mut self) {
        self.calls += 1;
        (self.hook)(self.calls);
    }
}

impl<F: FnMut(usize)> DelayNs for HookDelay<F> {
    async fn delay_ns(&mut self, _ns: u32) {
        self.tick();
    }

    async fn delay_ms(&mut self, _ms: u32) {
        self.tick();
    }
}

fn no_delay() -> HookDelay<impl FnMut(usize)> {
    HookDelay::new(|_| {})
}

#[derive(Default)]
struct Screen {
    frames: Vec<Frame>,
}

impl Screen {
    fn last(&self) -> (&str, &str) {
        let frame = self.frames.last().expect("a frame was presented");
        (frame.top(), frame.bottom())
    }
}

impl DisplaySink for Screen {
    async fn present(&mut self, frame: &Frame) {
        self.frames.push(frame.clone());
    }
}

#[derive(Default)]
struct Speaker {
    tones: Vec<bool>,
}

impl AudioSink for Speaker {
    fn set_tone(&mut self, on: bool) {
        self.tones.push(on);
    }
}

/// Shares its frames so they can be read while a `run` future holds the sink.
struct FrameLog<'a>(&'a RefCell<Vec<(String, String)>>);

impl DisplaySink for FrameLog<'_> {
    async fn present(&mut self, frame: &Frame) {
        self.0
            .borrow_mut()
            .push((frame.top().to_owned(), frame.bottom().to_owned()));
    }
}

struct ToneLog<'a>(&'a RefCell<Vec<bool>>);

impl AudioSink for ToneLog<'_> {
    fn set_tone(&mut self, on: bool) {
        self.0.borrow_mut().push(on);
    }
}

/// Hands out scripted edges one pass at a time, then never another one.
struct ScriptedButtons {
    edges: VecDeque<ButtonLine>,
}

impl LineLevels for ScriptedButtons {
    /// The pressed line is still held when sampled, and released right after.
    fn asserted(&mut self) -> LineMask {
        self.edges
            .pop_front()
            .map_or(LineMask::NONE, ButtonLine::mask)
    }
}

impl ButtonInputs for ScriptedButtons {
    async fn next_rising_edge(&mut self) -> ButtonLine {
        match self.edges.front().copied() {
            Some(line) => line,
            None => core::future::pending().await,
        }
    }
}

/// Completes the first `limit - 1` delays at once, then never completes.
struct DelayLimit {
    calls: usize,
    limit: usize,
}

impl DelayNs for DelayLimit {
    async fn delay_ns(&mut self, _ns: u32) {
        self.calls += 1;
        if self.calls >= self.limit {
            core::future::pending::<()>().await;
        }
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.delay_ns(ms).await;
    }
}

struct ScriptedSource {
    reachable: bool,
    answers: VecDeque<Result<ClockTime, QueryError>>,
    queries: usize,
}

impl ScriptedSource {
    fn new(
        reachable: bool,
        answers: impl IntoIterator<Item = Result<ClockTime, QueryError>>,
    ) -> Self {
        Self {
            reachable,
            answers: answers.into_iter().collect(),
            queries: 0,
        }
    }
}

impl ClockSource for ScriptedSource {
    fn is_reachable(&self) -> bool {
        self.reachable
    }

    async fn query(&mut self) -> Result<ClockTime, QueryError> {
        self.queries += 1;
        self.answers.pop_front().unwrap_or(Err(QueryError::Timeout))
    }
}

/// Consume an outstanding wake; `false` if none was outstanding.
fn take_wake(wake: &Wake) -> bool {
    matches!(poll_once(wake.parked()), Poll::Ready(()))
}

/// One full button press: edge, debounce with the line still held, display activation.
fn press(
    debouncer: InputDebouncer<'_>,
    display: DisplayController<'_>,
    screen: &mut Screen,
    line: ButtonLine,
) -> Option<ButtonEvent> {
    let event = block_on(debouncer.handle_edge(line, &mut Levels(line.mask()), &mut no_delay()));
    block_on(display.refresh(screen)).expect("frame renders");
    event
}

// ============================================================================
// Shared state
// ============================================================================

#[test]
fn power_on_state() {
    let shared = SharedState::new();
    let snapshot = shared.snapshot();
    assert_eq!(snapshot.current, None);
    assert_eq!(snapshot.setting.time, ClockTime::MIDNIGHT);
    assert_eq!(snapshot.setting.mode(), Mode::Adjusting);
    assert!(!snapshot.ringing);
    assert_eq!(snapshot.event, ButtonEvent::None);
    assert_eq!(snapshot.enabled, LineMask::ALL);
}

#[test]
fn wakes_collapse() {
    let wake = Wake::new();
    assert!(!wake.is_pending());
    wake.wake();
    wake.wake();
    wake.wake();
    assert!(wake.is_pending());
    assert!(take_wake(&wake));
    assert!(!take_wake(&wake));
}

#[test]
fn cleared_wake_is_not_delivered() {
    let wake = Wake::new();
    wake.wake();
    wake.clear();
    assert!(!wake.is_pending());
    assert!(!take_wake(&wake));
}

#[test]
fn button_and_sync_wakes_collapse_into_one_display_activation() {
    let shared = SharedState::new();
    let display_wake = Wake::new();
    let sounder_wake = Wake::new();
    let debouncer = InputDebouncer::new(&shared, &display_wake);
    let sync = TimeSync::new(&shared, &display_wake, &sounder_wake);
    let display = DisplayController::new(&shared, &display_wake);
    let frames = RefCell::new(Vec::new());
    let mut sink = FrameLog(&frames);
    let mut run = pin!(display.run(&mut sink));

    // Banner, then parked until the first time.
    assert!(poll_once(run.as_mut()).is_pending());
    assert_eq!(frames.borrow().len(), 1);
    sync.apply_source_time(at(16, 15));
    assert!(poll_once(run.as_mut()).is_pending());
    assert_eq!(frames.borrow().len(), 2);

    // Two wakes before the display runs again.
    block_on(debouncer.handle_edge(
        ButtonLine::HourUp,
        &mut Levels(ButtonLine::HourUp.mask()),
        &mut no_delay(),
    ));
    assert_eq!(sync.apply_source_time(at(16, 16)), SyncOutcome::Updated(at(8, 16)));

    assert!(poll_once(run.as_mut()).is_pending());
    assert_eq!(frames.borrow().len(), 3);
    assert_eq!(
        frames.borrow().last().map(|(top, bottom)| (top.as_str(), bottom.as_str())),
        Some(("Now: 08:16 PST", "Select: 01:00"))
    );
    assert!(poll_once(run.as_mut()).is_pending());
    assert_eq!(frames.borrow().len(), 3);
    assert_eq!(shared.enabled_lines(), LineMask::ALL);
}

#[test]
fn display_started_after_first_sync_renders_once() {
    let shared = SharedState::new();
    let display_wake = Wake::new();
    let sounder_wake = Wake::new();
    let sync = TimeSync::new(&shared, &display_wake, &sounder_wake);
    let display = DisplayController::new(&shared, &display_wake);
    sync.apply_source_time(at(16, 15));

    let frames = RefCell::new(Vec::new());
    let mut sink = FrameLog(&frames);
    let mut run = pin!(display.run(&mut sink));
    assert!(poll_once(run.as_mut()).is_pending());
    assert!(poll_once(run.as_mut()).is_pending());

    assert_eq!(
        *frames.borrow(),
        [
            ("Connecting...".to_owned(), String::new()),
            ("Now: 08:15 PST".to_owned(), "Select: 00:00".to_owned()),
        ]
    );
}

// ============================================================================
// Input debouncer
// ============================================================================

#[test]
fn debouncer_run_handles_each_edge_then_waits() {
    let shared = SharedState::new();
    let display_wake = Wake::new();
    let debouncer = InputDebouncer::new(&shared, &display_wake);
    let mut buttons = ScriptedButtons {
        edges: VecDeque::from([ButtonLine::MinuteDown]),
    };

    let mut delay = no_delay();

    {
        let mut run = pin!(debouncer.run(&mut buttons, &mut delay));
        assert!(poll_once(run.as_mut()).is_pending());
    }
    assert_eq!(shared.pending_event(), ButtonEvent::MinuteDown);
    assert!(take_wake(&display_wake));
}

#[test]
fn debounced_press_posts_event_and_wakes_display() {
    let shared = SharedState::new();
    let display_wake = Wake::new();
    let debouncer = InputDebouncer::new(&shared, &display_wake);

    let event = block_on(debouncer.handle_edge(
        ButtonLine::MinuteUp,
        &mut Levels(ButtonLine::MinuteUp.mask()),
        &mut no_delay(),
    ));
    assert_eq!(event, Some(ButtonEvent::MinuteUp));
    assert_eq!(shared.pending_event(), ButtonEvent::MinuteUp);
    assert!(take_wake(&display_wake));
    // Still masked until the display releases the lines.
    assert_eq!(shared.enabled_lines(), LineMask::NONE);
}

#[test]
fn lines_are_masked_during_the_debounce_delay() {
    let shared = SharedState::new();
    let display_wake = Wake::new();
    let debouncer = InputDebouncer::new(&shared, &display_wake).with_debounce_ms(20);
    let second_edge_enabled = Cell::new(true);

    let mut delay = HookDelay::new(|_| {
        assert_eq!(shared.enabled_lines(), LineMask::NONE);
        second_edge_enabled.set(shared.record_edge(ButtonLine::HourDown));
    });
    let event = block_on(debouncer.handle_edge(
        ButtonLine::MinuteDown,
        &mut Levels(ButtonLine::MinuteDown.mask()),
        &mut delay,
    ));

    assert!(!second_edge_enabled.get());
    assert_eq!(event, Some(ButtonEvent::MinuteDown));
    // The masked edge stays latched until the display releases the lines.
    assert!(shared.pending_lines().contains(ButtonLine::HourDown));
}

#[test]
fn simultaneous_edges_resolve_by_priority() {
    let shared = SharedState::new();
    let display_wake = Wake::new();
    let debouncer = InputDebouncer::new(&shared, &display_wake);

    assert!(shared.record_edge(ButtonLine::AlarmToggle));
    let event = block_on(debouncer.handle_edge(
        ButtonLine::HourDown,
        &mut Levels(ButtonLine::HourDown.mask() | LineMask::ALARM_TOGGLE),
        &mut no_delay(),
    ));
    assert_eq!(event, Some(ButtonEvent::HourDown));
}

#[test]
fn bounce_without_a_held_line_yields_none_but_still_wakes() {
    let shared = SharedState::new();
    let display_wake = Wake::new();
    let display = DisplayController::new(&shared, &display_wake);
    let debouncer = InputDebouncer::new(&shared, &display_wake);

    let event = block_on(debouncer.handle_edge(
        ButtonLine::HourUp,
        &mut Levels(LineMask::NONE),
        &mut no_delay(),
    ));
    assert_eq!(event, Some(ButtonEvent::None));
    assert_eq!(shared.pending_event(), ButtonEvent::None);
    assert!(take_wake(&display_wake));

    // The display activation re-enables the lines even without an event or a time.
    assert!(matches!(
        block_on(display.refresh(&mut Screen::default())),
        Ok(None)
    ));
    assert_eq!(shared.enabled_lines(), LineMask::ALL);
    assert_eq!(shared.pending_lines(), LineMask::NONE);
}

#[test]
fn edge_on_disabled_line_starts_no_pass() {
    let shared = SharedState::new();
    let display_wake = Wake::new();
    let debouncer = InputDebouncer::new(&shared, &display_wake);
    shared.begin_debounce();

    let mut delay = HookDelay::new(|_| panic!("no pass expected"));
    let event = block_on(debouncer.handle_edge(
        ButtonLine::HourUp,
        &mut Levels(LineMask::ALL),
        &mut delay,
    ));
    assert_eq!(event, None);
    assert!(!display_wake.is_pending());
}

#[test]
fn display_release_waits_for_a_running_pass() {
    let shared = SharedState::new();
    let display_wake = Wake::new();
    let sounder_wake = Wake::new();
    let debouncer = InputDebouncer::new(&shared, &display_wake);
    let sync = TimeSync::new(&shared, &display_wake, &sounder_wake);
    let display = DisplayController::new(&shared, &display_wake);

    // A time update renders mid-pass; its release must not re-enable or forget the edge.
    let mut delay = HookDelay::new(|_| {
        assert_eq!(sync.apply_source_time(at(16, 15)), SyncOutcome::Updated(at(8, 15)));
        block_on(display.refresh(&mut Screen::default())).expect("frame renders");
        assert_eq!(shared.enabled_lines(), LineMask::NONE);
    });
    let event = block_on(debouncer.handle_edge(
        ButtonLine::HourUp,
        &mut Levels(ButtonLine::HourUp.mask()),
        &mut delay,
    ));
    assert_eq!(event, Some(ButtonEvent::HourUp));

    let mut screen = Screen::default();
    block_on(display.refresh(&mut screen)).expect("frame renders");
    assert_eq!(screen.last(), ("Now: 08:15 PST", "Select: 01:00"));
    assert_eq!(shared.enabled_lines(), LineMask::ALL);
}

// ============================================================================
// Clock synchronizer
// ============================================================================

#[test]
fn unreachable_source_is_not_queried() {
    let shared = SharedState::new();
    let display_wake = Wake::new();
    let sounder_wake = Wake::new();
    let sync = TimeSync::new(&shared, &display_wake, &sounder_wake);
    let mut source = ScriptedSource::new(false, [Ok(at(12, 0))]);

    assert_eq!(block_on(sync.sync_once(&mut source)), SyncOutcome::Unreachable);
    assert_eq!(source.queries, 0);
    assert_eq!(shared.current_time(), None);
    assert!(!display_wake.is_pending());
}

#[test]
fn failed_query_changes_nothing() {
    let shared = SharedState::new();
    let display_wake = Wake::new();
    let sounder_wake = Wake::new();
    let sync = TimeSync::new(&shared, &display_wake, &sounder_wake);
    let mut source = ScriptedSource::new(true, [Err(QueryError::Malformed)]);

    assert_eq!(block_on(sync.sync_once(&mut source)), SyncOutcome::NoUpdate);
    assert_eq!(shared.current_time(), None);
    assert!(!display_wake.is_pending());
}

#[test]
fn update_wakes_display_once_and_repeat_is_unchanged() {
    let shared = SharedState::new();
    let display_wake = Wake::new();
    let sounder_wake = Wake::new();
    let sync = TimeSync::new(&shared, &display_wake, &sounder_wake);
    let mut source = ScriptedSource::new(true, [Ok(at(16, 15)), Ok(at(16, 15)), Ok(at(16, 16))]);

    assert_eq!(
        block_on(sync.sync_once(&mut source)),
        SyncOutcome::Updated(at(8, 15))
    );
    assert!(take_wake(&display_wake));
    assert_eq!(block_on(sync.sync_once(&mut source)), SyncOutcome::Unchanged);
    assert!(!display_wake.is_pending());
    assert_eq!(
        block_on(sync.sync_once(&mut source)),
        SyncOutcome::Updated(at(8, 16))
    );
    assert!(!sounder_wake.is_pending());
}

#[test]
fn offset_is_configurable() {
    let shared = SharedState::new();
    let display_wake = Wake::new();
    let sounder_wake = Wake::new();
    let sync = TimeSync::new(&shared, &display_wake, &sounder_wake).with_offset_hours(0);

    assert_eq!(sync.apply_source_time(at(3, 7)), SyncOutcome::Updated(at(3, 7)));
}

#[test]
fn alarm_fires_only_on_exact_minute_when_armed() {
    let shared = SharedState::new();
    let display_wake = Wake::new();
    let sounder_wake = Wake::new();
    let sync = TimeSync::new(&shared, &display_wake, &sounder_wake).with_offset_hours(0);
    let debouncer = InputDebouncer::new(&shared, &display_wake);
    let display = DisplayController::new(&shared, &display_wake);
    let mut screen = Screen::default();

    for _ in 0..7 {
        press(debouncer, display, &mut screen, ButtonLine::HourUp);
    }
    for _ in 0..30 {
        press(debouncer, display, &mut screen, ButtonLine::MinuteUp);
    }
    assert_eq!(shared.alarm_setting().time, at(7, 30));

    // Disarmed: the match does nothing.
    assert_eq!(sync.apply_source_time(at(7, 30)), SyncOutcome::Updated(at(7, 30)));
    press(debouncer, display, &mut screen, ButtonLine::AlarmToggle);
    assert!(shared.alarm_setting().is_armed());

    assert_eq!(sync.apply_source_time(at(7, 31)), SyncOutcome::Updated(at(7, 31)));
    assert!(!shared.is_ringing());
    assert!(!sounder_wake.is_pending());

    assert_eq!(
        sync.apply_source_time(at(7, 30)),
        SyncOutcome::AlarmTriggered(at(7, 30))
    );
    assert!(shared.is_ringing());
    assert!(take_wake(&sounder_wake));
    assert_eq!(shared.enabled_lines(), LineMask::ALARM_TOGGLE);
}

#[test]
fn fallback_uses_secondary_after_primary_fails() {
    let primary = ScriptedSource::new(true, [Err(QueryError::Connect)]);
    let secondary = ScriptedSource::new(true, [Ok(at(1, 2))]);
    let mut source = FallbackSource::new(primary, secondary);

    assert!(source.is_reachable());
    assert_eq!(block_on(source.query()), Ok(at(1, 2)));
}

#[test]
fn fallback_prefers_primary() {
    let primary = ScriptedSource::new(true, [Ok(at(9, 0))]);
    let secondary = ScriptedSource::new(true, [Ok(at(1, 2))]);
    let mut source = FallbackSource::new(primary, secondary);

    assert_eq!(block_on(source.query()), Ok(at(9, 0)));
}

#[test]
fn fallback_with_nothing_reachable() {
    let primary = ScriptedSource::new(false, []);
    let secondary = ScriptedSource::new(false, []);
    let mut source = FallbackSource::new(primary, secondary);

    assert!(!source.is_reachable());
    assert_eq!(block_on(source.query()), Err(QueryError::Unreachable));
}

// ============================================================================
// Display controller
// ============================================================================

#[test]
fn frames_fit_the_display() {
    let frame = Frame::status(at(23, 59), AlarmSetting::POWER_ON).expect("fits");
    assert_eq!(frame.top(), "Now: 23:59 PST");
    assert_eq!(frame.bottom(), "Select: 00:00");
    assert!(Frame::new("0123456789abcdef", "").is_ok());
    assert!(matches!(
        Frame::new("0123456789abcdefg", ""),
        Err(Error::LineTooLong)
    ));
}

#[test]
fn banner_until_first_sync() {
    let shared = SharedState::new();
    let display_wake = Wake::new();
    let display = DisplayController::new(&shared, &display_wake);
    let mut screen = Screen::default();

    block_on(display.show_banner(&mut screen)).expect("banner fits");
    assert_eq!(screen.last(), ("Connecting...", ""));
    assert!(matches!(block_on(display.refresh(&mut screen)), Ok(None)));
    assert_eq!(screen.frames.len(), 1);

    // Parked until a time is stored.
    assert_eq!(poll_once(display.wait_for_first_sync()), Poll::Pending);
    shared.store_time(at(6, 0));
    assert_eq!(block_on(display.wait_for_first_sync()), at(6, 0));
}

#[test]
fn event_is_consumed_exactly_once() {
    let shared = SharedState::new();
    let display_wake = Wake::new();
    let display = DisplayController::new(&shared, &display_wake);
    let debouncer = InputDebouncer::new(&shared, &display_wake);
    let mut screen = Screen::default();
    shared.store_time(at(6, 0));

    block_on(debouncer.handle_edge(
        ButtonLine::HourUp,
        &mut Levels(ButtonLine::HourUp.mask()),
        &mut no_delay(),
    ));
    block_on(display.refresh(&mut screen)).expect("frame renders");
    block_on(display.refresh(&mut screen)).expect("frame renders");

    assert_eq!(shared.alarm_setting().time, at(1, 0));
    assert_eq!(shared.pending_event(), ButtonEvent::None);
    assert_eq!(screen.frames.len(), 2);
}

#[test]
fn time_sync_run_queries_every_period() {
    let shared = SharedState::new();
    let display_wake = Wake::new();
    let sounder_wake = Wake::new();
    let sync = TimeSync::new(&shared, &display_wake, &sounder_wake);
    let mut source = ScriptedSource::new(
        true,
        [Ok(at(16, 15)), Err(QueryError::Receive), Ok(at(16, 16))],
    );
    let mut delay = DelayLimit { calls: 0, limit: 3 };

    {
        let mut run = pin!(sync.run(&mut source, &mut delay));
        assert!(poll_once(run.as_mut()).is_pending());
    }
    assert_eq!(source.queries, 3);
    assert_eq!(delay.calls, 3);
    assert_eq!(shared.current_time(), Some(at(8, 16)));
}

// ============================================================================
// Alarm sounder
// ============================================================================

#[test]
fn sounder_run_starts_silent_and_rings_when_woken() {
    let shared = SharedState::new();
    let display_wake = Wake::new();
    let sounder_wake = Wake::new();
    let debouncer = InputDebouncer::new(&shared, &display_wake);
    let sync = TimeSync::new(&shared, &display_wake, &sounder_wake).with_offset_hours(0);
    let sounder = AlarmSounder::new(&shared, &sounder_wake);
    let tones = RefCell::new(Vec::new());
    let mut speaker = ToneLog(&tones);
    let mut delay = HookDelay::new(|call| {
        if call == 1 {
            block_on(debouncer.handle_edge(
                ButtonLine::AlarmToggle,
                &mut Levels(LineMask::ALARM_TOGGLE),
                &mut no_delay(),
            ));
        }
    });

    // Arm at midnight.
    assert!(shared.record_edge(ButtonLine::AlarmToggle));
    shared.begin_debounce();
    shared.finish_debounce(LineMask::ALARM_TOGGLE);
    shared.apply_pending_event();
    shared.release_lines();

    let mut run = pin!(sounder.run(&mut speaker, &mut delay));
    assert!(poll_once(run.as_mut()).is_pending());
    assert_eq!(*tones.borrow(), [false]);

    assert!(matches!(
        sync.apply_source_time(ClockTime::MIDNIGHT),
        SyncOutcome::AlarmTriggered(_)
    ));
    assert!(poll_once(run.as_mut()).is_pending());
    assert_eq!(*tones.borrow(), [false, true, false]);
    assert!(!shared.is_ringing());
}

#[test]
fn sounder_ignores_wake_when_not_ringing() {
    let shared = SharedState::new();
    let sounder_wake = Wake::new();
    let sounder = AlarmSounder::new(&shared, &sounder_wake);
    let mut speaker = Speaker::default();

    sounder_wake.wake();
    assert_eq!(block_on(sounder.wait_and_sound(&mut speaker, &mut no_delay())), 0);
    assert!(speaker.tones.is_empty());
}

#[test]
fn alarm_toggle_silences_and_ends_off() {
    let shared = SharedState::new();
    let display_wake = Wake::new();
    let sounder_wake = Wake::new();
    let debouncer = InputDebouncer::new(&shared, &display_wake);
    let sounder = AlarmSounder::new(&shared, &sounder_wake).with_cadence_ms(1);
    let mut speaker = Speaker::default();

    // Arm at midnight, then reach it.
    assert!(shared.record_edge(ButtonLine::AlarmToggle));
    shared.begin_debounce();
    shared.finish_debounce(LineMask::ALARM_TOGGLE);
    shared.apply_pending_event();
    shared.release_lines();
    shared.store_time(ClockTime::MIDNIGHT);
    assert!(shared.trigger_if_due());
    shared.release_lines();

    let mut delay = HookDelay::new(|call| {
        if call == 5 {
            let event = block_on(debouncer.handle_edge(
                ButtonLine::AlarmToggle,
                &mut Levels(LineMask::ALARM_TOGGLE),
                &mut no_delay(),
            ));
            assert_eq!(event, Some(ButtonEvent::AlarmToggle));
        }
    });
    let cycles = block_on(sounder.sound_until_disarmed(&mut speaker, &mut delay));

    assert_eq!(cycles, 3);
    assert_eq!(speaker.tones, [true, false, true, false, true, false]);
    assert!(!shared.is_ringing());
}

// ============================================================================
// End to end
// ============================================================================

#[test]
fn sync_set_arm_ring_silence() {
    let statics = AlarmClock::new_static();
    let shared = statics.shared();
    let debouncer = statics.debouncer().with_debounce_ms(1);
    let sync = statics.time_sync();
    let display = statics.display_controller();
    let sounder = statics.sounder().with_cadence_ms(1);
    let mut screen = Screen::default();
    let mut speaker = Speaker::default();

    block_on(display.show_banner(&mut screen)).expect("banner fits");
    assert_eq!(screen.last(), ("Connecting...", ""));

    // 16:15 UTC is 08:15 PST.
    assert_eq!(sync.apply_source_time(at(16, 15)), SyncOutcome::Updated(at(8, 15)));
    assert!(statics.display_woken());
    assert_eq!(block_on(display.wait_for_first_sync()), at(8, 15));
    block_on(display.refresh(&mut screen)).expect("frame renders");
    assert_eq!(screen.last(), ("Now: 08:15 PST", "Select: 00:00"));

    for _ in 0..4 {
        assert_eq!(
            press(debouncer, display, &mut screen, ButtonLine::HourUp),
            Some(ButtonEvent::HourUp)
        );
    }
    assert_eq!(screen.last(), ("Now: 08:15 PST", "Select: 04:00"));

    press(debouncer, display, &mut screen, ButtonLine::AlarmToggle);
    assert_eq!(screen.last(), ("Now: 08:15 PST", "Alarm: 04:00"));

    // Armed: adjustments are ignored.
    press(debouncer, display, &mut screen, ButtonLine::MinuteUp);
    assert_eq!(screen.last(), ("Now: 08:15 PST", "Alarm: 04:00"));

    // 12:00 UTC is 04:00 PST.
    assert_eq!(
        sync.apply_source_time(at(12, 0)),
        SyncOutcome::AlarmTriggered(at(4, 0))
    );
    assert!(statics.sounder_woken());
    block_on(display.refresh(&mut screen)).expect("frame renders");
    assert_eq!(screen.last(), ("Now: 04:00 PST", "Alarm: 04:00"));
    assert_eq!(shared.enabled_lines(), LineMask::ALARM_TOGGLE);

    // Adjustment buttons are locked out while ringing.
    assert_eq!(press(debouncer, display, &mut screen, ButtonLine::HourUp), None);

    let mut delay = HookDelay::new(|call| {
        if call == 3 {
            block_on(debouncer.handle_edge(
                ButtonLine::AlarmToggle,
                &mut Levels(LineMask::ALARM_TOGGLE),
                &mut no_delay(),
            ));
        }
    });
    let cycles = block_on(sounder.wait_and_sound(&mut speaker, &mut delay));
    assert_eq!(cycles, 2);
    assert_eq!(speaker.tones.last(), Some(&false));
    assert!(!shared.is_ringing());

    block_on(display.refresh(&mut screen)).expect("frame renders");
    assert_eq!(screen.last(), ("Now: 04:00 PST", "Select: 04:00"));
    assert_eq!(shared.alarm_setting().mode(), Mode::Adjusting);
    assert_eq!(shared.enabled_lines(), LineMask::ALL);
}
