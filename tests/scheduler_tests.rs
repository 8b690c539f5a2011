//! Integration tests for the scheduler tick loop

mod common;
use common::*;

use heapless::spsc::Queue;
use led_conductor::{
    Command, CommandPort, Mode, PatternKind, RuntimeState, Scheduler, SchedulerConfig,
};
use std::time::Duration;

struct Rig {
    state: RuntimeState,
    bank: led_conductor::ChannelBank<MockChannel, 4>,
    queue: MockCommandQueue,
    console: String,
    scheduler: Scheduler<4>,
}

impl Rig {
    fn new(config: SchedulerConfig) -> Self {
        Self {
            state: RuntimeState::new(4),
            bank: mock_bank::<4>(),
            queue: MockCommandQueue::new(),
            console: String::new(),
            scheduler: Scheduler::new(config),
        }
    }

    fn tick(&mut self) -> Duration {
        self.scheduler.tick(
            &mut self.state,
            &mut self.bank,
            &mut self.queue,
            &mut self.console,
        )
    }
}

#[test]
fn auto_cycle_advances_after_exactly_the_threshold() {
    let mut rig = Rig::new(SchedulerConfig::STANDALONE);

    for _ in 0..19 {
        rig.tick();
        assert_eq!(rig.state.pattern, PatternKind::AllBlink);
    }
    assert_eq!(rig.state.tick_counter, 19);

    rig.tick();
    assert_eq!(rig.state.pattern, PatternKind::Sequence);
    assert_eq!(rig.state.tick_counter, 0);
    assert_eq!(rig.bank.mask(), 0, "bank cleared for the pattern change");
}

#[test]
fn auto_cycling_never_enters_custom() {
    let mut rig = Rig::new(SchedulerConfig::STANDALONE);

    // Four full cycle periods cover the whole rotation with room to spare.
    for _ in 0..90 {
        rig.tick();
        assert_ne!(rig.state.pattern, PatternKind::Custom);
    }
    assert_eq!(rig.state.pattern, PatternKind::AllBlink, "wrapped around");
}

#[test]
fn manual_mode_holds_the_pattern_indefinitely() {
    let mut rig = Rig::new(SchedulerConfig::STANDALONE);
    rig.queue.push(Command::Manual);

    for _ in 0..60 {
        rig.tick();
    }
    assert_eq!(rig.state.pattern, PatternKind::AllBlink);
    assert_eq!(rig.state.tick_counter, 0, "counter does not advance manually");
}

#[test]
fn auto_command_resumes_cycling_from_a_fresh_counter() {
    let mut rig = Rig::new(SchedulerConfig::STANDALONE);

    for _ in 0..10 {
        rig.tick();
    }
    rig.queue.push(Command::Manual);
    rig.tick();

    rig.queue.push(Command::Auto);
    rig.tick();
    assert_eq!(rig.state.mode, Mode::Auto);
    assert_eq!(rig.state.tick_counter, 1, "one auto tick since the reset");
}

#[test]
fn tick_returns_the_per_pattern_delay() {
    let mut rig = Rig::new(SchedulerConfig::STANDALONE);

    assert_eq!(rig.tick(), Duration::from_millis(500));

    rig.queue.push(Command::Pattern(PatternKind::Bounce));
    assert_eq!(rig.tick(), Duration::from_millis(100));

    rig.queue.push(Command::Pattern(PatternKind::Custom));
    assert_eq!(rig.tick(), Duration::from_millis(50));
}

#[test]
fn queued_commands_are_applied_before_the_frame() {
    let mut rig = Rig::new(SchedulerConfig::INTERACTIVE);
    rig.queue.push(Command::Pattern(PatternKind::Sequence));

    rig.tick();
    assert_eq!(rig.state.pattern, PatternKind::Sequence);
    assert_eq!(rig.state.mode, Mode::Manual);
    assert_eq!(rig.bank.mask(), 0b0001, "first sequence frame already shown");
}

#[test]
fn pattern_round_trip_within_one_drain_restarts_progress() {
    let mut rig = Rig::new(SchedulerConfig::STANDALONE);

    // Run chase partway through a sweep.
    rig.queue.push(Command::Manual);
    rig.queue.push(Command::Pattern(PatternKind::Chase));
    for _ in 0..3 {
        rig.tick();
    }
    assert_eq!(rig.bank.mask(), 0b0100, "mid-sweep before the round trip");

    // Away and back between two frames: the sweep must start over, not
    // resume from the old cursor.
    rig.queue.push(Command::Pattern(PatternKind::AllBlink));
    rig.queue.push(Command::Pattern(PatternKind::Chase));
    rig.tick();
    assert_eq!(rig.bank.mask(), 0b0001, "chase restarted from channel 0");
}

#[test]
fn direct_led_write_is_overridden_by_custom_mask_on_next_tick() {
    let mut rig = Rig::new(SchedulerConfig::INTERACTIVE);

    let mut console = String::new();
    Command::Led { index: 2, on: true }.apply(&mut rig.state, &mut rig.bank, &mut console);
    assert_eq!(rig.bank.mask(), 0b0100, "direct write visible until the frame");

    rig.tick();
    assert_eq!(
        rig.bank.mask(),
        0b1111,
        "custom frame re-applies the stale mask"
    );
}

#[test]
fn startup_indication_flashes_three_times_then_ends() {
    let mut rig = Rig::new(SchedulerConfig::STANDALONE);
    let mut frames = Vec::new();

    while let Some(delay) = rig
        .scheduler
        .startup_frame::<Duration, _>(&mut rig.bank)
    {
        assert_eq!(delay, Duration::from_millis(200));
        frames.push(rig.bank.mask());
    }

    assert_eq!(frames, vec![0b1111, 0, 0b1111, 0, 0b1111, 0]);
    assert!(
        rig.scheduler
            .startup_frame::<Duration, _>(&mut rig.bank)
            .is_none(),
        "indication does not replay"
    );
}

#[test]
fn spsc_queue_carries_commands_between_contexts() {
    let mut queue: Queue<Command, 8> = Queue::new();
    let (producer, mut consumer) = queue.split();

    // Receive context: bytes in, commands enqueued.
    let mut port: CommandPort<_, 4> = CommandPort::new(producer);
    let mut echo = String::new();
    for &byte in b"leds 5\rstatus\r" {
        port.on_byte(byte, &mut echo).unwrap();
    }

    // Scheduler context: drained at the top of the tick.
    let mut state = RuntimeState::new(4);
    let mut bank = mock_bank::<4>();
    let mut console = String::new();
    let mut scheduler = Scheduler::<4>::new(SchedulerConfig::INTERACTIVE);
    let _: Duration = scheduler.tick(&mut state, &mut bank, &mut consumer, &mut console);

    assert_eq!(state.custom_mask, 0b0101);
    assert!(console.contains("pattern: custom"));
    assert!(console.contains("mask: 0b0101"));
    assert_eq!(bank.mask(), 0b0101, "custom frame shows the new mask");
}

#[test]
fn device_not_ready_aborts_initialization() {
    use led_conductor::{ChannelBank, DeviceError};

    let mut channels: [MockChannel; 4] = std::array::from_fn(|_| MockChannel::new());
    channels[1].ready = false;

    let mut bank = ChannelBank::new(channels);
    assert_eq!(bank.init(), Err(DeviceError::NotReady { channel: 1 }));
}
