//! The cooperative tick loop driving patterns onto the bank.
//!
//! Each [`tick`](Scheduler::tick) drains pending commands, applies the next
//! pattern frame, handles auto-cycling, and returns the delay the platform
//! should sleep before the next tick. The scheduler never sleeps itself and
//! never terminates; temporal control belongs to the caller.

use core::fmt::Write;

use crate::channel::{Channel, ChannelBank};
use crate::command::CommandSource;
use crate::pattern::{PatternEngine, PatternKind};
use crate::state::{Mode, RuntimeState};
use crate::time::TimeDuration;

/// Delay between the frames of the boot indication.
const STARTUP_FRAME_MS: u32 = 200;

/// How many on/off frames the boot indication shows (three full flashes).
const STARTUP_FRAMES: u8 = 6;

/// Timing knobs for the scheduler.
///
/// The two presets correspond to the two original program variants, which
/// differed only in these numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SchedulerConfig {
    /// Auto-mode ticks before advancing to the next pattern.
    pub auto_cycle_ticks: u32,
    /// Frame delay for [`PatternKind::AllBlink`], in milliseconds.
    pub blink_delay_ms: u32,
    /// Base frame delay for the moving patterns, in milliseconds.
    /// Sequence and chase run at twice this, bounce at exactly this.
    pub sequence_delay_ms: u32,
    /// Frame delay for [`PatternKind::Custom`], in milliseconds.
    /// Kept short so manual channel commands feel immediate.
    pub custom_delay_ms: u32,
}

impl SchedulerConfig {
    /// Timing of the standalone variant (no serial console).
    pub const STANDALONE: Self = Self {
        auto_cycle_ticks: 20,
        blink_delay_ms: 500,
        sequence_delay_ms: 100,
        custom_delay_ms: 50,
    };

    /// Timing of the interactive variant (serial console attached).
    pub const INTERACTIVE: Self = Self {
        auto_cycle_ticks: 50,
        blink_delay_ms: 500,
        sequence_delay_ms: 200,
        custom_delay_ms: 50,
    };

    /// Frame delay for a pattern, in milliseconds.
    pub fn delay_ms(&self, kind: PatternKind) -> u32 {
        match kind {
            PatternKind::AllBlink => self.blink_delay_ms,
            PatternKind::Sequence | PatternKind::Chase => self.sequence_delay_ms * 2,
            PatternKind::Bounce => self.sequence_delay_ms,
            PatternKind::Custom => self.custom_delay_ms,
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::INTERACTIVE
    }
}

/// Drives a channel bank through the pattern state machine, one tick at a
/// time.
///
/// The scheduler owns the [`PatternEngine`] and is the single execution
/// context that mutates [`RuntimeState`] and the bank. Commands produced by
/// the receive context are drained at the top of every tick - the safe point
/// where no frame is in flight - so a tick always observes complete
/// multi-field updates.
///
/// # Type Parameters
/// * `N` - Number of channels (2 to 32)
pub struct Scheduler<const N: usize> {
    engine: PatternEngine<N>,
    config: SchedulerConfig,
    startup_remaining: u8,
}

impl<const N: usize> Scheduler<N> {
    /// Creates a scheduler with the given timing configuration.
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            engine: PatternEngine::new(),
            config,
            startup_remaining: STARTUP_FRAMES,
        }
    }

    /// The timing configuration in use.
    pub fn config(&self) -> SchedulerConfig {
        self.config
    }

    /// Plays one frame of the boot indication: all channels flashed on and
    /// off three times.
    ///
    /// Returns the delay to sleep after the frame, or `None` once the
    /// indication is finished. Call this in a loop before entering the tick
    /// loop:
    ///
    /// ```text
    /// while let Some(delay) = scheduler.startup_frame::<Duration, _>(&mut bank) {
    ///     sleep(delay);
    /// }
    /// ```
    pub fn startup_frame<D: TimeDuration, C: Channel>(
        &mut self,
        bank: &mut ChannelBank<C, N>,
    ) -> Option<D> {
        if self.startup_remaining == 0 {
            return None;
        }
        bank.set_all(self.startup_remaining % 2 == 0);
        self.startup_remaining -= 1;
        Some(D::from_millis(STARTUP_FRAME_MS.into()))
    }

    /// Runs one tick: drain commands, apply the next frame, auto-cycle.
    ///
    /// Returns the pattern-dependent delay to sleep before the next tick.
    /// In auto mode the tick counter advances and, at the configured
    /// threshold, the pattern moves on to the next non-custom kind with the
    /// bank cleared for the change. Manual mode holds the pattern
    /// indefinitely.
    pub fn tick<D, C, S, W>(
        &mut self,
        state: &mut RuntimeState,
        bank: &mut ChannelBank<C, N>,
        commands: &mut S,
        console: &mut W,
    ) -> D
    where
        D: TimeDuration,
        C: Channel,
        S: CommandSource,
        W: Write,
    {
        while let Some(command) = commands.next_command() {
            let before = state.pattern;
            command.apply(state, bank, console);
            // Reset progress for every kind change, not just the net one: a
            // round trip through another kind within one drain must still
            // restart the original pattern from its initial state.
            if state.pattern != before {
                self.engine.reset(state.pattern);
            }
        }

        let mask = self.engine.tick(state.pattern, state.custom_mask);
        bank.apply_mask(mask);

        if state.mode == Mode::Auto {
            state.tick_counter += 1;
            if state.tick_counter >= self.config.auto_cycle_ticks {
                state.pattern = state.pattern.next_auto();
                state.tick_counter = 0;
                // Clear the bank for the change; the engine resets its
                // progress when it sees the new kind on the next tick.
                bank.apply_mask(0);
            }
        }

        D::from_millis(self.config.delay_ms(state.pattern).into())
    }
}
