//! Shared runtime state read by the scheduler and written by commands.

use crate::channel::full_mask;
use crate::pattern::PatternKind;

/// Whether patterns cycle on their own or hold until told otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Patterns advance automatically after a fixed number of ticks.
    Auto,
    /// The current pattern runs until an explicit command changes it.
    Manual,
}

impl core::fmt::Display for Mode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Mode::Auto => "auto",
            Mode::Manual => "manual",
        })
    }
}

/// The process-wide scheduling state.
///
/// One instance exists for the lifetime of the program. It is owned by the
/// platform loop and passed by `&mut` into [`Scheduler::tick`], which is the
/// only execution context that mutates it; the receive path hands its changes
/// over as queued [`Command`]s instead of touching the state directly.
///
/// Invariant: `custom_mask` never has bits set at or above the channel count.
///
/// [`Scheduler::tick`]: crate::scheduler::Scheduler::tick
/// [`Command`]: crate::command::Command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RuntimeState {
    /// The pattern currently driving the bank.
    pub pattern: PatternKind,
    /// Auto-cycling or manual hold.
    pub mode: Mode,
    /// Ticks spent in the current pattern while in auto mode.
    pub tick_counter: u32,
    /// The mask shown by [`PatternKind::Custom`].
    pub custom_mask: u32,
}

impl RuntimeState {
    /// Initial state: all-blink, auto-cycling, custom mask fully lit.
    pub fn new(channels: usize) -> Self {
        Self {
            pattern: PatternKind::AllBlink,
            mode: Mode::Auto,
            tick_counter: 0,
            custom_mask: full_mask(channels),
        }
    }
}
