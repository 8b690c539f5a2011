//! Pattern state machine producing channel bitmasks.
//!
//! [`PatternEngine`] is a pure state machine: each [`tick`](PatternEngine::tick)
//! computes the next mask for the requested [`PatternKind`] and advances the
//! per-pattern [`PatternProgress`] it owns. No I/O happens here.

use crate::channel::full_mask;

/// The animated patterns a bank can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PatternKind {
    /// All channels blink together.
    AllBlink,
    /// One lit channel walks forward, wrapping.
    Sequence,
    /// One lit channel ping-pongs between the ends.
    Chase,
    /// A growing/shrinking lit range, shown lit then dark at each width.
    Bounce,
    /// Whatever the runtime custom mask says.
    Custom,
}

impl PatternKind {
    /// Number of defined pattern kinds.
    pub const COUNT: u32 = 5;

    /// Maps a numeric pattern selector (0..=4) to a kind.
    pub fn from_index(index: u32) -> Option<Self> {
        match index {
            0 => Some(PatternKind::AllBlink),
            1 => Some(PatternKind::Sequence),
            2 => Some(PatternKind::Chase),
            3 => Some(PatternKind::Bounce),
            4 => Some(PatternKind::Custom),
            _ => None,
        }
    }

    /// The next kind in the automatic cycle.
    ///
    /// Cycles AllBlink -> Sequence -> Chase -> Bounce and wraps. Custom is
    /// never produced; it is reachable only through an explicit command.
    pub fn next_auto(self) -> Self {
        match self {
            PatternKind::AllBlink => PatternKind::Sequence,
            PatternKind::Sequence => PatternKind::Chase,
            PatternKind::Chase => PatternKind::Bounce,
            PatternKind::Bounce | PatternKind::Custom => PatternKind::AllBlink,
        }
    }
}

impl core::fmt::Display for PatternKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            PatternKind::AllBlink => "all-blink",
            PatternKind::Sequence => "sequence",
            PatternKind::Chase => "chase",
            PatternKind::Bounce => "bounce",
            PatternKind::Custom => "custom",
        };
        f.write_str(name)
    }
}

/// Per-pattern progression state, one variant per [`PatternKind`].
///
/// Owned exclusively by the engine and reset to the initial value of the new
/// kind whenever the active kind changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PatternProgress {
    /// Blink phase; flipped before every frame.
    AllBlink { on: bool },
    /// Position of the single lit channel.
    Sequence { cursor: usize },
    /// Position and travel direction of the lit dot.
    Chase { cursor: i32, direction: i32 },
    /// Extent and direction of the sweep, plus the lit/dark phase.
    Bounce {
        cursor: i32,
        direction: i32,
        lit: bool,
    },
    /// Stateless; the custom mask is read each tick.
    Custom,
}

impl PatternProgress {
    /// Initial progression state for a kind.
    pub fn initial(kind: PatternKind) -> Self {
        match kind {
            PatternKind::AllBlink => PatternProgress::AllBlink { on: false },
            PatternKind::Sequence => PatternProgress::Sequence { cursor: 0 },
            PatternKind::Chase => PatternProgress::Chase {
                cursor: 0,
                direction: 1,
            },
            PatternKind::Bounce => PatternProgress::Bounce {
                cursor: 0,
                direction: 1,
                lit: false,
            },
            PatternKind::Custom => PatternProgress::Custom,
        }
    }

    /// The kind this progression state belongs to.
    pub fn kind(&self) -> PatternKind {
        match self {
            PatternProgress::AllBlink { .. } => PatternKind::AllBlink,
            PatternProgress::Sequence { .. } => PatternKind::Sequence,
            PatternProgress::Chase { .. } => PatternKind::Chase,
            PatternProgress::Bounce { .. } => PatternKind::Bounce,
            PatternProgress::Custom => PatternKind::Custom,
        }
    }
}

/// Reflects the cursor one step short of the boundary it just crossed.
///
/// The rebound is deliberately asymmetric: the dot touches index 0 and N-1
/// exactly once per sweep, then the next advance relocates it to 1 or N-2.
fn advance_reflect(cursor: &mut i32, direction: &mut i32, channels: i32) {
    *cursor += *direction;
    if *cursor >= channels {
        *cursor = channels - 2;
        *direction = -1;
    } else if *cursor < 0 {
        *cursor = 1;
        *direction = 1;
    }
}

/// Computes channel masks for the active pattern and advances its progress.
///
/// # Type Parameters
/// * `N` - Number of channels (2 to 32)
pub struct PatternEngine<const N: usize> {
    progress: PatternProgress,
}

impl<const N: usize> PatternEngine<N> {
    /// Creates an engine positioned at the start of [`PatternKind::AllBlink`].
    pub fn new() -> Self {
        assert!(N >= 2 && N <= 32, "engine supports 2 to 32 channels");
        Self {
            progress: PatternProgress::initial(PatternKind::AllBlink),
        }
    }

    /// Resets progression to the initial state of `kind`.
    pub fn reset(&mut self, kind: PatternKind) {
        self.progress = PatternProgress::initial(kind);
    }

    /// Current progression state.
    pub fn progress(&self) -> PatternProgress {
        self.progress
    }

    /// Produces the next mask for `kind` and advances the internal state.
    ///
    /// If `kind` differs from the kind the stored progress belongs to, the
    /// progress is first reset to its initial value, so a pattern switch can
    /// never run on stale state from an earlier activation.
    pub fn tick(&mut self, kind: PatternKind, custom_mask: u32) -> u32 {
        if self.progress.kind() != kind {
            self.progress = PatternProgress::initial(kind);
        }

        match &mut self.progress {
            PatternProgress::AllBlink { on } => {
                *on = !*on;
                if *on { full_mask(N) } else { 0 }
            }
            PatternProgress::Sequence { cursor } => {
                let mask = 1 << *cursor;
                *cursor = (*cursor + 1) % N;
                mask
            }
            PatternProgress::Chase { cursor, direction } => {
                let mask = 1 << *cursor;
                advance_reflect(cursor, direction, N as i32);
                mask
            }
            PatternProgress::Bounce {
                cursor,
                direction,
                lit,
            } => {
                let mask = if *lit { full_mask(*cursor as usize + 1) } else { 0 };
                *lit = !*lit;
                if !*lit {
                    // The sweep only extends after the range was shown dark.
                    advance_reflect(cursor, direction, N as i32);
                }
                mask
            }
            PatternProgress::Custom => custom_mask & full_mask(N),
        }
    }
}

impl<const N: usize> Default for PatternEngine<N> {
    fn default() -> Self {
        Self::new()
    }
}
