//! Duration abstraction for platform-agnostic tick delays.

/// Trait abstraction for duration types.
///
/// The scheduler expresses its inter-tick delays through this trait so the
/// crate works with `embassy-time`, RTIC monotonics, `core::time::Duration`,
/// or a bare millisecond counter alike.
pub trait TimeDuration: Copy + PartialEq {
    /// Zero duration constant.
    const ZERO: Self;

    /// Converts duration to milliseconds.
    fn as_millis(&self) -> u64;

    /// Creates duration from milliseconds.
    fn from_millis(millis: u64) -> Self;

    /// Saturating subtraction (returns ZERO on underflow).
    fn saturating_sub(self, other: Self) -> Self;
}

impl TimeDuration for core::time::Duration {
    const ZERO: Self = core::time::Duration::ZERO;

    fn as_millis(&self) -> u64 {
        core::time::Duration::as_millis(self) as u64
    }

    fn from_millis(millis: u64) -> Self {
        core::time::Duration::from_millis(millis)
    }

    fn saturating_sub(self, other: Self) -> Self {
        core::time::Duration::saturating_sub(self, other)
    }
}
