//! Output channel abstraction and the fixed channel bank.
//!
//! Provides the [`Channel`] trait for hardware abstraction and [`ChannelBank`]
//! which addresses N boolean channels by contiguous index and by bitmask.

/// Marker error returned by [`Channel::configure`] when the underlying
/// output device is not ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NotReady;

/// Trait for abstracting a single boolean output channel.
///
/// Implement this for your output hardware (GPIO pin, shift register bit,
/// relay driver, etc.) to allow the bank to control it.
pub trait Channel {
    /// Prepares the channel as an output. Called once from [`ChannelBank::init`].
    fn configure(&mut self) -> Result<(), NotReady>;

    /// Drives the channel on or off.
    ///
    /// Handle any hardware errors internally - this method cannot fail.
    fn set(&mut self, on: bool);
}

/// Errors that can occur during bank initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceError {
    /// A channel's output device failed its readiness check.
    ///
    /// Fatal at startup: the bank must not be used until init succeeds.
    NotReady {
        /// Index of the channel that failed.
        channel: usize,
    },
}

impl core::fmt::Display for DeviceError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DeviceError::NotReady { channel } => {
                write!(f, "channel {} output device not ready", channel)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DeviceError {}

/// Bitmask with the low `channels` bits set.
pub const fn full_mask(channels: usize) -> u32 {
    if channels >= 32 {
        u32::MAX
    } else {
        (1u32 << channels) - 1
    }
}

/// An ordered bank of N boolean output channels, 0-indexed.
///
/// Bit `i` of a mask maps to channel `i`. Mask bits at or above N are
/// ignored on input and always 0 on readback.
///
/// # Type Parameters
/// * `C` - Channel implementation type
/// * `N` - Number of channels in the bank (2 to 32)
pub struct ChannelBank<C: Channel, const N: usize> {
    channels: [C; N],
    applied: u32,
}

impl<C: Channel, const N: usize> ChannelBank<C, N> {
    /// Mask with every channel of this bank set.
    pub const FULL_MASK: u32 = full_mask(N);

    /// Creates a bank over the given channels. Channels are not configured
    /// until [`init`](Self::init) is called.
    pub fn new(channels: [C; N]) -> Self {
        assert!(N >= 2 && N <= 32, "bank supports 2 to 32 channels");
        Self {
            channels,
            applied: 0,
        }
    }

    /// Configures every channel as an output.
    ///
    /// Fails on the first channel whose device is not ready. The error is
    /// fatal: callers should abort initialization.
    pub fn init(&mut self) -> Result<(), DeviceError> {
        for (i, channel) in self.channels.iter_mut().enumerate() {
            channel
                .configure()
                .map_err(|NotReady| DeviceError::NotReady { channel: i })?;
        }
        Ok(())
    }

    /// Drives a single channel. An out-of-range index is ignored;
    /// range validation belongs to the command layer.
    pub fn set(&mut self, index: usize, on: bool) {
        if index < N {
            self.channels[index].set(on);
            if on {
                self.applied |= 1 << index;
            } else {
                self.applied &= !(1 << index);
            }
        }
    }

    /// Applies a bitmask to the whole bank as one operation.
    ///
    /// Bits at or above N are ignored.
    pub fn apply_mask(&mut self, mask: u32) {
        let mask = mask & Self::FULL_MASK;
        for (i, channel) in self.channels.iter_mut().enumerate() {
            channel.set(mask & (1 << i) != 0);
        }
        self.applied = mask;
    }

    /// Drives every channel on or off.
    pub fn set_all(&mut self, on: bool) {
        self.apply_mask(if on { Self::FULL_MASK } else { 0 });
    }

    /// Returns the last applied state as a bitmask. Bits at or above N
    /// are always 0.
    pub fn mask(&self) -> u32 {
        self.applied
    }

    /// Number of channels in the bank.
    pub const fn len(&self) -> usize {
        N
    }

    /// Always false; a bank has at least two channels.
    pub const fn is_empty(&self) -> bool {
        false
    }
}
