#![cfg_attr(not(feature = "std"), no_std)]

//! Drive a fixed bank of discrete LEDs through animated patterns, with
//! line-oriented serial commands overriding pattern and channel state at
//! runtime.
//!
//! # Core Concepts
//!
//! - **`ChannelBank`**: an ordered bank of N boolean output channels,
//!   addressed by index or bitmask
//! - **`Channel`**: trait to implement for your output hardware
//! - **`PatternEngine`**: pure state machine producing the next channel mask
//!   for the active [`PatternKind`]
//! - **`RuntimeState`**: the shared pattern/mode/counter/mask fields, owned
//!   by the platform loop
//! - **`LineAssembler`** / **`CommandPort`**: the receive-context pipeline
//!   turning serial bytes into validated [`Command`]s
//! - **`Scheduler`**: the cooperative tick loop applying frames, draining
//!   commands, and auto-cycling patterns
//! - **`TimeDuration`**: trait to implement for your timing system
//!
//! The receive path and the tick loop run in different execution contexts
//! (a receive interrupt or callback vs. the main loop). They share nothing
//! mutable: the receive side parses and enqueues commands through a
//! [`CommandSink`], and the scheduler drains them between frames through a
//! [`CommandSource`]. Impls for `heapless::spsc` producer/consumer halves
//! are provided.

pub mod channel;
pub mod command;
pub mod line;
pub mod pattern;
pub mod scheduler;
pub mod state;
pub mod time;

pub use channel::{Channel, ChannelBank, DeviceError, NotReady, full_mask};
pub use command::{Command, CommandError, CommandPort, CommandSink, CommandSource};
pub use line::{LINE_CAPACITY, Line, LineAssembler};
pub use pattern::{PatternEngine, PatternKind, PatternProgress};
pub use scheduler::{Scheduler, SchedulerConfig};
pub use state::{Mode, RuntimeState};
pub use time::TimeDuration;
