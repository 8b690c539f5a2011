//! Shared test infrastructure for led-conductor integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use std::collections::VecDeque;

use led_conductor::{Channel, ChannelBank, Command, CommandSink, CommandSource, NotReady};

// ============================================================================
// Mock Channel
// ============================================================================

/// Mock output channel that records its state and write count
pub struct MockChannel {
    pub on: bool,
    pub ready: bool,
    pub writes: usize,
}

impl MockChannel {
    pub fn new() -> Self {
        Self {
            on: false,
            ready: true,
            writes: 0,
        }
    }
}

impl Channel for MockChannel {
    fn configure(&mut self) -> Result<(), NotReady> {
        if self.ready { Ok(()) } else { Err(NotReady) }
    }

    fn set(&mut self, on: bool) {
        self.on = on;
        self.writes += 1;
    }
}

/// Builds an initialized 4-channel bank over mock channels
pub fn mock_bank<const N: usize>() -> ChannelBank<MockChannel, N> {
    let mut bank = ChannelBank::new(std::array::from_fn(|_| MockChannel::new()));
    bank.init().expect("mock channels are ready");
    bank
}

// ============================================================================
// Mock Command Queue
// ============================================================================

/// Unbounded in-memory command queue for tests that do not exercise the
/// SPSC adapters
#[derive(Default)]
pub struct MockCommandQueue {
    commands: VecDeque<Command>,
}

impl MockCommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: Command) {
        self.commands.push_back(command);
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl CommandSink for MockCommandQueue {
    fn send(&mut self, command: Command) -> Result<(), Command> {
        self.commands.push_back(command);
        Ok(())
    }
}

impl CommandSource for MockCommandQueue {
    fn next_command(&mut self) -> Option<Command> {
        self.commands.pop_front()
    }
}
