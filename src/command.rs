//! Command grammar, parsing, and application.
//!
//! Received lines are parsed into [`Command`] values in the receive context
//! and handed to the scheduler through the [`CommandSink`] / [`CommandSource`]
//! seam; the scheduler applies them between frames. Arguments are validated
//! during parsing, so a constructed command always applies cleanly.
//!
//! The full grammar:
//!
//! | verb      | arguments      | effect                                        |
//! |-----------|----------------|-----------------------------------------------|
//! | `help`    |                | print the command summary                      |
//! | `auto`    |                | resume automatic pattern cycling               |
//! | `manual`  |                | hold the current pattern                       |
//! | `pattern` | `<0..=4>`      | select a pattern, switch to manual             |
//! | `led`     | `<i> <0\|1>`   | drive one channel, switch to custom/manual     |
//! | `leds`    | `<mask>`       | set the custom mask, switch to custom/manual   |
//! | `all`     | `<0\|1>`       | drive every channel, switch to custom/manual   |
//! | `status`  |                | print mode, pattern and mask                   |

use core::fmt::Write;
use core::str::SplitWhitespace;

use crate::channel::{Channel, ChannelBank, full_mask};
use crate::line::LineAssembler;
use crate::pattern::PatternKind;
use crate::state::{Mode, RuntimeState};

/// Errors produced while parsing a command line.
///
/// All of them are recoverable: the line is discarded, the runtime state is
/// left untouched, and the console keeps accepting input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// The verb is not part of the grammar.
    UnknownCommand,
    /// Wrong number of arguments, or an argument that is not a number.
    InvalidArgument,
    /// A numeric argument outside the valid domain for its verb.
    OutOfRange,
}

impl core::fmt::Display for CommandError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CommandError::UnknownCommand => write!(f, "unknown command, try 'help'"),
            CommandError::InvalidArgument => write!(f, "invalid argument"),
            CommandError::OutOfRange => write!(f, "argument out of range"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CommandError {}

/// A validated operator command.
///
/// Constructed per received line by [`Command::parse`] and consumed
/// immediately by [`Command::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Print the command summary.
    Help,
    /// Resume automatic pattern cycling from a fresh counter.
    Auto,
    /// Hold the current pattern.
    Manual,
    /// Select a pattern.
    Pattern(PatternKind),
    /// Drive a single channel directly.
    Led { index: usize, on: bool },
    /// Replace the custom mask and show it.
    Leds(u32),
    /// Drive every channel on or off.
    All(bool),
    /// Print mode, pattern and mask.
    Status,
}

fn expect_end(words: &mut SplitWhitespace<'_>) -> Result<(), CommandError> {
    if words.next().is_some() {
        Err(CommandError::InvalidArgument)
    } else {
        Ok(())
    }
}

fn numeric_arg(words: &mut SplitWhitespace<'_>) -> Result<u32, CommandError> {
    words
        .next()
        .ok_or(CommandError::InvalidArgument)?
        .parse()
        .map_err(|_| CommandError::InvalidArgument)
}

fn switch_arg(words: &mut SplitWhitespace<'_>) -> Result<bool, CommandError> {
    match numeric_arg(words)? {
        0 => Ok(false),
        1 => Ok(true),
        _ => Err(CommandError::OutOfRange),
    }
}

impl Command {
    /// Parses one assembled line against the grammar for an N-channel bank.
    ///
    /// Range validation happens here: `pattern` selectors must name one of
    /// the five kinds, `led` indices must address an existing channel, and
    /// `leds` masks must fit within the bank.
    pub fn parse<const N: usize>(line: &str) -> Result<Self, CommandError> {
        let mut words = line.split_whitespace();
        let verb = words.next().ok_or(CommandError::UnknownCommand)?;

        let command = match verb {
            "help" => Command::Help,
            "auto" => Command::Auto,
            "manual" => Command::Manual,
            "status" => Command::Status,
            "pattern" => {
                let index = numeric_arg(&mut words)?;
                let kind = PatternKind::from_index(index).ok_or(CommandError::OutOfRange)?;
                Command::Pattern(kind)
            }
            "led" => {
                let index = numeric_arg(&mut words)?;
                if index as usize >= N {
                    return Err(CommandError::OutOfRange);
                }
                let on = switch_arg(&mut words)?;
                Command::Led {
                    index: index as usize,
                    on,
                }
            }
            "leds" => {
                let mask = numeric_arg(&mut words)?;
                if mask > full_mask(N) {
                    return Err(CommandError::OutOfRange);
                }
                Command::Leds(mask)
            }
            "all" => Command::All(switch_arg(&mut words)?),
            _ => return Err(CommandError::UnknownCommand),
        };

        expect_end(&mut words)?;
        Ok(command)
    }

    /// Applies this command to the runtime state and bank.
    ///
    /// Runs in the scheduler's context, at the safe point between frames, so
    /// every multi-field update here is observed whole by the tick that
    /// follows. `help` and `status` output goes to `console`; write failures
    /// are ignored, the sink is advisory.
    pub fn apply<C: Channel, W: Write, const N: usize>(
        self,
        state: &mut RuntimeState,
        bank: &mut ChannelBank<C, N>,
        console: &mut W,
    ) {
        match self {
            Command::Help => {
                let _ = console.write_str(HELP_TEXT);
            }
            Command::Auto => {
                state.mode = Mode::Auto;
                state.tick_counter = 0;
            }
            Command::Manual => {
                state.mode = Mode::Manual;
            }
            Command::Pattern(kind) => {
                select_pattern(state, bank, kind);
                state.tick_counter = 0;
                state.mode = Mode::Manual;
            }
            Command::Led { index, on } => {
                // The channel is written directly; custom_mask stays as it
                // was, so the next custom frame re-applies the old mask over
                // this write and `status` keeps reporting the mask. Faithful
                // to the observed firmware behavior.
                select_pattern(state, bank, PatternKind::Custom);
                bank.set(index, on);
                state.mode = Mode::Manual;
            }
            Command::Leds(mask) => {
                state.custom_mask = mask;
                select_pattern(state, bank, PatternKind::Custom);
                bank.apply_mask(mask);
                state.mode = Mode::Manual;
            }
            Command::All(on) => {
                state.custom_mask = if on { full_mask(N) } else { 0 };
                select_pattern(state, bank, PatternKind::Custom);
                bank.set_all(on);
                state.mode = Mode::Manual;
            }
            Command::Status => {
                let _ = writeln!(console, "mode: {}", state.mode);
                let _ = writeln!(console, "pattern: {}", state.pattern);
                let _ = writeln!(console, "mask: 0b{:0width$b}", state.custom_mask, width = N);
            }
        }
    }
}

/// Switches the active pattern, clearing the bank on an actual change.
///
/// Re-selecting the current kind keeps its progression running. The engine
/// resets its progress on the next tick when it sees the new kind.
fn select_pattern<C: Channel, const N: usize>(
    state: &mut RuntimeState,
    bank: &mut ChannelBank<C, N>,
    kind: PatternKind,
) {
    if state.pattern != kind {
        state.pattern = kind;
        bank.apply_mask(0);
    }
}

const HELP_TEXT: &str = "\
commands:\r\n\
  help           show this help\r\n\
  auto           resume automatic pattern cycling\r\n\
  manual         hold the current pattern\r\n\
  pattern <n>    select pattern 0-4 (0=all-blink 1=sequence 2=chase 3=bounce 4=custom)\r\n\
  led <i> <s>    switch channel <i> on (1) or off (0)\r\n\
  leds <mask>    show <mask> on the bank\r\n\
  all <s>        switch every channel on (1) or off (0)\r\n\
  status         show mode, pattern and mask\r\n";

/// Producing end of the command queue, fed from the receive context.
pub trait CommandSink {
    /// Hands a command over to the consumer.
    ///
    /// Returns the command back when the queue is full.
    fn send(&mut self, command: Command) -> Result<(), Command>;
}

/// Consuming end of the command queue, drained by the scheduler.
pub trait CommandSource {
    /// Takes the next pending command, if any.
    fn next_command(&mut self) -> Option<Command>;
}

impl CommandSink for heapless::spsc::Producer<'_, Command> {
    fn send(&mut self, command: Command) -> Result<(), Command> {
        self.enqueue(command)
    }
}

impl CommandSource for heapless::spsc::Consumer<'_, Command> {
    fn next_command(&mut self) -> Option<Command> {
        self.dequeue()
    }
}

/// The receive-context half of the command pipeline.
///
/// Owns the line assembler and the producing end of the command queue. The
/// receive callback feeds it one byte at a time; completed lines are parsed
/// and enqueued for the scheduler. The port never blocks and never touches
/// the runtime state - that separation is what keeps the two execution
/// contexts from racing on shared fields.
///
/// # Type Parameters
/// * `S` - Command sink implementation (typically an SPSC producer)
/// * `N` - Number of channels, for argument validation
pub struct CommandPort<S: CommandSink, const N: usize> {
    line: LineAssembler,
    commands: S,
}

impl<S: CommandSink, const N: usize> CommandPort<S, N> {
    /// Creates a port feeding the given sink.
    pub fn new(commands: S) -> Self {
        Self {
            line: LineAssembler::new(),
            commands,
        }
    }

    /// Consumes one received byte, echoing through `console`.
    ///
    /// On a completed line the command is parsed and enqueued. Parse errors
    /// are returned for the caller to report on the console it owns; the
    /// assembler and queue remain usable. If the queue is full the command
    /// is dropped - the queue is sized for an operator typing lines, not a
    /// firehose.
    pub fn on_byte<W: Write>(&mut self, byte: u8, console: &mut W) -> Result<(), CommandError> {
        let Some(line) = self.line.push(byte, console) else {
            return Ok(());
        };

        let command = Command::parse::<N>(line.as_str())?;
        let _ = self.commands.send(command);
        Ok(())
    }

    /// Consumes the port, returning its sink.
    pub fn into_sink(self) -> S {
        self.commands
    }
}
