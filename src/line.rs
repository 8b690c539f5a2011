//! Byte-at-a-time line assembly for the serial command console.
//!
//! [`LineAssembler`] is fed single received bytes from the asynchronous
//! receive path and yields completed lines. Typed characters are echoed back
//! through a [`core::fmt::Write`] sink; backspace erases with the usual
//! `"\x08 \x08"` terminal sequence.

use core::fmt::Write;

/// Maximum printable characters per command line.
pub const LINE_CAPACITY: usize = 31;

/// A completed command line handed out by the assembler.
pub type Line = heapless::String<LINE_CAPACITY>;

/// Assembles received bytes into newline-terminated lines.
#[derive(Debug, Default)]
pub struct LineAssembler {
    buffer: Line,
}

impl LineAssembler {
    /// Creates an assembler with an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes one received byte.
    ///
    /// Returns the completed line when `byte` is a terminator and the buffer
    /// is non-empty; the buffer is cleared for the next line. Terminators on
    /// an empty buffer are swallowed so empty commands never reach the
    /// parser. Printable bytes beyond [`LINE_CAPACITY`] are dropped without
    /// echo. Echo failures are ignored - the sink is advisory.
    pub fn push<W: Write>(&mut self, byte: u8, echo: &mut W) -> Option<Line> {
        match byte {
            b'\r' | b'\n' => {
                if self.buffer.is_empty() {
                    None
                } else {
                    let _ = echo.write_str("\r\n");
                    Some(core::mem::take(&mut self.buffer))
                }
            }
            0x08 | 0x7F => {
                if self.buffer.pop().is_some() {
                    let _ = echo.write_str("\x08 \x08");
                }
                None
            }
            0x20..=0x7E => {
                if self.buffer.push(byte as char).is_ok() {
                    let _ = echo.write_char(byte as char);
                }
                None
            }
            // Other control bytes carry no line semantics.
            _ => None,
        }
    }

    /// Characters currently buffered.
    pub fn pending(&self) -> &str {
        self.buffer.as_str()
    }
}
