//! Line-oriented command parser
//!
//! Bytes accumulate in a fixed buffer until `\r` or `\n`. The completed line
//! is split into a command name (first whitespace-delimited token) and an
//! argument string (everything after the separator, verbatim), and the name
//! is looked up in a [`CommandTable`].
//!
//! A line that does not fit in the buffer is thrown away as a whole: the
//! cursor silently restarts at 0 and whatever follows is treated as a new
//! line.

use crate::command::{CommandError, CommandTable};

/// Line buffer size used by [`LineParser`] unless overridden
pub const DEFAULT_LINE_CAPACITY: usize = 64;

/// Result of feeding one byte to the [`LineParser`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineOutcome<'a> {
    /// Not a terminator, the line continues
    Pending,
    /// Terminator on an empty or blank line, nothing executed
    Empty,
    /// The handler ran and succeeded
    Executed { command: &'a str },
    /// The handler ran and reported an error
    Failed {
        command: &'a str,
        error: CommandError,
    },
    /// No command with this name exists
    Unknown { command: &'a str },
    /// The line is not valid UTF-8
    Malformed,
}

impl LineOutcome<'_> {
    /// True exactly when a terminator byte was processed
    pub fn is_finished(&self) -> bool {
        !matches!(self, LineOutcome::Pending)
    }
}

/// Accumulates one command line at a time
#[derive(Debug, Clone)]
pub struct LineParser<const N: usize = DEFAULT_LINE_CAPACITY> {
    buf: [u8; N],
    cursor: usize,
    overflows: u32,
}

impl<const N: usize> Default for LineParser<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> LineParser<N> {
    pub const fn new() -> Self {
        const { assert!(N >= 2, "a line buffer needs at least two bytes") };
        Self {
            buf: [0; N],
            cursor: 0,
            overflows: 0,
        }
    }

    /// Discard any partial line
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Bytes accumulated for the current line
    pub fn len(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.cursor == 0
    }

    /// Number of overlong lines discarded so far (wrapping)
    pub fn overflows(&self) -> u32 {
        self.overflows
    }

    /// Feed one byte, executing the line when it is a terminator
    pub fn feed<C: ?Sized>(
        &mut self,
        byte: u8,
        commands: &CommandTable<'_, C>,
        ctx: &mut C,
    ) -> LineOutcome<'_> {
        if byte == b'\r' || byte == b'\n' {
            if self.cursor == 0 {
                return LineOutcome::Empty;
            }
            let len = self.cursor;
            self.cursor = 0;
            return execute(&self.buf[..len], commands, ctx);
        }

        // One byte stays reserved, matching a C-style terminated buffer
        if self.cursor < N - 1 {
            self.buf[self.cursor] = byte;
            self.cursor += 1;
        } else {
            self.cursor = 0;
            self.overflows = self.overflows.wrapping_add(1);
        }
        LineOutcome::Pending
    }
}

fn execute<'l, C: ?Sized>(
    line: &'l [u8],
    commands: &CommandTable<'_, C>,
    ctx: &mut C,
) -> LineOutcome<'l> {
    let Ok(text) = core::str::from_utf8(line) else {
        return LineOutcome::Malformed;
    };

    let text = text.trim_start_matches(|c: char| c.is_ascii_whitespace());
    if text.is_empty() {
        return LineOutcome::Empty;
    }

    let (name, args) = match text.find(|c: char| c.is_ascii_whitespace()) {
        Some(split) => (&text[..split], &text[split + 1..]),
        None => (text, ""),
    };

    match commands.find(name) {
        Some(command) => match command.execute(ctx, args, commands) {
            Ok(()) => LineOutcome::Executed { command: name },
            Err(error) => LineOutcome::Failed {
                command: name,
                error,
            },
        },
        None => LineOutcome::Unknown { command: name },
    }
}
