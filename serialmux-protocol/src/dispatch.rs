//! Per-byte protocol dispatcher
//!
//! The first byte of each frame decides which parser receives the frame:
//!
//! ```text
//!            printable / \r / \n                 line finished
//!   ┌──────┐ ───────────────────► ┌─────────────┐ ─────────────┐
//!   │ Idle │                      │ InLineFrame │              │
//!   └──────┘ ◄─────────────────────────────────────────────────┘
//!    │  ▲ │          0xEF                          frame finished
//!    │  │ └─────────────────────► ┌───────────────┐ ───────────┐
//!    │  │                         │ InBinaryFrame │            │
//!    │  └──────────────────────────────────────────────────────┘
//!    └─► anything else: discarded, stay Idle
//! ```
//!
//! Once a frame is classified every following byte goes to the same parser
//! until it reports completion. The two protocols are assumed not to
//! interleave on the wire.

use crate::command::CommandTable;
use crate::frame::{FrameHandler, FrameParser, FrameStatus, FRAME_HEADER};
use crate::line::{LineOutcome, LineParser, DEFAULT_LINE_CAPACITY};

/// Which parser owns the byte stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DispatchState {
    Idle,
    InLineFrame,
    InBinaryFrame,
}

/// What happened to one byte fed to the [`Dispatcher`]
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome<'a> {
    /// Byte arrived while idle and starts neither protocol
    Discarded(u8),
    /// Byte went to the line parser
    Line(LineOutcome<'a>),
    /// Byte went to the binary frame parser
    Frame(FrameStatus<'a>),
}

impl Outcome<'_> {
    /// True on the byte that ends a line or a binary frame
    pub fn is_finished(&self) -> bool {
        match self {
            Outcome::Discarded(_) => false,
            Outcome::Line(outcome) => outcome.is_finished(),
            Outcome::Frame(status) => status.is_finished(),
        }
    }
}

/// Bytes that open a line frame: printable ASCII and the terminators
fn starts_line(byte: u8) -> bool {
    (0x20..=0x7E).contains(&byte) || byte == b'\r' || byte == b'\n'
}

/// Owns both parsers and routes bytes between them
#[derive(Debug, Clone)]
pub struct Dispatcher<const L: usize = DEFAULT_LINE_CAPACITY> {
    state: DispatchState,
    line: LineParser<L>,
    frame: FrameParser,
    discarded: u32,
}

impl<const L: usize> Default for Dispatcher<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const L: usize> Dispatcher<L> {
    pub fn new() -> Self {
        Self {
            state: DispatchState::Idle,
            line: LineParser::new(),
            frame: FrameParser::new(),
            discarded: 0,
        }
    }

    /// Return to the state of a fresh dispatcher
    ///
    /// Drops any partial line or frame and zeroes the diagnostic counters.
    pub fn reset(&mut self) {
        self.state = DispatchState::Idle;
        self.line = LineParser::new();
        self.frame.reset();
        self.discarded = 0;
    }

    pub fn state(&self) -> DispatchState {
        self.state
    }

    /// Bytes thrown away as noise while idle (wrapping)
    pub fn discarded(&self) -> u32 {
        self.discarded
    }

    /// Overlong lines thrown away by the line parser (wrapping)
    pub fn line_overflows(&self) -> u32 {
        self.line.overflows()
    }

    /// Route one byte
    ///
    /// Completed frames are handed to `ctx` as a [`FrameHandler`]; completed
    /// lines are looked up in `commands` and executed against `ctx`.
    pub fn feed<C>(
        &mut self,
        byte: u8,
        commands: &CommandTable<'_, C>,
        ctx: &mut C,
    ) -> Outcome<'_>
    where
        C: FrameHandler + ?Sized,
    {
        let route = match self.state {
            DispatchState::Idle if starts_line(byte) => DispatchState::InLineFrame,
            DispatchState::Idle if byte == FRAME_HEADER => DispatchState::InBinaryFrame,
            DispatchState::Idle => {
                self.discarded = self.discarded.wrapping_add(1);
                return Outcome::Discarded(byte);
            }
            busy => busy,
        };

        if route == DispatchState::InBinaryFrame {
            let status = self.frame.feed(byte);
            if let FrameStatus::Complete(frame) = &status {
                ctx.on_frame(frame);
            }
            self.state = if status.is_finished() {
                DispatchState::Idle
            } else {
                DispatchState::InBinaryFrame
            };
            Outcome::Frame(status)
        } else {
            let outcome = self.line.feed(byte, commands, ctx);
            self.state = if outcome.is_finished() {
                DispatchState::Idle
            } else {
                DispatchState::InLineFrame
            };
            Outcome::Line(outcome)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{Command, CommandError, Handler};
    use crate::frame::{Frame, FrameError};
    use proptest::prelude::*;
    use std::string::String;
    use std::vec::Vec;

    #[derive(Default)]
    struct Recorder {
        frames: Vec<Frame>,
        leds: Vec<String>,
    }

    impl FrameHandler for Recorder {
        fn on_frame(&mut self, frame: &Frame) {
            self.frames.push(frame.clone());
        }
    }

    struct Led;

    impl Handler<Recorder> for Led {
        fn execute(
            &self,
            rec: &mut Recorder,
            args: &str,
            _: &CommandTable<'_, Recorder>,
        ) -> Result<(), CommandError> {
            rec.leds.push(args.into());
            Ok(())
        }
    }

    static ENTRIES: [Command<'static, Recorder>; 1] = [Command::new("LED", "Control LED", &Led)];

    static COMMANDS: CommandTable<'static, Recorder> = CommandTable::new(&ENTRIES);

    fn telemetry() -> Frame {
        Frame::new(1, 2, 0x51, 7, &[0xAA, 0xBB]).unwrap()
    }

    fn feed_all(dispatcher: &mut Dispatcher, rec: &mut Recorder, bytes: &[u8]) -> usize {
        bytes
            .iter()
            .filter(|&&b| dispatcher.feed(b, &COMMANDS, &mut *rec).is_finished())
            .count()
    }

    #[test]
    fn test_line_command_dispatch() {
        let mut dispatcher: Dispatcher = Dispatcher::new();
        let mut rec = Recorder::default();

        assert_eq!(feed_all(&mut dispatcher, &mut rec, b"LED ON\r"), 1);
        assert_eq!(rec.leds, ["ON"]);
        assert_eq!(dispatcher.state(), DispatchState::Idle);
    }

    #[test]
    fn test_terminator_alone_completes_in_one_step() {
        let mut dispatcher: Dispatcher = Dispatcher::new();
        let mut rec = Recorder::default();

        let outcome = dispatcher.feed(b'\n', &COMMANDS, &mut rec);
        assert_eq!(outcome, Outcome::Line(LineOutcome::Empty));
        assert_eq!(dispatcher.state(), DispatchState::Idle);
    }

    #[test]
    fn test_binary_frame_dispatch() {
        let mut dispatcher: Dispatcher = Dispatcher::new();
        let mut rec = Recorder::default();
        let encoded = telemetry().encode_to_vec().unwrap();

        dispatcher.feed(encoded[0], &COMMANDS, &mut rec);
        assert_eq!(dispatcher.state(), DispatchState::InBinaryFrame);

        assert_eq!(feed_all(&mut dispatcher, &mut rec, &encoded[1..]), 1);
        assert_eq!(rec.frames, [telemetry()]);
        assert_eq!(dispatcher.state(), DispatchState::Idle);
    }

    #[test]
    fn test_checksum_failure_reports_and_skips_callback() {
        let mut dispatcher: Dispatcher = Dispatcher::new();
        let mut rec = Recorder::default();
        let mut encoded = telemetry().encode_to_vec().unwrap();
        encoded[6] = 0xAB;

        let last = encoded.len() - 1;
        feed_all(&mut dispatcher, &mut rec, &encoded[..last]);
        let outcome = dispatcher.feed(encoded[last], &COMMANDS, &mut rec);

        assert!(matches!(
            outcome,
            Outcome::Frame(FrameStatus::Rejected(FrameError::ChecksumMismatch { .. }))
        ));
        assert!(rec.frames.is_empty());
        assert_eq!(dispatcher.state(), DispatchState::Idle);
    }

    #[test]
    fn test_noise_is_discarded_while_idle() {
        let mut dispatcher: Dispatcher = Dispatcher::new();
        let mut rec = Recorder::default();

        for byte in [0x00u8, 0x07, 0x1B, 0x7F, 0x80, 0xFF] {
            assert_eq!(
                dispatcher.feed(byte, &COMMANDS, &mut rec),
                Outcome::Discarded(byte)
            );
            assert_eq!(dispatcher.state(), DispatchState::Idle);
        }
        assert_eq!(dispatcher.discarded(), 6);
    }

    #[test]
    fn test_length_guard_then_resync() {
        let mut dispatcher: Dispatcher = Dispatcher::new();
        let mut rec = Recorder::default();

        // LEN = 255 aborts right after the length byte
        let finished = feed_all(&mut dispatcher, &mut rec, &[FRAME_HEADER, 1, 2, 3, 4, 255]);
        assert_eq!(finished, 1);
        assert_eq!(dispatcher.state(), DispatchState::Idle);

        // The announced payload bytes now arrive as idle noise
        feed_all(&mut dispatcher, &mut rec, &[0x00, 0x90, 0x91]);
        assert_eq!(dispatcher.state(), DispatchState::Idle);

        let encoded = telemetry().encode_to_vec().unwrap();
        feed_all(&mut dispatcher, &mut rec, &encoded);
        assert_eq!(rec.frames, [telemetry()]);
    }

    #[test]
    fn test_alternating_protocols() {
        let mut dispatcher: Dispatcher = Dispatcher::new();
        let mut rec = Recorder::default();

        let mut stream = b"LED ON\r\n".to_vec();
        stream.extend_from_slice(&telemetry().encode_to_vec().unwrap());
        stream.extend_from_slice(b"LED OFF\n");

        feed_all(&mut dispatcher, &mut rec, &stream);
        assert_eq!(rec.leds, ["ON", "OFF"]);
        assert_eq!(rec.frames.len(), 1);
    }

    #[test]
    fn test_header_byte_inside_line_stays_in_line() {
        let mut dispatcher: Dispatcher = Dispatcher::new();
        let mut rec = Recorder::default();

        feed_all(&mut dispatcher, &mut rec, b"LED ");
        let outcome = dispatcher.feed(FRAME_HEADER, &COMMANDS, &mut rec);
        assert_eq!(outcome, Outcome::Line(LineOutcome::Pending));
        assert_eq!(dispatcher.state(), DispatchState::InLineFrame);

        // 0xEF alone is not UTF-8, so the line is rejected as a whole
        let outcome = dispatcher.feed(b'\r', &COMMANDS, &mut rec);
        assert_eq!(outcome, Outcome::Line(LineOutcome::Malformed));
        assert!(rec.leds.is_empty());
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let mut dispatcher: Dispatcher = Dispatcher::new();
        let mut rec = Recorder::default();
        let encoded = telemetry().encode_to_vec().unwrap();

        feed_all(&mut dispatcher, &mut rec, &encoded[..3]);
        assert_eq!(dispatcher.state(), DispatchState::InBinaryFrame);
        dispatcher.reset();
        assert_eq!(dispatcher.state(), DispatchState::Idle);

        feed_all(&mut dispatcher, &mut rec, b"LE");
        dispatcher.reset();
        feed_all(&mut dispatcher, &mut rec, b"LED X\r");
        assert_eq!(rec.leds, ["X"]);

        feed_all(&mut dispatcher, &mut rec, &encoded);
        assert_eq!(rec.frames.len(), 1);
    }

    #[test]
    fn test_reset_zeroes_counters() {
        let mut dispatcher: Dispatcher = Dispatcher::new();
        let mut rec = Recorder::default();

        feed_all(&mut dispatcher, &mut rec, &[0x00, 0xFF]);
        feed_all(&mut dispatcher, &mut rec, &[b'A'; DEFAULT_LINE_CAPACITY + 4]);
        assert_eq!(dispatcher.discarded(), 2);
        assert_eq!(dispatcher.line_overflows(), 1);

        dispatcher.reset();
        assert_eq!(dispatcher.state(), DispatchState::Idle);
        assert_eq!(dispatcher.discarded(), 0);
        assert_eq!(dispatcher.line_overflows(), 0);
    }

    fn noise_byte() -> impl Strategy<Value = u8> {
        any::<u8>().prop_filter("must not open a frame", |&b| {
            !starts_line(b) && b != FRAME_HEADER
        })
    }

    proptest! {
        #[test]
        fn prop_frame_survives_leading_noise(
            noise in proptest::collection::vec(noise_byte(), 0..64),
            payload in proptest::collection::vec(any::<u8>(), 0..32),
            seq in any::<u8>(),
        ) {
            let frame = Frame::new(1, 2, 0x51, seq, &payload).unwrap();
            let mut stream = noise.clone();
            stream.extend_from_slice(&frame.encode_to_vec().unwrap());

            let mut dispatcher: Dispatcher = Dispatcher::new();
            let mut rec = Recorder::default();
            feed_all(&mut dispatcher, &mut rec, &stream);

            prop_assert_eq!(rec.frames, std::vec![frame]);
            prop_assert_eq!(dispatcher.discarded() as usize, noise.len());
            prop_assert_eq!(dispatcher.state(), DispatchState::Idle);
        }
    }
}
