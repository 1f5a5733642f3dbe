//! Byte-at-a-time console
//!
//! Pairs a [`Dispatcher`] with the device it drives. Every byte drained
//! from the receive ring goes through [`Console::feed`]; finished lines that
//! did not execute get a textual error reply here, so individual handlers
//! only deal with their own success path.

use serialmux_protocol::{
    CommandError, Dispatcher, LineOutcome, Outcome, DEFAULT_LINE_CAPACITY,
};

use crate::commands::COMMANDS;
use crate::device::Device;

/// Dispatcher plus device
pub struct Console<D, const L: usize = DEFAULT_LINE_CAPACITY> {
    dispatcher: Dispatcher<L>,
    device: D,
}

impl<D: Device + 'static, const L: usize> Console<D, L> {
    pub fn new(device: D) -> Self {
        Self {
            dispatcher: Dispatcher::new(),
            device,
        }
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn dispatcher(&self) -> &Dispatcher<L> {
        &self.dispatcher
    }

    /// Drop any partially received line or frame
    pub fn reset(&mut self) {
        self.dispatcher.reset();
    }

    /// Route one received byte
    pub fn feed(&mut self, byte: u8) -> Outcome<'_> {
        let device: &mut (dyn Device + 'static) = &mut self.device;
        let outcome = self.dispatcher.feed(byte, &COMMANDS, device);

        match &outcome {
            Outcome::Line(LineOutcome::Unknown { command }) => {
                self.device
                    .reply(format_args!("Unknown CMD: '{}'. Try 'HELP'.", command));
            }
            Outcome::Line(LineOutcome::Failed { command, error }) => {
                self.device
                    .reply(format_args!("Error: {}: {}", command, describe(*error)));
            }
            Outcome::Line(LineOutcome::Malformed) => {
                self.device.reply(format_args!("Error: invalid characters"));
            }
            _ => {}
        }

        outcome
    }
}

fn describe(error: CommandError) -> &'static str {
    match error {
        CommandError::MissingArgument => "missing argument",
        CommandError::InvalidArgument => "invalid argument",
        CommandError::Unavailable => "device unavailable",
    }
}
