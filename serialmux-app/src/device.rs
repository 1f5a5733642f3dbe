//! The board as seen by command handlers

use core::fmt;

use serialmux_drivers::DeciCelsius;
use serialmux_protocol::{CommandError, FrameHandler};

/// Operations exposed to line commands and binary messages
///
/// Command handlers only ever see a `&mut dyn Device`, so the command table
/// can be a single `static` independent of the concrete peripherals.
pub trait Device: FrameHandler {
    /// Switch the status LED
    fn set_led(&mut self, on: bool);

    /// Invert the status LED, returning the new state
    fn toggle_led(&mut self) -> bool;

    /// Move the servo, returning the angle actually applied after clamping
    fn set_servo_angle(&mut self, angle: u16) -> u16;

    /// Sample the chip temperature
    fn read_temperature(&mut self) -> Result<DeciCelsius, CommandError>;

    /// Send one line of text back to the host (the line ending is appended)
    fn reply(&mut self, args: fmt::Arguments<'_>);

    /// Ask for a system reset once the current command has completed
    fn request_reboot(&mut self);
}
