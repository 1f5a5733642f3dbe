//! serialmux application layer
//!
//! Everything that gives the decoded byte stream a meaning:
//!
//! - [`device::Device`] - what commands and messages can do to the board
//! - [`commands::COMMANDS`] - the line command table (`LED`, `MOTOR`, `TEMP`,
//!   `REBOOT`, `HELP`)
//! - [`messages::BinaryCommand`] - the binary message catalogue
//! - [`controller::Controller`] - the [`Device`](device::Device) built from
//!   the drivers, replying over a UART transmitter
//! - [`console::Console`] - dispatcher plus device, fed one byte at a time

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod commands;
pub mod console;
pub mod controller;
pub mod device;
pub mod messages;

#[cfg(test)]
mod mock;

pub use commands::COMMANDS;
pub use console::Console;
pub use controller::Controller;
pub use device::Device;
pub use messages::{BinaryCommand, MessageError};
