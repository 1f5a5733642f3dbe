//! Console task
//!
//! Drains the receive ring through the console and logs what happened.
//! Replies are written by the controller itself.

use defmt::*;
use embassy_stm32::gpio::Output;
use embassy_time::{Duration, Timer};

use serialmux_app::{BinaryCommand, Console, Controller, MessageError};
use serialmux_protocol::{FrameError, FrameStatus, LineOutcome, Outcome};

use crate::board::LINE_CAPACITY;
use crate::channels::{DATA_READY, RX_RING};
use crate::hw::{ChipTemperature, GpioOutput, SerialTx, ServoPwm};

/// Time for the reboot acknowledgement to leave the wire
const REBOOT_DELAY_MS: u64 = 50;

pub type BoardController =
    Controller<GpioOutput<Output<'static>>, ServoPwm, ChipTemperature, SerialTx>;
pub type BoardConsole = Console<BoardController, LINE_CAPACITY>;

#[embassy_executor::task]
pub async fn console_task(mut console: BoardConsole) {
    info!("Console task started");

    loop {
        DATA_READY.wait().await;

        while let Some(byte) = RX_RING.read() {
            if log_outcome(console.feed(byte)) {
                if let Some(message) = console.device_mut().take_message() {
                    log_message(message);
                }
            }

            if console.device_mut().take_reboot_request() {
                info!("Reboot requested");
                Timer::after(Duration::from_millis(REBOOT_DELAY_MS)).await;
                cortex_m::peripheral::SCB::sys_reset();
            }
        }
    }
}

/// Log a dispatch outcome; true when a frame was delivered
fn log_outcome(outcome: Outcome<'_>) -> bool {
    match outcome {
        Outcome::Discarded(byte) => {
            trace!("Discarded {:#x}", byte);
            false
        }
        Outcome::Line(LineOutcome::Executed { command }) => {
            debug!("Executed {}", command);
            false
        }
        Outcome::Line(LineOutcome::Failed { command, error }) => {
            warn!("{} failed: {:?}", command, error);
            false
        }
        Outcome::Line(LineOutcome::Unknown { command }) => {
            warn!("Unknown command: {}", command);
            false
        }
        Outcome::Line(LineOutcome::Malformed) => {
            warn!("Line is not valid UTF-8");
            false
        }
        Outcome::Line(LineOutcome::Pending | LineOutcome::Empty) => false,
        Outcome::Frame(FrameStatus::Complete(frame)) => {
            debug!(
                "Frame: msg {:#x}, seq {}, {} bytes",
                frame.msg_id,
                frame.sequence,
                frame.payload_len()
            );
            true
        }
        Outcome::Frame(FrameStatus::Rejected(FrameError::ChecksumMismatch {
            computed,
            received,
        })) => {
            warn!(
                "Checksum mismatch: computed {:#x}, received {:#x}",
                computed, received
            );
            false
        }
        Outcome::Frame(FrameStatus::Rejected(e)) => {
            warn!("Frame rejected: {:?}", e);
            false
        }
        Outcome::Frame(FrameStatus::Pending) => false,
    }
}

fn log_message(message: Result<BinaryCommand, MessageError>) {
    match message {
        Ok(BinaryCommand::Telemetry { sequence, len }) => {
            info!("Binary Recv! Seq:{}, Len:{}", sequence, len);
        }
        Ok(command) => debug!("Message: {:?}", command),
        Err(e) => warn!("Unhandled frame: {:?}", e),
    }
}
