//! Device controller
//!
//! Owns the peripherals behind the [`Device`] trait and the UART
//! transmitter used for replies. Binary frames arrive through
//! [`FrameHandler`]; the most recent decode result is kept so the caller
//! can log it.

use core::fmt::{self, Write};

use heapless::String;
use serialmux_drivers::{DeciCelsius, Led, Servo, TemperatureSensor};
use serialmux_hal::{AdcChannel, OutputPin, PwmChannel, UartTx};
use serialmux_protocol::{CommandError, Frame, FrameHandler};

use crate::device::Device;
use crate::messages::{pong, BinaryCommand, MessageError};

/// Longest reply line, line ending included
pub const REPLY_CAPACITY: usize = 96;

/// Reply text that keeps what fits and silently drops the rest
///
/// Two bytes always stay free for the line ending.
struct ReplyLine(String<REPLY_CAPACITY>);

impl Write for ReplyLine {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.0.len() + c.len_utf8() > REPLY_CAPACITY - 2 {
                break;
            }
            let _ = self.0.push(c);
        }
        Ok(())
    }
}

/// The board: LED, servo, temperature sensor and reply channel
pub struct Controller<L, S, A, T> {
    led: Led<L>,
    servo: Servo<S>,
    sensor: TemperatureSensor<A>,
    tx: T,
    message: Option<Result<BinaryCommand, MessageError>>,
    reboot_requested: bool,
    telemetry_frames: u32,
    tx_errors: u32,
}

impl<L, S, A, T> Controller<L, S, A, T>
where
    L: OutputPin,
    S: PwmChannel,
    A: AdcChannel,
    T: UartTx,
{
    pub fn new(led: Led<L>, servo: Servo<S>, sensor: TemperatureSensor<A>, tx: T) -> Self {
        Self {
            led,
            servo,
            sensor,
            tx,
            message: None,
            reboot_requested: false,
            telemetry_frames: 0,
            tx_errors: 0,
        }
    }

    pub fn led(&self) -> &Led<L> {
        &self.led
    }

    pub fn servo(&self) -> &Servo<S> {
        &self.servo
    }

    pub fn tx(&self) -> &T {
        &self.tx
    }

    /// Result of decoding the last binary frame, cleared on read
    pub fn take_message(&mut self) -> Option<Result<BinaryCommand, MessageError>> {
        self.message.take()
    }

    /// Whether `REBOOT` ran since the last call
    pub fn take_reboot_request(&mut self) -> bool {
        core::mem::take(&mut self.reboot_requested)
    }

    /// TELEMETRY frames received (wrapping)
    pub fn telemetry_frames(&self) -> u32 {
        self.telemetry_frames
    }

    /// Failed transmit attempts (wrapping)
    pub fn tx_errors(&self) -> u32 {
        self.tx_errors
    }

    fn send(&mut self, bytes: &[u8]) {
        if self.tx.write_blocking(bytes).is_err() {
            self.tx_errors = self.tx_errors.wrapping_add(1);
        }
    }

    fn send_frame(&mut self, frame: &Frame) {
        match frame.encode_to_vec() {
            Ok(bytes) => self.send(&bytes),
            Err(_) => self.tx_errors = self.tx_errors.wrapping_add(1),
        }
    }

    fn apply(&mut self, command: BinaryCommand, frame: &Frame) {
        match command {
            BinaryCommand::Ping { .. } => self.send_frame(&pong(frame)),
            BinaryCommand::Led { on } => self.led.set(on),
            BinaryCommand::Servo { angle } => {
                self.servo.set_angle(angle as u16);
            }
            BinaryCommand::Telemetry { .. } => {
                self.telemetry_frames = self.telemetry_frames.wrapping_add(1);
            }
        }
    }
}

impl<L, S, A, T> FrameHandler for Controller<L, S, A, T>
where
    L: OutputPin,
    S: PwmChannel,
    A: AdcChannel,
    T: UartTx,
{
    fn on_frame(&mut self, frame: &Frame) {
        let message = BinaryCommand::from_frame(frame);
        if let Ok(command) = message {
            self.apply(command, frame);
        }
        self.message = Some(message);
    }
}

impl<L, S, A, T> Device for Controller<L, S, A, T>
where
    L: OutputPin,
    S: PwmChannel,
    A: AdcChannel,
    T: UartTx,
{
    fn set_led(&mut self, on: bool) {
        self.led.set(on);
    }

    fn toggle_led(&mut self) -> bool {
        self.led.toggle()
    }

    fn set_servo_angle(&mut self, angle: u16) -> u16 {
        self.servo.set_angle(angle)
    }

    fn read_temperature(&mut self) -> Result<DeciCelsius, CommandError> {
        self.sensor.read().map_err(|_| CommandError::Unavailable)
    }

    fn reply(&mut self, args: fmt::Arguments<'_>) {
        let mut line = ReplyLine(String::new());
        let _ = line.write_fmt(args);
        let _ = line.0.push_str("\r\n");
        self.send(line.0.as_bytes());
    }

    fn request_reboot(&mut self) {
        self.reboot_requested = true;
    }
}
