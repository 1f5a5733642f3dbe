//! Host-side doubles for the HAL traits and the [`Device`] trait

use core::fmt;
use std::string::{String, ToString};
use std::vec::Vec;

use serialmux_drivers::{DeciCelsius, Led, Servo, ServoConfig, TemperatureSensor};
use serialmux_hal::{AdcChannel, Level, OutputPin, PwmChannel, UartTx};
use serialmux_protocol::{CommandError, Frame, FrameHandler};

use crate::controller::Controller;
use crate::device::Device;

pub struct MockPin(Level);

impl OutputPin for MockPin {
    fn set_level(&mut self, level: Level) {
        self.0 = level;
    }

    fn level(&self) -> Level {
        self.0
    }
}

/// 1 MHz tick, 20 ms period
pub struct MockPwm {
    pub duty: u32,
}

impl PwmChannel for MockPwm {
    fn max_duty(&self) -> u32 {
        20_000
    }

    fn set_duty(&mut self, duty: u32) {
        self.duty = duty;
    }

    fn period_us(&self) -> u32 {
        20_000
    }

    fn enable(&mut self) {}
}

pub struct MockAdc(pub u16);

impl AdcChannel for MockAdc {
    type Error = ();

    fn read_raw(&mut self) -> Result<u16, ()> {
        Ok(self.0)
    }
}

#[derive(Default)]
pub struct MockTx {
    pub sent: Vec<u8>,
    pub fail: bool,
}

impl UartTx for MockTx {
    type Error = ();

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), ()> {
        if self.fail {
            return Err(());
        }
        self.sent.extend_from_slice(data);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), ()> {
        Ok(())
    }
}

pub type MockController = Controller<MockPin, MockPwm, MockAdc, MockTx>;

/// Active-low LED, default servo, ADC reading 955 (28.6 °C)
pub fn controller() -> MockController {
    let led = Led::new_active_low(MockPin(Level::Low));
    let servo = Servo::new(MockPwm { duty: 0 }, ServoConfig::default()).unwrap();
    let sensor = TemperatureSensor::new(MockAdc(955), Default::default()).unwrap();
    Controller::new(led, servo, sensor, MockTx::default())
}

/// Records every [`Device`] call
pub struct MockDevice {
    pub led: bool,
    pub angle: Option<u16>,
    pub temperature: Option<DeciCelsius>,
    pub replies: Vec<String>,
    pub reboot: bool,
    pub frames: Vec<Frame>,
}

impl Default for MockDevice {
    fn default() -> Self {
        Self {
            led: false,
            angle: None,
            temperature: Some(DeciCelsius(315)),
            replies: Vec::new(),
            reboot: false,
            frames: Vec::new(),
        }
    }
}

impl FrameHandler for MockDevice {
    fn on_frame(&mut self, frame: &Frame) {
        self.frames.push(frame.clone());
    }
}

impl Device for MockDevice {
    fn set_led(&mut self, on: bool) {
        self.led = on;
    }

    fn toggle_led(&mut self) -> bool {
        self.led = !self.led;
        self.led
    }

    fn set_servo_angle(&mut self, angle: u16) -> u16 {
        let angle = angle.min(180);
        self.angle = Some(angle);
        angle
    }

    fn read_temperature(&mut self) -> Result<DeciCelsius, CommandError> {
        self.temperature.ok_or(CommandError::Unavailable)
    }

    fn reply(&mut self, args: fmt::Arguments<'_>) {
        self.replies.push(args.to_string());
    }

    fn request_reboot(&mut self) {
        self.reboot = true;
    }
}
