//! Status LED on a GPIO pin
//!
//! Many boards wire the user LED between the supply and the pin (the
//! STM32F411 "black pill" on PC13 does), so the LED lights when the pin is
//! driven low. The driver hides that polarity behind a logical on/off state.

use serialmux_hal::gpio::{Level, OutputPin};

/// Status LED
pub struct Led<P> {
    pin: P,
    /// If true, LED ON = pin LOW
    active_low: bool,
    /// Current logical state (true = lit)
    on: bool,
}

impl<P: OutputPin> Led<P> {
    /// Create a new LED driver, initially off
    ///
    /// # Arguments
    /// - `pin`: The GPIO pin to control
    /// - `active_low`: If true, the LED is lit when the pin is LOW
    pub fn new(pin: P, active_low: bool) -> Self {
        let mut led = Self {
            pin,
            active_low,
            on: false,
        };
        led.set(false);
        led
    }

    pub fn new_active_high(pin: P) -> Self {
        Self::new(pin, false)
    }

    pub fn new_active_low(pin: P) -> Self {
        Self::new(pin, true)
    }

    /// Switch the LED on or off
    pub fn set(&mut self, on: bool) {
        self.on = on;
        self.pin.set_level(Level::from(on != self.active_low));
    }

    /// Invert the current state and return the new one
    pub fn toggle(&mut self) -> bool {
        self.set(!self.on);
        self.on
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Release the underlying pin
    pub fn release(self) -> P {
        self.pin
    }
}
