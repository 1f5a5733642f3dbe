//! Peripheral drivers
//!
//! Concrete drivers built on the traits in serialmux-hal:
//!
//! - Status LED on a GPIO output (active-high or active-low)
//! - Hobby servo on a PWM channel (angle to pulse width)
//! - Internal temperature sensor on an ADC channel

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod led;
pub mod servo;
pub mod temperature;

pub use led::Led;
pub use servo::{Servo, ServoConfig};
pub use temperature::{DeciCelsius, TemperatureConfig, TemperatureSensor};

/// Invalid driver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Minimum pulse width is not below the maximum
    InvalidPulseRange,
    /// Maximum servo angle is zero
    ZeroMaxAngle,
    /// PWM period is zero or shorter than the maximum pulse
    InvalidPeriod,
    /// Temperature sensor slope is zero
    ZeroSlope,
}
