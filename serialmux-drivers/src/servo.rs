//! Hobby servo driver
//!
//! A standard hobby servo expects a pulse every 20 ms whose width encodes
//! the target angle: 500 µs for 0° up to 2500 µs for 180° by default.
//!
//! ```text
//!   pulse_us = min_pulse + angle * (max_pulse - min_pulse) / max_angle
//!   duty     = pulse_us * max_duty / period_us
//! ```

use serialmux_hal::pwm::PwmChannel;

use crate::ConfigError;

/// Servo pulse calibration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ServoConfig {
    /// Pulse width at 0°
    pub min_pulse_us: u32,
    /// Pulse width at `max_angle`
    pub max_pulse_us: u32,
    /// Largest accepted angle; larger requests are clamped
    pub max_angle: u16,
}

impl Default for ServoConfig {
    fn default() -> Self {
        Self {
            min_pulse_us: 500,
            max_pulse_us: 2500,
            max_angle: 180,
        }
    }
}

impl ServoConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_pulse_us >= self.max_pulse_us {
            return Err(ConfigError::InvalidPulseRange);
        }
        if self.max_angle == 0 {
            return Err(ConfigError::ZeroMaxAngle);
        }
        Ok(())
    }

    /// Pulse width for `angle`, clamped to `max_angle`
    pub fn pulse_us(&self, angle: u16) -> u32 {
        let angle = angle.min(self.max_angle) as u32;
        let span = self.max_pulse_us - self.min_pulse_us;
        self.min_pulse_us + angle * span / self.max_angle as u32
    }
}

/// Servo on one PWM channel
pub struct Servo<P> {
    pwm: P,
    config: ServoConfig,
    angle: Option<u16>,
}

impl<P: PwmChannel> Servo<P> {
    /// Validate the calibration against the channel and enable its output
    ///
    /// The servo is not moved until the first [`set_angle`](Servo::set_angle).
    pub fn new(mut pwm: P, config: ServoConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        if pwm.period_us() < config.max_pulse_us {
            return Err(ConfigError::InvalidPeriod);
        }

        pwm.enable();
        Ok(Self {
            pwm,
            config,
            angle: None,
        })
    }

    pub fn config(&self) -> &ServoConfig {
        &self.config
    }

    /// Last commanded angle, if any
    pub fn angle(&self) -> Option<u16> {
        self.angle
    }

    /// Move to `angle` degrees and return the angle actually applied
    pub fn set_angle(&mut self, angle: u16) -> u16 {
        let angle = angle.min(self.config.max_angle);
        let pulse = self.config.pulse_us(angle);
        // 32-bit timers can have a large max_duty, keep the product in u64
        let duty = pulse as u64 * self.pwm.max_duty() as u64 / self.pwm.period_us() as u64;

        self.pwm.set_duty(duty as u32);
        self.angle = Some(angle);
        angle
    }
}
