//! MCU internal temperature sensor
//!
//! The STM32F4 sensor is a diode whose forward voltage falls linearly with
//! temperature:
//!
//! ```text
//!   T = (Vsense - V25) / Avg_Slope + 25 °C
//! ```
//!
//! Datasheet typicals for the F411 are V25 = 0.76 V and Avg_Slope =
//! 2.5 mV/°C, accurate to about ±3 °C. VDDA is taken as nominal rather than
//! calibrated against VREFINT. All arithmetic is integer, in tenths of a
//! degree.

use core::fmt;

use serialmux_hal::adc::AdcChannel;

use crate::ConfigError;

/// Temperature in tenths of a degree Celsius
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeciCelsius(pub i32);

impl DeciCelsius {
    /// Whole degrees, truncated toward zero
    pub fn degrees(self) -> i32 {
        self.0 / 10
    }
}

/// Formats as `31.5` / `-0.5`
impl fmt::Display for DeciCelsius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{}", sign, abs / 10, abs % 10)
    }
}

/// Sensor calibration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TemperatureConfig {
    /// ADC reference voltage
    pub vdda_mv: u32,
    /// Sensor voltage at 25 °C
    pub v25_mv: u32,
    /// Voltage change per degree, in microvolts
    pub avg_slope_uv: u32,
}

impl Default for TemperatureConfig {
    fn default() -> Self {
        Self {
            vdda_mv: 3300,
            v25_mv: 760,
            avg_slope_uv: 2500,
        }
    }
}

impl TemperatureConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.avg_slope_uv == 0 {
            return Err(ConfigError::ZeroSlope);
        }
        Ok(())
    }

    /// Convert a raw conversion result to a temperature
    pub fn convert(&self, raw: u16, full_scale: u16) -> DeciCelsius {
        let vsense_mv = (raw as u32 * self.vdda_mv / full_scale.max(1) as u32) as i32;
        let delta_mv = vsense_mv - self.v25_mv as i32;
        DeciCelsius(delta_mv * 10_000 / self.avg_slope_uv as i32 + 250)
    }
}

/// Temperature sensor on one ADC channel
pub struct TemperatureSensor<A> {
    adc: A,
    config: TemperatureConfig,
}

impl<A: AdcChannel> TemperatureSensor<A> {
    pub fn new(adc: A, config: TemperatureConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { adc, config })
    }

    pub fn config(&self) -> &TemperatureConfig {
        &self.config
    }

    /// Perform one conversion
    pub fn read(&mut self) -> Result<DeciCelsius, A::Error> {
        let raw = self.adc.read_raw()?;
        Ok(self.config.convert(raw, self.adc.full_scale()))
    }
}
