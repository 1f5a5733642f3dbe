//! ADC abstractions

/// A single ADC input that can be sampled on demand
pub trait AdcChannel {
    /// Error type for conversions
    type Error;

    /// Perform one conversion and return the raw result
    fn read_raw(&mut self) -> Result<u16, Self::Error>;

    /// Full-scale raw value (4095 for a 12-bit converter)
    fn full_scale(&self) -> u16 {
        4095
    }
}
