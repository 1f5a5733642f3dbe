//! PWM output abstractions

/// A single PWM compare channel running at a fixed period
pub trait PwmChannel {
    /// Duty value corresponding to 100% (the timer's auto-reload value)
    fn max_duty(&self) -> u32;

    /// Set the compare value, in `0..=max_duty()`
    fn set_duty(&mut self, duty: u32);

    /// PWM period in microseconds
    fn period_us(&self) -> u32;

    /// Enable the channel output
    fn enable(&mut self);
}
