//! GPIO output abstractions

use core::ops::Not;

/// Electrical level of a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Low,
    High,
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

impl Not for Level {
    type Output = Level;

    fn not(self) -> Level {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }
}

/// Push-pull output whose driven level can be read back
pub trait OutputPin {
    /// Drive the pin
    fn set_level(&mut self, level: Level);

    /// Level last driven
    fn level(&self) -> Level;

    /// Invert the driven level
    fn toggle(&mut self) {
        let level = !self.level();
        self.set_level(level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pin(Level);

    impl OutputPin for Pin {
        fn set_level(&mut self, level: Level) {
            self.0 = level;
        }

        fn level(&self) -> Level {
            self.0
        }
    }

    #[test]
    fn test_toggle_inverts_level() {
        let mut pin = Pin(Level::Low);
        pin.toggle();
        assert_eq!(pin.level(), Level::High);
        pin.toggle();
        assert_eq!(pin.level(), Level::Low);
    }

    #[test]
    fn test_level_from_bool() {
        assert_eq!(Level::from(true), Level::High);
        assert_eq!(Level::from(false), Level::Low);
        assert_eq!(!Level::High, Level::Low);
    }
}
