//! GPIO bus abstraction
//!
//! Pins are addressed by number (BCM numbering on the boards this targets)
//! rather than by typed pin objects, because the drivers receive their pin
//! assignments from runtime configuration.

/// Logic level of a digital line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Level {
    /// Logic 0
    #[default]
    Low,
    /// Logic 1
    High,
}

impl Level {
    /// Check if this is the high level
    pub const fn is_high(self) -> bool {
        matches!(self, Level::High)
    }

    /// Check if this is the low level
    pub const fn is_low(self) -> bool {
        matches!(self, Level::Low)
    }
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

impl From<Level> for bool {
    fn from(level: Level) -> Self {
        level.is_high()
    }
}

impl core::ops::Not for Level {
    type Output = Level;

    fn not(self) -> Self::Output {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }
}

/// Pin-numbered GPIO access
///
/// Claiming a pin (`configure_*`) is the only fallible step: once a line is
/// configured, reads and writes are assumed to succeed, as on memory-mapped
/// GPIO blocks.
pub trait GpioBus {
    /// Error type for pin acquisition
    type Error: core::fmt::Debug;

    /// Claim `pin` and configure it as a push-pull output
    fn configure_output(&mut self, pin: u8) -> Result<(), Self::Error>;

    /// Claim `pin` and configure it as a floating input
    fn configure_input(&mut self, pin: u8) -> Result<(), Self::Error>;

    /// Drive an output pin
    fn write_pin(&mut self, pin: u8, level: Level);

    /// Sample an input pin
    fn read_pin(&mut self, pin: u8) -> Level;

    /// Hand a previously claimed pin back to the system
    fn release_pin(&mut self, _pin: u8) {}

    /// Drive an output pin high
    fn set_high(&mut self, pin: u8) {
        self.write_pin(pin, Level::High);
    }

    /// Drive an output pin low
    fn set_low(&mut self, pin: u8) {
        self.write_pin(pin, Level::Low);
    }
}

impl<T: GpioBus + ?Sized> GpioBus for &mut T {
    type Error = T::Error;

    fn configure_output(&mut self, pin: u8) -> Result<(), Self::Error> {
        T::configure_output(self, pin)
    }

    fn configure_input(&mut self, pin: u8) -> Result<(), Self::Error> {
        T::configure_input(self, pin)
    }

    fn write_pin(&mut self, pin: u8, level: Level) {
        T::write_pin(self, pin, level);
    }

    fn read_pin(&mut self, pin: u8) -> Level {
        T::read_pin(self, pin)
    }

    fn release_pin(&mut self, pin: u8) {
        T::release_pin(self, pin);
    }
}
