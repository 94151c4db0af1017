//! SPI bus abstractions
//!
//! Provides the SPI master operations the panel driver needs. Chip select is
//! owned by the bus implementation (hardware CE lines on the host SPI block).

/// SPI bus master
pub trait SpiBus {
    /// Error type for SPI operations
    type Error: core::fmt::Debug;

    /// Claim the bus and apply `config`
    fn open(&mut self, config: &SpiConfig) -> Result<(), Self::Error>;

    /// Write data without reading
    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Transfer data in place
    ///
    /// Writes data from buffer while reading into the same buffer. Buses
    /// with no MISO line keep the default, which only writes and leaves the
    /// buffer untouched.
    fn transfer_in_place(&mut self, data: &mut [u8]) -> Result<(), Self::Error> {
        self.write(data)
    }

    /// Release the bus
    fn close(&mut self) {}
}

impl<T: SpiBus + ?Sized> SpiBus for &mut T {
    type Error = T::Error;

    fn open(&mut self, config: &SpiConfig) -> Result<(), Self::Error> {
        T::open(self, config)
    }

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        T::write(self, data)
    }

    fn transfer_in_place(&mut self, data: &mut [u8]) -> Result<(), Self::Error> {
        T::transfer_in_place(self, data)
    }

    fn close(&mut self) {
        T::close(self);
    }
}

/// SPI configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpiConfig {
    /// Hardware chip-select channel (CE0 = 0, CE1 = 1)
    pub channel: u8,
    /// Clock frequency in Hz
    pub frequency: u32,
    /// Clock polarity and phase
    pub mode: Mode,
}

impl Default for SpiConfig {
    fn default() -> Self {
        Self {
            channel: 0,
            frequency: 488_000,
            mode: Mode::Mode0,
        }
    }
}

/// SPI mode (combined polarity and phase)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mode {
    /// Mode 0: CPOL=0, CPHA=0
    #[default]
    Mode0,
    /// Mode 1: CPOL=0, CPHA=1
    Mode1,
    /// Mode 2: CPOL=1, CPHA=0
    Mode2,
    /// Mode 3: CPOL=1, CPHA=1
    Mode3,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_panel_bus() {
        let config = SpiConfig::default();
        assert_eq!(config.channel, 0);
        assert_eq!(config.frequency, 488_000);
        assert_eq!(config.mode, Mode::Mode0);
    }

    /// Write-only bus that keeps every frame
    #[derive(Default)]
    struct WriteOnly {
        opened: Option<SpiConfig>,
        frames: usize,
        last: [u8; 4],
    }

    impl SpiBus for WriteOnly {
        type Error = ();

        fn open(&mut self, config: &SpiConfig) -> Result<(), ()> {
            self.opened = Some(*config);
            Ok(())
        }

        fn write(&mut self, data: &[u8]) -> Result<(), ()> {
            self.frames += 1;
            self.last[..data.len()].copy_from_slice(data);
            Ok(())
        }
    }

    #[test]
    fn test_default_transfer_writes_through() {
        let mut bus = WriteOnly::default();
        let mut buf = [0x12, 0x34];
        bus.transfer_in_place(&mut buf).unwrap();

        assert_eq!(bus.frames, 1);
        assert_eq!(&bus.last[..2], &[0x12, 0x34]);
        assert_eq!(buf, [0x12, 0x34]);
    }

    #[test]
    fn test_mut_ref_forwards() {
        fn open_and_send<S: SpiBus>(mut bus: S) -> Result<(), S::Error> {
            bus.open(&SpiConfig::default())?;
            bus.write(&[0xAA])?;
            bus.close();
            Ok(())
        }

        let mut bus = WriteOnly::default();
        open_and_send(&mut bus).unwrap();
        assert_eq!(bus.opened, Some(SpiConfig::default()));
        assert_eq!(bus.last[0], 0xAA);
    }
}
