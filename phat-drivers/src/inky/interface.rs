//! Command/data framing over SPI
//!
//! The controller tells command bytes from payload by the level of a
//! separate select line: low while the command byte is clocked in, high
//! for everything after it.

use log::warn;
use phat_core::error::Error;
use phat_hal::{GpioBus, Level, SpiBus};

/// Select-line level for command bytes
pub const COMMAND_LEVEL: Level = Level::Low;
/// Select-line level for payload bytes
pub const DATA_LEVEL: Level = Level::High;

/// SPI bus plus the command/data select line
pub struct PanelInterface<G, S> {
    gpio: G,
    spi: S,
    command_pin: u8,
}

impl<G: GpioBus, S: SpiBus> PanelInterface<G, S> {
    pub fn new(gpio: G, spi: S, command_pin: u8) -> Self {
        Self {
            gpio,
            spi,
            command_pin,
        }
    }

    pub fn gpio_mut(&mut self) -> &mut G {
        &mut self.gpio
    }

    pub fn spi_mut(&mut self) -> &mut S {
        &mut self.spi
    }

    /// Hand both buses back
    pub fn release(self) -> (G, S) {
        (self.gpio, self.spi)
    }

    fn spi_write(&mut self, level: Level, data: &[u8]) -> Result<(), Error> {
        self.gpio.write_pin(self.command_pin, level);
        self.spi.write(data).map_err(|e| {
            warn!("inky: spi write of {} bytes failed: {:?}", data.len(), e);
            Error::BusTransfer
        })
    }

    /// Bare command byte
    pub fn send_command(&mut self, command: u8) -> Result<(), Error> {
        self.spi_write(COMMAND_LEVEL, &[command])
    }

    /// Command with a one-byte argument
    pub fn send_command_byte(&mut self, command: u8, data: u8) -> Result<(), Error> {
        self.send_command_data(command, &[data])
    }

    /// Command followed by its payload
    pub fn send_command_data(&mut self, command: u8, data: &[u8]) -> Result<(), Error> {
        self.send_command(command)?;
        if data.is_empty() {
            return Ok(());
        }
        self.send_data(data)
    }

    /// Payload bytes for the last command
    pub fn send_data(&mut self, data: &[u8]) -> Result<(), Error> {
        self.spi_write(DATA_LEVEL, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{self, BusEvent, MockGpio, MockSpi};
    use std::vec;

    fn interface() -> (PanelInterface<MockGpio, MockSpi>, mock::Log) {
        let log = mock::log();
        let iface = PanelInterface::new(MockGpio::new(&log), MockSpi::new(&log), 22);
        (iface, log)
    }

    #[test]
    fn test_command_framing() {
        let (mut iface, log) = interface();
        iface.send_command_data(0x45, &[0, 0, 0xD3, 0]).unwrap();

        assert_eq!(
            *log.borrow(),
            [
                BusEvent::Write(22, Level::Low),
                BusEvent::Spi(vec![0x45]),
                BusEvent::Write(22, Level::High),
                BusEvent::Spi(vec![0x00, 0x00, 0xD3, 0x00]),
            ]
        );
    }

    #[test]
    fn test_bare_command() {
        let (mut iface, log) = interface();
        iface.send_command(0x20).unwrap();
        iface.send_command_data(0x21, &[]).unwrap();

        assert_eq!(
            *log.borrow(),
            [
                BusEvent::Write(22, Level::Low),
                BusEvent::Spi(vec![0x20]),
                BusEvent::Write(22, Level::Low),
                BusEvent::Spi(vec![0x21]),
            ]
        );
    }

    #[test]
    fn test_command_byte() {
        let (mut iface, log) = interface();
        iface.send_command_byte(0x22, 0xC7).unwrap();
        assert_eq!(log.borrow()[3], BusEvent::Spi(vec![0xC7]));
    }

    #[test]
    fn test_write_failure_is_bus_transfer() {
        let (mut iface, _log) = interface();
        iface.spi_mut().fail_write = true;
        assert_eq!(iface.send_command(0x12), Err(Error::BusTransfer));
        assert_eq!(iface.send_data(&[1, 2]), Err(Error::BusTransfer));
    }
}
