//! Hardware configuration types
//!
//! Pin assignments use BCM numbering. Defaults match the Blinkt and
//! Inky pHAT boards on a 40-pin Raspberry Pi header.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::frame::{row_stride, MAX_FRAME_CELLS, MAX_PLANE_LEN, PANEL_HEIGHT, PANEL_WIDTH};
use crate::pixel::{DEFAULT_BRIGHTNESS, MAX_STRIP_LEN};

/// LED strip data line (BCM)
pub const STRIP_DATA_PIN: u8 = 23;
/// LED strip clock line (BCM)
pub const STRIP_CLOCK_PIN: u8 = 24;
/// LEDs on a Blinkt board
pub const STRIP_LEN: usize = 8;

/// Panel reset line (BCM)
pub const PANEL_RESET_PIN: u8 = 27;
/// Panel busy line (BCM)
pub const PANEL_BUSY_PIN: u8 = 17;
/// Panel command/data select line (BCM)
pub const PANEL_COMMAND_PIN: u8 = 22;
/// Panel chip select line (BCM), driven by the SPI block as CE0
pub const PANEL_CHIP_SELECT_PIN: u8 = 8;
/// SPI chip-select channel the panel sits on
pub const PANEL_SPI_CHANNEL: u8 = 0;
/// SPI clock for the panel
pub const PANEL_SPI_HZ: u32 = 488_000;

/// Upper bound on a single busy wait
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 30_000;
/// Sleep between busy line samples
pub const DEFAULT_BUSY_POLL_US: u32 = 100;

/// Widest row the one-byte RAM X window can address, in bytes
pub const MAX_RAM_X_BYTES: usize = 256;

/// APA102 strip wiring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StripConfig {
    /// Data (MOSI) pin
    pub data_pin: u8,
    /// Clock (SCLK) pin
    pub clock_pin: u8,
    /// Number of LEDs on the strip
    pub length: usize,
    /// Brightness written by clear operations
    pub default_brightness: u8,
}

impl Default for StripConfig {
    fn default() -> Self {
        Self::blinkt()
    }
}

impl StripConfig {
    /// Eight-LED Blinkt board
    pub const fn blinkt() -> Self {
        Self {
            data_pin: STRIP_DATA_PIN,
            clock_pin: STRIP_CLOCK_PIN,
            length: STRIP_LEN,
            default_brightness: DEFAULT_BRIGHTNESS,
        }
    }

    /// Same wiring with a different strip length
    pub const fn with_length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }

    /// Check the config can be driven
    pub fn validate(&self) -> Result<(), Error> {
        if self.length > MAX_STRIP_LEN {
            return Err(Error::OutOfRange);
        }
        if self.data_pin == self.clock_pin {
            return Err(Error::InvalidValue);
        }
        Ok(())
    }
}

/// Border waveform setting
///
/// Two-bit selector for the extra border control write issued after the
/// default border command on every refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Border {
    /// No extra write
    #[default]
    Default = 0b00,
    /// Follow LUT waveform (0x33)
    Lut = 0b01,
    /// Fixed high level (0xFF)
    High = 0b10,
    /// Fixed low level (0x00)
    Low = 0b11,
}

impl Border {
    /// Two-bit selector value
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Decode the low two bits of `bits`
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b01 => Border::Lut,
            0b10 => Border::High,
            0b11 => Border::Low,
            _ => Border::Default,
        }
    }
}

/// Inky pHAT wiring and panel geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PanelConfig {
    pub reset_pin: u8,
    pub busy_pin: u8,
    /// Command/data select; low for command bytes
    pub command_pin: u8,
    /// Chip-select line; informational, CE is driven by the SPI block
    pub chip_select_pin: u8,
    pub spi_channel: u8,
    pub spi_frequency: u32,
    /// Columns (short edge)
    pub width: usize,
    /// Rows (long edge)
    pub height: usize,
    pub border: Border,
    /// Give up on the busy line after this long
    pub busy_timeout_ms: u32,
    /// Sleep between busy samples
    pub busy_poll_us: u32,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self::inky_phat()
    }
}

impl PanelConfig {
    /// 212×104 Inky pHAT (v2 controller)
    pub const fn inky_phat() -> Self {
        Self {
            reset_pin: PANEL_RESET_PIN,
            busy_pin: PANEL_BUSY_PIN,
            command_pin: PANEL_COMMAND_PIN,
            chip_select_pin: PANEL_CHIP_SELECT_PIN,
            spi_channel: PANEL_SPI_CHANNEL,
            spi_frequency: PANEL_SPI_HZ,
            width: PANEL_WIDTH,
            height: PANEL_HEIGHT,
            border: Border::Default,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            busy_poll_us: DEFAULT_BUSY_POLL_US,
        }
    }

    pub const fn with_border(mut self, border: Border) -> Self {
        self.border = border;
        self
    }

    /// Override the busy-wait bound
    pub const fn with_busy_timeout(mut self, timeout_ms: u32, poll_us: u32) -> Self {
        self.busy_timeout_ms = timeout_ms;
        self.busy_poll_us = poll_us;
        self
    }

    /// Last RAM X address, in bytes
    ///
    /// Only meaningful for a config that passed [`validate`](Self::validate).
    pub const fn x_end(&self) -> u8 {
        row_stride(self.width).saturating_sub(1) as u8
    }

    /// Last RAM Y address, little-endian
    pub const fn y_end(&self) -> [u8; 2] {
        let last = self.height.saturating_sub(1) as u16;
        last.to_le_bytes()
    }

    /// Check the config can be driven
    pub fn validate(&self) -> Result<(), Error> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidValue);
        }
        let stride = row_stride(self.width);
        if stride > MAX_RAM_X_BYTES {
            return Err(Error::OutOfRange);
        }
        let plane = stride.checked_mul(self.height).ok_or(Error::OutOfRange)?;
        let cells = self.width.checked_mul(self.height).ok_or(Error::OutOfRange)?;
        if plane > MAX_PLANE_LEN || cells > MAX_FRAME_CELLS {
            return Err(Error::OutOfRange);
        }
        let pins = [self.reset_pin, self.busy_pin, self.command_pin];
        if pins[0] == pins[1] || pins[0] == pins[2] || pins[1] == pins[2] {
            return Err(Error::InvalidValue);
        }
        if self.busy_poll_us == 0 {
            return Err(Error::InvalidValue);
        }
        Ok(())
    }
}
