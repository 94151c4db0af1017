//! Inky pHAT tri-colour e-paper driver (v2 controller)
//!
//! The panel is an SSD16xx-family controller behind SPI with three extra
//! lines: command/data select, reset and busy.
//!
//! # Refresh sequence
//!
//! Every [`InkyPhat::update`] performs a full cycle:
//!
//! ```text
//! hardware reset ─► soft reset ─► wait busy
//!   ─► init sequence (analog/digital blocks, gate setup, data entry)
//!   ─► RAM window, voltages, border, waveform LUT
//!   ─► black plane ─► red plane
//!   ─► update control + master activate ─► wait busy
//! ```
//!
//! The busy line is high while the controller is working. Waits are
//! bounded by [`PanelConfig::busy_timeout_ms`].

pub mod cmd;
pub mod interface;
pub mod lut;

pub use interface::PanelInterface;

use embedded_hal::delay::DelayNs;
use log::{debug, info, warn};
use phat_core::config::PanelConfig;
use phat_core::error::Error;
use phat_core::frame::{BitPlanes, FrameBuffer};
use phat_core::state::{PanelEvent, PanelState};
use phat_hal::{GpioBus, Level, Mode, SpiBus, SpiConfig};

use cmd::{Cmd, Flag};

/// Reset pulse half-period
const RESET_HOLD_US: u32 = 100;
/// Settle time after master activation before polling busy
const ACTIVATE_SETTLE_US: u32 = 50;

/// Controller revision, read from the busy line straight after reset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Revision {
    /// Busy high after reset
    V1,
    /// Busy low after reset
    V2,
}

/// Steps of the controller init sequence
#[derive(Clone, Copy, Debug)]
pub enum InitStep {
    /// Command with a static payload
    CmdData(u8, &'static [u8]),
    /// DRIVER_OUTPUT_CTRL with `[height-1 lo, height-1 hi, 0x00]`
    DriverControl,
}

/// Sent after every reset, in order
pub const INIT_SEQUENCE: &[InitStep] = &[
    InitStep::CmdData(Cmd::ANALOG_BLOCK_CTRL, &[Flag::ANALOG_BLOCK]),
    InitStep::CmdData(Cmd::DIGITAL_BLOCK_CTRL, &[Flag::DIGITAL_BLOCK]),
    InitStep::DriverControl,
    InitStep::CmdData(Cmd::DUMMY_LINE_PERIOD, &[Flag::DUMMY_LINE_PERIOD]),
    InitStep::CmdData(Cmd::GATE_LINE_WIDTH, &[Flag::GATE_LINE_WIDTH]),
    InitStep::CmdData(Cmd::DATA_ENTRY_MODE, &[Flag::DATA_ENTRY_INCRY_INCRX]),
];

/// Inky pHAT handle
///
/// Owns the GPIO and SPI buses. Frames go out with [`update`](Self::update)
/// or [`draw`](Self::draw); both block until the refresh finishes.
pub struct InkyPhat<G, S> {
    interface: PanelInterface<G, S>,
    config: PanelConfig,
    state: PanelState,
    revision: Option<Revision>,
}

impl<G: GpioBus, S: SpiBus> InkyPhat<G, S> {
    /// Create an uninitialized panel; no bus activity
    pub fn new(gpio: G, spi: S, config: PanelConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            interface: PanelInterface::new(gpio, spi, config.command_pin),
            config,
            state: PanelState::Uninitialized,
            revision: None,
        })
    }

    /// Default Inky pHAT wiring
    pub fn inky_phat(gpio: G, spi: S) -> Result<Self, Error> {
        Self::new(gpio, spi, PanelConfig::inky_phat())
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    /// Controller revision, known after `init`
    pub fn revision(&self) -> Option<Revision> {
        self.revision
    }

    /// Give both buses back
    pub fn release(self) -> (G, S) {
        self.interface.release()
    }

    fn spi_config(&self) -> SpiConfig {
        SpiConfig {
            channel: self.config.spi_channel,
            frequency: self.config.spi_frequency,
            mode: Mode::Mode0,
        }
    }

    /// Claim the lines and the SPI bus
    ///
    /// On failure every line claimed so far is handed back.
    fn claim(&mut self) -> Result<(), Error> {
        let mut claimed: heapless::Vec<u8, 3> = heapless::Vec::new();
        let result = self.claim_into(&mut claimed);
        if result.is_err() {
            for &pin in claimed.iter() {
                self.interface.gpio_mut().release_pin(pin);
            }
        }
        result
    }

    fn claim_into(&mut self, claimed: &mut heapless::Vec<u8, 3>) -> Result<(), Error> {
        let PanelConfig {
            command_pin,
            reset_pin,
            busy_pin,
            ..
        } = self.config;
        let spi_config = self.spi_config();
        let gpio = self.interface.gpio_mut();

        for (pin, level) in [(command_pin, Level::Low), (reset_pin, Level::High)] {
            gpio.configure_output(pin).map_err(|e| {
                warn!("inky: cannot claim output pin {}: {:?}", pin, e);
                Error::BusAcquisition
            })?;
            let _ = claimed.push(pin);
            gpio.write_pin(pin, level);
        }

        gpio.configure_input(busy_pin).map_err(|e| {
            warn!("inky: cannot claim busy pin {}: {:?}", busy_pin, e);
            Error::BusAcquisition
        })?;
        let _ = claimed.push(busy_pin);

        self.interface.spi_mut().open(&spi_config).map_err(|e| {
            warn!("inky: cannot open spi channel {}: {:?}", spi_config.channel, e);
            Error::BusAcquisition
        })
    }

    /// Claim the buses, pulse reset and detect the controller revision
    ///
    /// Also wakes a panel out of deep sleep.
    pub fn init(&mut self, delay: &mut impl DelayNs) -> Result<(), Error> {
        self.state.require_not_ready()?;
        self.claim()?;

        self.pulse_reset(delay);
        let busy = self.interface.gpio_mut().read_pin(self.config.busy_pin);
        let revision = if busy.is_high() {
            Revision::V1
        } else {
            Revision::V2
        };
        self.revision = Some(revision);

        self.state = self.state.transition(PanelEvent::InitComplete);
        info!("inky: {:?} controller, {}x{}", revision, self.config.width, self.config.height);
        Ok(())
    }

    fn pulse_reset(&mut self, delay: &mut impl DelayNs) {
        let gpio = self.interface.gpio_mut();
        gpio.set_low(self.config.reset_pin);
        delay.delay_us(RESET_HOLD_US);
        gpio.set_high(self.config.reset_pin);
        delay.delay_us(RESET_HOLD_US);
    }

    /// Hardware reset, soft reset, wait for the controller
    pub fn reset(&mut self, delay: &mut impl DelayNs) -> Result<(), Error> {
        self.state.require_ready()?;
        self.pulse_reset(delay);
        self.interface.send_command(Cmd::SW_RESET)?;
        self.wait_idle(delay)
    }

    /// Write the fixed controller setup
    pub fn init_sequence(&mut self) -> Result<(), Error> {
        self.state.require_ready()?;
        for step in INIT_SEQUENCE {
            match *step {
                InitStep::CmdData(command, data) => {
                    self.interface.send_command_data(command, data)?;
                }
                InitStep::DriverControl => {
                    let [lo, hi] = self.config.y_end();
                    self.interface
                        .send_command_data(Cmd::DRIVER_OUTPUT_CTRL, &[lo, hi, 0x00])?;
                }
            }
        }
        Ok(())
    }

    /// Block until the busy line drops
    ///
    /// Fails with [`Error::TimedOut`] once `busy_timeout_ms` has passed.
    pub fn busy_wait(&mut self, delay: &mut impl DelayNs) -> Result<(), Error> {
        self.state.require_ready()?;
        self.wait_idle(delay)
    }

    fn wait_idle(&mut self, delay: &mut impl DelayNs) -> Result<(), Error> {
        let busy_pin = self.config.busy_pin;
        let timeout_us = u64::from(self.config.busy_timeout_ms) * 1000;
        let poll_us = self.config.busy_poll_us;
        let mut waited_us = 0u64;

        loop {
            if self.interface.gpio_mut().read_pin(busy_pin) == Level::Low {
                return Ok(());
            }
            if waited_us >= timeout_us {
                warn!("inky: busy line stuck high for {} ms", self.config.busy_timeout_ms);
                return Err(Error::TimedOut);
            }
            delay.delay_us(poll_us);
            waited_us += u64::from(poll_us);
        }
    }

    /// Point the RAM window and counters at the whole panel
    fn set_ram_window(&mut self) -> Result<(), Error> {
        let [y_lo, y_hi] = self.config.y_end();
        self.interface
            .send_command_data(Cmd::SET_RAMXPOS, &[0x00, self.config.x_end()])?;
        self.interface
            .send_command_data(Cmd::SET_RAMYPOS, &[0x00, 0x00, y_lo, y_hi])?;
        self.interface.send_command_byte(Cmd::SET_RAMX_COUNTER, 0x00)?;
        self.interface
            .send_command_data(Cmd::SET_RAMY_COUNTER, &[0x00, 0x00])
    }

    fn refresh(&mut self, planes: &BitPlanes, delay: &mut impl DelayNs) -> Result<(), Error> {
        self.reset(delay)?;
        self.init_sequence()?;

        let [y_lo, y_hi] = self.config.y_end();
        self.interface
            .send_command_data(Cmd::SET_RAMXPOS, &[0x00, self.config.x_end()])?;
        // Vendor sequence carries a fifth, ignored byte here
        self.interface
            .send_command_data(Cmd::SET_RAMYPOS, &[0x00, 0x00, y_lo, y_hi, 0x00])?;

        self.interface
            .send_command_data(Cmd::SOURCE_VOLTAGE_CTRL, &Flag::SOURCE_VOLTAGE)?;
        self.interface.send_command_byte(Cmd::WRITE_VCOM_REG, Flag::VCOM)?;

        self.interface
            .send_command_byte(Cmd::BORDER_WAVEFORM_CTRL, Flag::BORDER_WAVEFORM_DEFAULT)?;
        if let Some(border) = lut::border_waveform(self.config.border) {
            self.interface
                .send_command_byte(Cmd::BORDER_WAVEFORM_CTRL, border)?;
        }

        self.interface.send_command_data(Cmd::WRITE_LUT_REG, &lut::LUT)?;

        self.set_ram_window()?;
        self.interface
            .send_command_data(Cmd::WRITE_BW_DATA, planes.black())?;

        self.set_ram_window()?;
        self.interface
            .send_command_data(Cmd::WRITE_RED_DATA, planes.red())?;

        self.interface
            .send_command_byte(Cmd::DISPLAY_UPDATE_CTRL2, Flag::DISPLAY_MODE_1)?;
        self.interface.send_command(Cmd::MASTER_ACTIVATE)?;
        delay.delay_us(ACTIVATE_SETTLE_US);
        self.wait_idle(delay)
    }

    /// Push `frame` to the panel and wait for the refresh to finish
    pub fn update(&mut self, frame: &FrameBuffer, delay: &mut impl DelayNs) -> Result<(), Error> {
        self.state.require_ready()?;
        if frame.width() != self.config.width || frame.height() != self.config.height {
            return Err(Error::InvalidValue);
        }

        let planes = BitPlanes::pack(frame);
        debug!("inky: refresh, {} bytes per plane", planes.len());

        self.state = self.state.transition(PanelEvent::UpdateStarted);
        let result = self.refresh(&planes, delay);
        let event = match result {
            Ok(()) => PanelEvent::UpdateFinished,
            Err(_) => PanelEvent::UpdateFailed,
        };
        self.state = self.state.transition(event);
        result
    }

    /// Validate row-major cell values (0 white, 1 black, 2 red) and push them
    ///
    /// Nothing reaches the bus unless all `width * height` values are valid.
    pub fn draw(&mut self, values: &[u8], delay: &mut impl DelayNs) -> Result<(), Error> {
        self.state.require_ready()?;
        let frame = FrameBuffer::from_values(self.config.width, self.config.height, values)
            .map_err(|_| Error::InvalidValue)?;
        self.update(&frame, delay)
    }

    /// Put the controller into deep sleep and release the buses
    pub fn shutdown(&mut self) -> Result<(), Error> {
        self.state.require_ready()?;

        let result = self
            .interface
            .send_command_byte(Cmd::DEEP_SLEEP, Flag::DEEP_SLEEP_MODE_1);

        let PanelConfig {
            command_pin,
            reset_pin,
            busy_pin,
            ..
        } = self.config;
        let gpio = self.interface.gpio_mut();
        gpio.release_pin(command_pin);
        gpio.release_pin(reset_pin);
        gpio.release_pin(busy_pin);
        self.interface.spi_mut().close();

        self.state = self.state.transition(PanelEvent::Shutdown);
        debug!("inky: deep sleep");
        result
    }
}
