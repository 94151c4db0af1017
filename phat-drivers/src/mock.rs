//! Recording bus doubles shared by the driver tests

use std::cell::RefCell;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use phat_hal::{GpioBus, Level, SpiBus, SpiConfig};

/// One observable bus action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusEvent {
    Output(u8),
    Input(u8),
    Write(u8, Level),
    Release(u8),
    SpiOpen(SpiConfig),
    Spi(Vec<u8>),
    SpiClose,
}

/// Shared, ordered record of bus events
pub type Log = Rc<RefCell<Vec<BusEvent>>>;

pub fn log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

/// GPIO double; every input reads `busy`
pub struct MockGpio {
    pub log: Log,
    pub busy: Level,
    /// Pin whose claim fails
    pub fail_pin: Option<u8>,
    pub reads: usize,
}

impl MockGpio {
    pub fn new(log: &Log) -> Self {
        Self {
            log: log.clone(),
            busy: Level::Low,
            fail_pin: None,
            reads: 0,
        }
    }
}

impl GpioBus for MockGpio {
    type Error = &'static str;

    fn configure_output(&mut self, pin: u8) -> Result<(), Self::Error> {
        if self.fail_pin == Some(pin) {
            return Err("pin busy");
        }
        self.log.borrow_mut().push(BusEvent::Output(pin));
        Ok(())
    }

    fn configure_input(&mut self, pin: u8) -> Result<(), Self::Error> {
        if self.fail_pin == Some(pin) {
            return Err("pin busy");
        }
        self.log.borrow_mut().push(BusEvent::Input(pin));
        Ok(())
    }

    fn write_pin(&mut self, pin: u8, level: Level) {
        self.log.borrow_mut().push(BusEvent::Write(pin, level));
    }

    fn read_pin(&mut self, _pin: u8) -> Level {
        self.reads += 1;
        self.busy
    }

    fn release_pin(&mut self, pin: u8) {
        self.log.borrow_mut().push(BusEvent::Release(pin));
    }
}

/// SPI double recording each write as one frame
pub struct MockSpi {
    pub log: Log,
    pub fail_open: bool,
    pub fail_write: bool,
}

impl MockSpi {
    pub fn new(log: &Log) -> Self {
        Self {
            log: log.clone(),
            fail_open: false,
            fail_write: false,
        }
    }
}

impl SpiBus for MockSpi {
    type Error = &'static str;

    fn open(&mut self, config: &SpiConfig) -> Result<(), Self::Error> {
        if self.fail_open {
            return Err("no spidev");
        }
        self.log.borrow_mut().push(BusEvent::SpiOpen(*config));
        Ok(())
    }

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        if self.fail_write {
            return Err("write failed");
        }
        self.log.borrow_mut().push(BusEvent::Spi(data.to_vec()));
        Ok(())
    }

    fn close(&mut self) {
        self.log.borrow_mut().push(BusEvent::SpiClose);
    }
}

/// Delay double that only sums the requested time
#[derive(Default)]
pub struct MockDelay {
    pub total_ns: u64,
    pub calls: usize,
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
        self.calls += 1;
    }
}

/// Reassemble bytes clocked out on `data`/`clock` lines
///
/// A bit is sampled from the data line on every rising clock edge.
pub fn clocked_bytes(events: &[BusEvent], data: u8, clock: u8) -> Vec<u8> {
    let mut bytes = Vec::new();
    let mut data_level = Level::Low;
    let mut clock_level = Level::Low;
    let mut current = 0u8;
    let mut bits = 0;

    for event in events {
        if let BusEvent::Write(pin, level) = *event {
            if pin == data {
                data_level = level;
            } else if pin == clock {
                if level.is_high() && clock_level.is_low() {
                    current = (current << 1) | u8::from(data_level.is_high());
                    bits += 1;
                    if bits == 8 {
                        bytes.push(current);
                        current = 0;
                        bits = 0;
                    }
                }
                clock_level = level;
            }
        }
    }

    bytes
}

/// Group SPI frames into `(command, payload)` pairs by the select line
///
/// A frame sent with `dc_pin` low starts a new command; frames sent with it
/// high are appended to the current command's payload.
pub fn transactions(events: &[BusEvent], dc_pin: u8) -> Vec<(u8, Vec<u8>)> {
    let mut out: Vec<(u8, Vec<u8>)> = Vec::new();
    let mut dc = Level::Low;

    for event in events {
        match event {
            BusEvent::Write(pin, level) if *pin == dc_pin => dc = *level,
            BusEvent::Spi(bytes) if dc.is_low() => {
                for &command in bytes {
                    out.push((command, Vec::new()));
                }
            }
            BusEvent::Spi(bytes) => {
                if let Some((_, payload)) = out.last_mut() {
                    payload.extend_from_slice(bytes);
                }
            }
            _ => {}
        }
    }

    out
}
