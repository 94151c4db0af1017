//! APA102 LED strip driver (Blinkt)
//!
//! The strip is a shift register clocked by software over two GPIO lines.
//!
//! # Wire format
//!
//! ```text
//! start frame   4 × 0x00
//! LED frame     0b111b_bbbb  blue  green  red     (one per LED, index 0 first)
//! end frame     (N / 2 + 1) × 0x00
//! ```
//!
//! The top three bits of the first LED byte are always set; the low bits
//! carry the 3-bit brightness. Bytes go out MSB first: set the data line,
//! raise the clock, drop the clock. The strip has no timing requirements
//! beyond that.

mod effects;

use log::{debug, info, warn};
use phat_core::config::StripConfig;
use phat_core::error::Error;
use phat_core::pixel::{Pixel, PixelBuffer};
use phat_core::state::{StripEvent, StripState};
use phat_hal::{GpioBus, Level};

/// Leading zero bytes
pub const START_FRAME_LEN: usize = 4;

/// Marker bits set on the first byte of every LED frame
pub const LED_FRAME_MARKER: u8 = 0b1110_0000;

/// Trailing zero bytes for a strip of `leds`
pub const fn end_frame_len(leds: usize) -> usize {
    leds / 2 + 1
}

/// Total bytes clocked out for a strip of `leds`
pub const fn stream_len(leds: usize) -> usize {
    START_FRAME_LEN + 4 * leds + end_frame_len(leds)
}

/// Four-byte frame for one LED
pub const fn led_frame(pixel: Pixel) -> [u8; 4] {
    [
        LED_FRAME_MARKER | pixel.brightness(),
        pixel.blue(),
        pixel.green(),
        pixel.red(),
    ]
}

/// Full byte stream for one refresh of `pixels`
pub fn encode(pixels: &PixelBuffer) -> impl Iterator<Item = u8> + '_ {
    let start = core::iter::repeat(0u8).take(START_FRAME_LEN);
    let body = pixels.iter().flat_map(led_frame);
    let end = core::iter::repeat(0u8).take(end_frame_len(pixels.len()));
    start.chain(body).chain(end)
}

/// Clock one byte out, MSB first
pub fn write_byte<G: GpioBus>(gpio: &mut G, data_pin: u8, clock_pin: u8, byte: u8) {
    for bit in (0..8).rev() {
        gpio.write_pin(data_pin, Level::from(byte & (1 << bit) != 0));
        gpio.set_high(clock_pin);
        gpio.set_low(clock_pin);
    }
}

/// Blinkt-style LED strip handle
///
/// Owns the GPIO bus. Every operation other than [`init`](Self::init)
/// requires an initialized strip.
pub struct LedStrip<G> {
    gpio: G,
    config: StripConfig,
    pixels: PixelBuffer,
    state: StripState,
}

impl<G: GpioBus> LedStrip<G> {
    /// Create an uninitialized strip; no bus activity
    pub fn new(gpio: G, config: StripConfig) -> Result<Self, Error> {
        config.validate()?;
        let mut pixels = PixelBuffer::new(config.length)?;
        pixels.fill(Pixel::new(0, 0, 0, config.default_brightness));
        Ok(Self {
            gpio,
            config,
            pixels,
            state: StripState::Uninitialized,
        })
    }

    /// Eight LEDs on the default Blinkt pins
    pub fn blinkt(gpio: G) -> Result<Self, Error> {
        Self::new(gpio, StripConfig::blinkt())
    }

    pub fn config(&self) -> &StripConfig {
        &self.config
    }

    pub fn state(&self) -> StripState {
        self.state
    }

    /// Staged pixel values
    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Give the bus back
    pub fn release(self) -> G {
        self.gpio
    }

    fn off(&self) -> Pixel {
        Pixel::new(0, 0, 0, self.config.default_brightness)
    }

    /// Claim both lines, blank the strip
    pub fn init(&mut self) -> Result<(), Error> {
        self.state.require_uninitialized()?;

        let StripConfig {
            data_pin,
            clock_pin,
            ..
        } = self.config;

        self.gpio.configure_output(data_pin).map_err(|e| {
            warn!("apa102: cannot claim data pin {}: {:?}", data_pin, e);
            Error::BusAcquisition
        })?;
        if let Err(e) = self.gpio.configure_output(clock_pin) {
            warn!("apa102: cannot claim clock pin {}: {:?}", clock_pin, e);
            self.gpio.release_pin(data_pin);
            return Err(Error::BusAcquisition);
        }

        self.gpio.set_low(data_pin);
        self.gpio.set_low(clock_pin);

        let off = self.off();
        self.pixels.fill(off);
        self.show();

        self.state = self.state.transition(StripEvent::InitComplete);
        info!("apa102: {} LEDs on data {} clock {}", self.len(), data_pin, clock_pin);
        Ok(())
    }

    /// Clock the staged pixels out to the strip
    fn show(&mut self) {
        let StripConfig {
            data_pin,
            clock_pin,
            ..
        } = self.config;
        for byte in encode(&self.pixels) {
            write_byte(&mut self.gpio, data_pin, clock_pin, byte);
        }
    }

    /// Set every pixel and transmit
    pub fn set_all(&mut self, r: u8, g: u8, b: u8, brightness: u8) -> Result<(), Error> {
        self.set_all_staged(r, g, b, brightness)?;
        self.show();
        Ok(())
    }

    /// Set one pixel and transmit
    pub fn set_one(
        &mut self,
        index: usize,
        r: u8,
        g: u8,
        b: u8,
        brightness: u8,
    ) -> Result<(), Error> {
        self.set_one_staged(index, r, g, b, brightness)?;
        self.show();
        Ok(())
    }

    /// Turn every pixel off and transmit
    pub fn clear_all(&mut self) -> Result<(), Error> {
        self.state.require_initialized()?;
        let off = self.off();
        self.pixels.fill(off);
        self.show();
        Ok(())
    }

    /// Turn one pixel off and transmit
    pub fn clear_one(&mut self, index: usize) -> Result<(), Error> {
        self.state.require_initialized()?;
        let off = self.off();
        self.pixels.set(index, off)?;
        self.show();
        Ok(())
    }

    /// Stage every pixel without transmitting
    pub fn set_all_staged(&mut self, r: u8, g: u8, b: u8, brightness: u8) -> Result<(), Error> {
        self.state.require_initialized()?;
        self.pixels.fill(Pixel::new(r, g, b, brightness));
        Ok(())
    }

    /// Stage one pixel without transmitting
    pub fn set_one_staged(
        &mut self,
        index: usize,
        r: u8,
        g: u8,
        b: u8,
        brightness: u8,
    ) -> Result<(), Error> {
        self.state.require_initialized()?;
        self.pixels.set_color_and_brightness(index, r, g, b, brightness)
    }

    /// Transmit whatever is staged
    pub fn update(&mut self) -> Result<(), Error> {
        self.state.require_initialized()?;
        self.show();
        Ok(())
    }

    /// Blank the strip and release both lines
    pub fn shutdown(&mut self) -> Result<(), Error> {
        self.state.require_initialized()?;

        let off = self.off();
        self.pixels.fill(off);
        self.show();

        self.gpio.release_pin(self.config.data_pin);
        self.gpio.release_pin(self.config.clock_pin);
        self.state = self.state.transition(StripEvent::Shutdown);
        debug!("apa102: shut down");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{self, clocked_bytes, BusEvent, MockGpio};
    use proptest::prelude::*;
    use std::vec::Vec;

    fn strip() -> (LedStrip<MockGpio>, mock::Log) {
        let log = mock::log();
        let strip = LedStrip::blinkt(MockGpio::new(&log)).unwrap();
        (strip, log)
    }

    fn sent(log: &mock::Log) -> Vec<u8> {
        clocked_bytes(&log.borrow(), 23, 24)
    }

    #[test]
    fn test_stream_len() {
        assert_eq!(stream_len(8), 4 + 32 + 5);
        assert_eq!(stream_len(1), 4 + 4 + 1);
        assert_eq!(stream_len(0), 5);
    }

    #[test]
    fn test_write_byte_msb_first() {
        let log = mock::log();
        let mut gpio = MockGpio::new(&log);
        write_byte(&mut gpio, 1, 2, 0b1000_0001);

        let events = log.borrow();
        // data, clock high, clock low per bit
        assert_eq!(events.len(), 24);
        assert_eq!(events[0], BusEvent::Write(1, Level::High));
        assert_eq!(events[1], BusEvent::Write(2, Level::High));
        assert_eq!(events[2], BusEvent::Write(2, Level::Low));
        assert_eq!(events[3], BusEvent::Write(1, Level::Low));
        assert_eq!(events[21], BusEvent::Write(1, Level::High));
        assert_eq!(clocked_bytes(&events, 1, 2), [0b1000_0001]);
    }

    #[test]
    fn test_init_blanks_strip() {
        let (mut strip, log) = strip();
        strip.init().unwrap();
        assert_eq!(strip.state(), StripState::Initialized);

        let events = log.borrow();
        assert_eq!(events[0], BusEvent::Output(23));
        assert_eq!(events[1], BusEvent::Output(24));
        assert_eq!(events[2], BusEvent::Write(23, Level::Low));
        assert_eq!(events[3], BusEvent::Write(24, Level::Low));

        let bytes = clocked_bytes(&events, 23, 24);
        assert_eq!(bytes.len(), stream_len(8));
        for led in bytes[4..36].chunks(4) {
            assert_eq!(led, [0xE3, 0, 0, 0]);
        }
    }

    #[test]
    fn test_set_all_red() {
        let (mut strip, log) = strip();
        strip.init().unwrap();
        log.borrow_mut().clear();

        strip.set_all(255, 0, 0, 3).unwrap();
        strip.update().unwrap();

        let bytes = sent(&log);
        assert_eq!(bytes.len(), 2 * stream_len(8));
        let (first, second) = bytes.split_at(stream_len(8));
        assert_eq!(first, second);

        assert_eq!(&first[..4], &[0, 0, 0, 0]);
        for led in first[4..36].chunks(4) {
            assert_eq!(led, [0xE3, 0x00, 0x00, 0xFF]);
        }
        assert!(first[36..].iter().all(|&b| b == 0));
        assert_eq!(first[36..].len(), 5);
    }

    #[test]
    fn test_operations_before_init() {
        let (mut strip, log) = strip();

        assert_eq!(strip.set_all(1, 2, 3, 4), Err(Error::NotInitialized));
        assert_eq!(strip.set_one(0, 1, 2, 3, 4), Err(Error::NotInitialized));
        assert_eq!(strip.clear_all(), Err(Error::NotInitialized));
        assert_eq!(strip.clear_one(0), Err(Error::NotInitialized));
        assert_eq!(strip.set_all_staged(1, 2, 3, 4), Err(Error::NotInitialized));
        assert_eq!(strip.set_one_staged(0, 1, 2, 3, 4), Err(Error::NotInitialized));
        assert_eq!(strip.update(), Err(Error::NotInitialized));
        assert_eq!(strip.shutdown(), Err(Error::NotInitialized));

        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_double_init() {
        let (mut strip, _log) = strip();
        strip.init().unwrap();
        assert_eq!(strip.init(), Err(Error::AlreadyInitialized));
    }

    #[test]
    fn test_claim_failure_releases_data_pin() {
        let log = mock::log();
        let mut gpio = MockGpio::new(&log);
        gpio.fail_pin = Some(24);
        let mut strip = LedStrip::blinkt(gpio).unwrap();

        assert_eq!(strip.init(), Err(Error::BusAcquisition));
        assert_eq!(strip.state(), StripState::Uninitialized);
        assert_eq!(
            *log.borrow(),
            [BusEvent::Output(23), BusEvent::Release(23)]
        );
    }

    #[test]
    fn test_staged_does_not_transmit() {
        let (mut strip, log) = strip();
        strip.init().unwrap();
        log.borrow_mut().clear();

        strip.set_one_staged(2, 0, 255, 0, 7).unwrap();
        strip.set_all_staged(0, 0, 9, 1).unwrap();
        assert!(log.borrow().is_empty());
        assert_eq!(strip.pixels().get(2), Ok(Pixel::new(0, 0, 9, 1).raw()));
    }

    #[test]
    fn test_set_one_and_clear_one() {
        let (mut strip, log) = strip();
        strip.init().unwrap();
        log.borrow_mut().clear();

        strip.set_one(7, 1, 2, 3, 5).unwrap();
        let bytes = sent(&log);
        assert_eq!(&bytes[32..36], &[0xE5, 3, 2, 1]);

        log.borrow_mut().clear();
        strip.clear_one(7).unwrap();
        let bytes = sent(&log);
        assert_eq!(&bytes[32..36], &[0xE3, 0, 0, 0]);
    }

    #[test]
    fn test_shutdown_blanks_and_releases() {
        let (mut strip, log) = strip();
        strip.init().unwrap();
        strip.set_all(10, 20, 30, 7).unwrap();
        log.borrow_mut().clear();

        strip.shutdown().unwrap();
        assert_eq!(strip.state(), StripState::Uninitialized);

        let events = log.borrow();
        let n = events.len();
        assert_eq!(events[n - 2], BusEvent::Release(23));
        assert_eq!(events[n - 1], BusEvent::Release(24));

        let bytes = clocked_bytes(&events, 23, 24);
        for led in bytes[4..36].chunks(4) {
            assert_eq!(led, [0xE3, 0, 0, 0]);
        }
        drop(events);

        // Can come back up
        strip.init().unwrap();
    }

    proptest! {
        #[test]
        fn prop_encode_layout(raw in proptest::collection::vec(any::<u32>(), 0..=32)) {
            let mut pixels = PixelBuffer::new(raw.len()).unwrap();
            for (i, &value) in raw.iter().enumerate() {
                pixels.set_raw(i, value).unwrap();
            }

            let stream: Vec<u8> = encode(&pixels).collect();
            prop_assert_eq!(stream.len(), stream_len(raw.len()));
            prop_assert!(stream[..4].iter().all(|&b| b == 0));

            for (i, &value) in raw.iter().enumerate() {
                let frame = &stream[4 + 4 * i..8 + 4 * i];
                let p = Pixel::from_raw(value);
                prop_assert_eq!(frame, &[0xE0 | (value as u8 & 7), p.blue(), p.green(), p.red()]);
            }
            prop_assert!(stream[4 + 4 * raw.len()..].iter().all(|&b| b == 0));
        }

        #[test]
        fn prop_out_of_range_rejected(index in 8usize..64) {
            let (mut strip, log) = strip();
            strip.init().unwrap();
            log.borrow_mut().clear();
            let before = strip.pixels().clone();

            prop_assert_eq!(strip.set_one(index, 1, 1, 1, 1), Err(Error::OutOfRange));
            prop_assert_eq!(strip.clear_one(index), Err(Error::OutOfRange));
            prop_assert_eq!(strip.set_one_staged(index, 1, 1, 1, 1), Err(Error::OutOfRange));
            prop_assert_eq!(strip.pixels(), &before);
            prop_assert!(log.borrow().is_empty());
        }
    }
}
