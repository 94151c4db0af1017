//! Timed brightness and colour transitions
//!
//! All effects block the caller for their full duration and transmit after
//! every step.

use embedded_hal::delay::DelayNs;
use log::debug;
use phat_core::error::Error;
use phat_core::pixel::{Pixel, PixelBuffer, MAX_BRIGHTNESS};
use phat_hal::GpioBus;

use super::LedStrip;

/// Move `from` toward `to` by `|to - from| / remaining`
fn approach(from: u8, to: u8, remaining: u32) -> u8 {
    let step = (u32::from(from.abs_diff(to)) / remaining) as u8;
    if from > to {
        from - step
    } else {
        from + step
    }
}

impl<G: GpioBus> LedStrip<G> {
    /// Dim every pixel one level per step until all are dark
    ///
    /// At most seven steps, `step_ms` apart.
    pub fn fade(&mut self, step_ms: u32, delay: &mut impl DelayNs) -> Result<(), Error> {
        self.state.require_initialized()?;

        for _ in 0..MAX_BRIGHTNESS {
            let mut remaining = 0u32;
            for pixel in self.pixels.iter_mut() {
                let level = pixel.brightness().saturating_sub(1);
                pixel.set_brightness(level);
                remaining += u32::from(level);
            }
            self.show();
            delay.delay_ms(step_ms);

            if remaining == 0 {
                break;
            }
        }
        Ok(())
    }

    /// Raise every pixel from level 1 up to `brightness`, one level per step
    pub fn rise(
        &mut self,
        step_ms: u32,
        brightness: u8,
        delay: &mut impl DelayNs,
    ) -> Result<(), Error> {
        self.state.require_initialized()?;

        for level in 1..=brightness.min(MAX_BRIGHTNESS) {
            for pixel in self.pixels.iter_mut() {
                pixel.set_brightness(level);
            }
            self.show();
            delay.delay_ms(step_ms);
        }
        Ok(())
    }

    /// Blend from the current pixels to `target` over `steps` refreshes
    ///
    /// Steps are `1000 / steps` ms apart. Colours arrive exactly on the last
    /// step; brightness moves one level per step toward the target.
    pub fn crossfade(
        &mut self,
        target: &PixelBuffer,
        steps: u32,
        delay: &mut impl DelayNs,
    ) -> Result<(), Error> {
        self.state.require_initialized()?;
        if target.len() != self.pixels.len() {
            return Err(Error::OutOfRange);
        }
        if steps == 0 {
            return Err(Error::InvalidValue);
        }

        debug!("apa102: crossfade over {} steps", steps);
        let interval_ms = 1000 / steps;

        for i in 0..steps {
            let remaining = steps - i;
            for (pixel, goal) in self.pixels.iter_mut().zip(target.iter()) {
                let r = approach(pixel.red(), goal.red(), remaining);
                let g = approach(pixel.green(), goal.green(), remaining);
                let b = approach(pixel.blue(), goal.blue(), remaining);

                let mut level = pixel.brightness();
                if level > goal.brightness() {
                    level -= 1;
                } else if level < goal.brightness() {
                    level += 1;
                }

                *pixel = Pixel::new(r, g, b, level);
            }
            self.show();
            delay.delay_ms(interval_ms);
        }
        Ok(())
    }
}
