//! Device drivers
//!
//! Concrete drivers built on the bus traits in `phat-hal` and the models
//! in `phat-core`:
//!
//! - APA102 LED strip, bit-banged over two GPIO lines (Blinkt)
//! - Tri-colour SSD16xx e-paper panel over SPI (Inky pHAT v2)

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod apa102;
pub mod inky;

#[cfg(test)]
mod mock;

pub use apa102::LedStrip;
pub use inky::{InkyPhat, PanelInterface, Revision};
