//! phat Hardware Abstraction Layer
//!
//! This crate defines the bus traits the drivers are written against. A
//! board support layer (sysfs/gpiochip, a vendor GPIO library, or a test
//! double) implements them; the drivers never touch registers directly.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (demo, service, tests)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  phat-drivers (apa102, inky)            │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  phat-hal (this crate - traits)         │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  host GPIO /  │       │   mock bus    │
//! │  spidev glue  │       │  (unit tests) │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::GpioBus`] - pin-numbered digital I/O
//! - [`spi::SpiBus`] - SPI master writes and transfers

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod spi;

pub use gpio::{GpioBus, Level};
pub use spi::{Mode, SpiBus, SpiConfig};
