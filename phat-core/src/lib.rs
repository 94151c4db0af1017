//! Board-agnostic core for the pHAT drivers
//!
//! This crate contains everything that does not touch a bus:
//!
//! - Pixel model and fixed-length strip buffer
//! - Tri-colour frame buffer and bit-plane packer
//! - Device lifecycle state machines
//! - Wiring and geometry configuration
//! - Error and status codes

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod config;
pub mod error;
pub mod frame;
pub mod pixel;
pub mod state;

pub use error::{Error, Status};
pub use frame::{BitPlanes, FrameBuffer, Ink};
pub use pixel::{Pixel, PixelBuffer};
