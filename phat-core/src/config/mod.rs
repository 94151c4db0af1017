//! Configuration types
//!
//! Board wiring and panel geometry, passed to the drivers at construction.

pub mod hardware;

pub use hardware::*;
