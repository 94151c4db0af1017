//! Lifecycle state machines
//!
//! Every driver operation is gated on the current state. Transitions are a
//! pure function of state and event; unknown pairs leave the state alone.

use super::events::{PanelEvent, StripEvent};
use crate::error::Error;

/// LED strip states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StripState {
    /// Lines not claimed; only `init` is accepted
    #[default]
    Uninitialized,
    /// Lines claimed, pixel operations allowed
    Initialized,
}

impl StripState {
    pub fn is_initialized(&self) -> bool {
        matches!(self, StripState::Initialized)
    }

    /// Gate for operations that need a claimed bus
    pub fn require_initialized(&self) -> Result<(), Error> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(Error::NotInitialized)
        }
    }

    /// Gate for `init`
    pub fn require_uninitialized(&self) -> Result<(), Error> {
        if self.is_initialized() {
            Err(Error::AlreadyInitialized)
        } else {
            Ok(())
        }
    }

    /// Process an event and return the next state
    pub fn transition(self, event: StripEvent) -> Self {
        use StripEvent::*;
        use StripState::*;

        match (self, event) {
            (Uninitialized, InitComplete) => Initialized,
            (Initialized, Shutdown) => Uninitialized,
            _ => self,
        }
    }
}

/// Panel states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PanelState {
    /// Never brought up
    #[default]
    Uninitialized,
    /// Bus claimed, waiting for a frame
    Ready,
    /// Refresh sequence in flight
    Updating,
    /// Deep sleep; `init` brings the panel back
    PoweredDown,
}

impl PanelState {
    /// Check if the bus is currently held
    pub fn holds_bus(&self) -> bool {
        matches!(self, PanelState::Ready | PanelState::Updating)
    }

    /// Gate for operations that need a claimed bus
    pub fn require_ready(&self) -> Result<(), Error> {
        if self.holds_bus() {
            Ok(())
        } else {
            Err(Error::NotInitialized)
        }
    }

    /// Gate for `init`
    pub fn require_not_ready(&self) -> Result<(), Error> {
        if self.holds_bus() {
            Err(Error::AlreadyInitialized)
        } else {
            Ok(())
        }
    }

    /// Process an event and return the next state
    pub fn transition(self, event: PanelEvent) -> Self {
        use PanelEvent::*;
        use PanelState::*;

        match (self, event) {
            // Bring-up, first time or out of deep sleep
            (Uninitialized, InitComplete) => Ready,
            (PoweredDown, InitComplete) => Ready,

            // Refresh
            (Ready, UpdateStarted) => Updating,
            (Updating, UpdateFinished) => Ready,
            // Failed refresh leaves the bus usable for a retry
            (Updating, UpdateFailed) => Ready,

            (Ready, Shutdown) => PoweredDown,

            _ => self,
        }
    }
}
