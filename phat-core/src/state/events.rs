//! Events that drive device lifecycle transitions

/// LED strip lifecycle events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StripEvent {
    /// Lines claimed and the strip blanked
    InitComplete,
    /// Strip blanked and lines released
    Shutdown,
}

/// Panel lifecycle events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PanelEvent {
    // Lifecycle events
    /// Pins and SPI claimed, revision detected
    InitComplete,
    /// Deep sleep sent, bus released
    Shutdown,

    // Refresh events
    /// Reset issued for a new frame
    UpdateStarted,
    /// Refresh activated and busy line released
    UpdateFinished,
    /// Bus failure or busy timeout part way through a refresh
    UpdateFailed,
}
