//! Driver errors and the numeric status codes reported to callers

use core::fmt;

/// Errors reported by the pixel/frame model and both device handles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Operation attempted before `init`
    NotInitialized,
    /// `init` called on a device that is already up
    AlreadyInitialized,
    /// Index at or beyond the buffer length
    OutOfRange,
    /// Frame value outside the three-ink domain, or a mismatched shape
    InvalidValue,
    /// A GPIO line or the SPI bus could not be claimed
    BusAcquisition,
    /// Busy line never reported ready within the configured bound
    TimedOut,
    /// SPI write failed after the bus was claimed
    BusTransfer,
}

impl Error {
    /// Numeric status code for this error
    pub const fn status(self) -> Status {
        match self {
            Error::NotInitialized => Status::NotInitialized,
            Error::AlreadyInitialized => Status::AlreadyInitialized,
            Error::OutOfRange => Status::OutOfRange,
            Error::InvalidValue => Status::InvalidValue,
            Error::BusAcquisition => Status::BusAcquisition,
            Error::TimedOut => Status::TimedOut,
            Error::BusTransfer => Status::BusTransfer,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Error::NotInitialized => "device not initialized",
            Error::AlreadyInitialized => "device already initialized",
            Error::OutOfRange => "index out of range",
            Error::InvalidValue => "invalid value",
            Error::BusAcquisition => "failed to acquire bus",
            Error::TimedOut => "timed out waiting for device",
            Error::BusTransfer => "bus transfer failed",
        };
        f.write_str(msg)
    }
}

/// Small discrete result code, stable across releases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Status {
    Ok = 0,
    NotInitialized = 1,
    OutOfRange = 2,
    AlreadyInitialized = 3,
    InvalidValue = 4,
    BusAcquisition = 5,
    TimedOut = 6,
    BusTransfer = 7,
}

impl Status {
    /// Raw code
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Check for success
    pub const fn is_ok(self) -> bool {
        matches!(self, Status::Ok)
    }
}

impl<T> From<Result<T, Error>> for Status {
    fn from(result: Result<T, Error>) -> Self {
        match result {
            Ok(_) => Status::Ok,
            Err(e) => e.status(),
        }
    }
}

impl From<Error> for Status {
    fn from(error: Error) -> Self {
        error.status()
    }
}
