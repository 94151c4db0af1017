//! Refresh waveform and border tables
//!
//! The waveform block is 35 bytes of voltage selections (five LUTs of
//! seven phases, two bits per group A-D) followed by 45 bytes of phase
//! timing (nine phases of four durations and a repeat count).

use phat_core::config::Border;

/// Waveform length in bytes
pub const LUT_LEN: usize = 80;

/// Red/black/white refresh waveform
#[rustfmt::skip]
pub const LUT: [u8; LUT_LEN] = [
    // Phase 0     Phase 1     Phase 2     Phase 3     Phase 4     Phase 5     Phase 6
    0b0100_1000, 0b1010_0000, 0b0001_0000, 0b0001_0000, 0b0001_0011, 0b0000_0000, 0b0000_0000, // LUT0 black
    0b0100_1000, 0b1010_0000, 0b1000_0000, 0b0000_0000, 0b0000_0011, 0b0000_0000, 0b0000_0000, // LUT1 white
    0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, // LUT2 unused
    0b0100_1000, 0b1010_0101, 0b0000_0000, 0b1011_1011, 0b0000_0000, 0b0000_0000, 0b0000_0000, // LUT3 red
    0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, // LUT4 VCOM

    // Duration A B C D, repeat
    67, 10, 31, 10,  4, // flash
    16,  8,  4,  4,  6, // clear
     4,  8,  8, 32, 16, // bring in black
     4,  8,  8, 64, 32, // red
     6,  6,  6,  2,  2, // sharpen black
     0,  0,  0,  0,  0,
     0,  0,  0,  0,  0,
     0,  0,  0,  0,  0,
     0,  0,  0,  0,  0,
];

/// Extra border control value for a border setting, if any
pub const fn border_waveform(border: Border) -> Option<u8> {
    match border {
        Border::Default => None,
        Border::Lut => Some(0x33),
        Border::High => Some(0xFF),
        Border::Low => Some(0x00),
    }
}
