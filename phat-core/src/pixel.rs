//! LED pixel model
//!
//! A [`Pixel`] packs colour and brightness into one `u32`:
//!
//! ```text
//! 31       24 23      16 15       8 7     3 2   0
//! ┌──────────┬──────────┬──────────┬───────┬─────┐
//! │   red    │  green   │   blue   │ (0)   │ br  │
//! └──────────┴──────────┴──────────┴───────┴─────┘
//! ```
//!
//! Only the low three bits of the brightness byte are significant.

use heapless::Vec;

use crate::error::Error;

/// Largest strip a [`PixelBuffer`] can hold
pub const MAX_STRIP_LEN: usize = 64;

/// Brightness used for freshly constructed and cleared pixels
pub const DEFAULT_BRIGHTNESS: u8 = 3;

/// Highest brightness level (3 bits)
pub const MAX_BRIGHTNESS: u8 = 0b111;

const BRIGHTNESS_MASK: u32 = MAX_BRIGHTNESS as u32;

/// One packed RGB + brightness value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pixel(u32);

impl Default for Pixel {
    fn default() -> Self {
        Self::OFF
    }
}

impl Pixel {
    /// Black at the default brightness; what "off" means on the strip
    pub const OFF: Pixel = Pixel(DEFAULT_BRIGHTNESS as u32);

    /// Pack a colour and brightness
    pub const fn new(r: u8, g: u8, b: u8, brightness: u8) -> Self {
        Self(
            ((r as u32) << 24)
                | ((g as u32) << 16)
                | ((b as u32) << 8)
                | (brightness as u32 & BRIGHTNESS_MASK),
        )
    }

    /// Wrap an already packed value
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Packed value
    pub const fn raw(self) -> u32 {
        self.0
    }

    pub const fn red(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub const fn green(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn blue(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Brightness level (0-7)
    pub const fn brightness(self) -> u8 {
        (self.0 & BRIGHTNESS_MASK) as u8
    }

    /// Replace the colour, keeping brightness
    pub fn set_color(&mut self, r: u8, g: u8, b: u8) {
        *self = Self::new(r, g, b, self.brightness());
    }

    /// Replace brightness, keeping colour
    pub fn set_brightness(&mut self, brightness: u8) {
        self.0 = (self.0 & 0xFFFF_FF00) | (brightness as u32 & BRIGHTNESS_MASK);
    }
}

impl From<u32> for Pixel {
    fn from(raw: u32) -> Self {
        Self::from_raw(raw)
    }
}

impl From<Pixel> for u32 {
    fn from(pixel: Pixel) -> Self {
        pixel.raw()
    }
}

/// Fixed-length, index-addressed pixel storage
///
/// Index 0 is the first LED on the wire. The length is set at construction
/// and never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PixelBuffer {
    pixels: Vec<Pixel, MAX_STRIP_LEN>,
}

impl PixelBuffer {
    /// Create a buffer of `len` pixels, all [`Pixel::OFF`]
    ///
    /// Fails with [`Error::OutOfRange`] if `len` exceeds [`MAX_STRIP_LEN`].
    pub fn new(len: usize) -> Result<Self, Error> {
        let mut pixels = Vec::new();
        pixels
            .resize(len, Pixel::OFF)
            .map_err(|_| Error::OutOfRange)?;
        Ok(Self { pixels })
    }

    /// Number of pixels
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Check for a zero-length strip
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    fn slot(&mut self, index: usize) -> Result<&mut Pixel, Error> {
        self.pixels.get_mut(index).ok_or(Error::OutOfRange)
    }

    /// Set colour at `index`, keeping that pixel's brightness
    pub fn set_color(&mut self, index: usize, r: u8, g: u8, b: u8) -> Result<(), Error> {
        self.slot(index)?.set_color(r, g, b);
        Ok(())
    }

    /// Set colour and brightness at `index`
    pub fn set_color_and_brightness(
        &mut self,
        index: usize,
        r: u8,
        g: u8,
        b: u8,
        brightness: u8,
    ) -> Result<(), Error> {
        *self.slot(index)? = Pixel::new(r, g, b, brightness);
        Ok(())
    }

    /// Set brightness at `index`, keeping that pixel's colour
    pub fn set_brightness(&mut self, index: usize, brightness: u8) -> Result<(), Error> {
        self.slot(index)?.set_brightness(brightness);
        Ok(())
    }

    /// Store a packed value at `index` as-is
    pub fn set_raw(&mut self, index: usize, raw: u32) -> Result<(), Error> {
        *self.slot(index)? = Pixel::from_raw(raw);
        Ok(())
    }

    /// Store a pixel at `index`
    pub fn set(&mut self, index: usize, pixel: Pixel) -> Result<(), Error> {
        *self.slot(index)? = pixel;
        Ok(())
    }

    /// Packed value at `index`
    pub fn get(&self, index: usize) -> Result<u32, Error> {
        self.pixel(index).map(Pixel::raw)
    }

    /// Pixel at `index`
    pub fn pixel(&self, index: usize) -> Result<Pixel, Error> {
        self.pixels.get(index).copied().ok_or(Error::OutOfRange)
    }

    /// Overwrite every pixel
    pub fn fill(&mut self, pixel: Pixel) {
        for slot in self.pixels.iter_mut() {
            *slot = pixel;
        }
    }

    /// Pixels in transmission order
    pub fn iter(&self) -> impl Iterator<Item = Pixel> + '_ {
        self.pixels.iter().copied()
    }

    /// Mutable access in transmission order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Pixel> + '_ {
        self.pixels.iter_mut()
    }
}
