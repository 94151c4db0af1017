//! Tri-colour frame model and bit-plane packing
//!
//! The panel takes two monochrome planes rather than one tri-state bitmap.
//! [`BitPlanes::pack`] splits a [`FrameBuffer`] into them:
//!
//! | cell  | red plane | black plane |
//! |-------|-----------|-------------|
//! | White | 0         | 1           |
//! | Black | 0         | 0           |
//! | Red   | 1         | 1           |
//!
//! Both planes are row-major, eight cells per byte, MSB first. Each row
//! starts on a fresh byte and the tail of a partial byte is zero.

use heapless::Vec;

use crate::error::Error;

/// Native panel width (short edge)
pub const PANEL_WIDTH: usize = 104;

/// Native panel height (long edge)
pub const PANEL_HEIGHT: usize = 212;

/// Largest frame a [`FrameBuffer`] can hold
pub const MAX_FRAME_CELLS: usize = PANEL_WIDTH * PANEL_HEIGHT;

/// Largest packed plane
pub const MAX_PLANE_LEN: usize = PANEL_HEIGHT * PANEL_WIDTH.div_ceil(8);

/// Cell value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Ink {
    /// Background
    #[default]
    White = 0,
    Black = 1,
    Red = 2,
}

impl Ink {
    /// Raw cell value
    pub const fn value(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Ink {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Ink::White),
            1 => Ok(Ink::Black),
            2 => Ok(Ink::Red),
            _ => Err(Error::InvalidValue),
        }
    }
}

impl From<Ink> for u8 {
    fn from(ink: Ink) -> Self {
        ink.value()
    }
}

/// Bytes per packed row for a given width
pub const fn row_stride(width: usize) -> usize {
    width.div_ceil(8)
}

/// Height × width grid of [`Ink`] cells
///
/// `x` runs along a row (0..width), `y` selects the row (0..height).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Ink, MAX_FRAME_CELLS>,
}

impl FrameBuffer {
    /// Blank (all white) frame
    ///
    /// Zero-sized frames are [`Error::InvalidValue`]; frames that would not
    /// fit the fixed storage are [`Error::OutOfRange`].
    pub fn new(width: usize, height: usize) -> Result<Self, Error> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidValue);
        }
        let cells_len = width.checked_mul(height).ok_or(Error::OutOfRange)?;
        if row_stride(width) * height > MAX_PLANE_LEN {
            return Err(Error::OutOfRange);
        }

        let mut cells = Vec::new();
        cells
            .resize(cells_len, Ink::White)
            .map_err(|_| Error::OutOfRange)?;

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Frame at the native panel size
    pub fn panel() -> Self {
        Self {
            width: PANEL_WIDTH,
            height: PANEL_HEIGHT,
            cells: Vec::from_iter(core::iter::repeat(Ink::White).take(MAX_FRAME_CELLS)),
        }
    }

    /// Build a frame from row-major raw cell values
    ///
    /// Every value must be 0, 1 or 2 and there must be exactly
    /// `width * height` of them.
    pub fn from_values(width: usize, height: usize, values: &[u8]) -> Result<Self, Error> {
        let mut frame = Self::new(width, height)?;
        if values.len() != frame.cells.len() {
            return Err(Error::InvalidValue);
        }
        for (cell, &value) in frame.cells.iter_mut().zip(values) {
            *cell = Ink::try_from(value)?;
        }
        Ok(frame)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Packed plane length for this frame's shape
    pub fn plane_len(&self) -> usize {
        row_stride(self.width) * self.height
    }

    fn offset(&self, x: usize, y: usize) -> Result<usize, Error> {
        if x >= self.width || y >= self.height {
            return Err(Error::OutOfRange);
        }
        Ok(y * self.width + x)
    }

    /// Cell at column `x`, row `y`
    pub fn get(&self, x: usize, y: usize) -> Result<Ink, Error> {
        let i = self.offset(x, y)?;
        Ok(self.cells[i])
    }

    /// Set the cell at column `x`, row `y`
    pub fn set(&mut self, x: usize, y: usize, ink: Ink) -> Result<(), Error> {
        let i = self.offset(x, y)?;
        self.cells[i] = ink;
        Ok(())
    }

    /// Set every cell
    pub fn fill(&mut self, ink: Ink) {
        for cell in self.cells.iter_mut() {
            *cell = ink;
        }
    }

    /// Rows, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Ink]> + '_ {
        self.cells.chunks(self.width)
    }
}

/// Red and black planes ready for transmission
#[derive(Clone, PartialEq, Eq)]
pub struct BitPlanes {
    red: [u8; MAX_PLANE_LEN],
    black: [u8; MAX_PLANE_LEN],
    len: usize,
}

impl BitPlanes {
    /// Split `frame` into its two planes
    pub fn pack(frame: &FrameBuffer) -> Self {
        let stride = row_stride(frame.width());
        let mut planes = Self {
            red: [0; MAX_PLANE_LEN],
            black: [0; MAX_PLANE_LEN],
            len: frame.plane_len(),
        };

        for (y, row) in frame.rows().enumerate() {
            for (x, &ink) in row.iter().enumerate() {
                let byte = y * stride + x / 8;
                let mask = 0x80 >> (x % 8);
                if ink == Ink::Red {
                    planes.red[byte] |= mask;
                }
                if ink != Ink::Black {
                    planes.black[byte] |= mask;
                }
            }
        }

        planes
    }

    /// Plane with a bit set for every red cell
    pub fn red(&self) -> &[u8] {
        &self.red[..self.len]
    }

    /// Plane with a bit cleared for every black cell
    pub fn black(&self) -> &[u8] {
        &self.black[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl core::fmt::Debug for BitPlanes {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BitPlanes")
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "graphics")]
mod graphics {
    use embedded_graphics::{
        draw_target::DrawTarget,
        geometry::{OriginDimensions, Size},
        pixelcolor::{raw::RawU2, PixelColor},
        Pixel,
    };

    use super::{FrameBuffer, Ink};

    impl PixelColor for Ink {
        type Raw = RawU2;
    }

    impl OriginDimensions for FrameBuffer {
        fn size(&self) -> Size {
            Size::new(self.width as u32, self.height as u32)
        }
    }

    impl DrawTarget for FrameBuffer {
        type Color = Ink;
        type Error = core::convert::Infallible;

        fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            for Pixel(point, ink) in pixels {
                if point.x < 0 || point.y < 0 {
                    continue;
                }
                // Off-panel points are dropped
                let _ = self.set(point.x as usize, point.y as usize, ink);
            }
            Ok(())
        }
    }
}
