use bitvec::prelude::*;
#[cfg(feature = "embedded-graphics")]
use embedded_graphics::{image::ImageRaw, pixelcolor::BinaryColor};

pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;
pub const CELLS: usize = WIDTH * HEIGHT;
pub(crate) const MEM_LENGTH: usize = CELLS / 8;

/// An opaque struct holding frame of the chip-8 display
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Frame([u8; MEM_LENGTH]);

/// A shared view over a `Frame`
///
/// Has different accessors for the content of frames, which can be used independently
/// to fulfill the needs.
///
/// Each pixel is represented either by a corresponding bit being set, or by `true` value.
/// Internally, the data is stored in a form of concatenating rows from top to bottom of the frame.
/// Rows are represented as an individual bits of continuous memory, matching the state of pixels
/// from left to the right, so the bit index of a pixel is `x + y * WIDTH`.
///
/// #Note:
/// Can return ImageRaw instance with `embedded-graphics` feature on.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct FrameView<'a>(&'a [u8; MEM_LENGTH]);

impl<'a> FrameView<'a> {
    /// View the raw memory of a frame
    pub fn as_raw(&self) -> &[u8] {
        self.0
    }

    /// Create an immutable copy of a frame
    pub fn copy_frame(self) -> Frame {
        Frame(*self.0)
    }

    /// Access frame's bits by coordinates
    pub fn get_bit(&self, x: usize, y: usize) -> Option<bool> {
        if x < WIDTH {
            self.cell(x + y * WIDTH)
        } else {
            None
        }
    }

    /// Access frame's bits by row-major cell index
    pub fn cell(&self, index: usize) -> Option<bool> {
        self.0.view_bits::<Msb0>().get(index).map(|bit| *bit)
    }

    /// Number of lit pixels
    pub fn lit(&self) -> usize {
        self.0.view_bits::<Msb0>().count_ones()
    }

    /// Get iterator over rows in a form of a `BitSlice`s
    pub fn iter_rows_as_bitslices(&self) -> impl Iterator<Item = &'a BitSlice<u8, Msb0>> {
        self.0.chunks(WIDTH / 8).map(|row| row.view_bits::<Msb0>())
    }

    /// Get `ImageRaw` structure from frame's data
    #[cfg(feature = "embedded-graphics")]
    pub fn as_raw_image(&self) -> ImageRaw<'a, BinaryColor> {
        ImageRaw::new(self.0, WIDTH as u32, HEIGHT as u32)
    }
}

impl Frame {
    pub(crate) fn new() -> Self {
        Self([0; MEM_LENGTH])
    }

    /// Get view over frame
    pub fn view(&self) -> FrameView<'_> {
        FrameView(&self.0)
    }

    pub(crate) fn clear(&mut self) {
        self.0 = [0; MEM_LENGTH];
    }

    /// XOR `val` onto the cell at row-major `index`
    ///
    /// Returns `Some(true)` when a lit cell got switched off, `None` when the index
    /// lies outside of the frame.
    pub(crate) fn xor_cell(&mut self, index: usize, val: bool) -> Option<bool> {
        self.0
            .view_bits_mut::<Msb0>()
            .get_mut(index)
            .map(|mut bit| {
                let lit = *bit;
                *bit = lit ^ val;
                lit && val
            })
    }
}

#[cfg(test)]
impl Frame {
    pub(crate) fn as_raw_mut(&mut self) -> &mut [u8] {
        &mut self.0
    }
}
