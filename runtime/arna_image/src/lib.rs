//! Arna image support library (`libarna_image`)
//!
//! Image builtins for AOT-compiled Arna programs: sepia, Gaussian blur,
//! bilinear resize, and crop, all over row-major RGBA images with one
//! `f64` sample per channel in the nominal range `[0.0, 1.0]`.
//!
//! The safe API lives on [`Image`]; the C-ABI wrappers generated code
//! calls are in this crate's FFI module and convert failures into the
//! runtime's assertion-style abort. Encoding and decoding image files is
//! delegated to a [`PixelCodec`] implementation supplied by the embedder.

use thiserror::Error;

mod codec;
mod ffi;
mod filters;

pub use codec::PixelCodec;
pub use ffi::{arna_blur, arna_crop, arna_has_size, arna_resize, arna_sepia, ArnaImage};

/// Samples per pixel: red, green, blue, alpha.
pub const CHANNELS: usize = 4;

/// Error from an image operation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ImageError {
    #[error("Blur radius must be positive")]
    NonPositiveBlurRadius,
    #[error("Must resize to a positive size")]
    NonPositiveResize,
    #[error("Cannot resize an empty image")]
    EmptySource,
    #[error("Crop bounds are out of range")]
    CropOutOfBounds,
}

/// A row-major RGBA image.
///
/// `data` holds `rows * cols * CHANNELS` samples; pixel `(r, c)` starts at
/// `(r * cols + c) * CHANNELS`.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Image {
    /// An all-zero (transparent black) image.
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Image {
            rows,
            cols,
            data: vec![0.0; rows * cols * CHANNELS],
        }
    }

    /// Wrap an existing sample buffer.
    ///
    /// `data.len()` must equal `rows * cols * CHANNELS`.
    pub(crate) fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Self {
        debug_assert_eq!(data.len(), rows * cols * CHANNELS);
        Image { rows, cols, data }
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[must_use]
    pub fn has_size(&self, rows: usize, cols: usize) -> bool {
        self.rows == rows && self.cols == cols
    }

    /// The RGBA samples of pixel `(r, c)`.
    #[must_use]
    pub fn pixel(&self, r: usize, c: usize) -> [f64; CHANNELS] {
        let at = self.sample_index(r, c);
        [
            self.data[at],
            self.data[at + 1],
            self.data[at + 2],
            self.data[at + 3],
        ]
    }

    pub fn set_pixel(&mut self, r: usize, c: usize, rgba: [f64; CHANNELS]) {
        let at = self.sample_index(r, c);
        self.data[at..at + CHANNELS].copy_from_slice(&rgba);
    }

    /// The whole sample buffer, row-major.
    #[must_use]
    pub fn samples(&self) -> &[f64] {
        &self.data
    }

    pub(crate) fn into_samples(self) -> Vec<f64> {
        self.data
    }

    pub(crate) fn sample_index(&self, r: usize, c: usize) -> usize {
        (r * self.cols + c) * CHANNELS
    }
}

#[cfg(test)]
mod tests;
