// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/demask

//! Flat RGB pixel buffers backed by BMP files.
//!
//! The recovery engine operates on raw bytes; this module is the only place
//! that touches an image file format. Decoding always normalizes to RGB888
//! (3 bytes per pixel, row-major, no row padding, no alpha), which is the
//! exact layout the masking arithmetic assumes. Encoding writes 24-bit BMP,
//! so a decode/encode round-trip is byte-for-byte lossless.

pub mod error;

use std::path::Path;

pub use error::{BmpError, Result};

/// A decoded image: dimensions plus a flat RGB888 byte buffer.
///
/// Invariant: `data.len() == width as usize * height as usize * 3`.
/// Channel order is R,G,B, rows top to bottom, no padding between rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    /// Flat RGB bytes. Public so the engine can transform in place.
    pub data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap an existing flat RGB buffer.
    ///
    /// # Errors
    /// [`BmpError::BufferLength`] if `data.len() != width * height * 3`.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(BmpError::BufferLength { expected, actual: data.len() });
        }
        Ok(Self { width, height, data })
    }

    /// Load a bitmap from disk and normalize it to flat RGB888.
    ///
    /// # Errors
    /// [`BmpError::Decode`] if the file is missing or not a readable image.
    pub fn decode(path: &Path) -> Result<Self> {
        let img = image::open(path).map_err(BmpError::Decode)?.to_rgb8();
        let (width, height) = (img.width(), img.height());
        Ok(Self { width, height, data: img.into_raw() })
    }

    /// Write the buffer to disk as a 24-bit BMP.
    ///
    /// # Errors
    /// [`BmpError::Encode`] if the file cannot be written.
    pub fn encode(&self, path: &Path) -> Result<()> {
        image::save_buffer(path, &self.data, self.width, self.height, image::ColorType::Rgb8)
            .map_err(BmpError::Encode)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels (`width * height`).
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Total byte length of the flat buffer (`width * height * 3`).
    pub fn byte_len(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_checks_length() {
        assert!(PixelBuffer::from_raw(2, 2, vec![0; 12]).is_ok());
        let err = PixelBuffer::from_raw(2, 2, vec![0; 11]).unwrap_err();
        match err {
            BmpError::BufferLength { expected, actual } => {
                assert_eq!(expected, 12);
                assert_eq!(actual, 11);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn accessors() {
        let buf = PixelBuffer::from_raw(3, 2, vec![7; 18]).unwrap();
        assert_eq!(buf.width(), 3);
        assert_eq!(buf.height(), 2);
        assert_eq!(buf.pixel_count(), 6);
        assert_eq!(buf.byte_len(), 18);
    }
}
