// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/demask

//! Error types for BMP decoding and encoding.

use std::fmt;

/// Errors that can occur while loading or saving a bitmap.
#[derive(Debug)]
pub enum BmpError {
    /// The file could not be read or parsed as a bitmap image.
    Decode(image::ImageError),
    /// The pixel buffer could not be written out as a bitmap file.
    Encode(image::ImageError),
    /// A raw buffer does not match the declared `width * height * 3` size.
    BufferLength {
        /// Bytes required by the declared dimensions.
        expected: usize,
        /// Bytes actually supplied.
        actual: usize,
    },
}

impl fmt::Display for BmpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode(e) => write!(f, "BMP decode failed: {e}"),
            Self::Encode(e) => write!(f, "BMP encode failed: {e}"),
            Self::BufferLength { expected, actual } => {
                write!(f, "pixel buffer holds {actual} bytes, dimensions require {expected}")
            }
        }
    }
}

impl std::error::Error for BmpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Decode(e) | Self::Encode(e) => Some(e),
            Self::BufferLength { .. } => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, BmpError>;
