// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/demask

//! Error types for the stage-reversal engine.
//!
//! [`RecoverError`] covers every failure mode from artifact parsing through
//! the candidate search. Advisory conditions (truncated patches, skipped
//! size-mismatched steps) are not errors; they are logged by the stage
//! controller and processing continues with best-effort data.

use std::fmt;

use crate::bmp::BmpError;

/// Errors that can occur during image recovery.
#[derive(Debug)]
pub enum RecoverError {
    /// An image file could not be decoded or encoded.
    Codec(BmpError),
    /// A masking artifact could not be read or written.
    Io(std::io::Error),
    /// A masking artifact is empty — the leading seed token is missing.
    MissingSeed,
    /// A masking artifact contains a token that is not an unsigned integer.
    InvalidToken(String),
    /// A masking artifact ends mid-triple (1 or 2 trailing values).
    TruncatedTriple {
        /// Number of values after the last complete triple.
        leftover: usize,
    },
    /// A buffer is too small for the mask window the operation needs.
    SizeMismatch {
        /// Bytes the operation requires.
        required: usize,
        /// Bytes actually available.
        available: usize,
    },
    /// Every catalog candidate failed verification for a stage. Fatal:
    /// all earlier stages depend on this one being resolved.
    NoMatchingOperation {
        /// Ordinal of the stage whose search was exhausted.
        stage: u32,
    },
}

impl fmt::Display for RecoverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Codec(e) => write!(f, "image codec error: {e}"),
            Self::Io(e) => write!(f, "masking artifact I/O error: {e}"),
            Self::MissingSeed => write!(f, "masking artifact is empty (no seed)"),
            Self::InvalidToken(t) => write!(f, "masking artifact holds a non-integer token: {t:?}"),
            Self::TruncatedTriple { leftover } => {
                write!(f, "masking artifact ends with an incomplete triple ({leftover} trailing values)")
            }
            Self::SizeMismatch { required, available } => {
                write!(f, "size mismatch: {required} bytes required, {available} available")
            }
            Self::NoMatchingOperation { stage } => {
                write!(f, "no recognized operation for stage {stage} (catalog exhausted)")
            }
        }
    }
}

impl std::error::Error for RecoverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Codec(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<BmpError> for RecoverError {
    fn from(e: BmpError) -> Self {
        Self::Codec(e)
    }
}

impl From<std::io::Error> for RecoverError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

pub type Result<T> = std::result::Result<T, RecoverError>;
