// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/demask

//! The fixed catalog of candidate byte transformations.
//!
//! Every operation the forward distortion chain may have applied is one of
//! these 33 candidates: XOR against the reference image, or a rotation or
//! shift by 1–8 bits. A [`CandidateOp`] always names the FORWARD operation;
//! the search undoes a stage by applying [`CandidateOp::inverse`] and letting
//! the checksum oracle confirm the guess.
//!
//! Rotations and XOR are exactly invertible. Shifts destroy bits, so their
//! "inverse" (the opposite shift) is only heuristic — a shift stage can be
//! validated through the oracle but never algebraically guaranteed.

use std::fmt;

use rayon::prelude::*;

/// One member of the operation catalog. The magnitude for rotations and
/// shifts is `1..=8`; rotating by 8 is the identity, shifting by 8 zeroes
/// the byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateOp {
    /// Per-byte XOR against the reference image. Self-inverse.
    Xor,
    /// Rotate each byte left by `n` bits.
    RotateLeft(u8),
    /// Rotate each byte right by `n` bits.
    RotateRight(u8),
    /// Shift each byte left by `n` bits, losing the high bits.
    ShiftLeft(u8),
    /// Shift each byte right by `n` bits, losing the low bits.
    ShiftRight(u8),
}

impl CandidateOp {
    /// The transform that undoes this one. For shifts this is the opposite
    /// shift, which only restores bytes whose discarded bits were zero.
    pub fn inverse(self) -> Self {
        match self {
            Self::Xor => Self::Xor,
            Self::RotateLeft(n) => Self::RotateRight(n),
            Self::RotateRight(n) => Self::RotateLeft(n),
            Self::ShiftLeft(n) => Self::ShiftRight(n),
            Self::ShiftRight(n) => Self::ShiftLeft(n),
        }
    }

    /// Whether applying this operation reads the reference image.
    pub fn uses_reference(self) -> bool {
        matches!(self, Self::Xor)
    }

    /// Transform a single byte. `reference` is consulted only by XOR.
    ///
    /// Shifts widen to `u16` first so a magnitude of 8 yields 0 instead of
    /// a shift overflow.
    pub fn apply(self, byte: u8, reference: u8) -> u8 {
        match self {
            Self::Xor => byte ^ reference,
            Self::RotateLeft(n) => byte.rotate_left(u32::from(n)),
            Self::RotateRight(n) => byte.rotate_right(u32::from(n)),
            Self::ShiftLeft(n) => (u16::from(byte) << n) as u8,
            Self::ShiftRight(n) => (u16::from(byte) >> n) as u8,
        }
    }

    /// Transform every byte of `buffer` in place.
    ///
    /// For XOR the caller must have checked that `reference` covers the
    /// buffer; the zip silently stops at the shorter of the two otherwise.
    pub fn apply_to_buffer(self, buffer: &mut [u8], reference: &[u8]) {
        match self {
            Self::Xor => {
                buffer
                    .par_iter_mut()
                    .zip(reference.par_iter())
                    .for_each(|(b, r)| *b ^= *r);
            }
            op => {
                buffer.par_iter_mut().for_each(|b| *b = op.apply(*b, 0));
            }
        }
    }
}

impl fmt::Display for CandidateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Xor => write!(f, "XOR with reference image"),
            Self::RotateLeft(n) => write!(f, "rotate left {n} bits"),
            Self::RotateRight(n) => write!(f, "rotate right {n} bits"),
            Self::ShiftLeft(n) => write!(f, "shift left {n} bits"),
            Self::ShiftRight(n) => write!(f, "shift right {n} bits"),
        }
    }
}

/// Number of candidates in the catalog: 1 XOR + 16 rotations + 16 shifts.
pub const CATALOG_SIZE: usize = 33;

/// The catalog in fixed search order: XOR, rotate-right 1..=8,
/// rotate-left 1..=8, shift-right 1..=8, shift-left 1..=8.
///
/// The order is significant for tie-breaking — the first candidate whose
/// verification succeeds is accepted.
pub fn catalog() -> Vec<CandidateOp> {
    let mut ops = Vec::with_capacity(CATALOG_SIZE);
    ops.push(CandidateOp::Xor);
    for n in 1..=8 {
        ops.push(CandidateOp::RotateRight(n));
    }
    for n in 1..=8 {
        ops.push(CandidateOp::RotateLeft(n));
    }
    for n in 1..=8 {
        ops.push(CandidateOp::ShiftRight(n));
    }
    for n in 1..=8 {
        ops.push(CandidateOp::ShiftLeft(n));
    }
    ops
}
