// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/demask

//! Algebraic properties of the operation catalog, exhaustively over all
//! byte values and magnitudes.

use demask_core::CandidateOp;

#[test]
fn rotations_invert_exactly() {
    for n in 1..=8u8 {
        for byte in 0..=255u8 {
            let left = CandidateOp::RotateLeft(n).apply(byte, 0);
            assert_eq!(CandidateOp::RotateRight(n).apply(left, 0), byte, "rotl/rotr {n} on {byte:#010b}");

            let right = CandidateOp::RotateRight(n).apply(byte, 0);
            assert_eq!(CandidateOp::RotateLeft(n).apply(right, 0), byte, "rotr/rotl {n} on {byte:#010b}");
        }
    }
}

#[test]
fn xor_is_self_inverse() {
    for byte in 0..=255u8 {
        for reference in (0..=255u8).step_by(7) {
            let once = CandidateOp::Xor.apply(byte, reference);
            assert_eq!(CandidateOp::Xor.apply(once, reference), byte);
        }
    }
}

#[test]
fn shifts_round_trip_only_when_discarded_bits_were_zero() {
    for n in 1..=7u8 {
        let low_mask = (1u16 << n) as u8 - 1;
        for byte in 0..=255u8 {
            let shifted = CandidateOp::ShiftRight(n).apply(byte, 0);
            let back = CandidateOp::ShiftLeft(n).apply(shifted, 0);
            if byte & low_mask == 0 {
                assert_eq!(back, byte, "shift {n} should restore {byte:#010b}");
            } else {
                assert_ne!(back, byte, "shift {n} cannot restore {byte:#010b}");
            }
        }
    }
}

#[test]
fn buffer_application_matches_per_byte() {
    let bytes: Vec<u8> = (0..=255).collect();
    for op in [
        CandidateOp::RotateLeft(3),
        CandidateOp::RotateRight(6),
        CandidateOp::ShiftLeft(1),
        CandidateOp::ShiftRight(4),
    ] {
        let mut buffer = bytes.clone();
        op.apply_to_buffer(&mut buffer, &[]);
        for (i, &b) in buffer.iter().enumerate() {
            assert_eq!(b, op.apply(bytes[i], 0));
        }
    }
}

#[test]
fn display_names() {
    assert_eq!(CandidateOp::Xor.to_string(), "XOR with reference image");
    assert_eq!(CandidateOp::RotateLeft(3).to_string(), "rotate left 3 bits");
    assert_eq!(CandidateOp::ShiftRight(8).to_string(), "shift right 8 bits");
}
