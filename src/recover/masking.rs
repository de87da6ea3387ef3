// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/demask

//! The masking checksum and its inverse.
//!
//! A fingerprint sums a mask-sized window of the image buffer with the mask,
//! byte for byte, starting at a seed offset. The sums are unbounded — they
//! may exceed 255 and are stored as such, which is what makes the record an
//! exact side channel: subtracting the mask modulo 256 recovers the window
//! bytes precisely.

use super::error::{RecoverError, Result};
use super::record::MaskRecord;
use crate::bmp::PixelBuffer;

/// Compute the masking fingerprint of `buffer` at `seed`.
///
/// `entries[p] = (buffer[seed+3p] + mask[3p], …)` with plain integer
/// addition, one triple per mask pixel.
///
/// # Errors
/// [`RecoverError::SizeMismatch`] if the buffer cannot hold a full mask
/// window at `seed` (byte-count check, not geometric overlap).
pub fn fingerprint(buffer: &[u8], mask: &PixelBuffer, seed: usize) -> Result<MaskRecord> {
    let window = mask.byte_len();
    let end = seed.checked_add(window).filter(|&end| end <= buffer.len()).ok_or(
        RecoverError::SizeMismatch {
            required: seed.saturating_add(window),
            available: buffer.len(),
        },
    )?;

    let entries = buffer[seed..end]
        .chunks_exact(3)
        .zip(mask.data.chunks_exact(3))
        .map(|(px, m)| {
            [
                u32::from(px[0]) + u32::from(m[0]),
                u32::from(px[1]) + u32::from(m[1]),
                u32::from(px[2]) + u32::from(m[2]),
            ]
        })
        .collect();

    Ok(MaskRecord { seed, entries })
}

/// Invert a recorded fingerprint back into the raw window bytes.
///
/// `byte[k] = (entry[k] - mask[k]) mod 256`, wrapping on negative. Exact as
/// long as the record was produced by the same mask at the same positions.
///
/// # Errors
/// [`RecoverError::SizeMismatch`] if the record's entry count differs from
/// the mask's pixel count.
pub fn unmask(record: &MaskRecord, mask: &PixelBuffer) -> Result<Vec<u8>> {
    if record.entries.len() != mask.pixel_count() {
        return Err(RecoverError::SizeMismatch {
            required: mask.byte_len(),
            available: record.byte_len(),
        });
    }

    let mut bytes = Vec::with_capacity(record.byte_len());
    for (entry, m) in record.entries.iter().zip(mask.data.chunks_exact(3)) {
        for channel in 0..3 {
            let value = (i64::from(entry[channel]) - i64::from(m[channel])).rem_euclid(256);
            bytes.push(value as u8);
        }
    }
    Ok(bytes)
}

/// Result of a [`patch`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The whole payload was written.
    Complete,
    /// The payload would have run past the buffer end; only the first
    /// `written` bytes were applied. Advisory, never fatal.
    Truncated {
        /// Bytes actually written.
        written: usize,
    },
}

/// Overwrite `buffer[seed..seed + payload.len()]` with `payload`, in place,
/// stopping at the buffer end rather than writing out of bounds.
pub fn patch(buffer: &mut [u8], payload: &[u8], seed: usize) -> PatchOutcome {
    let start = seed.min(buffer.len());
    let room = buffer.len() - start;
    if room >= payload.len() {
        buffer[start..start + payload.len()].copy_from_slice(payload);
        PatchOutcome::Complete
    } else {
        buffer[start..].copy_from_slice(&payload[..room]);
        PatchOutcome::Truncated { written: room }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant_mask(width: u32, height: u32, value: u8) -> PixelBuffer {
        let len = width as usize * height as usize * 3;
        PixelBuffer::from_raw(width, height, vec![value; len]).unwrap()
    }

    #[test]
    fn all_tens_scenario() {
        // 4x4 buffer of 10s, 2x2 mask of 5s, seed 0: four (15,15,15) entries.
        let buffer = vec![10u8; 4 * 4 * 3];
        let mask = constant_mask(2, 2, 5);
        let record = fingerprint(&buffer, &mask, 0).unwrap();
        assert_eq!(record.entries, vec![[15, 15, 15]; 4]);

        let recovered = unmask(&record, &mask).unwrap();
        assert_eq!(recovered, vec![10u8; 12]);
    }

    #[test]
    fn sums_are_not_clamped() {
        let buffer = vec![250u8; 3];
        let mask = constant_mask(1, 1, 200);
        let record = fingerprint(&buffer, &mask, 0).unwrap();
        assert_eq!(record.entries, vec![[450, 450, 450]]);
        assert_eq!(unmask(&record, &mask).unwrap(), vec![250u8; 3]);
    }

    #[test]
    fn fingerprint_rejects_short_buffer() {
        let buffer = vec![0u8; 9];
        let mask = constant_mask(2, 2, 0);
        match fingerprint(&buffer, &mask, 0) {
            Err(RecoverError::SizeMismatch { required, available }) => {
                assert_eq!(required, 12);
                assert_eq!(available, 9);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn fingerprint_rejects_large_seed() {
        let buffer = vec![0u8; 12];
        let mask = constant_mask(2, 2, 0);
        assert!(fingerprint(&buffer, &mask, 1).is_err());
    }

    #[test]
    fn unmask_rejects_entry_count_mismatch() {
        let mask = constant_mask(2, 2, 0);
        let record = MaskRecord { seed: 0, entries: vec![[1, 1, 1]; 3] };
        assert!(matches!(unmask(&record, &mask), Err(RecoverError::SizeMismatch { .. })));
    }

    #[test]
    fn patch_writes_in_place() {
        let mut buffer = vec![0u8; 8];
        assert_eq!(patch(&mut buffer, &[1, 2, 3], 2), PatchOutcome::Complete);
        assert_eq!(buffer, vec![0, 0, 1, 2, 3, 0, 0, 0]);
    }

    #[test]
    fn patch_truncates_at_buffer_end() {
        let mut buffer = vec![0u8; 4];
        assert_eq!(patch(&mut buffer, &[9, 9, 9], 2), PatchOutcome::Truncated { written: 2 });
        assert_eq!(buffer, vec![0, 0, 9, 9]);
    }

    #[test]
    fn patch_past_end_writes_nothing() {
        let mut buffer = vec![7u8; 4];
        assert_eq!(patch(&mut buffer, &[1], 10), PatchOutcome::Truncated { written: 0 });
        assert_eq!(buffer, vec![7u8; 4]);
    }
}
