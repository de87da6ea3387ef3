// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/demask

//! Single-candidate verification against a stage's recorded fingerprint.
//!
//! A trial runs on its own copy of the working buffer, so a failed candidate
//! never leaks partially-applied state into the next one — there is no
//! rollback step, only a discarded copy. This matters for shifts, whose
//! inverse is lossy and cannot undo itself.

use std::path::Path;

use tracing::{debug, warn};

use super::error::Result;
use super::masking;
use super::ops::CandidateOp;
use super::record::MaskRecord;
use crate::bmp::PixelBuffer;

/// Test whether `op` is the forward operation a stage applied.
///
/// Applies `op.inverse()` to a copy of `working`, fingerprints the result at
/// `target.seed`, persists the fresh fingerprint to the shared `scratch`
/// artifact, and compares it against `target`: entry count first (fast
/// rejection), then every triple in order, short-circuiting on the first
/// mismatch.
///
/// Returns the transformed buffer on a match — it is the recovered state of
/// the previous stage. An XOR trial whose reference image does not cover the
/// working buffer is skipped with a warning rather than failing the search.
///
/// # Errors
/// - [`RecoverError::SizeMismatch`](super::error::RecoverError::SizeMismatch)
///   if the mask window does not fit the buffer at `target.seed` — this
///   would fail identically for all 33 candidates, so it aborts the search.
/// - [`RecoverError::Io`](super::error::RecoverError::Io) if the scratch
///   artifact cannot be written.
pub fn try_candidate(
    working: &[u8],
    reference: &PixelBuffer,
    mask: &PixelBuffer,
    target: &MaskRecord,
    op: CandidateOp,
    scratch: &Path,
) -> Result<Option<Vec<u8>>> {
    if op.uses_reference() && reference.byte_len() != working.len() {
        warn!(
            op = %op,
            reference = reference.byte_len(),
            working = working.len(),
            "reference image does not match working buffer; skipping candidate"
        );
        return Ok(None);
    }

    let mut trial = working.to_vec();
    op.inverse().apply_to_buffer(&mut trial, &reference.data);

    let computed = masking::fingerprint(&trial, mask, target.seed)?;
    computed.write_to(scratch)?;

    if computed.entries.len() != target.entries.len() {
        debug!(op = %op, computed = computed.entries.len(), target = target.entries.len(), "entry count mismatch");
        return Ok(None);
    }
    for (got, want) in computed.entries.iter().zip(&target.entries) {
        if got != want {
            return Ok(None);
        }
    }

    Ok(Some(trial))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("demask-verify-{name}-{}.txt", std::process::id()))
    }

    fn buffer_image(width: u32, height: u32, fill: impl Fn(usize) -> u8) -> PixelBuffer {
        let len = width as usize * height as usize * 3;
        PixelBuffer::from_raw(width, height, (0..len).map(fill).collect()).unwrap()
    }

    #[test]
    fn identifies_a_rotation() {
        let original = buffer_image(4, 4, |i| (i * 37 + 11) as u8);
        let reference = buffer_image(4, 4, |_| 0);
        let mask = buffer_image(2, 2, |i| (i * 3) as u8);

        // Forward: fingerprint the original, then rotate right 5.
        let target = masking::fingerprint(&original.data, &mask, 6).unwrap();
        let mut distorted = original.data.clone();
        CandidateOp::RotateRight(5).apply_to_buffer(&mut distorted, &[]);

        let scratch = scratch_path("rot");
        let miss = try_candidate(&distorted, &reference, &mask, &target, CandidateOp::RotateRight(1), &scratch)
            .unwrap();
        assert!(miss.is_none());

        let hit = try_candidate(&distorted, &reference, &mask, &target, CandidateOp::RotateRight(5), &scratch)
            .unwrap()
            .expect("rotation should verify");
        assert_eq!(hit, original.data);
        let _ = std::fs::remove_file(scratch);
    }

    #[test]
    fn xor_skipped_on_reference_mismatch() {
        let working = vec![1u8; 12];
        let reference = buffer_image(1, 1, |_| 0); // 3 bytes, too small
        let mask = buffer_image(1, 1, |_| 0);
        let target = MaskRecord { seed: 0, entries: vec![[1, 1, 1]] };

        let scratch = scratch_path("xor-skip");
        let result = try_candidate(&working, &reference, &mask, &target, CandidateOp::Xor, &scratch).unwrap();
        assert!(result.is_none());
        let _ = std::fs::remove_file(scratch);
    }
}
