// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/demask

//! The stage-reversal search engine.
//!
//! An image was distorted by a chain of per-byte bitwise stages (XOR with a
//! reference image, rotations, shifts). Each forward stage first recorded a
//! masking fingerprint — checksum sums of a mask-sized window of the current
//! buffer — then applied its operation. Those records are the side channel
//! this module exploits:
//!
//! - [`masking`] computes fingerprints and inverts recorded ones back into
//!   raw window bytes;
//! - [`ops`] is the closed catalog of 33 candidate operations;
//! - [`verify`] tests one candidate against a stage's recorded fingerprint;
//! - [`pipeline`] drives the stages last-to-first: unmask and patch, then
//!   brute-force the stage's operation, then commit the recovered buffer.
//!
//! Accuracy limit: shift stages destroy bits. The checksum oracle can still
//! identify a shift, and the patched window is exact, but bytes outside the
//! window keep only what the opposite shift restores.

pub mod error;
pub mod masking;
pub mod ops;
pub mod pipeline;
pub mod record;
pub mod verify;

use std::path::Path;

pub use error::{RecoverError, Result};
pub use ops::CandidateOp;
pub use pipeline::{RecoveryPlan, StageArtifacts, StageReport};
pub use record::MaskRecord;

/// Reconstruct an image from a working directory laid out with the
/// conventional file names (see [`RecoveryPlan::with_conventions`]).
///
/// # Errors
/// See [`pipeline::run`].
pub fn recover(dir: &Path, stage_count: u32) -> Result<Vec<StageReport>> {
    pipeline::run(&RecoveryPlan::with_conventions(dir, stage_count))
}
