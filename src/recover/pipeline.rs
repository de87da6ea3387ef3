// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/demask

//! The stage controller: walks the distortion chain from the last stage to
//! the first, restoring the original image.
//!
//! Per stage, in order:
//!
//! 1. **Load** the stage's input image and, below the terminal stage, the
//!    next stage's mask record.
//! 2. **Unmask + patch**: invert the next stage's recorded checksums back
//!    into raw bytes and write them over the buffer at the recorded seed —
//!    this repairs the window the forward masking step clobbered. The
//!    terminal stage has no successor record, so the step is skipped there.
//! 3. **Persist + reload** the patched buffer. Verification always runs on
//!    a freshly decoded buffer, never on trusted in-memory state; the file
//!    doubles as a recovery checkpoint.
//! 4. **Search** the operation catalog in fixed order against the stage's
//!    own record. The first verified candidate wins; exhausting all 33 is
//!    fatal for the whole reconstruction.
//! 5. **Commit** the verified buffer — it is the input for the next lower
//!    stage, or the final reconstruction at stage 1.
//!
//! Buffers live only for one stage; nothing crosses stages except the files
//! written here.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::error::{RecoverError, Result};
use super::masking::{self, PatchOutcome};
use super::ops;
use super::record::MaskRecord;
use super::verify;
use crate::bmp::PixelBuffer;

/// Per-stage file locations.
#[derive(Debug, Clone)]
pub struct StageArtifacts {
    /// Stage ordinal, `1..=stage_count`.
    pub ordinal: u32,
    /// The stage's own mask record — the oracle for its candidate search.
    pub record: PathBuf,
    /// Where the patched pre-search buffer is persisted and reloaded.
    pub snapshot: PathBuf,
    /// Where the verified buffer is committed. Stage `t`'s committed output
    /// is stage `t-1`'s input; stage 1's is the final reconstruction.
    pub recovered: PathBuf,
}

/// Every path one recovery run touches.
#[derive(Debug, Clone)]
pub struct RecoveryPlan {
    /// The final transformed image — input of the highest stage.
    pub transformed: PathBuf,
    /// Reference image XORed against during the forward process.
    pub reference: PathBuf,
    /// Mask image used by the checksum arithmetic.
    pub mask: PathBuf,
    /// Shared scratch artifact, rewritten on every verification trial.
    pub scratch: PathBuf,
    /// Final reconstructed image (same path as stage 1's `recovered`).
    pub output: PathBuf,
    /// Stages in ascending ordinal order; `stages[t - 1].ordinal == t`.
    pub stages: Vec<StageArtifacts>,
}

impl RecoveryPlan {
    /// Derive a plan from a working directory using the conventional file
    /// names: `I_D.bmp` (transformed image), `I_M.bmp` (reference), `M.bmp`
    /// (mask), `M{t}.txt` (stage records), `validation.txt` (scratch), and
    /// `I_R.bmp` (reconstruction).
    pub fn with_conventions(dir: &Path, stage_count: u32) -> Self {
        let output = dir.join("I_R.bmp");
        let stages = (1..=stage_count)
            .map(|t| StageArtifacts {
                ordinal: t,
                record: dir.join(format!("M{t}.txt")),
                snapshot: dir.join(format!("stage_{t}_patched.bmp")),
                recovered: if t == 1 {
                    output.clone()
                } else {
                    dir.join(format!("stage_{t}_recovered.bmp"))
                },
            })
            .collect();
        Self {
            transformed: dir.join("I_D.bmp"),
            reference: dir.join("I_M.bmp"),
            mask: dir.join("M.bmp"),
            scratch: dir.join("validation.txt"),
            output,
            stages,
        }
    }

    /// Number of declared stages.
    pub fn stage_count(&self) -> u32 {
        self.stages.len() as u32
    }

    fn stage(&self, ordinal: u32) -> &StageArtifacts {
        &self.stages[(ordinal - 1) as usize]
    }

    /// Input image for a stage: the transformed image for the highest
    /// ordinal, otherwise the stage above's committed output.
    fn input_path(&self, ordinal: u32) -> &Path {
        if ordinal == self.stage_count() {
            &self.transformed
        } else {
            &self.stage(ordinal + 1).recovered
        }
    }
}

/// The operation identified for one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageReport {
    /// Stage ordinal.
    pub ordinal: u32,
    /// The forward operation the stage was found to have applied.
    pub operation: ops::CandidateOp,
}

/// Run the full reconstruction, highest stage first.
///
/// Returns one [`StageReport`] per stage in processing (descending) order.
/// On success the reconstructed image is at `plan.output`.
///
/// # Errors
/// - [`RecoverError::Codec`] if any image fails to decode or encode.
/// - [`RecoverError::NoMatchingOperation`] if a stage's catalog search is
///   exhausted — fatal, no partial reconstruction is attempted past it.
/// - Parse and I/O errors of the record artifacts.
pub fn run(plan: &RecoveryPlan) -> Result<Vec<StageReport>> {
    let reference = PixelBuffer::decode(&plan.reference)?;
    let mask = PixelBuffer::decode(&plan.mask)?;
    info!(
        stages = plan.stage_count(),
        reference = reference.byte_len(),
        mask = mask.byte_len(),
        "starting reconstruction"
    );

    let mut reports = Vec::with_capacity(plan.stages.len());
    for ordinal in (1..=plan.stage_count()).rev() {
        reports.push(run_stage(plan, &reference, &mask, ordinal)?);
    }
    Ok(reports)
}

fn run_stage(
    plan: &RecoveryPlan,
    reference: &PixelBuffer,
    mask: &PixelBuffer,
    ordinal: u32,
) -> Result<StageReport> {
    let stage = plan.stage(ordinal);

    // LOAD_STAGE
    let input = plan.input_path(ordinal);
    info!(stage = ordinal, input = %input.display(), "loading stage");
    let mut image = PixelBuffer::decode(input)?;

    // UNMASK_PATCH — the terminal stage has no successor record.
    if ordinal < plan.stage_count() {
        let next = plan.stage(ordinal + 1);
        let next_record = MaskRecord::from_path(&next.record)?;
        match masking::unmask(&next_record, mask) {
            Ok(payload) => {
                if let PatchOutcome::Truncated { written } =
                    masking::patch(&mut image.data, &payload, next_record.seed)
                {
                    warn!(
                        stage = ordinal,
                        seed = next_record.seed,
                        written,
                        payload = payload.len(),
                        "seed too large, possible overflow; patch truncated"
                    );
                }
            }
            Err(RecoverError::SizeMismatch { required, available }) => {
                warn!(
                    stage = ordinal,
                    required, available, "record does not match mask; skipping unmask step"
                );
            }
            Err(e) => return Err(e),
        }
    }

    // PERSIST_INTERMEDIATE + RELOAD
    image.encode(&stage.snapshot)?;
    let image = PixelBuffer::decode(&stage.snapshot)?;

    // SEARCH_OPERATION
    let target = MaskRecord::from_path(&stage.record)?;
    let mut matched = None;
    for op in ops::catalog() {
        if let Some(buffer) =
            verify::try_candidate(&image.data, reference, mask, &target, op, &plan.scratch)?
        {
            info!(stage = ordinal, op = %op, "operation identified");
            matched = Some((op, buffer));
            break;
        }
    }
    let (operation, recovered) =
        matched.ok_or(RecoverError::NoMatchingOperation { stage: ordinal })?;

    // COMMIT_STAGE
    let committed = PixelBuffer::from_raw(image.width(), image.height(), recovered)?;
    committed.encode(&stage.recovered)?;
    info!(stage = ordinal, output = %stage.recovered.display(), "stage committed");

    Ok(StageReport { ordinal, operation })
}
