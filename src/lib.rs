// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/demask

//! # demask-core
//!
//! Reconstructs an original BMP image after it has passed through an unknown
//! chain of per-byte bitwise transformations (XOR against a reference image,
//! bit rotations, bit shifts) interleaved with a checksum-producing masking
//! step. Given the final transformed image, the reference image, a small
//! mask image, and the per-stage masking records, the engine:
//!
//! 1. inverts each record back into the raw bytes the masking step
//!    overwrote and patches them into the buffer,
//! 2. brute-forces which operation each stage applied by re-deriving the
//!    masking checksum and comparing it to the recorded one,
//! 3. walks the stages from last to first until the original image is
//!    committed.
//!
//! The `bmp` module is I/O glue (flat RGB888 buffers over the `image`
//! crate); all the real work lives in `recover`.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use demask_core::recover;
//!
//! // Directory holds I_D.bmp, I_M.bmp, M.bmp and M1.txt..M4.txt.
//! let reports = recover::recover(std::path::Path::new("case1"), 4)?;
//! for r in &reports {
//!     println!("stage {}: {}", r.ordinal, r.operation);
//! }
//! ```

pub mod bmp;
pub mod recover;

pub use bmp::{BmpError, PixelBuffer};
pub use recover::{CandidateOp, MaskRecord, RecoverError, RecoveryPlan, StageReport};
