// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/demask

//! The per-stage masking artifact: a seed plus recorded checksum triples.
//!
//! File format (whitespace-delimited): the first token is the integer seed,
//! every following group of three tokens is one `(r, g, b)` checksum triple.
//! There is no count field — the entry count is however many complete
//! triples the file holds. The same format serves as the shared scratch
//! artifact rewritten on every verification trial.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use tracing::debug;

use super::error::{RecoverError, Result};

/// A parsed masking artifact: seed offset plus ordered checksum triples.
///
/// Entries are unbounded sums — values above 255 are expected and kept
/// as-is. They are checksums, not pixel values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskRecord {
    /// Byte offset into a flattened image buffer where the mask window starts.
    pub seed: usize,
    /// Recorded `(r, g, b)` sums, one per mask pixel.
    pub entries: Vec<[u32; 3]>,
}

impl MaskRecord {
    /// Byte count of the window this record describes (`entries * 3`).
    pub fn byte_len(&self) -> usize {
        self.entries.len() * 3
    }

    /// Read and parse an artifact file.
    ///
    /// # Errors
    /// [`RecoverError::Io`] on read failure, otherwise the parse errors of
    /// [`MaskRecord::parse`].
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let record = Self::parse(&text)?;
        debug!(
            path = %path.display(),
            seed = record.seed,
            entries = record.entries.len(),
            first = ?record.entries.first(),
            "parsed masking artifact"
        );
        Ok(record)
    }

    /// Parse artifact text.
    ///
    /// # Errors
    /// - [`RecoverError::MissingSeed`] if the text holds no tokens.
    /// - [`RecoverError::InvalidToken`] on any non-integer token.
    /// - [`RecoverError::TruncatedTriple`] if 1 or 2 values trail the last
    ///   complete triple.
    pub fn parse(text: &str) -> Result<Self> {
        let mut tokens = text.split_whitespace();
        let seed_token = tokens.next().ok_or(RecoverError::MissingSeed)?;
        let seed = seed_token
            .parse::<usize>()
            .map_err(|_| RecoverError::InvalidToken(seed_token.to_string()))?;

        let mut values = Vec::new();
        for token in tokens {
            let value = token
                .parse::<u32>()
                .map_err(|_| RecoverError::InvalidToken(token.to_string()))?;
            values.push(value);
        }
        let leftover = values.len() % 3;
        if leftover != 0 {
            return Err(RecoverError::TruncatedTriple { leftover });
        }

        let entries = values.chunks_exact(3).map(|t| [t[0], t[1], t[2]]).collect();
        Ok(Self { seed, entries })
    }

    /// Write the artifact: seed on the first line, then one triple per line.
    ///
    /// # Errors
    /// [`RecoverError::Io`] on write failure.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let mut text = String::with_capacity(16 + self.entries.len() * 12);
        let _ = writeln!(text, "{}", self.seed);
        for [r, g, b] in &self.entries {
            let _ = writeln!(text, "{r} {g} {b}");
        }
        fs::write(path, text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_seed_and_triples() {
        let record = MaskRecord::parse("12\n15 300 7\n1 2 3\n").unwrap();
        assert_eq!(record.seed, 12);
        assert_eq!(record.entries, vec![[15, 300, 7], [1, 2, 3]]);
        assert_eq!(record.byte_len(), 6);
    }

    #[test]
    fn count_is_derived_from_complete_triples() {
        let record = MaskRecord::parse("0 1 2 3 4 5 6 7 8 9").unwrap();
        assert_eq!(record.entries.len(), 3);
    }

    #[test]
    fn empty_artifact_is_missing_seed() {
        assert!(matches!(MaskRecord::parse("  \n"), Err(RecoverError::MissingSeed)));
    }

    #[test]
    fn non_integer_token_rejected() {
        match MaskRecord::parse("5\n1 2 x\n") {
            Err(RecoverError::InvalidToken(t)) => assert_eq!(t, "x"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn partial_triple_rejected() {
        match MaskRecord::parse("5\n1 2 3\n4 5\n") {
            Err(RecoverError::TruncatedTriple { leftover }) => assert_eq!(leftover, 2),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn serialize_parse_round_trip() {
        let record = MaskRecord { seed: 99, entries: vec![[510, 0, 255], [1, 2, 3]] };
        let text = "99\n510 0 255\n1 2 3\n";
        assert_eq!(MaskRecord::parse(text).unwrap(), record);
    }
}
