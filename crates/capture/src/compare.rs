// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Exact, ordered comparison of captured output against a reference.

use serde::Serialize;

use crate::lines::LineSequence;

/// Whether `candidate` equals `reference` line for line.
///
/// No normalization: lines are compared as raw bytes, so whitespace,
/// carriage returns, case and invalid UTF-8 all count.
pub fn compare(candidate: &LineSequence, reference: &LineSequence) -> bool {
    candidate.len() == reference.len() && candidate.bytes().eq(reference.bytes())
}

/// Outcome of one comparison, kept together with its inputs for reporting.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ComparisonResult {
    matched: bool,
    reference: LineSequence,
    candidate: LineSequence,
}

impl ComparisonResult {
    pub fn new(candidate: LineSequence, reference: LineSequence) -> Self {
        Self {
            matched: compare(&candidate, &reference),
            reference,
            candidate,
        }
    }

    pub fn matched(&self) -> bool {
        self.matched
    }

    pub fn candidate(&self) -> &LineSequence {
        &self.candidate
    }

    pub fn reference(&self) -> &LineSequence {
        &self.reference
    }

    /// Zero-based index of the first line that differs, if any.
    ///
    /// When one sequence is a prefix of the other this is the length of the
    /// shorter one.
    pub fn first_difference(&self) -> Option<usize> {
        if self.matched {
            return None;
        }
        let shared = self.candidate.len().min(self.reference.len());
        let index = self
            .candidate
            .bytes()
            .zip(self.reference.bytes())
            .position(|(a, b)| a != b)
            .unwrap_or(shared);
        Some(index)
    }
}

#[cfg(test)]
#[path = "compare_tests.rs"]
mod tests;
