// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Line-oriented draining of byte streams.

use std::io::{BufRead, BufReader, Read};
use std::ops::Deref;

use serde::{Serialize, Serializer};

const LINE_TERMINATOR: u8 = b'\n';
const READ_CHUNK: usize = 8 * 1024;

/// Ordered lines with their terminators stripped.
///
/// Lines keep the exact bytes that were read. Equality is byte equality;
/// the text view (via `Deref`, iteration and serialization) replaces
/// invalid UTF-8 with U+FFFD and is meant for display only.
#[derive(Clone, Debug, Default)]
pub struct LineSequence {
    text: Vec<String>,
    /// Original bytes of lines that were not valid UTF-8, by index.
    raw: Vec<Option<Vec<u8>>>,
}

impl LineSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.text
    }

    pub fn into_vec(self) -> Vec<String> {
        self.text
    }

    /// The bytes of each line exactly as read.
    pub fn bytes(&self) -> impl ExactSizeIterator<Item = &[u8]> + '_ {
        self.text
            .iter()
            .zip(&self.raw)
            .map(|(text, raw)| raw.as_deref().unwrap_or(text.as_bytes()))
    }

    fn push_bytes(&mut self, bytes: Vec<u8>) {
        match String::from_utf8(bytes) {
            Ok(text) => {
                self.text.push(text);
                self.raw.push(None);
            }
            Err(err) => {
                let bytes = err.into_bytes();
                self.text.push(String::from_utf8_lossy(&bytes).into_owned());
                self.raw.push(Some(bytes));
            }
        }
    }
}

impl PartialEq for LineSequence {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.bytes().eq(other.bytes())
    }
}

impl Eq for LineSequence {}

impl Deref for LineSequence {
    type Target = [String];

    fn deref(&self) -> &[String] {
        &self.text
    }
}

impl<S: Into<String>> FromIterator<S> for LineSequence {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let text: Vec<String> = iter.into_iter().map(Into::into).collect();
        let raw = vec![None; text.len()];
        Self { text, raw }
    }
}

impl IntoIterator for LineSequence {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.text.into_iter()
    }
}

impl Serialize for LineSequence {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.text)
    }
}

/// Read `source` to end-of-stream, splitting on `\n`.
///
/// A trailing unterminated fragment becomes the last line; a trailing
/// terminator does not add an empty one. Bytes are kept as read, so
/// invalid UTF-8 still compares exactly. Blocks until every writer has
/// closed the stream.
pub fn drain<R: Read>(source: R) -> std::io::Result<LineSequence> {
    let reader = BufReader::with_capacity(READ_CHUNK, source);
    let mut lines = LineSequence::new();
    for chunk in reader.split(LINE_TERMINATOR) {
        lines.push_bytes(chunk?);
    }
    Ok(lines)
}

#[cfg(test)]
#[path = "lines_tests.rs"]
mod tests;
