//! Source location metadata attached to model nodes.
//!
//! Spans are carried through the engine only so diagnostics can point at the
//! offending declaration. They never participate in structural equality.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A byte range inside a named source file.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceSpan {
    pub file: Arc<str>,
    pub start: u32,
    pub length: u32,
}

impl SourceSpan {
    pub fn new(file: impl Into<Arc<str>>, start: u32, length: u32) -> Self {
        Self {
            file: file.into(),
            start,
            length,
        }
    }

    /// Exclusive end offset.
    #[inline]
    pub const fn end(&self) -> u32 {
        self.start.saturating_add(self.length)
    }
}

impl fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}..{}", self.file, self.start, self.end())
    }
}

#[cfg(test)]
#[path = "../tests/span_tests.rs"]
mod tests;
