//! Diagnostic types for the solver and the checker.
//!
//! Message text comes from the `Display` impls of `SolverError` and
//! `CheckError`; this module only fixes the codes and the output shape.

use crate::span::SourceSpan;
use serde::Serialize;

pub mod diagnostic_codes {
    // Solver: structural malformation and resolution failures (1xxx)
    pub const TYPE_ARGUMENT_COUNT_MISMATCH: u32 = 1001;
    pub const MULTIPLICITY_ARGUMENT_COUNT_MISMATCH: u32 = 1002;
    pub const DIAMOND_INHERITANCE: u32 = 1003;
    pub const NO_GENERALIZATION_PATH: u32 = 1004;
    pub const CYCLIC_GENERALIZATION: u32 = 1005;
    pub const GENERALIZATION_TOO_DEEP: u32 = 1006;
    pub const INCONSISTENT_GENERALIZATION_HIERARCHY: u32 = 1007;
    pub const NON_CONCRETE_MULTIPLICITY: u32 = 1008;
    pub const UNKNOWN_CLASS: u32 = 1009;
    pub const UNBOUND_TYPE_PARAMETER: u32 = 1010;

    // Checker: class validation (2xxx)
    pub const PROPERTY_OVERRIDE_CONFLICT: u32 = 2001;
    pub const DUPLICATE_PROPERTY: u32 = 2002;
    pub const DUPLICATE_QUALIFIED_PROPERTY: u32 = 2003;
    pub const INVALID_GENERALIZATION: u32 = 2004;
    pub const SELF_REFERENTIAL_GENERALIZATION: u32 = 2005;
    pub const SUBTYPE_REFERENTIAL_GENERALIZATION: u32 = 2006;
}

// =============================================================================
// Diagnostic Types
// =============================================================================

/// Diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DiagnosticCategory {
    Warning = 0,
    Error = 1,
    Suggestion = 2,
    Message = 3,
}

/// A diagnostic produced by the engine or the validators.
///
/// `file` is empty when the failing node carried no source location.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
    pub category: DiagnosticCategory,
    pub code: u32,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    #[must_use]
    pub const fn error(file: String, start: u32, length: u32, message: String, code: u32) -> Self {
        Self {
            file,
            start,
            length,
            message_text: message,
            category: DiagnosticCategory::Error,
            code,
        }
    }

    /// Create an error diagnostic located at `span`, or unlocated when `span` is `None`.
    #[must_use]
    pub fn error_at(span: Option<&SourceSpan>, message: String, code: u32) -> Self {
        match span {
            Some(span) => Self::error(span.file.to_string(), span.start, span.length, message, code),
            None => Self::error(String::new(), 0, 0, message, code),
        }
    }

    /// Whether the diagnostic points at a source location.
    #[must_use]
    pub fn has_location(&self) -> bool {
        !self.file.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/diagnostics_tests.rs"]
mod tests;
