//! Validation errors.

use genera_common::diagnostics::{Diagnostic, diagnostic_codes};
use genera_common::{Name, SourceSpan};
use genera_solver::SolverError;

pub type CheckResult<T> = Result<T, CheckError>;

/// A class failed validation.
///
/// `span` is where the failure is reported: the class for override
/// problems, the generalization (or else the class) for generalization
/// problems.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CheckError {
    #[error(
        "Property conflict on class {class}: property '{property}' defined on {specific} conflicts with property '{property}' defined on {general}"
    )]
    PropertyConflict {
        class: Name,
        property: Name,
        specific: Name,
        general: Name,
        span: Option<SourceSpan>,
    },

    #[error("Property conflict on class {class}: property '{property}' defined more than once")]
    DuplicateProperty {
        class: Name,
        property: Name,
        span: Option<SourceSpan>,
    },

    #[error(
        "Property conflict on class {class}: qualified property '{property}' defined more than once"
    )]
    DuplicateQualifiedProperty {
        class: Name,
        property: Name,
        span: Option<SourceSpan>,
    },

    #[error("Invalid generalization: {class} cannot extend {general} as it is not a Class")]
    InvalidGeneralization {
        class: Name,
        general: String,
        span: Option<SourceSpan>,
    },

    #[error("Class {class} extends {general} which contains a reference to {class} itself")]
    SelfReferentialGeneralization {
        class: Name,
        general: String,
        span: Option<SourceSpan>,
    },

    #[error(
        "Class {class} extends {general} which contains a reference to {subtype} which is a subtype of {class}"
    )]
    SubtypeReferentialGeneralization {
        class: Name,
        general: String,
        subtype: Name,
        span: Option<SourceSpan>,
    },

    /// The engine failed while validating a class; `span` is the class.
    #[error("{source}")]
    Solver {
        source: SolverError,
        span: Option<SourceSpan>,
    },
}

impl CheckError {
    pub(crate) fn solver(source: SolverError, span: Option<&SourceSpan>) -> Self {
        Self::Solver {
            source,
            span: span.cloned(),
        }
    }

    pub const fn code(&self) -> u32 {
        match self {
            Self::PropertyConflict { .. } => diagnostic_codes::PROPERTY_OVERRIDE_CONFLICT,
            Self::DuplicateProperty { .. } => diagnostic_codes::DUPLICATE_PROPERTY,
            Self::DuplicateQualifiedProperty { .. } => diagnostic_codes::DUPLICATE_QUALIFIED_PROPERTY,
            Self::InvalidGeneralization { .. } => diagnostic_codes::INVALID_GENERALIZATION,
            Self::SelfReferentialGeneralization { .. } => {
                diagnostic_codes::SELF_REFERENTIAL_GENERALIZATION
            }
            Self::SubtypeReferentialGeneralization { .. } => {
                diagnostic_codes::SUBTYPE_REFERENTIAL_GENERALIZATION
            }
            Self::Solver { source, .. } => source.code(),
        }
    }

    pub fn span(&self) -> Option<&SourceSpan> {
        match self {
            Self::PropertyConflict { span, .. }
            | Self::DuplicateProperty { span, .. }
            | Self::DuplicateQualifiedProperty { span, .. }
            | Self::InvalidGeneralization { span, .. }
            | Self::SelfReferentialGeneralization { span, .. }
            | Self::SubtypeReferentialGeneralization { span, .. } => span.as_ref(),
            Self::Solver { source, span } => source.span().or(span.as_ref()),
        }
    }

    /// Engine errors keep their own location and fall back to the class.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Self::Solver { source, span } => source.to_diagnostic(span.as_ref()),
            _ => Diagnostic::error_at(self.span(), self.to_string(), self.code()),
        }
    }
}

#[cfg(test)]
#[path = "../tests/error_tests.rs"]
mod tests;
