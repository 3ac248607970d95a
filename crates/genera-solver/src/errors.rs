//! Solver errors.
//!
//! Every failure of the engine is a [`SolverError`]. Messages embed printed
//! generic types, so errors are self-contained and can be reported after the
//! model they came from is gone. [`SolverError::to_diagnostic`] converts them
//! into the shared diagnostic shape.

use genera_common::diagnostics::{Diagnostic, diagnostic_codes};
use genera_common::{Name, SourceSpan};

pub type SolverResult<T> = Result<T, SolverError>;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SolverError {
    /// A generic type carries a different number of type arguments than its
    /// raw type declares.
    #[error("Type argument mismatch for {raw_type}; got: {generic_type}")]
    ArgumentCountMismatch {
        raw_type: String,
        generic_type: String,
        span: Option<SourceSpan>,
    },

    #[error("Multiplicity argument mismatch for {raw_type}; got: {generic_type}")]
    MultiplicityArgumentCountMismatch {
        raw_type: String,
        generic_type: String,
        span: Option<SourceSpan>,
    },

    /// Two inheritance paths bind the same parameter incompatibly.
    #[error(
        "Diamond inheritance error! '{first}' is not compatible with '{second}' going from '{from}' to '{to}'"
    )]
    DiamondInheritance {
        first: String,
        second: String,
        from: String,
        to: String,
        span: Option<SourceSpan>,
    },

    #[error("'{from}' does not generalize to '{to}'")]
    NoGeneralizationPath {
        from: String,
        to: String,
        span: Option<SourceSpan>,
    },

    #[error("Malformed model: cyclic generalization through {class}")]
    CyclicGeneralization {
        class: Name,
        span: Option<SourceSpan>,
    },

    #[error("Generalization hierarchy of {class} is deeper than {limit} levels")]
    GeneralizationTooDeep {
        class: Name,
        limit: u32,
        span: Option<SourceSpan>,
    },

    /// No C3 linearization exists.
    #[error("Inconsistent generalization hierarchy for {class}{}", root_suffix(.path))]
    InconsistentGeneralizationHierarchy {
        class: Name,
        /// Classes from `class` down to the root inconsistent class.
        path: Vec<Name>,
        span: Option<SourceSpan>,
    },

    #[error("Cannot determine subsumption for non-concrete multiplicity: {multiplicity}")]
    NonConcreteMultiplicity { multiplicity: String },

    #[error("Unknown class: {0}")]
    UnknownClass(String),

    #[error("Type parameter '{parameter}' is not bound for {generic_type}")]
    UnboundTypeParameter {
        parameter: Name,
        generic_type: String,
        span: Option<SourceSpan>,
    },
}

fn root_suffix(path: &[Name]) -> String {
    match path.last() {
        Some(root) if path.len() > 1 => format!(
            "; root inconsistent class: {root}; path to root class: {}",
            path.join(", ")
        ),
        _ => String::new(),
    }
}

impl SolverError {
    /// Stable diagnostic code.
    pub const fn code(&self) -> u32 {
        match self {
            Self::ArgumentCountMismatch { .. } => diagnostic_codes::TYPE_ARGUMENT_COUNT_MISMATCH,
            Self::MultiplicityArgumentCountMismatch { .. } => {
                diagnostic_codes::MULTIPLICITY_ARGUMENT_COUNT_MISMATCH
            }
            Self::DiamondInheritance { .. } => diagnostic_codes::DIAMOND_INHERITANCE,
            Self::NoGeneralizationPath { .. } => diagnostic_codes::NO_GENERALIZATION_PATH,
            Self::CyclicGeneralization { .. } => diagnostic_codes::CYCLIC_GENERALIZATION,
            Self::GeneralizationTooDeep { .. } => diagnostic_codes::GENERALIZATION_TOO_DEEP,
            Self::InconsistentGeneralizationHierarchy { .. } => {
                diagnostic_codes::INCONSISTENT_GENERALIZATION_HIERARCHY
            }
            Self::NonConcreteMultiplicity { .. } => diagnostic_codes::NON_CONCRETE_MULTIPLICITY,
            Self::UnknownClass(_) => diagnostic_codes::UNKNOWN_CLASS,
            Self::UnboundTypeParameter { .. } => diagnostic_codes::UNBOUND_TYPE_PARAMETER,
        }
    }

    /// Source location of the node that failed, if it had one.
    pub fn span(&self) -> Option<&SourceSpan> {
        match self {
            Self::ArgumentCountMismatch { span, .. }
            | Self::MultiplicityArgumentCountMismatch { span, .. }
            | Self::DiamondInheritance { span, .. }
            | Self::NoGeneralizationPath { span, .. }
            | Self::CyclicGeneralization { span, .. }
            | Self::GeneralizationTooDeep { span, .. }
            | Self::InconsistentGeneralizationHierarchy { span, .. }
            | Self::UnboundTypeParameter { span, .. } => span.as_ref(),
            Self::NonConcreteMultiplicity { .. } | Self::UnknownClass(_) => None,
        }
    }

    /// Convert to a diagnostic, located at the error's own span or else at
    /// `fallback`.
    pub fn to_diagnostic(&self, fallback: Option<&SourceSpan>) -> Diagnostic {
        Diagnostic::error_at(self.span().or(fallback), self.to_string(), self.code())
    }
}

#[cfg(test)]
#[path = "../tests/errors_tests.rs"]
mod tests;
