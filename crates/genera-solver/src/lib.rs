//! Generic Type Resolution Engine
//!
//! Answers three questions about a modeled, nominally typed language with
//! multiple inheritance, parametric types and parametric multiplicities:
//!
//! - **Substitution**: what are an ancestor's type and multiplicity arguments
//!   when seen from an instantiated descendant ([`GenericTypeSolver::resolve_type_params`])
//! - **Variance**: is one generic type usable where another is expected
//!   ([`GenericTypeSolver::is_compatible`])
//! - **Join/meet**: what is the best common supertype or subtype of a set of
//!   generic types ([`GenericTypeSolver::best_common_type`])
//!
//! The engine reads classes through the [`TypeModel`] trait and never
//! mutates them; every entry point is a function of its inputs plus the
//! model.
mod bindings;
mod compat;
pub mod errors;
pub mod format;
mod join;
mod linearize;
pub mod model;
pub mod multiplicity;
pub mod recursion;
mod solver;
mod substitute;
pub mod types;

pub use bindings::{
    Bindings, GenericTypeWithBindings, MultiplicityBindings, MultiplicityWithBindings,
    TypeBindings,
};
pub use errors::{SolverError, SolverResult};
pub use format::{TypeFormatter, print};
pub use model::{
    ClassDef, ClassId, Generalization, Member, ModelStore, Property, QualifiedProperty,
    TypeModel, TypeParameter,
};
pub use multiplicity::Multiplicity;
pub use solver::GenericTypeSolver;
pub use types::{
    FunctionParameter, FunctionType, GenericType, GenericTypeKind, RawType, generic_types_equal,
};

#[cfg(test)]
#[path = "../tests/fixtures.rs"]
pub(crate) mod fixtures;
// Per-module tests are loaded by their source files via #[path = "../tests/..."].
#[cfg(test)]
#[path = "../tests/integration_tests.rs"]
mod integration_tests;
