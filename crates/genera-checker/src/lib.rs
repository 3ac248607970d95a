//! Class validation for genera models.
//!
//! Built on the `genera-solver` engine, this crate decides whether a class
//! is well formed:
//! - its generalizations target classes, do not reference the class itself
//!   or its subtypes through type arguments, and admit a C3 linearization
//! - properties redeclared along the resolution order are legal overrides
//! - no class declares the same property twice
//!
//! Failures are [`CheckError`]s and convert to the shared
//! [`Diagnostic`](genera_common::Diagnostic) shape.

mod class_inheritance;
mod class_overrides;
pub mod error;
pub mod options;
mod validator;

pub use error::{CheckError, CheckResult};
pub use options::CheckerOptions;
pub use validator::{ClassValidator, validate_class, validate_model};

#[cfg(test)]
#[path = "../tests/fixtures.rs"]
pub(crate) mod fixtures;
