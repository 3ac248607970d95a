//! Class validation driver.
//!
//! [`ClassValidator`] runs the per-class checks (generalization edges in
//! `class_inheritance.rs`, property overrides in `class_overrides.rs`) and
//! stops at the first failure of a class. [`validate_model`] validates many
//! classes, on the rayon pool when the options allow it, and reports one
//! diagnostic per failing class.

use crate::error::{CheckError, CheckResult};
use crate::options::CheckerOptions;
use genera_common::{Diagnostic, Name};
use genera_solver::{ClassDef, ClassId, GenericTypeSolver, SolverError, TypeModel};
use rayon::prelude::*;
use std::sync::Arc;
use tracing::{debug, trace};

pub struct ClassValidator<'a> {
    pub(crate) solver: GenericTypeSolver<'a>,
    options: &'a CheckerOptions,
}

impl<'a> ClassValidator<'a> {
    pub fn new(db: &'a dyn TypeModel, options: &'a CheckerOptions) -> Self {
        Self {
            solver: GenericTypeSolver::new(db),
            options,
        }
    }

    pub fn options(&self) -> &CheckerOptions {
        self.options
    }

    /// Validate one class.
    pub fn validate(&self, id: ClassId) -> CheckResult<()> {
        let def = self.class_def(id)?;
        trace!(class = %def.name, "validating class");

        let result = self.run_checks(id, &def);
        if let Err(err) = &result {
            debug!(class = %def.name, code = err.code(), error = %err, "class validation failed");
        }
        result
    }

    fn run_checks(&self, id: ClassId, def: &ClassDef) -> CheckResult<()> {
        if self.options.validate_generalizations {
            self.check_generalizations(id, def)?;
        }
        if self.options.validate_overrides {
            self.check_property_overrides(id, def)?;
        }
        Ok(())
    }

    pub(crate) fn class_def(&self, id: ClassId) -> CheckResult<Arc<ClassDef>> {
        self.solver
            .db()
            .class(id)
            .ok_or_else(|| CheckError::solver(SolverError::UnknownClass(id.to_string()), None))
    }

    pub(crate) fn class_name(&self, id: ClassId) -> Name {
        self.solver
            .db()
            .class(id)
            .map_or_else(|| Name::from(id.to_string()), |def| def.name.clone())
    }
}

/// Validate one class with `options`.
pub fn validate_class(db: &dyn TypeModel, id: ClassId, options: &CheckerOptions) -> CheckResult<()> {
    ClassValidator::new(db, options).validate(id)
}

/// Validate `classes`, returning a diagnostic for each class that fails,
/// in the order of `classes`.
pub fn validate_model(
    db: &dyn TypeModel,
    classes: &[ClassId],
    options: &CheckerOptions,
) -> Vec<Diagnostic> {
    let validator = ClassValidator::new(db, options);
    let check = |id: &ClassId| validator.validate(*id).err().map(|err| err.to_diagnostic());

    let diagnostics: Vec<Diagnostic> = if options.parallel {
        classes.par_iter().filter_map(check).collect()
    } else {
        classes.iter().filter_map(check).collect()
    };
    debug!(
        classes = classes.len(),
        failures = diagnostics.len(),
        parallel = options.parallel,
        "model validation finished"
    );
    diagnostics
}

#[cfg(test)]
#[path = "../tests/validator_tests.rs"]
mod tests;
