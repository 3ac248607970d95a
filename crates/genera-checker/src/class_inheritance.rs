//! Generalization validation.
//!
//! Each generalization edge must target a class, and its type arguments may
//! not mention the extending class or any of its subtypes (`Nil` excepted).
//! Only type arguments are followed, not function signatures.
//! A class passing the edge checks must also have a C3 linearization, which
//! is where cycles and inconsistent orders surface.

use crate::error::{CheckError, CheckResult};
use crate::validator::ClassValidator;
use genera_common::SourceSpan;
use genera_solver::{ClassDef, ClassId, GenericType, RawType};
use indexmap::IndexSet;

impl ClassValidator<'_> {
    pub(crate) fn check_generalizations(&self, id: ClassId, def: &ClassDef) -> CheckResult<()> {
        for generalization in &def.generalizations {
            let span = generalization.span.as_ref().or(def.span.as_ref());
            self.check_generalization(id, def, &generalization.general, span)?;
        }

        self.solver
            .class_linearization(id)
            .map_err(|err| CheckError::solver(err, def.span.as_ref()))?;
        Ok(())
    }

    fn check_generalization(
        &self,
        id: ClassId,
        def: &ClassDef,
        general: &GenericType,
        span: Option<&SourceSpan>,
    ) -> CheckResult<()> {
        if !matches!(general.raw(), Some(RawType::Class(_))) {
            return Err(CheckError::InvalidGeneralization {
                class: def.name.clone(),
                general: self.solver.print(general),
                span: span.cloned(),
            });
        }

        let mut referenced = IndexSet::new();
        for argument in general.type_arguments() {
            collect_referenced_classes(argument, &mut referenced);
        }

        let bottom = self.solver.db().bottom();
        for class in referenced {
            if class == bottom {
                continue;
            }
            if class == id {
                return Err(CheckError::SelfReferentialGeneralization {
                    class: def.name.clone(),
                    general: self.solver.print(general),
                    span: span.cloned(),
                });
            }
            let is_subtype = self
                .solver
                .class_is_subtype(class, id)
                .map_err(|err| CheckError::solver(err, span))?;
            if is_subtype {
                return Err(CheckError::SubtypeReferentialGeneralization {
                    class: def.name.clone(),
                    general: self.solver.print(general),
                    subtype: self.class_name(class),
                    span: span.cloned(),
                });
            }
        }
        Ok(())
    }
}

/// Every class named by `generic_type` and, recursively, its type
/// arguments. Function types are opaque: classes named only in their
/// parameters or return are not collected.
fn collect_referenced_classes(generic_type: &GenericType, classes: &mut IndexSet<ClassId>) {
    if let Some(RawType::Class(id)) = generic_type.raw() {
        classes.insert(*id);
    }
    for argument in generic_type.type_arguments() {
        collect_referenced_classes(argument, classes);
    }
}

#[cfg(test)]
#[path = "../tests/class_inheritance_tests.rs"]
mod tests;
