//! Variance and compatibility checks.
//!
//! `is_compatible(a, b, covariant)` asks whether `a` is usable where `b` is
//! declared (covariant) or whether `b` is usable where `a` is declared
//! (contravariant). Rules, in order:
//!
//! 1. structurally equal types are compatible;
//! 2. a type variable on either side is compatible;
//! 3. `Nil` on the source side or `Any` on the target side is compatible;
//! 4. function-capable raw types compare as functions: contravariant
//!    parameters, covariant return;
//! 5. otherwise the raw types must be related and every type argument of the
//!    supertype is checked with its parameter's variance.

use crate::errors::SolverResult;
use crate::model::ClassId;
use crate::solver::GenericTypeSolver;
use crate::types::{FunctionType, GenericType, RawType, generic_types_equal};
use tracing::trace;

impl GenericTypeSolver<'_> {
    /// Whether `a` is usable where `b` is declared (`covariant`), or `b`
    /// where `a` is declared (`!covariant`).
    ///
    /// Multiplicity arguments do not take part in the check.
    pub fn is_compatible(
        &self,
        a: &GenericType,
        b: &GenericType,
        covariant: bool,
    ) -> SolverResult<bool> {
        if generic_types_equal(a, b) {
            return Ok(true);
        }
        let (Some(a_raw), Some(b_raw)) = (a.raw(), b.raw()) else {
            return Ok(true);
        };

        let (source, target) = if covariant { (a, b) } else { (b, a) };
        let (source_raw, target_raw) = if covariant {
            (a_raw, b_raw)
        } else {
            (b_raw, a_raw)
        };
        if self.is_bottom_raw(source_raw) || self.is_top_raw(target_raw) {
            return Ok(true);
        }

        let source_is_function = self.is_function_capable(source_raw)?;
        let target_is_function = self.is_function_capable(target_raw)?;
        if source_is_function || target_is_function {
            if !(source_is_function && target_is_function) {
                return self.is_raw_subtype(source_raw, target_raw);
            }
            if !self.is_raw_subtype(source_raw, target_raw)? {
                return Ok(false);
            }
            return self.functions_compatible(source, target);
        }

        self.test_variance(a, b, covariant)
    }

    /// Function subtyping between two function-capable generic types.
    fn functions_compatible(&self, source: &GenericType, target: &GenericType) -> SolverResult<bool> {
        // Function<Any> accepts any function.
        let Some(target_function) = self.resolve_function_type(target)? else {
            return Ok(true);
        };
        let Some(source_function) = self.resolve_function_type(source)? else {
            return Ok(false);
        };
        self.function_types_compatible(&source_function, &target_function)
    }

    /// Whether a function of type `source` can be used where `target` is
    /// expected: same arity, every target parameter usable as the source's
    /// parameter, and the source's return usable as the target's.
    ///
    /// Untyped parameters or returns are not checked.
    pub fn function_types_compatible(
        &self,
        source: &FunctionType,
        target: &FunctionType,
    ) -> SolverResult<bool> {
        if source.parameters.len() != target.parameters.len() {
            return Ok(false);
        }
        for (source_parameter, target_parameter) in source.parameters.iter().zip(&target.parameters) {
            if let (Some(source_type), Some(target_type)) = (
                source_parameter.generic_type.as_ref(),
                target_parameter.generic_type.as_ref(),
            ) && !self.is_compatible(source_type, target_type, false)?
            {
                return Ok(false);
            }
        }
        match (source.return_type.as_ref(), target.return_type.as_ref()) {
            (Some(source_return), Some(target_return)) => {
                self.is_compatible(source_return, target_return, true)
            }
            _ => Ok(true),
        }
    }

    /// Rule 5: related raw types, then per-parameter variance over the
    /// arguments homogenized into the supertype's frame.
    fn test_variance(&self, a: &GenericType, b: &GenericType, covariant: bool) -> SolverResult<bool> {
        let (sub, sup) = if covariant { (a, b) } else { (b, a) };
        let (Some(sub_raw), Some(sup_raw)) = (sub.raw(), sup.raw()) else {
            return Ok(true);
        };
        if !self.is_raw_subtype(sub_raw, sup_raw)? {
            return Ok(false);
        }

        let sup_arguments = sup.type_arguments();
        let Some(sup_class) = sup.class_id() else {
            return Ok(true);
        };
        if sup_arguments.is_empty() {
            return Ok(true);
        }

        let def = self.class_def(sup_class)?;
        let homogenized = self.resolve_to_class(sub, sup_class)?;
        for (parameter, sup_argument) in def.type_parameters.iter().zip(sup_arguments) {
            let Some(sub_argument) = homogenized.argument(&parameter.name) else {
                continue;
            };
            let (a_argument, b_argument) = if covariant {
                (sub_argument, sup_argument)
            } else {
                (sup_argument, sub_argument)
            };
            let slot_covariant = parameter.covariant || covariant;
            if !self.is_compatible(a_argument, b_argument, slot_covariant)? {
                trace!(
                    parameter = %parameter.name,
                    a = %self.print(a_argument),
                    b = %self.print(b_argument),
                    slot_covariant,
                    "type argument incompatible"
                );
                return Ok(false);
            }
        }
        Ok(true)
    }

    // =========================================================================
    // Raw subtyping
    // =========================================================================

    /// Whether `sub` is `sup` or one of its subtypes, ignoring arguments.
    ///
    /// Function types are raw subtypes of each other (their structure is
    /// compared separately), of `Function` and of `Any`; a function-capable
    /// class is a raw subtype of any function type.
    pub fn is_raw_subtype(&self, sub: &RawType, sup: &RawType) -> SolverResult<bool> {
        if self.is_top_raw(sup) || self.is_bottom_raw(sub) {
            return Ok(true);
        }
        let root = self.db.function_root();
        match (sub, sup) {
            (RawType::Class(sub), RawType::Class(sup)) => self.class_is_subtype(*sub, *sup),
            (RawType::Function(_), RawType::Function(_)) => Ok(true),
            (RawType::Function(_), RawType::Class(sup)) => self.class_is_subtype(root, *sup),
            (RawType::Class(sub), RawType::Function(_)) => self.class_is_subtype(*sub, root),
        }
    }

    /// Whether `sup` appears in `sub`'s linearization.
    pub fn class_is_subtype(&self, sub: ClassId, sup: ClassId) -> SolverResult<bool> {
        if sub == sup || sup == self.db.top() || sub == self.db.bottom() {
            return Ok(true);
        }
        Ok(self.class_linearization(sub)?.contains(&sup))
    }

    /// A function type, `Function` itself, or a class extending it.
    pub fn is_function_capable(&self, raw: &RawType) -> SolverResult<bool> {
        match raw {
            RawType::Function(_) => Ok(true),
            RawType::Class(id) if *id == self.db.bottom() || *id == self.db.top() => Ok(false),
            RawType::Class(id) => self.class_is_subtype(*id, self.db.function_root()),
        }
    }
}

#[cfg(test)]
#[path = "../tests/compat_tests.rs"]
mod tests;
