//! Substitution engine.
//!
//! Resolving `source` to an ancestor raw type walks every generalization
//! path from `source`'s class. Each edge binds the general's parameters by
//! evaluating its arguments against the bindings accumulated so far, which
//! yields a fresh binding map for the next step. Every node on any path
//! whose raw type is the target is collected; several matches mean diamond
//! inheritance, and their bindings must agree.

use crate::bindings::{
    GenericTypeWithBindings, MultiplicityBindings, MultiplicityWithBindings, TypeBindings,
};
use crate::errors::{SolverError, SolverResult};
use crate::model::{ClassId, Member};
use crate::multiplicity::Multiplicity;
use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use crate::solver::GenericTypeSolver;
use crate::types::{FunctionParameter, FunctionType, GenericType, GenericTypeKind, RawType};
use genera_common::limits::TYPICAL_DIAMOND_PATHS;
use smallvec::SmallVec;
use std::sync::Arc;
use tracing::{debug, trace};

type FoundPaths = SmallVec<[GenericTypeWithBindings; TYPICAL_DIAMOND_PATHS]>;

impl GenericTypeSolver<'_> {
    // =========================================================================
    // Binding primitives
    // =========================================================================

    /// Bind the type parameters of `generic_type`'s raw type to its type
    /// arguments, each made concrete through the given bindings.
    ///
    /// Variables and function types bind nothing.
    pub fn bind_type_parameters(
        &self,
        generic_type: &GenericType,
        type_bindings: &TypeBindings,
        multiplicity_bindings: &MultiplicityBindings,
    ) -> SolverResult<TypeBindings> {
        let Some(RawType::Class(id)) = generic_type.raw() else {
            return Ok(TypeBindings::empty());
        };
        let def = self.class_def(*id)?;
        let arguments = generic_type.type_arguments();
        if arguments.len() != def.type_parameters.len() {
            return Err(SolverError::ArgumentCountMismatch {
                raw_type: def.path(),
                generic_type: self.print(generic_type),
                span: generic_type.span.clone(),
            });
        }
        Ok(def
            .type_parameters
            .iter()
            .zip(arguments)
            .map(|(parameter, argument)| {
                (
                    parameter.name.clone(),
                    self.make_type_argument_concrete(argument, type_bindings, multiplicity_bindings),
                )
            })
            .collect())
    }

    /// Bind the multiplicity parameters of `generic_type`'s raw type to its
    /// multiplicity arguments, each made concrete through `bindings`.
    pub fn bind_multiplicity_parameters(
        &self,
        generic_type: &GenericType,
        bindings: &MultiplicityBindings,
    ) -> SolverResult<MultiplicityBindings> {
        let Some(RawType::Class(id)) = generic_type.raw() else {
            return Ok(MultiplicityBindings::empty());
        };
        let def = self.class_def(*id)?;
        let arguments = generic_type.multiplicity_arguments();
        if arguments.len() != def.multiplicity_parameters.len() {
            return Err(SolverError::MultiplicityArgumentCountMismatch {
                raw_type: def.path(),
                generic_type: self.print(generic_type),
                span: generic_type.span.clone(),
            });
        }
        Ok(def
            .multiplicity_parameters
            .iter()
            .zip(arguments)
            .map(|(name, argument)| (name.clone(), argument.make_concrete(bindings)))
            .collect())
    }

    /// Push bindings down into a type expression.
    ///
    /// A variable is replaced by its binding when there is one. Function
    /// types and class applications are rebuilt with every nested type and
    /// multiplicity substituted. The input is never modified.
    pub fn make_type_argument_concrete(
        &self,
        argument: &GenericType,
        type_bindings: &TypeBindings,
        multiplicity_bindings: &MultiplicityBindings,
    ) -> GenericType {
        let kind = match &argument.kind {
            GenericTypeKind::Variable(name) => {
                return type_bindings
                    .get(name)
                    .cloned()
                    .unwrap_or_else(|| argument.clone());
            }
            GenericTypeKind::Concrete {
                raw,
                type_arguments,
                multiplicity_arguments,
            } => GenericTypeKind::Concrete {
                raw: match raw {
                    RawType::Class(id) => RawType::Class(*id),
                    RawType::Function(function) => RawType::Function(Arc::new(
                        self.substitute_function_type(function, type_bindings, multiplicity_bindings),
                    )),
                },
                type_arguments: type_arguments
                    .iter()
                    .map(|t| self.make_type_argument_concrete(t, type_bindings, multiplicity_bindings))
                    .collect(),
                multiplicity_arguments: multiplicity_arguments
                    .iter()
                    .map(|m| m.make_concrete(multiplicity_bindings))
                    .collect(),
            },
        };
        GenericType {
            kind,
            span: argument.span.clone(),
        }
    }

    fn substitute_function_type(
        &self,
        function: &FunctionType,
        type_bindings: &TypeBindings,
        multiplicity_bindings: &MultiplicityBindings,
    ) -> FunctionType {
        let substitute_type = |t: &GenericType| {
            self.make_type_argument_concrete(t, type_bindings, multiplicity_bindings)
        };
        FunctionType {
            parameters: function
                .parameters
                .iter()
                .map(|parameter| FunctionParameter {
                    name: parameter.name.clone(),
                    generic_type: parameter.generic_type.as_ref().map(substitute_type),
                    multiplicity: parameter
                        .multiplicity
                        .as_ref()
                        .map(|m| m.make_concrete(multiplicity_bindings)),
                })
                .collect(),
            return_type: function.return_type.as_ref().map(substitute_type),
            return_multiplicity: function
                .return_multiplicity
                .as_ref()
                .map(|m| m.make_concrete(multiplicity_bindings)),
        }
    }

    // =========================================================================
    // Resolution through the generalization graph
    // =========================================================================

    /// Resolve `source` to the ancestor whose raw type is `target`.
    ///
    /// The result carries the ancestor with all inherited parameters
    /// substituted, plus its type and multiplicity bindings. When several
    /// paths reach `target`, their type bindings must be pairwise compatible
    /// or a [`SolverError::DiamondInheritance`] is raised.
    pub fn resolve_type_params(
        &self,
        source: &GenericType,
        target: &RawType,
    ) -> SolverResult<GenericTypeWithBindings> {
        let found = self.collect_paths(source, target, true)?;
        if found.len() > 1 {
            self.check_diamond(&found, source, target)?;
        }
        found
            .into_iter()
            .next()
            .ok_or_else(|| self.no_path_error(source, target))
    }

    /// [`resolve_type_params`](Self::resolve_type_params) with a class target.
    pub fn resolve_to_class(
        &self,
        source: &GenericType,
        target: ClassId,
    ) -> SolverResult<GenericTypeWithBindings> {
        self.resolve_type_params(source, &RawType::Class(target))
    }

    /// Resolve only multiplicity parameters of `source` at the ancestor
    /// `target`. No diamond check is made; the first path wins.
    pub fn resolve_mult_params(
        &self,
        source: &GenericType,
        target: &RawType,
    ) -> SolverResult<MultiplicityWithBindings> {
        let found = self.collect_paths(source, target, false)?;
        found
            .into_iter()
            .next()
            .map(|node| MultiplicityWithBindings {
                generic_type: node.generic_type,
                arguments: node.multiplicities,
            })
            .ok_or_else(|| self.no_path_error(source, target))
    }

    fn no_path_error(&self, source: &GenericType, target: &RawType) -> SolverError {
        SolverError::NoGeneralizationPath {
            from: self.print(source),
            to: self.print_raw(target),
            span: source.span.clone(),
        }
    }

    fn collect_paths(
        &self,
        source: &GenericType,
        target: &RawType,
        bind_types: bool,
    ) -> SolverResult<FoundPaths> {
        let empty_types = TypeBindings::empty();
        let empty_multiplicities = MultiplicityBindings::empty();
        let start = GenericTypeWithBindings {
            generic_type: source.clone(),
            arguments: if bind_types {
                self.bind_type_parameters(source, &empty_types, &empty_multiplicities)?
            } else {
                TypeBindings::empty()
            },
            multiplicities: self.bind_multiplicity_parameters(source, &empty_multiplicities)?,
        };

        let mut found = FoundPaths::new();
        let mut guard = RecursionGuard::with_profile(RecursionProfile::GeneralizationWalk);
        self.walk_generalizations(start, target, bind_types, &mut found, &mut guard)?;
        Ok(found)
    }

    fn walk_generalizations(
        &self,
        current: GenericTypeWithBindings,
        target: &RawType,
        bind_types: bool,
        found: &mut FoundPaths,
        guard: &mut RecursionGuard<ClassId>,
    ) -> SolverResult<()> {
        let Some(raw) = current.generic_type.raw() else {
            return Ok(());
        };
        if raw.same_raw(target) {
            found.push(current.clone());
        }
        let RawType::Class(id) = *raw else {
            return Ok(());
        };

        let def = self.class_def(id)?;
        match guard.enter(id) {
            RecursionResult::Entered => {}
            RecursionResult::Cycle => {
                debug!(class = %def.name, "cyclic generalization");
                return Err(SolverError::CyclicGeneralization {
                    class: def.name.clone(),
                    span: def.span.clone(),
                });
            }
            RecursionResult::DepthExceeded | RecursionResult::IterationExceeded => {
                return Err(SolverError::GeneralizationTooDeep {
                    class: def.name.clone(),
                    limit: guard.max_depth(),
                    span: def.span.clone(),
                });
            }
        }

        let mut result = Ok(());
        for generalization in &def.generalizations {
            result = self
                .step(&current, &generalization.general, bind_types)
                .and_then(|next| self.walk_generalizations(next, target, bind_types, found, guard));
            if result.is_err() {
                break;
            }
        }
        guard.leave(id);
        result
    }

    /// Follow one generalization edge from `current` to `general`.
    fn step(
        &self,
        current: &GenericTypeWithBindings,
        general: &GenericType,
        bind_types: bool,
    ) -> SolverResult<GenericTypeWithBindings> {
        let multiplicities = self.bind_multiplicity_parameters(general, &current.multiplicities)?;
        let arguments = if bind_types {
            self.bind_type_parameters(general, &current.arguments, &current.multiplicities)?
        } else {
            TypeBindings::empty()
        };
        let generic_type =
            self.make_type_argument_concrete(general, &current.arguments, &current.multiplicities);
        trace!(
            from = %self.print(&current.generic_type),
            to = %self.print(&generic_type),
            "substitution step"
        );
        Ok(GenericTypeWithBindings {
            generic_type,
            arguments,
            multiplicities,
        })
    }

    /// Every ordered pair of distinct matches must bind each parameter
    /// compatibly.
    fn check_diamond(
        &self,
        found: &[GenericTypeWithBindings],
        source: &GenericType,
        target: &RawType,
    ) -> SolverResult<()> {
        let parameter_names: Vec<_> = match target {
            RawType::Class(id) => self
                .class_def(*id)?
                .type_parameters
                .iter()
                .map(|p| p.name.clone())
                .collect(),
            RawType::Function(_) => return Ok(()),
        };
        debug!(
            paths = found.len(),
            from = %self.print(source),
            to = %self.print_raw(target),
            "checking diamond resolution"
        );

        for (i, first) in found.iter().enumerate() {
            for (j, second) in found.iter().enumerate() {
                if i == j {
                    continue;
                }
                for name in &parameter_names {
                    let (Some(g1), Some(g2)) = (first.argument(name), second.argument(name)) else {
                        continue;
                    };
                    if !self.is_compatible(g1, g2, true)? {
                        return Err(SolverError::DiamondInheritance {
                            first: self.print(g1),
                            second: self.print(g2),
                            from: self.print(source),
                            to: self.print_raw(target),
                            span: source.span.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    // =========================================================================
    // Owner context
    // =========================================================================

    /// Substitute `value` through `owner`'s own type and multiplicity
    /// bindings.
    pub fn reprocess_in_owner_context(
        &self,
        owner: &GenericType,
        value: &GenericType,
    ) -> SolverResult<GenericType> {
        let empty_types = TypeBindings::empty();
        let empty_multiplicities = MultiplicityBindings::empty();
        let type_bindings = self.bind_type_parameters(owner, &empty_types, &empty_multiplicities)?;
        let multiplicity_bindings = self.bind_multiplicity_parameters(owner, &empty_multiplicities)?;
        Ok(self.make_type_argument_concrete(value, &type_bindings, &multiplicity_bindings))
    }

    /// The return type of `property` as seen from an instance of `owner`.
    ///
    /// A return type that is a bare type variable is looked up in the
    /// bindings `owner` induces on the property's owning class.
    pub fn resolve_property_return_type(
        &self,
        owner: &GenericType,
        property: &impl Member,
    ) -> SolverResult<GenericType> {
        let declared = property.return_type();
        let resolved = match declared.variable_name() {
            Some(name) => {
                let receiver = self.resolve_to_class(owner, property.owner())?;
                receiver
                    .argument(name)
                    .cloned()
                    .ok_or_else(|| SolverError::UnboundTypeParameter {
                        parameter: name.clone(),
                        generic_type: self.print(owner),
                        span: declared.span.clone(),
                    })?
            }
            None => declared.clone(),
        };
        self.reprocess_in_owner_context(owner, &resolved)
    }

    /// The return multiplicity of `property` as seen from an instance of
    /// `owner`.
    pub fn resolve_property_return_multiplicity(
        &self,
        owner: &GenericType,
        property: &impl Member,
    ) -> SolverResult<Multiplicity> {
        let declared = property.return_multiplicity();
        let Multiplicity::Parameter(name) = declared else {
            return Ok(declared.clone());
        };
        let receiver = self.resolve_mult_params(owner, &RawType::Class(property.owner()))?;
        let resolved = receiver
            .argument(name)
            .cloned()
            .ok_or_else(|| SolverError::UnboundTypeParameter {
                parameter: name.clone(),
                generic_type: self.print(owner),
                span: property.span().cloned(),
            })?;
        let own = self.bind_multiplicity_parameters(owner, &MultiplicityBindings::empty())?;
        Ok(resolved.make_concrete(&own))
    }

    /// The structural function type behind a function-capable generic type.
    ///
    /// A function type is its own; `Nil` and variables have none; a class
    /// resolves to `Function<T>` and yields `T`'s function type, or none when
    /// `T` is `Any` or not a function type.
    pub fn resolve_function_type(
        &self,
        generic_type: &GenericType,
    ) -> SolverResult<Option<Arc<FunctionType>>> {
        match generic_type.raw() {
            None => Ok(None),
            Some(RawType::Function(function)) => Ok(Some(Arc::clone(function))),
            Some(RawType::Class(id)) if *id == self.db.bottom() => Ok(None),
            Some(RawType::Class(_)) => {
                let root = self.db.function_root();
                let root_def = self.class_def(root)?;
                let Some(parameter) = root_def.type_parameters.first() else {
                    return Ok(None);
                };
                let resolved = self.resolve_to_class(generic_type, root)?;
                Ok(match resolved.argument(&parameter.name).and_then(GenericType::raw) {
                    Some(RawType::Function(function)) => Some(Arc::clone(function)),
                    _ => None,
                })
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/substitute_tests.rs"]
mod tests;
