//! Join (best common supertype) and meet (best common subtype).
//!
//! Join and meet never fail on unrelated inputs: `Any` and `Nil` are valid
//! answers. Errors only come from malformed models reached while
//! linearizing or resolving function types.

use crate::errors::SolverResult;
use crate::multiplicity::Multiplicity;
use crate::solver::GenericTypeSolver;
use crate::types::{FunctionParameter, FunctionType, GenericType, RawType, generic_types_equal};
use genera_common::{Name, SourceSpan};
use smallvec::SmallVec;
use std::sync::Arc;
use tracing::debug;

impl GenericTypeSolver<'_> {
    /// Best common supertype (`covariant`) or subtype (`!covariant`) of
    /// `types`. With `is_function`, the inputs are combined as function
    /// types.
    pub fn best_common_type(
        &self,
        types: &[GenericType],
        covariant: bool,
        is_function: bool,
    ) -> SolverResult<GenericType> {
        self.find_best_common(types, None, covariant, is_function, None)
    }

    /// [`best_common_type`](Self::best_common_type) with every span of the
    /// result replaced by `span`.
    pub fn best_common_type_at(
        &self,
        types: &[GenericType],
        covariant: bool,
        is_function: bool,
        span: Option<&SourceSpan>,
    ) -> SolverResult<GenericType> {
        self.find_best_common(types, None, covariant, is_function, span)
    }

    /// Optional inputs: any absent element makes the result absent.
    pub fn best_common_type_of(
        &self,
        types: &[Option<GenericType>],
        covariant: bool,
        is_function: bool,
    ) -> SolverResult<Option<GenericType>> {
        let Some(present) = types.iter().cloned().collect::<Option<Vec<_>>>() else {
            return Ok(None);
        };
        self.best_common_type(&present, covariant, is_function)
            .map(Some)
    }

    /// Covariant join of class types. An input structurally equal to
    /// `known_bound` is returned as the result without searching.
    pub fn find_best_common_covariant_non_function_type(
        &self,
        types: &[GenericType],
        known_bound: Option<&GenericType>,
        span: Option<&SourceSpan>,
    ) -> SolverResult<GenericType> {
        self.find_best_common(types, known_bound, true, false, span)
    }

    fn find_best_common(
        &self,
        types: &[GenericType],
        known_bound: Option<&GenericType>,
        covariant: bool,
        is_function: bool,
        span: Option<&SourceSpan>,
    ) -> SolverResult<GenericType> {
        match types {
            [] => {
                return Ok(if covariant {
                    self.bottom_type(span)
                } else {
                    self.top_type(span)
                });
            }
            [single] => return Ok(single.copy(span)),
            _ => {}
        }
        if is_function {
            self.join_functions(types, covariant, span)
        } else if covariant {
            self.join(types, known_bound, span)
        } else {
            self.meet(types, span)
        }
    }

    // =========================================================================
    // Function types
    // =========================================================================

    /// Parameter slots take the meet and the return the join in both
    /// directions; `covariant` only picks the fallback.
    fn join_functions(
        &self,
        types: &[GenericType],
        covariant: bool,
        span: Option<&SourceSpan>,
    ) -> SolverResult<GenericType> {
        let fallback = || {
            if covariant {
                self.top_type(span)
            } else {
                self.bottom_type(span)
            }
        };

        let mut functions: SmallVec<[Arc<FunctionType>; 4]> = SmallVec::new();
        for generic_type in types {
            if self.is_bottom(generic_type) {
                continue;
            }
            let Some(raw) = generic_type.raw() else {
                return Ok(fallback());
            };
            if !self.is_function_capable(raw)? {
                return Ok(fallback());
            }
            match self.resolve_function_type(generic_type)? {
                Some(function) => functions.push(function),
                None => {
                    debug!(
                        generic_type = %self.print(generic_type),
                        "function type not resolvable for join"
                    );
                    return Ok(fallback());
                }
            }
        }

        let Some(first) = functions.first() else {
            return Ok(self.bottom_type(span));
        };
        let arity = first.parameters.len();
        if functions.iter().any(|function| function.parameters.len() != arity) {
            debug!(arity, "function join over differing arities");
            return Ok(fallback());
        }

        let mut parameters = Vec::with_capacity(arity);
        for i in 0..arity {
            let slot: SmallVec<[&FunctionParameter; 4]> = functions
                .iter()
                .filter_map(|function| function.parameters.get(i))
                .collect();
            let generic_type = match slot
                .iter()
                .map(|parameter| parameter.generic_type.clone())
                .collect::<Option<Vec<_>>>()
            {
                Some(parameter_types) => {
                    Some(self.find_best_common(&parameter_types, None, false, false, span)?)
                }
                None => None,
            };
            parameters.push(FunctionParameter {
                name: Name::from(""),
                generic_type,
                multiplicity: optional_min_subsuming(
                    slot.iter().map(|parameter| parameter.multiplicity.as_ref()),
                ),
            });
        }

        let return_type = match functions
            .iter()
            .map(|function| function.return_type.clone())
            .collect::<Option<Vec<_>>>()
        {
            Some(return_types) => {
                Some(self.find_best_common(&return_types, None, true, false, span)?)
            }
            None => None,
        };
        let return_multiplicity = optional_min_subsuming(
            functions
                .iter()
                .map(|function| function.return_multiplicity.as_ref()),
        );

        Ok(located(
            GenericType::function(FunctionType {
                parameters,
                return_type,
                return_multiplicity,
            }),
            span,
        ))
    }

    // =========================================================================
    // Join
    // =========================================================================

    fn join(
        &self,
        types: &[GenericType],
        known_bound: Option<&GenericType>,
        span: Option<&SourceSpan>,
    ) -> SolverResult<GenericType> {
        let mut has_non_bottom = false;
        let mut concrete: SmallVec<[&GenericType; 4]> = SmallVec::new();
        for generic_type in types {
            if self.is_top(generic_type) {
                return Ok(self.top_type(span));
            }
            if let Some(bound) = known_bound
                && generic_types_equal(generic_type, bound)
            {
                return Ok(generic_type.copy(span));
            }
            if self.is_bottom(generic_type) {
                continue;
            }
            has_non_bottom = true;
            if generic_type.is_concrete()
                && !concrete.iter().any(|seen| generic_types_equal(seen, generic_type))
            {
                concrete.push(generic_type);
            }
        }
        if !has_non_bottom {
            return Ok(self.bottom_type(span));
        }

        // Type variables only take part when nothing concrete is left.
        match concrete.as_slice() {
            [] => return Ok(self.join_variables(types, span)),
            [single] => return Ok(single.copy(span)),
            _ => {}
        }

        let chains = concrete
            .iter()
            .map(|generic_type| self.generic_linearization(generic_type))
            .collect::<SolverResult<Vec<_>>>()?;
        let Some(shortest) = chains.iter().min_by_key(|chain| chain.len()) else {
            return Ok(self.bottom_type(span));
        };

        if shortest.first().is_some_and(|head| head.function_type().is_some()) {
            for generic_type in &concrete {
                if let Some(raw) = generic_type.raw()
                    && !self.is_function_capable(raw)?
                {
                    debug!("join of function types with non-function types");
                    return Ok(self.top_type(span));
                }
            }
            let owned: Vec<GenericType> = concrete.iter().map(|t| (*t).clone()).collect();
            return self.join_functions(&owned, true, span);
        }

        for candidate in shortest {
            let Some(raw) = candidate.raw() else {
                continue;
            };
            let aligned = chains
                .iter()
                .map(|chain| {
                    chain
                        .iter()
                        .find(|ancestor| ancestor.raw().is_some_and(|r| r.same_raw(raw)))
                })
                .collect::<Option<SmallVec<[&GenericType; 4]>>>();
            if let Some(aligned) = aligned {
                return self.combine_aligned(raw, &aligned, span);
            }
        }

        debug!(count = concrete.len(), "no common ancestor");
        Ok(self.top_type(span))
    }

    /// Join of inputs that are all type variables or `Nil`: the variable
    /// when every one agrees, `Any` otherwise.
    fn join_variables(&self, types: &[GenericType], span: Option<&SourceSpan>) -> GenericType {
        let mut variables = types.iter().filter(|generic_type| !self.is_bottom(generic_type));
        let Some(first) = variables.next() else {
            return self.bottom_type(span);
        };
        if variables.all(|other| other.variable_name() == first.variable_name()) {
            first.copy(span)
        } else {
            debug!("join of distinct type variables");
            self.top_type(span)
        }
    }

    /// Build the common ancestor `raw` from its instances in every input's
    /// linearization.
    fn combine_aligned(
        &self,
        raw: &RawType,
        aligned: &[&GenericType],
        span: Option<&SourceSpan>,
    ) -> SolverResult<GenericType> {
        let RawType::Class(id) = raw else {
            return Ok(aligned
                .first()
                .map_or_else(|| self.top_type(span), |first| first.copy(span)));
        };
        let def = self.class_def(*id)?;

        let mut type_arguments = Vec::with_capacity(def.type_parameters.len());
        for (i, parameter) in def.type_parameters.iter().enumerate() {
            let slot: Vec<GenericType> = aligned
                .iter()
                .filter_map(|ancestor| ancestor.type_arguments().get(i).cloned())
                .collect();
            type_arguments.push(self.find_best_common(
                &slot,
                None,
                parameter.covariant,
                false,
                span,
            )?);
        }

        let multiplicity_arguments = (0..def.multiplicity_parameters.len())
            .map(|i| {
                Multiplicity::min_subsuming(
                    aligned
                        .iter()
                        .filter_map(|ancestor| ancestor.multiplicity_arguments().get(i)),
                )
                .unwrap_or(Multiplicity::ZERO_MANY)
            })
            .collect();

        Ok(located(
            GenericType::class_with(*id, type_arguments, multiplicity_arguments),
            span,
        ))
    }

    // =========================================================================
    // Meet
    // =========================================================================

    fn meet(&self, types: &[GenericType], span: Option<&SourceSpan>) -> SolverResult<GenericType> {
        if types.iter().any(|generic_type| self.is_bottom(generic_type)) {
            return Ok(self.bottom_type(span));
        }
        for candidate in types {
            let Some(raw) = candidate.raw() else {
                continue;
            };
            if self.is_below_all(raw, types)? {
                return Ok(candidate.copy(span));
            }
        }
        debug!(count = types.len(), "no common subtype");
        Ok(self.bottom_type(span))
    }

    fn is_below_all(&self, raw: &RawType, types: &[GenericType]) -> SolverResult<bool> {
        for other in types {
            if let Some(other_raw) = other.raw()
                && !self.is_raw_subtype(raw, other_raw)?
            {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

fn located(generic_type: GenericType, span: Option<&SourceSpan>) -> GenericType {
    match span {
        Some(span) => generic_type.with_span(span.clone()),
        None => generic_type,
    }
}

/// Minimal subsuming multiplicity, absent if any input is absent.
fn optional_min_subsuming<'m>(
    multiplicities: impl Iterator<Item = Option<&'m Multiplicity>>,
) -> Option<Multiplicity> {
    let present = multiplicities.collect::<Option<SmallVec<[&Multiplicity; 4]>>>()?;
    Multiplicity::min_subsuming(present)
}

#[cfg(test)]
#[path = "../tests/join_tests.rs"]
mod tests;
