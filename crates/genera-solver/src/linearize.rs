//! C3 linearization of the generalization graph.
//!
//! The linearization of a class is the class followed by the C3 merge of its
//! direct generals' linearizations and the list of direct generals. It is the
//! resolution order for property overrides and the ancestor chain used by
//! raw subtyping and the join calculator.

use crate::bindings::{MultiplicityBindings, TypeBindings};
use crate::errors::{SolverError, SolverResult};
use crate::model::{ClassDef, ClassId};
use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use crate::solver::GenericTypeSolver;
use crate::types::{GenericType, RawType};
use rustc_hash::FxHashMap;
use std::sync::Arc;
use tracing::debug;

type Memo = FxHashMap<ClassId, Arc<[ClassId]>>;

impl GenericTypeSolver<'_> {
    /// Class linearization, most-derived first.
    ///
    /// Results are stored in the model's linearization cache when it has one.
    pub fn class_linearization(&self, id: ClassId) -> SolverResult<Arc<[ClassId]>> {
        if let Some(cache) = self.db.linearization_cache()
            && let Some(hit) = cache.get(&id)
        {
            return Ok(Arc::clone(hit.value()));
        }

        let mut guard = RecursionGuard::with_profile(RecursionProfile::Linearization);
        let mut memo = Memo::default();
        let linearization = self.linearize_class(id, &mut guard, &mut memo)?;
        if let Some(cache) = self.db.linearization_cache() {
            for (class, computed) in memo {
                cache.insert(class, computed);
            }
        }
        Ok(linearization)
    }

    fn linearize_class(
        &self,
        id: ClassId,
        guard: &mut RecursionGuard<ClassId>,
        memo: &mut Memo,
    ) -> SolverResult<Arc<[ClassId]>> {
        if let Some(hit) = memo.get(&id) {
            return Ok(Arc::clone(hit));
        }
        if let Some(cache) = self.db.linearization_cache()
            && let Some(hit) = cache.get(&id)
        {
            return Ok(Arc::clone(hit.value()));
        }

        let def = self.class_def(id)?;
        enter(guard, id, &def)?;
        let result = self.linearize_class_parents(id, &def, guard, memo);
        guard.leave(id);

        let linearization = result?;
        memo.insert(id, Arc::clone(&linearization));
        Ok(linearization)
    }

    fn linearize_class_parents(
        &self,
        id: ClassId,
        def: &ClassDef,
        guard: &mut RecursionGuard<ClassId>,
        memo: &mut Memo,
    ) -> SolverResult<Arc<[ClassId]>> {
        let parents: Vec<ClassId> = def
            .generalizations
            .iter()
            .filter_map(|generalization| generalization.general.class_id())
            .collect();

        let mut sequences = Vec::with_capacity(parents.len() + 1);
        for parent in &parents {
            let parent_linearization = self
                .linearize_class(*parent, guard, memo)
                .map_err(|err| through(err, def))?;
            sequences.push(parent_linearization.to_vec());
        }
        sequences.push(parents);

        let Some(merged) = c3_merge(sequences, |a, b| a == b) else {
            return Err(inconsistent(def));
        };
        let mut linearization = Vec::with_capacity(merged.len() + 1);
        linearization.push(id);
        linearization.extend(merged);
        Ok(linearization.into())
    }

    /// Generic linearization: like [`class_linearization`](Self::class_linearization)
    /// but every ancestor carries the arguments it receives from
    /// `generic_type`.
    ///
    /// Function types and variables linearize to themselves.
    pub fn generic_linearization(&self, generic_type: &GenericType) -> SolverResult<Vec<GenericType>> {
        let mut guard = RecursionGuard::with_profile(RecursionProfile::Linearization);
        self.linearize_generic(generic_type, &mut guard)
    }

    fn linearize_generic(
        &self,
        generic_type: &GenericType,
        guard: &mut RecursionGuard<ClassId>,
    ) -> SolverResult<Vec<GenericType>> {
        let Some(RawType::Class(id)) = generic_type.raw() else {
            return Ok(vec![generic_type.clone()]);
        };
        let id = *id;
        let def = self.class_def(id)?;
        enter(guard, id, &def)?;
        let result = self.linearize_generic_parents(generic_type, &def, guard);
        guard.leave(id);
        result
    }

    fn linearize_generic_parents(
        &self,
        generic_type: &GenericType,
        def: &ClassDef,
        guard: &mut RecursionGuard<ClassId>,
    ) -> SolverResult<Vec<GenericType>> {
        let empty_types = TypeBindings::empty();
        let empty_multiplicities = MultiplicityBindings::empty();
        let type_bindings =
            self.bind_type_parameters(generic_type, &empty_types, &empty_multiplicities)?;
        let multiplicity_bindings =
            self.bind_multiplicity_parameters(generic_type, &empty_multiplicities)?;

        let generals: Vec<GenericType> = def
            .generalizations
            .iter()
            .map(|generalization| {
                self.make_type_argument_concrete(
                    &generalization.general,
                    &type_bindings,
                    &multiplicity_bindings,
                )
            })
            .collect();

        let mut sequences = Vec::with_capacity(generals.len() + 1);
        for general in &generals {
            sequences.push(
                self.linearize_generic(general, guard)
                    .map_err(|err| through(err, def))?,
            );
        }
        sequences.push(generals);

        let Some(merged) = c3_merge(sequences, same_raw_type) else {
            return Err(inconsistent(def));
        };
        let mut linearization = Vec::with_capacity(merged.len() + 1);
        linearization.push(generic_type.clone());
        linearization.extend(merged);
        Ok(linearization)
    }
}

fn enter(guard: &mut RecursionGuard<ClassId>, id: ClassId, def: &ClassDef) -> SolverResult<()> {
    match guard.enter(id) {
        RecursionResult::Entered => Ok(()),
        RecursionResult::Cycle => {
            debug!(class = %def.name, "cycle while linearizing");
            Err(SolverError::CyclicGeneralization {
                class: def.name.clone(),
                span: def.span.clone(),
            })
        }
        RecursionResult::DepthExceeded | RecursionResult::IterationExceeded => {
            Err(SolverError::GeneralizationTooDeep {
                class: def.name.clone(),
                limit: guard.max_depth(),
                span: def.span.clone(),
            })
        }
    }
}

fn inconsistent(def: &ClassDef) -> SolverError {
    debug!(class = %def.name, "no C3 linearization");
    SolverError::InconsistentGeneralizationHierarchy {
        class: def.name.clone(),
        path: vec![def.name.clone()],
        span: def.span.clone(),
    }
}

/// Re-attribute an inconsistency found in an ancestor to `def`, extending
/// the path towards the root inconsistent class.
fn through(err: SolverError, def: &ClassDef) -> SolverError {
    match err {
        SolverError::InconsistentGeneralizationHierarchy { mut path, .. } => {
            path.insert(0, def.name.clone());
            SolverError::InconsistentGeneralizationHierarchy {
                class: def.name.clone(),
                path,
                span: def.span.clone(),
            }
        }
        other => other,
    }
}

fn same_raw_type(a: &GenericType, b: &GenericType) -> bool {
    match (a.raw(), b.raw()) {
        (Some(a), Some(b)) => a.same_raw(b),
        _ => false,
    }
}

/// C3 merge: repeatedly take the first sequence head that appears in no
/// other sequence's tail. `None` when no such head exists.
pub(crate) fn c3_merge<T: Clone>(
    sequences: Vec<Vec<T>>,
    same: impl Fn(&T, &T) -> bool,
) -> Option<Vec<T>> {
    let mut heads = vec![0usize; sequences.len()];
    let mut merged = Vec::new();
    loop {
        let mut candidates = sequences
            .iter()
            .zip(&heads)
            .filter_map(|(sequence, &head)| sequence.get(head))
            .peekable();
        if candidates.peek().is_none() {
            return Some(merged);
        }
        let chosen = candidates
            .find(|candidate| {
                !sequences.iter().zip(&heads).any(|(sequence, &head)| {
                    sequence
                        .get(head + 1..)
                        .is_some_and(|tail| tail.iter().any(|item| same(item, *candidate)))
                })
            })?
            .clone();
        for (sequence, head) in sequences.iter().zip(heads.iter_mut()) {
            if sequence.get(*head).is_some_and(|item| same(item, &chosen)) {
                *head += 1;
            }
        }
        merged.push(chosen);
    }
}

#[cfg(test)]
#[path = "../tests/linearize_tests.rs"]
mod tests;
