//! Property override validation.
//!
//! A class's resolution order is walked most-derived first. Each class in
//! it is checked for duplicate members, then every member is compared with
//! the same-named members of the classes after it:
//!
//! - simple properties must agree exactly on return type and multiplicity;
//! - qualified properties with the same name and parameter count must have
//!   a covariant return (type compatible, multiplicity subsumed) and
//!   contravariant parameters.
//!
//! Members contributed by associations take part like declared ones.

use crate::error::{CheckError, CheckResult};
use crate::validator::ClassValidator;
use genera_solver::{
    ClassDef, ClassId, Multiplicity, Property, QualifiedProperty, SolverResult, TypeFormatter,
    generic_types_equal,
};
use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use tracing::trace;

/// Members of one class in the resolution order, grouped by name.
struct MemberIndex<'d> {
    def: &'d ClassDef,
    properties: IndexMap<&'d str, SmallVec<[&'d Property; 1]>>,
    qualified: Vec<&'d QualifiedProperty>,
}

impl<'d> MemberIndex<'d> {
    fn new(def: &'d ClassDef) -> Self {
        let mut properties: IndexMap<&str, SmallVec<[&Property; 1]>> = IndexMap::new();
        for property in def.all_properties() {
            properties.entry(&*property.name).or_default().push(property);
        }
        Self {
            def,
            properties,
            qualified: def.all_qualified_properties().collect(),
        }
    }

    fn duplicate_property(&self) -> Option<&'d str> {
        self.properties
            .iter()
            .find(|(_, group)| group.len() > 1)
            .map(|(name, _)| *name)
    }

    /// First qualified property named `name` taking `parameter_count`
    /// parameters, receiver included.
    fn qualified_named(&self, name: &str, parameter_count: usize) -> Option<&'d QualifiedProperty> {
        self.qualified
            .iter()
            .copied()
            .find(|q| &*q.name == name && q.parameters.len() == parameter_count)
    }
}

impl ClassValidator<'_> {
    pub(crate) fn check_property_overrides(&self, id: ClassId, def: &ClassDef) -> CheckResult<()> {
        let class_span = def.span.as_ref();
        let order = self
            .solver
            .class_linearization(id)
            .map_err(|err| CheckError::solver(err, class_span))?;
        if order.len() < 2 {
            return Ok(());
        }

        let defs = order
            .iter()
            .map(|ancestor| self.class_def(*ancestor))
            .collect::<CheckResult<Vec<_>>>()?;
        let levels: Vec<MemberIndex<'_>> = defs.iter().map(|d| MemberIndex::new(d)).collect();

        for (i, specific) in levels.iter().enumerate() {
            let generals = &levels[i + 1..];
            self.check_simple_properties(def, specific, generals)?;
            self.check_qualified_properties(def, specific, generals)?;
        }
        Ok(())
    }

    fn check_simple_properties(
        &self,
        def: &ClassDef,
        specific: &MemberIndex<'_>,
        generals: &[MemberIndex<'_>],
    ) -> CheckResult<()> {
        if let Some(name) = specific.duplicate_property() {
            return Err(CheckError::DuplicateProperty {
                class: specific.def.name.clone(),
                property: name.into(),
                span: def.span.clone(),
            });
        }

        for (name, group) in &specific.properties {
            for property in group {
                for general in generals {
                    let Some(overridden) = general.properties.get(name) else {
                        continue;
                    };
                    if overridden
                        .iter()
                        .any(|other| !simple_override_valid(property, other))
                    {
                        return Err(conflict(def, specific.def, general.def, name));
                    }
                }
            }
        }
        Ok(())
    }

    fn check_qualified_properties(
        &self,
        def: &ClassDef,
        specific: &MemberIndex<'_>,
        generals: &[MemberIndex<'_>],
    ) -> CheckResult<()> {
        let mut signatures = FxHashSet::default();
        for qualified in &specific.qualified {
            if !signatures.insert(self.signature(qualified)) {
                return Err(CheckError::DuplicateQualifiedProperty {
                    class: specific.def.name.clone(),
                    property: qualified.name.clone(),
                    span: def.span.clone(),
                });
            }
        }

        for qualified in &specific.qualified {
            for general in generals {
                let Some(overridden) =
                    general.qualified_named(&qualified.name, qualified.parameters.len())
                else {
                    continue;
                };
                let valid = self
                    .qualified_override_valid(qualified, overridden)
                    .map_err(|err| CheckError::solver(err, def.span.as_ref()))?;
                if !valid {
                    return Err(conflict(def, specific.def, general.def, &qualified.name));
                }
            }
        }
        Ok(())
    }

    /// Return at least as specific, parameters at least as general. The
    /// receiver is not compared.
    fn qualified_override_valid(
        &self,
        specific: &QualifiedProperty,
        general: &QualifiedProperty,
    ) -> SolverResult<bool> {
        if !self
            .solver
            .is_compatible(&specific.return_type, &general.return_type, true)?
        {
            return Ok(false);
        }
        if !multiplicity_subsumes(&general.return_multiplicity, &specific.return_multiplicity) {
            return Ok(false);
        }
        if specific.parameters.len() != general.parameters.len() {
            return Ok(false);
        }

        for (spec_param, genl_param) in specific
            .explicit_parameters()
            .iter()
            .zip(general.explicit_parameters())
        {
            if let (Some(spec_type), Some(genl_type)) = (&spec_param.generic_type, &genl_param.generic_type)
                && !self.solver.is_compatible(genl_type, spec_type, true)?
            {
                trace!(parameter = %spec_param.name, "qualified override narrows a parameter type");
                return Ok(false);
            }
            if let (Some(spec_mult), Some(genl_mult)) = (&spec_param.multiplicity, &genl_param.multiplicity)
                && !multiplicity_subsumes(spec_mult, genl_mult)
            {
                trace!(parameter = %spec_param.name, "qualified override narrows a parameter multiplicity");
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// `name(P[m], ..):R[k]` over the explicit parameters, with full paths.
    fn signature(&self, qualified: &QualifiedProperty) -> String {
        let formatter = TypeFormatter::new(self.solver.db()).with_full_paths(true);
        let parameters: Vec<String> = qualified
            .explicit_parameters()
            .iter()
            .map(|parameter| {
                format!(
                    "{}{}",
                    formatter.format_optional(parameter.generic_type.as_ref()),
                    optional_multiplicity(parameter.multiplicity.as_ref())
                )
            })
            .collect();
        format!(
            "{}({}):{}{}",
            qualified.name,
            parameters.join(","),
            formatter.format(&qualified.return_type),
            qualified.return_multiplicity
        )
    }
}

fn simple_override_valid(specific: &Property, general: &Property) -> bool {
    generic_types_equal(&specific.return_type, &general.return_type)
        && specific
            .return_multiplicity
            .multiplicities_equal(&general.return_multiplicity, true)
}

/// Subsumption for concrete multiplicities; parametric ones must match by
/// name.
fn multiplicity_subsumes(general: &Multiplicity, specific: &Multiplicity) -> bool {
    general
        .subsumes(specific)
        .unwrap_or_else(|_| general.multiplicities_equal(specific, true))
}

fn optional_multiplicity(multiplicity: Option<&Multiplicity>) -> String {
    multiplicity.map_or_else(|| "[NULL]".to_string(), ToString::to_string)
}

fn conflict(def: &ClassDef, specific: &ClassDef, general: &ClassDef, property: &str) -> CheckError {
    CheckError::PropertyConflict {
        class: def.name.clone(),
        property: property.into(),
        specific: specific.name.clone(),
        general: general.name.clone(),
        span: def.span.clone(),
    }
}

#[cfg(test)]
#[path = "../tests/class_overrides_tests.rs"]
mod tests;
