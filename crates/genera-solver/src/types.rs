//! Generic type representation.
//!
//! A [`GenericType`] is either a concrete application of a raw type (a class
//! or a structural function type) to type and multiplicity arguments, or a
//! bare reference to a type parameter. Nodes are immutable values; the
//! engine produces new nodes instead of mutating existing ones.
//!
//! Source spans ride along for diagnostics but never take part in equality.

use crate::model::ClassId;
use crate::multiplicity::Multiplicity;
use genera_common::{Name, SourceSpan};
use std::sync::Arc;

// =============================================================================
// Raw types
// =============================================================================

/// Parameter of a structural function type.
#[derive(Clone, Debug)]
pub struct FunctionParameter {
    pub name: Name,
    pub generic_type: Option<GenericType>,
    pub multiplicity: Option<Multiplicity>,
}

impl FunctionParameter {
    pub fn new(name: impl Into<Name>, generic_type: GenericType, multiplicity: Multiplicity) -> Self {
        Self {
            name: name.into(),
            generic_type: Some(generic_type),
            multiplicity: Some(multiplicity),
        }
    }
}

/// Anonymous structural function type: `{P[m], Q[n]->R[k]}`.
#[derive(Clone, Debug, Default)]
pub struct FunctionType {
    pub parameters: Vec<FunctionParameter>,
    pub return_type: Option<GenericType>,
    pub return_multiplicity: Option<Multiplicity>,
}

impl FunctionType {
    pub fn new(
        parameters: Vec<FunctionParameter>,
        return_type: GenericType,
        return_multiplicity: Multiplicity,
    ) -> Self {
        Self {
            parameters,
            return_type: Some(return_type),
            return_multiplicity: Some(return_multiplicity),
        }
    }

    /// Structural equality: parameter names are ignored.
    pub fn structurally_equal(&self, other: &FunctionType) -> bool {
        self.parameters.len() == other.parameters.len()
            && self
                .parameters
                .iter()
                .zip(&other.parameters)
                .all(|(p1, p2)| {
                    optional_types_equal(p1.generic_type.as_ref(), p2.generic_type.as_ref())
                        && optional_multiplicities_equal(
                            p1.multiplicity.as_ref(),
                            p2.multiplicity.as_ref(),
                        )
                })
            && optional_types_equal(self.return_type.as_ref(), other.return_type.as_ref())
            && optional_multiplicities_equal(
                self.return_multiplicity.as_ref(),
                other.return_multiplicity.as_ref(),
            )
    }

    /// Every parameter and the return are typed with fully concrete types
    /// and concrete multiplicities.
    pub fn is_fully_concrete(&self) -> bool {
        self.parameters.iter().all(|p| {
            p.generic_type.as_ref().is_some_and(GenericType::is_fully_concrete)
                && p.multiplicity.as_ref().is_some_and(Multiplicity::is_concrete)
        }) && self
            .return_type
            .as_ref()
            .is_some_and(GenericType::is_fully_concrete)
            && self
                .return_multiplicity
                .as_ref()
                .is_some_and(Multiplicity::is_concrete)
    }

    /// Every parameter and the return carry a type and a multiplicity.
    pub fn is_fully_defined(&self) -> bool {
        self.parameters.iter().all(|p| {
            p.generic_type.as_ref().is_some_and(GenericType::is_fully_defined)
                && p.multiplicity.is_some()
        }) && self
            .return_type
            .as_ref()
            .is_some_and(GenericType::is_fully_defined)
            && self.return_multiplicity.is_some()
    }
}

/// The nominal declaration underlying a concrete generic type.
#[derive(Clone, Debug)]
pub enum RawType {
    Class(ClassId),
    Function(Arc<FunctionType>),
}

impl RawType {
    #[inline]
    pub fn class_id(&self) -> Option<ClassId> {
        match self {
            Self::Class(id) => Some(*id),
            Self::Function(_) => None,
        }
    }

    #[inline]
    pub fn function_type(&self) -> Option<&FunctionType> {
        match self {
            Self::Function(function) => Some(function),
            Self::Class(_) => None,
        }
    }

    #[inline]
    pub fn is_class(&self, id: ClassId) -> bool {
        matches!(self, Self::Class(class) if *class == id)
    }

    /// Identity of raw types: same class, or structurally equal function types.
    pub fn same_raw(&self, other: &RawType) -> bool {
        match (self, other) {
            (Self::Class(a), Self::Class(b)) => a == b,
            (Self::Function(a), Self::Function(b)) => {
                Arc::ptr_eq(a, b) || a.structurally_equal(b)
            }
            _ => false,
        }
    }
}

// =============================================================================
// Generic types
// =============================================================================

#[derive(Clone, Debug)]
pub enum GenericTypeKind {
    Concrete {
        raw: RawType,
        type_arguments: Vec<GenericType>,
        multiplicity_arguments: Vec<Multiplicity>,
    },
    /// Unresolved reference to a type parameter.
    Variable(Name),
}

#[derive(Clone, Debug)]
pub struct GenericType {
    pub kind: GenericTypeKind,
    pub span: Option<SourceSpan>,
}

impl GenericType {
    pub fn concrete(
        raw: RawType,
        type_arguments: Vec<GenericType>,
        multiplicity_arguments: Vec<Multiplicity>,
    ) -> Self {
        Self {
            kind: GenericTypeKind::Concrete {
                raw,
                type_arguments,
                multiplicity_arguments,
            },
            span: None,
        }
    }

    /// A class with no arguments, e.g. `String`.
    pub fn class(id: ClassId) -> Self {
        Self::concrete(RawType::Class(id), Vec::new(), Vec::new())
    }

    pub fn class_with(
        id: ClassId,
        type_arguments: Vec<GenericType>,
        multiplicity_arguments: Vec<Multiplicity>,
    ) -> Self {
        Self::concrete(RawType::Class(id), type_arguments, multiplicity_arguments)
    }

    pub fn function(function: FunctionType) -> Self {
        Self::concrete(RawType::Function(Arc::new(function)), Vec::new(), Vec::new())
    }

    pub fn variable(name: impl Into<Name>) -> Self {
        Self {
            kind: GenericTypeKind::Variable(name.into()),
            span: None,
        }
    }

    #[must_use]
    pub fn with_span(mut self, span: SourceSpan) -> Self {
        self.span = Some(span);
        self
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    #[inline]
    pub fn raw(&self) -> Option<&RawType> {
        match &self.kind {
            GenericTypeKind::Concrete { raw, .. } => Some(raw),
            GenericTypeKind::Variable(_) => None,
        }
    }

    #[inline]
    pub fn class_id(&self) -> Option<ClassId> {
        self.raw().and_then(RawType::class_id)
    }

    #[inline]
    pub fn function_type(&self) -> Option<&FunctionType> {
        self.raw().and_then(RawType::function_type)
    }

    pub fn type_arguments(&self) -> &[GenericType] {
        match &self.kind {
            GenericTypeKind::Concrete { type_arguments, .. } => type_arguments,
            GenericTypeKind::Variable(_) => &[],
        }
    }

    pub fn multiplicity_arguments(&self) -> &[Multiplicity] {
        match &self.kind {
            GenericTypeKind::Concrete {
                multiplicity_arguments,
                ..
            } => multiplicity_arguments,
            GenericTypeKind::Variable(_) => &[],
        }
    }

    /// Name of the referenced type parameter, for variables.
    pub fn variable_name(&self) -> Option<&Name> {
        match &self.kind {
            GenericTypeKind::Variable(name) => Some(name),
            GenericTypeKind::Concrete { .. } => None,
        }
    }

    // -------------------------------------------------------------------------
    // Structural queries
    // -------------------------------------------------------------------------

    /// Bound to a raw type. Arguments may still be variables.
    #[inline]
    pub fn is_concrete(&self) -> bool {
        matches!(self.kind, GenericTypeKind::Concrete { .. })
    }

    /// Every type argument is concrete (not recursive).
    pub fn has_concrete_type_arguments(&self) -> bool {
        self.type_arguments().iter().all(GenericType::is_concrete)
    }

    /// Every type argument is fully concrete (recursive).
    pub fn has_fully_concrete_type_arguments(&self) -> bool {
        self.type_arguments().iter().all(GenericType::is_fully_concrete)
    }

    pub fn has_concrete_multiplicity_arguments(&self) -> bool {
        self.multiplicity_arguments()
            .iter()
            .all(Multiplicity::is_concrete)
    }

    /// Concrete, with fully concrete type arguments, concrete multiplicity
    /// arguments and, for function types, a fully concrete signature.
    pub fn is_fully_concrete(&self) -> bool {
        let Some(raw) = self.raw() else {
            return false;
        };
        if let RawType::Function(function) = raw
            && !function.is_fully_concrete()
        {
            return false;
        }
        self.has_concrete_multiplicity_arguments() && self.has_fully_concrete_type_arguments()
    }

    /// All constituent parts are present, concretely or not.
    pub fn is_fully_defined(&self) -> bool {
        match &self.kind {
            GenericTypeKind::Variable(_) => true,
            GenericTypeKind::Concrete {
                raw,
                type_arguments,
                ..
            } => {
                raw.function_type().is_none_or(FunctionType::is_fully_defined)
                    && type_arguments.iter().all(GenericType::is_fully_defined)
            }
        }
    }

    /// Deep copy; when `new_span` is given every span in the copy is
    /// replaced by it.
    #[must_use]
    pub fn copy(&self, new_span: Option<&SourceSpan>) -> GenericType {
        let Some(span) = new_span else {
            return self.clone();
        };
        let kind = match &self.kind {
            GenericTypeKind::Variable(name) => GenericTypeKind::Variable(name.clone()),
            GenericTypeKind::Concrete {
                raw,
                type_arguments,
                multiplicity_arguments,
            } => GenericTypeKind::Concrete {
                raw: match raw {
                    RawType::Class(id) => RawType::Class(*id),
                    RawType::Function(function) => {
                        RawType::Function(Arc::new(copy_function_type(function, span)))
                    }
                },
                type_arguments: type_arguments
                    .iter()
                    .map(|argument| argument.copy(new_span))
                    .collect(),
                multiplicity_arguments: multiplicity_arguments.clone(),
            },
        };
        GenericType {
            kind,
            span: Some(span.clone()),
        }
    }
}

fn copy_function_type(function: &FunctionType, span: &SourceSpan) -> FunctionType {
    FunctionType {
        parameters: function
            .parameters
            .iter()
            .map(|parameter| FunctionParameter {
                name: parameter.name.clone(),
                generic_type: parameter.generic_type.as_ref().map(|t| t.copy(Some(span))),
                multiplicity: parameter.multiplicity.clone(),
            })
            .collect(),
        return_type: function.return_type.as_ref().map(|t| t.copy(Some(span))),
        return_multiplicity: function.return_multiplicity.clone(),
    }
}

// =============================================================================
// Equality
// =============================================================================

/// Structural equality of generic types.
///
/// Raw types must be the same class or structurally equal function types;
/// multiplicity arguments compare parameters by name; spans are ignored.
pub fn generic_types_equal(a: &GenericType, b: &GenericType) -> bool {
    match (&a.kind, &b.kind) {
        (GenericTypeKind::Variable(n1), GenericTypeKind::Variable(n2)) => n1 == n2,
        (
            GenericTypeKind::Concrete {
                raw: raw1,
                type_arguments: args1,
                multiplicity_arguments: mults1,
            },
            GenericTypeKind::Concrete {
                raw: raw2,
                type_arguments: args2,
                multiplicity_arguments: mults2,
            },
        ) => {
            raw1.same_raw(raw2)
                && mults1.len() == mults2.len()
                && mults1
                    .iter()
                    .zip(mults2)
                    .all(|(m1, m2)| m1.multiplicities_equal(m2, true))
                && args1.len() == args2.len()
                && args1
                    .iter()
                    .zip(args2)
                    .all(|(t1, t2)| generic_types_equal(t1, t2))
        }
        _ => false,
    }
}

fn optional_types_equal(a: Option<&GenericType>, b: Option<&GenericType>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => generic_types_equal(a, b),
        (None, None) => true,
        _ => false,
    }
}

fn optional_multiplicities_equal(a: Option<&Multiplicity>, b: Option<&Multiplicity>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.multiplicities_equal(b, true),
        (None, None) => true,
        _ => false,
    }
}

impl PartialEq for GenericType {
    fn eq(&self, other: &Self) -> bool {
        generic_types_equal(self, other)
    }
}

impl Eq for GenericType {}

#[cfg(test)]
#[path = "../tests/types_tests.rs"]
mod tests;
