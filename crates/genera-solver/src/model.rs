//! Class declarations and the model index the engine reads them from.
//!
//! Classes live in an arena addressed by [`ClassId`]; generalizations and
//! property owners refer to classes by id, never by pointer. The engine only
//! needs read access, expressed by the [`TypeModel`] trait. [`ModelStore`]
//! is the in-memory, thread-safe implementation used by the validators,
//! tests and benchmarks.
//!
//! ## Well-known classes
//!
//! | Class | Role |
//! |-------|------|
//! | `Any` | Top: supertype of everything |
//! | `Nil` | Bottom: subtype of everything |
//! | `Function<T>` | root of function-capable classes, `T` covariant |

use crate::multiplicity::Multiplicity;
use crate::types::{FunctionParameter, GenericType};
use dashmap::DashMap;
use genera_common::{Name, SourceSpan};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use tracing::trace;

/// Name of the receiver parameter prepended to qualified properties.
const RECEIVER: &str = "this";

/// Global counter for assigning instance IDs to `ModelStore`s, for tracing.
static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

// =============================================================================
// ClassId
// =============================================================================

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClassId(pub u32);

impl ClassId {
    /// Placeholder owner of members that are not registered yet.
    pub const INVALID: Self = Self(0);

    pub const FIRST_VALID: u32 = 1;

    pub const fn is_valid(self) -> bool {
        self.0 >= Self::FIRST_VALID
    }
}

impl std::fmt::Display for ClassId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// Declarations
// =============================================================================

#[derive(Clone, Debug)]
pub struct TypeParameter {
    pub name: Name,
    pub covariant: bool,
    pub bound: Option<GenericType>,
}

impl TypeParameter {
    pub fn invariant(name: impl Into<Name>) -> Self {
        Self {
            name: name.into(),
            covariant: false,
            bound: None,
        }
    }

    pub fn covariant(name: impl Into<Name>) -> Self {
        Self {
            name: name.into(),
            covariant: true,
            bound: None,
        }
    }
}

/// Direct "extends" edge from a class to a general generic type.
#[derive(Clone, Debug)]
pub struct Generalization {
    pub general: GenericType,
    pub span: Option<SourceSpan>,
}

/// A simple property: `name: Type[mult]`.
#[derive(Clone, Debug)]
pub struct Property {
    pub name: Name,
    pub owner: ClassId,
    pub return_type: GenericType,
    pub return_multiplicity: Multiplicity,
    pub span: Option<SourceSpan>,
}

impl Property {
    pub fn new(name: impl Into<Name>, return_type: GenericType, return_multiplicity: Multiplicity) -> Self {
        Self {
            name: name.into(),
            owner: ClassId::INVALID,
            return_type,
            return_multiplicity,
            span: None,
        }
    }

    #[must_use]
    pub fn at(mut self, span: SourceSpan) -> Self {
        self.span = Some(span);
        self
    }
}

/// A qualified property: `name(p: P[m]) { .. }: Type[mult]`.
///
/// Once registered, `parameters[0]` is the implicit receiver `this`, typed as
/// the owner applied to its own parameters with multiplicity `[1]`.
#[derive(Clone, Debug)]
pub struct QualifiedProperty {
    pub name: Name,
    pub owner: ClassId,
    pub parameters: Vec<FunctionParameter>,
    pub return_type: GenericType,
    pub return_multiplicity: Multiplicity,
    pub span: Option<SourceSpan>,
}

impl QualifiedProperty {
    /// `parameters` excludes the receiver, which is added on registration.
    pub fn new(
        name: impl Into<Name>,
        parameters: Vec<FunctionParameter>,
        return_type: GenericType,
        return_multiplicity: Multiplicity,
    ) -> Self {
        Self {
            name: name.into(),
            owner: ClassId::INVALID,
            parameters,
            return_type,
            return_multiplicity,
            span: None,
        }
    }

    #[must_use]
    pub fn at(mut self, span: SourceSpan) -> Self {
        self.span = Some(span);
        self
    }

    /// Parameters after the receiver.
    pub fn explicit_parameters(&self) -> &[FunctionParameter] {
        self.parameters.get(1..).unwrap_or_default()
    }
}

/// Common view over simple and qualified properties.
pub trait Member {
    fn name(&self) -> &Name;
    fn owner(&self) -> ClassId;
    fn return_type(&self) -> &GenericType;
    fn return_multiplicity(&self) -> &Multiplicity;
    fn span(&self) -> Option<&SourceSpan>;
}

impl Member for Property {
    fn name(&self) -> &Name {
        &self.name
    }
    fn owner(&self) -> ClassId {
        self.owner
    }
    fn return_type(&self) -> &GenericType {
        &self.return_type
    }
    fn return_multiplicity(&self) -> &Multiplicity {
        &self.return_multiplicity
    }
    fn span(&self) -> Option<&SourceSpan> {
        self.span.as_ref()
    }
}

impl Member for QualifiedProperty {
    fn name(&self) -> &Name {
        &self.name
    }
    fn owner(&self) -> ClassId {
        self.owner
    }
    fn return_type(&self) -> &GenericType {
        &self.return_type
    }
    fn return_multiplicity(&self) -> &Multiplicity {
        &self.return_multiplicity
    }
    fn span(&self) -> Option<&SourceSpan> {
        self.span.as_ref()
    }
}

/// A class declaration.
#[derive(Clone, Debug)]
pub struct ClassDef {
    pub name: Name,
    pub package: Vec<Name>,
    pub type_parameters: Vec<TypeParameter>,
    pub multiplicity_parameters: Vec<Name>,
    pub generalizations: Vec<Generalization>,
    pub properties: Vec<Property>,
    pub qualified_properties: Vec<QualifiedProperty>,
    pub properties_from_associations: Vec<Property>,
    pub qualified_properties_from_associations: Vec<QualifiedProperty>,
    pub span: Option<SourceSpan>,
}

impl ClassDef {
    pub fn new(name: impl Into<Name>) -> Self {
        Self {
            name: name.into(),
            package: Vec::new(),
            type_parameters: Vec::new(),
            multiplicity_parameters: Vec::new(),
            generalizations: Vec::new(),
            properties: Vec::new(),
            qualified_properties: Vec::new(),
            properties_from_associations: Vec::new(),
            qualified_properties_from_associations: Vec::new(),
            span: None,
        }
    }

    // -------------------------------------------------------------------------
    // Builder
    // -------------------------------------------------------------------------

    /// Set the package from a `a::b::c` path.
    #[must_use]
    pub fn in_package(mut self, path: &str) -> Self {
        self.package = path
            .split("::")
            .filter(|segment| !segment.is_empty())
            .map(Name::from)
            .collect();
        self
    }

    #[must_use]
    pub fn type_parameter(mut self, parameter: TypeParameter) -> Self {
        self.type_parameters.push(parameter);
        self
    }

    #[must_use]
    pub fn multiplicity_parameter(mut self, name: impl Into<Name>) -> Self {
        self.multiplicity_parameters.push(name.into());
        self
    }

    #[must_use]
    pub fn extends(mut self, general: GenericType) -> Self {
        self.generalizations.push(Generalization {
            general,
            span: None,
        });
        self
    }

    #[must_use]
    pub fn extends_at(mut self, general: GenericType, span: SourceSpan) -> Self {
        self.generalizations.push(Generalization {
            general,
            span: Some(span),
        });
        self
    }

    #[must_use]
    pub fn property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    #[must_use]
    pub fn qualified_property(mut self, property: QualifiedProperty) -> Self {
        self.qualified_properties.push(property);
        self
    }

    #[must_use]
    pub fn association_property(mut self, property: Property) -> Self {
        self.properties_from_associations.push(property);
        self
    }

    #[must_use]
    pub fn association_qualified_property(mut self, property: QualifiedProperty) -> Self {
        self.qualified_properties_from_associations.push(property);
        self
    }

    #[must_use]
    pub fn at(mut self, span: SourceSpan) -> Self {
        self.span = Some(span);
        self
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Full user path, `pkg::sub::Name`.
    pub fn path(&self) -> String {
        let mut path = String::new();
        for segment in &self.package {
            path.push_str(segment);
            path.push_str("::");
        }
        path.push_str(&self.name);
        path
    }

    /// The class applied to its own parameters: `Name<T, U|m>`.
    pub fn self_type(&self, id: ClassId) -> GenericType {
        GenericType::class_with(
            id,
            self.type_parameters
                .iter()
                .map(|parameter| GenericType::variable(parameter.name.clone()))
                .collect(),
            self.multiplicity_parameters
                .iter()
                .map(|name| Multiplicity::Parameter(name.clone()))
                .collect(),
        )
    }

    /// Declared and association-contributed simple properties.
    pub fn all_properties(&self) -> impl Iterator<Item = &Property> {
        self.properties
            .iter()
            .chain(&self.properties_from_associations)
    }

    /// Declared and association-contributed qualified properties.
    pub fn all_qualified_properties(&self) -> impl Iterator<Item = &QualifiedProperty> {
        self.qualified_properties
            .iter()
            .chain(&self.qualified_properties_from_associations)
    }

    /// Attach members to `id`: set owners and prepend qualified receivers.
    ///
    /// Runs after every edit, so a receiver added earlier is rebuilt from
    /// the current type parameters rather than inserted twice.
    fn bind_members(&mut self, id: ClassId) {
        let receiver_type = self.self_type(id);
        for property in self
            .properties
            .iter_mut()
            .chain(&mut self.properties_from_associations)
        {
            property.owner = id;
        }
        for property in self
            .qualified_properties
            .iter_mut()
            .chain(&mut self.qualified_properties_from_associations)
        {
            let receiver = FunctionParameter::new(RECEIVER, receiver_type.clone(), Multiplicity::ONE);
            match property.parameters.first_mut() {
                Some(first) if property.owner == id && &*first.name == RECEIVER => *first = receiver,
                _ => {
                    property.owner = id;
                    property.parameters.insert(0, receiver);
                }
            }
        }
    }
}

// =============================================================================
// TypeModel - read-only model index
// =============================================================================

/// Read-only access to the class arena.
///
/// Implementations must be safe for concurrent readers: validation runs
/// classes in parallel.
pub trait TypeModel: Send + Sync {
    fn class(&self, id: ClassId) -> Option<Arc<ClassDef>>;

    /// Resolve a class by full path (`pkg::Name`) or by simple name.
    fn lookup(&self, name: &str) -> Option<ClassId>;

    /// `Any`.
    fn top(&self) -> ClassId;

    /// `Nil`.
    fn bottom(&self) -> ClassId;

    /// `Function<T>`.
    fn function_root(&self) -> ClassId;

    /// Optional memo table for class linearizations.
    fn linearization_cache(&self) -> Option<&DashMap<ClassId, Arc<[ClassId]>>> {
        None
    }
}

// =============================================================================
// ModelStore
// =============================================================================

/// Thread-safe in-memory class arena.
///
/// ```ignore
/// let store = ModelStore::new();
/// let number = store.register(ClassDef::new("Number"));
/// let integer = store.register(ClassDef::new("Integer").extends(GenericType::class(number)));
/// ```
///
/// Classes registered without a generalization extend `Any`. Forward or
/// cyclic references are built with [`declare`](Self::declare) followed by
/// [`add_generalization`](Self::add_generalization) or
/// [`update`](Self::update).
pub struct ModelStore {
    instance_id: u64,
    classes: DashMap<ClassId, Arc<ClassDef>>,
    names: DashMap<Name, ClassId>,
    next_id: AtomicU32,
    top: ClassId,
    bottom: ClassId,
    function_root: ClassId,
    linearizations: DashMap<ClassId, Arc<[ClassId]>>,
}

impl Default for ModelStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelStore {
    /// Create a store holding `Any`, `Nil` and `Function<T>`.
    pub fn new() -> Self {
        let instance_id = NEXT_INSTANCE_ID.fetch_add(1, Ordering::SeqCst);
        trace!(instance_id, "ModelStore::new");
        let mut store = Self {
            instance_id,
            classes: DashMap::new(),
            names: DashMap::new(),
            next_id: AtomicU32::new(ClassId::FIRST_VALID),
            top: ClassId::INVALID,
            bottom: ClassId::INVALID,
            function_root: ClassId::INVALID,
            linearizations: DashMap::new(),
        };

        let type_package = "meta::pure::metamodel::type";
        store.top = store.insert(ClassDef::new("Any").in_package(type_package));
        store.bottom = store.insert(ClassDef::new("Nil").in_package(type_package));
        store.function_root = store.register(
            ClassDef::new("Function")
                .in_package("meta::pure::metamodel::function")
                .type_parameter(TypeParameter::covariant("T")),
        );
        store
    }

    fn allocate(&self) -> ClassId {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        trace!(
            instance_id = self.instance_id,
            allocated_class_id = id,
            "ModelStore::allocate"
        );
        ClassId(id)
    }

    fn insert(&self, mut def: ClassDef) -> ClassId {
        let id = self.allocate();
        def.bind_members(id);
        trace!(
            instance_id = self.instance_id,
            class_id = id.0,
            path = %def.path(),
            generalizations = def.generalizations.len(),
            "ModelStore::register"
        );
        self.names.insert(Name::from(def.path()), id);
        self.names.insert(def.name.clone(), id);
        self.classes.insert(id, Arc::new(def));
        self.linearizations.clear();
        id
    }

    /// Register a class and return its id.
    pub fn register(&self, mut def: ClassDef) -> ClassId {
        if def.generalizations.is_empty() {
            def.generalizations.push(Generalization {
                general: GenericType::class(self.top),
                span: None,
            });
        }
        self.insert(def)
    }

    /// Register an empty class extending `Any`, to be completed later.
    pub fn declare(&self, name: impl Into<Name>) -> ClassId {
        self.register(ClassDef::new(name))
    }

    /// Add a generalization to a registered class.
    ///
    /// The implicit generalization to `Any` is replaced by the first explicit
    /// one. Returns `false` if the class is unknown.
    pub fn add_generalization(&self, id: ClassId, general: GenericType) -> bool {
        let top = self.top;
        self.update(id, |def| {
            if def.generalizations.len() == 1 && is_implicit_top(&def.generalizations[0], top) {
                def.generalizations.clear();
            }
            def.generalizations.push(Generalization {
                general,
                span: None,
            });
        })
    }

    /// Edit a registered class in place. Returns `false` if it is unknown.
    pub fn update(&self, id: ClassId, edit: impl FnOnce(&mut ClassDef)) -> bool {
        let Some(mut entry) = self.classes.get_mut(&id) else {
            return false;
        };
        let def = Arc::make_mut(entry.value_mut());
        edit(def);
        def.bind_members(id);
        trace!(
            instance_id = self.instance_id,
            class_id = id.0,
            "ModelStore::update"
        );
        drop(entry);
        self.linearizations.clear();
        true
    }

    pub fn contains(&self, id: ClassId) -> bool {
        self.classes.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Ids of every registered class, in registration order.
    pub fn class_ids(&self) -> Vec<ClassId> {
        let mut ids: Vec<ClassId> = self.classes.iter().map(|entry| *entry.key()).collect();
        ids.sort_unstable();
        ids
    }
}

fn is_implicit_top(generalization: &Generalization, top: ClassId) -> bool {
    generalization.span.is_none()
        && generalization.general.class_id() == Some(top)
        && generalization.general.type_arguments().is_empty()
}

impl TypeModel for ModelStore {
    fn class(&self, id: ClassId) -> Option<Arc<ClassDef>> {
        self.classes.get(&id).map(|entry| Arc::clone(entry.value()))
    }

    fn lookup(&self, name: &str) -> Option<ClassId> {
        self.names.get(name).map(|entry| *entry.value())
    }

    fn top(&self) -> ClassId {
        self.top
    }

    fn bottom(&self) -> ClassId {
        self.bottom
    }

    fn function_root(&self) -> ClassId {
        self.function_root
    }

    fn linearization_cache(&self) -> Option<&DashMap<ClassId, Arc<[ClassId]>>> {
        Some(&self.linearizations)
    }
}

#[cfg(test)]
#[path = "../tests/model_tests.rs"]
mod tests;
