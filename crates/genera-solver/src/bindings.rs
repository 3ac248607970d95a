//! Immutable parameter binding maps.
//!
//! Walking one generalization edge produces a new map from the previous one;
//! maps are never mutated after construction, so the branches of a diamond
//! can share a parent map without seeing each other's bindings.

use crate::multiplicity::Multiplicity;
use crate::types::GenericType;
use genera_common::Name;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Shared, immutable `parameter name -> value` map.
#[derive(Clone, Debug)]
pub struct Bindings<V>(Arc<FxHashMap<Name, V>>);

pub type TypeBindings = Bindings<GenericType>;
pub type MultiplicityBindings = Bindings<Multiplicity>;

impl<V> Default for Bindings<V> {
    fn default() -> Self {
        Self(Arc::new(FxHashMap::default()))
    }
}

impl<V> Bindings<V> {
    pub fn empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&V> {
        self.0.get(name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &Name> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Name, &V)> {
        self.0.iter()
    }

}

impl<V> FromIterator<(Name, V)> for Bindings<V> {
    fn from_iter<I: IntoIterator<Item = (Name, V)>>(iter: I) -> Self {
        Self(Arc::new(iter.into_iter().collect()))
    }
}

/// A generic type together with the type and multiplicity arguments bound to
/// its raw type's parameters.
#[derive(Clone, Debug)]
pub struct GenericTypeWithBindings {
    pub generic_type: GenericType,
    pub arguments: TypeBindings,
    pub multiplicities: MultiplicityBindings,
}

impl GenericTypeWithBindings {
    /// The type argument bound to `name`.
    pub fn argument(&self, name: &str) -> Option<&GenericType> {
        self.arguments.get(name)
    }

    pub fn multiplicity(&self, name: &str) -> Option<&Multiplicity> {
        self.multiplicities.get(name)
    }
}

/// A generic type with multiplicity bindings only.
#[derive(Clone, Debug)]
pub struct MultiplicityWithBindings {
    pub generic_type: GenericType,
    pub arguments: MultiplicityBindings,
}

impl MultiplicityWithBindings {
    pub fn argument(&self, name: &str) -> Option<&Multiplicity> {
        self.arguments.get(name)
    }
}
