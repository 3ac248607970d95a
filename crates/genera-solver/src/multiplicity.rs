//! Multiplicities: cardinality bounds on typed slots.
//!
//! A multiplicity is either a concrete range `[lower..upper]` (with an
//! optional upper bound) or a reference to a multiplicity parameter declared
//! by a class, bound later by a multiplicity argument.

use crate::bindings::MultiplicityBindings;
use crate::errors::{SolverError, SolverResult};
use genera_common::Name;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Multiplicity {
    /// `[lower..upper]`; `upper == None` means unbounded (`*`).
    Range { lower: u32, upper: Option<u32> },
    /// Unbound multiplicity parameter, e.g. `m` in `Class Bag<T|m>`.
    Parameter(Name),
}

impl Multiplicity {
    pub const ZERO: Self = Self::Range {
        lower: 0,
        upper: Some(0),
    };
    pub const ONE: Self = Self::Range {
        lower: 1,
        upper: Some(1),
    };
    pub const ZERO_ONE: Self = Self::Range {
        lower: 0,
        upper: Some(1),
    };
    pub const ZERO_MANY: Self = Self::Range {
        lower: 0,
        upper: None,
    };
    pub const ONE_MANY: Self = Self::Range {
        lower: 1,
        upper: None,
    };

    pub const fn range(lower: u32, upper: Option<u32>) -> Self {
        Self::Range { lower, upper }
    }

    pub fn parameter(name: impl Into<Name>) -> Self {
        Self::Parameter(name.into())
    }

    #[inline]
    pub const fn is_concrete(&self) -> bool {
        matches!(self, Self::Range { .. })
    }

    /// Whether every count valid for `specific` is also valid for `self`.
    ///
    /// Both operands must be concrete.
    pub fn subsumes(&self, specific: &Multiplicity) -> SolverResult<bool> {
        let (general_lower, general_upper) = self.concrete_bounds()?;
        let (specific_lower, specific_upper) = specific.concrete_bounds()?;
        if specific_lower < general_lower {
            return Ok(false);
        }
        Ok(match (general_upper, specific_upper) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(general_upper), Some(specific_upper)) => specific_upper <= general_upper,
        })
    }

    /// Equality of multiplicities.
    ///
    /// Concrete multiplicities are equal when their bounds are. Parameters
    /// are equal only when `parameters_by_name` is set and the names match.
    pub fn multiplicities_equal(&self, other: &Multiplicity, parameters_by_name: bool) -> bool {
        match (self, other) {
            (Self::Range { .. }, Self::Range { .. }) => self == other,
            (Self::Parameter(a), Self::Parameter(b)) => parameters_by_name && a == b,
            _ => false,
        }
    }

    /// The smallest multiplicity subsuming every input.
    ///
    /// Any non-concrete input makes the result `[*]`. Returns `None` for an
    /// empty input.
    pub fn min_subsuming<'m>(multiplicities: impl IntoIterator<Item = &'m Multiplicity>) -> Option<Multiplicity> {
        let mut result: Option<(u32, Option<u32>)> = None;
        for multiplicity in multiplicities {
            let Self::Range { lower, upper } = multiplicity else {
                return Some(Self::ZERO_MANY);
            };
            result = Some(match result {
                None => (*lower, *upper),
                Some((acc_lower, acc_upper)) => (
                    acc_lower.min(*lower),
                    match (acc_upper, upper) {
                        (Some(a), Some(b)) => Some(a.max(*b)),
                        _ => None,
                    },
                ),
            });
        }
        result.map(|(lower, upper)| Self::Range { lower, upper })
    }

    /// Substitute a multiplicity parameter through `bindings`.
    ///
    /// Concrete multiplicities and unbound parameters are returned unchanged.
    pub fn make_concrete(&self, bindings: &MultiplicityBindings) -> Multiplicity {
        match self {
            Self::Range { .. } => self.clone(),
            Self::Parameter(name) => bindings.get(name).cloned().unwrap_or_else(|| self.clone()),
        }
    }

    /// Render without the surrounding brackets: `1`, `0..1`, `*`, `1..*`, `m`.
    pub fn print_bare(&self) -> String {
        match self {
            Self::Range { lower, upper: None } if *lower == 0 => "*".to_string(),
            Self::Range { lower, upper: None } => format!("{lower}..*"),
            Self::Range {
                lower,
                upper: Some(upper),
            } if lower == upper => lower.to_string(),
            Self::Range {
                lower,
                upper: Some(upper),
            } => format!("{lower}..{upper}"),
            Self::Parameter(name) => name.to_string(),
        }
    }

    fn concrete_bounds(&self) -> SolverResult<(u32, Option<u32>)> {
        match self {
            Self::Range { lower, upper } => Ok((*lower, *upper)),
            Self::Parameter(_) => Err(SolverError::NonConcreteMultiplicity {
                multiplicity: self.to_string(),
            }),
        }
    }
}

impl fmt::Display for Multiplicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.print_bare())
    }
}

#[cfg(test)]
#[path = "../tests/multiplicity_tests.rs"]
mod tests;
