//! Checker configuration.

use serde::{Deserialize, Serialize};

/// Which validations run and how.
///
/// Deserialized from JSON with camelCase keys; missing keys keep their
/// defaults, so `{}` enables everything.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CheckerOptions {
    /// Validate classes on the rayon pool.
    pub parallel: bool,
    /// Check generalization edges and that a linearization exists.
    pub validate_generalizations: bool,
    /// Check property overrides and duplicate properties.
    pub validate_overrides: bool,
}

impl Default for CheckerOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            validate_generalizations: true,
            validate_overrides: true,
        }
    }
}

impl CheckerOptions {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

#[cfg(test)]
#[path = "../tests/options_tests.rs"]
mod tests;
