//! Centralized limits and thresholds for the generic-type engine.
//!
//! Recursion over the generalization graph is bounded by these values. The
//! solver wraps them in `genera_solver::recursion::RecursionProfile` so call
//! sites name a profile instead of a raw number.

// =============================================================================
// Generalization walks
// =============================================================================

/// Maximum depth of a single path through the generalization graph.
///
/// A well-formed model is acyclic, so any path is bounded by the number of
/// classes. A path longer than this is reported as too deep instead of being
/// followed until the stack runs out.
pub const MAX_GENERALIZATION_DEPTH: u32 = 256;

/// Maximum number of generalization edges visited by one resolution query.
///
/// Diamond-heavy hierarchies revisit shared ancestors once per path; this
/// caps the total work of a single `resolve_type_params` call.
pub const MAX_GENERALIZATION_VISITS: u32 = 100_000;

/// Maximum depth for C3 linearization of one class.
pub const MAX_LINEARIZATION_DEPTH: u32 = 256;

// =============================================================================
// Capacity hints
// =============================================================================

/// Expected number of diamond paths found by one resolution query.
/// Used as the inline capacity of the path buffer.
pub const TYPICAL_DIAMOND_PATHS: usize = 4;
