//! Common types and utilities for the genera generic-type engine.
//!
//! This crate provides foundational types used across all genera crates:
//! - Names (`Name`) shared between model nodes
//! - Source spans (`SourceSpan`)
//! - Structured diagnostics and their codes
//! - Engine limits and thresholds
//! - Tracing subscriber initialisation

use std::sync::Arc;

/// Identifier text shared between model nodes (class names, parameter names,
/// property names). Cloning is a reference-count bump.
pub type Name = Arc<str>;

// Span - Source location tracking
pub mod span;
pub use span::SourceSpan;

// Diagnostics - structured error reporting
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory};

// Centralized limits and thresholds
pub mod limits;

// Tracing subscriber setup
pub mod tracing_config;
