//! The engine entry point.
//!
//! `GenericTypeSolver` is a thin borrow of the model index. Its operations
//! are split by concern:
//!
//! | File | Operations |
//! |------|------------|
//! | `substitute.rs` | binding, `resolve_type_params`, `make_type_argument_concrete`, property return resolution |
//! | `compat.rs` | `is_compatible`, `is_raw_subtype`, function type compatibility |
//! | `linearize.rs` | C3 class and generic linearization |
//! | `join.rs` | `best_common_type` and friends |

use crate::errors::{SolverError, SolverResult};
use crate::format::TypeFormatter;
use crate::model::{ClassDef, ClassId, TypeModel};
use crate::types::{GenericType, RawType};
use genera_common::SourceSpan;
use std::sync::Arc;

#[derive(Clone, Copy)]
pub struct GenericTypeSolver<'a> {
    pub(crate) db: &'a dyn TypeModel,
}

impl<'a> GenericTypeSolver<'a> {
    pub fn new(db: &'a dyn TypeModel) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &'a dyn TypeModel {
        self.db
    }

    pub(crate) fn class_def(&self, id: ClassId) -> SolverResult<Arc<ClassDef>> {
        self.db
            .class(id)
            .ok_or_else(|| SolverError::UnknownClass(id.to_string()))
    }

    // -------------------------------------------------------------------------
    // Lattice extremes
    // -------------------------------------------------------------------------

    /// `Any`, optionally located at `span`.
    pub fn top_type(&self, span: Option<&SourceSpan>) -> GenericType {
        wrap(self.db.top(), span)
    }

    /// `Nil`, optionally located at `span`.
    pub fn bottom_type(&self, span: Option<&SourceSpan>) -> GenericType {
        wrap(self.db.bottom(), span)
    }

    #[inline]
    pub fn is_top(&self, generic_type: &GenericType) -> bool {
        generic_type.class_id() == Some(self.db.top())
    }

    #[inline]
    pub fn is_bottom(&self, generic_type: &GenericType) -> bool {
        generic_type.class_id() == Some(self.db.bottom())
    }

    #[inline]
    pub(crate) fn is_top_raw(&self, raw: &RawType) -> bool {
        raw.is_class(self.db.top())
    }

    #[inline]
    pub(crate) fn is_bottom_raw(&self, raw: &RawType) -> bool {
        raw.is_class(self.db.bottom())
    }

    // -------------------------------------------------------------------------
    // Printing
    // -------------------------------------------------------------------------

    /// Print with simple class names.
    pub fn print(&self, generic_type: &GenericType) -> String {
        TypeFormatter::new(self.db).format(generic_type)
    }

    pub fn print_with_paths(&self, generic_type: &GenericType, full_paths: bool) -> String {
        TypeFormatter::new(self.db)
            .with_full_paths(full_paths)
            .format(generic_type)
    }

    pub(crate) fn print_raw(&self, raw: &RawType) -> String {
        TypeFormatter::new(self.db).format_raw(raw)
    }
}

pub(crate) fn wrap(id: ClassId, span: Option<&SourceSpan>) -> GenericType {
    let generic_type = GenericType::class(id);
    match span {
        Some(span) => generic_type.with_span(span.clone()),
        None => generic_type,
    }
}
