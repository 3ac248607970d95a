//! Human-readable printing of generic types for diagnostics.
//!
//! | Value | Printed |
//! |-------|---------|
//! | class application | `Pair<String, Integer>`, `Bag<T|m, 1>` |
//! | function type | `{String[1], Integer[*]->Boolean[1]}` |
//! | type variable | `T` |
//! | absent type | `NULL` |
//! | multiplicity | `[1]`, `[0..1]`, `[*]`, `[1..*]`, `[m]`, `[NULL]` |
//!
//! Printing never fails: a class missing from the model prints as its id.

use crate::model::{ClassId, TypeModel};
use crate::multiplicity::Multiplicity;
use crate::types::{FunctionType, GenericType, GenericTypeKind, RawType};
use std::fmt::Write;

pub struct TypeFormatter<'a> {
    db: &'a dyn TypeModel,
    full_paths: bool,
}

impl<'a> TypeFormatter<'a> {
    pub fn new(db: &'a dyn TypeModel) -> Self {
        Self {
            db,
            full_paths: false,
        }
    }

    /// Print classes as `pkg::sub::Name` instead of `Name`.
    #[must_use]
    pub fn with_full_paths(mut self, full_paths: bool) -> Self {
        self.full_paths = full_paths;
        self
    }

    pub fn format(&self, generic_type: &GenericType) -> String {
        let mut out = String::new();
        self.write_generic_type(&mut out, Some(generic_type));
        out
    }

    pub fn format_optional(&self, generic_type: Option<&GenericType>) -> String {
        let mut out = String::new();
        self.write_generic_type(&mut out, generic_type);
        out
    }

    pub fn format_raw(&self, raw: &RawType) -> String {
        let mut out = String::new();
        self.write_raw(&mut out, raw);
        out
    }

    pub fn format_function(&self, function: &FunctionType) -> String {
        let mut out = String::new();
        self.write_function(&mut out, function);
        out
    }

    pub fn class_name(&self, id: ClassId) -> String {
        match self.db.class(id) {
            Some(def) if self.full_paths => def.path(),
            Some(def) => def.name.to_string(),
            None => id.to_string(),
        }
    }

    fn write_generic_type(&self, out: &mut String, generic_type: Option<&GenericType>) {
        let Some(generic_type) = generic_type else {
            out.push_str("NULL");
            return;
        };
        match &generic_type.kind {
            GenericTypeKind::Variable(name) => out.push_str(name),
            GenericTypeKind::Concrete {
                raw,
                type_arguments,
                multiplicity_arguments,
            } => {
                self.write_raw(out, raw);
                self.write_arguments(out, type_arguments, multiplicity_arguments);
            }
        }
    }

    fn write_raw(&self, out: &mut String, raw: &RawType) {
        match raw {
            RawType::Class(id) => out.push_str(&self.class_name(*id)),
            RawType::Function(function) => self.write_function(out, function),
        }
    }

    fn write_arguments(
        &self,
        out: &mut String,
        type_arguments: &[GenericType],
        multiplicity_arguments: &[Multiplicity],
    ) {
        if type_arguments.is_empty() && multiplicity_arguments.is_empty() {
            return;
        }
        out.push('<');
        for (i, argument) in type_arguments.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.write_generic_type(out, Some(argument));
        }
        if !multiplicity_arguments.is_empty() {
            out.push('|');
            for (i, multiplicity) in multiplicity_arguments.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(&multiplicity.print_bare());
            }
        }
        out.push('>');
    }

    fn write_function(&self, out: &mut String, function: &FunctionType) {
        out.push('{');
        for (i, parameter) in function.parameters.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.write_generic_type(out, parameter.generic_type.as_ref());
            write_multiplicity(out, parameter.multiplicity.as_ref());
        }
        out.push_str("->");
        self.write_generic_type(out, function.return_type.as_ref());
        write_multiplicity(out, function.return_multiplicity.as_ref());
        out.push('}');
    }
}

fn write_multiplicity(out: &mut String, multiplicity: Option<&Multiplicity>) {
    match multiplicity {
        Some(multiplicity) => {
            let _ = write!(out, "{multiplicity}");
        }
        None => out.push_str("[NULL]"),
    }
}

/// Print `generic_type`, optionally with full package paths.
pub fn print(db: &dyn TypeModel, generic_type: &GenericType, full_paths: bool) -> String {
    TypeFormatter::new(db)
        .with_full_paths(full_paths)
        .format(generic_type)
}

#[cfg(test)]
#[path = "../tests/format_tests.rs"]
mod tests;
