//! End-to-end solver scenarios over a small collection library.

use super::*;
use crate::fixtures::Fixture;
use genera_common::SourceSpan;
use rayon::prelude::*;

/// ```text
/// Collection<+T>
/// └── OrderedCollection<+T>
///     ├── Stack<+T>
///     └── Queue<+T>
/// IntStack extends Stack<Integer>
/// ```
struct Library {
    fx: Fixture,
    collection: ClassId,
    ordered: ClassId,
    stack: ClassId,
    queue: ClassId,
    int_stack: ClassId,
}

impl Library {
    fn new() -> Self {
        let fx = Fixture::new();
        let package = "meta::demo::collections";
        let t = || GenericType::variable("T");
        let collection = fx.store.register(
            ClassDef::new("Collection")
                .in_package(package)
                .type_parameter(TypeParameter::covariant("T")),
        );
        let ordered = fx.store.register(
            ClassDef::new("OrderedCollection")
                .in_package(package)
                .type_parameter(TypeParameter::covariant("T"))
                .extends(GenericType::class_with(collection, vec![t()], Vec::new())),
        );
        let stack = fx.store.register(
            ClassDef::new("Stack")
                .in_package(package)
                .type_parameter(TypeParameter::covariant("T"))
                .extends(GenericType::class_with(ordered, vec![t()], Vec::new())),
        );
        let queue = fx.store.register(
            ClassDef::new("Queue")
                .in_package(package)
                .type_parameter(TypeParameter::covariant("T"))
                .extends(GenericType::class_with(ordered, vec![t()], Vec::new())),
        );
        let int_stack = fx.store.register(
            ClassDef::new("IntStack")
                .in_package(package)
                .extends(GenericType::class_with(stack, vec![fx.class(fx.integer)], Vec::new()))
                .at(SourceSpan::new("collections.pure", 120, 8)),
        );
        Self {
            fx,
            collection,
            ordered,
            stack,
            queue,
            int_stack,
        }
    }

    fn of(&self, id: ClassId, argument: GenericType) -> GenericType {
        GenericType::class_with(id, vec![argument], Vec::new())
    }
}

#[test]
fn test_lookup_and_resolution_through_library() {
    let lib = Library::new();
    let store = &lib.fx.store;
    assert_eq!(store.lookup("meta::demo::collections::Stack"), Some(lib.stack));
    assert_eq!(store.lookup("Queue"), Some(lib.queue));

    let solver = lib.fx.solver();
    let resolved = solver
        .resolve_to_class(&lib.fx.class(lib.int_stack), lib.collection)
        .unwrap();
    assert_eq!(solver.print(&resolved.generic_type), "Collection<Integer>");
    assert_eq!(
        solver.print_with_paths(&resolved.generic_type, true),
        "meta::demo::collections::Collection<meta::pure::metamodel::type::primitive::Integer>"
    );
}

#[test]
fn test_compatibility_through_library() {
    let lib = Library::new();
    let fx = &lib.fx;
    let solver = fx.solver();
    let int_stack = fx.class(lib.int_stack);
    let numbers = lib.of(lib.collection, fx.class(fx.number));
    let strings = lib.of(lib.collection, fx.class(fx.string));

    assert!(solver.is_compatible(&int_stack, &numbers, true).unwrap());
    assert!(!solver.is_compatible(&int_stack, &strings, true).unwrap());
    assert!(!solver.is_compatible(&int_stack, &lib.of(lib.queue, fx.class(fx.integer)), true).unwrap());
    assert!(solver.is_compatible(&numbers, &int_stack, false).unwrap());
}

#[test]
fn test_join_and_meet_through_library() {
    let lib = Library::new();
    let fx = &lib.fx;
    let solver = fx.solver();
    let join = |types: &[GenericType]| solver.print(&solver.best_common_type(types, true, false).unwrap());

    assert_eq!(
        join(&[fx.class(lib.int_stack), lib.of(lib.queue, fx.class(fx.float))]),
        "OrderedCollection<Number>"
    );
    assert_eq!(
        join(&[lib.of(lib.stack, fx.class(fx.string)), lib.of(lib.queue, fx.class(fx.date))]),
        "OrderedCollection<Any>"
    );
    assert_eq!(
        join(&[lib.of(lib.stack, fx.class(fx.string)), fx.list(fx.class(fx.string))]),
        "Any"
    );

    let meet = solver
        .best_common_type(
            &[lib.of(lib.ordered, fx.class(fx.number)), fx.class(lib.int_stack)],
            false,
            false,
        )
        .unwrap();
    assert_eq!(solver.print(&meet), "IntStack");
}

#[test]
fn test_linearization_order_through_library() {
    let lib = Library::new();
    let solver = lib.fx.solver();
    let linearization = solver.class_linearization(lib.int_stack).unwrap();
    assert_eq!(
        &*linearization,
        &[lib.int_stack, lib.stack, lib.ordered, lib.collection, lib.fx.store.top()]
    );
}

#[test]
fn test_parallel_queries_share_the_cache() {
    let fx = Fixture::new();
    let t = || GenericType::variable("T");
    let base = fx
        .store
        .register(ClassDef::new("Base").type_parameter(TypeParameter::covariant("T")));
    let middle = fx.store.register(
        ClassDef::new("Middle")
            .type_parameter(TypeParameter::covariant("T"))
            .extends(GenericType::class_with(base, vec![fx.list(t())], Vec::new())),
    );
    let leaves: Vec<ClassId> = (0..64)
        .map(|i| {
            fx.store.register(ClassDef::new(format!("Leaf{i}")).extends(GenericType::class_with(
                middle,
                vec![fx.class(fx.integer)],
                Vec::new(),
            )))
        })
        .collect();

    let solver = fx.solver();
    let printed: Vec<String> = leaves
        .par_iter()
        .map(|leaf| {
            let resolved = solver.resolve_to_class(&fx.class(*leaf), base).unwrap();
            solver.print(&resolved.generic_type)
        })
        .collect();
    assert!(printed.iter().all(|p| p == "Base<List<Integer>>"));

    let lengths: Vec<usize> = leaves
        .par_iter()
        .map(|leaf| solver.class_linearization(*leaf).unwrap().len())
        .collect();
    assert!(lengths.iter().all(|len| *len == 4));

    let cache = fx.store.linearization_cache().unwrap();
    assert!(leaves.iter().all(|leaf| cache.contains_key(leaf)));
    assert!(cache.contains_key(&middle));
}

#[test]
fn test_diagnostic_serialization() {
    let fx = Fixture::new();
    let base = fx
        .store
        .register(ClassDef::new("Base").type_parameter(TypeParameter::invariant("T")));
    let left = fx.store.register(ClassDef::new("Left").extends(GenericType::class_with(
        base,
        vec![fx.class(fx.integer)],
        Vec::new(),
    )));
    let right = fx.store.register(ClassDef::new("Right").extends(GenericType::class_with(
        base,
        vec![fx.class(fx.string)],
        Vec::new(),
    )));
    let both = fx
        .store
        .register(ClassDef::new("Both").extends(fx.class(left)).extends(fx.class(right)));

    let err = fx.solver().resolve_to_class(&fx.class(both), base).unwrap_err();
    let fallback = SourceSpan::new("both.pure", 40, 4);
    let diagnostic = err.to_diagnostic(Some(&fallback));
    let json = serde_json::to_value(&diagnostic).unwrap();

    assert_eq!(json["file"], "both.pure");
    assert_eq!(json["start"], 40);
    assert_eq!(json["length"], 4);
    assert_eq!(json["category"], "Error");
    assert_eq!(json["code"], err.code());
    assert_eq!(
        json["message_text"],
        "Diamond inheritance error! 'Integer' is not compatible with 'String' going from 'Both' to 'Base'"
    );
}
