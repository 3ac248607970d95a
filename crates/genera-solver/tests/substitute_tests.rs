use super::*;
use crate::fixtures::{Fixture, function_type};
use crate::model::{ClassDef, Property, TypeModel, TypeParameter};
use genera_common::Name;

/// `Base<T>`, `Left extends Base<Integer>`, `Right extends Base<right>`,
/// `Diamond extends Left, Right`.
fn diamond(fx: &Fixture, right: ClassId) -> (ClassId, ClassId) {
    let base = fx
        .store
        .register(ClassDef::new("Base").type_parameter(TypeParameter::invariant("T")));
    let left = fx.store.register(
        ClassDef::new("Left").extends(GenericType::class_with(
            base,
            vec![fx.class(fx.integer)],
            Vec::new(),
        )),
    );
    let right = fx.store.register(
        ClassDef::new("Right").extends(GenericType::class_with(
            base,
            vec![fx.class(right)],
            Vec::new(),
        )),
    );
    let diamond = fx.store.register(
        ClassDef::new("Diamond")
            .extends(fx.class(left))
            .extends(fx.class(right)),
    );
    (base, diamond)
}

#[test]
fn test_substitution_identity() {
    let fx = Fixture::new();
    let solver = fx.solver();
    let list = fx.list(fx.class(fx.integer));

    let resolved = solver.resolve_to_class(&list, fx.list).unwrap();
    assert_eq!(resolved.generic_type, list);
    assert_eq!(resolved.argument("T"), Some(&fx.class(fx.integer)));
    assert_eq!(resolved.arguments.len(), 1);
}

#[test]
fn test_substitution_composes_along_chain() {
    let fx = Fixture::new();
    // A<X>; B<Y> extends A<List<Y>>; C extends B<Integer>
    let a = fx
        .store
        .register(ClassDef::new("A").type_parameter(TypeParameter::covariant("X")));
    let b = fx.store.register(
        ClassDef::new("B")
            .type_parameter(TypeParameter::covariant("Y"))
            .extends(GenericType::class_with(
                a,
                vec![fx.list(GenericType::variable("Y"))],
                Vec::new(),
            )),
    );
    let c = fx.store.register(ClassDef::new("C").extends(GenericType::class_with(
        b,
        vec![fx.class(fx.integer)],
        Vec::new(),
    )));

    let solver = fx.solver();
    let resolved = solver.resolve_to_class(&fx.class(c), a).unwrap();
    let expected = fx.list(fx.class(fx.integer));
    assert_eq!(resolved.argument("X"), Some(&expected));
    assert_eq!(solver.print(&resolved.generic_type), "A<List<Integer>>");

    // Intermediate step agrees.
    let at_b = solver.resolve_to_class(&fx.class(c), b).unwrap();
    assert_eq!(at_b.argument("Y"), Some(&fx.class(fx.integer)));
}

#[test]
fn test_diamond_with_incompatible_bindings_fails() {
    let fx = Fixture::new();
    let (base, diamond) = diamond(&fx, fx.string);
    let err = fx
        .solver()
        .resolve_to_class(&fx.class(diamond), base)
        .unwrap_err();
    assert!(matches!(err, SolverError::DiamondInheritance { .. }));
    assert_eq!(
        err.to_string(),
        "Diamond inheritance error! 'Integer' is not compatible with 'String' going from 'Diamond' to 'Base'"
    );
}

#[test]
fn test_diamond_with_equal_bindings_succeeds() {
    let fx = Fixture::new();
    let (base, diamond) = diamond(&fx, fx.integer);
    let resolved = fx
        .solver()
        .resolve_to_class(&fx.class(diamond), base)
        .unwrap();
    assert_eq!(resolved.argument("T"), Some(&fx.class(fx.integer)));
}

#[test]
fn test_no_generalization_path() {
    let fx = Fixture::new();
    let err = fx
        .solver()
        .resolve_to_class(&fx.class(fx.integer), fx.string)
        .unwrap_err();
    assert_eq!(err.to_string(), "'Integer' does not generalize to 'String'");
}

#[test]
fn test_argument_count_mismatch() {
    let fx = Fixture::new();
    let bare_list = fx.class(fx.list);
    let err = fx
        .solver()
        .resolve_to_class(&bare_list, fx.list)
        .unwrap_err();
    assert!(matches!(err, SolverError::ArgumentCountMismatch { .. }));
    assert_eq!(
        err.to_string(),
        "Type argument mismatch for meta::pure::functions::collection::List; got: List"
    );

    // Bag<String> without its multiplicity argument.
    let bare_bag = GenericType::class_with(fx.bag, vec![fx.class(fx.string)], Vec::new());
    let err = fx
        .solver()
        .bind_multiplicity_parameters(&bare_bag, &MultiplicityBindings::empty())
        .unwrap_err();
    assert!(matches!(err, SolverError::MultiplicityArgumentCountMismatch { .. }));
}

#[test]
fn test_cycle_is_reported_not_overflowed() {
    let fx = Fixture::new();
    let a = fx.store.declare("A");
    let b = fx.store.declare("B");
    fx.store.add_generalization(a, fx.class(b));
    fx.store.add_generalization(b, fx.class(a));

    let err = fx
        .solver()
        .resolve_to_class(&fx.class(a), fx.string)
        .unwrap_err();
    assert!(matches!(err, SolverError::CyclicGeneralization { .. }));
}

#[test]
fn test_multiplicity_resolution() {
    let fx = Fixture::new();
    // NonEmpty<T> extends Bag<T|1..*>
    let non_empty = fx.store.register(
        ClassDef::new("NonEmpty")
            .type_parameter(TypeParameter::covariant("T"))
            .extends(fx.bag(GenericType::variable("T"), Multiplicity::ONE_MANY)),
    );
    let source = GenericType::class_with(non_empty, vec![fx.class(fx.string)], Vec::new());

    let solver = fx.solver();
    let resolved = solver
        .resolve_mult_params(&source, &RawType::Class(fx.bag))
        .unwrap();
    assert_eq!(resolved.argument("m"), Some(&Multiplicity::ONE_MANY));

    let full = solver.resolve_to_class(&source, fx.bag).unwrap();
    assert_eq!(solver.print(&full.generic_type), "Bag<String|1..*>");
    assert_eq!(full.multiplicity("m"), Some(&Multiplicity::ONE_MANY));
}

#[test]
fn test_make_type_argument_concrete_rewrites_function_types() {
    let fx = Fixture::new();
    let solver = fx.solver();
    let generic = GenericType::function(FunctionType::new(
        vec![FunctionParameter::new(
            "x",
            GenericType::variable("T"),
            Multiplicity::parameter("m"),
        )],
        fx.list(GenericType::variable("T")),
        Multiplicity::ONE,
    ));
    let types: TypeBindings = [(Name::from("T"), fx.class(fx.string))].into_iter().collect();
    let multiplicities: MultiplicityBindings =
        [(Name::from("m"), Multiplicity::ZERO_ONE)].into_iter().collect();

    let concrete = solver.make_type_argument_concrete(&generic, &types, &multiplicities);
    assert_eq!(solver.print(&concrete), "{String[0..1]->List<String>[1]}");
    // Input untouched, unbound variables stay.
    assert_eq!(solver.print(&generic), "{T[m]->List<T>[1]}");
    let unbound = GenericType::variable("U");
    assert_eq!(
        solver.make_type_argument_concrete(&unbound, &types, &multiplicities),
        unbound
    );
}

#[test]
fn test_property_return_type_through_owner() {
    let fx = Fixture::new();
    let holder = fx.store.register(
        ClassDef::new("Holder")
            .type_parameter(TypeParameter::covariant("T"))
            .multiplicity_parameter("m")
            .property(Property::new(
                "value",
                GenericType::variable("T"),
                Multiplicity::parameter("m"),
            ))
            .property(Property::new(
                "all",
                fx.list(GenericType::variable("T")),
                Multiplicity::ONE,
            )),
    );
    let dated = fx.store.register(ClassDef::new("DatedHolder").extends(GenericType::class_with(
        holder,
        vec![fx.class(fx.date)],
        vec![Multiplicity::ZERO_ONE],
    )));
    let def = fx.store.class(holder).unwrap();
    let value = &def.properties[0];
    let all = &def.properties[1];
    let solver = fx.solver();

    let resolved = solver
        .resolve_property_return_type(&fx.class(dated), value)
        .unwrap();
    assert_eq!(resolved, fx.class(fx.date));
    let multiplicity = solver
        .resolve_property_return_multiplicity(&fx.class(dated), value)
        .unwrap();
    assert_eq!(multiplicity, Multiplicity::ZERO_ONE);

    let owner = GenericType::class_with(holder, vec![fx.class(fx.integer)], vec![Multiplicity::ONE]);
    let resolved = solver.resolve_property_return_type(&owner, all).unwrap();
    assert_eq!(solver.print(&resolved), "List<Integer>");
}

#[test]
fn test_unbound_property_variable() {
    let fx = Fixture::new();
    let odd = fx.store.register(ClassDef::new("Odd").property(Property::new(
        "ghost",
        GenericType::variable("Q"),
        Multiplicity::ONE,
    )));
    let def = fx.store.class(odd).unwrap();
    let err = fx
        .solver()
        .resolve_property_return_type(&fx.class(odd), &def.properties[0])
        .unwrap_err();
    assert!(matches!(err, SolverError::UnboundTypeParameter { .. }));
}

#[test]
fn test_resolve_function_type() {
    let fx = Fixture::new();
    let solver = fx.solver();
    let signature = fx.function(vec![fx.class(fx.date)], fx.class(fx.boolean));

    let direct = solver.resolve_function_type(&signature).unwrap().unwrap();
    assert_eq!(direct.parameters.len(), 1);

    let predicate = fx.store.register(
        ClassDef::new("DatePredicate").extends(fx.function_class(signature.clone())),
    );
    let through_class = solver
        .resolve_function_type(&fx.class(predicate))
        .unwrap()
        .unwrap();
    assert!(through_class.structurally_equal(&function_type(
        vec![fx.class(fx.date)],
        fx.class(fx.boolean)
    )));

    let untyped = fx.function_class(fx.any());
    assert!(solver.resolve_function_type(&untyped).unwrap().is_none());
    assert!(solver.resolve_function_type(&fx.nil()).unwrap().is_none());
    assert!(
        solver
            .resolve_function_type(&GenericType::variable("F"))
            .unwrap()
            .is_none()
    );
}
