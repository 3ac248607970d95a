use super::*;

#[test]
fn test_diamond_message() {
    let err = SolverError::DiamondInheritance {
        first: "Integer".to_string(),
        second: "String".to_string(),
        from: "D".to_string(),
        to: "A".to_string(),
        span: None,
    };
    assert_eq!(
        err.to_string(),
        "Diamond inheritance error! 'Integer' is not compatible with 'String' going from 'D' to 'A'"
    );
    assert_eq!(err.code(), diagnostic_codes::DIAMOND_INHERITANCE);
}

#[test]
fn test_inconsistent_hierarchy_names_root_class() {
    let single = SolverError::InconsistentGeneralizationHierarchy {
        class: Name::from("C"),
        path: vec![Name::from("C")],
        span: None,
    };
    assert_eq!(single.to_string(), "Inconsistent generalization hierarchy for C");

    let nested = SolverError::InconsistentGeneralizationHierarchy {
        class: Name::from("E"),
        path: vec![Name::from("E"), Name::from("D"), Name::from("C")],
        span: None,
    };
    assert_eq!(
        nested.to_string(),
        "Inconsistent generalization hierarchy for E; root inconsistent class: C; path to root class: E, D, C"
    );
}

#[test]
fn test_to_diagnostic_prefers_own_span() {
    let own = SourceSpan::new("a.pure", 10, 4);
    let fallback = SourceSpan::new("b.pure", 1, 1);
    let err = SolverError::CyclicGeneralization {
        class: Name::from("A"),
        span: Some(own),
    };
    let diag = err.to_diagnostic(Some(&fallback));
    assert_eq!(diag.file, "a.pure");
    assert_eq!((diag.start, diag.length), (10, 4));
    assert_eq!(diag.code, diagnostic_codes::CYCLIC_GENERALIZATION);
    assert_eq!(diag.message_text, "Malformed model: cyclic generalization through A");
}

#[test]
fn test_to_diagnostic_falls_back() {
    let fallback = SourceSpan::new("b.pure", 7, 2);
    let err = SolverError::UnknownClass("#42".to_string());
    assert!(err.span().is_none());

    let located = err.to_diagnostic(Some(&fallback));
    assert_eq!(located.file, "b.pure");
    assert_eq!(located.start, 7);

    let unlocated = err.to_diagnostic(None);
    assert!(!unlocated.has_location());
    assert_eq!(unlocated.message_text, "Unknown class: #42");
}

#[test]
fn test_codes_are_distinct() {
    let errors = [
        SolverError::ArgumentCountMismatch {
            raw_type: String::new(),
            generic_type: String::new(),
            span: None,
        },
        SolverError::MultiplicityArgumentCountMismatch {
            raw_type: String::new(),
            generic_type: String::new(),
            span: None,
        },
        SolverError::NoGeneralizationPath {
            from: String::new(),
            to: String::new(),
            span: None,
        },
        SolverError::GeneralizationTooDeep {
            class: Name::from("A"),
            limit: 1,
            span: None,
        },
        SolverError::NonConcreteMultiplicity {
            multiplicity: "[m]".to_string(),
        },
        SolverError::UnboundTypeParameter {
            parameter: Name::from("T"),
            generic_type: String::new(),
            span: None,
        },
    ];
    let mut codes: Vec<u32> = errors.iter().map(SolverError::code).collect();
    codes.sort_unstable();
    codes.dedup();
    assert_eq!(codes.len(), errors.len());
}
