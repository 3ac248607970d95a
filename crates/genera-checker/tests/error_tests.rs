use super::*;
use genera_common::DiagnosticCategory;

fn span(start: u32) -> SourceSpan {
    SourceSpan::new("model.pure", start, 5)
}

fn conflict() -> CheckError {
    CheckError::PropertyConflict {
        class: "FirmAccount".into(),
        property: "name".into(),
        specific: "FirmAccount".into(),
        general: "Account".into(),
        span: Some(span(12)),
    }
}

#[test]
fn test_messages() {
    assert_eq!(
        conflict().to_string(),
        "Property conflict on class FirmAccount: property 'name' defined on FirmAccount conflicts with property 'name' defined on Account"
    );

    let duplicate = CheckError::DuplicateQualifiedProperty {
        class: "Account".into(),
        property: "label".into(),
        span: None,
    };
    assert_eq!(
        duplicate.to_string(),
        "Property conflict on class Account: qualified property 'label' defined more than once"
    );

    let subtype = CheckError::SubtypeReferentialGeneralization {
        class: "Base".into(),
        general: "Holder<Derived>".into(),
        subtype: "Derived".into(),
        span: None,
    };
    assert_eq!(
        subtype.to_string(),
        "Class Base extends Holder<Derived> which contains a reference to Derived which is a subtype of Base"
    );

    let invalid = CheckError::InvalidGeneralization {
        class: "Box".into(),
        general: "T".into(),
        span: None,
    };
    assert_eq!(
        invalid.to_string(),
        "Invalid generalization: Box cannot extend T as it is not a Class"
    );
}

#[test]
fn test_codes() {
    assert_eq!(conflict().code(), diagnostic_codes::PROPERTY_OVERRIDE_CONFLICT);
    let solver = CheckError::solver(SolverError::UnknownClass("#9".into()), None);
    assert_eq!(solver.code(), diagnostic_codes::UNKNOWN_CLASS);
}

#[test]
fn test_to_diagnostic_uses_span() {
    let diagnostic = conflict().to_diagnostic();
    assert_eq!(diagnostic.file, "model.pure");
    assert_eq!(diagnostic.start, 12);
    assert_eq!(diagnostic.length, 5);
    assert_eq!(diagnostic.category, DiagnosticCategory::Error);
    assert_eq!(diagnostic.code, diagnostic_codes::PROPERTY_OVERRIDE_CONFLICT);
    assert_eq!(diagnostic.message_text, conflict().to_string());
}

#[test]
fn test_unlocated_diagnostic() {
    let err = CheckError::DuplicateProperty {
        class: "Account".into(),
        property: "name".into(),
        span: None,
    };
    let diagnostic = err.to_diagnostic();
    assert!(!diagnostic.has_location());
    assert_eq!(diagnostic.code, diagnostic_codes::DUPLICATE_PROPERTY);
}

#[test]
fn test_solver_error_falls_back_to_class_span() {
    let err = CheckError::solver(
        SolverError::CyclicGeneralization {
            class: "Loop".into(),
            span: None,
        },
        Some(&span(30)),
    );
    assert_eq!(err.span(), Some(&span(30)));
    assert_eq!(err.to_string(), "Malformed model: cyclic generalization through Loop");

    let diagnostic = err.to_diagnostic();
    assert_eq!(diagnostic.start, 30);
    assert_eq!(diagnostic.code, diagnostic_codes::CYCLIC_GENERALIZATION);
}

#[test]
fn test_solver_error_keeps_its_own_span() {
    let err = CheckError::solver(
        SolverError::NoGeneralizationPath {
            from: "A".into(),
            to: "B".into(),
            span: Some(span(70)),
        },
        Some(&span(30)),
    );
    assert_eq!(err.span(), Some(&span(70)));
    assert_eq!(err.to_diagnostic().start, 70);
}
