use super::*;
use crate::fixtures::{Bank, property, span};
use genera_common::diagnostics::diagnostic_codes;
use genera_solver::{GenericType, Multiplicity};

/// A model with two broken classes among valid ones.
fn model(bank: &Bank) -> Vec<ClassId> {
    let account = bank.account(|def| {
        def.property(property("name", bank.class(bank.string), Multiplicity::ONE))
    });
    let firm = bank.firm_account(account, |def| {
        def.property(property("name", bank.class(bank.string), Multiplicity::ZERO_ONE))
    });
    let boxed = bank
        .store
        .register(ClassDef::new("Box").extends(GenericType::variable("T")).at(span(90)));
    vec![bank.string, account, firm, bank.object, boxed, bank.holder]
}

#[test]
fn test_validate_model_reports_failures_in_order() {
    let bank = Bank::new();
    let classes = model(&bank);
    let diagnostics = validate_model(&bank.store, &classes, &CheckerOptions::default());

    assert_eq!(diagnostics.len(), 2);
    assert_eq!(diagnostics[0].code, diagnostic_codes::PROPERTY_OVERRIDE_CONFLICT);
    assert_eq!(diagnostics[0].start, 50);
    assert_eq!(diagnostics[1].code, diagnostic_codes::INVALID_GENERALIZATION);
    assert_eq!(diagnostics[1].start, 90);
}

#[test]
fn test_parallel_and_sequential_agree() {
    let bank = Bank::new();
    let classes = model(&bank);
    let parallel = validate_model(&bank.store, &classes, &CheckerOptions::default());
    let sequential = validate_model(&bank.store, &classes, &CheckerOptions::default().sequential());
    assert_eq!(parallel, sequential);
}

#[test]
fn test_disabled_checks_are_skipped() {
    let bank = Bank::new();
    let classes = model(&bank);
    let options = CheckerOptions {
        validate_overrides: false,
        ..CheckerOptions::default()
    };
    let diagnostics = validate_model(&bank.store, &classes, &options);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, diagnostic_codes::INVALID_GENERALIZATION);

    let options = CheckerOptions {
        validate_overrides: false,
        validate_generalizations: false,
        parallel: false,
    };
    assert!(validate_model(&bank.store, &classes, &options).is_empty());
}

#[test]
fn test_unknown_class() {
    let bank = Bank::new();
    let options = CheckerOptions::default();
    let missing = ClassId(9_999);

    let err = validate_class(&bank.store, missing, &options).unwrap_err();
    assert_eq!(err.code(), diagnostic_codes::UNKNOWN_CLASS);
    assert!(err.span().is_none());

    let diagnostics = validate_model(&bank.store, &[missing], &options);
    assert_eq!(diagnostics.len(), 1);
    assert!(!diagnostics[0].has_location());
}

#[test]
fn test_validate_class() {
    let bank = Bank::new();
    let classes = model(&bank);
    let options = CheckerOptions::default();
    assert_eq!(validate_class(&bank.store, classes[1], &options), Ok(()));
    assert!(validate_class(&bank.store, classes[2], &options).is_err());
}

#[test]
fn test_validator_exposes_options_and_names() {
    let bank = Bank::new();
    let options = CheckerOptions::default().sequential();
    let validator = ClassValidator::new(&bank.store, &options);
    assert!(!validator.options().parallel);
    assert_eq!(&*validator.class_name(bank.object), "Object");
    assert_eq!(&*validator.class_name(ClassId(9_999)), "#9999");
}
