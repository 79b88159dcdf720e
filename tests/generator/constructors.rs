//! Strict positional constructors

use tagtype_foundation::{ErrorKind, TypeKind, Value};

use crate::ledger;

fn account_args() -> Vec<Value> {
    vec![
        Value::from("acct-1"),
        Value::from("ada"),
        Value::from(120),
        Value::from("USD"),
        Value::array([Value::from("vip")]),
    ]
}

// =============================================================================
// Tagged types
// =============================================================================

#[test]
fn construct_tagged() {
    let registry = ledger();
    let account = registry.get("Account").unwrap();
    assert_eq!(account.kind(), TypeKind::Tagged);

    let a = account.construct(account_args()).unwrap();
    assert_eq!(a.type_name(), "Account");
    assert_eq!(a.tag_name(), None);
    assert_eq!(a.get("owner"), Some(&Value::from("ada")));
    assert_eq!(a.keys().collect::<Vec<_>>(), vec!["id", "owner", "balance", "currency", "tags"]);
    assert!(account.is(&Value::from(a)));
}

#[test]
fn optional_null_is_omitted() {
    let registry = ledger();
    let mut args = account_args();
    args[4] = Value::Null;
    let a = registry.get("Account").unwrap().construct(args).unwrap();
    assert!(!a.has("tags"));
    assert_eq!(a.len(), 4);
}

#[test]
fn arity_too_few_and_too_many() {
    let registry = ledger();
    let account = registry.get("Account").unwrap();

    let mut few = account_args();
    few.pop();
    let err = account.construct(few).unwrap_err();
    assert_eq!(
        err.kind,
        ErrorKind::Arity { type_name: "Account".into(), expected: 5, actual: 4 }
    );

    let mut many = account_args();
    many.push(Value::from("extra"));
    assert!(account.construct(many).unwrap_err().is_arity());
}

#[test]
fn first_failure_in_declaration_order() {
    let registry = ledger();
    let args = vec![
        Value::from("acct-1"),
        Value::from(7),
        Value::from("lots"),
        Value::from("usd"),
        Value::Null,
    ];
    let err = registry.get("Account").unwrap().construct(args).unwrap_err();
    assert_eq!(
        err.to_string(),
        "In Account: expected owner to have type String; found 7."
    );
}

#[test]
fn regex_field_enforced() {
    let registry = ledger();
    let mut args = account_args();
    args[3] = Value::from("dollars");
    let err = registry.get("Account").unwrap().construct(args).unwrap_err();
    assert!(err.to_string().contains("/^[A-Z]{3}$/"));
}

// =============================================================================
// Sum types
// =============================================================================

#[test]
fn construct_variants() {
    let registry = ledger();
    let entry = registry.get("Entry").unwrap();
    assert!(entry.is_sum());
    assert_eq!(
        entry.variants().map(|v| v.name().to_string()).collect::<Vec<_>>(),
        vec!["Deposit", "Withdrawal", "Transfer"]
    );

    let deposit = entry.variant("Deposit").unwrap().construct(vec![Value::from(5)]).unwrap();
    assert_eq!(deposit.tag_name(), Some("Deposit"));
    assert_eq!(deposit.label(), "Entry.Deposit");
    assert_eq!(deposit.to_string(), "Entry.Deposit(amount: 5)");
    assert!(entry.is(&Value::from(deposit.clone())));
    assert!(entry.variant("Deposit").unwrap().is(&Value::from(deposit.clone())));
    assert!(!entry.variant("Withdrawal").unwrap().is(&Value::from(deposit)));
}

#[test]
fn variant_arity_is_per_variant() {
    let registry = ledger();
    let withdrawal = registry.get("Entry").unwrap().variant("Withdrawal").unwrap();
    let err = withdrawal.construct(vec![Value::from(1)]).unwrap_err();
    assert_eq!(
        err.kind,
        ErrorKind::Arity { type_name: "Entry.Withdrawal".into(), expected: 2, actual: 1 }
    );
    assert!(withdrawal.construct(vec![Value::from(1), Value::Null]).is_ok());
}

#[test]
fn sum_needs_a_variant() {
    let registry = ledger();
    let err = registry.get("Entry").unwrap().construct(vec![Value::from(1)]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::VariantRequired(_)));

    let err = registry.get("Entry").unwrap().variant("Refund").unwrap_err();
    assert!(err.is_unrecognized_variant());
    let err = registry.get("Account").unwrap().variant("Deposit").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::NotSumType(_)));
}

#[test]
fn nested_reference_must_be_an_instance() {
    let registry = ledger();
    let transfer = registry.get("Entry").unwrap().variant("Transfer").unwrap();
    let plain = Value::object([("id", Value::from("acct-2"))]);
    let err = transfer.construct(vec![Value::from(1), plain]).unwrap_err();
    assert_eq!(
        err.to_string(),
        r#"In Entry.Transfer: expected to to have type Account; found {"id": "acct-2"}."#
    );
}

// =============================================================================
// Equality
// =============================================================================

#[test]
fn equal_by_type_tag_and_fields() {
    let registry = ledger();
    let entry = registry.get("Entry").unwrap();
    let a = entry.variant("Deposit").unwrap().construct(vec![Value::from(5)]).unwrap();
    let b = entry.variant("Deposit").unwrap().construct(vec![Value::from(5)]).unwrap();
    let c = entry
        .variant("Withdrawal")
        .unwrap()
        .construct(vec![Value::from(5), Value::Null])
        .unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
}
