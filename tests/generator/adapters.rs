//! Loose adapters (`from_value` / `from_json`) and `update`

use serde_json::json;
use tagtype_foundation::{ErrorKind, Value};

use crate::ledger;

fn account_json(id: &str) -> serde_json::Value {
    json!({ "id": id, "owner": "ada", "balance": 10, "currency": "EUR" })
}

// =============================================================================
// from_value / from_json
// =============================================================================

#[test]
fn from_json_builds_tagged() {
    let registry = ledger();
    let account = registry.get("Account").unwrap();
    let a = account.from_json(&account_json("acct-1")).unwrap();
    assert_eq!(a.get("balance"), Some(&Value::from(10)));
    assert!(!a.has("tags"));
}

#[test]
fn extra_keys_ignored() {
    let registry = ledger();
    let mut raw = account_json("acct-1");
    raw["nickname"] = json!("ignored");
    let a = registry.get("Account").unwrap().from_json(&raw).unwrap();
    assert!(!a.has("nickname"));
}

#[test]
fn missing_required_field() {
    let registry = ledger();
    let err = registry
        .get("Account")
        .unwrap()
        .from_json(&json!({ "id": "x", "owner": "ada", "currency": "EUR" }))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "In Account: expected balance to have type Number; found undefined."
    );
}

#[test]
fn sum_dispatches_on_tag() {
    let registry = ledger();
    let entry = registry.get("Entry").unwrap();
    let w = entry
        .from_json(&json!({ "@@tagName": "Withdrawal", "amount": 3, "memo": "rent" }))
        .unwrap();
    assert_eq!(w.tag_name(), Some("Withdrawal"));
    assert_eq!(w.get("memo"), Some(&Value::from("rent")));

    let err = entry.from_json(&json!({ "amount": 3 })).unwrap_err();
    assert_eq!(
        err.kind,
        ErrorKind::UnrecognizedVariant { type_name: "Entry".into(), tag: None }
    );
    assert!(entry.from_json(&json!({ "@@tagName": "Refund" })).unwrap_err().is_unrecognized_variant());
}

#[test]
fn nested_objects_and_tables_are_adapted() {
    let registry = ledger();
    let ledger_type = registry.get("Ledger").unwrap();
    let l = ledger_type
        .from_json(&json!({
            "name": "main",
            "accounts": [account_json("b"), account_json("a")],
            "entries": [
                { "@@tagName": "Deposit", "amount": 5 },
                { "@@tagName": "Transfer", "amount": 2, "to": account_json("a") }
            ]
        }))
        .unwrap();

    let accounts = l.get("accounts").and_then(Value::as_table).unwrap();
    assert_eq!(accounts.ids().collect::<Vec<_>>(), vec!["b", "a"]);
    assert!(accounts.iter().all(|a| registry.get("Account").unwrap().is(a)));

    let entries = l.get("entries").and_then(Value::as_array).unwrap();
    let transfer = entries.get(1).and_then(Value::as_instance).unwrap();
    assert!(registry.get("Account").unwrap().is(transfer.get("to").unwrap()));
}

#[test]
fn nested_failure_carries_path() {
    let registry = ledger();
    let mut bad = account_json("a");
    bad["currency"] = json!("euro");
    let err = registry
        .get("Ledger")
        .unwrap()
        .from_json(&json!({ "name": "main", "accounts": [bad], "entries": [] }))
        .unwrap_err();
    assert!(err.is_field_shape());
    assert_eq!(err.context.unwrap().path, vec!["accounts", "[0]"]);
}

#[test]
fn duplicate_table_ids_rejected() {
    let registry = ledger();
    let err = registry
        .get("Ledger")
        .unwrap()
        .from_json(&json!({
            "name": "main",
            "accounts": [account_json("a"), account_json("a")],
            "entries": []
        }))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateId(_)));
}

#[test]
fn instance_passes_through() {
    let registry = ledger();
    let account = registry.get("Account").unwrap();
    let a = account.from_json(&account_json("a")).unwrap();
    assert_eq!(account.from_value(&Value::from(a.clone())).unwrap(), a);
    let err = account.from_value(&Value::from(1)).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::TypeMismatch { .. }));
}

// =============================================================================
// update
// =============================================================================

#[test]
fn update_replaces_without_mutating() {
    let registry = ledger();
    let account = registry.get("Account").unwrap();
    let a = account.from_json(&account_json("a")).unwrap();

    let b = account.update(&a, [("balance", Value::from(99))]).unwrap();
    assert_eq!(b.get("balance"), Some(&Value::from(99)));
    assert_eq!(a.get("balance"), Some(&Value::from(10)));
    assert_eq!(b.get("owner"), a.get("owner"));
}

#[test]
fn update_revalidates() {
    let registry = ledger();
    let account = registry.get("Account").unwrap();
    let a = account.from_json(&account_json("a")).unwrap();

    assert!(account.update(&a, [("balance", Value::from("lots"))]).unwrap_err().is_field_shape());
    assert!(matches!(
        account.update(&a, [("nickname", Value::from("x"))]).unwrap_err().kind,
        ErrorKind::UnknownField { .. }
    ));

    let tagged = account.update(&a, [("tags", Value::from(vec!["x"]))]).unwrap();
    let cleared = account.update(&tagged, [("tags", Value::Null)]).unwrap();
    assert!(!cleared.has("tags"));
}

#[test]
fn update_keeps_variant() {
    let registry = ledger();
    let entry = registry.get("Entry").unwrap();
    let w = entry
        .variant("Withdrawal")
        .unwrap()
        .construct(vec![Value::from(1), Value::Null])
        .unwrap();
    let w2 = entry.update(&w, [("memo", Value::from("fee"))]).unwrap();
    assert_eq!(w2.tag_name(), Some("Withdrawal"));

    let other = registry.get("Account").unwrap();
    assert!(matches!(
        other.update(&w, [("id", Value::from("x"))]).unwrap_err().kind,
        ErrorKind::TypeMismatch { .. }
    ));
}
