//! Property tests over a ledger of accounts and geometry segments.

use proptest::prelude::*;
use tagtype::prelude::*;

fn registry() -> Registry {
    Registry::builder()
        .define(TypeDefinition::tagged(
            "Account",
            [("id", "String"), ("owner", "String"), ("balance", "Number"), ("tags", "[String]?")],
        ))
        .define(TypeDefinition::tagged("Point", [("x", "Number"), ("y", "Number")]))
        .define(
            TypeDefinition::tagged_sum("Segment")
                .with_variant("Line", [("id", "String"), ("from", "Point"), ("to", "Point")])
                .with_variant("Arc", [("id", "String"), ("center", "Point"), ("radius", "Number")])
                .with_variant("Gap", [("id", "String")]),
        )
        .define(TypeDefinition::tagged(
            "Book",
            [
                ("accounts", "LookupTable<Account>"),
                ("outline", "LookupTable<Segment>"),
                ("memo", "Any?"),
                ("extra", "Object?"),
            ],
        ))
        .build()
        .unwrap()
}

fn point(registry: &Registry, x: f64, y: f64) -> Value {
    Value::from(
        registry
            .get("Point")
            .unwrap()
            .construct(vec![Value::from(x), Value::from(y)])
            .unwrap(),
    )
}

fn coord() -> impl Strategy<Value = f64> {
    prop_oneof![(-1000i32..1000).prop_map(f64::from), -1.0e6f64..1.0e6]
}

/// Values that carry no declared type, including ones that look like encoded
/// timestamps.
fn loose() -> impl Strategy<Value = Value> {
    prop_oneof![
        "[a-z]{0,6}".prop_map(Value::from),
        (2000u32..2100, 1u32..13, 1u32..29)
            .prop_map(|(y, m, d)| Value::from(format!("{y}-{m:02}-{d:02}T00:00:00Z"))),
        (0i32..1_000_000, 0i32..1000).prop_map(|(s, n)| {
            Value::object([("_seconds", Value::from(s)), ("_nanoseconds", Value::from(n))])
        }),
        (0i64..4_000_000_000).prop_map(|s| {
            Value::from(chrono::DateTime::from_timestamp(s, 0).unwrap())
        }),
        prop_oneof![Just(-0.0), Just(0.0), coord()].prop_map(Value::from),
    ]
}

fn segment(registry: &Registry, id: &str, kind: u8, a: f64, b: f64) -> Value {
    let segment = registry.get("Segment").unwrap();
    let instance = match kind % 3 {
        0 => segment
            .variant("Line")
            .unwrap()
            .construct(vec![Value::from(id), point(registry, a, b), point(registry, b, a)]),
        1 => segment
            .variant("Arc")
            .unwrap()
            .construct(vec![Value::from(id), point(registry, a, a), Value::from(b.abs())]),
        _ => segment.variant("Gap").unwrap().construct(vec![Value::from(id)]),
    };
    Value::from(instance.unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn wrong_arity_always_rejected(extra in 1usize..4, fewer in proptest::bool::ANY) {
        let registry = registry();
        for handle in registry.handles() {
            for variant in handle.variants() {
                let arity = variant.fields().len();
                let count = if fewer { arity.saturating_sub(extra) } else { arity + extra };
                if count == arity {
                    continue;
                }
                let err = variant.construct(vec![Value::from(1); count]).unwrap_err();
                prop_assert!(err.is_arity(), "{}: {err}", variant.label());
            }
        }
    }

    #[test]
    fn any_missing_handler_is_reported(mask in 0u8..7, kind in 0u8..3) {
        let registry = registry();
        let value = segment(&registry, "s", kind, 1.0, 2.0);
        let instance = value.as_instance().unwrap();

        let names = ["Line", "Arc", "Gap"];
        let present: Vec<_> = names
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, n)| *n)
            .collect();
        let missing: Vec<String> = names
            .iter()
            .filter(|n| !present.contains(n))
            .map(|n| (*n).to_string())
            .collect();

        let handlers = present.iter().fold(Handlers::new(), |h, n| h.on(*n, |_, _| ()));
        let err = instance.match_with(&handlers).unwrap_err();
        prop_assert_eq!(err.kind, ErrorKind::Exhaustiveness { type_name: "Segment".into(), missing });
    }

    #[test]
    fn books_round_trip(
        accounts in prop::collection::vec(("[a-z]{1,6}", coord(), proptest::option::of(prop::collection::vec("[a-z]{0,4}", 0..3))), 0..8),
        segments in prop::collection::vec((any::<u8>(), coord(), coord()), 0..8),
        memo in proptest::option::of(loose()),
        extra in prop::collection::vec(("[a-z_]{1,8}", loose()), 0..4),
        rfc in proptest::bool::ANY,
    ) {
        let registry = registry();
        let policy = if rfc { TimestampPolicy::Rfc3339 } else { TimestampPolicy::Seconds };

        let account_type = registry.get("Account").unwrap();
        let mut table = LookupTable::new("id");
        for (i, (owner, balance, tags)) in accounts.into_iter().enumerate() {
            let account = account_type
                .construct(vec![
                    Value::from(format!("acct-{i}")),
                    Value::from(owner),
                    Value::from(balance),
                    Value::from(tags),
                ])
                .unwrap();
            table = table.upsert_by_id(Value::from(account)).unwrap();
        }
        let outline = segments
            .into_iter()
            .enumerate()
            .map(|(i, (kind, a, b))| segment(&registry, &format!("seg-{i}"), kind, a, b));
        let outline = LookupTable::from_items("id", outline).unwrap();

        let book_type = registry.get("Book").unwrap();
        let extra = if extra.is_empty() {
            Value::Null
        } else {
            Value::object(extra)
        };
        let book = book_type
            .construct(vec![
                Value::from(table),
                Value::from(outline),
                memo.unwrap_or(Value::Null),
                extra,
            ])
            .unwrap();

        let doc = book_type.encode(&book, policy).unwrap();
        let back = book_type.decode(&doc, policy).unwrap();
        prop_assert_eq!(back, book);
    }
}
