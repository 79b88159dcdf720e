//! A workspace layout: panes in a lookup table, a sum-typed split tree, and
//! the full define → construct → update → encode → decode cycle.

use serde_json::json;
use tagtype::prelude::*;

fn registry() -> Registry {
    Registry::builder()
        .define_json(
            r#"{ "name": "Pane", "kind": "tagged",
                 "fields": { "id": "String", "title": "String", "width": "Number", "pinned": "Boolean?" } }"#,
        )
        .unwrap()
        .define(
            TypeDefinition::tagged_sum("Split")
                .with_variant("Leaf", [("pane", "String")])
                .with_variant("Row", [("children", "[Split]"), ("ratios", "[Number]")])
                .with_variant("Column", [("children", "[Split]"), ("ratios", "[Number]")]),
        )
        .define(TypeDefinition::tagged(
            "Layout",
            [
                ("name", "/^[a-z][a-z0-9-]*$/"),
                ("panes", "LookupTable<Pane>"),
                ("root", "Split"),
                ("focus", "String?"),
            ],
        ))
        .build()
        .unwrap()
}

fn layout_json() -> serde_json::Value {
    json!({
        "name": "editor",
        "panes": [
            { "id": "files", "title": "Files", "width": 240 },
            { "id": "code", "title": "main.rs", "width": 800, "pinned": true },
            { "id": "term", "title": "Terminal", "width": 800 }
        ],
        "root": {
            "@@tagName": "Row",
            "children": [
                { "@@tagName": "Leaf", "pane": "files" },
                {
                    "@@tagName": "Column",
                    "children": [
                        { "@@tagName": "Leaf", "pane": "code" },
                        { "@@tagName": "Leaf", "pane": "term" }
                    ],
                    "ratios": [0.7, 0.3]
                }
            ],
            "ratios": [0.2, 0.8]
        },
        "focus": "code"
    })
}

/// Panes reachable from a split, left to right.
fn leaves(split: &Instance) -> Vec<String> {
    let handlers: Handlers<'_, Vec<String>> = Handlers::new()
        .on("Leaf", |_, leaf| {
            leaf.get("pane").and_then(Value::as_str).map(str::to_string).into_iter().collect()
        })
        .on("Row", |h, row| children(h, row))
        .on("Column", |h, column| children(h, column));
    split.match_with(&handlers).unwrap()
}

fn children(handlers: &Handlers<'_, Vec<String>>, split: &Instance) -> Vec<String> {
    split
        .get("children")
        .and_then(Value::as_array)
        .map(|c| {
            c.iter()
                .filter_map(Value::as_instance)
                .flat_map(|child| child.match_with(handlers).unwrap_or_default())
                .collect()
        })
        .unwrap_or_default()
}

#[test]
fn build_walk_and_round_trip() {
    let registry = registry();
    let layout_type = registry.get("Layout").unwrap();
    let layout = layout_type.from_json(&layout_json()).unwrap();

    let root = layout.get("root").and_then(Value::as_instance).unwrap();
    assert_eq!(leaves(root), vec!["files", "code", "term"]);

    for policy in [TimestampPolicy::Seconds, TimestampPolicy::Rfc3339] {
        let doc = layout_type.encode(&layout, policy).unwrap();
        assert_eq!(doc["panes"]["term"]["_order"], json!(2));
        assert_eq!(doc["root"]["children"][1]["@@tagName"], json!("Column"));
        assert_eq!(layout_type.decode(&doc, policy).unwrap(), layout);
    }
}

#[test]
fn reorder_panes_and_persist() {
    let registry = registry();
    let layout_type = registry.get("Layout").unwrap();
    let pane_type = registry.get("Pane").unwrap();
    let layout = layout_type.from_json(&layout_json()).unwrap();

    let panes = layout.get("panes").and_then(Value::as_table).unwrap();
    let resized = pane_type
        .update(
            panes.get("files").and_then(Value::as_instance).unwrap(),
            [("width", Value::from(300))],
        )
        .unwrap();
    let panes = panes
        .move_index(2, 0)
        .unwrap()
        .upsert_by_id(Value::from(resized))
        .unwrap()
        .remove_by_id("code");

    let updated = layout_type
        .update(&layout, [("panes", Value::from(panes)), ("focus", Value::Null)])
        .unwrap();
    assert!(!updated.has("focus"));

    let doc = layout_type.encode(&updated, TimestampPolicy::Seconds).unwrap();
    let back = layout_type.decode(&doc, TimestampPolicy::Seconds).unwrap();
    let ids: Vec<_> = back
        .get("panes")
        .and_then(Value::as_table)
        .unwrap()
        .ids()
        .map(str::to_string)
        .collect();
    assert_eq!(ids, vec!["term", "files"]);
    assert_eq!(
        back.get("panes")
            .and_then(Value::as_table)
            .and_then(|t| t.get("files"))
            .and_then(|p| p.field("width")),
        Some(&Value::from(300))
    );
}

#[test]
fn bad_layout_name() {
    let registry = registry();
    let mut raw = layout_json();
    raw["name"] = json!("Editor Layout");
    let err = registry.get("Layout").unwrap().from_json(&raw).unwrap_err();
    assert_eq!(
        err.to_string(),
        r#"In Layout: expected name to have type /^[a-z][a-z0-9-]*$/; found "Editor Layout"."#
    );
}

#[test]
fn deep_failure_path() {
    let registry = registry();
    let mut raw = layout_json();
    raw["root"]["children"][1]["children"][0]["pane"] = json!(7);
    let err = registry.get("Layout").unwrap().from_json(&raw).unwrap_err();
    assert!(err.is_field_shape());
    assert_eq!(err.context.unwrap().path, vec!["root", "children", "[1]", "children", "[0]"]);
}

#[test]
fn definitions_survive_a_registry_rebuild() {
    let registry = registry();
    let rebuilt = registry
        .handles()
        .fold(Registry::builder(), |b, h| b.define(h.definition()))
        .build()
        .unwrap();
    let layout = registry.get("Layout").unwrap().from_json(&layout_json()).unwrap();
    let doc = registry
        .get("Layout")
        .unwrap()
        .encode(&layout, TimestampPolicy::Seconds)
        .unwrap();
    let again = rebuilt.get("Layout").unwrap().decode(&doc, TimestampPolicy::Seconds).unwrap();
    assert_eq!(again, layout);
}
