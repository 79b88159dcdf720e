//! Integration tests for the field-type grammar
//!
//! Tests parsing, printing and the round-trip between them.

use tagtype_foundation::{BaseType, ErrorKind, FieldType, Pattern};

// =============================================================================
// Parsing
// =============================================================================

#[test]
fn optional_regex_sequence() {
    let ty = FieldType::parse("[/^[A-Z]{3}$/]?").unwrap();
    assert_eq!(ty.base, BaseType::String);
    assert!(ty.optional);
    assert_eq!(ty.array_depth, 1);
    let pattern = ty.regex.as_ref().unwrap();
    assert_eq!(pattern.source(), "^[A-Z]{3}$");
    assert!(pattern.is_match("USD"));
    assert!(!pattern.is_match("usd"));
    assert!(!pattern.is_match("EURO"));
    assert_eq!(ty.to_string(), "[/^[A-Z]{3}$/]?");
}

#[test]
fn every_keyword() {
    for (spec, base) in [
        ("String", BaseType::String),
        ("Number", BaseType::Number),
        ("Boolean", BaseType::Boolean),
        ("Object", BaseType::Object),
        ("Any", BaseType::Any),
    ] {
        let ty = FieldType::parse(spec).unwrap();
        assert_eq!(ty.base, base, "{spec}");
        assert!(!ty.optional);
        assert_eq!(ty.array_depth, 0);
    }
}

#[test]
fn type_reference() {
    let ty = FieldType::parse("[[Segment]]?").unwrap();
    assert_eq!(ty.base, BaseType::Tagged);
    assert_eq!(ty.tagged_type.as_deref(), Some("Segment"));
    assert_eq!(ty.array_depth, 2);
    assert!(ty.optional);
}

#[test]
fn lookup_table_reference() {
    let ty = FieldType::parse("LookupTable<Pane>").unwrap();
    assert!(ty.is_lookup_table());
    assert_eq!(ty.table_item(), Some("Pane"));

    let bare = FieldType::parse("LookupTable").unwrap();
    assert!(bare.is_lookup_table());
    assert_eq!(bare.table_item(), None);
}

#[test]
fn keyword_match_is_by_substring() {
    // Names containing a keyword resolve to the keyword, in priority order.
    assert_eq!(FieldType::parse("StringList").unwrap().base, BaseType::String);
    assert_eq!(FieldType::parse("NumberOrString").unwrap().base, BaseType::String);
    assert_eq!(FieldType::parse("AnyObject").unwrap().base, BaseType::Object);
}

#[test]
fn regex_flags() {
    let ty = FieldType::parse("/^ab+c$/i").unwrap();
    let pattern = ty.regex.unwrap();
    assert_eq!(pattern.flags(), "i");
    assert!(pattern.is_match("ABBC"));
    assert_eq!(pattern, Pattern::new("^ab+c$", "i").unwrap());
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn malformed_specs() {
    for spec in ["", "?", "[String", "String]", "[]", "/(/", "/a/q", "Two Words"] {
        let err = FieldType::parse(spec).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Grammar { .. }), "{spec}: {err}");
    }
}

#[test]
fn grammar_error_names_spec() {
    let err = FieldType::parse("[Number").unwrap_err();
    assert!(err.to_string().contains("[Number"));
}

// =============================================================================
// Printing
// =============================================================================

#[test]
fn print_round_trip() {
    for spec in [
        "String",
        "Number?",
        "[Boolean]",
        "[[Object]]?",
        "Any",
        "Account",
        "[Segment]?",
        "LookupTable<Pane>",
        "/^\\d+$/",
        "[/^[a-z]+$/m]",
    ] {
        assert_eq!(FieldType::parse(spec).unwrap().to_string(), spec);
    }
}

#[test]
fn built_descriptors_print() {
    assert_eq!(FieldType::number().array().optional().to_string(), "[Number]?");
    assert_eq!(FieldType::tagged("Pane").array().array().to_string(), "[[Pane]]");
    let pattern = Pattern::new("^x$", "").unwrap();
    assert_eq!(FieldType::pattern(pattern).to_string(), "/^x$/");
}

#[test]
fn from_str() {
    let ty: FieldType = "[String]?".parse().unwrap();
    assert_eq!(ty, FieldType::string().array().optional());
}
