use holdfast_common::formatter::{format_result, mask_sensitive};
use holdfast_common::intent::{Intent, IntentError, IntentKind, Target};
use holdfast_common::locator::{LocatorCandidate, Strategy, css_string};
use holdfast_common::matching::{closest, exact_match, fuzzy_match};
use holdfast_common::protocol::{ElementSnapshot, Rect, is_inside};
use holdfast_common::result::{AttemptFailure, AttemptRecord, ExecutionResult};
use holdfast_common::roles::{RoleAliasTable, RoleLookup};
use std::path::PathBuf;

#[test]
fn test_target_parse_prefixed_forms() {
    assert_eq!(
        Target::parse("organization: TEST Org").unwrap(),
        Target::Organization("TEST Org".into())
    );
    assert_eq!(
        Target::parse("Role:Student").unwrap(),
        Target::Role("Student".into())
    );
    assert_eq!(
        Target::parse("text: First Name is required").unwrap(),
        Target::Text("First Name is required".into())
    );
    assert_eq!(
        Target::parse("link: terms and conditions.").unwrap(),
        Target::Link("terms and conditions.".into())
    );
}

#[test]
fn test_target_parse_field_is_normalized() {
    assert_eq!(
        Target::parse("  First   Name ").unwrap(),
        Target::Field("first name".into())
    );
}

#[test]
fn test_target_parse_rejects_empty() {
    assert_eq!(Target::parse("   "), Err(IntentError::EmptyTarget));
    assert_eq!(Target::parse("role:  "), Err(IntentError::EmptyTarget));
}

#[test]
fn test_fill_payload_kept_verbatim() {
    let xss = r#"<script>alert("XSS")</script>"#;
    let intent = Intent::fill("first name", xss).unwrap();
    assert_eq!(intent.payload.as_deref(), Some(xss));

    let padded = "  spaced  ";
    let intent = Intent::fill("last name", padded).unwrap();
    assert_eq!(intent.payload.as_deref(), Some(padded));

    let empty = Intent::fill("email", "").unwrap();
    assert_eq!(empty.payload.as_deref(), Some(""));
}

#[test]
fn test_intent_payload_rules() {
    assert_eq!(
        Intent::new(IntentKind::Fill, "first name", None),
        Err(IntentError::MissingPayload)
    );
    assert_eq!(
        Intent::new(IntentKind::Click, "signup", Some("x".into())),
        Err(IntentError::UnexpectedPayload(IntentKind::Click))
    );
}

#[test]
fn test_intent_kind_names() {
    assert_eq!(IntentKind::SelectOption.to_string(), "select-option");
    assert_eq!(IntentKind::VerifyVisible.as_str(), "verify-visible");
    assert_eq!(
        "verify-checked".parse::<IntentKind>().unwrap(),
        IntentKind::VerifyChecked
    );
    assert!("hover".parse::<IntentKind>().is_err());
    assert!(!IntentKind::VerifyChecked.is_action());
    assert!(IntentKind::Check.is_action());
}

#[test]
fn test_fuzzy_match_is_mutual_substring() {
    assert!(fuzzy_match("TEST Org", "TEST Org"));
    assert!(fuzzy_match("  TEST   Org  ", "TEST Org"));
    assert!(fuzzy_match("IIT Alumni Association", "IIT Alumni Association of North Texas (IITNT)"));
    assert!(fuzzy_match("Sails Software (current)", "Sails Software"));
    assert!(!fuzzy_match("FULFEEMENT", "TEST Org"));
    assert!(!fuzzy_match("", "TEST Org"));
    assert!(!fuzzy_match("   ", "TEST Org"));
}

#[test]
fn test_exact_match_normalizes_whitespace_only() {
    assert!(exact_match("\n  Student \n", "Student"));
    assert!(!exact_match("Students", "Student"));
    assert!(!exact_match("student", "Student"));
    assert!(!exact_match("", ""));
}

#[test]
fn test_closest_ranks_similar_texts_first() {
    let options = ["FULFEEMENT", "TEST Org", "speechpundit", "TEST Org"];
    let ranked = closest("Test Organisation", options, 2);
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0], "TEST Org");
}

#[test]
fn test_role_lookup_maps_aliases_to_value() {
    let table = RoleAliasTable::default();

    let lookup = table.lookup("Student");
    assert_eq!(lookup.value(), "Student");
    assert_eq!(lookup.labels(), vec!["Sail'r".to_string(), "Student".to_string()]);

    assert_eq!(table.lookup("Sail'r").value(), "Student");
    assert_eq!(table.lookup("Trainer").value(), "Coach");
}

#[test]
fn test_role_lookup_unlisted_falls_back_to_name() {
    let table = RoleAliasTable::default();
    let lookup = table.lookup("Judge");
    assert_eq!(
        lookup,
        RoleLookup::Unlisted {
            value: "Judge".into()
        }
    );
    assert_eq!(lookup.labels(), vec!["Judge".to_string()]);
}

#[test]
fn test_role_table_from_yaml_merges() {
    let extra: RoleAliasTable = serde_yaml::from_str(
        r#"
Judge: ["Adjudicator", "Judge"]
"#,
    )
    .unwrap();
    let mut table = RoleAliasTable::default();
    table.merge(&extra);
    assert_eq!(table.len(), 3);
    assert_eq!(table.lookup("Adjudicator").value(), "Judge");
}

#[test]
fn test_strategy_from_yaml() {
    let strategies: Vec<Strategy> = serde_yaml::from_str(
        r#"
- css: 'input[placeholder="First Name"]'
- label: First Name
- nth: { scope: input, index: 0 }
- fuzzy: { scope: li, text: TEST }
"#,
    )
    .unwrap();
    assert_eq!(
        strategies[0],
        Strategy::css(r#"input[placeholder="First Name"]"#)
    );
    assert_eq!(strategies[1], Strategy::label("First Name"));
    assert_eq!(strategies[2], Strategy::nth("input", 0));
    assert_eq!(strategies[3].method(), "fuzzy-text");
}

#[test]
fn test_strategy_yaml_rejects_ambiguous_entries() {
    let both: Result<Strategy, _> = serde_yaml::from_str("{ css: '#fn', label: First Name }");
    assert!(both.is_err());
    let none: Result<Strategy, _> = serde_yaml::from_str("{}");
    assert!(none.is_err());
    let unknown: Result<Strategy, _> = serde_yaml::from_str("xpath: //input");
    assert!(unknown.is_err());
}

#[test]
fn test_strategy_json_uses_single_key_map() {
    let json = serde_json::to_value(Strategy::exact_text("li", "TEST Org")).unwrap();
    assert_eq!(json, serde_json::json!({"exact_text": {"scope": "li", "text": "TEST Org"}}));

    let candidate: LocatorCandidate =
        serde_json::from_str(r#"{"strategy": {"label": "Email"}, "note": "fallback"}"#).unwrap();
    assert_eq!(candidate.strategy, Strategy::label("Email"));
    assert_eq!(candidate.note.as_deref(), Some("fallback"));
}

#[test]
fn test_css_string_escapes_quotes() {
    assert_eq!(css_string("Student"), "\"Student\"");
    assert_eq!(css_string(r#"a"b\c"#), r#""a\"b\\c""#);
    assert_eq!(css_string("Sail'r"), "\"Sail'r\"");
}

#[test]
fn test_is_inside() {
    let outer = Rect::new(0.0, 0.0, 100.0, 40.0);
    assert!(is_inside(&Rect::new(10.0, 10.0, 20.0, 20.0), &outer));
    assert!(!is_inside(&Rect::new(90.0, 10.0, 20.0, 20.0), &outer));
}

#[test]
fn test_snapshot_deserializes_null_attributes() {
    let snap: ElementSnapshot = serde_json::from_str(
        r#"{"id": 4, "tag": "input", "attributes": {"id": "fn", "for": null}, "visible": true, "enabled": true}"#,
    )
    .unwrap();
    assert_eq!(snap.attr("id"), Some("fn"));
    assert_eq!(snap.attr("for"), None);
    assert!(snap.is_form_control());
    assert!(snap.is_actionable());
}

#[test]
fn test_mask_sensitive_password() {
    assert_eq!(mask_sensitive("hunter2", "password", &[]), "••••••••");
    assert_eq!(mask_sensitive("John", "first name", &[]), "John");
    assert_eq!(mask_sensitive("x", "Confirm Password", &[]), "••••••••");
    assert_eq!(
        mask_sensitive("john.doe@example.com", "email", &[]),
        "john.doe@example.com"
    );
    assert_eq!(mask_sensitive("1234", "pin", &["PIN".to_string()]), "••••••••");
}

#[test]
fn test_format_result_lists_attempts_in_order() {
    let intent = Intent::fill("password", "SecurePass123!").unwrap();
    let log = vec![
        AttemptRecord {
            index: 0,
            candidate: LocatorCandidate::new(Strategy::css("#pw")),
            failure: AttemptFailure::ResolutionTimeout {
                waited_ms: 50,
                last_seen: "no matches".into(),
            },
        },
        AttemptRecord {
            index: 1,
            candidate: LocatorCandidate::new(Strategy::label("Password")),
            failure: AttemptFailure::PostConditionMismatch {
                expected: "value".into(),
                actual: "other".into(),
            },
        },
    ];
    let result = ExecutionResult::exhausted(
        intent,
        log,
        Some(PathBuf::from("test-results/fill-error-1.png")),
        None,
    );

    let out = format_result(&result);
    assert!(out.starts_with("FAILED fill \"password\""));
    assert!(!out.contains("SecurePass123!"));
    let first = out.find("#1 css=#pw").unwrap();
    let second = out.find("#2 label=").unwrap();
    assert!(first < second);
    assert!(out.contains("artifact: test-results/fill-error-1.png"));
}
