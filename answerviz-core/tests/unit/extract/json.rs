use super::*;
use serde_json::json;

#[test]
fn whole_string_parses_directly() {
    assert_eq!(extract_json(r#" {"a": 1} "#), Some(json!({"a": 1})));
    assert_eq!(extract_json("[1, 2]"), Some(json!([1, 2])));
}

#[test]
fn trailing_object_after_prose() {
    let raw = r#"Here you go: {"text": "hi {there}", "n": {"m": 2}}"#;
    assert_eq!(
        extract_json(raw),
        Some(json!({"text": "hi {there}", "n": {"m": 2}}))
    );
}

#[test]
fn trailing_object_skips_stray_braces_in_prose() {
    let raw = r#"Use {curly} braces like so: {"ok": true}"#;
    assert_eq!(extract_json(raw), Some(json!({"ok": true})));
}

#[test]
fn trailing_object_after_many_prose_braces() {
    let mut raw = String::from("Here is some math: ");
    for _ in 0..300 {
        raw.push_str("\\frac{a}{b} ");
    }
    raw.push_str(r#"{"text": "ok"}"#);
    assert_eq!(extract_json(&raw), Some(json!({"text": "ok"})));
}

#[test]
fn trailing_object_ignores_unbalanced_prose_and_escaped_quotes() {
    let raw = r#"a } b { c: {"t": "say \"}\" {now", "n": [1, {"m": 2}]}"#;
    assert_eq!(
        extract_json(raw),
        Some(json!({"t": "say \"}\" {now", "n": [1, {"m": 2}]}))
    );
}

#[test]
fn fenced_block_with_language_tag() {
    let raw = "Sure!\n```json\n{\"text\": \"ok\"}\n```\nAnything else?";
    assert_eq!(extract_json(raw), Some(json!({"text": "ok"})));
}

#[test]
fn fenced_block_without_tag_and_unterminated() {
    assert_eq!(extract_json("```\n{\"a\": 2}\n```"), Some(json!({"a": 2})));
    assert_eq!(extract_json("```json\n{\"a\": 3}"), Some(json!({"a": 3})));
    assert_eq!(extract_json("```{\"a\": 4}```"), Some(json!({"a": 4})));
}

#[test]
fn fenced_body_with_trailing_object() {
    let raw = "```\nresult: {\"a\": 5}\n```";
    assert_eq!(extract_json(raw), Some(json!({"a": 5})));
}

#[test]
fn garbage_yields_none() {
    assert_eq!(extract_json(""), None);
    assert_eq!(extract_json("   "), None);
    assert_eq!(extract_json("no json here"), None);
    assert_eq!(extract_json("{ broken"), None);
    assert_eq!(extract_json("```json\nnot json\n```"), None);
    assert_eq!(extract_json("}}}{{{"), None);
}

#[test]
fn strip_code_fence_keeps_body_only() {
    assert_eq!(strip_code_fence("a ```rust\nfn x() {}\n``` b"), Some("fn x() {}"));
    assert_eq!(strip_code_fence("no fence"), None);
}
