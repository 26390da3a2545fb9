use super::*;
use serde_json::json;

#[test]
fn numbers_strings_and_bools_coerce() {
    assert_eq!(coerce_number(Some(&json!(12.5))), Some(12.5));
    assert_eq!(coerce_number(Some(&json!(-3))), Some(-3.0));
    assert_eq!(coerce_number(Some(&json!(" 40 "))), Some(40.0));
    assert_eq!(coerce_number(Some(&json!(true))), Some(1.0));
    assert_eq!(coerce_number(Some(&json!(false))), Some(0.0));
}

#[test]
fn non_numeric_and_non_finite_are_rejected() {
    assert_eq!(coerce_number(None), None);
    assert_eq!(coerce_number(Some(&json!(null))), None);
    assert_eq!(coerce_number(Some(&json!("abc"))), None);
    assert_eq!(coerce_number(Some(&json!("inf"))), None);
    assert_eq!(coerce_number(Some(&json!("NaN"))), None);
    assert_eq!(coerce_number(Some(&json!([1]))), None);
    assert_eq!(coerce_number(Some(&json!({"v": 1}))), None);
}

#[test]
fn ids_accept_strings_and_numbers() {
    assert_eq!(coerce_id(Some(&json!(" a "))), Some("a".to_string()));
    assert_eq!(coerce_id(Some(&json!(7))), Some("7".to_string()));
    assert_eq!(coerce_id(Some(&json!(""))), None);
    assert_eq!(coerce_id(Some(&json!(false))), None);
    assert_eq!(coerce_id(None), None);
}

#[test]
fn tag_is_trims_and_ignores_case() {
    assert!(tag_is(Some(&json!(" Orbit ")), "orbit"));
    assert!(!tag_is(Some(&json!("x")), "orbit"));
    assert!(!tag_is(Some(&json!(1)), "orbit"));
    assert!(!tag_is(None, "orbit"));
}
