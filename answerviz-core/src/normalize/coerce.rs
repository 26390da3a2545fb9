use serde_json::Value;

/// Loose numeric reading of an untrusted field.
///
/// Numbers pass through, numeric strings are parsed, booleans become `1`/`0`. Everything else,
/// and any non-finite result, is `None` so the caller substitutes its default.
pub fn coerce_number(v: Option<&Value>) -> Option<f64> {
    let n = match v? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    n.is_finite().then_some(n)
}

/// Non-empty string, or a number rendered as text. Used for identifiers.
pub(crate) fn coerce_id(v: Option<&Value>) -> Option<String> {
    match v? {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Tag comparison used for `type` / `property` discriminators.
pub(crate) fn tag_is(v: Option<&Value>, tag: &str) -> bool {
    v.and_then(Value::as_str)
        .is_some_and(|s| s.trim().eq_ignore_ascii_case(tag))
}

#[cfg(test)]
#[path = "../../tests/unit/normalize/coerce.rs"]
mod tests;
