use serde_json::Value;

const FENCE: &str = "```";

/// Best-effort recovery of a JSON value from raw model output.
///
/// Tries, in order: the whole string; the trailing `{...}` that runs to the end of the string;
/// then both again on the body of the first fenced code block. Returns `None` when nothing
/// parses. Never fails loudly; the sanitizer downstream is the safety boundary.
pub fn extract_json(raw: &str) -> Option<Value> {
    if let Some(v) = parse_whole_or_trailing(raw) {
        return Some(v);
    }

    let body = strip_code_fence(raw)?;
    let v = parse_whole_or_trailing(body);
    if v.is_some() {
        tracing::debug!(strategy = "fenced", "extracted json from code fence");
    }
    v
}

fn parse_whole_or_trailing(s: &str) -> Option<Value> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(v) = serde_json::from_str::<Value>(s) {
        tracing::debug!(strategy = "whole", "extracted json");
        return Some(v);
    }

    let v = trailing_object(s)?;
    tracing::debug!(strategy = "trailing_object", "extracted json");
    Some(v)
}

/// Parses the `{...}` that closes at the end of `s`.
///
/// Walks backward from the final `}` counting brace depth outside JSON strings, so braces in the
/// prose before the object never matter.
fn trailing_object(s: &str) -> Option<Value> {
    let open = matching_open_brace(s)?;
    serde_json::from_str::<Value>(&s[open..]).ok()
}

fn matching_open_brace(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    if bytes.last() != Some(&b'}') {
        return None;
    }

    let mut depth = 0usize;
    let mut in_string = false;
    for i in (0..bytes.len()).rev() {
        match bytes[i] {
            b'"' if !is_escaped(bytes, i) => in_string = !in_string,
            _ if in_string => {}
            b'}' => depth += 1,
            b'{' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Odd run of backslashes right before `i`.
fn is_escaped(bytes: &[u8], i: usize) -> bool {
    bytes[..i].iter().rev().take_while(|&&b| b == b'\\').count() % 2 == 1
}

/// Body of the first fenced block, without the opening language tag.
///
/// An unterminated fence runs to the end of the input.
pub(crate) fn strip_code_fence(s: &str) -> Option<&str> {
    let open = s.find(FENCE)?;
    let rest = &s[open + FENCE.len()..];

    // Language tag: everything up to the first newline, when it looks like a tag.
    let body = match rest.split_once('\n') {
        Some((tag, body)) if is_language_tag(tag) => body,
        _ => rest,
    };

    let body = match body.find(FENCE) {
        Some(close) => &body[..close],
        None => body,
    };
    Some(body.trim())
}

fn is_language_tag(s: &str) -> bool {
    s.trim()
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+' | '.'))
}

#[cfg(test)]
#[path = "../../tests/unit/extract/json.rs"]
mod tests;
