use std::borrow::Cow;

const REDACTED: &str = "REDACTED";

/// `key=value` and `"key":"value"` forms whose values are credentials.
const TOKEN_KEYS: [&str; 4] = ["access_token=", "refresh_token=", "session=", "token="];
const JSON_TOKEN_KEYS: [&str; 2] = ["\"access_token\":\"", "\"refresh_token\":\""];

/// Header prefixes whose value runs to end-of-line.
const HEADER_PREFIXES: [&str; 3] = ["authorization: bearer", "cookie:", "set-cookie:"];

fn find_ignore_case(haystack: &str, needle: &str) -> Option<usize> {
    let needle = needle.as_bytes();
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|w| w.eq_ignore_ascii_case(needle))
}

/// Replaces the text after every occurrence of `marker` up to the first char matching
/// `stop`. The marker itself is kept as written in the input.
fn mask_after(input: &str, marker: &str, stop: impl Fn(char) -> bool) -> Option<String> {
    find_ignore_case(input, marker)?;

    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(idx) = find_ignore_case(rest, marker) {
        let value_start = idx + marker.len();
        out.push_str(&rest[..value_start]);
        rest = &rest[value_start..];
        if let Some(stripped) = rest.strip_prefix(' ') {
            out.push(' ');
            rest = stripped;
        }

        let value_len = rest.find(|c: char| stop(c)).unwrap_or(rest.len());
        if value_len > 0 {
            out.push_str(REDACTED);
        }
        rest = &rest[value_len..];
    }
    out.push_str(rest);
    Some(out)
}

pub fn redact_secrets(input: &str) -> Cow<'_, str> {
    let mut value = Cow::Borrowed(input);

    for prefix in HEADER_PREFIXES {
        if let Some(out) = mask_after(&value, prefix, |c| c == '\n' || c == '\r') {
            value = Cow::Owned(out);
        }
    }
    for key in TOKEN_KEYS {
        if let Some(out) = mask_after(&value, key, |c| {
            c == ';' || c == '&' || c == '"' || c == ',' || c.is_whitespace()
        }) {
            value = Cow::Owned(out);
        }
    }
    for key in JSON_TOKEN_KEYS {
        if let Some(out) = mask_after(&value, key, |c| c == '"') {
            value = Cow::Owned(out);
        }
    }

    if value == input {
        Cow::Borrowed(input)
    } else {
        value
    }
}
