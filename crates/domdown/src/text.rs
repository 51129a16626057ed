//! Text utilities: HTML entity decoding for text nodes and attribute values.

use std::borrow::Cow;
use std::char;

/// Decode HTML entities, borrowing the input when it contains none.
///
/// Handles the named entities that occur in practice in text content and
/// attribute values, plus decimal and hexadecimal numeric references.
/// Unrecognized entities are passed through unchanged.
pub(crate) fn decode_html_entities_cow(input: &str) -> Cow<'_, str> {
    if !input.contains('&') {
        return Cow::Borrowed(input);
    }
    Cow::Owned(decode_html_entities(input))
}

fn decode_html_entities(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let bytes = input.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'&' {
            let start = i;
            while i < bytes.len() && bytes[i] != b'&' {
                i += 1;
            }
            out.push_str(&input[start..i]);
            continue;
        }

        // Entities are at most ~10 bytes; look for the terminating semicolon
        // within a short window so a bare '&' doesn't trigger a long scan.
        let rest = &input[i..];
        let semi = rest.bytes().take(12).position(|b| b == b';');
        let Some(semi) = semi else {
            out.push('&');
            i += 1;
            continue;
        };

        let entity = &rest[1..semi];
        if let Some(decoded) = decode_entity(entity) {
            out.push_str(&decoded);
            i += semi + 1;
        } else {
            out.push('&');
            i += 1;
        }
    }

    out
}

fn decode_entity(entity: &str) -> Option<String> {
    if let Some(num) = entity.strip_prefix('#') {
        let code = if let Some(hex) = num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
            u32::from_str_radix(hex, 16).ok()?
        } else {
            num.parse::<u32>().ok()?
        };
        return char::from_u32(code).map(String::from);
    }

    let ch = match entity {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "copy" => '\u{a9}',
        "reg" => '\u{ae}',
        "trade" => '\u{2122}',
        "hellip" => '\u{2026}',
        "mdash" => '\u{2014}',
        "ndash" => '\u{2013}',
        "lsquo" => '\u{2018}',
        "rsquo" => '\u{2019}',
        "ldquo" => '\u{201c}',
        "rdquo" => '\u{201d}',
        "bull" => '\u{2022}',
        "middot" => '\u{b7}',
        "times" => '\u{d7}',
        "divide" => '\u{f7}',
        _ => return None,
    };
    Some(ch.to_string())
}

/// Collapse runs of ASCII whitespace (including newlines) to a single space.
pub(crate) fn collapse_whitespace(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_ws = false;
    for ch in input.chars() {
        if ch.is_whitespace() {
            if !in_ws {
                out.push(' ');
            }
            in_ws = true;
        } else {
            out.push(ch);
            in_ws = false;
        }
    }
    out
}
