//! Escaping of Markdown-significant characters in literal text.
//!
//! Escaping is positional: some characters are only syntax when they begin a
//! line (heading and list markers, blockquote markers), others are syntax
//! anywhere (emphasis delimiters, brackets, backticks, backslashes). Rules
//! that need byte-for-byte content (code blocks, math, lossless source)
//! bypass this module entirely.

/// Escape Markdown syntax characters in `text`.
///
/// `at_line_start` says whether the first character of `text` will land at
/// the start of an output line; characters after an embedded newline always
/// count as line starts.
pub fn escape(text: &str, at_line_start: bool) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    for (idx, line) in text.split('\n').enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        escape_line(line, at_line_start || idx > 0, &mut out);
    }
    out
}

fn escape_line(line: &str, line_start: bool, out: &mut String) {
    let rest = if line_start {
        escape_line_prefix(line, out)
    } else {
        line
    };

    for ch in rest.chars() {
        match ch {
            '\\' | '*' | '_' | '[' | ']' | '`' => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
}

/// Handle the escapes that only apply at the start of a line. Returns the
/// unconsumed remainder of the line.
fn escape_line_prefix<'a>(line: &'a str, out: &mut String) -> &'a str {
    let bytes = line.as_bytes();

    // Heading marker: a run of 1-6 '#' followed by a space.
    let hashes = bytes.iter().take_while(|&&b| b == b'#').count();
    if (1..=6).contains(&hashes) && bytes.get(hashes) == Some(&b' ') {
        out.push('\\');
        return line;
    }

    // Setext underline: a run of '='.
    if bytes.first() == Some(&b'=') {
        out.push('\\');
        return line;
    }

    // Tilde code fence.
    if line.starts_with("~~~") {
        out.push('\\');
        return line;
    }

    match bytes.first() {
        Some(b'-') => {
            out.push_str("\\-");
            return &line[1..];
        }
        Some(b'>') => {
            out.push_str("\\>");
            return &line[1..];
        }
        Some(b'+') if bytes.get(1) == Some(&b' ') => {
            out.push_str("\\+");
            return &line[1..];
        }
        _ => {}
    }

    // Ordered list marker: digits, then '.' or ')', then a space.
    let digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
    if digits > 0
        && matches!(bytes.get(digits), Some(b'.' | b')'))
        && bytes.get(digits + 1) == Some(&b' ')
    {
        out.push_str(&line[..digits]);
        out.push('\\');
        out.push(bytes[digits] as char);
        return &line[digits + 1..];
    }

    line
}
