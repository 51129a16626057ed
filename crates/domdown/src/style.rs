//! Minimal inline `style` attribute parsing.
//!
//! The engine inspects inline styles for exactly one purpose: deciding
//! whether a `<pre>` element declares a monospace font family, which is
//! treated as evidence that it is a code block. An unparseable style string
//! is never an error, it simply provides no evidence.

/// Parse an inline style string into `(property, value)` pairs.
///
/// Properties are lowercased and trimmed; values are trimmed. Declarations
/// missing a `:` are skipped.
pub(crate) fn parse_declarations(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| {
            let (prop, value) = decl.split_once(':')?;
            let prop = prop.trim().to_ascii_lowercase();
            let value = value.trim().to_string();
            if prop.is_empty() || value.is_empty() {
                return None;
            }
            Some((prop, value))
        })
        .collect()
}

/// Does the style declare a `font-family` list containing `monospace`?
pub(crate) fn declares_monospace(style: &str) -> bool {
    parse_declarations(style)
        .iter()
        .filter(|(prop, _)| prop == "font-family")
        .any(|(_, value)| {
            value.split(',').any(|family| {
                family
                    .trim()
                    .trim_matches(|c| c == '"' || c == '\'')
                    .eq_ignore_ascii_case("monospace")
            })
        })
}
