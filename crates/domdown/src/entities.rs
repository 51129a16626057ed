//! Entity encoding for literal HTML fragments embedded in the output.

/// Encode characters that are significant in HTML attribute or text context.
///
/// Used when the engine emits a literal HTML fragment itself, such as the
/// `<a id="..."></a>` marker for an allow-listed named anchor.
pub(crate) fn encode_entities(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::encode_entities;

    #[test]
    fn encodes_markup_characters() {
        assert_eq!(encode_entities(r#"a<b>&"c""#), "a&lt;b&gt;&amp;&quot;c&quot;");
    }

    #[test]
    fn identity_on_plain_identifiers() {
        assert_eq!(encode_entities("section-2"), "section-2");
    }
}
