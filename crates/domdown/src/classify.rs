//! Tag-name classification: block, inline, void, and non-rendering elements.
//!
//! Classification here is purely by name. Attribute-driven specialization
//! (checklists, math scripts, lossless source blocks) lives in `detect` and
//! is layered on top of this by the rule table.

/// Is the element block-displayed, requiring blank-line separation?
pub fn is_block(tag_name: &str) -> bool {
    matches!(
        tag_name,
        "address"
            | "article"
            | "aside"
            | "blockquote"
            | "body"
            | "details"
            | "dd"
            | "div"
            | "dl"
            | "dt"
            | "fieldset"
            | "figcaption"
            | "figure"
            | "footer"
            | "form"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "header"
            | "hgroup"
            | "hr"
            | "html"
            | "li"
            | "main"
            | "nav"
            | "ol"
            | "p"
            | "pre"
            | "section"
            | "summary"
            | "table"
            | "tbody"
            | "td"
            | "tfoot"
            | "th"
            | "thead"
            | "tr"
            | "ul"
    )
}

/// Is the element inline-displayed?
pub fn is_inline(tag_name: &str) -> bool {
    matches!(
        tag_name,
        "a" | "abbr"
            | "b"
            | "bdi"
            | "bdo"
            | "br"
            | "cite"
            | "code"
            | "data"
            | "del"
            | "dfn"
            | "em"
            | "i"
            | "img"
            | "ins"
            | "kbd"
            | "label"
            | "mark"
            | "picture"
            | "q"
            | "rp"
            | "rt"
            | "ruby"
            | "s"
            | "samp"
            | "small"
            | "source"
            | "span"
            | "strong"
            | "sub"
            | "sup"
            | "time"
            | "u"
            | "var"
            | "wbr"
    )
}

/// Is the element void (self-closing, never has rendered children)?
pub fn is_void(tag_name: &str) -> bool {
    matches!(
        tag_name,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "source"
            | "track"
            | "wbr"
    )
}

/// Does the element never contribute rendered output?
///
/// `script` is listed here even though math scripts are converted; the
/// math rules sit ahead of the non-rendering fallback in the rule table,
/// so only non-math scripts reach this classification.
pub fn is_non_rendering(tag_name: &str) -> bool {
    matches!(
        tag_name,
        "head" | "style" | "script" | "title" | "meta" | "link" | "base" | "template" | "noscript"
    )
}
