//! Content-dependent detectors consumed by specific rules.
//!
//! Each detector is a predicate or extractor over the fixed node interface.
//! They encode the duck-typed special cases (code-block sniffing, checklist
//! items, named anchors, math scripts, lossless source blocks) so the rule
//! table itself stays a plain ordered list of filters.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::dom::NodeRef;
use crate::entities::encode_entities;
use crate::options::Options;
use crate::style;

static LANGUAGE_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"language-(\S+)").expect("valid regex"));

/// Legacy rendering pattern: a `<pre>` inside a `<td class="code">`.
pub(crate) fn is_legacy_table_code_block(node: &NodeRef) -> bool {
    if !node.is_tag("pre") {
        return false;
    }
    node.parent()
        .is_some_and(|parent| parent.is_tag("td") && parent.has_class("code"))
}

/// A `<pre>` whose inline style declares a monospace font family.
///
/// An absent or unparseable style attribute is simply not a match.
pub(crate) fn is_monospace_pre(node: &NodeRef) -> bool {
    if !node.is_tag("pre") {
        return false;
    }
    node.attr("style")
        .is_some_and(|style| style::declares_monospace(&style))
}

/// The canonical shape: a `<pre>` whose first significant child is `<code>`.
pub(crate) fn is_pre_code_pair(node: &NodeRef) -> bool {
    node.is_tag("pre")
        && node
            .first_significant_child()
            .is_some_and(|child| child.is_tag("code"))
}

/// Is this node a code block under any of the three recognition paths?
pub(crate) fn is_code_block(node: &NodeRef) -> bool {
    is_legacy_table_code_block(node) || is_monospace_pre(node) || is_pre_code_pair(node)
}

/// The element whose text and classes describe the code block: the `<pre>`
/// itself for the legacy and monospace shapes, otherwise its `<code>` child.
pub(crate) fn code_block_payload<'a>(node: &NodeRef<'a>) -> NodeRef<'a> {
    if is_legacy_table_code_block(node) || is_monospace_pre(node) {
        return *node;
    }
    node.first_significant_child().unwrap_or(*node)
}

/// Extract a language hint from a `language-X` class token.
pub(crate) fn language_hint(node: &NodeRef) -> String {
    node.attr("class")
        .and_then(|classes| {
            LANGUAGE_CLASS
                .captures(&classes)
                .map(|caps| caps[1].to_string())
        })
        .unwrap_or_default()
}

/// How a checklist item was recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ChecklistItem {
    /// Checked state of the item.
    pub checked: bool,
}

/// Recognize a list item as a checklist entry.
///
/// Two distinct renderings exist: a legacy one where the `<li>` itself
/// carries the `checkbox-item` class and the state lives on a descendant
/// `<input checked>`, and the current one where the item sits inside a
/// `checklist`-classed ancestor and the state is a `checked` class on the
/// item.
pub(crate) fn checklist_item(node: &NodeRef) -> Option<ChecklistItem> {
    if node.has_class("checkbox-item") {
        let checked = node
            .find_descendant_tag("input")
            .is_some_and(|input| input.has_attr("checked"));
        return Some(ChecklistItem { checked });
    }

    if node.ancestor_with_class("checklist").is_some() {
        return Some(ChecklistItem {
            checked: node.has_class("checked"),
        });
    }

    None
}

/// Anchor marker for an element whose id (or name) is in the allow-list.
///
/// Returns the literal `<a id="..."></a>` fragment to prepend, with the
/// identifier entity-encoded.
pub(crate) fn named_anchor(node: &NodeRef, options: &Options) -> Option<String> {
    let id = node
        .attr("id")
        .filter(|value| !value.trim().is_empty())
        .or_else(|| node.attr("name"))?;
    let id = id.trim();

    if !id.is_empty() && options.anchor_name_allowed(id) {
        Some(format!("<a id=\"{}\"></a>", encode_entities(id)))
    } else {
        None
    }
}

/// Display mode of a recognized math script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MathKind {
    /// Wrapped in single `$` delimiters.
    Inline,
    /// Wrapped in `$$` delimiters on their own lines.
    Block,
}

/// Recognize a `<script>` whose type signals a TeX math payload.
pub(crate) fn math_script_kind(node: &NodeRef) -> Option<MathKind> {
    if !node.is_tag("script") {
        return None;
    }
    let script_type = node.attr("type")?;
    if !script_type.contains("math/tex") {
        return None;
    }
    if script_type.contains("display") {
        Some(MathKind::Block)
    } else {
        Some(MathKind::Inline)
    }
}

/// A container wrapping an original-format payload alongside its rendered
/// preview, enabling lossless reproduction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SourceBlock {
    /// Characters opening the original construct.
    pub open: String,
    /// Characters closing the original construct.
    pub close: String,
    /// The raw payload, reproduced byte-for-byte.
    pub content: String,
}

/// Recognize a lossless source container: an element classed
/// `markdown-editable` with a direct child classed `markdown-source`.
pub(crate) fn source_block(node: &NodeRef) -> Option<SourceBlock> {
    if !node.is_element() || !node.has_class("markdown-editable") {
        return None;
    }

    let source = node
        .children()
        .into_iter()
        .find(|child| child.is_element() && child.has_class("markdown-source"))?;

    Some(SourceBlock {
        open: source.attr("data-source-open").unwrap_or_default(),
        close: source.attr("data-source-close").unwrap_or_default(),
        content: source.text_content(),
    })
}

/// URL of a `<source>` candidate inside a `<picture>`.
///
/// `srcset` may carry several comma-separated descriptors, each optionally
/// suffixed with a density or width token; only the first URL is taken.
pub(crate) fn source_candidate_url(node: &NodeRef) -> Option<String> {
    let srcset = node
        .attr("srcset")
        .filter(|value| !value.trim().is_empty())
        .or_else(|| node.attr("data-srcset"))?;

    let first = srcset.split(',').next()?;
    let url = first.split_whitespace().next()?;
    if url.is_empty() {
        None
    } else {
        Some(url.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{NodeRef, build_dom_context};

    fn with_first_tag<F: FnOnce(NodeRef)>(html: &str, tag: &str, check: F) {
        let dom = tl::parse(html, tl::ParserOptions::default()).expect("parse");
        let parser = dom.parser();
        let ctx = build_dom_context(&dom);
        let found = ctx
            .root_children()
            .iter()
            .map(|handle| NodeRef::new(&ctx, parser, *handle))
            .find_map(|root| {
                if root.is_tag(tag) {
                    Some(root)
                } else {
                    root.find_descendant_tag(tag)
                }
            })
            .expect("tag present");
        check(found);
    }

    #[test]
    fn legacy_table_code_block() {
        with_first_tag(
            "<table><tr><td class=\"code\"><pre>x</pre></td></tr></table>",
            "pre",
            |pre| assert!(is_legacy_table_code_block(&pre)),
        );
    }

    #[test]
    fn monospace_pre_via_style() {
        with_first_tag(
            "<pre style=\"font-family: Menlo, monospace\">x</pre>",
            "pre",
            |pre| assert!(is_monospace_pre(&pre)),
        );
        with_first_tag("<pre style=\"not parseable\">x</pre>", "pre", |pre| {
            assert!(!is_monospace_pre(&pre));
        });
    }

    #[test]
    fn pre_code_pair_allows_leading_whitespace() {
        with_first_tag("<pre>\n  <code>x</code></pre>", "pre", |pre| {
            assert!(is_pre_code_pair(&pre));
        });
        with_first_tag("<pre>plain</pre>", "pre", |pre| {
            assert!(!is_pre_code_pair(&pre));
        });
    }

    #[test]
    fn language_hint_from_class() {
        with_first_tag(
            "<pre><code class=\"highlight language-python\">x</code></pre>",
            "code",
            |code| assert_eq!(language_hint(&code), "python"),
        );
    }

    #[test]
    fn checklist_by_ancestor_class() {
        with_first_tag(
            "<ul class=\"checklist\"><li class=\"checked\">done</li></ul>",
            "li",
            |li| {
                assert_eq!(checklist_item(&li), Some(ChecklistItem { checked: true }));
            },
        );
    }

    #[test]
    fn checklist_by_input_descendant() {
        with_first_tag(
            "<ul><li class=\"checkbox-item\"><input type=\"checkbox\" checked>task</li></ul>",
            "li",
            |li| {
                assert_eq!(checklist_item(&li), Some(ChecklistItem { checked: true }));
            },
        );
        with_first_tag(
            "<ul><li class=\"checkbox-item\"><input type=\"checkbox\">task</li></ul>",
            "li",
            |li| {
                assert_eq!(checklist_item(&li), Some(ChecklistItem { checked: false }));
            },
        );
    }

    #[test]
    fn plain_list_item_is_not_checklist() {
        with_first_tag("<ul><li>task</li></ul>", "li", |li| {
            assert_eq!(checklist_item(&li), None);
        });
    }

    #[test]
    fn math_script_detection() {
        with_first_tag(
            "<script type=\"math/tex; mode=display\">x^2</script>",
            "script",
            |script| assert_eq!(math_script_kind(&script), Some(MathKind::Block)),
        );
        with_first_tag("<script type=\"math/tex\">x^2</script>", "script", |script| {
            assert_eq!(math_script_kind(&script), Some(MathKind::Inline));
        });
        with_first_tag("<script type=\"text/javascript\">x</script>", "script", |script| {
            assert_eq!(math_script_kind(&script), None);
        });
    }

    #[test]
    fn source_candidate_takes_first_descriptor() {
        with_first_tag(
            "<picture><source srcset=\"a.png, a@2x.png 2x\"></picture>",
            "source",
            |source| assert_eq!(source_candidate_url(&source).as_deref(), Some("a.png")),
        );
    }

    #[test]
    fn source_block_extraction() {
        with_first_tag(
            "<div class=\"markdown-editable\">\
             <pre class=\"markdown-source\" data-source-open=\"$$\" data-source-close=\"$$\">f(x)</pre>\
             <span>rendered</span></div>",
            "div",
            |div| {
                let info = source_block(&div).expect("source block");
                assert_eq!(info.open, "$$");
                assert_eq!(info.close, "$$");
                assert_eq!(info.content, "f(x)");
            },
        );
    }
}
