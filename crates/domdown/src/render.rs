//! The recursive renderer: folds the tree bottom-up through the rule table.

use crate::classify;
use crate::dom::{NodeRef, build_dom_context};
use crate::error::{ConversionError, Result};
use crate::escape;
use crate::options::Options;
use crate::postprocess;
use crate::rules::{Rule, RuleTable};
use crate::text;

/// Recursion bound. A well-formed document never approaches this; a tree
/// this deep violates the parser's structural contract.
const MAX_DEPTH: usize = 512;

/// Mutable state scoped to exactly one conversion call.
///
/// Created fresh at the start of `convert` and discarded at its end, so
/// sequential and concurrent conversions never observe each other's
/// accumulators. Rules reach it through their replacement function; state
/// is never attached to the rule catalog itself.
#[derive(Default)]
pub struct RenderContext {
    references: Vec<String>,
}

impl RenderContext {
    fn new() -> Self {
        Self::default()
    }

    /// Defer a link or footnote definition to the end of the document.
    pub fn push_reference(&mut self, definition: String) {
        self.references.push(definition);
    }

    /// Number of definitions collected so far in this conversion.
    pub fn reference_count(&self) -> usize {
        self.references.len()
    }

    pub(crate) fn take_references(&mut self) -> Vec<String> {
        std::mem::take(&mut self.references)
    }
}

/// A reusable conversion engine: immutable options plus the rule table.
///
/// `convert` takes `&self` and allocates all per-call state internally, so
/// one engine can serve sequential calls, and concurrent calls from
/// multiple threads are safe because each gets an independent context.
pub struct Engine {
    options: Options,
    rules: RuleTable,
}

impl Engine {
    /// Create an engine with the built-in rule set.
    pub fn new(options: Options) -> Self {
        Self {
            options,
            rules: RuleTable::new(),
        }
    }

    /// The options this engine converts with.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Register a custom rule ahead of the built-ins.
    pub fn add_rule(&mut self, rule: Rule) {
        self.rules.add(rule);
    }

    /// Parse `html` with the external parser and convert the resulting tree.
    pub fn convert(&self, html: &str) -> Result<String> {
        let dom = tl::parse(html, tl::ParserOptions::default())
            .map_err(|err| ConversionError::ParseError(err.to_string()))?;
        self.convert_dom(&dom)
    }

    /// Convert an already-parsed document tree.
    pub fn convert_dom(&self, dom: &tl::VDom) -> Result<String> {
        let parser = dom.parser();
        let dom_ctx = build_dom_context(dom);
        let mut ctx = RenderContext::new();

        let roots: Vec<NodeRef> = dom_ctx
            .root_children()
            .iter()
            .map(|handle| NodeRef::new(&dom_ctx, parser, *handle))
            .collect();
        let body = self.render_children(&roots, false, 0, &mut ctx)?;

        Ok(postprocess::postprocess(&body, ctx.take_references()))
    }

    fn render_children(
        &self,
        nodes: &[NodeRef],
        raw: bool,
        depth: usize,
        ctx: &mut RenderContext,
    ) -> Result<String> {
        let mut output = String::new();
        for node in nodes {
            let fragment = self.render_node(node, raw, depth, ctx)?;
            output = join_fragments(output, &fragment);
        }
        Ok(output)
    }

    fn render_node(
        &self,
        node: &NodeRef,
        raw: bool,
        depth: usize,
        ctx: &mut RenderContext,
    ) -> Result<String> {
        if depth > MAX_DEPTH {
            return Err(ConversionError::DepthLimitExceeded {
                tag: node.describe().into_owned(),
                depth: MAX_DEPTH,
            });
        }

        if node.is_comment() {
            return Ok(String::new());
        }
        if node.is_text() {
            return Ok(self.render_text(node, raw));
        }

        let rule = self.rules.resolve(node, &self.options);
        let tag_is_code_like = node
            .tag_name()
            .is_some_and(|name| matches!(name.as_str(), "pre" | "code" | "kbd" | "samp"));
        let children_raw = raw || !rule.escapes_content() || tag_is_code_like;

        let content = if node.tag_name().is_some_and(|name| classify::is_void(&name)) {
            String::new()
        } else {
            self.render_children(&node.children(), children_raw, depth + 1, ctx)?
        };

        Ok(rule.apply(&content, node, &self.options, ctx))
    }

    /// Render a text node: raw mode passes it through byte-for-byte,
    /// otherwise whitespace is collapsed, block-boundary whitespace is
    /// trimmed, and Markdown syntax characters are escaped.
    fn render_text(&self, node: &NodeRef, raw: bool) -> String {
        let Some(content) = node.raw_text() else {
            return String::new();
        };
        if raw {
            return content;
        }

        let collapsed = text::collapse_whitespace(&content);

        let prev_inline = nearest_sibling_inline(node, Direction::Prev);
        let next_inline = nearest_sibling_inline(node, Direction::Next);
        let mut trimmed: &str = &collapsed;
        if !prev_inline {
            trimmed = trimmed.trim_start();
        }
        if !next_inline {
            trimmed = trimmed.trim_end();
        }
        if trimmed.is_empty() {
            return String::new();
        }

        escape::escape(trimmed, true)
    }
}

enum Direction {
    Prev,
    Next,
}

/// Is the nearest non-comment sibling in the given direction inline-like?
/// No sibling at all means a block boundary (the edge of the parent).
fn nearest_sibling_inline(node: &NodeRef, direction: Direction) -> bool {
    let mut current = match direction {
        Direction::Prev => node.prev_sibling(),
        Direction::Next => node.next_sibling(),
    };
    while let Some(sibling) = current {
        if !sibling.is_comment() {
            return sibling.is_inline_like();
        }
        current = match direction {
            Direction::Prev => sibling.prev_sibling(),
            Direction::Next => sibling.next_sibling(),
        };
    }
    false
}

/// Concatenate two rendered fragments, meeting in at most one blank line.
///
/// The separator is the larger of the left fragment's trailing newline run
/// and the right fragment's leading newline run, capped at two newlines, so
/// block rules can emit blank-line pairs liberally without stacking up.
fn join_fragments(left: String, right: &str) -> String {
    if left.is_empty() {
        return right.to_string();
    }
    if right.is_empty() {
        return left;
    }

    let left_trimmed = left.trim_end_matches('\n');
    let right_trimmed = right.trim_start_matches('\n');
    let newlines = (left.len() - left_trimmed.len()).max(right.len() - right_trimmed.len());
    let separator = &"\n\n"[..newlines.min(2)];

    let mut output = String::with_capacity(left_trimmed.len() + separator.len() + right_trimmed.len());
    output.push_str(left_trimmed);
    output.push_str(separator);
    output.push_str(right_trimmed);
    output
}

#[cfg(test)]
mod tests {
    use super::join_fragments;

    #[test]
    fn join_caps_separator_at_one_blank_line() {
        assert_eq!(join_fragments("a\n\n\n".to_string(), "\n\n\nb"), "a\n\nb");
        assert_eq!(join_fragments("a\n".to_string(), "b"), "a\nb");
        assert_eq!(join_fragments("a".to_string(), "b"), "ab");
    }

    #[test]
    fn join_with_empty_sides() {
        assert_eq!(join_fragments(String::new(), "b"), "b");
        assert_eq!(join_fragments("a".to_string(), ""), "a");
    }
}
