//! A lightweight, copyable reference to one node of the input tree.

use std::borrow::Cow;

use crate::classify;
use crate::dom::DomContext;
use crate::text;

/// One node of the externally-owned input tree, as seen by rules.
///
/// A `NodeRef` bundles the `tl` node handle with the parser and the
/// precomputed navigational maps, exposing the tag name (case-normalized),
/// attributes, classes, parent/sibling navigation, and text content. It is
/// `Copy` and never outlives or mutates the parsed document.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    pub(crate) dom: &'a DomContext,
    pub(crate) parser: &'a tl::Parser<'a>,
    pub(crate) handle: tl::NodeHandle,
}

impl<'a> NodeRef<'a> {
    pub(crate) fn new(
        dom: &'a DomContext,
        parser: &'a tl::Parser<'a>,
        handle: tl::NodeHandle,
    ) -> Self {
        Self { dom, parser, handle }
    }

    fn get(&self) -> Option<&'a tl::Node<'a>> {
        self.handle.get(self.parser)
    }

    fn id(&self) -> u32 {
        self.handle.get_inner()
    }

    /// The lowercased tag name, or `None` for text and comment nodes.
    pub fn tag_name(&self) -> Option<String> {
        match self.get()? {
            tl::Node::Tag(tag) => Some(tag.name().as_utf8_str().to_ascii_lowercase()),
            _ => None,
        }
    }

    /// Is this an element node?
    pub fn is_element(&self) -> bool {
        matches!(self.get(), Some(tl::Node::Tag(_)))
    }

    /// Is this a text node?
    pub fn is_text(&self) -> bool {
        matches!(self.get(), Some(tl::Node::Raw(_)))
    }

    /// Is this a comment node?
    pub fn is_comment(&self) -> bool {
        matches!(self.get(), Some(tl::Node::Comment(_)))
    }

    /// Does the element's lowercased tag name equal `name`?
    pub fn is_tag(&self, name: &str) -> bool {
        match self.get() {
            Some(tl::Node::Tag(tag)) => tag.name().as_utf8_str().eq_ignore_ascii_case(name),
            _ => false,
        }
    }

    /// The entity-decoded text of this node if it is a text node.
    pub fn raw_text(&self) -> Option<String> {
        match self.get()? {
            tl::Node::Raw(bytes) => {
                let raw = bytes.as_utf8_str();
                Some(text::decode_html_entities_cow(raw.as_ref()).into_owned())
            }
            _ => None,
        }
    }

    /// Is this a text node consisting only of whitespace?
    pub fn is_whitespace_text(&self) -> bool {
        match self.get() {
            Some(tl::Node::Raw(bytes)) => bytes.as_utf8_str().trim().is_empty(),
            _ => false,
        }
    }

    /// An attribute value, entity-decoded. `Some("")` for a bare attribute.
    pub fn attr(&self, name: &str) -> Option<String> {
        match self.get()? {
            tl::Node::Tag(tag) => match tag.attributes().get(name) {
                Some(Some(value)) => {
                    let raw = value.as_utf8_str();
                    Some(text::decode_html_entities_cow(raw.as_ref()).into_owned())
                }
                Some(None) => Some(String::new()),
                None => None,
            },
            _ => None,
        }
    }

    /// Does the attribute exist at all (with or without a value)?
    pub fn has_attr(&self, name: &str) -> bool {
        match self.get() {
            Some(tl::Node::Tag(tag)) => tag.attributes().get(name).is_some(),
            _ => false,
        }
    }

    /// Is `name` one of the element's space-separated class tokens?
    pub fn has_class(&self, name: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|token| token == name))
    }

    /// The parent element, if any.
    pub fn parent(&self) -> Option<NodeRef<'a>> {
        let parent_id = self.dom.parent_of(self.id())?;
        let handle = self.dom.node_handle(parent_id)?;
        Some(NodeRef::new(self.dom, self.parser, *handle))
    }

    /// All child nodes in document order (text, comments, elements).
    pub fn children(&self) -> Vec<NodeRef<'a>> {
        self.dom
            .children_of(self.id())
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .iter()
            .map(|handle| NodeRef::new(self.dom, self.parser, *handle))
            .collect()
    }

    /// Child element nodes in document order.
    pub fn element_children(&self) -> Vec<NodeRef<'a>> {
        self.children().into_iter().filter(NodeRef::is_element).collect()
    }

    /// The first child element, if any.
    pub fn first_element_child(&self) -> Option<NodeRef<'a>> {
        self.children().into_iter().find(|child| child.is_element())
    }

    /// The last child element, if any.
    pub fn last_element_child(&self) -> Option<NodeRef<'a>> {
        self.children().into_iter().rev().find(|child| child.is_element())
    }

    /// The first child that carries content: the first element, skipping
    /// whitespace-only text and comments.
    pub fn first_significant_child(&self) -> Option<NodeRef<'a>> {
        self.children()
            .into_iter()
            .find(|child| !child.is_comment() && !child.is_whitespace_text())
    }

    /// The previous sibling node (of any kind).
    pub fn prev_sibling(&self) -> Option<NodeRef<'a>> {
        let index = self.dom.sibling_index(self.id())?;
        let siblings = self.dom.siblings_of(self.id());
        let handle = siblings.get(index.checked_sub(1)?)?;
        Some(NodeRef::new(self.dom, self.parser, *handle))
    }

    /// The next sibling node (of any kind).
    pub fn next_sibling(&self) -> Option<NodeRef<'a>> {
        let index = self.dom.sibling_index(self.id())?;
        let siblings = self.dom.siblings_of(self.id());
        let handle = siblings.get(index + 1)?;
        Some(NodeRef::new(self.dom, self.parser, *handle))
    }

    /// This node's zero-based position among its parent's element children.
    pub fn element_sibling_index(&self) -> usize {
        let id = self.id();
        let mut position = 0;
        for handle in self.dom.siblings_of(id) {
            if handle.get_inner() == id {
                break;
            }
            if matches!(handle.get(self.parser), Some(tl::Node::Tag(_))) {
                position += 1;
            }
        }
        position
    }

    /// Does any sibling other than whitespace text or comments exist?
    pub fn has_significant_siblings(&self) -> bool {
        let id = self.id();
        self.dom.siblings_of(id).iter().any(|handle| {
            if handle.get_inner() == id {
                return false;
            }
            let sibling = NodeRef::new(self.dom, self.parser, *handle);
            !sibling.is_comment() && !sibling.is_whitespace_text()
        })
    }

    /// Concatenated, entity-decoded text of this node and its descendants.
    pub fn text_content(&self) -> String {
        self.dom.text_content(self.handle, self.parser)
    }

    /// Walk ancestors looking for one with the given class token.
    pub fn ancestor_with_class(&self, class: &str) -> Option<NodeRef<'a>> {
        let mut current = self.parent();
        while let Some(node) = current {
            if node.has_class(class) {
                return Some(node);
            }
            current = node.parent();
        }
        None
    }

    /// Depth-first search of descendants for the first element with the
    /// given tag name.
    pub fn find_descendant_tag(&self, name: &str) -> Option<NodeRef<'a>> {
        for child in self.children() {
            if child.is_tag(name) {
                return Some(child);
            }
            if let Some(found) = child.find_descendant_tag(name) {
                return Some(found);
            }
        }
        None
    }

    /// Depth-first search of descendants for the first element carrying the
    /// given class token.
    pub fn find_descendant_class(&self, class: &str) -> Option<NodeRef<'a>> {
        for child in self.children() {
            if child.is_element() && child.has_class(class) {
                return Some(child);
            }
            if let Some(found) = child.find_descendant_class(class) {
                return Some(found);
            }
        }
        None
    }

    /// Is the node inline-like for whitespace purposes? Text stays glued to
    /// any sibling that is not block-displayed, including unknown elements
    /// and converted `<script>` payloads.
    pub(crate) fn is_inline_like(&self) -> bool {
        if self.is_text() {
            return true;
        }
        self.tag_name()
            .is_some_and(|name| !classify::is_block(&name))
    }

    /// Name of the node for diagnostics: the tag name, `#text`, or
    /// `#comment`.
    pub(crate) fn describe(&self) -> Cow<'static, str> {
        match self.get() {
            Some(tl::Node::Tag(_)) => Cow::Owned(
                self.tag_name().unwrap_or_else(|| "#unknown".to_string()),
            ),
            Some(tl::Node::Raw(_)) => Cow::Borrowed("#text"),
            _ => Cow::Borrowed("#comment"),
        }
    }
}
