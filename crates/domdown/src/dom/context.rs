//! Precomputed navigational maps over a parsed `tl` document.

use std::cell::RefCell;
use std::num::NonZeroUsize;

use lru::LruCache;

use crate::text;

const TEXT_CACHE_CAPACITY: usize = 4096;

/// Side structure providing O(1) parent/child/sibling lookups for a `tl`
/// document, plus an LRU cache for text content extraction.
///
/// `tl` node handles only navigate downward; rules need parents and
/// siblings, so the full relationship maps are indexed up front. The maps
/// are keyed by `NodeHandle::get_inner()` ids.
pub(crate) struct DomContext {
    parent_map: Vec<Option<u32>>,
    children_map: Vec<Option<Vec<tl::NodeHandle>>>,
    sibling_index_map: Vec<Option<usize>>,
    node_map: Vec<Option<tl::NodeHandle>>,
    root_children: Vec<tl::NodeHandle>,
    text_cache: RefCell<LruCache<u32, String>>,
}

impl DomContext {
    fn ensure_capacity(&mut self, id: u32) {
        let idx = id as usize;
        if self.parent_map.len() <= idx {
            let new_len = idx + 1;
            self.parent_map.resize(new_len, None);
            self.children_map.resize_with(new_len, || None);
            self.sibling_index_map.resize(new_len, None);
            self.node_map.resize(new_len, None);
        }
    }

    pub(crate) fn parent_of(&self, id: u32) -> Option<u32> {
        self.parent_map.get(id as usize).copied().flatten()
    }

    pub(crate) fn children_of(&self, id: u32) -> Option<&Vec<tl::NodeHandle>> {
        self.children_map
            .get(id as usize)
            .and_then(|children| children.as_ref())
    }

    pub(crate) fn sibling_index(&self, id: u32) -> Option<usize> {
        self.sibling_index_map.get(id as usize).copied().flatten()
    }

    pub(crate) fn node_handle(&self, id: u32) -> Option<&tl::NodeHandle> {
        self.node_map.get(id as usize).and_then(|node| node.as_ref())
    }

    pub(crate) fn root_children(&self) -> &[tl::NodeHandle] {
        &self.root_children
    }

    /// The sibling list this node belongs to (its parent's children, or the
    /// document roots).
    pub(crate) fn siblings_of(&self, id: u32) -> &[tl::NodeHandle] {
        match self.parent_of(id) {
            Some(parent_id) => self.children_of(parent_id).map_or(&[], Vec::as_slice),
            None => &self.root_children,
        }
    }

    /// Concatenated, entity-decoded text of a node and its descendants.
    ///
    /// Cached because code-block rules read the same node's text from both
    /// their filter and their replacement.
    pub(crate) fn text_content(&self, node_handle: tl::NodeHandle, parser: &tl::Parser) -> String {
        let id = node_handle.get_inner();
        let cached = {
            let mut cache = self.text_cache.borrow_mut();
            cache.get(&id).cloned()
        };
        if let Some(value) = cached {
            return value;
        }

        let value = self.text_content_uncached(node_handle, parser);
        self.text_cache.borrow_mut().put(id, value.clone());
        value
    }

    fn text_content_uncached(&self, node_handle: tl::NodeHandle, parser: &tl::Parser) -> String {
        let mut out = String::with_capacity(64);
        if let Some(node) = node_handle.get(parser) {
            match node {
                tl::Node::Raw(bytes) => {
                    let raw = bytes.as_utf8_str();
                    out.push_str(text::decode_html_entities_cow(raw.as_ref()).as_ref());
                }
                tl::Node::Tag(tag) => {
                    for child_handle in tag.children().top().iter() {
                        out.push_str(&self.text_content(*child_handle, parser));
                    }
                }
                tl::Node::Comment(_) => {}
            }
        }
        out
    }
}

/// Build the navigational maps for a parsed document.
pub(crate) fn build_dom_context(dom: &tl::VDom) -> DomContext {
    let parser = dom.parser();
    let root_children: Vec<tl::NodeHandle> = dom.children().to_vec();

    let mut ctx = DomContext {
        parent_map: Vec::new(),
        children_map: Vec::new(),
        sibling_index_map: Vec::new(),
        node_map: Vec::new(),
        root_children: root_children.clone(),
        text_cache: RefCell::new(LruCache::new(
            NonZeroUsize::new(TEXT_CACHE_CAPACITY).expect("nonzero capacity"),
        )),
    };

    // Indexed iteratively so that a pathologically deep tree cannot blow
    // the stack before the renderer's own depth bound gets a chance to
    // reject it.
    let mut stack: Vec<(tl::NodeHandle, Option<u32>, usize)> = root_children
        .iter()
        .enumerate()
        .rev()
        .map(|(index, handle)| (*handle, None, index))
        .collect();

    while let Some((node_handle, parent, sibling_index)) = stack.pop() {
        let id = node_handle.get_inner();
        ctx.ensure_capacity(id);
        ctx.node_map[id as usize] = Some(node_handle);
        ctx.parent_map[id as usize] = parent;
        ctx.sibling_index_map[id as usize] = Some(sibling_index);

        if let Some(tl::Node::Tag(tag)) = node_handle.get(parser) {
            let children: Vec<tl::NodeHandle> = tag.children().top().to_vec();
            for (index, child_handle) in children.iter().enumerate().rev() {
                stack.push((*child_handle, Some(id), index));
            }
            ctx.children_map[id as usize] = Some(children);
        }
    }

    ctx
}
