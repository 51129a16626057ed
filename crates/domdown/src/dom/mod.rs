//! Read-only access layer over the externally-parsed `tl` document tree.
//!
//! The parser owns every node; this module only holds `tl::NodeHandle`
//! indices plus precomputed parent/child/sibling maps, built once per
//! conversion. Nothing here mutates the tree.

mod context;
mod node;

pub(crate) use context::{DomContext, build_dom_context};
pub use node::NodeRef;
