//! # domdown
//!
//! A rule-driven engine that converts a parsed HTML document tree into
//! Markdown, preserving semantic structure (headings, lists, emphasis,
//! links, images, code) under a configurable style.
//!
//! The input tree is built and owned by the external `tl` parser; the
//! engine walks it read-only, resolving exactly one rule per node from an
//! ordered table (user rules, then built-ins, then classifier-driven
//! defaults), folding children into parent content with block/inline
//! whitespace discipline, and finishing with the cross-cutting passes
//! (reference collection, document edge trimming) that cannot be expressed
//! per-node.
//!
//! ```
//! use domdown::{Options, convert_html};
//!
//! let markdown = convert_html("<h1>Title</h1><p>Some <em>text</em>.</p>", &Options::default())?;
//! assert_eq!(markdown, "# Title\n\nSome _text_.");
//! # Ok::<(), domdown::ConversionError>(())
//! ```
//!
//! Conversion is a synchronous, side-effect-free fold: the only mutable
//! state is a per-call render context, so an [`Engine`] can be reused
//! sequentially or shared across threads.

pub mod classify;
mod detect;
mod dom;
mod entities;
mod error;
mod escape;
mod options;
mod postprocess;
mod render;
mod rules;
mod style;
mod text;

pub use dom::NodeRef;
pub use error::{ConversionError, Result};
pub use escape::escape;
pub use options::{CodeBlockStyle, HeadingStyle, LinkReferenceStyle, LinkStyle, Options};
pub use render::{Engine, RenderContext};
pub use rules::{Filter, Predicate, Replacement, Rule, RuleTable};

/// Convert an HTML string to Markdown with a default-rule engine.
///
/// This is the main entry point; it parses `html` with the external parser
/// and converts the resulting tree.
pub fn convert_html(html: &str, options: &Options) -> Result<String> {
    Engine::new(options.clone()).convert(html)
}

/// Convert an already-parsed document tree to Markdown.
pub fn convert_dom(dom: &tl::VDom, options: &Options) -> Result<String> {
    Engine::new(options.clone()).convert_dom(dom)
}
