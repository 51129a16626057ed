//! Error types for DOM to Markdown conversion.

use thiserror::Error;

/// Errors that can occur during conversion.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// The external parser failed to produce a document tree.
    #[error("Failed to parse HTML: {0}")]
    ParseError(String),

    /// The input tree nests deeper than the engine's recursion bound.
    ///
    /// Conversion aborts rather than emitting truncated output; the error
    /// names the node at which the bound was hit.
    #[error("node <{tag}> exceeds maximum tree depth of {depth}")]
    DepthLimitExceeded {
        /// Tag name of the node at which the bound was hit.
        tag: String,
        /// The recursion bound that was exceeded.
        depth: usize,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ConversionError>;
