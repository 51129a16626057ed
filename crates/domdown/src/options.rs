//! Conversion options.

use serde::{Deserialize, Serialize};

/// Heading output style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingStyle {
    /// `# Heading` markers.
    #[default]
    Atx,
    /// Underlined headings (`===` / `---`), levels 1-2 only; deeper levels
    /// fall back to ATX.
    Setext,
}

/// Code block output style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeBlockStyle {
    /// Fence-delimited blocks with an optional language hint.
    #[default]
    Fenced,
    /// Four-space indented blocks.
    Indented,
}

/// Link output style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStyle {
    /// `[text](url "title")` at the usage site.
    #[default]
    Inlined,
    /// `[text][id]` with definitions collected at the end of the document.
    Referenced,
}

/// Numbering scheme for referenced links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkReferenceStyle {
    /// Sequential numeric ids: `[text][1]`.
    #[default]
    Full,
    /// `[text][]`, definition keyed by the text.
    Collapsed,
    /// Bare `[text]`, definition keyed by the text.
    Shortcut,
}

/// Configuration for one conversion. Immutable once a conversion starts;
/// every field has a default and can be overridden independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Heading style.
    pub heading_style: HeadingStyle,
    /// Code block style.
    pub code_block_style: CodeBlockStyle,
    /// Fence marker for fenced code blocks.
    pub fence: String,
    /// Marker character for unordered list items.
    pub bullet_list_marker: String,
    /// Delimiter for emphasis.
    pub em_delimiter: String,
    /// Delimiter for strong emphasis.
    pub strong_delimiter: String,
    /// Link style.
    pub link_style: LinkStyle,
    /// Reference numbering scheme, used when `link_style` is `Referenced`.
    pub link_reference_style: LinkReferenceStyle,
    /// Marker emitted for a hard line break, before the newline.
    pub br: String,
    /// Horizontal rule marker.
    pub hr: String,
    /// Anchor identifiers (matched case-insensitively) for which an
    /// explicit `<a id="..."></a>` marker is emitted.
    pub anchor_names: Vec<String>,
    /// Reproduce `<img>` elements carrying explicit width/height as HTML
    /// instead of converting them.
    pub preserve_image_tags_with_size: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            heading_style: HeadingStyle::default(),
            code_block_style: CodeBlockStyle::default(),
            fence: "```".to_string(),
            bullet_list_marker: "-".to_string(),
            em_delimiter: "_".to_string(),
            strong_delimiter: "**".to_string(),
            link_style: LinkStyle::default(),
            link_reference_style: LinkReferenceStyle::default(),
            br: "  ".to_string(),
            hr: "* * *".to_string(),
            anchor_names: Vec::new(),
            preserve_image_tags_with_size: false,
        }
    }
}

impl Options {
    /// Is `id` in the anchor allow-list? Comparison is case-insensitive.
    pub(crate) fn anchor_name_allowed(&self, id: &str) -> bool {
        self.anchor_names
            .iter()
            .any(|name| name.eq_ignore_ascii_case(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_deserialization_fills_defaults() {
        let options: Options =
            serde_json::from_str(r#"{"heading_style": "setext", "bullet_list_marker": "*"}"#)
                .unwrap();
        assert_eq!(options.heading_style, HeadingStyle::Setext);
        assert_eq!(options.bullet_list_marker, "*");
        assert_eq!(options.fence, "```");
        assert_eq!(options.link_style, LinkStyle::Inlined);
    }

    #[test]
    fn round_trips_through_json() {
        let options = Options {
            link_style: LinkStyle::Referenced,
            link_reference_style: LinkReferenceStyle::Shortcut,
            anchor_names: vec!["top".to_string()],
            ..Options::default()
        };
        let json = serde_json::to_string(&options).unwrap();
        let back: Options = serde_json::from_str(&json).unwrap();
        assert_eq!(back, options);
    }

    #[test]
    fn anchor_allow_list_is_case_insensitive() {
        let options = Options {
            anchor_names: vec!["Section-1".to_string()],
            ..Options::default()
        };
        assert!(options.anchor_name_allowed("section-1"));
        assert!(options.anchor_name_allowed("SECTION-1"));
        assert!(!options.anchor_name_allowed("section-2"));
    }
}
