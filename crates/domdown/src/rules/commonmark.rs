//! Built-in CommonMark rules, in resolution order.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::detect::{self, MathKind};
use crate::dom::NodeRef;
use crate::entities::encode_entities;
use crate::options::{CodeBlockStyle, HeadingStyle, LinkReferenceStyle, LinkStyle, Options};
use crate::rules::{Filter, Rule};

static LINE_BREAK_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\n\r]+").expect("valid regex"));
static BACKTICK_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"`+").expect("valid regex"));

/// The built-in rules in the order they are resolved.
pub(crate) fn rules() -> Vec<Rule> {
    vec![
        paragraph(),
        line_break(),
        heading(),
        blockquote(),
        list(),
        list_item(),
        indented_code_block(),
        fenced_code_block(),
        horizontal_rule(),
        inline_link(),
        named_anchor(),
        reference_link(),
        emphasis(),
        strong(),
        inline_code(),
        image(),
        picture(),
        math_rendered(),
        math_script_inline(),
        math_script_block(),
        source_block(),
    ]
}

fn paragraph() -> Rule {
    Rule::new(
        "paragraph",
        Filter::Tag("p"),
        Box::new(|content, _, _, _| format!("\n\n{content}\n\n")),
    )
}

fn line_break() -> Rule {
    Rule::new(
        "line-break",
        Filter::Tag("br"),
        Box::new(|_, _, options, _| format!("{}\n", options.br)),
    )
}

fn heading() -> Rule {
    Rule::new(
        "heading",
        Filter::Tags(&["h1", "h2", "h3", "h4", "h5", "h6"]),
        Box::new(|content, node, options, _| {
            let level = node
                .tag_name()
                .and_then(|name| name[1..].parse::<usize>().ok())
                .unwrap_or(1);

            if options.heading_style == HeadingStyle::Setext && level < 3 {
                let marker = if level == 1 { '=' } else { '-' };
                let underline: String = std::iter::repeat_n(marker, content.chars().count()).collect();
                format!("\n\n{content}\n{underline}\n\n")
            } else {
                let hashes: String = std::iter::repeat_n('#', level).collect();
                format!("\n\n{hashes} {content}\n\n")
            }
        }),
    )
}

fn blockquote() -> Rule {
    Rule::new(
        "blockquote",
        Filter::Tag("blockquote"),
        Box::new(|content, _, _, _| {
            let inner = content.trim_matches('\n');
            let quoted: String = inner
                .split('\n')
                .map(|line| format!("> {line}"))
                .collect::<Vec<_>>()
                .join("\n");
            format!("\n\n{quoted}\n\n")
        }),
    )
}

fn list() -> Rule {
    Rule::new(
        "list",
        Filter::Tags(&["ul", "ol"]),
        Box::new(|content, node, _, _| {
            // A list that closes its parent list item gets no extra blank
            // line, otherwise nested lists detach from their item.
            let is_nested_tail = node.parent().is_some_and(|parent| {
                parent.is_tag("li")
                    && parent
                        .last_element_child()
                        .is_some_and(|last| same_node(&last, node))
            });

            if is_nested_tail {
                format!("\n{content}")
            } else {
                format!("\n\n{content}\n\n")
            }
        }),
    )
}

fn same_node(a: &NodeRef, b: &NodeRef) -> bool {
    a.handle.get_inner() == b.handle.get_inner()
}

fn list_item() -> Rule {
    Rule::new(
        "list-item",
        Filter::Tag("li"),
        Box::new(|content, node, options, _| {
            let content = content.trim_start_matches('\n');
            let trimmed = content.trim_end_matches('\n');
            let mut body = trimmed.to_string();
            if trimmed.len() != content.len() {
                body.push('\n');
            }
            // Continuation lines align under a fixed four-column prefix.
            let body = body.replace('\n', "\n    ");

            let prefix = if let Some(item) = detect::checklist_item(node) {
                if item.checked { "- [x] ".to_string() } else { "- [ ] ".to_string() }
            } else if node.parent().is_some_and(|parent| parent.is_tag("ol")) {
                let start = node
                    .parent()
                    .and_then(|parent| parent.attr("start"))
                    .and_then(|value| value.trim().parse::<usize>().ok())
                    .unwrap_or(1);
                let ordinal = (start + node.element_sibling_index()).to_string();
                // Pad so multi-digit ordinals keep the first content
                // character aligned with single-digit ones.
                let padding = " ".repeat(3_usize.saturating_sub(ordinal.len()));
                format!("{ordinal}.{padding}")
            } else {
                format!("{} ", options.bullet_list_marker)
            };

            let needs_newline = node.next_sibling().is_some() && !body.ends_with('\n');
            format!("{prefix}{body}{}", if needs_newline { "\n" } else { "" })
        }),
    )
}

fn indented_code_block() -> Rule {
    Rule::new(
        "indented-code-block",
        Filter::Predicate(Box::new(|node, options| {
            options.code_block_style == CodeBlockStyle::Indented && detect::is_code_block(node)
        })),
        Box::new(|_, node, _, _| {
            let payload = detect::code_block_payload(node);
            let text = payload.text_content();
            let text = text.strip_suffix('\n').unwrap_or(&text);
            format!("\n\n    {}\n\n", text.replace('\n', "\n    "))
        }),
    )
    .raw_content()
}

fn fenced_code_block() -> Rule {
    Rule::new(
        "fenced-code-block",
        Filter::Predicate(Box::new(|node, options| {
            options.code_block_style == CodeBlockStyle::Fenced && detect::is_code_block(node)
        })),
        Box::new(|_, node, options, _| {
            let payload = detect::code_block_payload(node);
            let language = detect::language_hint(&payload);
            let text = payload.text_content();
            let text = text.strip_suffix('\n').unwrap_or(&text);
            format!(
                "\n\n{fence}{language}\n{text}\n{fence}\n\n",
                fence = options.fence
            )
        }),
    )
    .raw_content()
}

fn horizontal_rule() -> Rule {
    Rule::new(
        "horizontal-rule",
        Filter::Tag("hr"),
        Box::new(|_, _, options, _| format!("\n\n{}\n\n", options.hr)),
    )
}

/// Trim link label text and collapse embedded line breaks, which cannot
/// appear literally inside a Markdown link label.
fn filter_link_content(content: &str) -> String {
    LINE_BREAK_RUN
        .replace_all(content.trim(), "<br>")
        .into_owned()
}

/// Sanitize an href: reject script-execution schemes outright and
/// percent-encode spaces, which are not valid URL characters anyway.
fn filter_link_href(href: Option<String>) -> String {
    let Some(href) = href else {
        return String::new();
    };
    let href = href.trim();
    if href.to_ascii_lowercase().starts_with("javascript:") {
        return String::new();
    }
    href.replace(' ', "%20")
}

fn link_title_part(node: &NodeRef, href: &str) -> String {
    match node.attr("title") {
        Some(title) if !title.is_empty() && title != href => format!(" \"{title}\""),
        _ => String::new(),
    }
}

fn anchor_marker(node: &NodeRef, options: &Options) -> String {
    detect::named_anchor(node, options).unwrap_or_default()
}

fn inline_link() -> Rule {
    Rule::new(
        "inline-link",
        Filter::Predicate(Box::new(|node, options| {
            options.link_style == LinkStyle::Inlined
                && node.is_tag("a")
                && (node.has_attr("href") || node.has_attr("name") || node.has_attr("id"))
        })),
        Box::new(|content, node, options, _| {
            let href = filter_link_href(node.attr("href"));
            let anchor = anchor_marker(node, options);
            let label = filter_link_content(content);
            if href.is_empty() {
                format!("{anchor}{label}")
            } else {
                let title = link_title_part(node, &href);
                format!("{anchor}[{label}]({href}{title})")
            }
        }),
    )
}

/// Catch-all for any element carrying an allow-listed id or name: a named
/// anchor is often an `<a name="...">`, but `<span id="...">` occurs too.
fn named_anchor() -> Rule {
    Rule::new(
        "named-anchor",
        Filter::Predicate(Box::new(|node, options| {
            node.is_element() && detect::named_anchor(node, options).is_some()
        })),
        Box::new(|content, node, options, _| {
            format!("{}{content}", anchor_marker(node, options))
        }),
    )
}

fn reference_link() -> Rule {
    Rule::new(
        "reference-link",
        Filter::Predicate(Box::new(|node, options| {
            options.link_style == LinkStyle::Referenced
                && node.is_tag("a")
                && node.has_attr("href")
        })),
        Box::new(|content, node, options, ctx| {
            let href = filter_link_href(node.attr("href"));
            let title = if href.is_empty() {
                String::new()
            } else {
                link_title_part(node, &href)
            };
            let label = filter_link_content(content);

            let (replacement, reference) = match options.link_reference_style {
                LinkReferenceStyle::Collapsed => (
                    format!("[{label}][]"),
                    format!("[{label}]: {href}{title}"),
                ),
                LinkReferenceStyle::Shortcut => {
                    (format!("[{label}]"), format!("[{label}]: {href}{title}"))
                }
                LinkReferenceStyle::Full => {
                    let id = ctx.reference_count() + 1;
                    (
                        format!("[{label}][{id}]"),
                        format!("[{id}]: {href}{title}"),
                    )
                }
            };

            ctx.push_reference(reference);
            replacement
        }),
    )
}

fn emphasis() -> Rule {
    Rule::new(
        "emphasis",
        Filter::Tags(&["em", "i"]),
        Box::new(|content, _, options, _| {
            if content.trim().is_empty() {
                return String::new();
            }
            format!("{delim}{content}{delim}", delim = options.em_delimiter)
        }),
    )
}

fn strong() -> Rule {
    Rule::new(
        "strong",
        Filter::Tags(&["strong", "b"]),
        Box::new(|content, _, options, _| {
            if content.trim().is_empty() {
                return String::new();
            }
            format!("{delim}{content}{delim}", delim = options.strong_delimiter)
        }),
    )
}

fn inline_code() -> Rule {
    Rule::new(
        "inline-code",
        Filter::Predicate(Box::new(|node, _| {
            // A <code> that is the sole meaningful child of a <pre> is a
            // code block, handled by the block rules above.
            let is_block_payload = node
                .parent()
                .is_some_and(|parent| parent.is_tag("pre"))
                && !node.has_significant_siblings();
            node.is_tag("code") && !is_block_payload
        })),
        Box::new(|content, _, _, _| {
            if content.trim().is_empty() {
                return String::new();
            }

            // Pick the shortest backtick delimiter not present in the
            // content, and pad when the content itself starts or ends with
            // a backtick.
            let mut delimiter_len = 1;
            let runs: Vec<usize> = BACKTICK_RUN
                .find_iter(content)
                .map(|run| run.as_str().len())
                .collect();
            while runs.contains(&delimiter_len) {
                delimiter_len += 1;
            }
            let delimiter = "`".repeat(delimiter_len);
            let leading = if content.starts_with('`') { " " } else { "" };
            let trailing = if content.ends_with('`') { " " } else { "" };

            format!("{delimiter}{leading}{content}{trailing}{delimiter}")
        }),
    )
}

/// Render an `<img>` as Markdown, or reproduce it as HTML when size
/// preservation is requested and the element declares its dimensions.
fn image_markdown(node: &NodeRef, options: &Options) -> String {
    let has_size = ["width", "height"]
        .iter()
        .any(|attr| node.attr(attr).is_some_and(|value| !value.is_empty()));
    if options.preserve_image_tags_with_size && has_size {
        return serialize_image(node);
    }

    let src = node.attr("src").unwrap_or_default();
    if src.is_empty() {
        return String::new();
    }
    let alt = node
        .attr("alt")
        .unwrap_or_default()
        .replace('[', "\\[")
        .replace(']', "\\]");
    let title_part = match node.attr("title") {
        Some(title) if !title.is_empty() => format!(" \"{title}\""),
        _ => String::new(),
    };
    format!("![{alt}]({src}{title_part})")
}

/// Rebuild an `<img>` element from its known attributes, in a fixed order.
fn serialize_image(node: &NodeRef) -> String {
    let mut out = String::from("<img");
    for name in ["src", "alt", "title", "width", "height", "class", "id", "style"] {
        if let Some(value) = node.attr(name) {
            out.push_str(&format!(" {name}=\"{}\"", encode_entities(&value)));
        }
    }
    out.push('>');
    out
}

fn image() -> Rule {
    Rule::new(
        "image",
        Filter::Tag("img"),
        Box::new(|_, node, options, _| image_markdown(node, options)),
    )
}

fn picture() -> Rule {
    Rule::new(
        "picture",
        Filter::Tag("picture"),
        Box::new(|_, node, options, _| {
            let children = node.element_children();

            let first_img = children.iter().find(|child| {
                child.is_tag("img") && child.attr("src").is_some_and(|src| !src.is_empty())
            });
            if let Some(img) = first_img {
                return image_markdown(img, options);
            }

            // No usable <img>: fall back to the first <source> candidate.
            children
                .iter()
                .find(|child| child.is_tag("source"))
                .and_then(detect::source_candidate_url)
                .map(|url| format!("![]({url})"))
                .unwrap_or_default()
        }),
    )
}

/// The pre-rendered visual form of a math expression cannot be converted
/// reliably; it is suppressed in favor of the adjacent script payload.
fn math_rendered() -> Rule {
    Rule::new(
        "math-rendered",
        Filter::Predicate(Box::new(|node, _| {
            node.is_tag("span") && node.attr("class").as_deref() == Some("MathJax")
        })),
        Box::new(|_, _, _, _| String::new()),
    )
}

fn math_script_inline() -> Rule {
    Rule::new(
        "math-script-inline",
        Filter::Predicate(Box::new(|node, _| {
            detect::math_script_kind(node) == Some(MathKind::Inline)
        })),
        Box::new(|content, _, _, _| format!("${content}$")),
    )
    .raw_content()
}

fn math_script_block() -> Rule {
    Rule::new(
        "math-script-block",
        Filter::Predicate(Box::new(|node, _| {
            detect::math_script_kind(node) == Some(MathKind::Block)
        })),
        Box::new(|content, _, _, _| format!("$$\n{content}\n$$")),
    )
    .raw_content()
}

/// Lossless source container: reproduce the recorded open marker, raw
/// payload, and close marker exactly.
fn source_block() -> Rule {
    Rule::new(
        "source-block",
        Filter::Predicate(Box::new(|node, _| detect::source_block(node).is_some())),
        Box::new(|_, node, _, _| {
            detect::source_block(node)
                .map(|info| format!("{}{}{}", info.open, info.content, info.close))
                .unwrap_or_default()
        }),
    )
    .raw_content()
}
