//! End-to-end conversion tests for document structure: headings,
//! paragraphs, block separation, lists, and code blocks.

use domdown::{CodeBlockStyle, ConversionError, HeadingStyle, Options, convert_html};

fn convert(html: &str) -> String {
    convert_html(html, &Options::default()).expect("conversion succeeds")
}

fn convert_with(html: &str, options: &Options) -> String {
    convert_html(html, options).expect("conversion succeeds")
}

#[test]
fn heading_and_paragraph() {
    assert_eq!(convert("<h1>Title</h1><p>Content</p>"), "# Title\n\nContent");
}

#[test]
fn atx_heading_levels() {
    assert_eq!(convert("<h3>Deep</h3>"), "### Deep");
    assert_eq!(convert("<h6>Deeper</h6>"), "###### Deeper");
}

#[test]
fn setext_headings_for_first_two_levels() {
    let options = Options {
        heading_style: HeadingStyle::Setext,
        ..Options::default()
    };
    assert_eq!(convert_with("<h1>Hi</h1>", &options), "Hi\n==");
    assert_eq!(convert_with("<h2>Sub</h2>", &options), "Sub\n---");
    // Setext has no third level; ATX takes over.
    assert_eq!(convert_with("<h3>Deep</h3>", &options), "### Deep");
}

#[test]
fn heading_with_inline_content() {
    assert_eq!(convert("<h2>A <em>b</em></h2>"), "## A _b_");
}

#[test]
fn emphasis_and_strong() {
    assert_eq!(
        convert("<p><strong>Bold</strong> <em>italic</em></p>"),
        "**Bold** _italic_"
    );
}

#[test]
fn custom_delimiters() {
    let options = Options {
        em_delimiter: "*".to_string(),
        strong_delimiter: "__".to_string(),
        ..Options::default()
    };
    assert_eq!(
        convert_with("<p><strong>B</strong> <em>i</em></p>", &options),
        "__B__ *i*"
    );
}

#[test]
fn empty_inline_elements_render_nothing() {
    assert_eq!(convert("<p><em></em><strong>   </strong></p>"), "");
}

#[test]
fn block_siblings_are_separated_by_exactly_one_blank_line() {
    assert_eq!(
        convert("<p>a</p><p>b</p><p>c</p>"),
        "a\n\nb\n\nc"
    );
    // Nested wrappers emit extra blank-line pairs; they must not stack.
    assert_eq!(convert("<div><div><p>a</p></div></div><p>b</p>"), "a\n\nb");
}

#[test]
fn text_between_blocks_is_its_own_block() {
    assert_eq!(convert("<p>a</p>plain<p>b</p>"), "a\n\nplain\n\nb");
}

#[test]
fn whitespace_runs_collapse() {
    assert_eq!(convert("<p>Multiple    spaces</p>"), "Multiple spaces");
    assert_eq!(convert("<p>  padded  </p>"), "padded");
}

#[test]
fn blockquote_prefixes_every_line() {
    assert_eq!(convert("<blockquote><p>Quote</p></blockquote>"), "> Quote");
    assert_eq!(
        convert("<blockquote><p>a</p><p>b</p></blockquote>"),
        "> a\n> \n> b"
    );
}

#[test]
fn horizontal_rule_uses_configured_marker() {
    assert_eq!(convert("<p>a</p><hr><p>b</p>"), "a\n\n* * *\n\nb");

    let options = Options {
        hr: "---".to_string(),
        ..Options::default()
    };
    assert_eq!(convert_with("<p>a</p><hr><p>b</p>", &options), "a\n\n---\n\nb");
}

#[test]
fn line_break_markers() {
    assert_eq!(convert("<p>Line 1<br>Line 2</p>"), "Line 1  \nLine 2");

    let options = Options {
        br: "\\".to_string(),
        ..Options::default()
    };
    assert_eq!(convert_with("<p>a<br>b</p>", &options), "a\\\nb");
}

#[test]
fn unordered_list() {
    assert_eq!(convert("<ul><li>One</li><li>Two</li></ul>"), "- One\n- Two");
}

#[test]
fn unordered_list_with_interleaved_whitespace() {
    assert_eq!(
        convert("<ul>\n  <li>a</li>\n  <li>b</li>\n</ul>"),
        "- a\n- b"
    );
}

#[test]
fn custom_bullet_marker() {
    let options = Options {
        bullet_list_marker: "*".to_string(),
        ..Options::default()
    };
    assert_eq!(convert_with("<ul><li>Item</li></ul>", &options), "* Item");
}

#[test]
fn ordered_list_numbering_aligns_multi_digit_ordinals() {
    assert_eq!(
        convert("<ol start=\"9\"><li>a</li><li>b</li><li>c</li></ol>"),
        "9.  a\n10. b\n11. c"
    );
}

#[test]
fn ordered_list_defaults_to_one() {
    assert_eq!(
        convert("<ol><li>a</li><li>b</li></ol>"),
        "1.  a\n2.  b"
    );
    // A non-numeric start offset falls back to 1.
    assert_eq!(convert("<ol start=\"x\"><li>a</li></ol>"), "1.  a");
}

#[test]
fn nested_list_attaches_to_its_item() {
    assert_eq!(
        convert("<ul><li>Item<ul><li>Nested</li></ul></li></ul>"),
        "- Item\n    - Nested"
    );
}

#[test]
fn list_item_with_block_content() {
    assert_eq!(convert("<ol><li><p>Para</p></li></ol>"), "1.  Para");
}

#[test]
fn fenced_code_block_with_language() {
    assert_eq!(
        convert("<p>Before</p><pre><code class=\"language-python\">x = 1</code></pre><p>After</p>"),
        "Before\n\n```python\nx = 1\n```\n\nAfter"
    );
}

#[test]
fn fenced_code_preserves_inner_content_verbatim() {
    assert_eq!(
        convert("<pre><code>fn main() {\n    let x = a * b;\n}\n</code></pre>"),
        "```\nfn main() {\n    let x = a * b;\n}\n```"
    );
}

#[test]
fn code_block_blank_lines_are_reproduced_byte_for_byte() {
    assert_eq!(
        convert("<pre><code>a\n\n\nb</code></pre>"),
        "```\na\n\n\nb\n```"
    );
    // A line of spaces is content inside a code block, not a blank line.
    assert_eq!(
        convert("<pre><code>a\n  \nb</code></pre>"),
        "```\na\n  \nb\n```"
    );
}

#[test]
fn indented_code_block_keeps_interior_blank_lines_indented() {
    let options = Options {
        code_block_style: CodeBlockStyle::Indented,
        ..Options::default()
    };
    assert_eq!(
        convert_with("<pre><code>a\n\nb</code></pre>", &options),
        "    a\n    \n    b"
    );
}

#[test]
fn indented_code_block_style() {
    let options = Options {
        code_block_style: CodeBlockStyle::Indented,
        ..Options::default()
    };
    assert_eq!(convert_with("<pre><code>a\nb</code></pre>", &options), "    a\n    b");
}

#[test]
fn monospace_styled_pre_is_a_code_block() {
    assert_eq!(
        convert("<pre style=\"font-family: Consolas, monospace\">let x = 1;</pre>"),
        "```\nlet x = 1;\n```"
    );
}

#[test]
fn legacy_table_cell_code_block() {
    assert_eq!(
        convert("<table><tr><td class=\"code\"><pre>def f:\n  pass</pre></td></tr></table>"),
        "```\ndef f:\n  pass\n```"
    );
}

#[test]
fn pre_without_code_degrades_to_plain_block() {
    assert_eq!(convert("<pre>plain text</pre>"), "plain text");
}

#[test]
fn inline_code_is_not_escaped() {
    assert_eq!(convert("<p>Use <code>x*y</code> here</p>"), "Use `x*y` here");
}

#[test]
fn inline_code_extends_delimiter_past_backtick_runs() {
    assert_eq!(convert("<p><code>a`b</code></p>"), "``a`b``");
    assert_eq!(convert("<p><code>`tick</code></p>"), "`` `tick``");
}

#[test]
fn custom_fence_marker() {
    let options = Options {
        fence: "~~~".to_string(),
        ..Options::default()
    };
    assert_eq!(
        convert_with("<pre><code>x</code></pre>", &options),
        "~~~\nx\n~~~"
    );
}

#[test]
fn escapes_markup_significant_characters() {
    assert_eq!(
        convert("<p>2 * 3 _x_ [link] `tick` \\ end</p>"),
        "2 \\* 3 \\_x\\_ \\[link\\] \\`tick\\` \\\\ end"
    );
}

#[test]
fn escape_is_identity_on_plain_text() {
    let text = "it is plain text; nothing to see here.";
    assert_eq!(convert(&format!("<p>{text}</p>")), text);
}

#[test]
fn non_rendering_elements_produce_nothing() {
    assert_eq!(convert("<style>p { color: red }</style><p>x</p>"), "x");
    assert_eq!(convert("<script>var a = 1;</script><p>x</p>"), "x");
    assert_eq!(
        convert("<head><title>T</title></head><body><p>x</p></body>"),
        "x"
    );
}

#[test]
fn unknown_elements_fall_back_by_classification() {
    assert_eq!(convert("<p><span>wrapped</span></p>"), "wrapped");
    assert_eq!(convert("<section><p>a</p></section><p>b</p>"), "a\n\nb");
}

#[test]
fn empty_input_converts_to_empty_output() {
    assert_eq!(convert(""), "");
    assert_eq!(convert("   \n  "), "");
}

#[test]
fn comments_are_dropped() {
    assert_eq!(convert("<p>a<!-- hidden -->b</p>"), "ab");
}

#[test]
fn excessive_depth_is_a_terminal_error() {
    let depth = 600;
    let html = format!("{}x{}", "<div>".repeat(depth), "</div>".repeat(depth));
    let err = convert_html(&html, &Options::default()).expect_err("depth bound");
    assert!(matches!(err, ConversionError::DepthLimitExceeded { .. }));
}
