//! Final edge trimming and reference flushing.

/// Finish the folded output: trim the document edges and append collected
/// reference definitions.
///
/// Spacing between blocks is already settled by the fragment join step, and
/// escaped text cannot carry newlines (whitespace collapse removes them),
/// so any interior newline run belongs to a raw payload and must survive
/// untouched. Only the edges are trimmed: leading tabs/newlines (not
/// spaces, so an indented code block keeps its first-line indent) and all
/// trailing whitespace.
pub(crate) fn postprocess(output: &str, references: Vec<String>) -> String {
    let mut cleaned = output
        .trim_start_matches(['\t', '\r', '\n'])
        .trim_end()
        .to_string();

    if !references.is_empty() {
        if !cleaned.is_empty() {
            cleaned.push_str("\n\n");
        }
        cleaned.push_str(&references.join("\n"));
    }

    cleaned
}
