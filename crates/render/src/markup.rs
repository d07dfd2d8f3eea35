//! # Markup Tokenizer
//!
//! A single-pass tokenizer for the constrained markdown subset found in
//! generated answers: `#`-prefixed heading lines and `**bold**` spans. The
//! tokenizer emits nodes in true document order and never fails on
//! malformed markup; unpaired delimiters fall through as plain text.

use crate::RenderError;
use regex::Regex;

/// One typed unit of parsed output markup.
///
/// Concatenating node texts in order reconstructs the original content:
/// formatting is additive metadata, with only the heading-line markers and
/// bold delimiters stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupNode {
    Heading { level: u8, text: String },
    Bold(String),
    Italic(String),
    Code(String),
    PlainText(String),
}

impl MarkupNode {
    /// The text content of the node, without markers.
    pub fn text(&self) -> &str {
        match self {
            Self::Heading { text, .. } => text,
            Self::Bold(text)
            | Self::Italic(text)
            | Self::Code(text)
            | Self::PlainText(text) => text,
        }
    }
}

/// Tokenizes generated text into an ordered sequence of [`MarkupNode`]s.
///
/// Heading detection is line-anchored: a line matching `^#\s+(.*)` becomes
/// a level-1 heading (the pattern recognizes a single `#`, so deeper
/// headings are never produced and a `#` mid-line is never a heading). The
/// heading line's terminating newline is consumed with the line. Runs of
/// non-heading lines go through the bold scan in document order.
pub fn tokenize(input: &str) -> Result<Vec<MarkupNode>, RenderError> {
    let heading_re = Regex::new(r"^#\s+(.*)$")?;

    let mut nodes = Vec::new();
    let mut run = String::new();

    for line in input.split_inclusive('\n') {
        let bare = line.strip_suffix('\n').unwrap_or(line);
        let bare = bare.strip_suffix('\r').unwrap_or(bare);
        if let Some(caps) = heading_re.captures(bare) {
            if !run.is_empty() {
                scan_bold(&run, &mut nodes);
                run.clear();
            }
            nodes.push(MarkupNode::Heading {
                level: 1,
                text: caps[1].to_string(),
            });
        } else {
            run.push_str(line);
        }
    }
    if !run.is_empty() {
        scan_bold(&run, &mut nodes);
    }

    Ok(nodes)
}

/// Scans one text run left-to-right for `**` pairs.
///
/// For each pair the text before the opening delimiter is emitted as plain
/// text (an empty prefix included) followed by the bold span. When a
/// closing delimiter cannot be found, pairing stops and the remainder,
/// unmatched marker included, falls through as plain text.
fn scan_bold(text: &str, nodes: &mut Vec<MarkupNode>) {
    let mut rest = text;
    loop {
        let Some(start) = rest.find("**") else { break };
        let Some(close) = rest[start + 2..].find("**") else {
            break;
        };
        let end = start + 2 + close;
        nodes.push(MarkupNode::PlainText(rest[..start].to_string()));
        nodes.push(MarkupNode::Bold(rest[start + 2..end].to_string()));
        rest = &rest[end + 2..];
    }
    if !rest.is_empty() {
        nodes.push(MarkupNode::PlainText(rest.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn concat(nodes: &[MarkupNode]) -> String {
        nodes.iter().map(MarkupNode::text).collect()
    }

    #[test]
    fn text_without_markup_is_a_single_plain_node() {
        let input = "The function adds two numbers and returns the result.";
        let nodes = tokenize(input).unwrap();
        assert_eq!(nodes, vec![MarkupNode::PlainText(input.to_string())]);
    }

    #[test]
    fn unterminated_bold_marker_falls_through_as_plain_text() {
        let nodes = tokenize("**unterminated").unwrap();
        assert_eq!(nodes, vec![MarkupNode::PlainText("**unterminated".to_string())]);
    }

    #[test]
    fn heading_then_bold_preserves_document_order() {
        let nodes = tokenize("# Title\n**bold** rest").unwrap();
        assert_eq!(
            nodes,
            vec![
                MarkupNode::Heading {
                    level: 1,
                    text: "Title".to_string()
                },
                MarkupNode::PlainText(String::new()),
                MarkupNode::Bold("bold".to_string()),
                MarkupNode::PlainText(" rest".to_string()),
            ]
        );
    }

    #[test]
    fn bold_pass_is_idempotent_on_marker_free_content() {
        let first = tokenize("intro **strong** outro").unwrap();
        for node in &first {
            if let MarkupNode::PlainText(text) = node {
                if text.is_empty() {
                    continue;
                }
                let again = tokenize(text).unwrap();
                assert_eq!(again, vec![MarkupNode::PlainText(text.clone())]);
            }
        }
    }

    #[test]
    fn hash_mid_line_is_not_a_heading() {
        let input = "tuning parameter # 3 stays inline";
        let nodes = tokenize(input).unwrap();
        assert_eq!(nodes, vec![MarkupNode::PlainText(input.to_string())]);
    }

    #[test]
    fn deeper_heading_markers_are_not_recognized() {
        // The pattern matches a single leading `#`; `##` lines fall
        // through to the bold scan untouched.
        let nodes = tokenize("## Subsection").unwrap();
        assert_eq!(nodes, vec![MarkupNode::PlainText("## Subsection".to_string())]);
    }

    #[test]
    fn heading_with_empty_text_is_allowed() {
        let nodes = tokenize("# \nbody").unwrap();
        assert_eq!(
            nodes,
            vec![
                MarkupNode::Heading {
                    level: 1,
                    text: String::new()
                },
                MarkupNode::PlainText("body".to_string()),
            ]
        );
    }

    #[test]
    fn multiple_bold_pairs_split_in_order() {
        let nodes = tokenize("a **b** c **d** e").unwrap();
        assert_eq!(
            nodes,
            vec![
                MarkupNode::PlainText("a ".to_string()),
                MarkupNode::Bold("b".to_string()),
                MarkupNode::PlainText(" c ".to_string()),
                MarkupNode::Bold("d".to_string()),
                MarkupNode::PlainText(" e".to_string()),
            ]
        );
    }

    #[test]
    fn bold_pairs_span_lines_within_a_run() {
        let nodes = tokenize("before **two\nlines** after").unwrap();
        assert_eq!(
            nodes,
            vec![
                MarkupNode::PlainText("before ".to_string()),
                MarkupNode::Bold("two\nlines".to_string()),
                MarkupNode::PlainText(" after".to_string()),
            ]
        );
    }

    #[test]
    fn concatenated_node_texts_reconstruct_content_without_markers() {
        let input = "# Overview\nThe **add** function.\nPlain tail.";
        let nodes = tokenize(input).unwrap();
        assert_eq!(concat(&nodes), "OverviewThe add function.\nPlain tail.");
    }

    #[test]
    fn crlf_heading_lines_are_recognized() {
        let nodes = tokenize("# Title\r\nbody").unwrap();
        assert_eq!(
            nodes,
            vec![
                MarkupNode::Heading {
                    level: 1,
                    text: "Title".to_string()
                },
                MarkupNode::PlainText("body".to_string()),
            ]
        );
    }
}
