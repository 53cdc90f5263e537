//! Container directive line syntax.
//!
//! Recognizes `:::name[argument]{attrs}` openings and bare `:::` closings.

use super::DirectiveArgs;

/// A container directive marker found on a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ContainerMarker {
    /// Container opening: `:::name[argument]{attrs}`
    Start {
        name: String,
        args: DirectiveArgs,
        colon_count: usize,
    },
    /// Container closing: `:::`
    End { colon_count: usize },
}

/// Parse a whole line as a container directive marker.
///
/// Up to three leading spaces and any trailing whitespace are ignored.
/// Deeper indentation is an indented code block. Returns `None` if the line
/// is not a container marker.
pub(crate) fn parse_container_line(line: &str) -> Option<ContainerMarker> {
    let indent = line.len() - line.trim_start_matches(' ').len();
    if indent > 3 || line[indent..].starts_with('\t') {
        return None;
    }
    let trimmed = line[indent..].trim_end();

    if !trimmed.starts_with(":::") {
        return None;
    }

    let colon_count = trimmed.chars().take_while(|&c| c == ':').count();
    let after_colons = trimmed[colon_count..].trim_start();

    if after_colons.is_empty() {
        return Some(ContainerMarker::End { colon_count });
    }

    let name_end = after_colons
        .find(|c: char| c == '[' || c == '{' || c.is_whitespace())
        .unwrap_or(after_colons.len());

    let name = &after_colons[..name_end];
    if !is_valid_directive_name(name) {
        return None;
    }

    let after_name = after_colons[name_end..].trim_start();
    let (content, content_consumed) = parse_delimited(after_name, '[', ']');
    let after_content = after_name[content_consumed..].trim_start();
    let (attrs_str, _) = parse_delimited(after_content, '{', '}');

    Some(ContainerMarker::Start {
        name: name.to_owned(),
        args: DirectiveArgs::parse(content, attrs_str),
        colon_count,
    })
}

/// Check if a name is a valid directive name.
///
/// Valid names contain only alphanumeric characters, hyphens, and underscores.
fn is_valid_directive_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
}

/// Parse a balanced `open ... close` group at the start of `s`.
///
/// Returns (inner text, `bytes_consumed`). An absent or unclosed group
/// yields `("", 0)`.
fn parse_delimited(s: &str, open: char, close: char) -> (&str, usize) {
    if !s.starts_with(open) {
        return ("", 0);
    }

    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                return (&s[open.len_utf8()..i], i + close.len_utf8());
            }
        }
    }

    ("", 0)
}
