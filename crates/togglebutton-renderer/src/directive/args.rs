//! Directive argument parsing.
//!
//! Parses the `[argument]{#id .class key="value" flag}` syntax of directives.

use std::collections::BTreeMap;

/// Parsed arguments from directive syntax.
///
/// # Example
///
/// ```
/// use togglebutton_renderer::directive::DirectiveArgs;
///
/// let args = DirectiveArgs::parse("Details", r#"#faq show lang="en""#);
/// assert_eq!(args.content, "Details");
/// assert_eq!(args.id.as_deref(), Some("faq"));
/// assert!(args.has_flag("show"));
/// assert_eq!(args.get("lang"), Some("en"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DirectiveArgs {
    /// Content from brackets: `[content]` (empty string if not provided).
    pub content: String,
    /// ID from attributes: `{#id}`.
    pub id: Option<String>,
    /// Classes from attributes: `{.class1 .class2}`.
    pub classes: Vec<String>,
    /// Key-value attributes: `{key="value"}`.
    pub attrs: BTreeMap<String, String>,
    /// Bare words without a value: `{show}`.
    pub flags: Vec<String>,
}

impl DirectiveArgs {
    /// Parse content and attributes string into structured arguments.
    ///
    /// # Arguments
    ///
    /// * `content` - The content from brackets `[content]`
    /// * `attrs_str` - The attributes string from braces `{...}` (without braces)
    #[must_use]
    pub fn parse(content: &str, attrs_str: &str) -> Self {
        let mut args = Self {
            content: content.to_owned(),
            ..Default::default()
        };

        let mut remaining = attrs_str.trim();

        while !remaining.is_empty() {
            remaining = remaining.trim_start();

            if let Some(rest) = remaining.strip_prefix('#') {
                let end = shorthand_end(rest);
                args.id = Some(rest[..end].to_owned());
                remaining = &rest[end..];
            } else if let Some(rest) = remaining.strip_prefix('.') {
                let end = shorthand_end(rest);
                args.classes.push(rest[..end].to_owned());
                remaining = &rest[end..];
            } else {
                let word_end = remaining
                    .find(|c: char| c.is_whitespace() || c == '=')
                    .unwrap_or(remaining.len());

                if remaining[word_end..].starts_with('=') && word_end > 0 {
                    if let Some((key, value, rest)) = parse_key_value(remaining, word_end) {
                        args.attrs.insert(key.to_owned(), value.to_owned());
                        remaining = rest;
                        continue;
                    }
                }

                if word_end > 0 && !remaining[word_end..].starts_with('=') {
                    args.flags.push(remaining[..word_end].to_owned());
                    remaining = &remaining[word_end..];
                } else {
                    // Skip one unrecognized character
                    let skip = remaining.chars().next().map_or(0, char::len_utf8);
                    remaining = &remaining[skip..];
                }
            }
        }

        args
    }

    /// Get an attribute value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    /// Check whether a bare flag was given.
    #[must_use]
    pub fn has_flag(&self, name: &str) -> bool {
        self.flags.iter().any(|f| f == name)
    }
}

/// End of a `#id` or `.class` shorthand.
fn shorthand_end(s: &str) -> usize {
    s.find(|c: char| c.is_whitespace() || c == '.' || c == '#')
        .unwrap_or(s.len())
}

/// Parse `key="value"`, `key='value'` or `key=value` where `eq_pos` is the
/// byte offset of `=`.
///
/// Returns `None` for an unterminated quoted value.
fn parse_key_value(s: &str, eq_pos: usize) -> Option<(&str, &str, &str)> {
    let key = &s[..eq_pos];
    let after_eq = &s[eq_pos + 1..];

    if let Some(stripped) = after_eq.strip_prefix('"') {
        let end_quote = stripped.find('"')?;
        Some((key, &stripped[..end_quote], &stripped[end_quote + 1..]))
    } else if let Some(stripped) = after_eq.strip_prefix('\'') {
        let end_quote = stripped.find('\'')?;
        Some((key, &stripped[..end_quote], &stripped[end_quote + 1..]))
    } else {
        let end = after_eq.find(char::is_whitespace).unwrap_or(after_eq.len());
        Some((key, &after_eq[..end], &after_eq[end..]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_args() {
        let args = DirectiveArgs::parse("", "");
        assert_eq!(args, DirectiveArgs::default());
    }

    #[test]
    fn test_content_preserves_whitespace() {
        let args = DirectiveArgs::parse("  my  block ", "");
        assert_eq!(args.content, "  my  block ");
    }

    #[test]
    fn test_id() {
        let args = DirectiveArgs::parse("", "#my-id");
        assert_eq!(args.id, Some("my-id".to_owned()));
    }

    #[test]
    fn test_classes() {
        let args = DirectiveArgs::parse("", ".foo .bar.baz");
        assert_eq!(args.classes, vec!["foo", "bar", "baz"]);
    }

    #[test]
    fn test_flag() {
        let args = DirectiveArgs::parse("", "show");
        assert_eq!(args.flags, vec!["show"]);
        assert!(args.has_flag("show"));
        assert!(args.attrs.is_empty());
    }

    #[test]
    fn test_flag_followed_by_key_value() {
        let args = DirectiveArgs::parse("", "show id=intro");
        assert!(args.has_flag("show"));
        assert_eq!(args.get("id"), Some("intro"));
    }

    #[test]
    fn test_key_value_followed_by_flag() {
        let args = DirectiveArgs::parse("", r#"title="Hello World" show"#);
        assert_eq!(args.get("title"), Some("Hello World"));
        assert!(args.has_flag("show"));
    }

    #[test]
    fn test_single_quoted_value() {
        let args = DirectiveArgs::parse("", "title='Hello World'");
        assert_eq!(args.get("title"), Some("Hello World"));
    }

    #[test]
    fn test_empty_quoted_value() {
        let args = DirectiveArgs::parse("", r#"alt="""#);
        assert_eq!(args.get("alt"), Some(""));
    }

    #[test]
    fn test_mixed_attributes() {
        let args = DirectiveArgs::parse("content", r#"#my-id .foo lang="en" show width=100"#);
        assert_eq!(args.content, "content");
        assert_eq!(args.id, Some("my-id".to_owned()));
        assert_eq!(args.classes, vec!["foo"]);
        assert_eq!(args.get("lang"), Some("en"));
        assert_eq!(args.get("width"), Some("100"));
        assert_eq!(args.flags, vec!["show"]);
    }

    #[test]
    fn test_stray_equals_skipped() {
        let args = DirectiveArgs::parse("", "= show");
        assert_eq!(args.flags, vec!["show"]);
    }

    #[test]
    fn test_non_ascii_does_not_panic() {
        let args = DirectiveArgs::parse("", "é=ü ñ");
        assert_eq!(args.get("é"), Some("ü"));
        assert!(args.has_flag("ñ"));
    }
}
