//! Container directive trait.
//!
//! Container directives use triple-colon syntax: `:::name` ... `:::`

use super::{DirectiveError, DirectiveOptions, MissingContentError, OptionSpec};
use crate::document::{ParseState, SourceLine};
use crate::tree::Node;

/// One occurrence of a container directive in a document.
#[derive(Debug)]
pub struct DirectiveInvocation<'a> {
    /// Directive name as written.
    pub name: &'a str,
    /// Bracket argument, whitespace preserved. `None` when absent or empty.
    pub argument: Option<&'a str>,
    /// Options validated against the directive's spec.
    pub options: DirectiveOptions,
    /// Body lines between the opening and closing markers.
    pub content: &'a [SourceLine<'a>],
    /// Line of the opening marker (1-indexed).
    pub line: usize,
}

impl DirectiveInvocation<'_> {
    /// Whether the body contains anything besides blank lines.
    #[must_use]
    pub fn has_content(&self) -> bool {
        self.content.iter().any(|line| !line.text.trim().is_empty())
    }

    /// Fail with [`MissingContentError`] if the body is empty.
    pub fn assert_has_content(&self) -> Result<(), MissingContentError> {
        if self.has_content() {
            Ok(())
        } else {
            Err(MissingContentError {
                directive: self.name.to_owned(),
            })
        }
    }
}

/// Handler for container directives: `:::name` ... `:::`
///
/// Handlers are stateless: one registered instance serves every occurrence
/// in every document, possibly from several threads at once.
///
/// # Example
///
/// ```
/// use togglebutton_renderer::directive::{ContainerDirective, DirectiveError, DirectiveInvocation};
/// use togglebutton_renderer::{Container, DocumentParser, Node, ParseState};
///
/// struct Note;
///
/// impl ContainerDirective for Note {
///     fn name(&self) -> &str { "note" }
///
///     fn run(
///         &self,
///         invocation: &DirectiveInvocation<'_>,
///         state: &mut ParseState<'_>,
///     ) -> Result<Vec<Node>, DirectiveError> {
///         let mut container = Container::default();
///         container.classes.insert("note");
///         container.children = state.nested_parse(invocation.content)?;
///         Ok(vec![container.into()])
///     }
/// }
///
/// let parser = DocumentParser::new().with_container(Note);
/// let document = parser.parse(":::note\nRemember this.\n:::");
/// assert_eq!(document.to_html(), r#"<div class="note"><p>Remember this.</p></div>"#);
/// ```
pub trait ContainerDirective: Send + Sync {
    /// Directive name, matched against `:::name`.
    fn name(&self) -> &str;

    /// Options this directive accepts. Anything else is an error.
    fn option_spec(&self) -> &[OptionSpec] {
        &[]
    }

    /// Turn one occurrence into document nodes.
    ///
    /// Use [`ParseState::nested_parse`] to parse the body with the same
    /// parser (and directives) as the enclosing document.
    fn run(
        &self,
        invocation: &DirectiveInvocation<'_>,
        state: &mut ParseState<'_>,
    ) -> Result<Vec<Node>, DirectiveError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invocation<'a>(content: &'a [SourceLine<'a>]) -> DirectiveInvocation<'a> {
        DirectiveInvocation {
            name: "toggle",
            argument: None,
            options: DirectiveOptions::default(),
            content,
            line: 1,
        }
    }

    #[test]
    fn test_has_content() {
        let lines = [SourceLine::new(2, "Hello")];
        assert!(invocation(&lines).has_content());
        assert!(invocation(&lines).assert_has_content().is_ok());
    }

    #[test]
    fn test_blank_lines_are_no_content() {
        let lines = [SourceLine::new(2, ""), SourceLine::new(3, "   ")];
        let err = invocation(&lines).assert_has_content().unwrap_err();
        assert_eq!(err.directive, "toggle");
    }

    #[test]
    fn test_empty_body_is_no_content() {
        assert!(!invocation(&[]).has_content());
    }
}
