//! Collapsible toggle blocks.
//!
//! ```markdown
//! :::toggle{show}
//! Body markdown, expanded on first load.
//! :::
//! ```

use crate::directive::{
    ContainerDirective, DirectiveError, DirectiveInvocation, MissingContentError, OptionSpec,
};
use crate::document::{ParseState, SourceLine};
use crate::tree::{ClassList, Container, Node};

/// Marker present on every toggle block.
pub const TOGGLE_CLASS: &str = "toggle";

/// Marker for toggle blocks expanded by default.
pub const TOGGLE_SHOWN_CLASS: &str = "toggle-shown";

const OPTION_SPEC: &[OptionSpec] = &[OptionSpec::flag("show"), OptionSpec::unchanged("id")];

/// Classification markers for a toggle block.
#[must_use]
pub fn toggle_classes(shown: bool) -> ClassList {
    let mut classes = ClassList::new();
    classes.insert(TOGGLE_CLASS);
    if shown {
        classes.insert(TOGGLE_SHOWN_CLASS);
    }
    classes
}

/// Build a toggle block from its body lines.
///
/// The body is parsed with the enclosing document's parser and attached as
/// children in source order. A body with no lines, or only blank ones, fails
/// with [`MissingContentError`].
pub fn build_toggle(
    content: &[SourceLine<'_>],
    shown: bool,
    argument: Option<&str>,
    id: Option<&str>,
    state: &mut ParseState<'_>,
) -> Result<Container, DirectiveError> {
    if content.iter().all(|line| line.text.trim().is_empty()) {
        return Err(MissingContentError {
            directive: ToggleDirective::NAME.to_owned(),
        }
        .into());
    }

    let children: Vec<Node> = state.nested_parse(content)?;

    Ok(Container {
        classes: toggle_classes(shown),
        id: id.filter(|id| !id.is_empty()).map(str::to_owned),
        argument: argument.map(str::to_owned),
        children,
    })
}

/// The `toggle` container directive.
#[derive(Clone, Copy, Debug, Default)]
pub struct ToggleDirective;

impl ToggleDirective {
    /// Directive name.
    pub const NAME: &'static str = "toggle";
}

impl ContainerDirective for ToggleDirective {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn option_spec(&self) -> &[OptionSpec] {
        OPTION_SPEC
    }

    fn run(
        &self,
        invocation: &DirectiveInvocation<'_>,
        state: &mut ParseState<'_>,
    ) -> Result<Vec<Node>, DirectiveError> {
        invocation.assert_has_content()?;
        let toggle = build_toggle(
            invocation.content,
            invocation.options.contains("show"),
            invocation.argument,
            invocation.options.get("id"),
            state,
        )?;
        Ok(vec![toggle.into()])
    }
}
