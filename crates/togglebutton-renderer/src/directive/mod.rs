//! Pluggable container directives for CommonMark directive syntax.
//!
//! A container directive wraps a block of markdown:
//!
//! ```markdown
//! :::name[argument]{#id .class key="value" flag}
//! Body markdown, parsed like the rest of the page.
//! :::
//! ```
//!
//! The [`DocumentParser`](crate::DocumentParser) finds the matching closing
//! marker, validates the options against the handler's [`OptionSpec`]s and
//! calls [`ContainerDirective::run`] with the body lines. Handlers build
//! their nodes directly and parse their body through
//! [`ParseState::nested_parse`](crate::ParseState::nested_parse).
//!
//! Markers inside fenced code blocks are left alone. Unknown directive
//! names pass through as literal text.

mod args;
mod container;
mod error;
pub(crate) mod fence;
mod options;
pub(crate) mod syntax;

pub use args::DirectiveArgs;
pub use container::{ContainerDirective, DirectiveInvocation};
pub use error::{DirectiveError, MissingContentError};
pub use options::{DirectiveOptions, OptionKind, OptionSpec};
