//! Markdown document tree with pluggable container directives.
//!
//! This crate parses markdown into a tree of [`Node`]s and renders it to
//! HTML. Container directives (`:::name` ... `:::`) are expanded by
//! registered [`ContainerDirective`](directive::ContainerDirective) handlers
//! into [`Container`] nodes whose bodies are parsed by the same parser.
//!
//! # Architecture
//!
//! - [`DocumentParser`]: line scan for directive markers, pulldown-cmark for
//!   the markdown between them
//! - [`ToggleDirective`]: collapsible `toggle` blocks built by
//!   [`build_toggle`]
//! - [`render_html`]: compact HTML5 output with heading anchors
//!
//! Directive failures never abort parsing. They become [`Diagnostic`]s on
//! the [`Document`] and the offending node is left out.
//!
//! # Example
//!
//! ```
//! use togglebutton_renderer::{DocumentParser, ToggleDirective};
//!
//! let parser = DocumentParser::new().with_container(ToggleDirective);
//! let document = parser.parse("# FAQ\n\n:::toggle{show}\nYes.\n:::");
//!
//! assert_eq!(document.title().as_deref(), Some("FAQ"));
//! assert_eq!(
//!     document.to_html(),
//!     r#"<h1 id="faq">FAQ</h1><div class="toggle toggle-shown"><p>Yes.</p></div>"#
//! );
//! ```

mod diagnostic;
pub mod directive;
mod document;
mod events;
mod html;
mod toggle;
mod tree;

pub use diagnostic::{Diagnostic, Level};
pub use document::{DEFAULT_MAX_DEPTH, Document, DocumentParser, ParseState, SourceLine};
pub use html::{escape_html, render_html};
pub use toggle::{TOGGLE_CLASS, TOGGLE_SHOWN_CLASS, ToggleDirective, build_toggle, toggle_classes};
pub use tree::{ClassList, Container, Element, Node};
