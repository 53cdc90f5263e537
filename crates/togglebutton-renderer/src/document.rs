//! Document parsing with container directives.
//!
//! The parser walks the source line by line. Container directive markers
//! outside fenced code split the page into markdown runs (handed to
//! pulldown-cmark) and directive bodies (handed to the registered
//! [`ContainerDirective`]).
//!
//! Link reference definitions are collected from the whole page up front,
//! so a reference link resolves no matter which run or body defines it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use pulldown_cmark::{BrokenLink, BrokenLinkCallback, CowStr, Options, Parser};

use crate::diagnostic::{Diagnostic, Level};
use crate::directive::fence::FenceTracker;
use crate::directive::syntax::{ContainerMarker, parse_container_line};
use crate::directive::{
    ContainerDirective, DirectiveArgs, DirectiveError, DirectiveInvocation, DirectiveOptions,
};
use crate::events::TreeBuilder;
use crate::html::HtmlRenderer;
use crate::tree::Node;

/// Default limit for nested directive bodies.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// One line of source text with its original line number.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SourceLine<'a> {
    /// Line number in the source document (1-indexed).
    pub number: usize,
    /// Line text without the line terminator.
    pub text: &'a str,
}

impl<'a> SourceLine<'a> {
    /// Create a source line.
    #[must_use]
    pub fn new(number: usize, text: &'a str) -> Self {
        Self { number, text }
    }

    /// Split a string into numbered lines.
    #[must_use]
    pub fn split(input: &'a str) -> Vec<Self> {
        input
            .lines()
            .enumerate()
            .map(|(idx, text)| Self::new(idx + 1, text))
            .collect()
    }
}

/// A parsed document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Document {
    /// Top-level nodes in source order.
    pub nodes: Vec<Node>,
    /// Problems found while parsing.
    pub diagnostics: Vec<Diagnostic>,
}

impl Document {
    /// Text of the first top-level `h1`, if any.
    #[must_use]
    pub fn title(&self) -> Option<String> {
        self.nodes
            .iter()
            .filter_map(Node::as_element)
            .find(|e| e.tag == "h1")
            .map(|e| {
                e.children
                    .iter()
                    .map(Node::text_content)
                    .collect::<String>()
                    .trim()
                    .to_owned()
            })
    }

    /// Render the document body to HTML.
    #[must_use]
    pub fn to_html(&self) -> String {
        HtmlRenderer::new().render(&self.nodes)
    }
}

/// Markdown parser with pluggable container directives.
///
/// A parser is immutable once configured and can be shared across threads
/// (`DocumentParser: Send + Sync`); all per-document state lives in
/// [`ParseState`].
///
/// # Example
///
/// ```
/// use togglebutton_renderer::{DocumentParser, ToggleDirective};
///
/// let parser = DocumentParser::new().with_container(ToggleDirective);
/// let document = parser.parse(":::toggle\nHidden *details*.\n:::");
///
/// assert!(document.diagnostics.is_empty());
/// assert_eq!(
///     document.to_html(),
///     r#"<div class="toggle"><p>Hidden <em>details</em>.</p></div>"#
/// );
/// ```
#[derive(Clone)]
pub struct DocumentParser {
    containers: Vec<Arc<dyn ContainerDirective>>,
    gfm: bool,
    max_depth: usize,
}

impl Default for DocumentParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentParser {
    /// Create a parser with GFM enabled and no directives.
    #[must_use]
    pub fn new() -> Self {
        Self {
            containers: Vec::new(),
            gfm: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Register a container directive handler.
    ///
    /// A later registration with the same name replaces the earlier one.
    #[must_use]
    pub fn with_container<D: ContainerDirective + 'static>(self, handler: D) -> Self {
        self.with_shared_container(Arc::new(handler))
    }

    /// Register an already shared container directive handler.
    #[must_use]
    pub fn with_shared_container(mut self, handler: Arc<dyn ContainerDirective>) -> Self {
        self.containers.retain(|h| h.name() != handler.name());
        self.containers.push(handler);
        self
    }

    /// Enable or disable GitHub Flavored Markdown features.
    ///
    /// GFM is enabled by default: tables, strikethrough, task lists and
    /// alerts.
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// Set the maximum nesting depth of directive bodies.
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Names of registered container directives.
    pub fn directive_names(&self) -> impl Iterator<Item = &str> {
        self.containers.iter().map(|h| h.name())
    }

    /// pulldown-cmark options for markdown runs.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        let base = Options::ENABLE_HEADING_ATTRIBUTES;
        if self.gfm {
            base | Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_GFM
        } else {
            base
        }
    }

    /// Parse a document.
    #[must_use]
    pub fn parse(&self, input: &str) -> Document {
        self.parse_source(input, None)
    }

    /// Parse a document, attributing diagnostics to `source_path`.
    #[must_use]
    pub fn parse_source(&self, input: &str, source_path: Option<&Path>) -> Document {
        let lines = SourceLine::split(input);
        let mut state = ParseState {
            parser: self,
            source_path,
            depth: 0,
            references: References::collect(&lines, self.parser_options()),
            diagnostics: Vec::new(),
        };
        let nodes = state.parse_lines(&lines);
        Document {
            nodes,
            diagnostics: state.diagnostics,
        }
    }

    /// Run `f` with a fresh parse state, returning its result and the
    /// diagnostics it produced.
    ///
    /// Lets callers drive a node builder outside of a directive occurrence.
    pub fn parse_with<R>(&self, f: impl FnOnce(&mut ParseState<'_>) -> R) -> (R, Vec<Diagnostic>) {
        let mut state = ParseState {
            parser: self,
            source_path: None,
            depth: 0,
            references: References::default(),
            diagnostics: Vec::new(),
        };
        let result = f(&mut state);
        (result, state.diagnostics)
    }

    fn find_container(&self, name: &str) -> Option<&Arc<dyn ContainerDirective>> {
        self.containers.iter().find(|h| h.name() == name)
    }
}

/// Per-document parsing state handed to directive handlers.
pub struct ParseState<'p> {
    parser: &'p DocumentParser,
    source_path: Option<&'p Path>,
    depth: usize,
    references: References,
    diagnostics: Vec<Diagnostic>,
}

impl ParseState<'_> {
    /// Parse directive body lines with the enclosing document's parser.
    ///
    /// Nested directives are expanded; their diagnostics are collected into
    /// this document. Fails once nesting exceeds the parser's maximum depth.
    pub fn nested_parse(&mut self, lines: &[SourceLine<'_>]) -> Result<Vec<Node>, DirectiveError> {
        if self.depth >= self.parser.max_depth {
            return Err(DirectiveError::DepthExceeded {
                max_depth: self.parser.max_depth,
            });
        }
        self.depth += 1;
        let nodes = self.parse_lines(lines);
        self.depth -= 1;
        Ok(nodes)
    }

    /// Path of the document being parsed, if known.
    #[must_use]
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path
    }

    /// Record a diagnostic at `line`.
    pub fn report(&mut self, level: Level, line: usize, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic {
            level,
            source_path: self.source_path.map(PathBuf::from),
            line,
            message: message.into(),
        });
    }

    fn parse_lines(&mut self, lines: &[SourceLine<'_>]) -> Vec<Node> {
        let mut nodes = Vec::new();
        let mut pending: Vec<&str> = Vec::new();
        let mut fence = FenceTracker::new();
        // Unregistered containers currently open; their closers are literal
        let mut passthrough_depth = 0usize;
        let mut idx = 0;

        while idx < lines.len() {
            let line = lines[idx];
            idx += 1;

            if in_code(&mut fence, line.text) {
                pending.push(line.text);
                continue;
            }

            match parse_container_line(line.text) {
                Some(ContainerMarker::Start { name, args, .. }) => {
                    let Some(handler) = self.parser.find_container(&name).map(Arc::clone) else {
                        passthrough_depth += 1;
                        pending.push(line.text);
                        continue;
                    };

                    self.flush(&mut pending, &mut nodes);

                    let end = find_closing(lines, idx);
                    let body_end = end.unwrap_or_else(|| {
                        self.report(
                            Level::Warning,
                            line.number,
                            format!("unclosed container directive :::{name} (missing closing :::)"),
                        );
                        lines.len()
                    });
                    let body = &lines[idx..body_end];
                    idx = end.map_or(lines.len(), |e| e + 1);

                    nodes.extend(self.run_directive(handler.as_ref(), &name, &args, body, line.number));
                }
                Some(ContainerMarker::End { .. }) => {
                    if passthrough_depth > 0 {
                        passthrough_depth -= 1;
                    } else {
                        self.report(
                            Level::Warning,
                            line.number,
                            "stray ::: with no opening directive",
                        );
                    }
                    pending.push(line.text);
                }
                None => pending.push(line.text),
            }
        }

        self.flush(&mut pending, &mut nodes);
        nodes
    }

    fn run_directive(
        &mut self,
        handler: &dyn ContainerDirective,
        name: &str,
        args: &DirectiveArgs,
        body: &[SourceLine<'_>],
        line: usize,
    ) -> Vec<Node> {
        let result = DirectiveOptions::from_args(name, args, handler.option_spec()).and_then(
            |options| {
                let invocation = DirectiveInvocation {
                    name,
                    argument: Some(args.content.as_str()).filter(|a| !a.is_empty()),
                    options,
                    content: body,
                    line,
                };
                handler.run(&invocation, self)
            },
        );

        match result {
            Ok(nodes) => nodes,
            Err(err) => {
                tracing::debug!(directive = name, line, error = %err, "Directive failed");
                self.report(Level::Error, line, err.to_string());
                Vec::new()
            }
        }
    }

    /// Parse accumulated markdown lines and append the resulting nodes.
    fn flush(&self, pending: &mut Vec<&str>, nodes: &mut Vec<Node>) {
        if pending.is_empty() {
            return;
        }
        let markdown = pending.join("\n");
        pending.clear();
        let parser = Parser::new_with_broken_link_callback(
            &markdown,
            self.parser.parser_options(),
            Some(&self.references),
        );
        nodes.extend(TreeBuilder::build(parser));
    }
}

/// Link reference definitions of a whole page, keyed by normalized label.
#[derive(Debug, Default)]
struct References {
    targets: HashMap<String, (String, String)>,
}

impl References {
    /// Collect definitions from every markdown line of the page.
    ///
    /// Directive markers are blanked so that a definition right after an
    /// opening marker is not swallowed into a paragraph.
    fn collect(lines: &[SourceLine<'_>], options: Options) -> Self {
        let mut fence = FenceTracker::new();
        let markdown = lines
            .iter()
            .map(|line| {
                if !in_code(&mut fence, line.text) && parse_container_line(line.text).is_some() {
                    ""
                } else {
                    line.text
                }
            })
            .collect::<Vec<_>>()
            .join("\n");

        let parser = Parser::new_ext(&markdown, options);
        let targets = parser
            .reference_definitions()
            .iter()
            .map(|(label, def)| {
                let title = def.title.as_deref().unwrap_or_default();
                (normalize_label(label), (def.dest.to_string(), title.to_owned()))
            })
            .collect();
        Self { targets }
    }

    fn resolve<'a>(&self, label: &str) -> Option<(CowStr<'a>, CowStr<'a>)> {
        let (dest, title) = self.targets.get(&normalize_label(label))?;
        Some((dest.clone().into(), title.clone().into()))
    }
}

impl<'input> BrokenLinkCallback<'input> for &References {
    fn handle_broken_link(
        &mut self,
        link: BrokenLink<'input>,
    ) -> Option<(CowStr<'input>, CowStr<'input>)> {
        self.resolve(&link.reference)
    }
}

/// Case-fold a link label and collapse its inner whitespace.
fn normalize_label(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Feed a line to the fence tracker. Returns `true` if the line belongs to
/// fenced code, fence markers included.
fn in_code(fence: &mut FenceTracker, line: &str) -> bool {
    let was_open = fence.in_fence();
    fence.update(line) || was_open
}

/// Find the index of the marker closing a container whose body starts at
/// `start`, honoring nested containers and code fences.
fn find_closing(lines: &[SourceLine<'_>], start: usize) -> Option<usize> {
    let mut fence = FenceTracker::new();
    let mut depth = 1usize;

    for (offset, line) in lines[start..].iter().enumerate() {
        if in_code(&mut fence, line.text) {
            continue;
        }
        match parse_container_line(line.text) {
            Some(ContainerMarker::Start { .. }) => depth += 1,
            Some(ContainerMarker::End { .. }) => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + offset);
                }
            }
            None => {}
        }
    }

    None
}
