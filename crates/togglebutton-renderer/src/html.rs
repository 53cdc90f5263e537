//! HTML output for document trees.
//!
//! Produces compact HTML5 with no whitespace between block elements.
//! Headings without an explicit id get one derived from their text; repeated
//! ids are suffixed `-1`, `-2`, ... in document order.

use std::collections::HashMap;
use std::fmt::Write;

use crate::tree::{Container, Element, Node};

const VOID_TAGS: &[&str] = &["br", "hr", "img", "input"];

/// Render nodes to an HTML string.
///
/// # Examples
///
/// ```
/// use togglebutton_renderer::{Element, Node, render_html};
///
/// let nodes = vec![Element::new("h2").with_child(Node::text("Read more")).into()];
/// assert_eq!(render_html(&nodes), r#"<h2 id="read-more">Read more</h2>"#);
/// ```
#[must_use]
pub fn render_html(nodes: &[Node]) -> String {
    HtmlRenderer::new().render(nodes)
}

/// Escape text for HTML content and attribute values.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Convert heading text to an anchor id.
///
/// Lowercases, keeps alphanumerics, turns whitespace and hyphens into single
/// hyphens and drops everything else.
pub(crate) fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.trim().chars() {
        if c.is_alphanumeric() || c == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else if c.is_whitespace() || c == '-' {
            pending_dash = true;
        }
    }
    slug
}

/// Stateful renderer tracking heading ids across one document.
#[derive(Debug, Default)]
pub(crate) struct HtmlRenderer {
    ids: HashMap<String, usize>,
}

impl HtmlRenderer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn render(&mut self, nodes: &[Node]) -> String {
        let mut out = String::new();
        for node in nodes {
            self.node(node, &mut out);
        }
        out
    }

    fn node(&mut self, node: &Node, out: &mut String) {
        match node {
            Node::Text(text) => out.push_str(&escape_html(text)),
            Node::Html(html) => out.push_str(html),
            Node::Element(element) => self.element(element, out),
            Node::Container(container) => self.container(container, out),
        }
    }

    fn element(&mut self, element: &Element, out: &mut String) {
        out.push('<');
        out.push_str(element.tag);

        if is_heading(element.tag) && element.attribute("id").is_none() {
            let text: String = element.children.iter().map(Node::text_content).collect();
            let id = self.unique_id(&slugify(&text));
            write_attribute(out, "id", &id);
        }
        for (name, value) in &element.attributes {
            if *name == "id" && is_heading(element.tag) {
                let id = self.unique_id(value);
                write_attribute(out, name, &id);
            } else {
                write_attribute(out, name, value);
            }
        }
        out.push('>');

        if VOID_TAGS.contains(&element.tag) {
            return;
        }
        for child in &element.children {
            self.node(child, out);
        }
        let _ = write!(out, "</{}>", element.tag);
    }

    fn container(&mut self, container: &Container, out: &mut String) {
        out.push_str("<div");
        if !container.classes.is_empty() {
            write_attribute(out, "class", &container.classes.to_attribute());
        }
        if let Some(id) = &container.id {
            write_attribute(out, "id", id);
        }
        out.push('>');
        for child in &container.children {
            self.node(child, out);
        }
        out.push_str("</div>");
    }

    fn unique_id(&mut self, base: &str) -> String {
        let base = if base.is_empty() { "section" } else { base };
        let count = self.ids.entry(base.to_owned()).or_insert(0);
        let id = if *count == 0 {
            base.to_owned()
        } else {
            format!("{base}-{count}")
        };
        *count += 1;
        id
    }
}

fn is_heading(tag: &str) -> bool {
    matches!(tag, "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}

fn write_attribute(out: &mut String, name: &str, value: &str) {
    let _ = write!(out, r#" {name}="{}""#, escape_html(value));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::ClassList;
    use pretty_assertions::assert_eq;

    fn heading(tag: &'static str, text: &str) -> Node {
        Element::new(tag).with_child(Node::text(text)).into()
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Section Title"), "section-title");
        assert_eq!(slugify("  What's new?  "), "whats-new");
        assert_eq!(slugify("A -- B"), "a-b");
        assert_eq!(slugify("Ünïcode Über"), "ünïcode-über");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_duplicate_heading_ids() {
        let nodes = vec![heading("h2", "FAQ"), heading("h2", "FAQ"), heading("h3", "FAQ")];
        assert_eq!(
            render_html(&nodes),
            r#"<h2 id="faq">FAQ</h2><h2 id="faq-1">FAQ</h2><h3 id="faq-2">FAQ</h3>"#
        );
    }

    #[test]
    fn test_explicit_heading_id_kept() {
        let nodes = vec![
            Element::new("h2")
                .with_attribute("id", "custom")
                .with_child(Node::text("Title"))
                .into(),
        ];
        assert_eq!(render_html(&nodes), r#"<h2 id="custom">Title</h2>"#);
    }

    #[test]
    fn test_empty_heading_gets_fallback_id() {
        let nodes = vec![heading("h1", "")];
        assert_eq!(render_html(&nodes), r#"<h1 id="section"></h1>"#);
    }

    #[test]
    fn test_void_elements() {
        let nodes = vec![
            Element::new("hr").into(),
            Element::new("img")
                .with_attribute("src", "a.png")
                .with_attribute("alt", "A")
                .into(),
        ];
        assert_eq!(render_html(&nodes), r#"<hr><img src="a.png" alt="A">"#);
    }

    #[test]
    fn test_raw_html_and_text() {
        let nodes = vec![Node::Html("<b>raw</b>".to_owned()), Node::text("<b>text</b>")];
        assert_eq!(render_html(&nodes), "<b>raw</b>&lt;b&gt;text&lt;/b&gt;");
    }

    #[test]
    fn test_container_attributes() {
        let container = Container {
            classes: ["toggle", "toggle-shown"].into_iter().collect(),
            id: Some("details".to_owned()),
            argument: Some("ignored".to_owned()),
            children: vec![Element::new("p").with_child(Node::text("Hi")).into()],
        };
        assert_eq!(
            render_html(&[container.into()]),
            r#"<div class="toggle toggle-shown" id="details"><p>Hi</p></div>"#
        );
    }

    #[test]
    fn test_container_without_classes() {
        let container = Container {
            classes: ClassList::new(),
            ..Container::default()
        };
        assert_eq!(render_html(&[container.into()]), "<div></div>");
    }

    #[test]
    fn test_headings_inside_containers_share_ids() {
        let container = Container {
            children: vec![heading("h2", "Setup")],
            ..Container::default()
        };
        let nodes = vec![heading("h2", "Setup"), container.into()];
        assert_eq!(
            render_html(&nodes),
            r#"<h2 id="setup">Setup</h2><div><h2 id="setup-1">Setup</h2></div>"#
        );
    }
}
