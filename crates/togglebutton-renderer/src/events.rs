//! Builds document tree nodes from pulldown-cmark events.

use pulldown_cmark::{Alignment, BlockQuoteKind, CodeBlockKind, Event, HeadingLevel, Tag, TagEnd};

use crate::tree::{Element, Node};

/// An open construct waiting for its end event.
enum Frame {
    Element(Element),
    /// Children are spliced into the parent (e.g. HTML blocks).
    Transparent(Vec<Node>),
    /// Children are dropped (e.g. metadata blocks).
    Discard,
    /// Children become the `alt` text.
    Image {
        src: String,
        title: String,
        children: Vec<Node>,
    },
    CodeBlock {
        lang: Option<String>,
        source: String,
    },
}

#[derive(Default)]
struct TableState {
    alignments: Vec<Alignment>,
    cell: usize,
    in_head: bool,
}

/// Incremental tree construction from a markdown event stream.
#[derive(Default)]
pub(crate) struct TreeBuilder {
    root: Vec<Node>,
    stack: Vec<Frame>,
    table: TableState,
}

impl TreeBuilder {
    /// Build nodes from a complete event stream.
    pub(crate) fn build<'a>(events: impl Iterator<Item = Event<'a>>) -> Vec<Node> {
        let mut builder = Self::default();
        for event in events {
            builder.event(event);
        }
        builder.finish()
    }

    fn finish(mut self) -> Vec<Node> {
        while !self.stack.is_empty() {
            self.close();
        }
        self.root
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.push_text(&text),
            Event::Code(code) => {
                self.push_node(Element::new("code").with_child(Node::Text(code.into_string())).into());
            }
            Event::InlineMath(math) | Event::DisplayMath(math) => self.push_text(&math),
            Event::Html(html) | Event::InlineHtml(html) => {
                self.push_node(Node::Html(html.into_string()));
            }
            Event::FootnoteReference(label) => self.push_text(&format!("[^{label}]")),
            Event::SoftBreak => self.push_text("\n"),
            Event::HardBreak => self.push_node(Element::new("br").into()),
            Event::Rule => self.push_node(Element::new("hr").into()),
            Event::TaskListMarker(checked) => {
                let mut input = Element::new("input").with_attribute("type", "checkbox");
                if checked {
                    input = input.with_attribute("checked", "");
                }
                self.push_node(input.with_attribute("disabled", "").into());
            }
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.open_element("p"),
            Tag::Heading {
                level, id, classes, ..
            } => {
                let mut heading = Element::new(heading_tag(level));
                if let Some(id) = id {
                    heading = heading.with_attribute("id", id.into_string());
                }
                if !classes.is_empty() {
                    let classes: Vec<&str> = classes.iter().map(|c| &**c).collect();
                    heading = heading.with_attribute("class", classes.join(" "));
                }
                self.stack.push(Frame::Element(heading));
            }
            Tag::BlockQuote(Some(kind)) => {
                let (class, title) = admonition(kind);
                let title = Element::new("p")
                    .with_attribute("class", "admonition-title")
                    .with_child(Node::text(title));
                self.stack.push(Frame::Element(
                    Element::new("div")
                        .with_attribute("class", format!("admonition {class}"))
                        .with_child(title.into()),
                ));
            }
            Tag::BlockQuote(None) => self.open_element("blockquote"),
            Tag::CodeBlock(kind) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(str::to_owned),
                    CodeBlockKind::Indented => None,
                };
                self.stack.push(Frame::CodeBlock {
                    lang,
                    source: String::new(),
                });
            }
            Tag::HtmlBlock => self.stack.push(Frame::Transparent(Vec::new())),
            Tag::MetadataBlock(_) => self.stack.push(Frame::Discard),
            Tag::List(Some(1)) => self.open_element("ol"),
            Tag::List(Some(start)) => self.stack.push(Frame::Element(
                Element::new("ol").with_attribute("start", start.to_string()),
            )),
            Tag::List(None) => self.open_element("ul"),
            Tag::Item => self.open_element("li"),
            Tag::FootnoteDefinition(label) => self.stack.push(Frame::Element(
                Element::new("div")
                    .with_attribute("class", "footnote-definition")
                    .with_attribute("id", label.into_string()),
            )),
            Tag::DefinitionList => self.open_element("dl"),
            Tag::DefinitionListTitle => self.open_element("dt"),
            Tag::DefinitionListDefinition => self.open_element("dd"),
            Tag::Table(alignments) => {
                self.table = TableState {
                    alignments,
                    ..TableState::default()
                };
                self.open_element("table");
            }
            Tag::TableHead => {
                self.table.in_head = true;
                self.table.cell = 0;
                self.open_element("thead");
                self.open_element("tr");
            }
            Tag::TableRow => {
                self.table.cell = 0;
                self.open_element("tr");
            }
            Tag::TableCell => {
                let mut cell = Element::new(if self.table.in_head { "th" } else { "td" });
                if let Some(style) = self.table.alignments.get(self.table.cell).and_then(|a| {
                    match a {
                        Alignment::None => None,
                        Alignment::Left => Some("text-align: left"),
                        Alignment::Center => Some("text-align: center"),
                        Alignment::Right => Some("text-align: right"),
                    }
                }) {
                    cell = cell.with_attribute("style", style);
                }
                self.stack.push(Frame::Element(cell));
            }
            Tag::Emphasis => self.open_element("em"),
            Tag::Strong => self.open_element("strong"),
            Tag::Strikethrough => self.open_element("s"),
            Tag::Superscript => self.open_element("sup"),
            Tag::Subscript => self.open_element("sub"),
            Tag::Link {
                dest_url, title, ..
            } => {
                let mut link = Element::new("a").with_attribute("href", dest_url.into_string());
                if !title.is_empty() {
                    link = link.with_attribute("title", title.into_string());
                }
                self.stack.push(Frame::Element(link));
            }
            Tag::Image {
                dest_url, title, ..
            } => self.stack.push(Frame::Image {
                src: dest_url.into_string(),
                title: title.into_string(),
                children: Vec::new(),
            }),
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::TableHead => {
                // tr, thead
                self.close();
                self.close();
                self.table.in_head = false;
                self.open_element("tbody");
            }
            TagEnd::TableCell => {
                self.close();
                self.table.cell += 1;
            }
            TagEnd::Table => {
                if matches!(self.stack.last(), Some(Frame::Element(e)) if e.tag == "tbody") {
                    self.close();
                }
                self.close();
            }
            _ => self.close(),
        }
    }

    fn open_element(&mut self, tag: &'static str) {
        self.stack.push(Frame::Element(Element::new(tag)));
    }

    fn close(&mut self) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        match frame {
            Frame::Element(element) => self.push_node(element.into()),
            Frame::Transparent(children) => {
                for child in children {
                    self.push_node(child);
                }
            }
            Frame::Discard => {}
            Frame::Image {
                src,
                title,
                children,
            } => {
                let alt: String = children.iter().map(Node::text_content).collect();
                let mut image = Element::new("img").with_attribute("src", src);
                if !title.is_empty() {
                    image = image.with_attribute("title", title);
                }
                self.push_node(image.with_attribute("alt", alt).into());
            }
            Frame::CodeBlock { lang, source } => {
                let mut code = Element::new("code");
                if let Some(lang) = lang {
                    code = code.with_attribute("class", format!("language-{lang}"));
                }
                let pre = Element::new("pre").with_child(code.with_child(Node::Text(source)).into());
                self.push_node(pre.into());
            }
        }
    }

    fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self.stack.last_mut() {
            None => Some(&mut self.root),
            Some(Frame::Element(element)) => Some(&mut element.children),
            Some(Frame::Transparent(children) | Frame::Image { children, .. }) => Some(children),
            Some(Frame::Discard | Frame::CodeBlock { .. }) => None,
        }
    }

    fn push_node(&mut self, node: Node) {
        if let Some(children) = self.children_mut() {
            children.push(node);
        }
    }

    fn push_text(&mut self, text: &str) {
        if let Some(Frame::CodeBlock { source, .. }) = self.stack.last_mut() {
            source.push_str(text);
            return;
        }
        if let Some(children) = self.children_mut() {
            // pulldown-cmark splits text around escapes and entities
            if let Some(Node::Text(last)) = children.last_mut() {
                last.push_str(text);
            } else {
                children.push(Node::text(text));
            }
        }
    }
}

fn heading_tag(level: HeadingLevel) -> &'static str {
    match level {
        HeadingLevel::H1 => "h1",
        HeadingLevel::H2 => "h2",
        HeadingLevel::H3 => "h3",
        HeadingLevel::H4 => "h4",
        HeadingLevel::H5 => "h5",
        HeadingLevel::H6 => "h6",
    }
}

fn admonition(kind: BlockQuoteKind) -> (&'static str, &'static str) {
    match kind {
        BlockQuoteKind::Note => ("note", "Note"),
        BlockQuoteKind::Tip => ("tip", "Tip"),
        BlockQuoteKind::Important => ("important", "Important"),
        BlockQuoteKind::Warning => ("warning", "Warning"),
        BlockQuoteKind::Caution => ("caution", "Caution"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use pulldown_cmark::{Options, Parser};

    fn build(markdown: &str) -> Vec<Node> {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_GFM;
        TreeBuilder::build(Parser::new_ext(markdown, options))
    }

    #[test]
    fn test_paragraph() {
        assert_eq!(
            build("Hello"),
            vec![Element::new("p").with_child(Node::text("Hello")).into()]
        );
    }

    #[test]
    fn test_adjacent_text_merged() {
        let nodes = build("a &amp; b");
        let paragraph = nodes[0].as_element().unwrap();
        assert_eq!(paragraph.children, vec![Node::text("a & b")]);
    }

    #[test]
    fn test_inline_formatting() {
        let nodes = build("*it* **bold** `code` ~~gone~~");
        let paragraph = nodes[0].as_element().unwrap();
        let tags: Vec<_> = paragraph
            .children
            .iter()
            .filter_map(Node::as_element)
            .map(|e| e.tag)
            .collect();
        assert_eq!(tags, vec!["em", "strong", "code", "s"]);
    }

    #[test]
    fn test_heading_with_custom_id() {
        let options = Options::ENABLE_HEADING_ATTRIBUTES;
        let nodes = TreeBuilder::build(Parser::new_ext("## Setup {#install}", options));
        let heading = nodes[0].as_element().unwrap();
        assert_eq!(heading.tag, "h2");
        assert_eq!(heading.attribute("id"), Some("install"));
        assert_eq!(nodes[0].text_content(), "Setup");
    }

    #[test]
    fn test_code_block() {
        let nodes = build("```rust\nfn main() {}\n```");
        assert_eq!(
            nodes,
            vec![
                Element::new("pre")
                    .with_child(
                        Element::new("code")
                            .with_attribute("class", "language-rust")
                            .with_child(Node::text("fn main() {}\n"))
                            .into()
                    )
                    .into()
            ]
        );
    }

    #[test]
    fn test_ordered_list_start() {
        let nodes = build("3. three\n4. four");
        let list = nodes[0].as_element().unwrap();
        assert_eq!(list.tag, "ol");
        assert_eq!(list.attribute("start"), Some("3"));
        assert_eq!(list.children.len(), 2);
    }

    #[test]
    fn test_image_alt_text() {
        let nodes = build("![A *diagram*](d.png \"Flow\")");
        let paragraph = nodes[0].as_element().unwrap();
        let image = paragraph.children[0].as_element().unwrap();
        assert_eq!(image.tag, "img");
        assert_eq!(image.attribute("src"), Some("d.png"));
        assert_eq!(image.attribute("title"), Some("Flow"));
        assert_eq!(image.attribute("alt"), Some("A diagram"));
        assert!(image.children.is_empty());
    }

    #[test]
    fn test_table_structure() {
        let nodes = build("| A | B |\n|:--|--:|\n| 1 | 2 |");
        let table = nodes[0].as_element().unwrap();
        let sections: Vec<_> = table
            .children
            .iter()
            .filter_map(Node::as_element)
            .map(|e| e.tag)
            .collect();
        assert_eq!(sections, vec!["thead", "tbody"]);

        let head_row = table.children[0].as_element().unwrap().children[0]
            .as_element()
            .unwrap();
        let first = head_row.children[0].as_element().unwrap();
        assert_eq!(first.tag, "th");
        assert_eq!(first.attribute("style"), Some("text-align: left"));

        let body_row = table.children[1].as_element().unwrap().children[0]
            .as_element()
            .unwrap();
        let second = body_row.children[1].as_element().unwrap();
        assert_eq!(second.tag, "td");
        assert_eq!(second.attribute("style"), Some("text-align: right"));
    }

    #[test]
    fn test_task_list() {
        let nodes = build("- [x] done");
        let item = nodes[0].as_element().unwrap().children[0]
            .as_element()
            .unwrap();
        let input = item.children[0].as_element().unwrap();
        assert_eq!(input.tag, "input");
        assert_eq!(input.attribute("checked"), Some(""));
    }

    #[test]
    fn test_alert_becomes_admonition() {
        let nodes = build("> [!WARNING]\n> Careful");
        let div = nodes[0].as_element().unwrap();
        assert_eq!(div.tag, "div");
        assert_eq!(div.attribute("class"), Some("admonition warning"));
        assert_eq!(div.children[0].text_content(), "Warning");
        assert_eq!(div.children[1].text_content(), "Careful");
    }

    #[test]
    fn test_html_block_passthrough() {
        let nodes = build("<div class=\"raw\">\nhi\n</div>");
        assert!(nodes.iter().all(|n| matches!(n, Node::Html(_))));
        let html: String = nodes
            .iter()
            .map(|n| match n {
                Node::Html(h) => h.as_str(),
                _ => "",
            })
            .collect();
        assert!(html.contains("<div class=\"raw\">"));
    }
}
