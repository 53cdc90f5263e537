//! Document tree nodes.
//!
//! A parsed page is an ordered list of [`Node`]s. Markdown constructs become
//! [`Element`]s named after the HTML tag they render to; container directives
//! become [`Container`]s carrying classification markers.

/// A node in the document tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    /// A markdown construct rendered as an HTML element.
    Element(Element),
    /// Plain text (escaped on output).
    Text(String),
    /// Raw HTML passed through unchanged.
    Html(String),
    /// A grouping node produced by a container directive.
    Container(Container),
}

impl Node {
    /// Create a text node.
    #[must_use]
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Concatenated text of this node and all descendants.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text(text) => out.push_str(text),
            Self::Html(_) => {}
            Self::Element(element) => {
                for child in &element.children {
                    child.collect_text(out);
                }
            }
            Self::Container(container) => {
                for child in &container.children {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Borrow the element if this node is one.
    #[must_use]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Borrow the container if this node is one.
    #[must_use]
    pub fn as_container(&self) -> Option<&Container> {
        match self {
            Self::Container(container) => Some(container),
            _ => None,
        }
    }
}

/// An HTML element with attributes and children.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    /// Tag name (e.g. `"p"`, `"h2"`, `"pre"`).
    pub tag: &'static str,
    /// Attributes in insertion order. Values are unescaped.
    pub attributes: Vec<(&'static str, String)>,
    /// Child nodes in source order.
    pub children: Vec<Node>,
}

impl Element {
    /// Create an element without attributes or children.
    #[must_use]
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Add an attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attributes.push((name, value.into()));
        self
    }

    /// Add a child node.
    #[must_use]
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Get an attribute value by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

/// Ordered set of class names.
///
/// Keeps first-insertion order so rendered `class` attributes are stable.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassList(Vec<String>);

impl ClassList {
    /// Create an empty class list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a class. Returns `false` if it was already present.
    pub fn insert(&mut self, class: impl Into<String>) -> bool {
        let class = class.into();
        if self.contains(&class) {
            return false;
        }
        self.0.push(class);
        true
    }

    /// Check whether a class is present.
    #[must_use]
    pub fn contains(&self, class: &str) -> bool {
        self.0.iter().any(|c| c == class)
    }

    /// Iterate classes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Number of classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Space-separated form for a `class` attribute.
    #[must_use]
    pub fn to_attribute(&self) -> String {
        self.0.join(" ")
    }
}

impl<S: Into<String>> FromIterator<S> for ClassList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut list = Self::new();
        for class in iter {
            list.insert(class);
        }
        list
    }
}

/// Grouping node produced by a container directive.
///
/// Carries presentation metadata only; its children are the parsed body of
/// the directive in source order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Container {
    /// Classification markers.
    pub classes: ClassList,
    /// HTML id, if the author supplied one.
    pub id: Option<String>,
    /// Directive argument, whitespace preserved.
    pub argument: Option<String>,
    /// Parsed child nodes.
    pub children: Vec<Node>,
}

impl From<Container> for Node {
    fn from(container: Container) -> Self {
        Self::Container(container)
    }
}
