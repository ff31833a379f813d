//! Minimal owned element tree standing in for the host document.
//!
//! Only what the version UI touches is modelled: elements with attributes
//! and classes, text nodes, descendant selectors and HTML serialisation.

use std::fmt::{self, Write as _};

/// A node in the document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An element with ordered attributes, a class list and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub classes: Vec<String>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            classes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    pub fn with_attribute(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.append_child(child);
        self
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_child(Node::Text(text.into()))
    }

    pub fn append_child(&mut self, child: impl Into<Node>) {
        self.children.push(child.into());
    }

    /// Adds `class` unless it is already present.
    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Sets an attribute, replacing any previous value.
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(t) => out.push_str(t),
                Node::Element(e) => e.collect_text(out),
            }
        }
    }

    /// Direct element children, skipping text nodes.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|c| match c {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// `(href, text)` of every descendant `<a>` in document order.
    pub fn links(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        self.collect_links(&mut out);
        out
    }

    fn collect_links(&self, out: &mut Vec<(String, String)>) {
        for child in self.child_elements() {
            if child.tag == "a" {
                let href = child.attribute("href").unwrap_or_default().to_string();
                out.push((href, child.text_content()));
            }
            child.collect_links(out);
        }
    }
}

impl From<Element> for Node {
    fn from(value: Element) -> Self {
        Node::Element(value)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::Text(value.to_string())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::Text(value)
    }
}

/// One compound of a selector: optional tag name plus classes.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    classes: Vec<String>,
}

impl Compound {
    fn parse(token: &str) -> Self {
        let mut pieces = token.split('.');
        let tag = pieces
            .next()
            .filter(|t| !t.is_empty())
            .map(|t| t.to_ascii_lowercase());
        let classes = pieces
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();
        Self { tag, classes }
    }

    fn matches(&self, el: &Element) -> bool {
        self.tag
            .as_deref()
            .is_none_or(|t| el.tag.eq_ignore_ascii_case(t))
            && self.classes.iter().all(|c| el.has_class(c))
    }
}

fn parse_selector(selector: &str) -> Vec<Compound> {
    selector.split_whitespace().map(Compound::parse).collect()
}

/// Ancestors are ordered root first.
fn matches_selector(el: &Element, ancestors: &[&Element], selector: &[Compound]) -> bool {
    let Some((last, rest)) = selector.split_last() else {
        return false;
    };
    if !last.matches(el) {
        return false;
    }
    let mut remaining = rest.iter().rev().peekable();
    for ancestor in ancestors.iter().rev() {
        match remaining.peek() {
            Some(compound) if compound.matches(ancestor) => {
                remaining.next();
            }
            Some(_) => {}
            None => break,
        }
    }
    remaining.peek().is_none()
}

fn find_path<'a>(
    el: &'a Element,
    selector: &[Compound],
    ancestors: &mut Vec<&'a Element>,
    path: &mut Vec<usize>,
) -> bool {
    if matches_selector(el, ancestors, selector) {
        return true;
    }
    ancestors.push(el);
    for (index, child) in el.children.iter().enumerate() {
        if let Node::Element(child) = child {
            path.push(index);
            if find_path(child, selector, ancestors, path) {
                return true;
            }
            path.pop();
        }
    }
    ancestors.pop();
    false
}

/// The host document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub root: Element,
}

impl Document {
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    /// The read-the-docs theme fragment the version UI is written into.
    pub fn rtd_skeleton() -> Self {
        let banner = Element::new("div").with_class("version-banner");
        let other_versions = Element::new("div")
            .with_class("rst-other-versions")
            .with_child(Element::new("dl").with_child(Element::new("dt").with_text("Versions")));
        let versions = Element::new("div")
            .with_class("rst-versions")
            .with_attribute("data-toggle", "rst-versions")
            .with_attribute("role", "note")
            .with_child(other_versions);
        Self::new(Element::new("body").with_child(banner).with_child(versions))
    }

    /// First element matching a descendant selector such as
    /// `.rst-other-versions dl`, in document order.
    pub fn query_selector(&self, selector: &str) -> Option<&Element> {
        let path = self.path_of(selector)?;
        let mut el = &self.root;
        for index in path {
            match &el.children[index] {
                Node::Element(child) => el = child,
                Node::Text(_) => return None,
            }
        }
        Some(el)
    }

    pub fn query_selector_mut(&mut self, selector: &str) -> Option<&mut Element> {
        let path = self.path_of(selector)?;
        let mut el = &mut self.root;
        for index in path {
            match &mut el.children[index] {
                Node::Element(child) => el = child,
                Node::Text(_) => return None,
            }
        }
        Some(el)
    }

    fn path_of(&self, selector: &str) -> Option<Vec<usize>> {
        let selector = parse_selector(selector);
        let mut path = Vec::new();
        find_path(&self.root, &selector, &mut Vec::new(), &mut path).then_some(path)
    }
}

fn escape_into(out: &mut impl fmt::Write, s: &str, attribute: bool) -> fmt::Result {
    for ch in s.chars() {
        match ch {
            '&' => out.write_str("&amp;")?,
            '<' => out.write_str("&lt;")?,
            '>' => out.write_str("&gt;")?,
            '"' if attribute => out.write_str("&quot;")?,
            _ => out.write_char(ch)?,
        }
    }
    Ok(())
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Text(t) => escape_into(f, t, false),
            Node::Element(e) => write!(f, "{e}"),
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag)?;
        if !self.classes.is_empty() {
            f.write_str(" class=\"")?;
            escape_into(f, &self.classes.join(" "), true)?;
            f.write_char('"')?;
        }
        for (name, value) in &self.attributes {
            write!(f, " {name}=\"")?;
            escape_into(f, value, true)?;
            f.write_char('"')?;
        }
        f.write_char('>')?;
        for child in &self.children {
            write!(f, "{child}")?;
        }
        write!(f, "</{}>", self.tag)
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)
    }
}
