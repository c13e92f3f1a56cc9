//! Element type - HTML elements of the page tree

use compact_str::CompactString;
use smallvec::SmallVec;

use crate::attr::{join_classes, Attrs, AttrsExt, Classes};

use super::{Children, Node, Text};

/// Tags whose text never shows up in rendered text (`innerText`).
const HIDDEN_TEXT_TAGS: &[&str] = &["script", "style", "template", "noscript"];

// =============================================================================
// Element
// =============================================================================

/// HTML element with attributes and children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// HTML tag name
    pub tag: CompactString,
    /// Element attributes
    pub attrs: Attrs,
    /// Child nodes
    pub children: Children,
}

impl Element {
    /// Create an empty element
    pub fn new(tag: impl Into<CompactString>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: SmallVec::new(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Builder API
    // ─────────────────────────────────────────────────────────────────────────

    /// Set an attribute (builder)
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Set the `id` attribute (builder)
    pub fn with_id(self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    /// Add a class token (builder)
    pub fn with_class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    /// Append a child element (builder)
    pub fn child(mut self, elem: Element) -> Self {
        self.push_elem(elem);
        self
    }

    /// Append an escaped text node (builder)
    pub fn text(mut self, content: impl Into<String>) -> Self {
        self.push_text(content);
        self
    }

    /// Append a raw HTML text node (builder)
    pub fn raw(mut self, html: impl Into<String>) -> Self {
        self.children.push(Node::Text(Text::raw(html)));
        self
    }

    /// Append a child element
    pub fn push_elem(&mut self, elem: Element) {
        self.children.push(Node::Element(Box::new(elem)));
    }

    /// Append an escaped text node
    pub fn push_text(&mut self, content: impl Into<String>) {
        self.children.push(Node::Text(Text::new(content)));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Attribute access
    // ─────────────────────────────────────────────────────────────────────────

    /// Get attribute value by name
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.get_attr(name)
    }

    /// Set attribute value (update if exists, add if not)
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attrs.set_attr(name, value);
    }

    /// Remove attribute by name, returning the old value if it existed
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        self.attrs.remove_attr(name)
    }

    /// Check if attribute exists
    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.has_attr(name)
    }

    /// Get the `id` attribute
    pub fn id(&self) -> Option<&str> {
        self.get_attr("id")
    }

    /// Get the raw `class` attribute
    pub fn class(&self) -> Option<&str> {
        self.get_attr("class")
    }

    /// Iterate over class tokens
    pub fn classes(&self) -> Classes<'_> {
        self.attrs.classes()
    }

    /// Check for a class token
    pub fn has_class(&self, class: &str) -> bool {
        self.attrs.has_class(class)
    }

    /// Add a class token if not already present
    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let value = match self.class() {
            Some(existing) if !existing.trim().is_empty() => format!("{} {}", existing.trim(), class),
            _ => class.to_string(),
        };
        self.set_attr("class", value);
    }

    /// Remove a class token, returning whether it was present
    ///
    /// Drops the `class` attribute entirely when no tokens remain.
    pub fn remove_class(&mut self, class: &str) -> bool {
        if !self.has_class(class) {
            return false;
        }
        let rest = join_classes(self.classes(), class);
        if rest.is_empty() {
            self.remove_attr("class");
        } else {
            self.set_attr("class", rest);
        }
        true
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Children
    // ─────────────────────────────────────────────────────────────────────────

    /// Check if element has no children
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of direct children (all node types)
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// First direct child element
    pub fn first_child(&self) -> Option<&Element> {
        self.children_elements().next()
    }

    /// Iterate over child element references
    pub fn children_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| n.as_element())
    }

    /// Replace all children with `nodes`
    pub fn replace_children(&mut self, nodes: impl IntoIterator<Item = Node>) {
        self.children = nodes.into_iter().collect();
    }

    /// Replace all children with one raw HTML text node
    ///
    /// This is how typeset output lands in the tree.
    pub fn set_raw_html(&mut self, html: impl Into<String>) {
        self.replace_children([Node::Text(Text::raw(html))]);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Text access
    // ─────────────────────────────────────────────────────────────────────────

    /// Concatenated content of all descendant text nodes (`textContent`)
    pub fn text_content(&self) -> String {
        let mut result = String::new();
        self.collect_text(&mut result);
        result
    }

    fn collect_text(&self, buf: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(t) => buf.push_str(&t.content),
                Node::Element(e) => e.collect_text(buf),
            }
        }
    }

    /// Text as a reader would see it (`innerText`)
    ///
    /// `<br>` becomes a newline; script-like containers contribute nothing.
    pub fn inner_text(&self) -> String {
        let mut result = String::new();
        self.collect_inner_text(&mut result);
        result
    }

    fn collect_inner_text(&self, buf: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(t) => buf.push_str(&t.content),
                Node::Element(e) if e.tag == "br" => buf.push('\n'),
                Node::Element(e) if HIDDEN_TEXT_TAGS.contains(&e.tag.as_str()) => {}
                Node::Element(e) => e.collect_inner_text(buf),
            }
        }
    }
}
