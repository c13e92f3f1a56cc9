//! HTML Rendering for page trees
//!
//! Serializes a (typically annotated) document back to an HTML string.

use crate::attr::{join_classes, Attrs, AttrsExt};
use crate::node::{Document, Element, Node};

// =============================================================================
// RenderConfig
// =============================================================================

/// Configuration for HTML rendering.
#[derive(Debug, Clone, Default)]
pub struct RenderConfig {
    /// Whether to drop whitespace-only text nodes.
    pub minify: bool,
    /// Class token to strip from every element on output.
    ///
    /// Useful to remove the math marker once the page has been typeset.
    pub strip_class: Option<String>,
}

impl RenderConfig {
    /// Page config (output mirrors the tree).
    pub const PAGE: Self = Self {
        minify: false,
        strip_class: None,
    };

    /// Minified config (whitespace-only text dropped).
    pub const MINIFIED: Self = Self {
        minify: true,
        strip_class: None,
    };

    /// Create a new config.
    pub fn new(minify: bool) -> Self {
        Self {
            minify,
            strip_class: None,
        }
    }

    /// Strip a class token from rendered elements.
    pub fn with_strip_class(mut self, class: impl Into<String>) -> Self {
        self.strip_class = Some(class.into());
        self
    }
}

// =============================================================================
// Document Rendering
// =============================================================================

/// Render a document to HTML bytes.
pub fn render_document_bytes(doc: &Document, config: &RenderConfig) -> Vec<u8> {
    render_document(doc, config).into_bytes()
}

/// Render a document to HTML string.
pub fn render_document(doc: &Document, config: &RenderConfig) -> String {
    render_element(&doc.root, config)
}

/// Render a single element (and its subtree) to HTML string.
pub fn render_element(elem: &Element, config: &RenderConfig) -> String {
    let mut output = String::new();
    write_element(elem, config, &mut output);
    output
}

fn write_element(elem: &Element, config: &RenderConfig, output: &mut String) {
    output.push('<');
    output.push_str(&elem.tag);

    write_attrs(&elem.attrs, config, output);

    // Void elements
    if is_void_element(&elem.tag) {
        output.push_str(" />");
        return;
    }

    output.push('>');

    for child in &elem.children {
        write_node(child, config, output);
    }

    output.push_str("</");
    output.push_str(&elem.tag);
    output.push('>');
}

fn write_node(node: &Node, config: &RenderConfig, output: &mut String) {
    match node {
        Node::Element(elem) => write_element(elem, config, output),
        Node::Text(text) => {
            if config.minify && !text.is_raw() && text.is_whitespace() {
                return;
            }
            if text.is_raw() {
                output.push_str(&text.content);
            } else {
                output.push_str(&escape_html(&text.content));
            }
        }
    }
}

fn write_attrs(attrs: &Attrs, config: &RenderConfig, output: &mut String) {
    for (name, value) in attrs.iter() {
        let value = match (&config.strip_class, name.as_str()) {
            (Some(strip), "class") => {
                let rest = join_classes(attrs.classes(), strip);
                if rest.is_empty() {
                    continue;
                }
                rest
            }
            _ => value.clone(),
        };
        output.push(' ');
        output.push_str(name);
        output.push_str("=\"");
        output.push_str(&escape_attr(&value));
        output.push('"');
    }
}

/// Escape HTML special characters.
pub(crate) fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape attribute value special characters.
pub(crate) fn escape_attr(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '"' => result.push_str("&quot;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}

/// Check if element is a void element (self-closing).
fn is_void_element(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_simple_element() {
        let doc = Document::new(
            Element::new("p")
                .with_class("lead")
                .text("a < b")
                .child(Element::new("br")),
        );

        let html = render_document(&doc, &RenderConfig::default());
        assert_eq!(html, "<p class=\"lead\">a &lt; b<br /></p>");
    }

    #[test]
    fn test_render_raw_text_unescaped() {
        let mut span = Element::new("span").with_class("arithmatex").text(r"\(x\)");
        span.set_raw_html("<span class=\"katex\">x</span>");

        let html = render_element(&span, &RenderConfig::PAGE);
        assert_eq!(
            html,
            "<span class=\"arithmatex\"><span class=\"katex\">x</span></span>"
        );
    }

    #[test]
    fn test_strip_class() {
        let elem = Element::new("div")
            .child(Element::new("span").with_class("arithmatex"))
            .child(Element::new("span").with_class("arithmatex").with_class("wide"));

        let config = RenderConfig::PAGE.with_strip_class("arithmatex");
        let html = render_element(&elem, &config);
        assert_eq!(html, "<div><span></span><span class=\"wide\"></span></div>");
    }

    #[test]
    fn test_minify_drops_whitespace_text() {
        let elem = Element::new("ul")
            .text("\n  ")
            .child(Element::new("li").text("x"))
            .text("\n");

        assert_eq!(render_element(&elem, &RenderConfig::MINIFIED), "<ul><li>x</li></ul>");
        assert_eq!(
            render_document_bytes(&Document::new(elem), &RenderConfig::new(false)),
            b"<ul>\n  <li>x</li>\n</ul>".to_vec()
        );
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<script>"), "&lt;script&gt;");
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(escape_attr("say \"hi\""), "say &quot;hi&quot;");
    }
}
