//! Document type and related utilities
//!
//! The root container for a page tree, with query and traversal APIs.

use std::fmt;

use smallvec::SmallVec;

use crate::math::{node_text, DisplayMode, MathExpr};

use super::{Children, Element, Node};

// =============================================================================
// Document
// =============================================================================

/// Root document container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Root element (typically <html> or a wrapper)
    pub root: Element,
}

impl Document {
    /// Create a new document with a root element
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Query API
    // ─────────────────────────────────────────────────────────────────────────

    /// Find first element matching predicate (depth-first search)
    pub fn find<F>(&self, predicate: F) -> Option<&Element>
    where
        F: Fn(&Element) -> bool,
    {
        self.elements().find(|&e| predicate(e))
    }

    /// Find all elements matching predicate, in document order
    pub fn find_all<F>(&self, predicate: F) -> Vec<&Element>
    where
        F: Fn(&Element) -> bool,
    {
        self.elements().filter(|&e| predicate(e)).collect()
    }

    /// Check if any element matches predicate
    pub fn any<F>(&self, predicate: F) -> bool
    where
        F: Fn(&Element) -> bool,
    {
        self.find(predicate).is_some()
    }

    /// All elements carrying `class`, in document order
    pub fn find_by_class(&self, class: &str) -> Vec<&Element> {
        self.find_all(|e| e.has_class(class))
    }

    /// Count total elements in document
    pub fn element_count(&self) -> usize {
        self.elements().count()
    }

    /// Iterate over all elements (depth-first, document order)
    pub fn elements(&self) -> ElementIterator<'_> {
        ElementIterator::new(&self.root)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Closure-based traversal API
    // ─────────────────────────────────────────────────────────────────────────

    /// Visit all elements with a closure (mutable, pre-order)
    ///
    /// Children are visited after `f` returns, so they reflect its edits.
    pub fn for_each_element_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut Element),
    {
        Self::visit_elements_mut_recursive(&mut self.root, &mut f);
    }

    fn visit_elements_mut_recursive<F>(elem: &mut Element, f: &mut F)
    where
        F: FnMut(&mut Element),
    {
        f(elem);
        for child in &mut elem.children {
            if let Some(child_elem) = child.as_element_mut() {
                Self::visit_elements_mut_recursive(child_elem, f);
            }
        }
    }

    /// Visit every element carrying `class` (mutable, pre-order)
    ///
    /// The set of visited elements is fixed before `f` first runs. Marked
    /// elements that `f` creates are never visited. When `f` replaces the
    /// children of an element, the marked elements it had below are still
    /// visited, as detached copies, the way a static node list keeps
    /// elements that were removed from the page.
    pub fn for_each_class_mut<F>(&mut self, class: &str, mut f: F)
    where
        F: FnMut(&mut Element),
    {
        Self::visit_class_mut_recursive(&mut self.root, class, &mut f);
    }

    fn visit_class_mut_recursive<F>(elem: &mut Element, class: &str, f: &mut F)
    where
        F: FnMut(&mut Element),
    {
        if elem.has_class(class) {
            if !Self::has_class_below(elem, class) {
                f(elem);
                return;
            }
            let before = elem.children.clone();
            f(elem);
            if elem.children != before {
                let mut detached = before;
                Self::visit_children_class_mut(&mut detached, class, f);
                return;
            }
        }
        Self::visit_children_class_mut(&mut elem.children, class, f);
    }

    fn visit_children_class_mut<F>(children: &mut Children, class: &str, f: &mut F)
    where
        F: FnMut(&mut Element),
    {
        for child in children.iter_mut() {
            if let Some(child_elem) = child.as_element_mut() {
                Self::visit_class_mut_recursive(child_elem, class, f);
            }
        }
    }

    fn has_class_below(elem: &Element, class: &str) -> bool {
        ElementIterator::new(elem).skip(1).any(|e| e.has_class(class))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Math inspection
    // ─────────────────────────────────────────────────────────────────────────

    /// Describe every element carrying `class` without touching it
    ///
    /// `mode` is `None` for nodes the annotator would skip.
    pub fn math_nodes(&self, class: &str) -> Vec<MathNodeInfo> {
        let mut out = Vec::new();
        let mut path = NodePath::root();
        Self::collect_math(&self.root, class, &mut path, &mut out);
        out
    }

    fn collect_math(elem: &Element, class: &str, path: &mut NodePath, out: &mut Vec<MathNodeInfo>) {
        if elem.has_class(class) {
            let text = node_text(elem);
            let (mode, tex) = match MathExpr::parse(&text) {
                Some(expr) => (Some(expr.mode), expr.tex.to_string()),
                None => (None, text.clone()),
            };
            out.push(MathNodeInfo {
                path: path.clone(),
                mode,
                tex,
            });
        }
        for (index, child) in elem.children.iter().enumerate() {
            if let Some(child_elem) = child.as_element() {
                path.push(index);
                Self::collect_math(child_elem, class, path, out);
                path.pop();
            }
        }
    }

    /// Collect statistics about the document
    pub fn collect_stats(&self, math_class: &str) -> Stats {
        let mut stats = Stats::default();
        Self::collect_stats_recursive(&self.root, math_class, &mut stats);
        stats
    }

    fn collect_stats_recursive(elem: &Element, math_class: &str, stats: &mut Stats) {
        stats.element_count += 1;
        if elem.has_class(math_class) {
            stats.math_count += 1;
        }

        for child in &elem.children {
            match child {
                Node::Element(e) => Self::collect_stats_recursive(e, math_class, stats),
                Node::Text(t) if t.is_raw() => stats.raw_count += 1,
                Node::Text(_) => stats.text_count += 1,
            }
        }
    }
}

// =============================================================================
// ElementIterator - depth-first element traversal
// =============================================================================

/// Depth-first iterator over elements
pub struct ElementIterator<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> ElementIterator<'a> {
    fn new(root: &'a Element) -> Self {
        Self { stack: vec![root] }
    }
}

impl<'a> Iterator for ElementIterator<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let elem = self.stack.pop()?;
        // Push children in reverse order so they're visited left-to-right
        for child in elem.children.iter().rev() {
            if let Some(child_elem) = child.as_element() {
                self.stack.push(child_elem);
            }
        }
        Some(elem)
    }
}

// =============================================================================
// NodePath - position of a node in the tree
// =============================================================================

/// Child-index path from the root element
///
/// Indices count all child nodes (text included). The root is the empty path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NodePath(SmallVec<[u32; 8]>);

impl NodePath {
    /// Path of the root element
    pub fn root() -> Self {
        Self(SmallVec::new())
    }

    /// Depth below the root
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Raw indices
    pub fn indices(&self) -> &[u32] {
        &self.0
    }

    fn push(&mut self, index: usize) {
        self.0.push(index as u32);
    }

    fn pop(&mut self) {
        self.0.pop();
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for index in &self.0 {
            write!(f, "/{index}")?;
        }
        Ok(())
    }
}

impl<const N: usize> From<[u32; N]> for NodePath {
    fn from(indices: [u32; N]) -> Self {
        Self(indices.into_iter().collect())
    }
}

/// Read-only description of a math-marked element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MathNodeInfo {
    /// Where the element sits in the tree
    pub path: NodePath,
    /// Resolved display mode, `None` when the delimiters are not recognized
    pub mode: Option<DisplayMode>,
    /// Unwrapped TeX source (or the raw text for unrecognized nodes)
    pub tex: String,
}

// =============================================================================
// Stats - document statistics
// =============================================================================

/// Document statistics collected from traversal
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Stats {
    pub element_count: usize,
    pub text_count: usize,
    /// Raw markup nodes (typeset output among them)
    pub raw_count: usize,
    /// Elements carrying the math marker class
    pub math_count: usize,
}

impl Stats {
    /// Check if the page has anything for the annotator to look at
    pub fn has_math(&self) -> bool {
        self.math_count > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        Document::new(
            Element::new("article")
                .child(Element::new("p").text("Let ").child(
                    Element::new("span").with_class("arithmatex").text(r"\(x^2\)"),
                ))
                .child(Element::new("div").with_class("arithmatex").text(r"\[\int f\]"))
                .child(Element::new("span").with_class("arithmatex").text("plain")),
        )
    }

    #[test]
    fn test_math_nodes_paths_and_modes() {
        let doc = sample();
        let nodes = doc.math_nodes("arithmatex");
        assert_eq!(nodes.len(), 3);

        assert_eq!(nodes[0].path, NodePath::from([0, 1]));
        assert_eq!(nodes[0].mode, Some(DisplayMode::Inline));
        assert_eq!(nodes[0].tex, "x^2");

        assert_eq!(nodes[1].path.to_string(), "/1");
        assert_eq!(nodes[1].mode, Some(DisplayMode::Block));
        assert_eq!(nodes[1].tex, r"\int f");

        assert_eq!(nodes[2].mode, None);
        assert_eq!(nodes[2].tex, "plain");
    }

    #[test]
    fn test_for_each_class_mut_in_document_order() {
        let mut doc = sample();
        let mut seen = Vec::new();
        doc.for_each_class_mut("arithmatex", |e| seen.push(e.text_content()));
        assert_eq!(seen, vec![r"\(x^2\)", r"\[\int f\]", "plain"]);
    }

    #[test]
    fn test_for_each_class_mut_skips_created_elements() {
        let mut doc = sample();
        let mut visits = 0;
        doc.for_each_class_mut("arithmatex", |e| {
            visits += 1;
            e.replace_children([Element::new("span").with_class("arithmatex").text(r"\(y\)").into()]);
        });
        assert_eq!(visits, 3);
        assert_eq!(doc.find_by_class("arithmatex").len(), 6);
    }

    #[test]
    fn test_for_each_class_mut_visits_detached_descendants() {
        let mut doc = Document::new(
            Element::new("div").child(
                Element::new("p")
                    .with_class("arithmatex")
                    .text("outer ")
                    .child(Element::new("span").with_class("arithmatex").text("inner")),
            ),
        );
        let mut seen = Vec::new();
        doc.for_each_class_mut("arithmatex", |e| {
            seen.push(e.text_content());
            e.set_raw_html("done");
        });

        assert_eq!(seen, vec!["outer inner", "inner"]);
        assert_eq!(doc.root.text_content(), "done");
        assert_eq!(doc.find_by_class("arithmatex").len(), 1);
    }

    #[test]
    fn test_for_each_class_mut_descends_into_untouched_containers() {
        let mut doc = Document::new(
            Element::new("section")
                .with_class("arithmatex")
                .child(Element::new("span").with_class("arithmatex").text("a")),
        );
        doc.for_each_class_mut("arithmatex", |e| {
            if e.tag == "span" {
                e.set_raw_html("b");
            }
        });
        assert_eq!(doc.root.text_content(), "b");
    }

    #[test]
    fn test_collect_stats() {
        let mut doc = sample();
        let stats = doc.collect_stats("arithmatex");
        assert_eq!(stats.element_count, 5);
        assert_eq!(stats.text_count, 4);
        assert_eq!(stats.math_count, 3);
        assert!(stats.has_math());

        doc.root.set_raw_html("<hr />");
        let stats = doc.collect_stats("arithmatex");
        assert_eq!(stats.element_count, 1);
        assert_eq!(stats.raw_count, 1);
        assert!(!stats.has_math());
    }

    #[test]
    fn test_root_path_display() {
        assert_eq!(NodePath::root().to_string(), "/");
        assert_eq!(NodePath::from([2, 0, 5]).to_string(), "/2/0/5");
        assert_eq!(NodePath::from([2, 0, 5]).depth(), 3);
    }
}
