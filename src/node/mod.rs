//! Page tree node types.
//!
//! This module provides `Element`, `Node`, `Text`, and `Document`: the
//! host document the math annotator scans and the renderer mutates.

mod element;
mod text;
mod document;

pub use element::Element;
pub use text::{Text, TextKind};
pub use document::{Document, ElementIterator, MathNodeInfo, NodePath, Stats};

use smallvec::SmallVec;

use crate::macros::impl_enum_accessors;

/// Node in a page tree - either Element or Text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Box<Element>),
    Text(Text),
}

impl Node {
    // element -> Element, text -> Text
    impl_enum_accessors!(element, text);
}

impl From<Element> for Node {
    fn from(elem: Element) -> Self {
        Node::Element(Box::new(elem))
    }
}

impl From<Text> for Node {
    fn from(text: Text) -> Self {
        Node::Text(text)
    }
}

/// Type alias for children collection.
pub type Children = SmallVec<[Node; 8]>;
