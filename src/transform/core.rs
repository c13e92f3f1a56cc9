//! Core transform trait.

use crate::node::Document;

/// Transform a document in place of the previous one.
pub trait Transform: Sized {
    /// Transform the document.
    fn transform(self, doc: Document) -> Document;
}

// =============================================================================
// IdentityTransform
// =============================================================================

/// Identity transform that returns the document unchanged.
///
/// Useful for conditional transforms where one branch doesn't need to modify
/// the document.
///
/// # Example
///
/// ```ignore
/// Pipeline::new(doc)
///     .pipe(if has_math { annotator } else { IdentityTransform })
///     .into_inner()
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTransform;

impl Transform for IdentityTransform {
    #[inline]
    fn transform(self, doc: Document) -> Document {
        doc
    }
}

// =============================================================================
// StripClass
// =============================================================================

/// Removes a class token from every element.
///
/// Typically piped after annotation to drop the math marker from the page.
#[derive(Debug, Clone)]
pub struct StripClass {
    class: String,
}

impl StripClass {
    pub fn new(class: impl Into<String>) -> Self {
        Self { class: class.into() }
    }
}

impl Transform for StripClass {
    fn transform(self, mut doc: Document) -> Document {
        doc.for_each_element_mut(|elem| {
            elem.remove_class(&self.class);
        });
        doc
    }
}
