//! Math expression recognition.
//!
//! A math node's text is TeX wrapped in one of two delimiter pairs:
//!
//! | Delimiters    | Mode     |
//! |---------------|----------|
//! | `\( ... \)`   | inline   |
//! | `\[ ... \]`   | block    |
//!
//! Anything else is plain text and is left alone.

pub mod renderer;

#[cfg(feature = "katex")]
pub mod katex;

pub use renderer::{render_fn, MathRenderer, RenderFn, RenderOptions};

#[cfg(feature = "katex")]
pub use self::katex::KatexRenderer;

use std::fmt;

use crate::node::Element;

/// Opening delimiter of inline math
pub const INLINE_OPEN: &str = "\\(";
/// Closing delimiter of inline math
pub const INLINE_CLOSE: &str = "\\)";
/// Opening delimiter of block (display) math
pub const BLOCK_OPEN: &str = "\\[";
/// Closing delimiter of block (display) math
pub const BLOCK_CLOSE: &str = "\\]";

// =============================================================================
// DisplayMode
// =============================================================================

/// Whether a formula flows within a line or stands on its own line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayMode {
    Inline,
    Block,
}

impl DisplayMode {
    /// `true` for block (display) math
    #[inline]
    pub fn is_block(self) -> bool {
        self == DisplayMode::Block
    }

    /// Delimiter pair for this mode
    pub fn delimiters(self) -> (&'static str, &'static str) {
        match self {
            DisplayMode::Inline => (INLINE_OPEN, INLINE_CLOSE),
            DisplayMode::Block => (BLOCK_OPEN, BLOCK_CLOSE),
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DisplayMode::Inline => "inline",
            DisplayMode::Block => "block",
        })
    }
}

// =============================================================================
// MathExpr
// =============================================================================

/// TeX source unwrapped from its delimiters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MathExpr<'a> {
    /// TeX between the delimiters
    pub tex: &'a str,
    /// Mode selected by the delimiters
    pub mode: DisplayMode,
}

impl<'a> MathExpr<'a> {
    /// Recognize a delimited expression.
    ///
    /// Inline delimiters are tried first. Text is matched as-is (no trimming);
    /// both delimiters must be present without overlapping.
    pub fn parse(text: &'a str) -> Option<Self> {
        [DisplayMode::Inline, DisplayMode::Block]
            .into_iter()
            .find_map(|mode| {
                let (open, close) = mode.delimiters();
                text.strip_prefix(open)
                    .and_then(|rest| rest.strip_suffix(close))
                    .map(|tex| MathExpr { tex, mode })
            })
    }

    /// Options to hand to a renderer for this expression
    pub fn options(&self) -> RenderOptions {
        RenderOptions::new(self.mode)
    }
}

/// Read a math node's source text.
///
/// Uses the node's text content, falling back to its rendered text when the
/// content is empty.
pub fn node_text(elem: &Element) -> String {
    let text = elem.text_content();
    if text.is_empty() {
        elem.inner_text()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_inline() {
        let expr = MathExpr::parse(r"\(x^2\)").unwrap();
        assert_eq!(expr.tex, "x^2");
        assert_eq!(expr.mode, DisplayMode::Inline);
        assert!(!expr.options().display_mode);
    }

    #[test]
    fn test_parse_block() {
        let expr = MathExpr::parse(r"\[\sum_{i=0}^n i\]").unwrap();
        assert_eq!(expr.tex, r"\sum_{i=0}^n i");
        assert!(expr.mode.is_block());
        assert!(expr.options().display_mode);
    }

    #[test]
    fn test_parse_rejects_undelimited() {
        assert!(MathExpr::parse("hello").is_none());
        assert!(MathExpr::parse("").is_none());
        // Mixed pairs
        assert!(MathExpr::parse(r"\(x\]").is_none());
        assert!(MathExpr::parse(r"\[x\)").is_none());
        // Opening delimiter without a closing one at the very end
        assert!(MathExpr::parse(r"\(x\) and more").is_none());
        // No trimming
        assert!(MathExpr::parse(r" \(x\)").is_none());
        assert!(MathExpr::parse(r"\(x\) ").is_none());
    }

    #[test]
    fn test_parse_needs_non_overlapping_delimiters() {
        assert!(MathExpr::parse(r"\(").is_none());
        assert!(MathExpr::parse(r"\()").is_none());
        let empty = MathExpr::parse(r"\(\)").unwrap();
        assert_eq!(empty.tex, "");
    }

    #[test]
    fn test_parse_keeps_inner_delimiters() {
        let expr = MathExpr::parse(r"\(\text{\(a\)}\)").unwrap();
        assert_eq!(expr.tex, r"\text{\(a\)}");
    }

    #[test]
    fn test_display_mode_display() {
        assert_eq!(DisplayMode::Inline.to_string(), "inline");
        assert_eq!(DisplayMode::Block.to_string(), "block");
    }

    #[test]
    fn test_node_text_falls_back_to_inner_text() {
        let elem = Element::new("span").text(r"\(y\)");
        assert_eq!(node_text(&elem), r"\(y\)");

        let elem = Element::new("span").child(Element::new("br"));
        assert_eq!(node_text(&elem), "\n");
    }
}
