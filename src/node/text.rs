//! Text node type

/// How a text node is emitted when the page is rendered back to HTML
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextKind {
    /// Plain text, HTML-escaped on output
    #[default]
    Normal,
    /// Pre-rendered markup (e.g. typeset math), emitted as-is
    Raw,
}

/// Text content node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text {
    /// Text content
    pub content: String,
    /// Output kind
    pub kind: TextKind,
}

impl Text {
    /// Create a new plain text node
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            kind: TextKind::Normal,
        }
    }

    /// Create a raw markup node
    pub fn raw(html: impl Into<String>) -> Self {
        Self {
            content: html.into(),
            kind: TextKind::Raw,
        }
    }

    /// Check if this node carries raw markup
    pub fn is_raw(&self) -> bool {
        self.kind == TextKind::Raw
    }

    /// Check if text content is empty
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Check if text is only whitespace
    pub fn is_whitespace(&self) -> bool {
        self.content.trim().is_empty()
    }
}
