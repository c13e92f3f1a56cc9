//! tola-math - Typeset math nodes of a rendered page once it is ready
//!
//! ## Core Concepts
//!
//! **Math nodes**: elements carrying a marker class (default `arithmatex`)
//! whose text is TeX wrapped in `\( ... \)` (inline) or `\[ ... \]` (block).
//!
//! **Injected renderer**: typesetting is delegated to a [`MathRenderer`]
//! passed in at construction. A page without one is simply left alone.
//!
//! **Ready signal**: annotation waits on a one-shot [`ReadySignal`] that the
//! host fires from either `DOMContentLoaded` or a `readystatechange` to
//! `interactive`.
//!
//! ## Modules
//! - `node`: Document/Element/Node/Text page tree
//! - `attr`: Attribute and class helpers
//! - `math`: Delimiter recognition and the renderer seam
//! - `annotator`: The math annotator and its host adapter
//! - `ready`: Ready signal and trigger
//! - `transform`: Transform trait and pipelines
//! - `render`: HTML output
//!
//! ## Usage
//!
//! ```ignore
//! use tola_math::prelude::*;
//!
//! let (trigger, ready) = ReadySignal::pair();
//! let mut annotator = MathAnnotator::with_renderer(KatexRenderer::new()?);
//!
//! // host adapter fires when the page structure is parsed
//! trigger.content_loaded();
//!
//! let outcome = annotator.run(ready, &mut doc).await;
//! let html = render_document(&doc, &RenderConfig::PAGE);
//! ```

mod macros;

/// Node types: Document, Element, Node, Text
pub mod node;

/// Attribute types
pub mod attr;

/// Delimiter recognition and renderer seam
pub mod math;

/// Math annotator
pub mod annotator;

/// Ready signal
pub mod ready;

/// Document transforms and pipelines
pub mod transform;

/// HTML rendering
pub mod render;

/// Error types
pub mod error;

/// Prelude for common imports
pub mod prelude;

// =============================================================================
// Re-exports
// =============================================================================

// Node types
pub use node::{Children, Document, Element, MathNodeInfo, Node, NodePath, Text, TextKind};

// Attribute types
pub use attr::{Attrs, AttrsExt};

// Math
pub use math::{render_fn, DisplayMode, MathExpr, MathRenderer, RenderFn, RenderOptions};

#[cfg(feature = "katex")]
pub use math::KatexRenderer;

// Annotator
pub use annotator::{
    AnnotateConfig, AnnotateStats, AnnotatorState, MathAnnotator, MathHost, NoRenderer, Outcome,
    DEFAULT_MARKER_CLASS,
};

// Ready signal
pub use ready::{ReadySignal, ReadyState, ReadyTrigger};

// Transform
pub use transform::{IdentityTransform, Pipeline, StripClass, Transform};

#[cfg(feature = "async")]
pub use transform::AsyncPipeline;

// Render
pub use render::{render_document, render_document_bytes, render_element, RenderConfig};

// Error types
pub use error::{MathError, MathResult};

// =============================================================================
// Tests
// =============================================================================
