//! Prelude module for common imports.
//!
//! ```ignore
//! use tola_math::prelude::*;
//! ```

// Node types
pub use crate::node::{Children, Document, Element, MathNodeInfo, Node, NodePath, Text, TextKind};

// Attributes
pub use crate::attr::{Attrs, AttrsExt};

// Math
pub use crate::math::{render_fn, DisplayMode, MathExpr, MathRenderer, RenderFn, RenderOptions};

#[cfg(feature = "katex")]
pub use crate::math::KatexRenderer;

// Annotator
pub use crate::annotator::{
    AnnotateConfig, AnnotateStats, AnnotatorState, MathAnnotator, MathHost, NoRenderer, Outcome,
    DEFAULT_MARKER_CLASS,
};

// Ready signal
pub use crate::ready::{ReadySignal, ReadyState, ReadyTrigger};

// Transform
pub use crate::transform::{IdentityTransform, Pipeline, StripClass, Transform};

#[cfg(feature = "async")]
pub use crate::transform::AsyncPipeline;

// Render
pub use crate::render::{render_document, render_document_bytes, render_element, RenderConfig};

// Error
pub use crate::error::{MathError, MathResult};
