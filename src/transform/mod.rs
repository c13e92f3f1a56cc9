//! Document transforms.
//!
//! # Module Structure
//!
//! - `Transform` - Core trait for document transforms
//! - `IdentityTransform`, `StripClass` - Small built-in transforms
//! - `Pipeline` - Synchronous document processing pipeline
//!
//! With `async` feature:
//! - `AsyncPipeline` - Queues transforms until the page's ready signal fires
//!
//! `MathAnnotator` is itself a `Transform` (it treats the page as ready).
//!
//! # Example
//!
//! ```ignore
//! use tola_math::transform::{Pipeline, StripClass};
//!
//! let doc = Pipeline::new(doc)
//!     .pipe(annotator)
//!     .pipe(StripClass::new("arithmatex"))
//!     .into_inner();
//!
//! // Deferred until the page is ready:
//! let doc = Pipeline::new(doc)
//!     .into_async(ready)
//!     .pipe(annotator)
//!     .finish()
//!     .await;
//! ```

mod core;
mod pipeline;

// Always available
pub use self::core::{IdentityTransform, StripClass, Transform};
pub use pipeline::Pipeline;

// Async feature
#[cfg(feature = "async")]
pub use pipeline::AsyncPipeline;


// =============================================================================
// Async Pipeline Tests
// =============================================================================
