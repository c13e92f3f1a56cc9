//! Document processing pipelines.
//!
//! - `Pipeline`: Synchronous pipeline for transforms (always available)
//! - `AsyncPipeline`: Defers transforms until the page is ready (requires `async` feature)

use crate::node::Document;

use super::Transform;

// =============================================================================
// Pipeline (always available)
// =============================================================================

/// Synchronous pipeline for document processing.
///
/// Wraps a `Document` and provides fluent API for transformations.
///
/// # Example
///
/// ```ignore
/// use tola_math::transform::{Pipeline, StripClass};
///
/// let page = Pipeline::new(doc)
///     .pipe(MathAnnotator::with_renderer(katex))
///     .pipe(StripClass::new("arithmatex"))
///     .into_inner();
/// ```
pub struct Pipeline {
    doc: Document,
}

impl Pipeline {
    /// Create a new pipeline from a document.
    #[inline]
    pub fn new(doc: Document) -> Self {
        Self { doc }
    }

    /// Apply a transform to the document.
    #[inline]
    pub fn pipe<T>(self, transform: T) -> Pipeline
    where
        T: Transform,
    {
        Pipeline {
            doc: transform.transform(self.doc),
        }
    }

    /// Conditionally apply a transform.
    ///
    /// Only applies the transform if `condition` is true.
    #[inline]
    pub fn pipe_if<T>(self, condition: bool, transform: T) -> Pipeline
    where
        T: Transform,
    {
        if condition {
            self.pipe(transform)
        } else {
            self.pipe(super::IdentityTransform)
        }
    }

    /// Inspect the document without consuming the pipeline.
    ///
    /// Useful for logging, debugging, or caching intermediate state.
    #[inline]
    pub fn inspect<F>(self, f: F) -> Self
    where
        F: FnOnce(&Document),
    {
        f(&self.doc);
        self
    }

    /// Tap into the pipeline to extract data while continuing the chain.
    #[inline]
    pub fn tap<F, R>(self, f: F) -> (Self, R)
    where
        F: FnOnce(&Document) -> R,
    {
        let result = f(&self.doc);
        (self, result)
    }

    /// Get a reference to the underlying document.
    #[inline]
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Get a mutable reference to the underlying document.
    #[inline]
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    /// Consume the pipeline and return the document.
    #[inline]
    pub fn into_inner(self) -> Document {
        self.doc
    }

    /// Convert to an async pipeline gated on `ready`.
    #[cfg(feature = "async")]
    #[inline]
    pub fn into_async(self, ready: crate::ready::ReadySignal) -> AsyncPipeline {
        AsyncPipeline::from_pipeline(self, ready)
    }
}

impl From<Document> for Pipeline {
    #[inline]
    fn from(doc: Document) -> Self {
        Self::new(doc)
    }
}

impl From<Pipeline> for Document {
    #[inline]
    fn from(pipeline: Pipeline) -> Self {
        pipeline.into_inner()
    }
}

// =============================================================================
// AsyncPipeline (async feature)
// =============================================================================

#[cfg(feature = "async")]
mod async_impl {
    use crate::node::Document;
    use crate::ready::ReadySignal;

    use super::super::Transform;
    use super::Pipeline;

    type Deferred = Box<dyn FnOnce(Document) -> Document + Send>;

    /// Pipeline whose transforms run only once the page is ready.
    ///
    /// Transforms added with [`pipe`](Self::pipe) are queued; nothing touches
    /// the document until [`finish`](Self::finish) has seen the ready signal.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let (trigger, ready) = ReadySignal::pair();
    ///
    /// let pending = Pipeline::new(doc)
    ///     .into_async(ready)
    ///     .pipe(MathAnnotator::with_renderer(katex));
    ///
    /// trigger.content_loaded();
    /// let doc = pending.finish().await;
    /// ```
    pub struct AsyncPipeline {
        inner: Pipeline,
        ready: ReadySignal,
        deferred: Vec<Deferred>,
    }

    impl AsyncPipeline {
        /// Create a new async pipeline from a document.
        #[inline]
        pub fn new(doc: Document, ready: ReadySignal) -> Self {
            Self::from_pipeline(Pipeline::new(doc), ready)
        }

        /// Create from an existing pipeline.
        #[inline]
        pub fn from_pipeline(pipeline: Pipeline, ready: ReadySignal) -> Self {
            Self {
                inner: pipeline,
                ready,
                deferred: Vec::new(),
            }
        }

        /// Queue a transform to run once the page is ready.
        pub fn pipe<T>(mut self, transform: T) -> Self
        where
            T: Transform + Send + 'static,
        {
            self.deferred.push(Box::new(move |doc| transform.transform(doc)));
            self
        }

        /// Conditionally queue a transform.
        #[inline]
        pub fn pipe_if<T>(self, condition: bool, transform: T) -> Self
        where
            T: Transform + Send + 'static,
        {
            if condition { self.pipe(transform) } else { self }
        }

        /// Whether the ready signal has fired.
        #[inline]
        pub fn is_ready(&self) -> bool {
            self.ready.is_ready()
        }

        /// Number of queued transforms.
        #[inline]
        pub fn pending_count(&self) -> usize {
            self.deferred.len()
        }

        /// Get a reference to the (not yet transformed) document.
        #[inline]
        pub fn document(&self) -> &Document {
            self.inner.document()
        }

        /// Wait for the ready signal, then apply queued transforms in order.
        pub async fn finish(self) -> Document {
            self.ready.clone().await;
            self.apply()
        }

        /// Apply queued transforms now if the page is already ready.
        ///
        /// Returns the pipeline unchanged otherwise.
        pub fn try_finish(self) -> Result<Document, Self> {
            if self.ready.is_ready() {
                Ok(self.apply())
            } else {
                Err(self)
            }
        }

        fn apply(self) -> Document {
            log::debug!("page ready, applying {} deferred transform(s)", self.deferred.len());
            self.deferred
                .into_iter()
                .fold(self.inner.into_inner(), |doc, transform| transform(doc))
        }
    }
}

#[cfg(feature = "async")]
pub use async_impl::AsyncPipeline;
