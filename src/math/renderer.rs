//! The rendering service seam.
//!
//! The annotator never typesets anything itself. It hands each recognized
//! expression to a [`MathRenderer`] together with the target element, and the
//! renderer mutates the element in place.

use std::sync::Arc;

use crate::node::Element;

use super::DisplayMode;

/// Options passed with every render call.
///
/// Only the display mode is chosen by the annotator; every other setting is
/// the renderer's own default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOptions {
    /// `true` for block (display) math, `false` for inline
    pub display_mode: bool,
}

impl RenderOptions {
    /// Options for the given mode
    pub fn new(mode: DisplayMode) -> Self {
        Self {
            display_mode: mode.is_block(),
        }
    }

    /// Mode these options select
    pub fn mode(&self) -> DisplayMode {
        if self.display_mode {
            DisplayMode::Block
        } else {
            DisplayMode::Inline
        }
    }
}

/// Typesets TeX into a page element.
///
/// Rendering cannot fail from the caller's point of view: a renderer that
/// hits bad TeX shows that in the element (typically as an error token)
/// instead of returning an error.
///
/// # Example
///
/// ```ignore
/// struct Verbatim;
///
/// impl MathRenderer for Verbatim {
///     fn render(&self, tex: &str, target: &mut Element, opts: &RenderOptions) {
///         let tag = if opts.display_mode { "pre" } else { "code" };
///         target.replace_children([Element::new(tag).text(tex).into()]);
///     }
/// }
/// ```
pub trait MathRenderer {
    /// Render `tex` into `target`, replacing its presentation.
    fn render(&self, tex: &str, target: &mut Element, opts: &RenderOptions);
}

impl<R: MathRenderer + ?Sized> MathRenderer for &R {
    #[inline]
    fn render(&self, tex: &str, target: &mut Element, opts: &RenderOptions) {
        (**self).render(tex, target, opts)
    }
}

impl<R: MathRenderer + ?Sized> MathRenderer for Box<R> {
    #[inline]
    fn render(&self, tex: &str, target: &mut Element, opts: &RenderOptions) {
        (**self).render(tex, target, opts)
    }
}

impl<R: MathRenderer + ?Sized> MathRenderer for Arc<R> {
    #[inline]
    fn render(&self, tex: &str, target: &mut Element, opts: &RenderOptions) {
        (**self).render(tex, target, opts)
    }
}

// =============================================================================
// RenderFn
// =============================================================================

/// Adapts a closure into a [`MathRenderer`].
#[derive(Debug, Clone, Copy)]
pub struct RenderFn<F>(pub F);

impl<F> MathRenderer for RenderFn<F>
where
    F: Fn(&str, &mut Element, &RenderOptions),
{
    #[inline]
    fn render(&self, tex: &str, target: &mut Element, opts: &RenderOptions) {
        (self.0)(tex, target, opts)
    }
}

/// Wrap a closure as a renderer.
///
/// ```ignore
/// let renderer = render_fn(|tex, elem, _opts| elem.set_raw_html(tex));
/// ```
pub fn render_fn<F>(f: F) -> RenderFn<F>
where
    F: Fn(&str, &mut Element, &RenderOptions),
{
    RenderFn(f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_options_mode_round_trip() {
        assert!(!RenderOptions::new(DisplayMode::Inline).display_mode);
        assert!(RenderOptions::new(DisplayMode::Block).display_mode);
        assert_eq!(RenderOptions { display_mode: true }.mode(), DisplayMode::Block);
        assert_eq!(RenderOptions::default().mode(), DisplayMode::Inline);
    }

    #[test]
    fn test_render_fn_and_forwarding_impls() {
        let renderer = render_fn(|tex: &str, elem: &mut Element, opts: &RenderOptions| {
            elem.set_raw_html(format!("{}:{}", opts.mode(), tex));
        });

        let mut elem = Element::new("span");
        renderer.render("a", &mut elem, &RenderOptions::default());
        assert_eq!(elem.text_content(), "inline:a");

        let boxed: Box<dyn MathRenderer> = Box::new(renderer);
        boxed.render("b", &mut elem, &RenderOptions { display_mode: true });
        assert_eq!(elem.text_content(), "block:b");

        let shared = Arc::new(renderer);
        (&shared).render("c", &mut elem, &RenderOptions::default());
        assert_eq!(elem.text_content(), "inline:c");
    }
}
