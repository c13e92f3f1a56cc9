//! KaTeX-backed renderer (feature `katex`).
//!
//! Typesets through the `katex` crate's embedded JS engine and stores the
//! resulting markup as a raw text node. KaTeX runs with `throw_on_error(false)`
//! so bad TeX comes back as its own `<span class="katex-error">` token. The
//! same token is built here when the engine itself fails.

use ::katex::{Opts, OptsBuilder, OutputType};

use crate::error::{MathError, MathResult};
use crate::node::Element;
use crate::render::{escape_attr, escape_html};

use super::{MathRenderer, RenderOptions};

/// Class KaTeX puts on its inline error tokens.
pub const ERROR_CLASS: &str = "katex-error";

/// Renderer backed by KaTeX
pub struct KatexRenderer {
    inline: Opts,
    block: Opts,
}

impl KatexRenderer {
    /// Build inline and block option sets up front.
    pub fn new() -> MathResult<Self> {
        Ok(Self {
            inline: build_opts(false)?,
            block: build_opts(true)?,
        })
    }

    /// Typeset to an HTML string.
    pub fn render_to_string(&self, tex: &str, opts: &RenderOptions) -> MathResult<String> {
        let katex_opts = if opts.display_mode { &self.block } else { &self.inline };
        ::katex::render_with_opts(tex, katex_opts).map_err(MathError::renderer)
    }
}

fn build_opts(display_mode: bool) -> MathResult<Opts> {
    let mut builder = OptsBuilder::default();
    builder.display_mode(display_mode);
    builder.output_type(OutputType::Html);
    builder.throw_on_error(false);
    builder.build().map_err(MathError::renderer)
}

/// Stand-in for KaTeX's error token, used when the engine call fails.
pub fn error_token(tex: &str, err: &MathError) -> String {
    format!(
        "<span class=\"{ERROR_CLASS}\" title=\"{}\">{}</span>",
        escape_attr(&err.to_string()),
        escape_html(tex)
    )
}

impl MathRenderer for KatexRenderer {
    fn render(&self, tex: &str, target: &mut Element, opts: &RenderOptions) {
        match self.render_to_string(tex, opts) {
            Ok(html) => target.set_raw_html(html),
            Err(err) => {
                log::warn!("KaTeX failed on {tex:?} ({} mode): {err}", opts.mode());
                target.set_raw_html(error_token(tex, &err));
            }
        }
    }
}
