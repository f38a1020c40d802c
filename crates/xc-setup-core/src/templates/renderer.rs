//! Handlebars renderer for project templates.
//!
//! Runs in strict mode, so a `{{variable}}` missing from the context is an
//! error at `init` time instead of an empty string in the generated project.
//! HTML escaping is off: the output is source code and config, and RPC URLs
//! routinely contain `=` and `&`.

use handlebars::Handlebars;
use serde::Serialize;

use crate::error::{Result, XcSetupError};

/// Strict, non-escaping Handlebars renderer.
pub struct TemplateRenderer {
    hbs: Handlebars<'static>,
}

impl TemplateRenderer {
    pub fn new() -> Self {
        let mut hbs = Handlebars::new();
        hbs.set_strict_mode(true);
        hbs.register_escape_fn(handlebars::no_escape);
        Self { hbs }
    }

    /// Render a template string with the given data context.
    pub fn render<T: Serialize>(&self, template: &str, data: &T) -> Result<String> {
        self.hbs
            .render_template(template, data)
            .map_err(|e| XcSetupError::TemplateRender(e.to_string()))
    }
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}
