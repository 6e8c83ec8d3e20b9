use std::any::Any;

use tracing::debug;

use crate::{
    options::OptionMapping,
    runtime::ScriptHost,
    script::{self, Renderer},
};

/// A document produced by some converter.
///
/// Converters narrow a `&dyn MarkdownDocument` back to their own document
/// type through [`MarkdownDocument::as_any`].
pub trait MarkdownDocument: Any {
    fn as_any(&self) -> &dyn Any;
}

/// Markdown content bound to the Redcarpet options of one conversion.
#[derive(Clone, Debug)]
pub struct RedcarpetDocument {
    content: String,
    escaped: String,
    smarty_pants: bool,
    extensions: OptionMapping,
    renderer_options: OptionMapping,
}

impl RedcarpetDocument {
    #[must_use]
    pub fn new(
        content: impl Into<String>,
        smarty_pants: bool,
        extensions: OptionMapping,
        renderer_options: OptionMapping,
    ) -> Self {
        let content = content.into();
        let escaped = script::escape(&content);
        let document = Self {
            content,
            escaped,
            smarty_pants,
            extensions,
            renderer_options,
        };
        debug!(
            renderer = document.renderer().class(),
            smarty_pants,
            extensions = %document.extensions,
            options = %document.renderer_options,
            "redcarpet document initialized"
        );
        document
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub const fn smarty_pants(&self) -> bool {
        self.smarty_pants
    }

    #[must_use]
    pub const fn extensions(&self) -> &OptionMapping {
        &self.extensions
    }

    #[must_use]
    pub const fn renderer_options(&self) -> &OptionMapping {
        &self.renderer_options
    }

    #[must_use]
    pub const fn renderer(&self) -> Renderer {
        Renderer::for_html(self.smarty_pants)
    }

    /// Render the document body. Empty on empty content or any failure.
    pub fn render_html(&self, host: &impl ScriptHost) -> String {
        self.evaluate(host, self.renderer())
    }

    /// Render the table of contents. Smarty-pants never applies here.
    pub fn render_table_of_contents(&self, host: &impl ScriptHost) -> String {
        self.evaluate(host, Renderer::TableOfContents)
    }

    fn evaluate(&self, host: &impl ScriptHost, renderer: Renderer) -> String {
        let Some(script) = script::render(
            renderer,
            &self.renderer_options,
            &self.extensions,
            &self.escaped,
        ) else {
            return String::new();
        };
        host.evaluate(&script)
            .map(crate::Value::into_string)
            .unwrap_or_default()
    }
}

impl MarkdownDocument for RedcarpetDocument {
    fn as_any(&self) -> &dyn Any {
        self
    }
}
