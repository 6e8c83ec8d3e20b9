use crate::{
    document::{MarkdownDocument, RedcarpetDocument},
    options::{ConverterOptions, OptionMapping},
    runtime::{ProcessRuntime, ScriptHost},
    template::{HtmlTemplate, Template},
};

/// A markdown-to-HTML backend.
pub trait MarkdownConverter {
    fn create_document(&self, text: &str, options: ConverterOptions)
    -> Box<dyn MarkdownDocument>;

    /// Render `document` to HTML, or an empty string when `document` was
    /// not created by this converter or rendering fails.
    fn render_as_html(&self, document: &dyn MarkdownDocument) -> String;

    /// Render the table of contents of `document`, with the same empty
    /// string fallback as [`MarkdownConverter::render_as_html`].
    fn render_as_table_of_contents(&self, document: &dyn MarkdownDocument) -> String;

    fn template_renderer(&self) -> &dyn Template;

    /// Options this converter reads; every other bit is ignored.
    fn supported_options(&self) -> ConverterOptions;
}

/// Converter backed by the Redcarpet library running in the embedded
/// runtime.
#[derive(Debug, Default)]
pub struct RedcarpetConverter<H = ProcessRuntime> {
    host: H,
    template: HtmlTemplate,
}

impl RedcarpetConverter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<H: ScriptHost> RedcarpetConverter<H> {
    pub const SUPPORTED_OPTIONS: ConverterOptions = ConverterOptions::NO_SMARTYPANTS
        .union(ConverterOptions::NO_SUPERSCRIPT)
        .union(ConverterOptions::NO_TABLES)
        .union(ConverterOptions::NO_STRIKETHROUGH)
        .union(ConverterOptions::AUTOLINK)
        .union(ConverterOptions::EXTRA_FOOTNOTES)
        .union(ConverterOptions::NO_HTML)
        .union(ConverterOptions::NO_IMAGES)
        .union(ConverterOptions::NO_LINKS)
        .union(ConverterOptions::TABLE_OF_CONTENTS)
        .union(ConverterOptions::NO_STYLES);

    /// Converter evaluating through `host` instead of the process runtime.
    #[must_use]
    pub fn with_host(host: H) -> Self {
        Self {
            host,
            template: HtmlTemplate::default(),
        }
    }

    #[must_use]
    pub fn with_template(mut self, template: HtmlTemplate) -> Self {
        self.template = template;
        self
    }

    pub const fn host(&self) -> &H {
        &self.host
    }

    /// Build the document directly, without boxing.
    #[must_use]
    pub fn document(&self, text: &str, options: ConverterOptions) -> RedcarpetDocument {
        RedcarpetDocument::new(
            text,
            !options.contains(ConverterOptions::NO_SMARTYPANTS),
            markdown_extensions(options),
            renderer_options(options),
        )
    }
}

impl<H: ScriptHost> MarkdownConverter for RedcarpetConverter<H> {
    fn create_document(
        &self,
        text: &str,
        options: ConverterOptions,
    ) -> Box<dyn MarkdownDocument> {
        Box::new(self.document(text, options))
    }

    fn render_as_html(&self, document: &dyn MarkdownDocument) -> String {
        document
            .as_any()
            .downcast_ref::<RedcarpetDocument>()
            .map(|doc| doc.render_html(&self.host))
            .unwrap_or_default()
    }

    fn render_as_table_of_contents(&self, document: &dyn MarkdownDocument) -> String {
        document
            .as_any()
            .downcast_ref::<RedcarpetDocument>()
            .map(|doc| doc.render_table_of_contents(&self.host))
            .unwrap_or_default()
    }

    fn template_renderer(&self) -> &dyn Template {
        &self.template
    }

    fn supported_options(&self) -> ConverterOptions {
        Self::SUPPORTED_OPTIONS
    }
}

/// Parser extensions handed to `Redcarpet.Markdown`.
#[must_use]
pub fn markdown_extensions(options: ConverterOptions) -> OptionMapping {
    OptionMapping::new()
        .with(
            "superscript",
            !options.contains(ConverterOptions::NO_SUPERSCRIPT),
        )
        .with("tables", !options.contains(ConverterOptions::NO_TABLES))
        .with(
            "strikethrough",
            !options.contains(ConverterOptions::NO_STRIKETHROUGH),
        )
        .with("autolink", options.contains(ConverterOptions::AUTOLINK))
        .with(
            "footnotes",
            options.contains(ConverterOptions::EXTRA_FOOTNOTES),
        )
}

/// Options handed to the renderer constructor.
#[must_use]
pub fn renderer_options(options: ConverterOptions) -> OptionMapping {
    let no_html = options.contains(ConverterOptions::NO_HTML);
    OptionMapping::new()
        .with("filter_html", no_html)
        .with("escape_html", no_html)
        .with("no_images", options.contains(ConverterOptions::NO_IMAGES))
        .with("no_links", options.contains(ConverterOptions::NO_LINKS))
        .with(
            "with_toc_data",
            options.contains(ConverterOptions::TABLE_OF_CONTENTS),
        )
        .with("no_styles", options.contains(ConverterOptions::NO_STYLES))
}
