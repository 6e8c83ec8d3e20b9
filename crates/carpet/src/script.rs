//! Builds the script text that drives the markdown library inside the
//! embedded runtime.

use std::fmt::Write as _;

use crate::options::OptionMapping;

/// Library name passed to `require`, resolved against the runtime load path.
pub const LIBRARY: &str = "redcarpet";

/// Renderer classes exposed by the library.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Renderer {
    Html,
    SmartyHtml,
    TableOfContents,
}

impl Renderer {
    #[must_use]
    pub const fn class(self) -> &'static str {
        match self {
            Self::Html => "Redcarpet.Render.HTML",
            Self::SmartyHtml => "Redcarpet.Render.SmartyHTML",
            Self::TableOfContents => "Redcarpet.Render.HTML_TOC",
        }
    }

    /// Renderer used for HTML output.
    #[must_use]
    pub const fn for_html(smarty_pants: bool) -> Self {
        if smarty_pants {
            Self::SmartyHtml
        } else {
            Self::Html
        }
    }
}

/// Escape `content` so it can sit between double quotes in a script.
///
/// Only the characters that can end or corrupt a double-quoted literal are
/// touched: backslash, double quote, line feed, carriage return and NUL. The
/// engine takes script text as a C string and rejects a raw NUL.
#[must_use]
pub fn escape(content: &str) -> String {
    let mut out = String::with_capacity(content.len() + content.len() / 8);
    for c in content.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\u0000"),
            c => out.push(c),
        }
    }
    out
}

/// Script rendering `escaped` with `renderer`.
///
/// Returns `None` for empty content so callers can skip the runtime
/// entirely.
#[must_use]
pub fn render(
    renderer: Renderer,
    renderer_options: &OptionMapping,
    extensions: &OptionMapping,
    escaped: &str,
) -> Option<String> {
    if escaped.is_empty() {
        return None;
    }

    let mut script = String::with_capacity(escaped.len() + 256);
    // Writing into a String cannot fail.
    let _ = write!(
        script,
        "require(\"{LIBRARY}\");\n\
         var markdown = new Redcarpet.Markdown(new {class}({{{renderer_options}}}), {{{extensions}}});\n\
         markdown.render(\"{escaped}\");\n",
        class = renderer.class(),
    );
    Some(script)
}

#[cfg(test)]
mod tests {
    use super::{Renderer, escape, render};
    use crate::options::OptionMapping;

    fn unescape(escaped: &str) -> String {
        let mut out = String::with_capacity(escaped.len());
        let mut chars = escaped.chars();
        while let Some(c) = chars.next() {
            if c != '\\' {
                out.push(c);
                continue;
            }
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('r') => out.push('\r'),
                Some('u') => {
                    let hex: String = chars.by_ref().take(4).collect();
                    let code = u32::from_str_radix(&hex, 16).unwrap_or(u32::MAX);
                    out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
                }
                Some(c) => out.push(c),
                None => out.push('\\'),
            }
        }
        out
    }

    /// True when no unescaped `"` appears, so the literal cannot end early.
    fn literal_is_closed(escaped: &str) -> bool {
        let mut chars = escaped.chars();
        while let Some(c) = chars.next() {
            match c {
                '\\' => {
                    chars.next();
                }
                '"' | '\n' | '\r' | '\0' => return false,
                _ => {}
            }
        }
        true
    }

    #[test]
    fn escape_quotes_and_newlines() {
        assert_eq!(escape("say \"hi\"\nbye"), "say \\\"hi\\\"\\nbye");
        assert_eq!(escape("a\r\nb"), "a\\r\\nb");
    }

    #[test]
    fn escape_nul() {
        assert_eq!(escape("a\0b"), "a\\u0000b");
        assert_eq!(escape("\0001"), "\\u0000001");
        assert!(!escape("x\0y\0").contains('\0'));
    }

    #[test]
    fn escape_backslash_before_quote() {
        assert_eq!(escape("C:\\path\\\"x"), "C:\\\\path\\\\\\\"x");
        assert!(literal_is_closed(&escape("trailing \\")));
        assert!(literal_is_closed(&escape("\\\"")));
    }

    #[test]
    fn escape_leaves_other_characters() {
        let text = "tab\there é ✓ <b>&amp;</b> 'single' \u{7}";
        assert_eq!(escape(text), text);
    }

    #[test]
    fn escape_round_trips() {
        for text in [
            "",
            "plain",
            "\"quoted\"",
            "line\nline\n",
            "\\n is not a newline",
            "mixed \"\\\"\r\n\"",
            "nul \0 inside\0",
            "\0\\0",
            "\\u0000 stays literal",
            "# Title\n\n> \"quote\"\n\n```\ncode \\ here\n```",
        ] {
            let escaped = escape(text);
            assert!(literal_is_closed(&escaped), "unterminated: {escaped}");
            assert_eq!(unescape(&escaped), text);
        }
    }

    #[test]
    fn html_script_shape() {
        let renderer_options = OptionMapping::new()
            .with("filter_html", true)
            .with("no_links", false);
        let extensions = OptionMapping::new().with("tables", true);
        let script = render(
            Renderer::Html,
            &renderer_options,
            &extensions,
            &escape("# Hi \"there\"\n"),
        );

        assert_eq!(
            script.as_deref(),
            Some(
                "require(\"redcarpet\");\n\
                 var markdown = new Redcarpet.Markdown(new Redcarpet.Render.HTML({filter_html: true, no_links: false}), {tables: true});\n\
                 markdown.render(\"# Hi \\\"there\\\"\\n\");\n"
            )
        );
    }

    #[test]
    fn renderer_selection() {
        assert_eq!(Renderer::for_html(true), Renderer::SmartyHtml);
        assert_eq!(Renderer::for_html(false), Renderer::Html);

        let script = render(
            Renderer::TableOfContents,
            &OptionMapping::new(),
            &OptionMapping::new(),
            "x",
        )
        .unwrap_or_default();
        assert!(script.contains("new Redcarpet.Render.HTML_TOC({})"));
    }

    #[test]
    fn empty_content_builds_nothing() {
        let mapping = OptionMapping::new().with("tables", true);
        assert_eq!(render(Renderer::Html, &mapping, &mapping, ""), None);
        assert_eq!(render(Renderer::TableOfContents, &mapping, &mapping, ""), None);
    }
}
