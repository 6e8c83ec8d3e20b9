use std::fmt::Write as _;

/// Wraps rendered HTML into a complete document.
pub trait Template {
    fn render(&self, body: &str, toc: Option<&str>) -> String;
}

/// Minimal HTML5 page with an optional navigation block for the table of
/// contents.
#[derive(Clone, Debug)]
pub struct HtmlTemplate {
    title: String,
}

impl HtmlTemplate {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }
}

impl Default for HtmlTemplate {
    fn default() -> Self {
        Self::new("Document")
    }
}

impl Template for HtmlTemplate {
    fn render(&self, body: &str, toc: Option<&str>) -> String {
        let mut page = String::with_capacity(body.len() + toc.map_or(0, str::len) + 256);
        let _ = write!(
            page,
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n",
            escape_html(&self.title)
        );
        if let Some(toc) = toc.filter(|t| !t.is_empty()) {
            let _ = write!(page, "<nav>\n{toc}</nav>\n");
        }
        page.push_str(body);
        page.push_str("</body>\n</html>\n");
        page
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{HtmlTemplate, Template};

    #[test]
    fn wraps_body() {
        let page = HtmlTemplate::default().render("<p>hi</p>\n", None);
        assert!(page.starts_with("<!DOCTYPE html>\n"));
        assert!(page.contains("<title>Document</title>"));
        assert!(page.contains("<body>\n<p>hi</p>\n</body>"));
        assert!(!page.contains("<nav>"));
    }

    #[test]
    fn escapes_title() {
        let template = HtmlTemplate::new("A & <B>");
        assert_eq!(template.title(), "A & <B>");
        let page = template.render("", None);
        assert!(page.contains("<title>A &amp; &lt;B&gt;</title>"));
    }

    #[test]
    fn toc_goes_before_body() {
        let page = HtmlTemplate::new("t")
            .render("<h1 id=\"a\">A</h1>\n", Some("<ul><li>A</li></ul>\n"));
        let nav = page.find("<nav>").unwrap_or(usize::MAX);
        let body = page.find("<h1").unwrap_or(0);
        assert!(nav < body);

        let page = HtmlTemplate::new("t").render("<p>x</p>", Some(""));
        assert!(!page.contains("<nav>"));
    }
}
