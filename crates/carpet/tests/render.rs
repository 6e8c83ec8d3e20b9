// End-to-end rendering through the process runtime with a stand-in
// Redcarpet library on the load path. One test: the runtime is bound to the
// thread that first uses it.

use std::{path::Path, thread};

use anyhow::{Context, Result};
use carpet::{
    ConverterOptions, MarkdownConverter, RedcarpetConverter, RuntimeConfig, RuntimeHost,
    ScriptHost, Template, Value,
};

fn fixtures() -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

#[test]
fn converter_renders_through_runtime() -> Result<()> {
    RuntimeHost::configure(RuntimeConfig::minimal().load_path(fixtures()))
        .context("configure before first use")?;
    let converter = RedcarpetConverter::new();

    // Empty input never bootstraps the runtime.
    let empty = converter.create_document("", ConverterOptions::NONE);
    assert_eq!(converter.render_as_html(empty.as_ref()), "");

    let doc = converter.create_document("# Title", ConverterOptions::NONE);
    let html = converter.render_as_html(doc.as_ref());
    assert_eq!(
        html,
        "<div data-renderer=\"smarty\" data-options=\"\" \
         data-extensions=\"strikethrough superscript tables\"># Title</div>"
    );
    let host = RuntimeHost::acquire();
    assert_eq!(host.evaluation_count(), 1);

    // The library was loaded by the first render.
    assert_eq!(host.evaluate("require('redcarpet')")?, Value::Bool(false));

    let flags = ConverterOptions::NO_SMARTYPANTS
        | ConverterOptions::NO_HTML
        | ConverterOptions::TABLE_OF_CONTENTS
        | ConverterOptions::AUTOLINK
        | ConverterOptions::NO_TABLES;
    let doc = converter.create_document("x", flags);
    assert_eq!(
        converter.render_as_html(doc.as_ref()),
        "<div data-renderer=\"html\" data-options=\"escape_html filter_html with_toc_data\" \
         data-extensions=\"autolink strikethrough superscript\">x</div>"
    );

    // Content survives escaping byte for byte.
    let text = "say \"hi\"\r\n\\n is literal\n\ttab é\0nul";
    let doc = converter.create_document(text, ConverterOptions::NO_SMARTYPANTS);
    let html = converter.render_as_html(doc.as_ref());
    assert!(html.ends_with(&format!(">{text}</div>")), "{html}");

    // The table of contents ignores smarty-pants.
    let smart = converter.create_document("# A\n## B", ConverterOptions::TABLE_OF_CONTENTS);
    let plain = converter.create_document(
        "# A\n## B",
        ConverterOptions::TABLE_OF_CONTENTS | ConverterOptions::NO_SMARTYPANTS,
    );
    let toc = converter.render_as_table_of_contents(smart.as_ref());
    assert!(toc.starts_with("<div data-renderer=\"toc\""), "{toc}");
    assert_eq!(toc, converter.render_as_table_of_contents(plain.as_ref()));

    // Library exceptions degrade to empty output and leave the engine usable.
    let failing = converter.create_document("@raise", ConverterOptions::NONE);
    assert_eq!(converter.render_as_html(failing.as_ref()), "");
    assert!(!converter.render_as_html(doc.as_ref()).is_empty());

    let page = converter
        .template_renderer()
        .render(&converter.render_as_html(smart.as_ref()), Some(&toc));
    assert!(page.contains("<nav>"));

    // Documents rendered from another thread come back empty.
    let count = host.evaluation_count();
    let from_worker = thread::spawn(|| {
        let converter = RedcarpetConverter::new();
        let doc = converter.create_document("# Title", ConverterOptions::NONE);
        (
            converter.render_as_html(doc.as_ref()),
            converter.render_as_table_of_contents(doc.as_ref()),
        )
    })
    .join()
    .expect("worker thread panicked");
    assert_eq!(from_worker, (String::new(), String::new()));
    assert_eq!(host.evaluation_count(), count);
    Ok(())
}
