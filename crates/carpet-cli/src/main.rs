use std::{
    env,
    io::{self, Read, Write},
    path::PathBuf,
};

use anyhow::{Context, Result, anyhow, bail};
use carpet::{
    ConverterOptions, HtmlTemplate, MarkdownConverter, RedcarpetConverter, RuntimeConfig,
    RuntimeHost, Template,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "\
Usage: carpet <task> [FILE] [-o OPTION[,OPTION...]]...

Tasks:
  html   render the document body wrapped in a page
  toc    render the table of contents only
  page   render the body with the table of contents in front

Reads FILE, or stdin when FILE is absent or `-`.
The library is looked up on CARPET_LOAD_PATH.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Task {
    Html,
    Toc,
    Page,
}

#[derive(Debug)]
struct Args {
    task: Task,
    input: Option<PathBuf>,
    options: ConverterOptions,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args> {
    let task = match args.next().as_deref() {
        Some("html") => Task::Html,
        Some("toc") => Task::Toc,
        Some("page") => Task::Page,
        Some(other) => bail!("unknown task `{other}`\n\n{USAGE}"),
        None => bail!("{USAGE}"),
    };

    let mut input = None;
    let mut options = ConverterOptions::NONE;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-o" | "--option" => {
                let value = args
                    .next()
                    .ok_or_else(|| anyhow!("`{arg}` expects an option list"))?;
                options |= value.parse::<ConverterOptions>()?;
            }
            "-" => input = None,
            path if input.is_none() => input = Some(PathBuf::from(path)),
            extra => bail!("unexpected argument `{extra}`\n\n{USAGE}"),
        }
    }

    Ok(Args {
        task,
        input,
        options,
    })
}

fn read_input(input: Option<&PathBuf>) -> Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            Ok(text)
        }
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();
}

fn main() -> Result<()> {
    init_tracing();

    let args = parse_args(env::args().skip(1))?;
    let text = read_input(args.input.as_ref())?;
    RuntimeHost::configure(RuntimeConfig::from_env())?;

    let title = args
        .input
        .as_deref()
        .and_then(|p| p.file_stem())
        .map_or_else(|| "Document".to_string(), |s| s.to_string_lossy().into_owned());
    let converter = RedcarpetConverter::new().with_template(HtmlTemplate::new(title));

    let mut options = args.options;
    if args.task == Task::Page {
        options |= ConverterOptions::TABLE_OF_CONTENTS;
    }
    let unsupported = options.bits() & !converter.supported_options().bits();
    if unsupported != 0 {
        tracing::warn!(bits = unsupported, "ignoring unsupported converter options");
    }

    let document = converter.create_document(&text, options);
    let output = match args.task {
        Task::Html => converter
            .template_renderer()
            .render(&converter.render_as_html(document.as_ref()), None),
        Task::Toc => converter.render_as_table_of_contents(document.as_ref()),
        Task::Page => {
            let toc = converter.render_as_table_of_contents(document.as_ref());
            converter
                .template_renderer()
                .render(&converter.render_as_html(document.as_ref()), Some(&toc))
        }
    };

    let mut stdout = io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use carpet::ConverterOptions;

    use super::{Task, parse_args};

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| (*s).to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn parses_task_file_and_options() -> anyhow::Result<()> {
        let parsed = parse_args(args(&["page", "README.md", "-o", "no-html,autolink", "--option", "toc"]))?;
        assert_eq!(parsed.task, Task::Page);
        assert_eq!(parsed.input, Some(PathBuf::from("README.md")));
        assert_eq!(
            parsed.options,
            ConverterOptions::NO_HTML | ConverterOptions::AUTOLINK | ConverterOptions::TABLE_OF_CONTENTS
        );
        Ok(())
    }

    #[test]
    fn stdin_when_no_file() -> anyhow::Result<()> {
        let parsed = parse_args(args(&["toc", "-"]))?;
        assert_eq!(parsed.task, Task::Toc);
        assert_eq!(parsed.input, None);
        assert!(parsed.options.is_empty());
        Ok(())
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_args(args(&[])).is_err());
        assert!(parse_args(args(&["render"])).is_err());
        assert!(parse_args(args(&["html", "-o"])).is_err());
        assert!(parse_args(args(&["html", "-o", "math"])).is_err());
        assert!(parse_args(args(&["html", "a.md", "b.md"])).is_err());
    }
}
