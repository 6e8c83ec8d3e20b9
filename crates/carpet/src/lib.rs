pub mod converter;
pub mod document;
pub mod error;
pub mod options;
pub mod runtime;
pub mod script;
pub mod template;
pub mod value;

/// `tracing` target for output produced by scripts (`console.*`).
pub const TRACE_TARGET_SCRIPT: &str = "carpet::script";

pub use converter::{MarkdownConverter, RedcarpetConverter};
pub use document::{MarkdownDocument, RedcarpetDocument};
pub use error::{Error, Result};
pub use options::{ConverterOptions, OptionMapping};
pub use runtime::{ProcessRuntime, RuntimeConfig, RuntimeHost, ScriptHost};
pub use template::{HtmlTemplate, Template};
pub use value::Value;
