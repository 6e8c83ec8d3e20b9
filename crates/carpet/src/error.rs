use thiserror::Error;

pub type Result<T, E = Error> = core::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
    /// The runtime was touched from a thread other than the one that created it.
    #[error("embedded runtime accessed outside of its home thread")]
    WrongThread,

    /// A script raised an exception inside the embedded runtime.
    #[error("script error: {cause}")]
    Script {
        cause: String,
        stack: Option<String>,
    },

    /// The runtime failed to bootstrap; every evaluation fails with the
    /// bootstrap message.
    #[error("embedded runtime unavailable: {0}")]
    Unavailable(String),

    #[error("embedded runtime is already initialized")]
    AlreadyInitialized,

    #[error("unknown converter option: {0}")]
    UnknownOption(String),

    /// QuickJS engine error outside of script evaluation (allocation, setup).
    #[error("engine error: {0}")]
    Engine(String),
}

impl From<rquickjs::Error> for Error {
    fn from(value: rquickjs::Error) -> Self {
        Self::Engine(value.to_string())
    }
}

impl Error {
    /// Take the pending exception out of `ctx`, leaving the runtime clean.
    pub fn from_js_catch(ctx: &rquickjs::Ctx<'_>) -> Self {
        let caught = ctx.catch();
        caught.as_exception().map_or_else(
            || Self::Script {
                cause: format!("{caught:?}"),
                stack: None,
            },
            |exc| Self::Script {
                cause: exc.message().unwrap_or_default(),
                stack: exc.stack().filter(|s| !s.is_empty()),
            },
        )
    }

    /// Message with the script stack appended, when there is one.
    #[must_use]
    pub fn full_message(&self) -> String {
        match self {
            Self::Script {
                cause,
                stack: Some(stack),
            } => format!("{cause}\n\n{stack}"),
            Self::Script { cause, stack: None } => cause.clone(),
            other => other.to_string(),
        }
    }
}
