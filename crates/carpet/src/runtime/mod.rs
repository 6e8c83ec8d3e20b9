//! Process-wide embedded QuickJS runtime.
//!
//! QuickJS is neither thread-safe nor reentrant across threads. The first
//! thread to [`RuntimeHost::acquire`] the runtime becomes its home thread:
//! the engine is stored in that thread's local storage, and every
//! evaluation from any other thread is rejected before the engine is looked
//! at. Callers on other threads must move their work to the home thread
//! themselves; nothing here queues or blocks.

mod config;
mod console;
mod loader;

use std::{
    cell::OnceCell,
    sync::{
        Arc, OnceLock,
        atomic::{AtomicU64, Ordering},
    },
    thread::{self, ThreadId},
};

use rquickjs::{Context, Runtime};
use tracing::{error, info, warn};

pub use config::{LOAD_PATH_ENV, MAX_STACK_SIZE_ENV, MEMORY_LIMIT_ENV, RuntimeConfig};

use crate::{
    error::{Error, Result},
    value::Value,
};

/// Something that can evaluate script text and hand back a marshaled value.
pub trait ScriptHost {
    /// # Errors
    /// Returns [`Error::WrongThread`] when called off the home thread,
    /// [`Error::Script`] when the script raises, and [`Error::Engine`] when
    /// the engine fails without a script exception.
    fn evaluate(&self, script: &str) -> Result<Value>;
}

impl<T: ScriptHost + ?Sized> ScriptHost for &T {
    fn evaluate(&self, script: &str) -> Result<Value> {
        (**self).evaluate(script)
    }
}

impl<T: ScriptHost + ?Sized> ScriptHost for Arc<T> {
    fn evaluate(&self, script: &str) -> Result<Value> {
        (**self).evaluate(script)
    }
}

static HOST: OnceLock<RuntimeHost> = OnceLock::new();
static CONFIG: OnceLock<RuntimeConfig> = OnceLock::new();

thread_local! {
    // Set once, on the home thread only. `None` records a failed bootstrap.
    static ENGINE: OnceCell<Option<Engine>> = const { OnceCell::new() };
}

struct Engine {
    context: Context,
    // Dropped after the context.
    _runtime: Runtime,
}

impl Engine {
    fn boot(config: &RuntimeConfig) -> Result<Self> {
        let runtime = Runtime::new()?;
        runtime.set_max_stack_size(config.max_stack_size);
        if config.memory_limit > 0 {
            runtime.set_memory_limit(config.memory_limit);
        }
        let context = Context::full(&runtime)?;

        context.with(|ctx| -> rquickjs::Result<()> {
            console::register(&ctx)?;
            loader::register(&ctx, config.load_paths.clone())
        })?;

        Ok(Self {
            context,
            _runtime: runtime,
        })
    }

    fn eval(&self, script: &str) -> Result<Value> {
        self.context.with(|ctx| match ctx.eval::<rquickjs::Value<'_>, _>(script) {
            Ok(value) => Ok(Value::from_js(&value)),
            Err(rquickjs::Error::Exception) => {
                let err = Error::from_js_catch(&ctx);
                warn!(error = %err.full_message(), script, "script error");
                Err(err)
            }
            Err(e) => {
                let err = Error::from(e);
                warn!(error = %err, script, "engine error");
                Err(err)
            }
        })
    }
}

/// Handle to the single embedded runtime of this process.
pub struct RuntimeHost {
    home: ThreadId,
    config: RuntimeConfig,
    boot_error: Option<String>,
    evaluations: AtomicU64,
}

impl RuntimeHost {
    /// Set the configuration used when the runtime is first created.
    ///
    /// Without a call to this, [`RuntimeConfig::from_env`] is used. The
    /// runtime always boots with whatever configuration is stored first, so
    /// a call racing with the first [`RuntimeHost::acquire`] either takes
    /// effect or fails.
    ///
    /// # Errors
    /// Returns [`Error::AlreadyInitialized`] once the runtime exists or a
    /// configuration was already set.
    pub fn configure(config: RuntimeConfig) -> Result<()> {
        CONFIG.set(config).map_err(|_| Error::AlreadyInitialized)
    }

    /// Return the process runtime, creating it on the calling thread if it
    /// does not exist yet.
    pub fn acquire() -> &'static Self {
        HOST.get_or_init(|| {
            let config = CONFIG.get_or_init(RuntimeConfig::from_env).clone();
            let (engine, boot_error) = match Engine::boot(&config) {
                Ok(engine) => {
                    info!(
                        engine = "quickjs",
                        version = env!("CARGO_PKG_VERSION"),
                        load_paths = ?config.load_paths,
                        max_stack_size = config.max_stack_size,
                        memory_limit = config.memory_limit,
                        "embedded runtime initialized"
                    );
                    (Some(engine), None)
                }
                Err(e) => {
                    error!(error = %e, "failed to initialize embedded runtime");
                    (None, Some(e.to_string()))
                }
            };
            ENGINE.with(|slot| {
                let _ = slot.set(engine);
            });

            Self {
                home: thread::current().id(),
                config,
                boot_error,
                evaluations: AtomicU64::new(0),
            }
        })
    }

    #[must_use]
    pub const fn home_thread(&self) -> ThreadId {
        self.home
    }

    #[must_use]
    pub fn is_home_thread(&self) -> bool {
        thread::current().id() == self.home
    }

    #[must_use]
    pub const fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Number of scripts submitted to the engine so far.
    #[must_use]
    pub fn evaluation_count(&self) -> u64 {
        self.evaluations.load(Ordering::Relaxed)
    }
}

impl ScriptHost for RuntimeHost {
    fn evaluate(&self, script: &str) -> Result<Value> {
        if !self.is_home_thread() {
            return Err(Error::WrongThread);
        }

        ENGINE.with(|slot| {
            let Some(engine) = slot.get().and_then(Option::as_ref) else {
                return Err(Error::Unavailable(
                    self.boot_error
                        .clone()
                        .unwrap_or_else(|| "runtime not initialized".to_string()),
                ));
            };
            self.evaluations.fetch_add(1, Ordering::Relaxed);
            engine.eval(script)
        })
    }
}

impl std::fmt::Debug for RuntimeHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeHost")
            .field("home", &self.home)
            .field("config", &self.config)
            .field("boot_error", &self.boot_error)
            .finish_non_exhaustive()
    }
}

/// The process runtime, created lazily on the first evaluation.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessRuntime;

impl ScriptHost for ProcessRuntime {
    fn evaluate(&self, script: &str) -> Result<Value> {
        RuntimeHost::acquire().evaluate(script)
    }
}
