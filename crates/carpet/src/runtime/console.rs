use rquickjs::{Ctx, Function, Object, convert::Coerced, function::Rest};
use tracing::{Level, event};

use crate::TRACE_TARGET_SCRIPT;

type Args = Rest<Coerced<String>>;

fn log(level: Level, args: &Args) {
    let message = args
        .0
        .iter()
        .map(|arg| arg.0.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    if level == Level::DEBUG {
        event!(name: "log", target: TRACE_TARGET_SCRIPT, Level::DEBUG, log.output = %message);
    } else if level == Level::WARN {
        event!(name: "log", target: TRACE_TARGET_SCRIPT, Level::WARN, log.output = %message);
    } else if level == Level::ERROR {
        event!(name: "log", target: TRACE_TARGET_SCRIPT, Level::ERROR, log.output = %message);
    } else {
        event!(name: "log", target: TRACE_TARGET_SCRIPT, Level::INFO, log.output = %message);
    }
}

/// Install a global `console` whose methods forward to `tracing`.
pub fn register(ctx: &Ctx<'_>) -> rquickjs::Result<()> {
    let console = Object::new(ctx.clone())?;

    console.set(
        "log",
        Function::new(ctx.clone(), |args: Args| log(Level::INFO, &args))?,
    )?;
    console.set(
        "info",
        Function::new(ctx.clone(), |args: Args| log(Level::INFO, &args))?,
    )?;
    console.set(
        "debug",
        Function::new(ctx.clone(), |args: Args| log(Level::DEBUG, &args))?,
    )?;
    console.set(
        "warn",
        Function::new(ctx.clone(), |args: Args| log(Level::WARN, &args))?,
    )?;
    console.set(
        "error",
        Function::new(ctx.clone(), |args: Args| log(Level::ERROR, &args))?,
    )?;

    ctx.globals().set("console", console)
}
