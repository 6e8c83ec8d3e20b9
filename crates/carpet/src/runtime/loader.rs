use std::{
    cell::RefCell,
    collections::HashSet,
    path::{Path, PathBuf},
    rc::Rc,
};

use rquickjs::{Ctx, Exception, Function};
use tracing::debug;

/// Locate `name` on the load path. Names without an extension get `.js`.
pub fn resolve(load_paths: &[PathBuf], name: &str) -> Option<PathBuf> {
    let file = if Path::new(name).extension().is_some() {
        PathBuf::from(name)
    } else {
        PathBuf::from(format!("{name}.js"))
    };
    load_paths
        .iter()
        .map(|dir| dir.join(&file))
        .find(|candidate| candidate.is_file())
}

/// Install a global `require(name)`.
///
/// A library is evaluated once: the first call returns `true`, later calls
/// return `false`. A library is marked loaded before its body runs, and
/// unmarked again if the body throws.
pub fn register<'js>(ctx: &Ctx<'js>, load_paths: Vec<PathBuf>) -> rquickjs::Result<()> {
    let loaded: Rc<RefCell<HashSet<PathBuf>>> = Rc::default();

    let require = Function::new(
        ctx.clone(),
        move |ctx: Ctx<'js>, name: String| -> rquickjs::Result<bool> {
            let Some(path) = resolve(&load_paths, &name) else {
                return Err(Exception::throw_message(
                    &ctx,
                    &format!("cannot load such file -- {name}"),
                ));
            };
            if !loaded.borrow_mut().insert(path.clone()) {
                return Ok(false);
            }

            let source = match std::fs::read_to_string(&path) {
                Ok(source) => source,
                Err(e) => {
                    loaded.borrow_mut().remove(&path);
                    return Err(Exception::throw_message(
                        &ctx,
                        &format!("{}: {e}", path.display()),
                    ));
                }
            };

            debug!(library = %name, path = %path.display(), "loading script library");
            if let Err(e) = ctx.eval::<(), _>(source) {
                loaded.borrow_mut().remove(&path);
                return Err(e);
            }
            Ok(true)
        },
    )?;

    ctx.globals().set("require", require)
}
