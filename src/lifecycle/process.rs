//! Process-level handlers.
//!
//! Panics are this crate's counterpart of an unhandled exception: in
//! production they are logged at fatal level and the process exits with
//! code 1.

use std::sync::{Arc, Once};

use crate::observability::Logger;

static PANIC_HOOK: Once = Once::new();

/// Route panics through `logger`, then exit with code 1.
///
/// Only the first call installs a hook; later orchestrators in the same
/// process keep the first logger.
pub fn install_panic_hook(logger: Arc<dyn Logger>) {
    PANIC_HOOK.call_once(move || {
        std::panic::set_hook(Box::new(move |info| {
            logger.fatal(&format!("Unhandled panic: {info}"));
            terminate(&*logger, 1);
        }));
    });
}

/// Log the exit code and terminate the process.
pub fn terminate(logger: &dyn Logger, code: i32) -> ! {
    logger.info(&format!("Stopped with code: {code}"));
    std::process::exit(code)
}
