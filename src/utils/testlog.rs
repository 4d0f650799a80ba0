//! Warning capture for tests. The crate reports unrepresentable schedules
//! through the `log` facade, so tests install a process-wide logger that
//! records warnings and hand out an exclusive guard to keep warning counts
//! from interleaving across threads.

use log::{Level, LevelFilter, Log, Metadata, Record};
use std::sync::{Mutex, MutexGuard, Once, OnceLock};

static INIT: Once = Once::new();
static LOGGER: CaptureLogger = CaptureLogger;
static CAPTURED: OnceLock<Mutex<Vec<String>>> = OnceLock::new();
static EXCLUSIVE: OnceLock<Mutex<()>> = OnceLock::new();

struct CaptureLogger;

impl Log for CaptureLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Warn
    }

    fn log(&self, record: &Record) {
        if record.level() == Level::Warn {
            if let Ok(mut messages) = store().lock() {
                messages.push(record.args().to_string());
            }
        }
    }

    fn flush(&self) {}
}

fn store() -> &'static Mutex<Vec<String>> {
    CAPTURED.get_or_init(|| Mutex::new(Vec::new()))
}

/// Install the capture logger and take the exclusive guard. Captured
/// warnings are cleared so the caller observes only its own.
pub(crate) fn capture() -> MutexGuard<'static, ()> {
    INIT.call_once(|| {
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(LevelFilter::Warn);
    });
    let guard = EXCLUSIVE
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    drain();
    guard
}

/// Remove and return every warning recorded since the last drain.
pub(crate) fn drain() -> Vec<String> {
    match store().lock() {
        Ok(mut messages) => messages.drain(..).collect(),
        Err(_) => Vec::new(),
    }
}
