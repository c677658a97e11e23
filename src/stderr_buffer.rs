use std::sync::{Mutex, MutexGuard};

static BUFFER: Mutex<Option<Vec<String>>> = Mutex::new(None);

// A panic while holding the lock only ever leaves a partially filled Vec
// behind, which is still usable.
fn lock() -> MutexGuard<'static, Option<Vec<String>>> {
    BUFFER.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Start collecting warnings instead of printing them, e.g. while a table is
/// being written to stdout.
pub fn activate() {
    *lock() = Some(Vec::new());
}

/// Stop collecting and return everything collected so far.
pub fn drain() -> Vec<String> {
    lock().take().unwrap_or_default()
}

/// Emit a warning: stored while buffering is active, printed to stderr otherwise.
pub fn warn(msg: String) {
    let mut guard = lock();
    if let Some(buf) = guard.as_mut() {
        buf.push(msg);
    } else {
        drop(guard);
        eprintln!("{}", msg);
    }
}

/// `eprintln!` that routes through the warning buffer when it is active.
#[macro_export]
macro_rules! buffered_eprintln {
    ($($arg:tt)*) => {
        $crate::stderr_buffer::warn(format!($($arg)*))
    };
}
