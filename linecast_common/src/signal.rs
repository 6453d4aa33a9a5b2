//! Process-wide shutdown flag and POSIX signal wiring.
//!
//! On receipt of an interrupt or termination signal the installed handler
//! only stores `true` into the shared flag and emits a short notice. All
//! cleanup happens in the main loops, which poll the flag between units of
//! work.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::result::Result;

/// Cloneable handle to the process-wide shutdown flag.
///
/// The flag starts unset and is tripped exactly once, either by the signal
/// handler or by application code requesting a clean shutdown (e.g., after
/// the configured sample count has been reached).
#[derive(Debug, Clone, Default)]
pub struct ShutdownFlag {
    inner: Arc<AtomicBool>,
}

impl ShutdownFlag {
    /// Create a new, unset flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Trip the flag.
    pub fn request_shutdown(&self) {
        self.inner.store(true, Ordering::SeqCst);
    }

    /// Whether shutdown has been requested.
    pub fn is_shutdown_requested(&self) -> bool {
        self.inner.load(Ordering::SeqCst)
    }
}

/// Install a handler for interrupt and termination signals that trips `flag`.
///
/// The handler performs the atomic store and a single line of output, nothing
/// else; loops observing the flag decide when and how to stop.
pub fn install_shutdown_handler(flag: &ShutdownFlag) -> Result<()> {
    let flag = flag.clone();
    ctrlc::set_handler(move || {
        flag.request_shutdown();
        println!("preparing to shut down...");
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::ShutdownFlag;
    use std::thread;

    #[test]
    fn flag_starts_unset() {
        assert!(!ShutdownFlag::new().is_shutdown_requested());
    }

    #[test]
    fn store_from_another_thread_is_observable() {
        let flag = ShutdownFlag::new();
        let handler_side = flag.clone();
        thread::spawn(move || handler_side.request_shutdown())
            .join()
            .unwrap();
        assert!(flag.is_shutdown_requested());
    }
}
