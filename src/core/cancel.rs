use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};

/// One-way stop request shared between the interrupt handler and the loop
///
/// The flag starts clear and is never cleared once set — cancellation is
/// terminal for the process lifetime. The handler side only stores the flag;
/// all cleanup happens cooperatively on the loop thread, which polls
/// [`CancellationToken::is_cancelled`] once per frame.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; safe to call from any thread, any number of times
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Route Ctrl-C to this token
    ///
    /// The handler does nothing but set the flag, keeping the interrupt path
    /// free of allocation, locking, and graphics calls.
    pub fn install_ctrl_c_handler(&self) -> Result<()> {
        let token = self.clone();
        ctrlc::set_handler(move || token.cancel())
            .context("failed to install Ctrl-C handler")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_clear() {
        let token = CancellationToken::new();
        assert!(!token.is_cancelled());
    }

    #[test]
    fn cancel_is_sticky() {
        let token = CancellationToken::new();
        token.cancel();
        assert!(token.is_cancelled());

        // Repeated requests keep it set
        token.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn clones_share_the_flag() {
        let token = CancellationToken::new();
        let observer = token.clone();

        token.cancel();
        assert!(observer.is_cancelled());
    }

    #[test]
    fn cancel_from_another_thread_is_observed() {
        let token = CancellationToken::new();
        let remote = token.clone();

        std::thread::spawn(move || remote.cancel())
            .join()
            .unwrap();

        assert!(token.is_cancelled());
    }
}
