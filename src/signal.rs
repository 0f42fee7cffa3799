//! Binary signals the writer loop waits on.
//!
//! A [`Signal`] is a level-triggered flag: [`Signal::wait`] resolves for as
//! long as the flag is set. The writer uses two of them, one for "frames are
//! queued" and one for "exit requested".

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Notify;

/// Settable/clearable flag with async waiting.
#[derive(Debug, Default)]
pub struct Signal {
    flag: AtomicBool,
    notify: Notify,
}

impl Signal {
    /// Create a new, unset signal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the flag and wake every waiter.
    ///
    /// Returns `true` if this call changed the flag.
    pub fn set(&self) -> bool {
        let changed = !self.flag.swap(true, Ordering::AcqRel);
        if changed {
            self.notify.notify_waiters();
        }
        changed
    }

    /// Reset the flag. Waiters already woken are not affected.
    pub fn clear(&self) {
        self.flag.store(false, Ordering::Release);
    }

    #[inline]
    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Wait until the flag is set.
    ///
    /// Returns immediately if it already is.
    pub async fn wait(&self) {
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            // Register before checking the flag so a `set` racing with this
            // check still reaches us.
            notified.as_mut().enable();

            if self.is_set() {
                return;
            }
            notified.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_set_and_clear() {
        let signal = Signal::new();
        assert!(!signal.is_set());

        assert!(signal.set());
        assert!(signal.is_set());

        // Second set is a no-op.
        assert!(!signal.set());

        signal.clear();
        assert!(!signal.is_set());
    }

    #[tokio::test]
    async fn test_wait_returns_when_already_set() {
        let signal = Signal::new();
        signal.set();

        tokio::time::timeout(Duration::from_millis(100), signal.wait())
            .await
            .expect("wait should resolve immediately");
    }

    #[tokio::test]
    async fn test_wait_wakes_on_set() {
        let signal = Arc::new(Signal::new());
        let waiter = {
            let signal = signal.clone();
            tokio::spawn(async move { signal.wait().await })
        };

        tokio::task::yield_now().await;
        signal.set();

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should wake")
            .unwrap();
    }

    #[tokio::test]
    async fn test_wait_blocks_while_clear() {
        let signal = Signal::new();
        signal.set();
        signal.clear();

        let result = tokio::time::timeout(Duration::from_millis(20), signal.wait()).await;
        assert!(result.is_err());
    }
}
