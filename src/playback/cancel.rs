// Cancellation token - Cooperative stop signal for the playback thread
// Sleeps wake up immediately when the token is cancelled.

use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

/// Shared stop signal
///
/// Clones refer to the same token. Once cancelled a token stays cancelled.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the owner of the token to stop at its next check point
    pub fn cancel(&self) {
        let (flag, condvar) = &*self.inner;
        let mut cancelled = flag.lock().unwrap_or_else(|e| e.into_inner());
        *cancelled = true;
        condvar.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        let (flag, _) = &*self.inner;
        *flag.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Sleep for `duration` unless cancelled first
    ///
    /// Returns false if the token was cancelled before or during the sleep.
    pub fn sleep(&self, duration: Duration) -> bool {
        let (flag, condvar) = &*self.inner;
        let guard = flag.lock().unwrap_or_else(|e| e.into_inner());
        let (cancelled, _) = condvar
            .wait_timeout_while(guard, duration, |cancelled| !*cancelled)
            .unwrap_or_else(|e| e.into_inner());
        !*cancelled
    }

    /// Sleep until `deadline` unless cancelled first
    pub fn sleep_until(&self, deadline: Instant) -> bool {
        self.sleep(deadline.saturating_duration_since(Instant::now()))
    }
}
