//! Graceful shutdown.
//!
//! [`ShutdownSignal`] is a cloneable one-way latch: once triggered, every
//! current and future [`ShutdownSignal::recv`] future completes.
//! [`ConnectionTracker`] counts open connections so the server can drain
//! them before returning.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::{watch, Notify};

/// Cloneable shutdown latch.
///
/// ```rust
/// use violetear_server::ShutdownSignal;
///
/// let shutdown = ShutdownSignal::new();
/// let other = shutdown.clone();
///
/// other.trigger();
/// assert!(shutdown.is_shutdown());
/// ```
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    tx: Arc<watch::Sender<bool>>,
}

impl ShutdownSignal {
    /// Creates an untriggered signal.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Creates a signal triggered by SIGINT or, on Unix, SIGTERM.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn with_os_signals() -> Self {
        let signal = Self::new();
        let trigger = signal.clone();
        tokio::spawn(async move {
            wait_for_os_signal().await;
            trigger.trigger();
        });
        signal
    }

    /// Triggers shutdown. Later calls have no effect.
    pub fn trigger(&self) {
        let was_triggered = self.tx.send_replace(true);
        if !was_triggered {
            tracing::debug!("shutdown triggered");
        }
    }

    /// Whether [`ShutdownSignal::trigger`] has been called.
    #[must_use]
    pub fn is_shutdown(&self) -> bool {
        *self.tx.borrow()
    }

    /// Completes once the signal is triggered, immediately if it already was.
    pub fn recv(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut rx = self.tx.subscribe();
        async move {
            // Err means every sender is gone, which can only follow a drop
            // of all signal handles; treat it as shutdown too.
            let _ = rx.wait_for(|triggered| *triggered).await;
        }
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

async fn wait_for_os_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received SIGINT, shutting down"),
        () = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}

#[derive(Debug, Default)]
struct Counter {
    active: AtomicUsize,
    idle: Notify,
}

/// Counts open connections.
///
/// ```rust
/// use violetear_server::ConnectionTracker;
///
/// let tracker = ConnectionTracker::new();
/// let guard = tracker.track();
/// assert_eq!(tracker.active(), 1);
///
/// drop(guard);
/// assert_eq!(tracker.active(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConnectionTracker {
    counter: Arc<Counter>,
}

impl ConnectionTracker {
    /// Creates a tracker with no open connections.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a connection until the returned guard is dropped.
    #[must_use]
    pub fn track(&self) -> ConnectionGuard {
        self.counter.active.fetch_add(1, Ordering::SeqCst);
        ConnectionGuard {
            counter: Arc::clone(&self.counter),
        }
    }

    /// Number of open connections.
    #[must_use]
    pub fn active(&self) -> usize {
        self.counter.active.load(Ordering::SeqCst)
    }

    /// Completes when no connections are open.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.counter.idle.notified();
            tokio::pin!(notified);
            // register before checking so a concurrent last drop isn't missed
            notified.as_mut().enable();
            if self.active() == 0 {
                return;
            }
            notified.await;
        }
    }
}

/// Marks one open connection.
#[derive(Debug)]
pub struct ConnectionGuard {
    counter: Arc<Counter>,
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        if self.counter.active.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.counter.idle.notify_waiters();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio_test::{assert_pending, assert_ready, task};

    #[test]
    fn test_trigger_is_shared_and_idempotent() {
        let signal = ShutdownSignal::default();
        let clone = signal.clone();
        assert!(!clone.is_shutdown());

        signal.trigger();
        signal.trigger();
        assert!(signal.is_shutdown());
        assert!(clone.is_shutdown());
    }

    #[test]
    fn test_recv_waits_for_trigger() {
        let signal = ShutdownSignal::new();
        let mut recv = task::spawn(signal.recv());
        assert_pending!(recv.poll());

        signal.trigger();
        assert!(recv.is_woken());
        assert_ready!(recv.poll());
    }

    #[test]
    fn test_recv_after_trigger_is_ready() {
        let signal = ShutdownSignal::new();
        signal.trigger();

        let mut recv = task::spawn(signal.recv());
        assert_ready!(recv.poll());
    }

    #[tokio::test]
    async fn test_recv_from_another_task() {
        let signal = ShutdownSignal::new();
        let trigger = signal.clone();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            trigger.trigger();
        });

        tokio::time::timeout(Duration::from_secs(1), signal.recv())
            .await
            .expect("recv should complete");
    }

    #[test]
    fn test_tracker_counts_guards() {
        let tracker = ConnectionTracker::new();
        let first = tracker.track();
        let second = tracker.clone().track();
        assert_eq!(tracker.active(), 2);

        drop(first);
        assert_eq!(tracker.active(), 1);
        drop(second);
        assert_eq!(tracker.active(), 0);
    }

    #[test]
    fn test_wait_idle_wakes_on_last_drop() {
        let tracker = ConnectionTracker::new();
        let first = tracker.track();
        let second = tracker.track();

        let mut idle = task::spawn(tracker.wait_idle());
        assert_pending!(idle.poll());

        drop(first);
        assert_pending!(idle.poll());

        drop(second);
        assert!(idle.is_woken());
        assert_ready!(idle.poll());
    }

    #[tokio::test]
    async fn test_wait_idle_with_no_connections() {
        let tracker = ConnectionTracker::new();
        tokio::time::timeout(Duration::from_millis(10), tracker.wait_idle())
            .await
            .expect("no connections, should be idle");
    }
}
