//! Shutdown Coordinator
//!
//! Owns the background tasks spawned during bootstrap:
//! - `CancellationToken` for hierarchical shutdown signaling
//! - `TaskTracker` for tracking and awaiting spawned tasks
//!
//! ```rust,ignore
//! let coordinator = ShutdownCoordinator::new();
//! coordinator.spawn_cancellable("event-forward", |token| async move { /* ... */ });
//! let completed = coordinator.shutdown(Duration::from_secs(5)).await;
//! ```

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

/// Coordinator for background task lifecycle
#[derive(Debug, Clone)]
pub struct ShutdownCoordinator {
    cancel_token: CancellationToken,
    task_tracker: TaskTracker,
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownCoordinator {
    /// Create a new shutdown coordinator
    pub fn new() -> Self {
        Self {
            cancel_token: CancellationToken::new(),
            task_tracker: TaskTracker::new(),
        }
    }

    /// Child token, cancelled when shutdown begins
    pub fn child_token(&self) -> CancellationToken {
        self.cancel_token.child_token()
    }

    /// Whether shutdown has been initiated
    pub fn is_shutting_down(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    /// Number of tracked tasks still running
    pub fn active_tasks(&self) -> usize {
        self.task_tracker.len()
    }

    /// Spawn and track a background task
    pub fn spawn<F>(&self, name: &'static str, future: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        debug!(task = name, "Spawning tracked task");
        self.task_tracker.spawn(future)
    }

    /// Spawn a tracked task that receives a child cancellation token
    pub fn spawn_cancellable<F, Fut>(&self, name: &'static str, task_fn: F) -> JoinHandle<Fut::Output>
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future + Send + 'static,
        Fut::Output: Send + 'static,
    {
        let token = self.child_token();
        self.spawn(name, task_fn(token))
    }

    /// Cancel every token, stop accepting tasks and wait for running ones
    ///
    /// Returns `true` if all tasks completed before `timeout`.
    pub async fn shutdown(&self, timeout: Duration) -> bool {
        info!(
            timeout_secs = timeout.as_secs(),
            active_tasks = self.task_tracker.len(),
            "Initiating graceful shutdown"
        );
        self.cancel_token.cancel();
        self.task_tracker.close();

        if tokio::time::timeout(timeout, self.task_tracker.wait())
            .await
            .is_ok()
        {
            info!("All tasks completed cleanly");
            true
        } else {
            warn!(
                active_tasks = self.task_tracker.len(),
                "Shutdown timeout reached with tasks still active"
            );
            false
        }
    }

    /// Wait until shutdown is initiated
    pub async fn wait_for_shutdown(&self) {
        self.cancel_token.cancelled().await;
    }
}
