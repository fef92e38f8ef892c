//! Periodic background refresh.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::refresh::{RefreshController, RefreshTrigger};

/// Default delay between scheduled refreshes.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Handle to the periodic refresh task.
///
/// Dropping the handle stops the task after any in-flight refresh.
#[derive(Debug)]
pub struct RefreshScheduler {
    shutdown: Option<oneshot::Sender<()>>,
    join_handle: Option<JoinHandle<()>>,
    interval: Duration,
}

impl RefreshScheduler {
    /// Spawns the refresh loop on the current runtime. The first tick fires
    /// one full interval after start.
    pub fn spawn(controller: Arc<RefreshController>, interval: Duration) -> Self {
        let interval = interval.max(Duration::from_millis(1));
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
        let join_handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            tracing::info!(interval_secs = interval.as_secs(), "refresh scheduler started");
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    _ = ticker.tick() => {
                        if let Err(error) = controller.refresh(RefreshTrigger::Scheduled).await {
                            tracing::warn!(%error, "scheduled sample refresh failed");
                        }
                    }
                }
            }
            tracing::info!("refresh scheduler stopped");
        });

        Self {
            shutdown: Some(shutdown_tx),
            join_handle: Some(join_handle),
            interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Stops the loop and waits for it to exit.
    pub async fn shutdown(mut self) {
        if let Some(sender) = self.shutdown.take() {
            let _ = sender.send(());
        }
        if let Some(handle) = self.join_handle.take() {
            if let Err(error) = handle.await {
                tracing::warn!(%error, "refresh scheduler task failed");
            }
        }
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        if let Some(sender) = self.shutdown.take() {
            let _ = sender.send(());
        }
    }
}
