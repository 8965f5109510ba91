//! Background expiry sweep.
//!
//! Expired rows are already invisible to reads; the sweep only reclaims the
//! space. A failed run is logged and the next tick tries again.

use std::time::Duration;

use common::logger::{TraceId, root_span, warn_if_slow};
use sqlx::SqlitePool;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{Instrument, Span, debug, info, warn};

use crate::config::MAX_DURATION;
use crate::store::sqlite_store::delete_expired;

/// Sweeps slower than this get a performance warning.
const SLOW_SWEEP: Duration = Duration::from_secs(1);

/// Handle to a running sweep task.
///
/// Stopping goes through a watch channel rather than a one-shot send, so
/// [`CleanupTask::stop`] never blocks and can be called any number of times.
/// Dropping the handle closes the channel, which stops the task as well.
pub(crate) struct CleanupTask {
    stop_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl CleanupTask {
    /// Spawns the sweep on the current Tokio runtime.
    ///
    /// The first sweep runs one full `every` after spawning. A zero period
    /// means no sweep and yields `None`; periods above [`MAX_DURATION`] are
    /// clamped to it.
    pub(crate) fn spawn(pool: SqlitePool, every: Duration) -> Option<Self> {
        if every.is_zero() {
            return None;
        }
        let every = every.min(MAX_DURATION);

        let (stop_tx, stop_rx) = watch::channel(false);
        let handle = tokio::spawn(run(pool, every, stop_rx));

        Some(Self { stop_tx, handle })
    }

    pub(crate) fn stop(&self) {
        self.stop_tx.send_replace(true);
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

async fn run(pool: SqlitePool, every: Duration, mut stop_rx: watch::Receiver<bool>) {
    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    // Skip the first immediate tick
    ticker.tick().await;

    info!(every_ms = every.as_millis() as u64, "session cleanup started");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                sweep_once(&pool).await;
            }
            // Either an explicit stop or the owning store went away.
            _ = stop_rx.changed() => break,
        }
    }

    info!("session cleanup stopped");
}

/// Runs one sweep and logs the outcome. Returns the evicted count on success.
pub(crate) async fn sweep_once(pool: &SqlitePool) -> Option<u64> {
    let span = root_span("session_sweep", &TraceId::default());

    async {
        let (outcome, took) = warn_if_slow("session_sweep", SLOW_SWEEP, delete_expired(pool)).await;
        let took_ms = took.as_millis() as u64;

        match outcome {
            Ok(evicted) => {
                Span::current().record("evicted", evicted);
                if evicted > 0 {
                    info!(evicted, took_ms, "session cleanup completed");
                } else {
                    debug!(took_ms, "session cleanup: no expired sessions");
                }
                Some(evicted)
            }
            Err(e) => {
                warn!(error = %e, took_ms, "session cleanup failed");
                None
            }
        }
    }
    .instrument(span)
    .await
}
