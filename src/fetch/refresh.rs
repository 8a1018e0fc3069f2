//! Periodic refresh timer.
//!
//! The timer task lives under a child of the orchestrator's lifetime token,
//! so it is released on explicit cancel, on drop, and on orchestrator
//! shutdown. A tick that already started its cycle runs it to completion;
//! whether the result is applied is decided by the fetch state.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::Shared;

pub(super) struct RefreshTimer {
    token: CancellationToken,
    handle: JoinHandle<()>,
    period: Duration,
}

impl RefreshTimer {
    /// First tick fires one full period after start.
    pub(super) fn start(shared: Arc<Shared>, period: Duration) -> Self {
        let token = shared.lifetime.child_token();
        let task_token = token.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = task_token.cancelled() => break,
                    _ = ticker.tick() => {
                        let outcome = shared.cycle().await;
                        debug!("Refresh tick: {:?}", outcome);
                    }
                }
            }

            debug!("Refresh timer stopped ({}ms)", period.as_millis());
        });

        debug!("Refresh timer armed ({}ms)", period.as_millis());
        Self {
            token,
            handle,
            period,
        }
    }

    pub(super) fn period(&self) -> Duration {
        self.period
    }

    pub(super) fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub(super) fn cancel(&self) {
        self.token.cancel();
    }
}

impl Drop for RefreshTimer {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
