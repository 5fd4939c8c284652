// SPDX-FileCopyrightText: 2026 Emipro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-second countdown that bounds how long a finished report stays available.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// A running countdown.
///
/// The ticking task stops when the timer is cancelled or dropped, so leaving
/// the preview on any path tears it down.
pub struct ExpiryTimer {
    remaining: watch::Receiver<u64>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl ExpiryTimer {
    /// Starts counting down from `seconds`, one decrement per second.
    pub fn start(seconds: u64) -> Self {
        let (tx, remaining) = watch::channel(seconds);
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let task = tokio::spawn(async move {
            let period = Duration::from_secs(1);
            let mut ticks = interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Burst);
            let mut left = seconds;

            while left > 0 {
                tokio::select! {
                    _ = token.cancelled() => {
                        debug!(left, "expiry timer cancelled");
                        return;
                    }
                    _ = ticks.tick() => {
                        left -= 1;
                        tx.send_replace(left);
                    }
                }
            }
            info!("report preview expired");
        });

        Self {
            remaining,
            cancel,
            task,
        }
    }

    /// Seconds left.
    pub fn remaining(&self) -> u64 {
        *self.remaining.borrow()
    }

    pub fn is_expired(&self) -> bool {
        self.remaining() == 0
    }

    /// A receiver that observes every decrement.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.remaining.clone()
    }

    /// Resolves once the countdown reaches zero. Never resolves after cancellation.
    pub async fn expired(&self) {
        let mut rx = self.remaining.clone();
        if rx.wait_for(|left| *left == 0).await.is_err() {
            // Sender gone without reaching zero: the timer was cancelled.
            std::future::pending::<()>().await;
        }
    }

    /// Stops the countdown.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for ExpiryTimer {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
