// SPDX-License-Identifier: GPL-3.0-or-later

use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{sleep, Duration, Instant};

/// Enforces a minimum pause between consecutive catalog requests.
///
/// The shared search endpoint is a community service; pacing requests keeps
/// a batch run from hammering it. A zero interval disables pacing.
#[derive(Debug, Clone)]
pub struct RequestPacer {
    min_interval: Duration,
    last_request: Arc<Mutex<Option<Instant>>>,
}

impl RequestPacer {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Arc::new(Mutex::new(None)),
        }
    }

    /// Wait until the minimum interval since the previous call has elapsed,
    /// then record this call. Holding the lock across the sleep serializes
    /// callers.
    pub async fn pause(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(last_instant) = *last {
            let elapsed = last_instant.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                tracing::trace!(target: "catalog", "pacing: waiting {:?}", wait);
                sleep(wait).await;
            }
        }

        *last = Some(Instant::now());
    }
}
