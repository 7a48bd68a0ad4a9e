use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::time::Instant;

use crate::domain::TokenBucket;

/// Per-client admission gate.
///
/// Buckets are created on a client's first request and dropped by
/// [`RateLimiter::sweep_idle`] once the client has been quiet for longer
/// than the sweep interval. A swept client that comes back starts over
/// with a full bucket.
pub struct RateLimiter {
    buckets: DashMap<String, TokenBucket>,
    capacity: u32,
    refill_per_sec: f64,
    sweep_interval: Duration,
}

impl RateLimiter {
    pub fn new(capacity: u32, refill_per_sec: f64, sweep_interval: Duration) -> Self {
        Self {
            buckets: DashMap::new(),
            capacity,
            refill_per_sec,
            sweep_interval,
        }
    }

    /// Takes one token from the client's bucket. `false` means the request
    /// must be rejected without side effects.
    pub fn allow(&self, client_id: &str) -> bool {
        let now = Instant::now();

        let allowed = match self.buckets.get_mut(client_id) {
            Some(mut bucket) => bucket.try_acquire(now),
            None => self
                .buckets
                .entry(client_id.to_owned())
                .or_insert_with(|| TokenBucket::new(self.capacity, self.refill_per_sec, now))
                .try_acquire(now),
        };

        if !allowed {
            tracing::debug!(client_id = %client_id, "Rate limit exceeded");
        }
        allowed
    }

    /// Removes buckets idle for longer than the sweep interval. Returns the
    /// number removed.
    pub fn sweep_idle(&self) -> usize {
        let now = Instant::now();
        let mut removed = 0;

        self.buckets.retain(|_, bucket| {
            let keep = bucket.idle_for(now) <= self.sweep_interval;
            if !keep {
                removed += 1;
            }
            keep
        });

        if removed > 0 {
            tracing::debug!(removed, remaining = self.buckets.len(), "Swept idle rate-limit buckets");
        }
        removed
    }

    pub async fn run_idle_sweep(self: Arc<Self>) {
        let mut ticker = tokio::time::interval(self.sweep_interval);
        ticker.tick().await;

        loop {
            ticker.tick().await;
            self.sweep_idle();
        }
    }

    pub fn tracked_clients(&self) -> usize {
        self.buckets.len()
    }

    /// Tokens currently left for `client_id`, if it has a bucket.
    pub fn remaining_tokens(&self, client_id: &str) -> Option<u32> {
        self.buckets.get(client_id).map(|bucket| bucket.tokens())
    }
}
