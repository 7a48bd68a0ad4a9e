use std::time::Duration;

use tokio::time::Instant;

/// Per-client token bucket.
///
/// Tokens are credited in whole units: `floor(elapsed * refill_per_sec)`
/// since the last refill. The refill instant only moves when at least one
/// token was credited, so a client polling faster than the refill period
/// still accumulates elapsed time instead of having it truncated away.
#[derive(Debug, Clone)]
pub struct TokenBucket {
    tokens: u32,
    capacity: u32,
    refill_per_sec: f64,
    last_refill: Instant,
    last_seen: Instant,
}

impl TokenBucket {
    /// A full bucket.
    pub fn new(capacity: u32, refill_per_sec: f64, now: Instant) -> Self {
        Self {
            tokens: capacity,
            capacity,
            refill_per_sec,
            last_refill: now,
            last_seen: now,
        }
    }

    pub fn try_acquire(&mut self, now: Instant) -> bool {
        self.last_seen = now;
        self.refill(now);

        if self.tokens > 0 {
            self.tokens -= 1;
            true
        } else {
            false
        }
    }

    fn refill(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_refill);
        let credit = (elapsed.as_secs_f64() * self.refill_per_sec).floor();
        if credit < 1.0 {
            return;
        }

        let credit = credit.min(f64::from(self.capacity)) as u32;
        self.tokens = self.tokens.saturating_add(credit).min(self.capacity);
        self.last_refill = now;
    }

    pub fn tokens(&self) -> u32 {
        self.tokens
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_seen)
    }
}
