//! Per-client token bucket rate limiting
//!
//! Each client key owns a bucket holding up to `capacity` tokens, refilled
//! continuously at `capacity` tokens per minute. A request spends one token;
//! an empty bucket yields the time until the next token is available.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Buckets are pruned once the map grows past this many clients
const PRUNE_THRESHOLD: usize = 10_000;

const REFILL_WINDOW_SECS: f64 = 60.0;

#[derive(Debug, Clone, Copy)]
struct TokenBucket {
    tokens: f64,
    last_refill: Instant,
}

/// Outcome of a rate limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed { remaining: u32 },
    Limited { retry_after: Duration },
}

impl RateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateDecision::Allowed { .. })
    }
}

#[derive(Debug, Default)]
struct Buckets {
    by_client: HashMap<String, TokenBucket>,
    last_prune: Option<Instant>,
}

#[derive(Debug)]
pub struct RateLimiter {
    capacity: f64,
    buckets: Mutex<Buckets>,
}

impl RateLimiter {
    /// Creates a limiter allowing `per_minute` requests per client per minute
    pub fn per_minute(per_minute: u32) -> Self {
        Self {
            capacity: f64::from(per_minute.max(1)),
            buckets: Mutex::new(Buckets::default()),
        }
    }

    pub fn check(&self, key: &str) -> RateDecision {
        self.check_at(key, Instant::now())
    }

    /// Spends a token for `key` as of `now`
    pub fn check_at(&self, key: &str, now: Instant) -> RateDecision {
        let mut buckets = self
            .buckets
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if buckets.by_client.len() >= PRUNE_THRESHOLD && !buckets.by_client.contains_key(key) {
            buckets.prune(now);
        }

        let bucket = buckets.by_client.entry(key.to_string()).or_insert(TokenBucket {
            tokens: self.capacity,
            last_refill: now,
        });

        let elapsed = now.saturating_duration_since(bucket.last_refill).as_secs_f64();
        bucket.tokens =
            (bucket.tokens + elapsed * self.capacity / REFILL_WINDOW_SECS).min(self.capacity);
        bucket.last_refill = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            RateDecision::Allowed {
                remaining: bucket.tokens.floor() as u32,
            }
        } else {
            let wait = (1.0 - bucket.tokens) * REFILL_WINDOW_SECS / self.capacity;
            RateDecision::Limited {
                retry_after: Duration::from_secs_f64(wait),
            }
        }
    }

    /// Number of clients currently holding a bucket
    pub fn tracked_clients(&self) -> usize {
        self.buckets
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .by_client
            .len()
    }
}

impl Buckets {
    /// Drops buckets that would be full again by `now`, at most once per
    /// refill window
    fn prune(&mut self, now: Instant) {
        let window = Duration::from_secs_f64(REFILL_WINDOW_SECS);
        if self
            .last_prune
            .is_some_and(|last| now.saturating_duration_since(last) < window)
        {
            return;
        }
        self.last_prune = Some(now);
        self.by_client
            .retain(|_, bucket| now.saturating_duration_since(bucket.last_refill) < window);
    }
}
