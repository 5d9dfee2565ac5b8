//! Per-client token-bucket rate limiting for the books endpoint.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Instant;

/// Limits for one client key. The default matches the catalog's contract of
/// 10 requests per minute on `/api/books`.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum burst size.
    pub capacity: f64,
    /// Tokens restored per second.
    pub refill_per_sec: f64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            capacity: 10.0,
            refill_per_sec: 10.0 / 60.0,
        }
    }
}

#[derive(Debug, Clone)]
struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

/// Token buckets keyed by client address.
///
/// Buckets are created on first sight and refill continuously; the map is
/// never pruned, which is fine for the handful of distinct peers this
/// service sees.
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    buckets: Mutex<HashMap<String, Bucket>>,
}

impl RateLimiter {
    /// A limiter enforcing `config` independently per key.
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    /// Take one token for `key`. Returns `false` when the bucket is empty.
    pub fn allow(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut buckets = self.buckets.lock();
        let bucket = buckets.entry(key.to_string()).or_insert_with(|| Bucket {
            tokens: self.config.capacity,
            last_refill: now,
        });
        let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
        bucket.last_refill = now;
        bucket.tokens =
            (bucket.tokens + elapsed * self.config.refill_per_sec).min(self.config.capacity);
        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}
