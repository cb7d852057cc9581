use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// In-memory rate limiter for the submission endpoints, keyed by
/// (bucket, client ip), e.g. "contact:1.2.3.4".
pub struct RateLimiter {
    entries: Mutex<HashMap<String, Vec<Instant>>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        RateLimiter {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Record an attempt and return true if it is allowed (under
    /// `max_attempts` within `window`).
    pub fn check_and_record(&self, key: &str, max_attempts: u64, window: Duration) -> bool {
        let mut map = self.entries.lock().unwrap();
        let now = Instant::now();
        let cutoff = now - window;

        let attempts = map.entry(key.to_string()).or_default();
        attempts.retain(|t| *t > cutoff);

        if (attempts.len() as u64) < max_attempts {
            attempts.push(now);
            true
        } else {
            false
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_within_window() {
        let limiter = RateLimiter::new();
        let window = Duration::from_secs(60);
        assert!(limiter.check_and_record("contact:ip", 2, window));
        assert!(limiter.check_and_record("contact:ip", 2, window));
        assert!(!limiter.check_and_record("contact:ip", 2, window));
        // Other keys are independent
        assert!(limiter.check_and_record("contact:other", 2, window));
    }

    #[test]
    fn expired_attempts_fall_out_of_the_window() {
        let limiter = RateLimiter::new();
        assert!(limiter.check_and_record("k", 1, Duration::from_millis(1)));
        std::thread::sleep(Duration::from_millis(5));
        assert!(limiter.check_and_record("k", 1, Duration::from_millis(1)));
    }
}
