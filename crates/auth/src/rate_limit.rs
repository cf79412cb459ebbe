//! Per-source login-attempt rate limiting.
//!
//! Fixed window per source key, process-local and in-memory: a restart
//! clears all windows, and multiple processes do not share state. Scaling
//! past one process needs an external shared counter; this tier does not
//! provide one.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    resets_at: DateTime<Utc>,
}

/// Fixed-window rate limiter keyed by originating address.
///
/// One instance is constructed at wiring time and injected into request
/// handling; there is no module-global state. Entry-level locking in the
/// map keeps unrelated keys from blocking each other, while read-then-write
/// on a single key stays atomic.
#[derive(Debug)]
pub struct RateLimiter {
    windows: DashMap<String, Window>,
    window: Duration,
    max_attempts: u32,
}

impl RateLimiter {
    pub fn new(window: Duration, max_attempts: u32) -> Self {
        Self {
            windows: DashMap::new(),
            window,
            max_attempts,
        }
    }

    /// Admit or deny an attempt from `source_key`.
    pub fn admit(&self, source_key: &str) -> bool {
        self.admit_at(source_key, Utc::now())
    }

    /// Deterministic variant of [`admit`](Self::admit).
    ///
    /// A window covers `[start, start + window)`. Denied calls never touch
    /// the window, so a denied source recovers at a fixed, predictable
    /// instant no matter how often it keeps retrying.
    pub fn admit_at(&self, source_key: &str, now: DateTime<Utc>) -> bool {
        let mut entry = self
            .windows
            .entry(source_key.to_string())
            .or_insert_with(|| Window {
                count: 0,
                resets_at: now + self.window,
            });

        if now >= entry.resets_at {
            entry.count = 1;
            entry.resets_at = now + self.window;
            return true;
        }

        if entry.count < self.max_attempts {
            entry.count += 1;
            return true;
        }

        false
    }

    /// Drop expired windows.
    ///
    /// Admission never depends on this (`admit_at` replaces stale windows
    /// on access), but sources that never come back would otherwise pin an
    /// entry forever.
    pub fn sweep_expired(&self, now: DateTime<Utc>) {
        self.windows.retain(|_, window| now < window.resets_at);
    }

    /// Number of currently tracked source keys.
    pub fn tracked_sources(&self) -> usize {
        self.windows.len()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn limiter(window_secs: i64, max_attempts: u32) -> RateLimiter {
        RateLimiter::new(Duration::seconds(window_secs), max_attempts)
    }

    #[test]
    fn admits_exactly_max_attempts_per_window() {
        let limiter = limiter(300, 5);
        let now = Utc::now();

        for _ in 0..5 {
            assert!(limiter.admit_at("10.0.0.1", now));
        }
        assert!(!limiter.admit_at("10.0.0.1", now));
    }

    #[test]
    fn window_expiry_resets_the_count() {
        let limiter = limiter(300, 5);
        let now = Utc::now();

        for _ in 0..6 {
            limiter.admit_at("10.0.0.1", now);
        }
        assert!(!limiter.admit_at("10.0.0.1", now));

        let after_window = now + Duration::seconds(300);
        assert!(limiter.admit_at("10.0.0.1", after_window));
    }

    #[test]
    fn denied_calls_do_not_extend_the_window() {
        let limiter = limiter(300, 2);
        let now = Utc::now();

        assert!(limiter.admit_at("10.0.0.1", now));
        assert!(limiter.admit_at("10.0.0.1", now));

        // Hammering while denied must not push the recovery instant out.
        for i in 0..50 {
            assert!(!limiter.admit_at("10.0.0.1", now + Duration::seconds(i)));
        }
        assert!(limiter.admit_at("10.0.0.1", now + Duration::seconds(300)));
    }

    #[test]
    fn keys_are_independent() {
        let limiter = limiter(300, 1);
        let now = Utc::now();

        assert!(limiter.admit_at("10.0.0.1", now));
        assert!(!limiter.admit_at("10.0.0.1", now));
        assert!(limiter.admit_at("10.0.0.2", now));
    }

    #[test]
    fn sweep_drops_only_expired_windows() {
        let limiter = limiter(300, 5);
        let now = Utc::now();

        limiter.admit_at("stale", now);
        limiter.admit_at("fresh", now + Duration::seconds(200));
        assert_eq!(limiter.tracked_sources(), 2);

        limiter.sweep_expired(now + Duration::seconds(400));
        assert_eq!(limiter.tracked_sources(), 1);
    }

    proptest! {
        /// For any in-window attempt pattern, admissions never exceed the cap.
        #[test]
        fn never_admits_more_than_cap_within_one_window(
            offsets in prop::collection::vec(0i64..300, 1..64),
            cap in 1u32..10,
        ) {
            let limiter = limiter(300, cap);
            let start = Utc::now();

            let mut offsets = offsets;
            offsets.sort_unstable();

            let mut admitted = 0u32;
            for offset in offsets {
                if limiter.admit_at("key", start + Duration::seconds(offset)) {
                    admitted += 1;
                }
            }
            prop_assert!(admitted <= cap);
        }
    }
}
