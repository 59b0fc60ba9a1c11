//! Fixed-window admission control for the link creation path.
//!
//! One counter is shared by every creation request in the process. The
//! window rolls forward lazily on the first check after it has elapsed; there
//! is no background timer. A burst straddling a window boundary can admit up
//! to `2 × max_requests` requests in less than one window, which is the
//! accepted behaviour of a fixed window.

use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Default number of admitted requests per window.
pub const DEFAULT_MAX_REQUESTS: u32 = 5;

/// Default window length.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(10);

/// Limits for a [`FixedWindowLimiter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window: Duration,
}

impl RateLimitConfig {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW)
    }
}

/// Outcome of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The request may proceed; `remaining` more fit in the current window.
    Admitted { remaining: u32 },
    /// The window is full; the next window opens after `retry_after`.
    Rejected { retry_after: Duration },
}

impl Admission {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Admission::Admitted { .. })
    }
}

#[derive(Debug)]
struct WindowState {
    window_start: Instant,
    count: u32,
}

/// Process-wide fixed-window counter.
///
/// The whole reset-check-increment sequence runs under a single lock, so two
/// concurrent checks can never both observe a free slot that only one of them
/// may take.
#[derive(Debug)]
pub struct FixedWindowLimiter {
    config: RateLimitConfig,
    state: Mutex<WindowState>,
}

impl FixedWindowLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self::starting_at(config, Instant::now())
    }

    /// Creates a limiter whose first window opens at `start`.
    pub fn starting_at(config: RateLimitConfig, start: Instant) -> Self {
        Self {
            config,
            state: Mutex::new(WindowState {
                window_start: start,
                count: 0,
            }),
        }
    }

    pub fn config(&self) -> RateLimitConfig {
        self.config
    }

    /// Checks and, if admitted, consumes one slot of the current window.
    pub fn check(&self) -> Admission {
        self.check_at(Instant::now())
    }

    /// Same as [`Self::check`] with an explicit clock reading.
    pub fn check_at(&self, now: Instant) -> Admission {
        let mut state = self.state.lock();

        let elapsed = now.saturating_duration_since(state.window_start);
        if elapsed > self.config.window {
            state.count = 0;
            state.window_start = now;
        }

        if state.count >= self.config.max_requests {
            let elapsed = now.saturating_duration_since(state.window_start);
            return Admission::Rejected {
                retry_after: self.config.window.saturating_sub(elapsed),
            };
        }

        state.count += 1;
        Admission::Admitted {
            remaining: self.config.max_requests - state.count,
        }
    }
}

impl Default for FixedWindowLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn limiter(start: Instant) -> FixedWindowLimiter {
        FixedWindowLimiter::starting_at(RateLimitConfig::default(), start)
    }

    #[test]
    fn test_sixth_request_in_window_is_rejected() {
        let start = Instant::now();
        let limiter = limiter(start);

        for i in 0..5 {
            let admission = limiter.check_at(start + Duration::from_secs(i));
            assert_eq!(admission, Admission::Admitted { remaining: 4 - i as u32 });
        }

        let sixth = limiter.check_at(start + Duration::from_secs(6));
        assert_eq!(
            sixth,
            Admission::Rejected {
                retry_after: Duration::from_secs(4)
            }
        );
    }

    #[test]
    fn test_request_admitted_after_window_elapses() {
        let start = Instant::now();
        let limiter = limiter(start);

        for _ in 0..5 {
            assert!(limiter.check_at(start).is_admitted());
        }
        assert!(!limiter.check_at(start + Duration::from_secs(10)).is_admitted());

        let later = start + Duration::from_millis(10_001);
        assert_eq!(
            limiter.check_at(later),
            Admission::Admitted { remaining: 4 }
        );
    }

    #[test]
    fn test_window_boundary_is_exclusive() {
        let start = Instant::now();
        let limiter = limiter(start);

        for _ in 0..5 {
            limiter.check_at(start);
        }

        // Exactly one window later still belongs to the old window.
        assert!(!limiter.check_at(start + DEFAULT_WINDOW).is_admitted());
    }

    #[test]
    fn test_boundary_straddle_admits_twice_the_limit() {
        let start = Instant::now();
        let limiter = limiter(start);

        let late = start + Duration::from_millis(9_900);
        for _ in 0..5 {
            assert!(limiter.check_at(late).is_admitted());
        }

        let early_next = start + Duration::from_millis(10_100);
        for _ in 0..5 {
            assert!(limiter.check_at(early_next).is_admitted());
        }
        assert!(!limiter.check_at(early_next).is_admitted());
    }

    #[test]
    fn test_rejections_do_not_consume_slots() {
        let start = Instant::now();
        let limiter = FixedWindowLimiter::starting_at(
            RateLimitConfig::new(1, Duration::from_secs(1)),
            start,
        );

        assert!(limiter.check_at(start).is_admitted());
        for _ in 0..100 {
            assert!(!limiter.check_at(start).is_admitted());
        }
        assert!(
            limiter
                .check_at(start + Duration::from_millis(1_001))
                .is_admitted()
        );
    }

    #[test]
    fn test_concurrent_checks_never_exceed_limit() {
        let limiter = Arc::new(FixedWindowLimiter::new(RateLimitConfig::new(
            50,
            Duration::from_secs(3600),
        )));
        let admitted = Arc::new(AtomicU32::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let limiter = limiter.clone();
                let admitted = admitted.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        if limiter.check().is_admitted() {
                            admitted.fetch_add(1, Ordering::SeqCst);
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(admitted.load(Ordering::SeqCst), 50);
    }
}
