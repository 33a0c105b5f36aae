//! Fixed-window request budget shared by every list call of the API client.
//!
//! Up to `limit` permits are handed out as fast as they are asked for right
//! after a window opens; once spent, callers wait until the window rolls
//! over. The lock guards only the check-and-increment, never the wait.

use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;

/// Upper bound on a single wait between budget checks.
const MAX_WAIT_STEP: Duration = Duration::from_secs(1);
/// Lower bound so a caller landing exactly on the window edge still makes progress.
const MIN_WAIT_STEP: Duration = Duration::from_millis(1);

/// Budget size and window length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub limit: u32,
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            limit: 360,
            window: Duration::from_secs(60 * 60),
        }
    }
}

#[derive(Debug)]
struct RateBudget {
    window_start: Instant,
    count: u32,
}

/// Thread-safe fixed-window rate limiter.
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    budget: Mutex<RateBudget>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config: RateLimitConfig {
                limit: config.limit.max(1),
                window: config.window,
            },
            budget: Mutex::new(RateBudget {
                window_start: Instant::now(),
                count: 0,
            }),
        }
    }

    pub const fn config(&self) -> RateLimitConfig {
        self.config
    }

    /// Waits until a permit is available, then takes it.
    ///
    /// There is no timeout and no way to abandon the wait from inside; wrap
    /// the future with `tokio::time::timeout` or drop it to give up.
    pub async fn acquire(&self) {
        loop {
            match self.try_acquire() {
                Ok(()) => return,
                Err(wait) => {
                    tracing::debug!(
                        wait_ms = wait.as_millis() as u64,
                        limit = self.config.limit,
                        "request budget exhausted, waiting for window to roll"
                    );
                    tokio::time::sleep(wait).await;
                }
            }
        }
    }

    /// Takes a permit if one is available, otherwise returns how long to wait
    /// before checking again.
    pub fn try_acquire(&self) -> Result<(), Duration> {
        let now = Instant::now();
        let mut budget = self
            .budget
            .lock()
            .expect("rate limiter lock is not poisoned");

        let elapsed = now.saturating_duration_since(budget.window_start);
        if elapsed > self.config.window {
            budget.window_start = now;
            budget.count = 0;
        }

        if budget.count < self.config.limit {
            budget.count += 1;
            return Ok(());
        }

        let remaining = self.config.window.saturating_sub(elapsed);
        Err(remaining.clamp(MIN_WAIT_STEP, MAX_WAIT_STEP))
    }

    /// Permits left in the current window, not counting an imminent reset.
    pub fn remaining(&self) -> u32 {
        let budget = self
            .budget
            .lock()
            .expect("rate limiter lock is not poisoned");
        self.config.limit.saturating_sub(budget.count)
    }
}
