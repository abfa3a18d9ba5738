//! Startup retry policy for database connections.

use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Backoff schedule applied while a connection target is unreachable.
///
/// The delay doubles after every failed attempt up to `max_delay`. With
/// jitter enabled each sleep is shortened by a random amount so that a
/// fleet of replicas restarting together does not reconnect in lockstep.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the first attempt, so `max_retries = 3` allows four
    /// attempts in total.
    pub max_retries: u32,
    /// Sleep before the first retry.
    pub initial_delay: Duration,
    /// Ceiling for the doubling delay.
    pub max_delay: Duration,
    /// Randomize each sleep between half and the full delay.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(5),
            jitter: true,
        }
    }
}

impl RetryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn without_jitter(mut self) -> Self {
        self.jitter = false;
        self
    }

    /// Run `operation` until it succeeds or the attempt budget is spent.
    ///
    /// Returns the error of the final attempt when every attempt fails.
    pub async fn run<F, Fut, T, E>(&self, mut operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let mut delay = self.initial_delay;
        let mut attempt: u32 = 0;

        loop {
            match operation().await {
                Ok(value) => {
                    if attempt > 0 {
                        debug!(attempt, "Connection attempt succeeded after retrying");
                    }
                    return Ok(value);
                }
                Err(err) if attempt >= self.max_retries => {
                    warn!(
                        attempts = attempt + 1,
                        error = %err,
                        "Giving up after exhausting connection retries"
                    );
                    return Err(err);
                }
                Err(err) => {
                    attempt += 1;
                    let sleep_for = if self.jitter { jittered(delay) } else { delay };
                    debug!(
                        attempt,
                        max = self.max_retries,
                        delay_ms = sleep_for.as_millis() as u64,
                        error = %err,
                        "Connection attempt failed, backing off"
                    );
                    tokio::time::sleep(sleep_for).await;
                    delay = (delay * 2).min(self.max_delay);
                }
            }
        }
    }
}

/// Picks a random point in `[delay / 2, delay)`.
fn jittered(delay: Duration) -> Duration {
    use std::collections::hash_map::RandomState;
    use std::hash::BuildHasher;

    // RandomState seeds itself per instance, which is randomness enough
    // for spreading reconnects.
    let roll = RandomState::new().hash_one(0u64) % 1000;
    delay / 2 + delay.mul_f64(roll as f64 / 2000.0)
}
