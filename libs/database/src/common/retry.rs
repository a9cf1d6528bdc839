use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// How long to keep knocking while MongoDB comes up next to the API.
///
/// The wait doubles after each failure and never exceeds `max_delay`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backoff {
    /// Attempts after the first one
    pub retries: u32,
    pub first_delay: Duration,
    pub max_delay: Duration,
    /// Shorten each wait to a random 50-100% so restarted replicas spread out
    pub jitter: bool,
}

impl Backoff {
    pub fn retries(self, retries: u32) -> Self {
        Self { retries, ..self }
    }

    pub fn first_delay(self, first_delay: Duration) -> Self {
        Self { first_delay, ..self }
    }

    pub fn max_delay(self, max_delay: Duration) -> Self {
        Self { max_delay, ..self }
    }

    pub fn without_jitter(self) -> Self {
        Self {
            jitter: false,
            ..self
        }
    }

    /// Wait after `failures` consecutive failures (at least 1), before jitter.
    pub fn delay(&self, failures: u32) -> Duration {
        let doublings = failures.saturating_sub(1).min(31);
        self.first_delay
            .saturating_mul(1 << doublings)
            .min(self.max_delay)
    }

    fn wait(&self, failures: u32) -> Duration {
        let delay = self.delay(failures);
        if self.jitter {
            delay.mul_f64(jitter_factor())
        } else {
            delay
        }
    }
}

impl Default for Backoff {
    /// 3 retries: 100ms, 200ms, 400ms (each jittered), capped at 5s.
    fn default() -> Self {
        Self {
            retries: 3,
            first_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(5),
            jitter: true,
        }
    }
}

/// Run `operation` until it succeeds or `backoff.retries` extra attempts have
/// failed, returning the last error in that case.
pub async fn retry_with_backoff<F, Fut, T, E>(backoff: Backoff, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut failures = 0;
    loop {
        let error = match operation().await {
            Ok(value) => {
                if failures > 0 {
                    debug!(failures, "Succeeded after retrying");
                }
                return Ok(value);
            }
            Err(error) => error,
        };

        failures += 1;
        if failures > backoff.retries {
            warn!(attempts = failures, %error, "Giving up");
            return Err(error);
        }

        let wait = backoff.wait(failures);
        debug!(failures, retries = backoff.retries, %error, wait_ms = wait.as_millis() as u64, "Retrying");
        tokio::time::sleep(wait).await;
    }
}

/// Uniform-ish factor in [0.5, 1.0) without pulling in an RNG crate.
fn jitter_factor() -> f64 {
    use std::collections::hash_map::RandomState;
    use std::hash::BuildHasher;

    let noise = RandomState::new().hash_one(std::time::Instant::now()) % 500;
    0.5 + noise as f64 / 1000.0
}
