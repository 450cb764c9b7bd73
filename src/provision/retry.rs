// ABOUTME: Bounded retry primitive used for read-after-create checks.
// ABOUTME: Fixed attempt budget with an interval that can optionally grow.

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;

/// Attempt budget and pacing for a bounded retry loop.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RetryPolicy {
    #[serde(default = "default_attempts")]
    pub attempts: u32,

    #[serde(default = "default_interval", with = "humantime_serde")]
    pub interval: Duration,

    /// Factor applied to the interval after every failed attempt.
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,

    #[serde(default = "default_max_interval", with = "humantime_serde")]
    pub max_interval: Duration,
}

fn default_attempts() -> u32 {
    10
}

fn default_interval() -> Duration {
    Duration::from_secs(5)
}

fn default_multiplier() -> f64 {
    1.0
}

fn default_max_interval() -> Duration {
    Duration::from_secs(60)
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: default_attempts(),
            interval: default_interval(),
            multiplier: default_multiplier(),
            max_interval: default_max_interval(),
        }
    }
}

impl RetryPolicy {
    /// A policy with a constant interval.
    pub fn fixed(attempts: u32, interval: Duration) -> Self {
        Self {
            attempts,
            interval,
            multiplier: 1.0,
            max_interval: interval,
        }
    }

    /// Delay to wait after a failed attempt that followed `current`.
    pub fn next_delay(&self, current: Duration) -> Duration {
        if self.multiplier <= 1.0 {
            return current;
        }
        current.mul_f64(self.multiplier).min(self.max_interval)
    }
}

/// The retry budget ran out before the probe succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("gave up after {attempts} attempts")]
pub struct RetryExhausted {
    pub attempts: u32,
}

/// Invoke `probe` until it yields `Some`, sleeping between attempts.
///
/// The probe receives the 1-based attempt number. At least one attempt is
/// always made; no sleep follows the final attempt.
pub async fn retry_until<T, F, Fut>(policy: &RetryPolicy, mut probe: F) -> Result<T, RetryExhausted>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Option<T>>,
{
    let attempts = policy.attempts.max(1);
    let mut delay = policy.interval;

    for attempt in 1..=attempts {
        if let Some(value) = probe(attempt).await {
            return Ok(value);
        }
        if attempt < attempts {
            tracing::debug!("attempt {}/{} not ready, retrying in {:?}", attempt, attempts, delay);
            tokio::time::sleep(delay).await;
            delay = policy.next_delay(delay);
        }
    }

    Err(RetryExhausted { attempts })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test(start_paused = true)]
    async fn returns_first_success() {
        let policy = RetryPolicy::fixed(5, Duration::from_secs(5));
        let start = tokio::time::Instant::now();

        let result = retry_until(&policy, |attempt| async move {
            (attempt == 3).then_some(attempt)
        })
        .await;

        assert_eq!(result, Ok(3));
        assert_eq!(start.elapsed(), Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn exhausts_budget_without_trailing_sleep() {
        let policy = RetryPolicy::fixed(4, Duration::from_secs(5));
        let calls = AtomicU32::new(0);
        let start = tokio::time::Instant::now();

        let result: Result<(), _> = retry_until(&policy, |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { None }
        })
        .await;

        assert_eq!(result, Err(RetryExhausted { attempts: 4 }));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(start.elapsed(), Duration::from_secs(15));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_attempts_still_probes_once() {
        let policy = RetryPolicy::fixed(0, Duration::from_secs(1));
        let result = retry_until(&policy, |_| async { Some("ready") }).await;
        assert_eq!(result, Ok("ready"));
    }

    #[test]
    fn backoff_grows_up_to_cap() {
        let policy = RetryPolicy {
            attempts: 5,
            interval: Duration::from_secs(2),
            multiplier: 2.0,
            max_interval: Duration::from_secs(5),
        };
        assert_eq!(policy.next_delay(Duration::from_secs(2)), Duration::from_secs(4));
        assert_eq!(policy.next_delay(Duration::from_secs(4)), Duration::from_secs(5));
    }

    #[test]
    fn default_is_ten_attempts_five_seconds_apart() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.attempts, 10);
        assert_eq!(policy.interval, Duration::from_secs(5));
        assert_eq!(policy.next_delay(policy.interval), policy.interval);
    }
}
