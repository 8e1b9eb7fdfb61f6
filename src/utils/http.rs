//! HTTP utilities with retry logic and rate limiting
//!
//! Provides exponential backoff and a sliding-window rate limiter for calls
//! to the hosted backend.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Rate limiter for API endpoints
pub struct RateLimiter {
    /// Window size in seconds
    window_secs: u64,
    /// Maximum requests per window
    max_requests: u32,
    /// Request timestamps per endpoint
    requests: Arc<Mutex<HashMap<String, Vec<Instant>>>>,
}

impl RateLimiter {
    /// Create a new rate limiter
    ///
    /// # Arguments
    /// * `window_secs` - Time window in seconds
    /// * `max_requests` - Maximum requests allowed per window
    pub fn new(window_secs: u64, max_requests: u32) -> Self {
        Self {
            window_secs,
            max_requests,
            requests: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Check if a request can be made and record it
    ///
    /// # Returns
    /// * `true` if request is allowed
    /// * `false` if rate limit exceeded
    pub async fn check_and_record(&self, endpoint: &str) -> bool {
        let mut requests = self.requests.lock().await;
        let now = Instant::now();
        let window = Duration::from_secs(self.window_secs);

        let timestamps = requests.entry(endpoint.to_string()).or_default();
        timestamps.retain(|t| now.duration_since(*t) < window);

        if timestamps.len() >= self.max_requests as usize {
            debug!(
                "Rate limit hit for {}: {} requests in {} seconds",
                endpoint,
                timestamps.len(),
                self.window_secs
            );
            return false;
        }

        timestamps.push(now);
        true
    }

    /// Wait until a request can be made
    pub async fn wait_for_slot(&self, endpoint: &str) {
        loop {
            if self.check_and_record(endpoint).await {
                return;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }
}

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retries
    pub max_retries: u32,
    /// Initial backoff duration
    pub initial_backoff: Duration,
    /// Maximum backoff duration
    pub max_backoff: Duration,
    /// Backoff multiplier (exponential factor)
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(30),
            multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// No retries at all; used for writes the caller must not see duplicated
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Calculate backoff duration for a given attempt (0-indexed)
    pub fn backoff_for_attempt(&self, attempt: u32) -> Duration {
        let backoff_ms =
            self.initial_backoff.as_millis() as f64 * self.multiplier.powi(attempt as i32);
        let backoff = Duration::from_millis(backoff_ms as u64);
        backoff.min(self.max_backoff)
    }
}

/// Execute an async function with exponential backoff retry
///
/// `should_retry` decides whether a given error is worth another attempt.
/// The last error is returned once retries are exhausted.
pub async fn with_retry<T, E, F, Fut, R>(
    config: &RetryConfig,
    operation_name: &str,
    mut operation: F,
    should_retry: R,
) -> Result<T, E>
where
    E: std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    R: Fn(&E) -> bool,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(result) => {
                if attempt > 0 {
                    debug!("{} succeeded on attempt {}", operation_name, attempt + 1);
                }
                return Ok(result);
            }
            Err(e) if attempt < config.max_retries && should_retry(&e) => {
                let backoff = config.backoff_for_attempt(attempt);
                warn!(
                    "{} failed (attempt {}): {}. Retrying in {:?}",
                    operation_name,
                    attempt + 1,
                    e,
                    backoff
                );
                tokio::time::sleep(backoff).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Default rate limiters for the hosted backend
pub mod rate_limiters {
    use super::RateLimiter;
    use once_cell::sync::Lazy;

    /// Hosted backend REST API: stay well under the free tier's burst limit
    pub static BACKEND: Lazy<RateLimiter> = Lazy::new(|| RateLimiter::new(1, 20));
}
