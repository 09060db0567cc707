//! Per-client login attempt throttle.
//!
//! A sliding window of attempt timestamps is kept for each client key (the
//! peer IP). Once a client has `max_attempts` attempts inside the window,
//! further attempts are refused until the oldest one ages out. Refused
//! attempts are not recorded.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use serde_json::json;
use tracing::warn;

use crate::domain::Error;

/// Sliding-window attempt counter shared by all workers.
pub struct LoginThrottle {
    max_attempts: usize,
    window: TimeDelta,
    clock: Arc<dyn Clock>,
    attempts: Mutex<HashMap<String, VecDeque<DateTime<Utc>>>>,
}

impl LoginThrottle {
    /// Allow `max_attempts` per client within `window_secs` seconds.
    pub fn new(max_attempts: u32, window_secs: u64, clock: Arc<dyn Clock>) -> Self {
        let window = i64::try_from(window_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::MAX);
        Self {
            max_attempts: usize::try_from(max_attempts).unwrap_or(usize::MAX),
            window,
            clock,
            attempts: Mutex::new(HashMap::new()),
        }
    }

    /// Record an attempt for `client`, or refuse it with `too_many_requests`.
    pub fn check(&self, client: &str) -> Result<(), Error> {
        let now = self.clock.utc();
        let cutoff = now
            .checked_sub_signed(self.window)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let mut attempts = self
            .attempts
            .lock()
            .map_err(|_| Error::internal("login throttle mutex poisoned"))?;

        // Drop clients whose whole history has aged out.
        attempts.retain(|_, history| {
            while history.front().is_some_and(|at| *at <= cutoff) {
                history.pop_front();
            }
            !history.is_empty()
        });

        let history = attempts.entry(client.to_owned()).or_default();
        if history.len() >= self.max_attempts {
            let retry_after = history
                .front()
                .and_then(|oldest| oldest.checked_add_signed(self.window))
                .map_or(1, |expires| (expires - now).num_seconds().max(1));
            warn!(client, "login attempts throttled");
            return Err(Error::too_many_requests(
                "too many login attempts, try again later",
            )
            .with_details(json!({ "retryAfterSecs": retry_after })));
        }
        history.push_back(now);
        Ok(())
    }
}
