use parking_lot::Mutex;
use std::{
    thread,
    time::{Duration, Instant},
};

/// Enforces a minimum delay between consecutive calls
/// to a single external provider.
///
/// Every import owns its limiters, there is no global state.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    next_allowed_call: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            next_allowed_call: Mutex::new(None),
        }
    }

    pub fn unlimited() -> Self {
        Self::new(Duration::ZERO)
    }

    pub const fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Block until the next call is allowed and reserve the slot.
    ///
    /// Must be invoked immediately before each actual call.
    pub fn wait(&self) {
        let mut next_allowed_call = self.next_allowed_call.lock();
        if let Some(next) = *next_allowed_call {
            let now = Instant::now();
            if next > now {
                let delay = next - now;
                log::debug!("Rate limit: waiting {} ms", delay.as_millis());
                thread::sleep(delay);
            }
        }
        *next_allowed_call = Some(Instant::now() + self.min_interval);
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::unlimited()
    }
}
