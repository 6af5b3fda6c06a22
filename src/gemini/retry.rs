use std::time::Duration;

/// Attempt budget and backoff schedule for completion requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: usize,
    /// Delay after the n-th failed attempt; the last entry repeats
    pub delays: Vec<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delays: vec![
                Duration::from_secs(2),
                Duration::from_secs(5),
                Duration::from_secs(10),
            ],
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: usize, delays: Vec<Duration>) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delays,
        }
    }

    /// Delay to wait after failed attempt `attempt` (1-based).
    pub fn delay_after(&self, attempt: usize) -> Duration {
        let index = attempt.saturating_sub(1);
        self.delays
            .get(index)
            .or_else(|| self.delays.last())
            .copied()
            .unwrap_or(Duration::ZERO)
    }

    /// Whether another attempt is allowed after `attempt` attempts.
    pub fn can_retry(&self, attempt: usize) -> bool {
        attempt < self.max_attempts
    }

    /// The full sequence of sleeps performed when every attempt fails.
    pub fn schedule(&self) -> Vec<Duration> {
        (1..self.max_attempts).map(|n| self.delay_after(n)).collect()
    }
}
