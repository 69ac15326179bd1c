//! Eviction policy for landed and lost flights.

use chrono::Duration;

/// Limits applied by [`Sequence::cleanup`](super::Sequence::cleanup).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanupPolicy {
    /// Landed flights beyond this count are evicted, oldest first.
    pub max_landed_flights: usize,
    /// Landed flights are evicted this long after their landing time.
    pub landed_timeout: Duration,
    /// Flights without a position report for this long are evicted.
    pub lost_timeout: Duration,
}

impl Default for CleanupPolicy {
    fn default() -> Self {
        Self {
            max_landed_flights: 5,
            landed_timeout: Duration::minutes(10),
            lost_timeout: Duration::minutes(5),
        }
    }
}
