//! Background scheduling tick.
//!
//! # Example
//!
//! ```ignore
//! use arrivalseq::service::SequencerDaemon;
//!
//! let daemon = SequencerDaemon::new(Arc::clone(&service))
//!     .with_tick_interval(settings.scheduler.tick_interval());
//!
//! tokio::spawn(daemon.run(shutdown_token));
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::manager::SequencerService;
use crate::config::DEFAULT_TICK_INTERVAL_SECS;

/// Periodically ticks every airport in a [`SequencerService`].
pub struct SequencerDaemon {
    service: Arc<SequencerService>,
    tick_interval: Duration,
}

impl SequencerDaemon {
    /// Creates a daemon with the default tick interval.
    pub fn new(service: Arc<SequencerService>) -> Self {
        Self {
            service,
            tick_interval: Duration::from_secs(DEFAULT_TICK_INTERVAL_SECS),
        }
    }

    /// Sets a custom tick interval.
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Runs until shutdown is signalled.
    ///
    /// The first tick fires immediately so a freshly started instance
    /// publishes a schedule without waiting a full interval.
    pub async fn run(self, shutdown: CancellationToken) {
        info!(
            tick_interval_secs = self.tick_interval.as_secs(),
            airports = ?self.service.airports(),
            "Sequencer daemon starting"
        );

        let mut interval = tokio::time::interval(self.tick_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                _ = shutdown.cancelled() => {
                    info!("Sequencer daemon shutting down");
                    break;
                }

                _ = interval.tick() => {
                    let snapshots = self.service.tick_all();
                    debug!(
                        airports = snapshots.len(),
                        flights = snapshots.iter().map(|s| s.flights.len()).sum::<usize>(),
                        "Tick complete"
                    );
                }
            }
        }
    }
}
