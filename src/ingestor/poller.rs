//! Fixed-interval polling loop
//!
//! One cycle = one [`StatusSource::fetch_snapshot`] call followed by one sink
//! callback per reading. A failed cycle is logged and dropped; the next cycle
//! always starts `interval` after the previous one finished. There is no
//! backoff, jitter or retry limit, and the loop only ends when its task is
//! aborted.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, error, info};

use super::sink::ReadingSink;
use crate::errors::SourceResult;
use crate::models::ConnectionStatusSnapshot;
use crate::sources::StatusSource;

/// Summary of a successful cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleOutcome {
    pub upstream: usize,
    pub downstream: usize,
}

impl From<&ConnectionStatusSnapshot> for CycleOutcome {
    fn from(snapshot: &ConnectionStatusSnapshot) -> Self {
        Self {
            upstream: snapshot.upstream.len(),
            downstream: snapshot.downstream.len(),
        }
    }
}

pub struct Poller {
    source: Box<dyn StatusSource>,
    sink: Arc<dyn ReadingSink>,
    interval: Duration,
}

impl Poller {
    pub fn new(
        source: Box<dyn StatusSource>,
        sink: Arc<dyn ReadingSink>,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            sink,
            interval,
        }
    }

    /// Poll forever
    pub async fn run(&self) {
        info!(
            "Polling {} every {}",
            self.source.describe(),
            humantime::format_duration(self.interval)
        );

        loop {
            let started = Instant::now();
            match self.run_cycle().await {
                Ok(snapshot) => {
                    let outcome = CycleOutcome::from(&snapshot);
                    debug!(
                        upstream = outcome.upstream,
                        downstream = outcome.downstream,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Poll cycle completed"
                    );
                }
                Err(e) => {
                    error!("Poll of {} failed: {}", self.source.describe(), e);
                }
            }
            tokio::time::sleep(self.interval).await;
        }
    }

    /// Run exactly one cycle and hand its readings to the sink
    ///
    /// The snapshot is returned as well so callers can inspect or print it.
    pub async fn run_cycle(&self) -> SourceResult<ConnectionStatusSnapshot> {
        let snapshot = match self.source.fetch_snapshot().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                self.sink.cycle_completed(false);
                return Err(e);
            }
        };

        self.sink.cycle_started();
        for reading in &snapshot.upstream {
            self.sink.on_upstream_reading(reading);
        }
        for reading in &snapshot.downstream {
            self.sink.on_downstream_reading(reading);
        }
        self.sink.cycle_completed(true);

        Ok(snapshot)
    }
}
