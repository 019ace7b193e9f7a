//! Prometheus metrics sink
//!
//! Channel readings land in gauge vectors keyed by their label sets, on a
//! registry owned by this struct rather than the process-global default one.
//! The same instance is shared between the poller (writer) and the `/metrics`
//! handler (reader); the `prometheus` collectors synchronise internally.
//!
//! With stale-series eviction enabled, label sets missing from a successful
//! poll are removed once that poll has completed. Series are never cleared
//! up front, so a scrape racing a poll still sees every channel.

use prometheus::{Encoder, GaugeVec, IntCounter, IntGauge, Opts, Registry, TextEncoder};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

use crate::ingestor::ReadingSink;
use crate::models::{
    DOWNSTREAM_LABELS, DownstreamChannelReading, UPSTREAM_LABELS, UpstreamChannelReading,
};

pub const NAMESPACE: &str = "arris_surfboard";

/// Content type of the text exposition format
pub const TEXT_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

#[derive(Clone)]
pub struct ExporterMetrics {
    registry: Arc<Registry>,
    evict_stale_series: bool,
    upstream_power: GaugeVec,
    downstream_power: GaugeVec,
    downstream_snr: GaugeVec,
    downstream_corrected: GaugeVec,
    downstream_uncorrectables: GaugeVec,
    scrape_success: IntGauge,
    scrape_failures: IntCounter,
    series: Arc<Mutex<SeriesTracker>>,
}

type LabelSet = Vec<String>;

/// Label sets reported by the last completed poll and by the one in flight
#[derive(Default)]
struct SeenLabels {
    previous: HashSet<LabelSet>,
    current: HashSet<LabelSet>,
}

impl SeenLabels {
    fn record(&mut self, labels: &[&str]) {
        self.current
            .insert(labels.iter().map(|label| label.to_string()).collect());
    }

    /// Promote the in-flight label sets and return the ones that disappeared
    fn finish(&mut self) -> Vec<LabelSet> {
        let current = std::mem::take(&mut self.current);
        let stale = self.previous.difference(&current).cloned().collect();
        self.previous = current;
        stale
    }
}

#[derive(Default)]
struct SeriesTracker {
    upstream: SeenLabels,
    downstream: SeenLabels,
}

impl ExporterMetrics {
    /// Create the collectors and register them with a fresh registry
    ///
    /// # Errors
    ///
    /// Returns an error if registration fails (e.g. duplicate names).
    pub fn new(evict_stale_series: bool) -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let upstream_power = GaugeVec::new(
            Opts::new("upstream_power", "Upstream channel transmit power in dBmV")
                .namespace(NAMESPACE),
            &UPSTREAM_LABELS,
        )?;
        let downstream_power = GaugeVec::new(
            Opts::new("downstream_power", "Downstream channel receive power in dBmV")
                .namespace(NAMESPACE),
            &DOWNSTREAM_LABELS,
        )?;
        let downstream_snr = GaugeVec::new(
            Opts::new("downstream_snr", "Downstream channel signal to noise ratio in dB")
                .namespace(NAMESPACE),
            &DOWNSTREAM_LABELS,
        )?;
        let downstream_corrected = GaugeVec::new(
            Opts::new(
                "downstream_corrected",
                "Downstream channel corrected codewords",
            )
            .namespace(NAMESPACE),
            &DOWNSTREAM_LABELS,
        )?;
        let downstream_uncorrectables = GaugeVec::new(
            Opts::new(
                "downstream_uncorrectables",
                "Downstream channel uncorrectable codewords",
            )
            .namespace(NAMESPACE),
            &DOWNSTREAM_LABELS,
        )?;

        let scrape_success = IntGauge::with_opts(
            Opts::new(
                "scrape_success",
                "Whether the last poll of the modem succeeded (1) or failed (0)",
            )
            .namespace(NAMESPACE),
        )?;
        let scrape_failures = IntCounter::with_opts(
            Opts::new("scrape_failures_total", "Number of failed modem polls")
                .namespace(NAMESPACE),
        )?;

        registry.register(Box::new(upstream_power.clone()))?;
        registry.register(Box::new(downstream_power.clone()))?;
        registry.register(Box::new(downstream_snr.clone()))?;
        registry.register(Box::new(downstream_corrected.clone()))?;
        registry.register(Box::new(downstream_uncorrectables.clone()))?;
        registry.register(Box::new(scrape_success.clone()))?;
        registry.register(Box::new(scrape_failures.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            evict_stale_series,
            upstream_power,
            downstream_power,
            downstream_snr,
            downstream_corrected,
            downstream_uncorrectables,
            scrape_success,
            scrape_failures,
            series: Arc::new(Mutex::new(SeriesTracker::default())),
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Render every registered collector in the Prometheus text format
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    fn series(&self) -> MutexGuard<'_, SeriesTracker> {
        self.series.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn evict_missing_series(&self) {
        let (upstream, downstream) = {
            let mut series = self.series();
            (series.upstream.finish(), series.downstream.finish())
        };
        if upstream.is_empty() && downstream.is_empty() {
            return;
        }
        debug!(
            upstream = upstream.len(),
            downstream = downstream.len(),
            "Evicting channel series missing from the last poll"
        );

        for labels in &upstream {
            remove_series(&self.upstream_power, labels);
        }
        for labels in &downstream {
            for gauge in [
                &self.downstream_power,
                &self.downstream_snr,
                &self.downstream_corrected,
                &self.downstream_uncorrectables,
            ] {
                remove_series(gauge, labels);
            }
        }
    }
}

fn remove_series(gauge: &GaugeVec, labels: &[String]) {
    let values: Vec<&str> = labels.iter().map(String::as_str).collect();
    if let Err(e) = gauge.remove_label_values(&values) {
        warn!("Failed to remove series {:?}: {}", values, e);
    }
}

impl ReadingSink for ExporterMetrics {
    fn on_upstream_reading(&self, reading: &UpstreamChannelReading) {
        let labels = reading.label_values();
        self.upstream_power
            .with_label_values(&labels)
            .set(reading.power);
        if self.evict_stale_series {
            self.series().upstream.record(&labels);
        }
    }

    fn on_downstream_reading(&self, reading: &DownstreamChannelReading) {
        let labels = reading.label_values();
        self.downstream_power
            .with_label_values(&labels)
            .set(reading.power);
        self.downstream_snr.with_label_values(&labels).set(reading.snr);
        self.downstream_corrected
            .with_label_values(&labels)
            .set(reading.corrected as f64);
        self.downstream_uncorrectables
            .with_label_values(&labels)
            .set(reading.uncorrectables as f64);
        if self.evict_stale_series {
            self.series().downstream.record(&labels);
        }
    }

    fn cycle_started(&self) {
        if self.evict_stale_series {
            let mut series = self.series();
            series.upstream.current.clear();
            series.downstream.current.clear();
        }
    }

    fn cycle_completed(&self, success: bool) {
        if success {
            if self.evict_stale_series {
                self.evict_missing_series();
            }
            self.scrape_success.set(1);
        } else {
            self.scrape_success.set(0);
            self.scrape_failures.inc();
        }
    }
}
