//! Channel readings scraped from the modem's connection status page

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Label names identifying one upstream time series
pub const UPSTREAM_LABELS: [&str; 3] = ["channel", "channel_id", "us_channel_type"];

/// Label names identifying one downstream time series
pub const DOWNSTREAM_LABELS: [&str; 2] = ["channel_id", "modulation"];

/// One row of the "Upstream Bonded Channels" table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpstreamChannelReading {
    pub channel: String,
    pub channel_id: String,
    pub lock_status: String,
    pub us_channel_type: String,
    /// Hz
    pub frequency: u64,
    /// Hz
    pub width: u64,
    /// dBmV
    pub power: f64,
}

impl UpstreamChannelReading {
    /// Label values in [`UPSTREAM_LABELS`] order
    pub fn label_values(&self) -> [&str; 3] {
        [&self.channel, &self.channel_id, &self.us_channel_type]
    }
}

/// One row of the "Downstream Bonded Channels" table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DownstreamChannelReading {
    pub channel_id: String,
    pub lock_status: String,
    pub modulation: String,
    /// Hz
    pub frequency: u64,
    /// dBmV
    pub power: f64,
    /// dB
    pub snr: f64,
    pub corrected: u64,
    pub uncorrectables: u64,
}

impl DownstreamChannelReading {
    /// Label values in [`DOWNSTREAM_LABELS`] order
    pub fn label_values(&self) -> [&str; 2] {
        [&self.channel_id, &self.modulation]
    }
}

/// Both channel tables extracted from a single status document
///
/// Sequence order follows table row order. The two sequences are
/// independent: an empty upstream list says nothing about downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionStatusSnapshot {
    pub upstream: Vec<UpstreamChannelReading>,
    pub downstream: Vec<DownstreamChannelReading>,
    pub captured_at: DateTime<Utc>,
}

impl ConnectionStatusSnapshot {
    pub fn new(
        upstream: Vec<UpstreamChannelReading>,
        downstream: Vec<DownstreamChannelReading>,
    ) -> Self {
        Self {
            upstream,
            downstream,
            captured_at: Utc::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.upstream.is_empty() && self.downstream.is_empty()
    }
}

impl Default for ConnectionStatusSnapshot {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_values_follow_label_name_order() {
        let up = UpstreamChannelReading {
            channel: "1".to_string(),
            channel_id: "3".to_string(),
            us_channel_type: "SC-QAM".to_string(),
            ..Default::default()
        };
        assert_eq!(up.label_values(), ["1", "3", "SC-QAM"]);

        let down = DownstreamChannelReading {
            channel_id: "21".to_string(),
            modulation: "QAM256".to_string(),
            ..Default::default()
        };
        assert_eq!(down.label_values(), ["21", "QAM256"]);
    }

    #[test]
    fn test_default_snapshot_is_empty() {
        assert!(ConnectionStatusSnapshot::default().is_empty());
    }
}
