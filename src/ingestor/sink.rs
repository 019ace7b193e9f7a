//! Reading sink boundary

use crate::models::{DownstreamChannelReading, UpstreamChannelReading};

/// Receives every reading of every successful poll, in table order
///
/// Upstream readings of a cycle are delivered before its downstream
/// readings. The cycle hooks let a sink publish poll health or clear state;
/// both default to no-ops.
pub trait ReadingSink: Send + Sync {
    fn on_upstream_reading(&self, reading: &UpstreamChannelReading);

    fn on_downstream_reading(&self, reading: &DownstreamChannelReading);

    /// Called after a successful fetch, before the first reading of the cycle
    fn cycle_started(&self) {}

    /// Called once per cycle with its outcome
    fn cycle_completed(&self, _success: bool) {}
}

/// Adapter turning a pair of callbacks into a [`ReadingSink`]
pub struct CallbackSink<U, D>
where
    U: Fn(&UpstreamChannelReading) + Send + Sync,
    D: Fn(&DownstreamChannelReading) + Send + Sync,
{
    upstream: U,
    downstream: D,
}

impl<U, D> CallbackSink<U, D>
where
    U: Fn(&UpstreamChannelReading) + Send + Sync,
    D: Fn(&DownstreamChannelReading) + Send + Sync,
{
    pub fn new(upstream: U, downstream: D) -> Self {
        Self {
            upstream,
            downstream,
        }
    }
}

impl<U, D> ReadingSink for CallbackSink<U, D>
where
    U: Fn(&UpstreamChannelReading) + Send + Sync,
    D: Fn(&DownstreamChannelReading) + Send + Sync,
{
    fn on_upstream_reading(&self, reading: &UpstreamChannelReading) {
        (self.upstream)(reading)
    }

    fn on_downstream_reading(&self, reading: &DownstreamChannelReading) {
        (self.downstream)(reading)
    }
}
