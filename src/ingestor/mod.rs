//! Polling of the modem and hand-off of readings to a sink

pub mod poller;
pub mod sink;

pub use poller::{CycleOutcome, Poller};
pub use sink::{CallbackSink, ReadingSink};
