//! Source trait definitions

use async_trait::async_trait;

use crate::errors::SourceResult;
use crate::models::ConnectionStatusSnapshot;

/// Something that can be polled for the modem's current channel status
///
/// Every call is a complete, independent attempt: implementations must not
/// require the caller to sequence login and fetch, and any failure means
/// "this poll failed, try again later".
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Fetch and extract a fresh snapshot
    async fn fetch_snapshot(&self) -> SourceResult<ConnectionStatusSnapshot>;

    /// Human-readable, credential-free description for log lines
    fn describe(&self) -> String;
}
