//! Fire-and-forget wrapper: delivery failures are logged and swallowed.
//!
//! Gameplay never depends on the stats service being reachable.  A failed
//! report is not retried; the engine's latch already guarantees the record
//! is only attempted once.

use async_trait::async_trait;

use super::reporter::{ReportError, StatsReporter};
use super::StatRecord;

/// Wraps any [`StatsReporter`] and always returns `Ok(())`.
pub struct FireAndForget<R: StatsReporter> {
    inner: R,
}

impl<R: StatsReporter> FireAndForget<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }
}

#[async_trait]
impl<R: StatsReporter> StatsReporter for FireAndForget<R> {
    async fn report(&self, record: &StatRecord) -> Result<(), ReportError> {
        if let Err(err) = self.inner.report(record).await {
            log::warn!("stats: dropping {record}: {err}");
        }
        Ok(())
    }
}
