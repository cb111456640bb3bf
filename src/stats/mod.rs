//! Terminal-result reporting.
//!
//! ```text
//! Outcome ──StatRecord::new──▶ StatRecord ──▶ StatsReporter::report
//!                                              ├─ FireAndForget<HttpStatsReporter>  (stats.enabled)
//!                                              └─ DisabledReporter                  (otherwise)
//! ```

pub mod fallback;
pub mod record;
pub mod reporter;

use std::sync::Arc;

pub use fallback::FireAndForget;
pub use record::{ResultTag, StatRecord};
pub use reporter::{DisabledReporter, HttpStatsReporter, ReportError, StatsReporter};

use crate::config::StatsConfig;

/// Reporter selected by `config.enabled`.  Never returns errors.
pub fn reporter_from_config(config: &StatsConfig) -> Arc<dyn StatsReporter> {
    if config.enabled {
        Arc::new(FireAndForget::new(HttpStatsReporter::from_config(config)))
    } else {
        Arc::new(DisabledReporter)
    }
}
