use chrono::{DateTime, Utc};
use stormfeed_common::{Alert, MesoscaleDiscussion, Snapshot};

/// Human-readable `lastUpdated`, e.g. "Feb 14, 2025 at 19:44:05 UTC".
const LAST_UPDATED_FORMAT: &str = "%b %-d, %Y at %H:%M:%S UTC";

/// Assemble one cycle's snapshot. Both collections keep their order; the
/// counter only counts alerts.
pub fn build_snapshot(
    alerts: Vec<Alert>,
    discussions: Vec<MesoscaleDiscussion>,
    at: DateTime<Utc>,
) -> Snapshot {
    Snapshot {
        counter: alerts.len(),
        warnings: alerts,
        mesoscale_discussions: discussions,
        last_updated: at.format(LAST_UPDATED_FORMAT).to_string(),
        updated_at_utc: at.timestamp(),
    }
}
