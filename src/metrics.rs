//! Metric names and their one-time registration.
//! The binary installs no exporter; whoever embeds the library can install a
//! recorder (e.g. Prometheus) and the series below show up.

use metrics::{describe_counter, describe_histogram};
use once_cell::sync::OnceCell;

pub const FETCH_TOTAL: &str = "playerinfo_fetch_total";
pub const FETCH_ERRORS_TOTAL: &str = "playerinfo_fetch_errors_total";
pub const FETCH_MS: &str = "playerinfo_fetch_ms";
pub const MERGE_RUNS_TOTAL: &str = "playerinfo_merge_runs_total";
pub const MERGE_CONFLICTS_TOTAL: &str = "playerinfo_merge_conflicts_total";

/// One-time metrics registration (so series show up on /metrics).
pub fn ensure_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(FETCH_TOTAL, "Source adapter fetches attempted.");
        describe_counter!(
            FETCH_ERRORS_TOTAL,
            "Source adapter fetches that resolved to no record."
        );
        describe_histogram!(FETCH_MS, "Source adapter fetch time in milliseconds.");
        describe_counter!(MERGE_RUNS_TOTAL, "Profile merges performed.");
        describe_counter!(
            MERGE_CONFLICTS_TOTAL,
            "General fields where a later source disagreed with the kept value."
        );
    });
}
