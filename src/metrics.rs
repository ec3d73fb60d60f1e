// src/metrics.rs
//! Counter registration. The crate only records; whatever exporter the host
//! installs picks these up.

use metrics::describe_counter;
use once_cell::sync::OnceCell;

/// One-time metric descriptions so series carry help text wherever they land.
pub fn ensure_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("relay_fetch_total", "Successful source fetches.");
        describe_counter!("relay_fetch_errors_total", "Failed source fetch attempts.");
        describe_counter!("relay_cache_hits_total", "Fresh cache hits.");
        describe_counter!(
            "relay_cache_refresh_total",
            "Cache refreshes from a live fetch."
        );
        describe_counter!(
            "relay_cache_stale_served_total",
            "Stale entries served after a failed fetch."
        );
    });
}
