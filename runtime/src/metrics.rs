//! Metric names and descriptions for the store and storage layers.
//!
//! The runtime records through the [`metrics`] facade only. Whichever
//! recorder the host installs (Prometheus exporter, a test recorder, or none)
//! receives the values; without a recorder every call is a no-op.
//!
//! # Example
//!
//! ```
//! tasklist_runtime::metrics::register_metrics();
//! tasklist_runtime::metrics::counter!(tasklist_runtime::metrics::ACTIONS_TOTAL).increment(1);
//! ```

use metrics::{describe_counter, describe_histogram};

// Re-export metrics macros for use in other crates
pub use metrics::{counter, histogram};

/// Actions processed by a store, including fed-back actions.
pub const ACTIONS_TOTAL: &str = "store.actions.total";

/// Effects executed by a store, labelled by `type`.
pub const EFFECTS_EXECUTED: &str = "store.effects.executed";

/// Reducer wall time per action.
pub const REDUCER_DURATION: &str = "store.reducer.duration_seconds";

/// Actions rejected because a feedback chain ran too long.
pub const FEEDBACK_LIMIT_HIT: &str = "store.feedback.limit_exceeded";

/// Bytes written through `FileKeyValueStore`.
pub const FILE_BYTES_WRITTEN: &str = "storage.file.bytes_written";

/// Writes rejected by the configured quota.
pub const FILE_QUOTA_REJECTIONS: &str = "storage.file.quota_rejections";

/// Register all metric descriptions with the installed recorder.
///
/// Safe to call more than once.
pub fn register_metrics() {
    // Store Metrics
    describe_counter!(
        ACTIONS_TOTAL,
        "Total number of actions processed by the store"
    );
    describe_counter!(
        EFFECTS_EXECUTED,
        "Total number of effects executed, by effect type"
    );
    describe_histogram!(
        REDUCER_DURATION,
        "Time taken to execute the reducer for one action"
    );
    describe_counter!(
        FEEDBACK_LIMIT_HIT,
        "Number of sends aborted because effects kept feeding actions back"
    );

    // Storage Metrics
    describe_counter!(
        FILE_BYTES_WRITTEN,
        "Total bytes written to file-backed slots"
    );
    describe_counter!(
        FILE_QUOTA_REJECTIONS,
        "Number of writes rejected by the storage quota"
    );
}
