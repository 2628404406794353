//! Observability infrastructure for the function
//!
//! Provides:
//! - Prometheus metrics (run outcomes, tier selections, run duration)
//! - Structured JSON logging with tracing

use prometheus::{register_histogram, register_int_counter_vec, Histogram, IntCounterVec};
use std::sync::OnceLock;
use tracing::{debug, info, warn};

use crate::tier::Tier;

/// Histogram buckets for run duration (in seconds). A run does no I/O, so
/// the interesting range is well under a millisecond.
const DURATION_BUCKETS: &[f64] = &[
    0.00001, 0.00005, 0.0001, 0.00025, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.05,
];

pub mod outcomes {
    pub const SUCCESS: &str = "success";
    pub const FATAL: &str = "fatal";
}

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<FunctionMetricsInner> = OnceLock::new();

struct FunctionMetricsInner {
    runs_total: IntCounterVec,
    tier_selections_total: IntCounterVec,
    run_duration_seconds: Histogram,
}

impl FunctionMetricsInner {
    fn new() -> Self {
        Self {
            runs_total: register_int_counter_vec!(
                "function_nodepools_runs_total",
                "Number of RunFunction invocations by outcome",
                &["outcome"]
            )
            .expect("Failed to register runs_total"),

            tier_selections_total: register_int_counter_vec!(
                "function_nodepools_tier_selections_total",
                "Number of NodePools generated per tier",
                &["tier"]
            )
            .expect("Failed to register tier_selections_total"),

            run_duration_seconds: register_histogram!(
                "function_nodepools_run_duration_seconds",
                "Time spent handling a RunFunction request",
                DURATION_BUCKETS.to_vec()
            )
            .expect("Failed to register run_duration_seconds"),
        }
    }
}

/// Function metrics for Prometheus exposition
///
/// A lightweight handle to the global metrics instance; clones share the
/// same underlying metrics.
#[derive(Clone, Debug)]
pub struct FunctionMetrics {
    _private: (),
}

impl Default for FunctionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl FunctionMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(FunctionMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &FunctionMetricsInner {
        GLOBAL_METRICS.get_or_init(FunctionMetricsInner::new)
    }

    /// Record the outcome of one invocation
    pub fn inc_runs(&self, outcome: &str) {
        self.inner().runs_total.with_label_values(&[outcome]).inc();
    }

    pub fn runs(&self, outcome: &str) -> u64 {
        self.inner().runs_total.with_label_values(&[outcome]).get()
    }

    pub fn inc_tier_selection(&self, tier: Tier) {
        self.inner()
            .tier_selections_total
            .with_label_values(&[tier.as_str()])
            .inc();
    }

    pub fn tier_selections(&self, tier: Tier) -> u64 {
        self.inner()
            .tier_selections_total
            .with_label_values(&[tier.as_str()])
            .get()
    }

    pub fn observe_run_duration(&self, duration_secs: f64) {
        self.inner().run_duration_seconds.observe(duration_secs);
    }
}

/// Structured logger for function events
///
/// Keeps event names and fields consistent across the runner and the
/// binary.
#[derive(Clone, Debug)]
pub struct StructuredLogger {
    function_name: String,
}

impl StructuredLogger {
    pub fn new(function_name: impl Into<String>) -> Self {
        Self {
            function_name: function_name.into(),
        }
    }

    /// Log the start of one invocation
    pub fn log_run(&self, tag: &str) {
        info!(
            event = "function_run",
            function = %self.function_name,
            tag = %tag,
            "Running function"
        );
    }

    /// Log the echoed input of a successful read
    pub fn log_input(&self, example: &str) {
        info!(
            event = "function_input",
            function = %self.function_name,
            input = %example,
            "I was run!"
        );
    }

    /// Log the tier chosen for a NodePool
    pub fn log_tier_selected(&self, label: &str, tier: Tier, cpu: &str, memory: &str) {
        debug!(
            event = "tier_selected",
            function = %self.function_name,
            label = %label,
            tier = %tier,
            cpu_limit = %cpu,
            memory_limit = %memory,
            "Selected NodePool limits"
        );
    }

    /// Log an invocation that ended with a fatal result
    pub fn log_fatal(&self, tag: &str, message: &str) {
        warn!(
            event = "function_fatal",
            function = %self.function_name,
            tag = %tag,
            message = %message,
            "Function returned a fatal result"
        );
    }

    pub fn log_startup(&self, version: &str, address: &str, insecure: bool) {
        info!(
            event = "function_started",
            function = %self.function_name,
            version = %version,
            address = %address,
            insecure = insecure,
            "Function started"
        );
    }

    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "function_shutdown",
            function = %self.function_name,
            reason = %reason,
            "Function shutting down"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_metrics_creation() {
        let metrics = FunctionMetrics::new();
        let again = FunctionMetrics::new();

        let before = metrics.runs(outcomes::SUCCESS);
        again.inc_runs(outcomes::SUCCESS);
        assert!(metrics.runs(outcomes::SUCCESS) > before);

        let before = metrics.tier_selections(Tier::Production);
        metrics.inc_tier_selection(Tier::Production);
        assert!(metrics.tier_selections(Tier::Production) > before);

        metrics.observe_run_duration(0.0001);
    }

    #[test]
    fn test_structured_logger_creation() {
        let logger = StructuredLogger::new("function-nodepools");
        assert_eq!(logger.function_name, "function-nodepools");
    }
}
