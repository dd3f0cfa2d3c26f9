//! Observability: runtime counters and the sink they flow through.

pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::{EventOps, EventReport};
pub use sink::{
    MetricsEvent, MetricsSink, SaveOutcome, WireFormat, metrics_report, metrics_reset_all,
    with_metrics_sink,
};
