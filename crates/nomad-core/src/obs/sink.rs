//! Metrics sink boundary.
//!
//! Record and formatter code never touches `obs::metrics` directly; every
//! counter update flows through a [`MetricsEvent`] and a [`MetricsSink`].
use crate::obs::metrics::{self, EventReport};
use std::{cell::RefCell, rc::Rc};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<Rc<dyn MetricsSink>>> = RefCell::new(None);
}

///
/// WireFormat
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WireFormat {
    QueryString,
    Json,
}

///
/// SaveOutcome
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SaveOutcome {
    Saved,
    Deferred,
    RolledBack,
    Failed,
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug)]
pub enum MetricsEvent<'a> {
    SaveFinish {
        schema: &'a str,
        outcome: SaveOutcome,
    },
    Destroy {
        schema: &'a str,
    },
    /// A JSON document failed to parse or was not an object; the record got
    /// defaults only. Blank input is not a fallback.
    DecodeFallback {
        schema: &'a str,
        format: WireFormat,
    },
    /// One malformed entry was dropped from an otherwise usable document.
    EntryDropped {
        schema: &'a str,
        format: WireFormat,
    },
    /// An attribute name with no declared column was ignored.
    ColumnSkipped {
        schema: &'a str,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent<'_>);
}

///
/// GlobalMetricsSink
/// Default sink: folds events into the thread-local counters.
///

pub struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent<'_>) {
        match event {
            MetricsEvent::SaveFinish { schema, outcome } => {
                metrics::with_state_mut(|m| {
                    m.bump(schema, |ops| {
                        ops.save_calls = ops.save_calls.saturating_add(1);
                        match outcome {
                            SaveOutcome::Saved => {
                                ops.saves_committed = ops.saves_committed.saturating_add(1);
                            }
                            SaveOutcome::Deferred => {
                                ops.saves_deferred = ops.saves_deferred.saturating_add(1);
                            }
                            SaveOutcome::RolledBack => {
                                ops.saves_rolled_back = ops.saves_rolled_back.saturating_add(1);
                            }
                            SaveOutcome::Failed => {
                                ops.save_failures = ops.save_failures.saturating_add(1);
                            }
                        }
                    });
                });
            }

            MetricsEvent::Destroy { schema } => {
                metrics::with_state_mut(|m| {
                    m.bump(schema, |ops| {
                        ops.destroy_calls = ops.destroy_calls.saturating_add(1);
                    });
                });
            }

            MetricsEvent::DecodeFallback { schema, .. } => {
                metrics::with_state_mut(|m| {
                    m.bump(schema, |ops| {
                        ops.decode_fallbacks = ops.decode_fallbacks.saturating_add(1);
                    });
                });
            }

            MetricsEvent::EntryDropped { schema, .. } => {
                metrics::with_state_mut(|m| {
                    m.bump(schema, |ops| {
                        ops.entries_dropped = ops.entries_dropped.saturating_add(1);
                    });
                });
            }

            MetricsEvent::ColumnSkipped { schema } => {
                metrics::with_state_mut(|m| {
                    m.bump(schema, |ops| {
                        ops.columns_skipped = ops.columns_skipped.saturating_add(1);
                    });
                });
            }
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent<'_>) {
    // clone out so a sink may itself record without re-borrowing the slot
    let sink = SINK_OVERRIDE.with(|cell| cell.borrow().clone());
    match sink {
        Some(sink) => sink.record(event),
        None => GLOBAL_METRICS_SINK.record(event),
    }
}

/// Snapshot the current thread's counters.
#[must_use]
pub fn metrics_report() -> EventReport {
    metrics::report()
}

/// Reset all counters on the current thread.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override.
pub fn with_metrics_sink<T>(sink: Rc<dyn MetricsSink>, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<Rc<dyn MetricsSink>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            let prev = self.0.take();
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = prev;
            });
        }
    }

    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink));
    let _guard = Guard(prev);

    f()
}

///
/// TESTS
///
