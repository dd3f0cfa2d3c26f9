use serde::{Deserialize, Serialize};
use std::{cell::RefCell, collections::BTreeMap};

///
/// EventState
/// Ephemeral, in-memory counters for record operations.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventState {
    pub ops: EventOps,
    pub schemas: BTreeMap<String, EventOps>,
}

impl EventState {
    /// Apply `bump` to the global counters and to the named schema's.
    pub(crate) fn bump(&mut self, schema: &str, bump: impl Fn(&mut EventOps)) {
        bump(&mut self.ops);
        bump(self.schemas.entry(schema.to_string()).or_default());
    }
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventOps {
    // persistence
    pub save_calls: u64,
    pub saves_committed: u64,
    pub saves_deferred: u64,
    pub saves_rolled_back: u64,
    pub save_failures: u64,
    pub destroy_calls: u64,

    // decoding
    pub decode_fallbacks: u64,
    pub entries_dropped: u64,
    pub columns_skipped: u64,
}

///
/// EventReport
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventReport {
    pub ops: EventOps,

    /// Per-schema counters, keyed by schema name.
    pub schemas: BTreeMap<String, EventOps>,
}

impl EventReport {
    #[must_use]
    pub fn schema(&self, name: &str) -> Option<&EventOps> {
        self.schemas.get(name)
    }
}

thread_local! {
    static EVENT_STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&m.borrow()))
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&mut m.borrow_mut()))
}

pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}

pub(crate) fn report() -> EventReport {
    with_state(|m| EventReport {
        ops: m.ops.clone(),
        schemas: m.schemas.clone(),
    })
}
