use crate::{
    config::{CoreConfig, MissingStrategyPolicy},
    error::{ErrorClass, InternalError},
    model::{ColumnType, Schema},
    obs::{metrics_report, metrics_reset_all},
    persist::{RecordState, SaveStatus, Transacted, TransactionHook},
    record::Record,
    value::Value,
};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

fn widget() -> Arc<Schema> {
    Schema::builder("Widget")
        .attribute("name", ColumnType::ShortText)
        .build()
        .unwrap()
}

///
/// CountingTransaction
///

#[derive(Default)]
struct CountingTransaction {
    opened: Arc<AtomicUsize>,
}

impl TransactionHook for CountingTransaction {
    fn transaction(
        &self,
        block: &mut dyn FnMut() -> Result<(), InternalError>,
    ) -> Result<(), InternalError> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        block()
    }
}

///
/// DeferringTransaction
///
/// Returns without running the block.
///

struct DeferringTransaction;

impl TransactionHook for DeferringTransaction {
    fn transaction(
        &self,
        _block: &mut dyn FnMut() -> Result<(), InternalError>,
    ) -> Result<(), InternalError> {
        Ok(())
    }
}

///
/// AbortingTransaction
///

struct AbortingTransaction;

impl TransactionHook for AbortingTransaction {
    fn transaction(
        &self,
        _block: &mut dyn FnMut() -> Result<(), InternalError>,
    ) -> Result<(), InternalError> {
        Err(InternalError::transaction_aborted())
    }
}

#[test]
fn save_without_strategy_raises_no_strategy() {
    let mut record = Record::new(&widget());

    let err = record.save().unwrap_err();
    assert!(err.is_no_strategy());
    assert_eq!(err.class, ErrorClass::Unsupported);
    assert!(err.message.contains("to_save"));
    assert_eq!(record.state(), RecordState::Failed);
}

#[test]
fn succeed_policy_saves_without_strategy() {
    let schema = Schema::builder("Widget")
        .config(
            CoreConfig::default().with_missing_save_strategy(MissingStrategyPolicy::Succeed),
        )
        .build()
        .unwrap();
    let mut record = Record::new(&schema);

    assert_eq!(record.save().unwrap(), SaveStatus::Saved);
    assert_eq!(record.state(), RecordState::Saved);
}

#[test]
fn save_strategy_receives_the_record() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut record = Record::from_values(&widget(), [("name", "gear")]).unwrap();

    let sink = Arc::clone(&seen);
    record.to_save(move |r| {
        sink.lock().unwrap().push(r.get("name").cloned());
        Ok(())
    });

    assert!(record.has_save_strategy());
    assert_eq!(record.save().unwrap(), SaveStatus::Saved);
    assert_eq!(record.state(), RecordState::Saved);
    assert_eq!(*seen.lock().unwrap(), [Some(Value::from("gear"))]);
}

#[test]
fn schema_persist_hook_is_used_without_record_strategy() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let schema = Schema::builder("Widget")
        .persist_with(move |_: &Record| -> Result<(), InternalError> {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .build()
        .unwrap();

    let mut record = Record::new(&schema);
    record.save().unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // a record strategy takes precedence over the hook
    record.to_save(|_| Ok(()));
    record.save().unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn subtype_inherits_persist_hook() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let parent = Schema::builder("Parent")
        .persist_with(move |_: &Record| -> Result<(), InternalError> {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .build()
        .unwrap();
    let child = parent.extend("Child").build().unwrap();

    Record::new(&child).save().unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn save_runs_inside_the_transaction_hook() {
    let hook = CountingTransaction::default();
    let opened = Arc::clone(&hook.opened);
    let schema = Schema::builder("Widget")
        .transaction_with(hook)
        .build()
        .unwrap();

    let mut record = Record::new(&schema);
    record.to_save(|_| Ok(()));
    record.save().unwrap();
    record.save().unwrap();

    assert_eq!(opened.load(Ordering::SeqCst), 2);
}

#[test]
fn rollback_signal_is_swallowed() {
    metrics_reset_all();
    let mut record = Record::new(&widget());
    record.to_save(|_| Err(InternalError::transaction_aborted()));

    assert_eq!(record.save().unwrap(), SaveStatus::RolledBack);
    assert_eq!(record.state(), RecordState::Unsaved);

    let ops = metrics_report().ops;
    assert_eq!(ops.save_calls, 1);
    assert_eq!(ops.saves_rolled_back, 1);
}

#[test]
fn hook_that_skips_the_block_defers_the_save() {
    metrics_reset_all();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let schema = Schema::builder("Widget")
        .transaction_with(DeferringTransaction)
        .build()
        .unwrap();

    let mut record = Record::new(&schema);
    record.to_save(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });

    assert_eq!(record.save().unwrap(), SaveStatus::Deferred);
    assert_eq!(record.state(), RecordState::Unsaved);
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let ops = metrics_report().ops;
    assert_eq!(ops.save_calls, 1);
    assert_eq!(ops.saves_deferred, 1);
    assert_eq!(ops.saves_rolled_back, 0);
    assert_eq!(ops.saves_committed, 0);
}

#[test]
fn hook_raising_rollback_itself_rolls_back() {
    metrics_reset_all();
    let schema = Schema::builder("Widget")
        .transaction_with(AbortingTransaction)
        .build()
        .unwrap();

    let mut record = Record::new(&schema);
    record.to_save(|_| Ok(()));

    assert_eq!(record.save().unwrap(), SaveStatus::RolledBack);
    assert_eq!(record.state(), RecordState::Unsaved);

    let ops = metrics_report().ops;
    assert_eq!(ops.saves_rolled_back, 1);
    assert_eq!(ops.saves_deferred, 0);
}

#[test]
fn other_strategy_errors_propagate() {
    metrics_reset_all();
    let mut record = Record::new(&widget());
    record.to_save(|_| Err(InternalError::strategy("disk full")));

    let err = record.save().unwrap_err();
    assert_eq!(err.message, "disk full");
    assert_eq!(record.state(), RecordState::Failed);
    assert_eq!(metrics_report().ops.save_failures, 1);
}

#[test]
fn transaction_returns_block_output() {
    let record = Record::new(&widget());

    assert_eq!(record.transaction(|| Ok(5)).unwrap(), Transacted::Ran(5));
    assert_eq!(
        record
            .transaction(|| Err::<i32, _>(InternalError::transaction_aborted()))
            .unwrap(),
        Transacted::RolledBack
    );
    assert!(
        record
            .transaction(|| Err::<i32, _>(InternalError::strategy("boom")))
            .is_err()
    );

    let skipping = Schema::builder("Widget")
        .transaction_with(DeferringTransaction)
        .build()
        .unwrap();
    let outcome = Record::new(&skipping).transaction(|| Ok(5)).unwrap();
    assert_eq!(outcome, Transacted::Skipped);
    assert_eq!(outcome.output(), None);
}

#[test]
fn destroy_without_strategy_is_a_no_op() {
    let mut record = Record::new(&widget());

    record.destroy().unwrap();
    assert_eq!(record.state(), RecordState::Unsaved);
    assert!(!record.has_destroy_strategy());
}

#[test]
fn destroy_strategy_runs_and_chains() {
    metrics_reset_all();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let mut record = Record::new(&widget());
    record.to_destroy(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });

    let state = record.destroy().unwrap().state();
    assert_eq!(state, RecordState::Destroyed);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(metrics_report().ops.destroy_calls, 1);
}

#[test]
fn destroy_errors_propagate() {
    let mut record = Record::new(&widget());
    record.to_destroy(|_| Err(InternalError::strategy("locked")));

    assert!(record.destroy().is_err());
    assert_eq!(record.state(), RecordState::Unsaved);
}

#[test]
fn cloned_records_share_strategies() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let mut record = Record::new(&widget());
    record.to_save(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });
    let mut copy = record.clone();

    record.save().unwrap();
    copy.save().unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}
