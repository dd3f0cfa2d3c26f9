//! Persistence indirection.
//!
//! A record never knows how it is stored. `save` resolves, in order, the
//! record's own save strategy, the schema's [`Persist`] hook and finally the
//! configured [`MissingStrategyPolicy`]. The schema's [`TransactionHook`]
//! wraps the whole attempt.

#[cfg(test)]
mod tests;

use crate::{
    config::MissingStrategyPolicy,
    error::{ErrorClass, ErrorOrigin, InternalError},
    obs::sink::{self, MetricsEvent, SaveOutcome},
    record::Record,
};
use std::sync::Arc;
use thiserror::Error as ThisError;

///
/// PersistError
///

#[derive(Debug, ThisError)]
pub enum PersistError {
    #[error("no persistence strategy for '{schema}' - use to_save to define one")]
    NoStrategy { schema: String },

    /// Raised inside a transaction to roll it back quietly.
    #[error("transaction aborted")]
    TransactionAborted,
}

/// A stored per-record save or destroy action.
pub type Strategy = Arc<dyn Fn(&Record) -> Result<(), InternalError> + Send + Sync>;

///
/// Persist
///
/// Type-level persistence shared by every record of a schema.
///

pub trait Persist: Send + Sync {
    fn persist(&self, record: &Record) -> Result<(), InternalError>;
}

impl<F> Persist for F
where
    F: Fn(&Record) -> Result<(), InternalError> + Send + Sync,
{
    fn persist(&self, record: &Record) -> Result<(), InternalError> {
        self(record)
    }
}

///
/// TransactionHook
///
/// Wraps one unit of persistence work. The default runs the block directly;
/// a storage layer overrides it to open and commit a real transaction.
///

pub trait TransactionHook: Send + Sync {
    fn transaction(
        &self,
        block: &mut dyn FnMut() -> Result<(), InternalError>,
    ) -> Result<(), InternalError> {
        block()
    }
}

///
/// DirectTransaction
///

#[derive(Clone, Copy, Debug, Default)]
pub struct DirectTransaction;

impl TransactionHook for DirectTransaction {}

///
/// RecordState
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum RecordState {
    #[default]
    Unsaved,
    Saving,
    Saved,
    Failed,
    Destroyed,
}

///
/// SaveStatus
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SaveStatus {
    Saved,
    /// The transaction hook returned without running the save.
    Deferred,
    RolledBack,
}

///
/// Transacted
///
/// How a block passed to [`Record::transaction`] ended.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Transacted<T> {
    Ran(T),
    Skipped,
    RolledBack,
}

impl<T> Transacted<T> {
    /// The block's output, if the hook ran it to completion.
    #[must_use]
    pub fn output(self) -> Option<T> {
        match self {
            Self::Ran(output) => Some(output),
            Self::Skipped | Self::RolledBack => None,
        }
    }
}

impl Record {
    /// Register the action `save` performs for this record.
    pub fn to_save<F>(&mut self, strategy: F) -> &mut Self
    where
        F: Fn(&Self) -> Result<(), InternalError> + Send + Sync + 'static,
    {
        self.save_strategy = Some(Arc::new(strategy));
        self
    }

    /// Register the action `destroy` performs for this record.
    pub fn to_destroy<F>(&mut self, strategy: F) -> &mut Self
    where
        F: Fn(&Self) -> Result<(), InternalError> + Send + Sync + 'static,
    {
        self.destroy_strategy = Some(Arc::new(strategy));
        self
    }

    #[must_use]
    pub fn has_save_strategy(&self) -> bool {
        self.save_strategy.is_some()
    }

    #[must_use]
    pub fn has_destroy_strategy(&self) -> bool {
        self.destroy_strategy.is_some()
    }

    /// Persist the record inside the schema's transaction hook.
    ///
    /// A rollback signal raised by the strategy (or the hook) is not an
    /// error: the record returns to its previous state and the call reports
    /// [`SaveStatus::RolledBack`]. A hook that returns without running the
    /// save also leaves the previous state, reported as
    /// [`SaveStatus::Deferred`].
    pub fn save(&mut self) -> Result<SaveStatus, InternalError> {
        let previous = self.state;
        self.state = RecordState::Saving;
        tracing::trace!(schema = %self.schema.name(), "save started");

        let result = self.transaction(|| self.persist());
        let (state, outcome, status) = match &result {
            Ok(Transacted::Ran(())) => (RecordState::Saved, SaveOutcome::Saved, SaveStatus::Saved),
            Ok(Transacted::Skipped) => (previous, SaveOutcome::Deferred, SaveStatus::Deferred),
            Ok(Transacted::RolledBack) => {
                (previous, SaveOutcome::RolledBack, SaveStatus::RolledBack)
            }
            Err(_) => (RecordState::Failed, SaveOutcome::Failed, SaveStatus::RolledBack),
        };

        self.state = state;
        sink::record(MetricsEvent::SaveFinish {
            schema: self.schema.name(),
            outcome,
        });
        tracing::trace!(schema = %self.schema.name(), ?outcome, "save finished");

        result.map(|_| status)
    }

    /// Run the resolved persistence action once, outside any transaction.
    pub fn persist(&self) -> Result<(), InternalError> {
        if let Some(strategy) = &self.save_strategy {
            return strategy(self);
        }
        if let Some(hook) = self.schema.persist_hook() {
            return hook.persist(self);
        }

        match self.schema.config().missing_save_strategy {
            MissingStrategyPolicy::Error => Err(PersistError::NoStrategy {
                schema: self.schema.name().to_string(),
            }
            .into()),
            MissingStrategyPolicy::Succeed => Ok(()),
        }
    }

    /// Invoke the destroy strategy; without one this is a no-op.
    pub fn destroy(&mut self) -> Result<&mut Self, InternalError> {
        let Some(strategy) = self.destroy_strategy.clone() else {
            return Ok(self);
        };

        tracing::trace!(schema = %self.schema.name(), "destroy");
        strategy(&*self)?;
        self.state = RecordState::Destroyed;
        sink::record(MetricsEvent::Destroy {
            schema: self.schema.name(),
        });

        Ok(self)
    }

    /// Run `block` through the schema's transaction hook.
    ///
    /// The rollback signal, raised by the block or by the hook, ends as
    /// [`Transacted::RolledBack`]; every other error propagates. A hook that
    /// returns `Ok` without calling the block yields [`Transacted::Skipped`].
    pub fn transaction<T>(
        &self,
        block: impl FnOnce() -> Result<T, InternalError>,
    ) -> Result<Transacted<T>, InternalError> {
        let mut block = Some(block);
        let mut output = None;

        let mut run = || -> Result<(), InternalError> {
            let block = block.take().ok_or_else(|| {
                InternalError::new(
                    ErrorClass::Internal,
                    ErrorOrigin::Persist,
                    "transaction hook ran its block more than once",
                )
            })?;
            output = Some(block()?);

            Ok(())
        };
        let result = self.schema.transaction_hook().transaction(&mut run);

        match result {
            Ok(()) => match output {
                Some(output) => Ok(Transacted::Ran(output)),
                None => {
                    tracing::debug!(schema = %self.schema.name(), "transaction block skipped");
                    Ok(Transacted::Skipped)
                }
            },
            Err(err) if err.is_transaction_aborted() => {
                tracing::debug!(schema = %self.schema.name(), "transaction rolled back");
                Ok(Transacted::RolledBack)
            }
            Err(err) => Err(err),
        }
    }
}
