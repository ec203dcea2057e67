//! Ledger host that saves state after every successful mutation.
//!
//! Decorates a [`StockLedger`] the same way a publishing store wraps an event
//! store: delegate first, then run the side effect only if the inner call
//! succeeded.

use std::sync::{Mutex, PoisonError};

use thiserror::Error;

use stockroom_auth::Actor;
use stockroom_core::DomainError;
use stockroom_inventory::{
    Item, RestockPolicy, StockInRequest, StockLedger, StockOutOutcome, StockOutRequest,
    UsageRecord, UsageRequest,
};

use crate::state_store::{StateStore, StoreError};

#[derive(Debug, Error)]
pub enum HostError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The mutation is applied in memory but the save failed.
    /// Call [`PersistentLedger::persist`] to retry.
    #[error("ledger state not saved: {0}")]
    Store(#[from] StoreError),
}

impl HostError {
    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            HostError::Domain(e) => Some(e),
            HostError::Store(_) => None,
        }
    }
}

pub struct PersistentLedger<S> {
    ledger: StockLedger,
    store: S,
    // Revision of the last snapshot handed to the store.
    saved_revision: Mutex<u64>,
}

impl<S> PersistentLedger<S>
where
    S: StateStore,
{
    /// Load saved state from `store`, or start empty if there is none.
    ///
    /// A saved snapshot that breaks a ledger invariant is refused with
    /// `DomainError::InvariantViolation`.
    pub fn open(store: S, policy: RestockPolicy) -> Result<Self, HostError> {
        let (ledger, revision) = match store.load_state()? {
            Some(snapshot) => {
                let revision = snapshot.revision;
                let ledger = StockLedger::restore(snapshot, policy)?;
                tracing::info!(
                    revision,
                    items = ledger.list().len(),
                    "ledger state restored"
                );
                (ledger, revision)
            }
            None => {
                tracing::info!("starting with an empty ledger");
                (StockLedger::with_policy(policy), 0)
            }
        };

        Ok(Self {
            ledger,
            store,
            saved_revision: Mutex::new(revision),
        })
    }

    /// Read access for queries (list, alerts, history, summary).
    pub fn ledger(&self) -> &StockLedger {
        &self.ledger
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn stock_in(&self, actor: &Actor, request: StockInRequest) -> Result<Item, HostError> {
        let item = self.ledger.stock_in(actor, request)?;
        self.persist()?;
        Ok(item)
    }

    pub fn stock_out(
        &self,
        actor: &Actor,
        request: StockOutRequest,
    ) -> Result<StockOutOutcome, HostError> {
        let outcome = self.ledger.stock_out(actor, request)?;
        self.persist()?;
        Ok(outcome)
    }

    pub fn log_usage(&self, actor: &Actor, request: UsageRequest) -> Result<UsageRecord, HostError> {
        let record = self.ledger.log_usage(actor, request)?;
        self.persist()?;
        Ok(record)
    }

    /// Save the current state unless an equal or newer revision is already saved.
    ///
    /// The snapshot is taken while holding the save lock, so concurrent
    /// callers can never replace a newer save with an older one.
    pub fn persist(&self) -> Result<(), StoreError> {
        let mut saved = self
            .saved_revision
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let snapshot = self.ledger.snapshot();
        if snapshot.revision <= *saved {
            return Ok(());
        }

        if let Err(e) = self.store.save_state(&snapshot) {
            tracing::error!(revision = snapshot.revision, error = %e, "failed to save ledger state");
            return Err(e);
        }
        *saved = snapshot.revision;
        Ok(())
    }

    /// Revision of the most recent successful save.
    pub fn saved_revision(&self) -> u64 {
        *self
            .saved_revision
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
