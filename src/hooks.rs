//! Commit/rollback hooks for SeaORM transactions.
//!
//! [`TxHooks`] collects callbacks against one transaction attempt. The runner
//! ([`transaction_with_hooks`]) settles the registry once the wrapped
//! transaction resolves: the list matching the outcome is dispatched on a
//! spawned task, in registration order, so the caller gets its result back
//! without waiting for the callbacks; the other list is dropped unrun.
//!
//! A settled registry rejects further registrations with
//! [`TxError::AlreadySettled`].

use crate::options::TxOptions;
use crate::{Result, TxError};
use async_trait::async_trait;
use parking_lot::Mutex;
use sea_orm::{DatabaseTransaction, TransactionError, TransactionTrait};
use std::future::Future;
use std::mem;
use std::pin::Pin;
use std::sync::Arc;

type Hook = Box<dyn FnOnce() -> Pin<Box<dyn Future<Output = ()> + Send>> + Send>;

/// How a wrapped transaction ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TxOutcome {
    Commit,
    Rollback,
}

/// Observer notified after the transaction it was registered with settles.
///
/// Both methods default to no-ops, so an implementation only overrides the
/// side it cares about. Observers handle their own failures; a cache flush
/// that goes wrong must not contaminate the already-settled transaction
/// result.
#[async_trait]
pub trait TransactionAware: Send + Sync {
    /// Called after a successful commit.
    async fn on_commit(&self) {}

    /// Called after a rollback.
    async fn on_rollback(&self) {}
}

#[derive(Default)]
struct Registry {
    on_commit: Vec<Hook>,
    on_rollback: Vec<Hook>,
    settled: bool,
}

/// Callback registry for one transaction attempt.
///
/// Cloning is cheap and every clone refers to the same registry, so the handle
/// can be passed down into repositories participating in the transaction.
#[derive(Clone, Default)]
pub struct TxHooks {
    inner: Arc<Mutex<Registry>>,
}

impl TxHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback to run after the transaction commits.
    /// Callbacks run in registration order.
    pub fn on_commit<F, Fut>(&self, hook: F) -> Result<()>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.push(|registry| &mut registry.on_commit, hook)
    }

    /// Register a callback to run after the transaction rolls back.
    /// Callbacks run in registration order.
    pub fn on_rollback<F, Fut>(&self, hook: F) -> Result<()>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.push(|registry| &mut registry.on_rollback, hook)
    }

    /// Register a [`TransactionAware`] observer on both sides at once.
    pub fn observe(&self, observer: Arc<dyn TransactionAware>) -> Result<()> {
        let on_commit = Arc::clone(&observer);
        self.on_commit(move || async move { on_commit.on_commit().await })?;
        self.on_rollback(move || async move { observer.on_rollback().await })?;
        Ok(())
    }

    /// Whether the wrapped transaction has already committed or rolled back.
    pub fn is_settled(&self) -> bool {
        self.inner.lock().settled
    }

    /// Mark the transaction as settled and dispatch the callbacks matching
    /// `outcome` on a spawned task. Later calls are no-ops.
    ///
    /// [`transaction_with_hooks`] calls this automatically; it is public for
    /// callers driving commit/rollback themselves.
    ///
    /// Must be called from within a Tokio runtime when callbacks are
    /// registered.
    pub fn settle(&self, outcome: TxOutcome) {
        let (commit, rollback) = {
            let mut registry = self.inner.lock();
            if registry.settled {
                return;
            }
            registry.settled = true;
            (
                mem::take(&mut registry.on_commit),
                mem::take(&mut registry.on_rollback),
            )
        };
        let fired = match outcome {
            TxOutcome::Commit => commit,
            TxOutcome::Rollback => rollback,
        };
        if fired.is_empty() {
            return;
        }
        tracing::debug!(
            outcome = ?outcome,
            count = fired.len(),
            "dispatching transaction hooks"
        );
        tokio::spawn(async move {
            for hook in fired {
                hook().await;
            }
        });
    }

    fn push<F, Fut>(&self, list: fn(&mut Registry) -> &mut Vec<Hook>, hook: F) -> Result<()>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut registry = self.inner.lock();
        if registry.settled {
            return Err(TxError::AlreadySettled);
        }
        list(&mut registry).push(Box::new(move || Box::pin(hook())));
        Ok(())
    }
}

/// Run `callback` inside a transaction on `conn` and hand it a [`TxHooks`]
/// handle alongside the transaction.
///
/// The registry settles with [`TxOutcome::Commit`] when the transaction
/// committed and [`TxOutcome::Rollback`] otherwise (callback error, or a
/// commit that failed at the ORM layer). The callback's result is returned
/// untouched.
pub async fn transaction_with_hooks<C, F, T, E>(
    conn: &C,
    callback: F,
) -> std::result::Result<T, TransactionError<E>>
where
    C: TransactionTrait,
    F: for<'c> FnOnce(
            &'c DatabaseTransaction,
            TxHooks,
        ) -> Pin<Box<dyn Future<Output = std::result::Result<T, E>> + Send + 'c>>
        + Send,
    T: Send,
    E: std::error::Error + Send,
{
    let hooks = TxHooks::new();
    let handle = hooks.clone();
    let result = conn.transaction(move |tx| callback(tx, handle)).await;
    hooks.settle(match &result {
        Ok(_) => TxOutcome::Commit,
        Err(_) => TxOutcome::Rollback,
    });
    result
}

/// [`transaction_with_hooks`] with explicit [`TxOptions`] for the transaction
/// this call begins.
pub async fn transaction_with_hooks_and_config<C, F, T, E>(
    conn: &C,
    options: TxOptions,
    callback: F,
) -> std::result::Result<T, TransactionError<E>>
where
    C: TransactionTrait,
    F: for<'c> FnOnce(
            &'c DatabaseTransaction,
            TxHooks,
        ) -> Pin<Box<dyn Future<Output = std::result::Result<T, E>> + Send + 'c>>
        + Send,
    T: Send,
    E: std::error::Error + Send,
{
    let hooks = TxHooks::new();
    let handle = hooks.clone();
    let result = conn
        .transaction_with_config(
            move |tx| callback(tx, handle),
            options.isolation.map(Into::into),
            options.access.map(Into::into),
        )
        .await;
    hooks.settle(match &result {
        Ok(_) => TxOutcome::Commit,
        Err(_) => TxOutcome::Rollback,
    });
    result
}
