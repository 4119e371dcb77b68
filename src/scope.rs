//! Run a closure inside a new transaction, or against one already in flight.
//!
//! Call sites that sometimes run standalone and sometimes participate in a
//! caller's transaction all look the same with [`with_transaction`]: pass the
//! in-flight transaction when there is one, `None` otherwise. The helper only
//! ever commits or rolls back transactions it began itself.

use crate::options::TxOptions;
use sea_orm::{DatabaseTransaction, TransactionError, TransactionTrait};
use std::future::Future;
use std::pin::Pin;

/// Run `callback` against `current` when given, otherwise inside a fresh
/// transaction begun on `conn`.
///
/// With a fresh transaction the helper commits on `Ok` and rolls back on
/// `Err`, keeping the callback's error; rollback failures are logged and
/// swallowed (best-effort, the statement error is the one worth returning).
/// With a reused transaction, commit and rollback stay with its owner and the
/// callback result is passed through.
pub async fn with_transaction<C, F, T, E>(
    conn: &C,
    current: Option<&DatabaseTransaction>,
    callback: F,
) -> Result<T, TransactionError<E>>
where
    C: TransactionTrait,
    F: for<'c> FnOnce(
            &'c DatabaseTransaction,
        ) -> Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'c>>
        + Send,
    T: Send,
    E: std::error::Error + Send,
{
    match current {
        Some(tx) => callback(tx).await.map_err(TransactionError::Transaction),
        None => {
            let tx = conn.begin().await.map_err(TransactionError::Connection)?;
            run_owned(tx, callback).await
        }
    }
}

/// [`with_transaction`] with explicit [`TxOptions`] for the transaction this
/// call begins. Options are ignored when reusing an in-flight transaction;
/// isolation cannot change mid-transaction.
pub async fn with_transaction_opts<C, F, T, E>(
    conn: &C,
    current: Option<&DatabaseTransaction>,
    options: &TxOptions,
    callback: F,
) -> Result<T, TransactionError<E>>
where
    C: TransactionTrait,
    F: for<'c> FnOnce(
            &'c DatabaseTransaction,
        ) -> Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'c>>
        + Send,
    T: Send,
    E: std::error::Error + Send,
{
    match current {
        Some(tx) => {
            if !options.is_default() {
                tracing::debug!("reusing in-flight transaction, transaction options ignored");
            }
            callback(tx).await.map_err(TransactionError::Transaction)
        }
        None => {
            let tx = conn
                .begin_with_config(
                    options.isolation.map(Into::into),
                    options.access.map(Into::into),
                )
                .await
                .map_err(TransactionError::Connection)?;
            run_owned(tx, callback).await
        }
    }
}

async fn run_owned<F, T, E>(
    tx: DatabaseTransaction,
    callback: F,
) -> Result<T, TransactionError<E>>
where
    F: for<'c> FnOnce(
            &'c DatabaseTransaction,
        ) -> Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'c>>
        + Send,
    T: Send,
    E: std::error::Error + Send,
{
    match callback(&tx).await {
        Ok(value) => {
            tx.commit().await.map_err(TransactionError::Connection)?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::warn!(
                    error = %rollback_err,
                    "rollback after failed transaction callback also failed"
                );
            }
            Err(TransactionError::Transaction(err))
        }
    }
}
