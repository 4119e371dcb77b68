//! Transaction conveniences for SeaORM.
//!
//! This crate wraps the SeaORM transaction API with three small utilities:
//! - Commit/rollback hooks: attach callbacks to an in-flight transaction that
//!   fire after it settles, without delaying the caller's result
//!   ([`transaction_with_hooks`], [`TxHooks`]).
//! - Known-error classification: decide whether a caught [`sea_orm::DbErr`]
//!   is a unique violation, foreign-key violation, etc., optionally scoped to
//!   a table and affected columns ([`classify`], [`is_db_error`]).
//! - Transaction scoping: run a closure in a fresh transaction, or against one
//!   the caller already holds ([`with_transaction`]).
//!
//! The crate never talks to the database on its own; everything goes through
//! the connection's `TransactionTrait` and the error values SeaORM/SQLx
//! already produced.
//!
//! # Features
//! - `pg`, `mysql`, `sqlite`: enable the matching SQLx backend and SeaORM
//!   connector (the helpers themselves are backend-agnostic)
//!
//! # Example
//! ```rust,no_run
//! use modkit_tx::{transaction_with_hooks, TxError};
//! use sea_orm::{ConnectionTrait, Database};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::connect("sqlite://app.db?mode=rwc").await?;
//!
//! let value = transaction_with_hooks(&db, |tx, hooks| {
//!     Box::pin(async move {
//!         tx.execute_unprepared("INSERT INTO audit (entry) VALUES ('created')")
//!             .await?;
//!         hooks.on_commit(|| async { tracing::info!("audit entry visible") })?;
//!         Ok::<_, TxError>(42)
//!     })
//! })
//! .await?;
//! # assert_eq!(value, 42);
//! # Ok(())
//! # }
//! ```

// Core modules
pub mod classify;
pub mod hooks;
pub mod options;
pub mod scope;

// Re-export important types from the modules
pub use classify::{
    classify, classify_database_error, database_error, error_code, is_db_error,
    is_foreign_key_violation, is_record_not_found, is_unique_violation, kind_for_code, DbErrorKind,
};
pub use hooks::{
    transaction_with_hooks, transaction_with_hooks_and_config, TransactionAware, TxHooks, TxOutcome,
};
pub use options::{AccessMode, IsolationLevel, TxOptions};
pub use scope::{with_transaction, with_transaction_opts};

use thiserror::Error;

/// Library-local result type.
pub type Result<T> = std::result::Result<T, TxError>;

/// Typed error for the transaction helpers.
#[derive(Debug, Error)]
pub enum TxError {
    /// The wrapped transaction has already committed or rolled back; hooks can
    /// no longer be registered against it.
    #[error("transaction already settled")]
    AlreadySettled,

    #[error(transparent)]
    Db(#[from] sea_orm::DbErr),
}
