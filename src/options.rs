//! Transaction options.
//!
//! [`TxOptions`] is the knob struct handed to the `*_opts`/`*_and_config`
//! variants when this crate begins a transaction itself. It deserializes
//! directly out of a host's layered configuration, so isolation requirements
//! can live next to the rest of a module's database settings.

use serde::{Deserialize, Serialize};

/// Options applied when beginning a transaction.
/// `None` fields keep the backend default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TxOptions {
    #[serde(default)]
    pub isolation: Option<IsolationLevel>,
    #[serde(default)]
    pub access: Option<AccessMode>,
}

impl TxOptions {
    /// True when every field keeps the backend default.
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Isolation level for a transaction begun by this crate.
/// Wire form is snake_case (`"repeatable_read"`, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IsolationLevel {
    ReadUncommitted,
    ReadCommitted,
    RepeatableRead,
    Serializable,
}

impl From<IsolationLevel> for sea_orm::IsolationLevel {
    fn from(level: IsolationLevel) -> Self {
        match level {
            IsolationLevel::ReadUncommitted => sea_orm::IsolationLevel::ReadUncommitted,
            IsolationLevel::ReadCommitted => sea_orm::IsolationLevel::ReadCommitted,
            IsolationLevel::RepeatableRead => sea_orm::IsolationLevel::RepeatableRead,
            IsolationLevel::Serializable => sea_orm::IsolationLevel::Serializable,
        }
    }
}

/// Access mode for a transaction begun by this crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessMode {
    ReadOnly,
    ReadWrite,
}

impl From<AccessMode> for sea_orm::AccessMode {
    fn from(mode: AccessMode) -> Self {
        match mode {
            AccessMode::ReadOnly => sea_orm::AccessMode::ReadOnly,
            AccessMode::ReadWrite => sea_orm::AccessMode::ReadWrite,
        }
    }
}
