//! Error taxonomy for bank operations.

use thiserror::Error;

use crate::Amount;
use crate::model::{AccountId, AccountStatus, UserId};

/// Every expected failure of a core operation.
///
/// All variants are recoverable: the core reports them through `Result` and
/// the caller decides how to render them. None aborts the process.
#[derive(Debug, Error)]
pub enum BankError {
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("username '{0}' is already taken")]
    DuplicateUsername(String),

    #[error("no user with id {0}")]
    UnknownUser(UserId),

    #[error("no account with id {0}")]
    AccountNotFound(AccountId),

    #[error("account {id} is {status}, not active")]
    AccountNotActive { id: AccountId, status: AccountStatus },

    #[error("cannot change account {id} from {from} to {to}")]
    InvalidStatusTransition {
        id: AccountId,
        from: AccountStatus,
        to: AccountStatus,
    },

    #[error("amount must be positive, got {0}")]
    InvalidAmount(Amount),

    #[error("insufficient funds: balance {balance}, requested {requested}")]
    InsufficientFunds { balance: Amount, requested: Amount },
}
