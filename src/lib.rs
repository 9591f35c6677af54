pub mod amount;
pub mod bank;
pub mod console;
pub mod ids;
pub mod model;
pub mod snapshot;
pub mod statement;

pub use amount::Amount;
pub use bank::{Bank, BankError, Store, Totals};
pub use model::{
    Account, AccountId, AccountStatus, AccountType, NewUser, Role, Transaction, TxId, TxKind,
    User, UserId,
};
