//! Read-only projections over committed state.

use super::Bank;
use crate::Amount;
use crate::model::{Account, AccountId, Transaction, User, UserId};

/// Aggregate figures for the admin overview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    pub account_count: usize,
    pub transaction_count: usize,
    pub total_balance: Amount,
}

impl Bank {
    /// All registered users, in creation order.
    pub fn users(&self) -> Vec<User> {
        self.read(|store| store.users.clone())
    }

    /// Accounts owned by `user_id`, in creation order.
    pub fn accounts_of(&self, user_id: UserId) -> Vec<Account> {
        self.read(|store| {
            store
                .accounts
                .iter()
                .filter(|a| a.user_id == user_id)
                .cloned()
                .collect()
        })
    }

    /// History for one account, newest first.
    ///
    /// Ordered by timestamp descending; ties are broken by descending id,
    /// which is a strict total order because ids are monotonic.
    pub fn transactions_of(&self, account_id: AccountId) -> Vec<Transaction> {
        self.read(|store| {
            let mut transactions: Vec<Transaction> = store
                .transactions
                .iter()
                .filter(|t| t.account_id == account_id)
                .cloned()
                .collect();
            transactions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
            transactions
        })
    }

    /// Aggregates over every account and transaction. Reflects committed
    /// state only; an in-flight mutation is either fully visible or not at
    /// all.
    pub fn totals(&self) -> Totals {
        self.read(|store| {
            let mut total_balance = Amount::ZERO;
            for account in &store.accounts {
                total_balance += account.balance;
            }
            Totals {
                account_count: store.accounts.len(),
                transaction_count: store.transactions.len(),
                total_balance,
            }
        })
    }
}
