//! The ledger engine: the only mutation path for balances and the
//! transaction log.
//!
//! Each operation validates and applies inside one write-lock critical
//! section, so the balance update and the log append are observed together
//! or not at all. The engine assigns no idempotency key: a retried call is
//! applied again, and callers that retry must deduplicate by transaction id
//! themselves.

use chrono::Utc;
use tracing::info;

use super::{Bank, BankError};
use crate::Amount;
use crate::model::{AccountId, AccountStatus, Transaction, TxKind};

impl Bank {
    /// Credit `amount` to an active account and append the log entry.
    pub fn deposit(
        &self,
        account_id: AccountId,
        amount: Amount,
        description: Option<&str>,
    ) -> Result<Transaction, BankError> {
        self.apply(account_id, TxKind::Deposit, amount, description)
    }

    /// Debit `amount` from an active account and append the log entry.
    ///
    /// Withdrawing the full balance is allowed; overshooting it by any
    /// amount is `InsufficientFunds`. There is no overdraft.
    pub fn withdraw(
        &self,
        account_id: AccountId,
        amount: Amount,
        description: Option<&str>,
    ) -> Result<Transaction, BankError> {
        self.apply(account_id, TxKind::Withdrawal, amount, description)
    }

    /// Validate and apply one ledger operation:
    /// - resolve the account
    /// - require active status
    /// - require a strictly positive amount
    /// - for withdrawals, require sufficient funds
    /// - update the balance and append the transaction together
    fn apply(
        &self,
        account_id: AccountId,
        kind: TxKind,
        amount: Amount,
        description: Option<&str>,
    ) -> Result<Transaction, BankError> {
        let result = self.mutate(|store, ids| {
            let account = store
                .account_mut(account_id)
                .ok_or(BankError::AccountNotFound(account_id))?;

            match account.status {
                AccountStatus::Active => {}
                AccountStatus::Frozen | AccountStatus::Closed => {
                    return Err(BankError::AccountNotActive {
                        id: account_id,
                        status: account.status,
                    });
                }
            }

            if !amount.is_positive() {
                return Err(BankError::InvalidAmount(amount));
            }

            let new_balance = match kind {
                TxKind::Deposit => account.balance + amount,
                TxKind::Withdrawal => {
                    if amount > account.balance {
                        return Err(BankError::InsufficientFunds {
                            balance: account.balance,
                            requested: amount,
                        });
                    }
                    account.balance - amount
                }
            };

            account.balance = new_balance;
            let tx = Transaction {
                id: ids.next_transaction(),
                account_id,
                kind,
                amount,
                description: description
                    .map(str::to_owned)
                    .unwrap_or_else(|| kind.default_description().to_owned()),
                timestamp: Utc::now(),
                balance_after: new_balance,
            };
            store.transactions.push(tx.clone());
            Ok(tx)
        });

        Self::log_outcome(kind, account_id, amount, &result);
        result
    }

    /// Small helper to log apply results.
    fn log_outcome(
        kind: TxKind,
        account: AccountId,
        amount: Amount,
        result: &Result<Transaction, BankError>,
    ) {
        match result {
            Ok(tx) => {
                info!(
                    account = %account,
                    amount = %amount,
                    balance = %tx.balance_after,
                    "{kind} applied"
                );
            }
            Err(e) => {
                info!(
                    account = %account,
                    amount = %amount,
                    reason = %e,
                    "{kind} rejected"
                );
            }
        }
    }
}
