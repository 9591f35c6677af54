//! Id generation for users, accounts, and transactions.
//!
//! Ids are monotonic counters rather than wall-clock or random values, so a
//! bank's behavior is deterministic and ids stay unique across restarts once
//! the generator is seeded from the loaded store.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::model::{AccountId, TxId, UserId};

pub struct IdGen {
    users: AtomicU64,
    accounts: AtomicU64,
    transactions: AtomicU64,
    /// Numeric suffix of the last issued account number.
    numbers: AtomicU64,
}

impl IdGen {
    pub fn new() -> Self {
        Self::starting_after(0, 0, 0, 0)
    }

    /// Generator whose next ids follow the given last-used values.
    pub fn starting_after(users: u64, accounts: u64, transactions: u64, numbers: u64) -> Self {
        Self {
            users: AtomicU64::new(users),
            accounts: AtomicU64::new(accounts),
            transactions: AtomicU64::new(transactions),
            numbers: AtomicU64::new(numbers),
        }
    }

    pub fn next_user(&self) -> UserId {
        UserId(self.users.fetch_add(1, Ordering::Relaxed) + 1)
    }

    pub fn next_account(&self) -> AccountId {
        AccountId(self.accounts.fetch_add(1, Ordering::Relaxed) + 1)
    }

    pub fn next_transaction(&self) -> TxId {
        TxId(self.transactions.fetch_add(1, Ordering::Relaxed) + 1)
    }

    /// Issue a fresh display account number (`ACC` + 8 digits).
    ///
    /// Candidates already present in the store (a snapshot can carry numbers
    /// this counter never issued) are skipped, not trusted.
    pub fn account_number(&self, is_taken: impl Fn(&str) -> bool) -> String {
        loop {
            let suffix = self.numbers.fetch_add(1, Ordering::Relaxed) + 1;
            let candidate = format!("ACC{suffix:08}");
            if !is_taken(&candidate) {
                return candidate;
            }
        }
    }
}

impl Default for IdGen {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_monotonic_from_one() {
        let ids = IdGen::new();
        assert_eq!(ids.next_user(), UserId(1));
        assert_eq!(ids.next_user(), UserId(2));
        assert_eq!(ids.next_account(), AccountId(1));
        assert_eq!(ids.next_transaction(), TxId(1));
        assert_eq!(ids.next_transaction(), TxId(2));
    }

    #[test]
    fn seeded_generator_continues_after_watermark() {
        let ids = IdGen::starting_after(2, 5, 9, 3);
        assert_eq!(ids.next_user(), UserId(3));
        assert_eq!(ids.next_account(), AccountId(6));
        assert_eq!(ids.next_transaction(), TxId(10));
        assert_eq!(ids.account_number(|_| false), "ACC00000004");
    }

    #[test]
    fn account_number_format() {
        let ids = IdGen::new();
        assert_eq!(ids.account_number(|_| false), "ACC00000001");
        assert_eq!(ids.account_number(|_| false), "ACC00000002");
    }

    #[test]
    fn account_number_skips_taken_candidates() {
        let ids = IdGen::new();
        let number = ids.account_number(|candidate| candidate == "ACC00000001");
        assert_eq!(number, "ACC00000002");
    }
}
