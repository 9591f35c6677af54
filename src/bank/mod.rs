//! The bank core: shared state, locking, and the operation surface.
//!
//! [`Bank`] owns the store behind a single `RwLock`. Mutating operations
//! (user creation, account creation, status changes, deposits, withdrawals)
//! run their whole read-validate-write sequence under the write lock, so two
//! operations on the same account can never interleave and no reader ever
//! observes a balance that disagrees with the transaction log. The snapshot
//! rewrite happens after the lock is released.

use std::sync::RwLock;

use tracing::warn;

use crate::ids::IdGen;
use crate::snapshot::{Discard, SnapshotError, SnapshotStore};

mod error;
mod identity;
mod ledger;
mod query;
mod registry;
mod store;

pub use error::BankError;
pub use query::Totals;
pub use store::Store;

pub struct Bank {
    store: RwLock<Store>,
    ids: IdGen,
    snapshots: Box<dyn SnapshotStore>,
}

/// Construction
impl Bank {
    /// Open the bank from the given snapshot store.
    ///
    /// When no snapshot exists yet, the store is seeded with the two demo
    /// identities and the seed state is written out immediately.
    pub fn open(snapshots: Box<dyn SnapshotStore>) -> Result<Self, SnapshotError> {
        let store = match snapshots.load()? {
            Some(store) => store,
            None => {
                let store = Store::seeded();
                snapshots.save(&store)?;
                store
            }
        };
        let (users, accounts, transactions, numbers) = store.id_watermark();
        Ok(Self {
            store: RwLock::new(store),
            ids: IdGen::starting_after(users, accounts, transactions, numbers),
            snapshots,
        })
    }

    /// Bank that persists nothing, for tests and benchmarks.
    pub fn in_memory() -> Self {
        Self::open(Box::new(Discard)).expect("discard snapshot store cannot fail")
    }
}

/// Locking and persistence plumbing
impl Bank {
    fn read<T>(&self, f: impl FnOnce(&Store) -> T) -> T {
        f(&self.store.read().expect("bank store lock poisoned"))
    }

    /// Run a mutation under the write lock; on success, rewrite the snapshot
    /// after the lock has been dropped.
    fn mutate<T>(
        &self,
        f: impl FnOnce(&mut Store, &IdGen) -> Result<T, BankError>,
    ) -> Result<T, BankError> {
        let value = {
            let mut store = self.store.write().expect("bank store lock poisoned");
            f(&mut store, &self.ids)?
        };
        self.persist();
        Ok(value)
    }

    /// Best-effort snapshot rewrite. A failed write leaves the previous
    /// snapshot on disk; the operation has already committed in memory.
    fn persist(&self) {
        let snapshot = self.read(Store::clone);
        if let Err(e) = self.snapshots.save(&snapshot) {
            warn!(error = %e, "snapshot write failed");
        }
    }
}


#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::testutil::{DEMO_USER, amount, bank_with_account};
    use super::*;
    use crate::Amount;
    use crate::model::AccountType;
    use crate::snapshot::JsonFile;

    #[test]
    fn open_without_snapshot_seeds_demo_identities() {
        let bank = Bank::in_memory();
        let admin = bank.authenticate("admin", "admin123").unwrap();
        assert_eq!(admin.name, "Bank Administrator");
        let demo = bank.authenticate("demo", "demo123").unwrap();
        assert_eq!(demo.id, DEMO_USER);
    }

    #[test]
    fn open_loads_existing_snapshot_and_continues_ids() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bank.json");

        let first_account = {
            let bank = Bank::open(Box::new(JsonFile::new(&path))).unwrap();
            let account = bank.create_account(DEMO_USER, AccountType::Savings).unwrap();
            bank.deposit(account.id, amount("100.00"), None).unwrap();
            account
        };

        let bank = Bank::open(Box::new(JsonFile::new(&path))).unwrap();
        let reloaded = bank.get_account(first_account.id).unwrap();
        assert_eq!(reloaded.balance, amount("100.00"));
        assert_eq!(reloaded.account_number, first_account.account_number);

        // Fresh ids do not collide with the reloaded state.
        let second = bank.create_account(DEMO_USER, AccountType::Current).unwrap();
        assert!(second.id > first_account.id);
        assert_ne!(second.account_number, first_account.account_number);
    }

    #[test]
    fn mutations_rewrite_the_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bank.json");

        let bank = Bank::open(Box::new(JsonFile::new(&path))).unwrap();
        let account = bank.create_account(DEMO_USER, AccountType::Savings).unwrap();
        bank.deposit(account.id, amount("42.50"), None).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["accounts"][0]["balance"], "42.50");
        assert_eq!(json["transactions"][0]["balanceAfter"], "42.50");
    }

    #[test]
    fn concurrent_deposits_on_one_account_serialize_exactly() {
        let (bank, account) = bank_with_account();
        let bank = Arc::new(bank);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let bank = Arc::clone(&bank);
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        bank.deposit(account, amount("1.00"), None).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let final_account = bank.get_account(account).unwrap();
        assert_eq!(final_account.balance, amount("400.00"));

        // The log agrees with the balance: 400 entries, and the newest
        // entry's balance_after is the current balance.
        let history = bank.transactions_of(account);
        assert_eq!(history.len(), 400);
        assert_eq!(history[0].balance_after, final_account.balance);
    }

    #[test]
    fn concurrent_withdrawals_never_overdraw() {
        let (bank, account) = bank_with_account();
        bank.deposit(account, amount("100.00"), None).unwrap();
        let bank = Arc::new(bank);

        // 8 threads each try 50 withdrawals of 1.00: only 100 can succeed.
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let bank = Arc::clone(&bank);
                std::thread::spawn(move || {
                    let mut applied = 0u32;
                    for _ in 0..50 {
                        if bank.withdraw(account, amount("1.00"), None).is_ok() {
                            applied += 1;
                        }
                    }
                    applied
                })
            })
            .collect();
        let applied: u32 = handles.into_iter().map(|h| h.join().unwrap()).sum();

        assert_eq!(applied, 100);
        let final_account = bank.get_account(account).unwrap();
        assert_eq!(final_account.balance, Amount::ZERO);
    }
}
