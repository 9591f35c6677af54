//! Account registry: creation, status changes, lookups.

use chrono::Utc;
use tracing::info;

use super::{Bank, BankError};
use crate::Amount;
use crate::model::{Account, AccountId, AccountStatus, AccountType, UserId};

impl Bank {
    /// Open a new account for `user_id`: zero balance, active status, and a
    /// fresh unique account number. The owning user must exist.
    pub fn create_account(
        &self,
        user_id: UserId,
        kind: AccountType,
    ) -> Result<Account, BankError> {
        let account = self.mutate(|store, ids| {
            if store.user_by_id(user_id).is_none() {
                return Err(BankError::UnknownUser(user_id));
            }
            let number = ids.account_number(|candidate| store.account_number_taken(candidate));
            let account = Account {
                id: ids.next_account(),
                account_number: number,
                user_id,
                kind,
                balance: Amount::ZERO,
                status: AccountStatus::Active,
                created_at: Utc::now(),
            };
            store.accounts.push(account.clone());
            Ok(account)
        })?;

        info!(
            account = %account.id,
            number = %account.account_number,
            owner = %account.user_id,
            kind = %account.kind,
            "account opened"
        );
        Ok(account)
    }

    /// Change an account's status and return the updated account.
    ///
    /// The only legal transitions are `Active -> Frozen` and
    /// `Frozen -> Active`. Everything else — re-applying the current status,
    /// or any transition involving `Closed` — is `InvalidStatusTransition`.
    pub fn set_status(
        &self,
        account_id: AccountId,
        new_status: AccountStatus,
    ) -> Result<Account, BankError> {
        let account = self.mutate(|store, _| {
            let account = store
                .account_mut(account_id)
                .ok_or(BankError::AccountNotFound(account_id))?;
            match (account.status, new_status) {
                (AccountStatus::Active, AccountStatus::Frozen)
                | (AccountStatus::Frozen, AccountStatus::Active) => {
                    account.status = new_status;
                    Ok(account.clone())
                }
                (from, to) => Err(BankError::InvalidStatusTransition {
                    id: account_id,
                    from,
                    to,
                }),
            }
        })?;

        info!(account = %account.id, status = %account.status, "account status changed");
        Ok(account)
    }

    /// Point-in-time copy of an account.
    pub fn get_account(&self, account_id: AccountId) -> Result<Account, BankError> {
        self.read(|store| {
            store
                .account(account_id)
                .cloned()
                .ok_or(BankError::AccountNotFound(account_id))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::testutil::DEMO_USER;

    #[test]
    fn create_account_starts_active_with_zero_balance() {
        let bank = Bank::in_memory();
        let account = bank.create_account(DEMO_USER, AccountType::Savings).unwrap();

        assert_eq!(account.id, AccountId(1));
        assert_eq!(account.account_number, "ACC00000001");
        assert_eq!(account.user_id, DEMO_USER);
        assert_eq!(account.kind, AccountType::Savings);
        assert_eq!(account.balance, Amount::ZERO);
        assert_eq!(account.status, AccountStatus::Active);
    }

    #[test]
    fn create_account_rejects_unknown_user() {
        let bank = Bank::in_memory();
        let result = bank.create_account(UserId(99), AccountType::Current);
        assert!(matches!(result, Err(BankError::UnknownUser(UserId(99)))));
        assert!(bank.accounts_of(UserId(99)).is_empty());
    }

    #[test]
    fn account_numbers_are_unique() {
        let bank = Bank::in_memory();
        let a = bank.create_account(DEMO_USER, AccountType::Savings).unwrap();
        let b = bank.create_account(DEMO_USER, AccountType::Current).unwrap();
        assert_ne!(a.account_number, b.account_number);
    }

    #[test]
    fn freeze_and_unfreeze_round_trip() {
        let bank = Bank::in_memory();
        let account = bank.create_account(DEMO_USER, AccountType::Savings).unwrap();

        let frozen = bank.set_status(account.id, AccountStatus::Frozen).unwrap();
        assert_eq!(frozen.status, AccountStatus::Frozen);

        let active = bank.set_status(account.id, AccountStatus::Active).unwrap();
        assert_eq!(active.status, AccountStatus::Active);
    }

    #[test]
    fn same_status_is_not_a_silent_no_op() {
        let bank = Bank::in_memory();
        let account = bank.create_account(DEMO_USER, AccountType::Savings).unwrap();

        let result = bank.set_status(account.id, AccountStatus::Active);
        assert!(matches!(
            result,
            Err(BankError::InvalidStatusTransition {
                from: AccountStatus::Active,
                to: AccountStatus::Active,
                ..
            })
        ));
    }

    #[test]
    fn closing_is_not_a_reachable_transition() {
        let bank = Bank::in_memory();
        let account = bank.create_account(DEMO_USER, AccountType::Savings).unwrap();

        let result = bank.set_status(account.id, AccountStatus::Closed);
        assert!(matches!(
            result,
            Err(BankError::InvalidStatusTransition {
                to: AccountStatus::Closed,
                ..
            })
        ));
    }

    #[test]
    fn set_status_on_missing_account_fails() {
        let bank = Bank::in_memory();
        let result = bank.set_status(AccountId(7), AccountStatus::Frozen);
        assert!(matches!(result, Err(BankError::AccountNotFound(AccountId(7)))));
    }

    #[test]
    fn get_account_on_missing_account_fails() {
        let bank = Bank::in_memory();
        let result = bank.get_account(AccountId(7));
        assert!(matches!(result, Err(BankError::AccountNotFound(AccountId(7)))));
    }
}
