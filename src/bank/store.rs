use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::model::{Account, AccountId, Role, Transaction, User, UserId};

/// Complete bank state: every user, account, and transaction in insertion
/// order. This is also the snapshot wire shape — the whole store serializes
/// as one JSON document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Store {
    pub users: Vec<User>,
    pub accounts: Vec<Account>,
    pub transactions: Vec<Transaction>,
}

impl Store {
    pub fn user_by_id(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    /// Case-sensitive exact match.
    pub fn user_by_username(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|u| u.username == username)
    }

    pub fn account(&self, id: AccountId) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == id)
    }

    pub fn account_mut(&mut self, id: AccountId) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|a| a.id == id)
    }

    pub fn account_number_taken(&self, number: &str) -> bool {
        self.accounts.iter().any(|a| a.account_number == number)
    }

    /// Highest ids in use, for seeding the id generator:
    /// `(user, account, transaction, account-number suffix)`.
    ///
    /// Account numbers that do not follow the `ACC` + digits shape are
    /// ignored for the suffix watermark; the collision check at issue time
    /// covers them.
    pub fn id_watermark(&self) -> (u64, u64, u64, u64) {
        let users = self.users.iter().map(|u| u.id.0).max().unwrap_or(0);
        let accounts = self.accounts.iter().map(|a| a.id.0).max().unwrap_or(0);
        let transactions = self.transactions.iter().map(|t| t.id.0).max().unwrap_or(0);
        let numbers = self
            .accounts
            .iter()
            .filter_map(|a| a.account_number.strip_prefix("ACC"))
            .filter_map(|suffix| suffix.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        (users, accounts, transactions, numbers)
    }

    /// First-boot state: the two documented demo identities
    /// (`admin`/`admin123` and `demo`/`demo123`), no accounts.
    pub fn seeded() -> Self {
        let now = Utc::now();
        Store {
            users: vec![
                User {
                    id: UserId(1),
                    username: "admin".to_string(),
                    password: "admin123".to_string(),
                    role: Role::Admin,
                    name: "Bank Administrator".to_string(),
                    email: "admin@bank.com".to_string(),
                    phone: "+1234567890".to_string(),
                    address: "123 Bank Street".to_string(),
                    created_at: now,
                },
                User {
                    id: UserId(2),
                    username: "demo".to_string(),
                    password: "demo123".to_string(),
                    role: Role::Customer,
                    name: "Demo Customer".to_string(),
                    email: "demo@customer.com".to_string(),
                    phone: "+1987654321".to_string(),
                    address: "456 Customer Ave".to_string(),
                    created_at: now,
                },
            ],
            accounts: Vec::new(),
            transactions: Vec::new(),
        }
    }
}
