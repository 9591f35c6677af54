//! Identity store: credential checks and user creation.

use chrono::Utc;
use tracing::info;

use super::{Bank, BankError};
use crate::model::{NewUser, User};

impl Bank {
    /// Look up the user matching `username` and `password` exactly.
    ///
    /// Credentials are compared verbatim; there is no hashing and no
    /// lockout. Accepted limitation of this demo-grade core.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<User, BankError> {
        self.read(|store| {
            store
                .users
                .iter()
                .find(|u| u.username == username && u.password == password)
                .cloned()
                .ok_or(BankError::InvalidCredentials)
        })
    }

    /// Create a user from `profile`, assigning a fresh id and creation time.
    ///
    /// Usernames are unique with a case-sensitive exact match; the
    /// uniqueness check and the insert run under one write lock, so two
    /// racing calls with the same username cannot both succeed.
    pub fn create_user(&self, profile: NewUser) -> Result<User, BankError> {
        let user = self.mutate(|store, ids| {
            if store.user_by_username(&profile.username).is_some() {
                return Err(BankError::DuplicateUsername(profile.username.clone()));
            }
            let user = User {
                id: ids.next_user(),
                username: profile.username,
                password: profile.password,
                role: profile.role,
                name: profile.name,
                email: profile.email,
                phone: profile.phone,
                address: profile.address,
                created_at: Utc::now(),
            };
            store.users.push(user.clone());
            Ok(user)
        })?;

        info!(user = %user.id, username = %user.username, role = %user.role, "user created");
        Ok(user)
    }
}
