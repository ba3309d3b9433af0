//! Auth Records

use jiff::Timestamp;

use crate::domain::accounts::records::{AccountRole, AccountUuid};

/// A stored session.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub token: String,
    pub account_uuid: AccountUuid,
    pub created_at: Timestamp,
    pub expires_at: Option<Timestamp>,
}

/// The account behind an authenticated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentAccount {
    pub uuid: AccountUuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: AccountRole,
}

impl CurrentAccount {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == AccountRole::Admin
    }
}
