//! Accounts Data

use crate::domain::accounts::records::{AccountRole, AccountUuid, AddressUuid};

/// New Account Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub uuid: AccountUuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: AccountRole,
}

/// New Address Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAddress {
    pub uuid: AddressUuid,
    pub account_uuid: AccountUuid,
    pub recipient: String,
    pub phone: String,
    pub line: String,
    pub is_default: bool,
}
