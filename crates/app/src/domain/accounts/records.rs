//! Account Records

use jiff::Timestamp;
use thiserror::Error;

use crate::uuids::TypedUuid;

/// Account UUID
pub type AccountUuid = TypedUuid<AccountRecord>;

/// Account Record
#[derive(Debug, Clone)]
pub struct AccountRecord {
    pub uuid: AccountUuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: AccountRole,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// What an account is allowed to do. Staff accounts manage orders and
/// shipping rates; everyone else shops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountRole {
    Customer,
    Admin,
}

impl AccountRole {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for AccountRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AccountRole {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "admin" => Ok(Self::Admin),
            other => Err(ParseRoleError(other.to_owned())),
        }
    }
}

/// The stored role did not match any known account role.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognised account role: {0:?}")]
pub struct ParseRoleError(pub String);

/// Address UUID
pub type AddressUuid = TypedUuid<AddressRecord>;

/// A delivery address in an account's address book. `line` holds the full
/// postal address as one string, which is what gets geocoded. Checkout
/// preview falls back to the `is_default` address when none is named.
#[derive(Debug, Clone)]
pub struct AddressRecord {
    pub uuid: AddressUuid,
    pub account_uuid: AccountUuid,
    pub recipient: String,
    pub phone: String,
    pub line: String,
    pub is_default: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
