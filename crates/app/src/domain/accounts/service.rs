//! Accounts service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::accounts::{
        data::{NewAccount, NewAddress},
        errors::AccountsServiceError,
        records::{AccountRecord, AddressRecord},
        repository::PgAccountsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgAccountsService {
    db: Db,
    repository: PgAccountsRepository,
}

impl PgAccountsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgAccountsRepository::new(),
        }
    }
}

#[async_trait]
impl AccountsService for PgAccountsService {
    async fn create_account(
        &self,
        account: NewAccount,
    ) -> Result<AccountRecord, AccountsServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self
            .repository
            .create_account(
                &mut tx,
                account.uuid,
                &account.name,
                &account.email,
                &account.phone,
                account.role,
            )
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn create_address(
        &self,
        address: NewAddress,
    ) -> Result<AddressRecord, AccountsServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self
            .repository
            .create_address(
                &mut tx,
                address.uuid,
                address.account_uuid,
                &address.recipient,
                &address.phone,
                &address.line,
                address.is_default,
            )
            .await?;

        tx.commit().await?;

        Ok(created)
    }
}

#[automock]
#[async_trait]
pub trait AccountsService: Send + Sync {
    /// Register an account. Sign-up flows live elsewhere; this is the
    /// provisioning path used by operators and tests.
    async fn create_account(
        &self,
        account: NewAccount,
    ) -> Result<AccountRecord, AccountsServiceError>;

    /// Add an address to an account's address book.
    async fn create_address(
        &self,
        address: NewAddress,
    ) -> Result<AddressRecord, AccountsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::accounts::records::{AccountRole, AccountUuid, AddressUuid},
        test::TestContext,
    };

    use super::*;

    #[tokio::test]
    async fn create_account_returns_stored_fields() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = AccountUuid::new();

        let account = ctx
            .accounts
            .create_account(NewAccount {
                uuid,
                name: "Lan Pham".to_string(),
                email: "lan@example.com".to_string(),
                phone: "0901234567".to_string(),
                role: AccountRole::Customer,
            })
            .await?;

        assert_eq!(account.uuid, uuid);
        assert_eq!(account.email, "lan@example.com");
        assert_eq!(account.role, AccountRole::Customer);

        Ok(())
    }

    #[tokio::test]
    async fn duplicate_email_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.accounts
            .create_account(NewAccount {
                uuid: AccountUuid::new(),
                name: "Lan Pham".to_string(),
                email: "lan@example.com".to_string(),
                phone: "0901234567".to_string(),
                role: AccountRole::Customer,
            })
            .await?;

        let result = ctx
            .accounts
            .create_account(NewAccount {
                uuid: AccountUuid::new(),
                name: "Other Lan".to_string(),
                email: "lan@example.com".to_string(),
                phone: "0907654321".to_string(),
                role: AccountRole::Customer,
            })
            .await;

        assert!(
            matches!(result, Err(AccountsServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn create_address_stores_default_flag() -> TestResult {
        let ctx = TestContext::new().await;
        let account = ctx.seed_account("Lan Pham", AccountRole::Customer).await?;

        let address = ctx
            .accounts
            .create_address(NewAddress {
                uuid: AddressUuid::new(),
                account_uuid: account,
                recipient: "Lan Pham".to_string(),
                phone: "0901234567".to_string(),
                line: "1 Tran Hung Dao, Hoan Kiem, Ha Noi".to_string(),
                is_default: true,
            })
            .await?;

        assert_eq!(address.account_uuid, account);
        assert!(address.is_default, "expected default flag to persist");

        Ok(())
    }

    #[tokio::test]
    async fn create_address_for_unknown_account_is_rejected() {
        let ctx = TestContext::new().await;

        let result = ctx
            .accounts
            .create_address(NewAddress {
                uuid: AddressUuid::new(),
                account_uuid: AccountUuid::new(),
                recipient: "Lan Pham".to_string(),
                phone: "0901234567".to_string(),
                line: "1 Tran Hung Dao, Hoan Kiem, Ha Noi".to_string(),
                is_default: false,
            })
            .await;

        assert!(
            matches!(result, Err(AccountsServiceError::InvalidReference)),
            "expected InvalidReference, got {result:?}"
        );
    }
}
