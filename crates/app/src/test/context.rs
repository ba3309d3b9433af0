//! Test context for service-level integration tests.

use testresult::TestResult;

use crate::{
    auth::PgAuthService,
    database::Db,
    domain::{
        accounts::{
            AccountsService, PgAccountsService,
            data::{NewAccount, NewAddress},
            records::{AccountRole, AccountUuid, AddressRecord, AddressUuid},
        },
        carts::PgCartsService,
        products::{PgProductsService, ProductsService, data::NewProduct, records::ProductUuid},
        shipping::PgShippingRatesService,
    },
};

use super::db::TestDb;

/// One isolated database with every Postgres-backed service wired to it.
///
/// Checkout and order tests construct their services by hand so they can
/// inject mocked gateway clients; everything those services persist still
/// lives in `db`.
pub struct TestContext {
    pub db: TestDb,
    pub accounts: PgAccountsService,
    pub auth: PgAuthService,
    pub products: PgProductsService,
    pub carts: PgCartsService,
    pub shipping_rates: PgShippingRatesService,
}

impl TestContext {
    /// Fallback shipping fee wired into `shipping_rates`.
    pub const DEFAULT_SHIPPING_FEE: u64 = 30_000;

    pub async fn new() -> Self {
        let test_db = TestDb::new().await;
        let db = Db::new(test_db.pool().clone());

        Self {
            accounts: PgAccountsService::new(db.clone()),
            auth: PgAuthService::new(db.clone()),
            products: PgProductsService::new(db.clone()),
            carts: PgCartsService::new(db.clone()),
            shipping_rates: PgShippingRatesService::new(db, Self::DEFAULT_SHIPPING_FEE),
            db: test_db,
        }
    }

    /// Store an account and hand back its uuid. Emails are derived from
    /// the uuid so repeated seeds never collide.
    pub async fn seed_account(&self, name: &str, role: AccountRole) -> TestResult<AccountUuid> {
        let uuid = AccountUuid::new();

        self.accounts
            .create_account(NewAccount {
                uuid,
                name: name.to_string(),
                email: format!("{}@example.com", uuid.into_uuid().simple()),
                phone: "0901234567".to_string(),
                role,
            })
            .await?;

        Ok(uuid)
    }

    /// Store a product listing and hand back its uuid.
    pub async fn seed_product(
        &self,
        title: &str,
        price: u64,
        discount_percent: u8,
        stock: u32,
    ) -> TestResult<ProductUuid> {
        let product = self
            .products
            .create_product(NewProduct {
                uuid: ProductUuid::new(),
                title: title.to_string(),
                image_url: None,
                price,
                discount_percent,
                stock,
            })
            .await?;

        Ok(product.uuid)
    }

    /// Store a delivery address for the account.
    pub async fn seed_address(
        &self,
        account: AccountUuid,
        line: &str,
        is_default: bool,
    ) -> TestResult<AddressRecord> {
        Ok(self
            .accounts
            .create_address(NewAddress {
                uuid: AddressUuid::new(),
                account_uuid: account,
                recipient: "Lan Pham".to_string(),
                phone: "0901234567".to_string(),
                line: line.to_string(),
                is_default,
            })
            .await?)
    }
}
