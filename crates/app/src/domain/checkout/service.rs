//! Checkout service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use tracing::{Span, info};

use agora::checkout::CheckoutTotals;

use crate::{
    database::Db,
    domain::{
        accounts::{
            PgAccountsRepository,
            records::{AccountUuid, AddressRecord, AddressUuid},
        },
        carts::{PgCartItemsRepository, PgCartsRepository, build_snapshot},
        checkout::{errors::CheckoutServiceError, records::CheckoutPreview},
        shipping::{PgShippingRatesRepository, load_active_schedule},
    },
    gateways::GeoClient,
};

#[derive(Clone)]
pub struct PgCheckoutService {
    db: Db,
    carts_repository: PgCartsRepository,
    items_repository: PgCartItemsRepository,
    accounts_repository: PgAccountsRepository,
    rates_repository: PgShippingRatesRepository,
    geo: Arc<dyn GeoClient>,
    default_fee: u64,
}

impl PgCheckoutService {
    #[must_use]
    pub fn new(db: Db, geo: Arc<dyn GeoClient>, default_fee: u64) -> Self {
        Self {
            db,
            carts_repository: PgCartsRepository::new(),
            items_repository: PgCartItemsRepository::new(),
            accounts_repository: PgAccountsRepository::new(),
            rates_repository: PgShippingRatesRepository::new(),
            geo,
            default_fee,
        }
    }

    async fn resolve_address(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        account: AccountUuid,
        address: Option<AddressUuid>,
    ) -> Result<AddressRecord, CheckoutServiceError> {
        match address {
            Some(uuid) => Ok(self
                .accounts_repository
                .get_address(tx, account, uuid)
                .await?),
            None => self
                .accounts_repository
                .get_default_address(tx, account)
                .await?
                .ok_or(CheckoutServiceError::AddressNotFound),
        }
    }
}

#[async_trait]
impl CheckoutService for PgCheckoutService {
    #[tracing::instrument(
        name = "checkout.service.preview",
        skip(self, address),
        fields(account_uuid = %account, distance_m = tracing::field::Empty),
        err
    )]
    async fn preview(
        &self,
        account: AccountUuid,
        address: Option<AddressUuid>,
    ) -> Result<CheckoutPreview, CheckoutServiceError> {
        let mut tx = self.db.begin().await?;

        let Some(cart) = self.carts_repository.get_active_cart(&mut tx, account).await? else {
            return Err(CheckoutServiceError::CartNotFound);
        };

        let lines = self
            .items_repository
            .get_cart_lines(&mut tx, cart.uuid)
            .await?;

        let snapshot = build_snapshot(cart.uuid, lines);

        if snapshot.is_empty() {
            return Err(CheckoutServiceError::CartEmpty);
        }

        let address = self.resolve_address(&mut tx, account, address).await?;

        let schedule =
            load_active_schedule(&self.rates_repository, &mut tx, self.default_fee).await?;

        tx.commit().await?;

        // The provider round trips happen outside the transaction; the
        // preview holds no locks while the network answers.
        let destination = self.geo.geocode(&address.line).await?;
        let distance_m = self.geo.drive_distance(destination).await?;

        Span::current().record("distance_m", distance_m);

        let totals = CheckoutTotals::new(snapshot.subtotal, schedule.quote(distance_m).fee());

        info!(
            subtotal = totals.subtotal,
            shipping_fee = totals.shipping_fee,
            total = totals.total,
            "checkout preview priced"
        );

        Ok(CheckoutPreview {
            cart_uuid: snapshot.cart_uuid,
            lines: snapshot.lines,
            skipped: snapshot.skipped,
            totals,
            address,
            distance_m,
        })
    }
}

#[automock]
#[async_trait]
pub trait CheckoutService: Send + Sync {
    /// Price the active cart against a delivery address.
    ///
    /// With no `address`, the account's default address is used. The
    /// preview writes nothing; repeated calls re-quote freely.
    async fn preview(
        &self,
        account: AccountUuid,
        address: Option<AddressUuid>,
    ) -> Result<CheckoutPreview, CheckoutServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::{
            accounts::records::AccountRole,
            carts::{CartsService, data::NewCartItem},
            products::{ProductsService, records::ProductUuid},
            shipping::{
                ShippingRatesService,
                data::NewShippingRate,
                records::{RateStatus, ShippingRateUuid},
            },
        },
        gateways::{Coordinate, GeoError, MockGeoClient},
        test::TestContext,
    };

    use super::*;

    const HOAN_KIEM: Coordinate = Coordinate {
        lat: 21.0285,
        lng: 105.8542,
    };

    fn checkout(ctx: &TestContext, geo: MockGeoClient) -> PgCheckoutService {
        PgCheckoutService::new(
            Db::new(ctx.db.pool().clone()),
            Arc::new(geo),
            TestContext::DEFAULT_SHIPPING_FEE,
        )
    }

    /// A provider that resolves every address and reports the given
    /// drive distance.
    fn geo_with_distance(distance_m: i64) -> MockGeoClient {
        let mut geo = MockGeoClient::new();

        geo.expect_geocode().returning(|_| Ok(HOAN_KIEM));
        geo.expect_drive_distance()
            .returning(move |_| Ok(distance_m));

        geo
    }

    async fn add_one(ctx: &TestContext, account: AccountUuid, product: ProductUuid) -> TestResult {
        ctx.carts
            .add_item(
                account,
                NewCartItem {
                    product_uuid: product,
                    quantity: 1,
                },
            )
            .await?;

        Ok(())
    }

    #[tokio::test]
    async fn preview_prices_the_cart_and_quotes_shipping() -> TestResult {
        let ctx = TestContext::new().await;
        let account = ctx.seed_account("Lan Pham", AccountRole::Customer).await?;
        let product = ctx.seed_product("Vitamin C Serum", 100_000, 10, 10).await?;

        ctx.carts
            .add_item(
                account,
                NewCartItem {
                    product_uuid: product,
                    quantity: 2,
                },
            )
            .await?;
        ctx.seed_address(account, "1 Tran Hung Dao, Hoan Kiem, Ha Noi", true)
            .await?;
        ctx.shipping_rates
            .create_rate(NewShippingRate {
                uuid: ShippingRateUuid::new(),
                from_km: 0,
                to_km: 10,
                base_fee: 50_000,
                per_km_fee: 2_000,
                status: RateStatus::Active,
            })
            .await?;

        let preview = checkout(&ctx, geo_with_distance(5_000))
            .preview(account, None)
            .await?;

        // 2 × 90 000 = 180 000, plus 50 000 + 5 × 2 000 delivery.
        assert_eq!(preview.totals.subtotal, 180_000);
        assert_eq!(preview.totals.shipping_fee, 60_000);
        assert_eq!(preview.totals.total, 240_000);
        assert_eq!(preview.distance_m, 5_000);
        assert_eq!(preview.lines.len(), 1);
        assert!(preview.skipped.is_empty(), "nothing should be skipped");

        Ok(())
    }

    #[tokio::test]
    async fn repeated_previews_quote_the_same_prices() -> TestResult {
        let ctx = TestContext::new().await;
        let account = ctx.seed_account("Lan Pham", AccountRole::Customer).await?;
        let product = ctx.seed_product("Vitamin C Serum", 100_000, 10, 10).await?;

        ctx.carts
            .add_item(
                account,
                NewCartItem {
                    product_uuid: product,
                    quantity: 2,
                },
            )
            .await?;
        ctx.seed_address(account, "1 Tran Hung Dao, Hoan Kiem, Ha Noi", true)
            .await?;
        ctx.shipping_rates
            .create_rate(NewShippingRate {
                uuid: ShippingRateUuid::new(),
                from_km: 0,
                to_km: 10,
                base_fee: 50_000,
                per_km_fee: 2_000,
                status: RateStatus::Active,
            })
            .await?;

        let service = checkout(&ctx, geo_with_distance(5_000));

        let first = service.preview(account, None).await?;
        let second = service.preview(account, None).await?;

        // Nothing changed between the calls, so the quote must not either.
        assert_eq!(first.totals, second.totals);
        assert_eq!(first.lines, second.lines);
        assert_eq!(first.skipped, second.skipped);
        assert_eq!(first.distance_m, second.distance_m);
        assert_eq!(second.totals.total, 240_000);

        Ok(())
    }

    #[tokio::test]
    async fn preview_without_a_cart_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let account = ctx.seed_account("Lan Pham", AccountRole::Customer).await?;

        let result = checkout(&ctx, MockGeoClient::new())
            .preview(account, None)
            .await;

        assert!(
            matches!(result, Err(CheckoutServiceError::CartNotFound)),
            "expected CartNotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn preview_of_an_emptied_cart_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let account = ctx.seed_account("Lan Pham", AccountRole::Customer).await?;
        let product = ctx.seed_product("Gentle Cleanser", 150_000, 0, 10).await?;

        add_one(&ctx, account, product).await?;
        ctx.carts.remove_item(account, product).await?;

        let result = checkout(&ctx, MockGeoClient::new())
            .preview(account, None)
            .await;

        assert!(
            matches!(result, Err(CheckoutServiceError::CartEmpty)),
            "expected CartEmpty, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn a_cart_of_only_discontinued_products_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let account = ctx.seed_account("Lan Pham", AccountRole::Customer).await?;
        let product = ctx.seed_product("Old Stock", 80_000, 0, 10).await?;

        add_one(&ctx, account, product).await?;
        ctx.products.delete_product(product).await?;

        let result = checkout(&ctx, MockGeoClient::new())
            .preview(account, None)
            .await;

        assert!(
            matches!(result, Err(CheckoutServiceError::CartEmpty)),
            "expected CartEmpty, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn preview_without_any_address_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let account = ctx.seed_account("Lan Pham", AccountRole::Customer).await?;
        let product = ctx.seed_product("Gentle Cleanser", 150_000, 0, 10).await?;

        add_one(&ctx, account, product).await?;

        let result = checkout(&ctx, MockGeoClient::new())
            .preview(account, None)
            .await;

        assert!(
            matches!(result, Err(CheckoutServiceError::AddressNotFound)),
            "expected AddressNotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn a_named_address_must_belong_to_the_account() -> TestResult {
        let ctx = TestContext::new().await;
        let account = ctx.seed_account("Lan Pham", AccountRole::Customer).await?;
        let other = ctx.seed_account("Minh Tran", AccountRole::Customer).await?;
        let product = ctx.seed_product("Gentle Cleanser", 150_000, 0, 10).await?;

        add_one(&ctx, account, product).await?;
        let foreign = ctx
            .seed_address(other, "22 Ly Tu Trong, Quan 1, TP HCM", true)
            .await?;

        let result = checkout(&ctx, MockGeoClient::new())
            .preview(account, Some(foreign.uuid))
            .await;

        assert!(
            matches!(result, Err(CheckoutServiceError::AddressNotFound)),
            "expected AddressNotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn a_failed_geocode_surfaces() -> TestResult {
        let ctx = TestContext::new().await;
        let account = ctx.seed_account("Lan Pham", AccountRole::Customer).await?;
        let product = ctx.seed_product("Gentle Cleanser", 150_000, 0, 10).await?;

        add_one(&ctx, account, product).await?;
        ctx.seed_address(account, "unmappable", true).await?;

        let mut geo = MockGeoClient::new();
        geo.expect_geocode().returning(|_| Err(GeoError::GeocodeFailed));

        let result = checkout(&ctx, geo).preview(account, None).await;

        assert!(
            matches!(
                result,
                Err(CheckoutServiceError::Geo(GeoError::GeocodeFailed))
            ),
            "expected GeocodeFailed, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn an_unroutable_address_surfaces() -> TestResult {
        let ctx = TestContext::new().await;
        let account = ctx.seed_account("Lan Pham", AccountRole::Customer).await?;
        let product = ctx.seed_product("Gentle Cleanser", 150_000, 0, 10).await?;

        add_one(&ctx, account, product).await?;
        ctx.seed_address(account, "1 Tran Hung Dao, Hoan Kiem, Ha Noi", true)
            .await?;

        let mut geo = MockGeoClient::new();
        geo.expect_geocode().returning(|_| Ok(HOAN_KIEM));
        geo.expect_drive_distance().returning(|_| {
            Err(GeoError::DistanceUnavailable {
                status: "ZERO_RESULTS".to_string(),
            })
        });

        let result = checkout(&ctx, geo).preview(account, None).await;

        assert!(
            matches!(
                result,
                Err(CheckoutServiceError::Geo(GeoError::DistanceUnavailable { .. }))
            ),
            "expected DistanceUnavailable, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn a_distance_no_rate_covers_uses_the_fallback_fee() -> TestResult {
        let ctx = TestContext::new().await;
        let account = ctx.seed_account("Lan Pham", AccountRole::Customer).await?;
        let product = ctx.seed_product("Gentle Cleanser", 150_000, 0, 10).await?;

        add_one(&ctx, account, product).await?;
        ctx.seed_address(account, "1 Tran Hung Dao, Hoan Kiem, Ha Noi", true)
            .await?;

        let preview = checkout(&ctx, geo_with_distance(75_000))
            .preview(account, None)
            .await?;

        assert_eq!(
            preview.totals.shipping_fee,
            TestContext::DEFAULT_SHIPPING_FEE
        );
        assert_eq!(
            preview.totals.total,
            150_000 + TestContext::DEFAULT_SHIPPING_FEE
        );

        Ok(())
    }
}
