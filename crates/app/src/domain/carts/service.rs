//! Carts service.

use agora::checkout::price_line;
use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        accounts::records::AccountUuid,
        carts::{
            data::NewCartItem,
            errors::CartsServiceError,
            records::{
                CartItemRecord, CartItemUuid, CartLineRecord, CartSnapshot, CartUuid, SnapshotLine,
            },
            repositories::{PgCartItemsRepository, PgCartsRepository},
        },
        products::{PgProductsRepository, records::ProductUuid},
    },
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    carts_repository: PgCartsRepository,
    items_repository: PgCartItemsRepository,
    products_repository: PgProductsRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            carts_repository: PgCartsRepository::new(),
            items_repository: PgCartItemsRepository::new(),
            products_repository: PgProductsRepository::new(),
        }
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    async fn snapshot(&self, account: AccountUuid) -> Result<CartSnapshot, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let cart = self
            .carts_repository
            .get_active_cart(&mut tx, account)
            .await?
            .ok_or(CartsServiceError::CartNotFound)?;

        let lines = self
            .items_repository
            .get_cart_lines(&mut tx, cart.uuid)
            .await?;

        tx.commit().await?;

        Ok(build_snapshot(cart.uuid, lines))
    }

    async fn add_item(
        &self,
        account: AccountUuid,
        item: NewCartItem,
    ) -> Result<CartItemRecord, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        // The FK alone would admit discontinued products; the lookup below
        // filters them the same way the catalog does.
        self.products_repository
            .get_product(&mut tx, item.product_uuid)
            .await
            .map_err(|error| match error {
                sqlx::Error::RowNotFound => CartsServiceError::UnknownProduct,
                other => other.into(),
            })?;

        let cart = self
            .carts_repository
            .get_or_create_cart(&mut tx, CartUuid::new(), account)
            .await?;

        let created = self
            .items_repository
            .upsert_item(
                &mut tx,
                CartItemUuid::new(),
                cart.uuid,
                item.product_uuid,
                item.quantity,
            )
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn set_item_quantity(
        &self,
        account: AccountUuid,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<CartItemRecord, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let cart = self
            .carts_repository
            .get_active_cart(&mut tx, account)
            .await?
            .ok_or(CartsServiceError::CartNotFound)?;

        let updated = self
            .items_repository
            .set_quantity(&mut tx, cart.uuid, product, quantity)
            .await?
            .ok_or(CartsServiceError::ItemNotFound)?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn remove_item(
        &self,
        account: AccountUuid,
        product: ProductUuid,
    ) -> Result<(), CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let cart = self
            .carts_repository
            .get_active_cart(&mut tx, account)
            .await?
            .ok_or(CartsServiceError::CartNotFound)?;

        let rows_affected = self
            .items_repository
            .remove_item(&mut tx, cart.uuid, product)
            .await?;

        if rows_affected == 0 {
            return Err(CartsServiceError::ItemNotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// The account's active cart, priced. Fails with `CartNotFound` when
    /// the account has never put anything in a cart.
    async fn snapshot(&self, account: AccountUuid) -> Result<CartSnapshot, CartsServiceError>;

    /// Add a product to the cart, creating the cart on first use and
    /// merging with an existing line for the same product.
    async fn add_item(
        &self,
        account: AccountUuid,
        item: NewCartItem,
    ) -> Result<CartItemRecord, CartsServiceError>;

    /// Replace a line's quantity.
    async fn set_item_quantity(
        &self,
        account: AccountUuid,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<CartItemRecord, CartsServiceError>;

    /// Drop a line from the cart.
    async fn remove_item(
        &self,
        account: AccountUuid,
        product: ProductUuid,
    ) -> Result<(), CartsServiceError>;
}

/// Price the kept lines of a cart and report the dropped ones.
///
/// Discontinued products are not an error: the line moves to `skipped` so
/// a product pulled from sale never blocks the rest of the cart.
pub(crate) fn build_snapshot(cart: CartUuid, lines: Vec<CartLineRecord>) -> CartSnapshot {
    let mut kept = Vec::with_capacity(lines.len());
    let mut skipped = Vec::new();
    let mut subtotal = 0_u64;

    for line in lines {
        if line.discontinued {
            skipped.push(line.product_uuid);
            continue;
        }

        let priced = price_line(line.price, line.discount_percent, line.quantity);

        subtotal += priced.line_total;

        kept.push(SnapshotLine {
            product_uuid: line.product_uuid,
            title: line.title,
            image_url: line.image_url,
            unit_price: priced.unit_price,
            discount_percent: priced.discount_percent,
            final_unit_price: priced.final_unit_price,
            quantity: priced.quantity,
            line_total: priced.line_total,
        });
    }

    CartSnapshot {
        cart_uuid: cart,
        lines: kept,
        skipped,
        subtotal,
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::{accounts::records::AccountRole, products::service::ProductsService},
        test::TestContext,
    };

    use super::*;

    #[tokio::test]
    async fn snapshot_without_a_cart_returns_cart_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let account = ctx.seed_account("Lan Pham", AccountRole::Customer).await?;

        let result = ctx.carts.snapshot(account).await;

        assert!(
            matches!(result, Err(CartsServiceError::CartNotFound)),
            "expected CartNotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn add_item_creates_the_cart_lazily() -> TestResult {
        let ctx = TestContext::new().await;
        let account = ctx.seed_account("Lan Pham", AccountRole::Customer).await?;
        let product = ctx.seed_product("Gentle Cleanser", 150_000, 0, 10).await?;

        let item = ctx
            .carts
            .add_item(
                account,
                NewCartItem {
                    product_uuid: product,
                    quantity: 2,
                },
            )
            .await?;

        assert_eq!(item.product_uuid, product);
        assert_eq!(item.quantity, 2);

        let snapshot = ctx.carts.snapshot(account).await?;

        assert_eq!(snapshot.lines.len(), 1);
        assert_eq!(snapshot.lines[0].quantity, 2);

        Ok(())
    }

    #[tokio::test]
    async fn adding_the_same_product_merges_quantities() -> TestResult {
        let ctx = TestContext::new().await;
        let account = ctx.seed_account("Lan Pham", AccountRole::Customer).await?;
        let product = ctx.seed_product("Gentle Cleanser", 150_000, 0, 10).await?;

        ctx.carts
            .add_item(
                account,
                NewCartItem {
                    product_uuid: product,
                    quantity: 2,
                },
            )
            .await?;

        let merged = ctx
            .carts
            .add_item(
                account,
                NewCartItem {
                    product_uuid: product,
                    quantity: 3,
                },
            )
            .await?;

        assert_eq!(merged.quantity, 5);

        let snapshot = ctx.carts.snapshot(account).await?;

        assert_eq!(snapshot.lines.len(), 1, "merged adds stay a single line");
        assert_eq!(snapshot.lines[0].quantity, 5);

        Ok(())
    }

    #[tokio::test]
    async fn snapshot_prices_lines_with_the_current_discount() -> TestResult {
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

        let snapshot = ctx.carts.snapshot(account).await?;

        assert_eq!(snapshot.lines[0].unit_price, 100_000);
        assert_eq!(snapshot.lines[0].final_unit_price, 90_000);
        assert_eq!(snapshot.lines[0].line_total, 180_000);
        assert_eq!(snapshot.subtotal, 180_000);
        assert!(snapshot.skipped.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn discontinued_products_are_skipped_not_priced() -> TestResult {
        let ctx = TestContext::new().await;
        let account = ctx.seed_account("Lan Pham", AccountRole::Customer).await?;
        let kept = ctx.seed_product("Gentle Cleanser", 150_000, 0, 10).await?;
        let pulled = ctx.seed_product("Old Stock", 80_000, 0, 10).await?;

        for product in [kept, pulled] {
            ctx.carts
                .add_item(
                    account,
                    NewCartItem {
                        product_uuid: product,
                        quantity: 1,
                    },
                )
                .await?;
        }

        ctx.products.delete_product(pulled).await?;

        let snapshot = ctx.carts.snapshot(account).await?;

        assert_eq!(snapshot.lines.len(), 1);
        assert_eq!(snapshot.lines[0].product_uuid, kept);
        assert_eq!(snapshot.skipped, vec![pulled]);
        assert_eq!(snapshot.subtotal, 150_000);

        Ok(())
    }

    #[tokio::test]
    async fn add_item_rejects_discontinued_products() -> TestResult {
        let ctx = TestContext::new().await;
        let account = ctx.seed_account("Lan Pham", AccountRole::Customer).await?;
        let product = ctx.seed_product("Old Stock", 80_000, 0, 10).await?;

        ctx.products.delete_product(product).await?;

        let result = ctx
            .carts
            .add_item(
                account,
                NewCartItem {
                    product_uuid: product,
                    quantity: 1,
                },
            )
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::UnknownProduct)),
            "expected UnknownProduct, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn add_item_unknown_product_returns_unknown_product() -> TestResult {
        let ctx = TestContext::new().await;
        let account = ctx.seed_account("Lan Pham", AccountRole::Customer).await?;

        let result = ctx
            .carts
            .add_item(
                account,
                NewCartItem {
                    product_uuid: ProductUuid::new(),
                    quantity: 1,
                },
            )
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::UnknownProduct)),
            "expected UnknownProduct, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn add_item_zero_quantity_returns_invalid_quantity() -> TestResult {
        let ctx = TestContext::new().await;
        let account = ctx.seed_account("Lan Pham", AccountRole::Customer).await?;
        let product = ctx.seed_product("Gentle Cleanser", 150_000, 0, 10).await?;

        let result = ctx
            .carts
            .add_item(
                account,
                NewCartItem {
                    product_uuid: product,
                    quantity: 0,
                },
            )
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidQuantity)),
            "expected InvalidQuantity, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn set_item_quantity_replaces_the_quantity() -> TestResult {
        let ctx = TestContext::new().await;
        let account = ctx.seed_account("Lan Pham", AccountRole::Customer).await?;
        let product = ctx.seed_product("Gentle Cleanser", 150_000, 0, 10).await?;

        ctx.carts
            .add_item(
                account,
                NewCartItem {
                    product_uuid: product,
                    quantity: 2,
                },
            )
            .await?;

        let updated = ctx.carts.set_item_quantity(account, product, 7).await?;

        assert_eq!(updated.quantity, 7);

        Ok(())
    }

    #[tokio::test]
    async fn set_item_quantity_unknown_line_returns_item_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let account = ctx.seed_account("Lan Pham", AccountRole::Customer).await?;
        let in_cart = ctx.seed_product("Gentle Cleanser", 150_000, 0, 10).await?;
        let not_in_cart = ctx.seed_product("Vitamin C Serum", 200_000, 0, 10).await?;

        ctx.carts
            .add_item(
                account,
                NewCartItem {
                    product_uuid: in_cart,
                    quantity: 1,
                },
            )
            .await?;

        let result = ctx.carts.set_item_quantity(account, not_in_cart, 2).await;

        assert!(
            matches!(result, Err(CartsServiceError::ItemNotFound)),
            "expected ItemNotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn remove_item_deletes_the_line() -> TestResult {
        let ctx = TestContext::new().await;
        let account = ctx.seed_account("Lan Pham", AccountRole::Customer).await?;
        let product = ctx.seed_product("Gentle Cleanser", 150_000, 0, 10).await?;

        ctx.carts
            .add_item(
                account,
                NewCartItem {
                    product_uuid: product,
                    quantity: 1,
                },
            )
            .await?;

        ctx.carts.remove_item(account, product).await?;

        let snapshot = ctx.carts.snapshot(account).await?;

        assert!(snapshot.is_empty());
        assert!(snapshot.skipped.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn remove_item_unknown_line_returns_item_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let account = ctx.seed_account("Lan Pham", AccountRole::Customer).await?;
        let product = ctx.seed_product("Gentle Cleanser", 150_000, 0, 10).await?;

        ctx.carts
            .add_item(
                account,
                NewCartItem {
                    product_uuid: product,
                    quantity: 1,
                },
            )
            .await?;

        let result = ctx.carts.remove_item(account, ProductUuid::new()).await;

        assert!(
            matches!(result, Err(CartsServiceError::ItemNotFound)),
            "expected ItemNotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn carts_are_scoped_per_account() -> TestResult {
        let ctx = TestContext::new().await;
        let buyer = ctx.seed_account("Lan Pham", AccountRole::Customer).await?;
        let other = ctx.seed_account("Minh Tran", AccountRole::Customer).await?;
        let product = ctx.seed_product("Gentle Cleanser", 150_000, 0, 10).await?;

        ctx.carts
            .add_item(
                buyer,
                NewCartItem {
                    product_uuid: product,
                    quantity: 1,
                },
            )
            .await?;

        let result = ctx.carts.snapshot(other).await;

        assert!(
            matches!(result, Err(CartsServiceError::CartNotFound)),
            "expected CartNotFound for the other account, got {result:?}"
        );

        Ok(())
    }
}
