//! Payments service.
//!
//! The gateway reports back asynchronously, and it may report more than
//! once. Settling locks the payment row, so concurrent deliveries
//! serialise; whichever lands second either repeats the same write or
//! is dropped.

use async_trait::async_trait;
use mockall::automock;
use tracing::{info, warn};

use crate::{
    database::Db,
    domain::{
        orders::{PgOrdersRepository, records::OrderUuid},
        payments::{
            PgPaymentsRepository,
            errors::PaymentsServiceError,
            records::{GatewayResult, PaymentRecord, PaymentStatus},
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgPaymentsService {
    db: Db,
    payments_repository: PgPaymentsRepository,
    orders_repository: PgOrdersRepository,
}

impl PgPaymentsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            payments_repository: PgPaymentsRepository::new(),
            orders_repository: PgOrdersRepository::new(),
        }
    }
}

#[async_trait]
impl PaymentsService for PgPaymentsService {
    #[tracing::instrument(
        name = "payments.service.apply_gateway_result",
        skip(self, result),
        fields(order_uuid = %order, result_code = result.result_code),
        err
    )]
    async fn apply_gateway_result(
        &self,
        order: OrderUuid,
        result: GatewayResult,
    ) -> Result<PaymentRecord, PaymentsServiceError> {
        let mut tx = self.db.begin().await?;

        let payment = self
            .payments_repository
            .get_payment_for_order(&mut tx, order)
            .await?;

        let outcome = result.outcome();

        // A delivery that contradicts a settled payment is dropped;
        // repeating the recorded outcome is a harmless rewrite.
        if payment.status != PaymentStatus::Pending && payment.status != outcome {
            warn!(
                recorded = %payment.status,
                reported = %outcome,
                "conflicting gateway re-delivery ignored"
            );

            tx.commit().await?;

            return Ok(payment);
        }

        let updated = self
            .payments_repository
            .update_payment(
                &mut tx,
                payment.uuid,
                outcome,
                result.transaction_id.as_deref(),
                &result.raw,
            )
            .await?;

        self.orders_repository
            .set_payment_status(&mut tx, order, outcome)
            .await?;

        tx.commit().await?;

        info!(status = %outcome, "payment settled");

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait PaymentsService: Send + Sync {
    /// Record what the gateway reported for an order: the payment row
    /// takes the outcome, transaction id and raw payload, and the order
    /// row mirrors the outcome.
    async fn apply_gateway_result(
        &self,
        order: OrderUuid,
        result: GatewayResult,
    ) -> Result<PaymentRecord, PaymentsServiceError>;
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use testresult::TestResult;

    use crate::{
        database::Db,
        domain::{
            accounts::records::AccountRole,
            carts::{CartsService, data::NewCartItem},
            orders::{
                OrdersService, PgOrdersService, data::PlaceOrder, records::OrderUuid,
            },
            payments::records::PaymentMethod,
        },
        gateways::{Coordinate, MockGeoClient, MockPaymentGateway},
        test::TestContext,
    };

    use super::*;

    fn payments(ctx: &TestContext) -> PgPaymentsService {
        PgPaymentsService::new(Db::new(ctx.db.pool().clone()))
    }

    /// Place a 240 000 VND gateway order for a fresh account, with the
    /// provider and gateway both answering happily.
    async fn placed_momo_order(ctx: &TestContext) -> TestResult<OrderUuid> {
        let account = ctx.seed_account("Lan Pham", AccountRole::Customer).await?;
        let product = ctx.seed_product("Vitamin C Serum", 100_000, 10, 10).await?;
        let address = ctx
            .seed_address(account, "1 Tran Hung Dao, Hoan Kiem, Ha Noi", true)
            .await?;

        ctx.carts
            .add_item(
                account,
                NewCartItem {
                    product_uuid: product,
                    quantity: 2,
                },
            )
            .await?;

        let mut geo = MockGeoClient::new();
        geo.expect_geocode().returning(|_| {
            Ok(Coordinate {
                lat: 21.0285,
                lng: 105.8542,
            })
        });
        geo.expect_drive_distance().returning(|_| Ok(5_000));

        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_create_payment()
            .returning(|_| Ok("https://test-payment.momo.vn/pay/agora".to_string()));

        let orders = PgOrdersService::new(
            Db::new(ctx.db.pool().clone()),
            Arc::new(geo),
            Arc::new(gateway),
            TestContext::DEFAULT_SHIPPING_FEE,
        );

        let placed = orders
            .place_order(
                account,
                PlaceOrder {
                    uuid: OrderUuid::new(),
                    recipient: "Lan Pham".to_string(),
                    email: "lan@example.com".to_string(),
                    phone: "0901234567".to_string(),
                    address_uuid: address.uuid,
                    payment_method: PaymentMethod::Momo,
                },
            )
            .await?;

        Ok(placed.uuid)
    }

    fn delivered(order: OrderUuid, result_code: i64, trans_id: &str) -> GatewayResult {
        GatewayResult {
            result_code,
            transaction_id: Some(trans_id.to_string()),
            message: Some("Successful.".to_string()),
            raw: json!({
                "orderId": order.to_string(),
                "resultCode": result_code,
                "transId": trans_id,
                "message": "Successful.",
            }),
        }
    }

    async fn order_payment_status(
        ctx: &TestContext,
        order: OrderUuid,
    ) -> TestResult<PaymentStatus> {
        let mut tx = Db::new(ctx.db.pool().clone()).begin().await?;
        let record = PgOrdersRepository::new().get_order(&mut tx, order).await?;
        tx.commit().await?;

        Ok(record.payment_status)
    }

    #[tokio::test]
    async fn a_success_callback_settles_payment_and_order() -> TestResult {
        let ctx = TestContext::new().await;
        let order = placed_momo_order(&ctx).await?;

        let payment = payments(&ctx)
            .apply_gateway_result(order, delivered(order, 0, "2556818103"))
            .await?;

        assert_eq!(payment.status, PaymentStatus::Completed);
        assert_eq!(payment.transaction_id.as_deref(), Some("2556818103"));
        assert!(payment.gateway_response.is_some(), "raw payload is kept");
        assert_eq!(
            order_payment_status(&ctx, order).await?,
            PaymentStatus::Completed
        );

        Ok(())
    }

    #[tokio::test]
    async fn a_failure_callback_marks_both_failed() -> TestResult {
        let ctx = TestContext::new().await;
        let order = placed_momo_order(&ctx).await?;

        let payment = payments(&ctx)
            .apply_gateway_result(order, delivered(order, 1006, "0"))
            .await?;

        assert_eq!(payment.status, PaymentStatus::Failed);
        assert!(payment.gateway_response.is_some(), "raw payload is kept");
        assert_eq!(
            order_payment_status(&ctx, order).await?,
            PaymentStatus::Failed
        );

        Ok(())
    }

    #[tokio::test]
    async fn repeating_the_same_outcome_is_idempotent() -> TestResult {
        let ctx = TestContext::new().await;
        let order = placed_momo_order(&ctx).await?;
        let service = payments(&ctx);

        service
            .apply_gateway_result(order, delivered(order, 0, "2556818103"))
            .await?;
        let payment = service
            .apply_gateway_result(order, delivered(order, 0, "2556818103"))
            .await?;

        assert_eq!(payment.status, PaymentStatus::Completed);
        assert_eq!(payment.transaction_id.as_deref(), Some("2556818103"));

        Ok(())
    }

    #[tokio::test]
    async fn a_conflicting_redelivery_is_ignored() -> TestResult {
        let ctx = TestContext::new().await;
        let order = placed_momo_order(&ctx).await?;
        let service = payments(&ctx);

        service
            .apply_gateway_result(order, delivered(order, 0, "2556818103"))
            .await?;
        let payment = service
            .apply_gateway_result(order, delivered(order, 1006, "0"))
            .await?;

        assert_eq!(payment.status, PaymentStatus::Completed);
        assert_eq!(
            order_payment_status(&ctx, order).await?,
            PaymentStatus::Completed
        );

        Ok(())
    }

    #[tokio::test]
    async fn a_callback_for_an_unknown_order_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let stray = OrderUuid::new();

        let result = payments(&ctx)
            .apply_gateway_result(stray, delivered(stray, 0, "2556818103"))
            .await;

        assert!(
            matches!(result, Err(PaymentsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }
}
