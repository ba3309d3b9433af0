//! Orders service.
//!
//! Placement is the one flow that touches every domain: it prices the
//! active cart, resolves the delivery fee, then moves stock, order,
//! payment and cart in a single transaction. Status changes run the
//! transition machine against the stored trail and write back only the
//! rows the transition touched.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::{Span, info};

use agora::{
    checkout::CheckoutTotals,
    money::within_gateway_bounds,
    status::{OrderStatus, StatusEntry, StatusHistory, Transition},
};

use crate::{
    auth::CurrentAccount,
    database::Db,
    domain::{
        accounts::{PgAccountsRepository, records::AccountUuid},
        carts::{PgCartItemsRepository, PgCartsRepository, build_snapshot, records::CartSnapshot},
        orders::{
            PgOrdersRepository,
            data::{NewOrder, PlaceOrder},
            errors::OrdersServiceError,
            records::{OrderDetail, OrderRecord, OrderStatusRecord, OrderUuid, PlacedOrder},
        },
        payments::{
            PgPaymentsRepository,
            data::NewPayment,
            records::{PaymentMethod, PaymentUuid},
        },
        products::PgProductsRepository,
        shipping::{PgShippingRatesRepository, load_active_schedule},
    },
    gateways::{GeoClient, PaymentGateway, PaymentRequest},
    pagination::{Page, PageRequest},
};

#[derive(Clone)]
pub struct PgOrdersService {
    db: Db,
    orders_repository: PgOrdersRepository,
    carts_repository: PgCartsRepository,
    items_repository: PgCartItemsRepository,
    accounts_repository: PgAccountsRepository,
    products_repository: PgProductsRepository,
    rates_repository: PgShippingRatesRepository,
    payments_repository: PgPaymentsRepository,
    geo: Arc<dyn GeoClient>,
    gateway: Arc<dyn PaymentGateway>,
    default_fee: u64,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(
        db: Db,
        geo: Arc<dyn GeoClient>,
        gateway: Arc<dyn PaymentGateway>,
        default_fee: u64,
    ) -> Self {
        Self {
            db,
            orders_repository: PgOrdersRepository::new(),
            carts_repository: PgCartsRepository::new(),
            items_repository: PgCartItemsRepository::new(),
            accounts_repository: PgAccountsRepository::new(),
            products_repository: PgProductsRepository::new(),
            rates_repository: PgShippingRatesRepository::new(),
            payments_repository: PgPaymentsRepository::new(),
            geo,
            gateway,
            default_fee,
        }
    }

    /// The buyer's active cart, priced, or the reason there is nothing
    /// to order.
    async fn active_snapshot(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        account: AccountUuid,
    ) -> Result<CartSnapshot, OrdersServiceError> {
        let Some(cart) = self.carts_repository.get_active_cart(tx, account).await? else {
            return Err(OrdersServiceError::CartNotFound);
        };

        let lines = self.items_repository.get_cart_lines(tx, cart.uuid).await?;
        let snapshot = build_snapshot(cart.uuid, lines);

        if snapshot.is_empty() {
            return Err(OrdersServiceError::CartEmpty);
        }

        Ok(snapshot)
    }

    async fn stored_history(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<StatusHistory, OrdersServiceError> {
        let rows = self.orders_repository.get_status_history(tx, order).await?;
        let entries = rows.iter().map(OrderStatusRecord::entry).collect();

        Ok(StatusHistory::from_entries(entries)?)
    }

    /// Write back exactly what a transition did to the trail: surviving
    /// rows are never rewritten.
    async fn apply_transition(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        transition: Transition,
        now: Timestamp,
    ) -> Result<(), OrdersServiceError> {
        match transition {
            Transition::NoChange => {}
            Transition::Refresh { kept } => {
                self.orders_repository
                    .delete_status_from(tx, order, kept)
                    .await?;
                self.orders_repository
                    .touch_status_entry(tx, order, kept - 1, now)
                    .await?;
            }
            Transition::Append { kept, status } => {
                self.orders_repository
                    .delete_status_from(tx, order, kept)
                    .await?;
                self.orders_repository
                    .insert_status_entry(tx, order, kept, status, now)
                    .await?;
            }
            Transition::Rewind { kept } => {
                self.orders_repository
                    .delete_status_from(tx, order, kept)
                    .await?;
            }
        }

        Ok(())
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    #[tracing::instrument(
        name = "orders.service.place_order",
        skip(self, order),
        fields(
            account_uuid = %account,
            order_uuid = %order.uuid,
            payment_method = %order.payment_method,
            total = tracing::field::Empty,
        ),
        err
    )]
    async fn place_order(
        &self,
        account: AccountUuid,
        order: PlaceOrder,
    ) -> Result<PlacedOrder, OrdersServiceError> {
        let PlaceOrder {
            uuid,
            recipient,
            email,
            phone,
            address_uuid,
            payment_method,
        } = order;

        // First pass reads only: fail fast and price the delivery while
        // holding no transaction open across the provider round trips.
        let mut tx = self.db.begin().await?;

        self.active_snapshot(&mut tx, account).await?;

        let address = self
            .accounts_repository
            .get_address(&mut tx, account, address_uuid)
            .await
            .map_err(address_not_found)?;

        let schedule =
            load_active_schedule(&self.rates_repository, &mut tx, self.default_fee).await?;

        tx.commit().await?;

        let destination = self.geo.geocode(&address.line).await?;
        let distance_m = self.geo.drive_distance(destination).await?;
        let shipping_fee = schedule.quote(distance_m).fee();

        // Second pass writes. Stock, order, payment and the cart move
        // together; a failed line rolls all of it back.
        let mut tx = self.db.begin().await?;

        let snapshot = self.active_snapshot(&mut tx, account).await?;

        for line in &snapshot.lines {
            let reserved = self
                .products_repository
                .reserve_stock(&mut tx, line.product_uuid, line.quantity)
                .await?;

            if reserved == 0 {
                return Err(OrdersServiceError::InsufficientStock {
                    product: line.product_uuid,
                });
            }
        }

        let totals = CheckoutTotals::new(snapshot.subtotal, shipping_fee);

        if !within_gateway_bounds(totals.total) {
            return Err(OrdersServiceError::AmountOutOfRange {
                amount: totals.total,
            });
        }

        let record = self
            .orders_repository
            .insert_order(
                &mut tx,
                &NewOrder {
                    uuid,
                    account_uuid: account,
                    cart_uuid: snapshot.cart_uuid,
                    recipient,
                    email,
                    phone,
                    address_line: address.line,
                    payment_method,
                    subtotal: totals.subtotal,
                    shipping_fee: totals.shipping_fee,
                    total: totals.total,
                },
            )
            .await?;

        for line in &snapshot.lines {
            self.orders_repository
                .insert_order_item(
                    &mut tx,
                    record.uuid,
                    line.product_uuid,
                    line.unit_price,
                    line.discount_percent,
                    line.quantity,
                )
                .await?;
        }

        self.orders_repository
            .insert_status_entry(
                &mut tx,
                record.uuid,
                0,
                OrderStatus::ReceivingOrders,
                record.created_at,
            )
            .await?;

        let payment_uuid = PaymentUuid::new();
        let request_id = match payment_method {
            PaymentMethod::Momo => Some(payment_uuid.to_string()),
            PaymentMethod::Cod => None,
        };

        self.payments_repository
            .insert_payment(
                &mut tx,
                &NewPayment {
                    uuid: payment_uuid,
                    order_uuid: record.uuid,
                    method: payment_method,
                    amount: totals.total,
                    request_id: request_id.clone(),
                },
            )
            .await?;

        self.items_repository
            .clear_items(&mut tx, snapshot.cart_uuid)
            .await?;

        tx.commit().await?;

        Span::current().record("total", totals.total);

        info!(
            subtotal = totals.subtotal,
            shipping_fee = totals.shipping_fee,
            total = totals.total,
            "order placed"
        );

        // The gateway call happens after the commit: the order exists and
        // stays pending whatever the gateway answers.
        let pay_url = match request_id {
            None => None,
            Some(request_id) => {
                let request = PaymentRequest {
                    order_id: record.uuid.to_string(),
                    request_id,
                    amount: totals.total,
                    order_info: format!("Agora order {}", record.uuid),
                };

                match self.gateway.create_payment(request).await {
                    Ok(url) => Some(url),
                    Err(source) => {
                        return Err(OrdersServiceError::Gateway {
                            order: record.uuid,
                            source,
                        });
                    }
                }
            }
        };

        Ok(PlacedOrder {
            uuid: record.uuid,
            totals,
            payment_method: record.payment_method,
            pay_url,
        })
    }

    async fn get_order(
        &self,
        viewer: &CurrentAccount,
        order: OrderUuid,
    ) -> Result<OrderDetail, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self.orders_repository.get_order(&mut tx, order).await?;

        if record.account_uuid != viewer.uuid && !viewer.is_admin() {
            return Err(OrdersServiceError::Forbidden);
        }

        let lines = self
            .orders_repository
            .get_order_lines(&mut tx, record.uuid)
            .await?;

        let history = self
            .orders_repository
            .get_status_history(&mut tx, record.uuid)
            .await?
            .iter()
            .map(OrderStatusRecord::entry)
            .collect();

        tx.commit().await?;

        Ok(OrderDetail {
            order: record,
            lines,
            history,
        })
    }

    async fn list_orders(
        &self,
        account: AccountUuid,
        page: PageRequest,
    ) -> Result<Page<OrderRecord>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let orders = self
            .orders_repository
            .list_orders(&mut tx, account, page)
            .await?;

        let total = self.orders_repository.count_orders(&mut tx, account).await?;

        tx.commit().await?;

        Ok(Page::new(orders, page, total))
    }

    #[tracing::instrument(
        name = "orders.service.update_status",
        skip(self),
        fields(order_uuid = %order, target = %target),
        err
    )]
    async fn update_status(
        &self,
        order: OrderUuid,
        target: OrderStatus,
    ) -> Result<Vec<StatusEntry>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self
            .orders_repository
            .get_order_for_update(&mut tx, order)
            .await?;

        let mut history = self.stored_history(&mut tx, record.uuid).await?;

        let now = Timestamp::now();
        let transition = history.admin_transition(target, now)?;

        self.apply_transition(&mut tx, record.uuid, transition, now)
            .await?;

        tx.commit().await?;

        info!(current = %history.current().status, "order status updated");

        Ok(history.entries().to_vec())
    }

    async fn cancel_order(
        &self,
        account: AccountUuid,
        order: OrderUuid,
    ) -> Result<Vec<StatusEntry>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self
            .orders_repository
            .get_order_for_update(&mut tx, order)
            .await?;

        if record.account_uuid != account {
            return Err(OrdersServiceError::Forbidden);
        }

        let mut history = self.stored_history(&mut tx, record.uuid).await?;

        let now = Timestamp::now();
        let transition = history.user_cancellation(now)?;

        self.apply_transition(&mut tx, record.uuid, transition, now)
            .await?;

        tx.commit().await?;

        Ok(history.entries().to_vec())
    }
}

fn address_not_found(error: sqlx::Error) -> OrdersServiceError {
    if matches!(error, sqlx::Error::RowNotFound) {
        return OrdersServiceError::AddressNotFound;
    }

    error.into()
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Turn the account's active cart into an order.
    ///
    /// Prices and stock are taken at this moment; the cart is emptied.
    /// For gateway payments the returned [`PlacedOrder`] carries the
    /// redirect URL.
    async fn place_order(
        &self,
        account: AccountUuid,
        order: PlaceOrder,
    ) -> Result<PlacedOrder, OrdersServiceError>;

    /// An order with its lines and status trail. Buyers see their own
    /// orders; admins see all of them.
    async fn get_order(
        &self,
        viewer: &CurrentAccount,
        order: OrderUuid,
    ) -> Result<OrderDetail, OrdersServiceError>;

    /// The account's orders, newest first.
    async fn list_orders(
        &self,
        account: AccountUuid,
        page: PageRequest,
    ) -> Result<Page<OrderRecord>, OrdersServiceError>;

    /// Move an order to `target` on behalf of an operator, returning the
    /// resulting trail. Rewinds drop the discarded entries for good.
    async fn update_status(
        &self,
        order: OrderUuid,
        target: OrderStatus,
    ) -> Result<Vec<StatusEntry>, OrdersServiceError>;

    /// Self-service cancellation, only while the order is still at the
    /// first stage.
    async fn cancel_order(
        &self,
        account: AccountUuid,
        order: OrderUuid,
    ) -> Result<Vec<StatusEntry>, OrdersServiceError>;
}
