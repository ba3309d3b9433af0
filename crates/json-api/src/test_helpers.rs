//! Test helpers.

use std::sync::Arc;

use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use agora_app::{
    auth::{CurrentAccount, MockAuthService},
    context::AppContext,
    domain::{
        accounts::{
            MockAccountsService,
            records::{AccountRole, AccountUuid},
        },
        carts::MockCartsService,
        checkout::MockCheckoutService,
        orders::MockOrdersService,
        payments::MockPaymentsService,
        products::MockProductsService,
        shipping::MockShippingRatesService,
    },
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_ACCOUNT_UUID: AccountUuid = AccountUuid::from_uuid(Uuid::nil());
pub(crate) const TEST_ADMIN_UUID: AccountUuid = AccountUuid::from_uuid(Uuid::from_u128(1));
pub(crate) const TEST_THANK_YOU_URL: &str = "https://shop.example.com/thank-you";

/// One mock per domain service. Tests fill in expectations on the
/// services they exercise; the rest reject every call.
#[derive(Default)]
pub(crate) struct TestApp {
    pub auth: MockAuthService,
    pub accounts: MockAccountsService,
    pub products: MockProductsService,
    pub carts: MockCartsService,
    pub shipping_rates: MockShippingRatesService,
    pub checkout: MockCheckoutService,
    pub orders: MockOrdersService,
    pub payments: MockPaymentsService,
}

impl TestApp {
    pub(crate) fn into_state(self) -> Arc<State> {
        State::from_app_context(
            AppContext {
                auth: Arc::new(self.auth),
                accounts: Arc::new(self.accounts),
                products: Arc::new(self.products),
                carts: Arc::new(self.carts),
                shipping_rates: Arc::new(self.shipping_rates),
                checkout: Arc::new(self.checkout),
                orders: Arc::new(self.orders),
                payments: Arc::new(self.payments),
            },
            TEST_THANK_YOU_URL.to_owned(),
        )
    }
}

pub(crate) fn current_customer() -> CurrentAccount {
    CurrentAccount {
        uuid: TEST_ACCOUNT_UUID,
        name: "Lan Pham".to_owned(),
        email: "lan@example.com".to_owned(),
        phone: "0901234567".to_owned(),
        role: AccountRole::Customer,
    }
}

pub(crate) fn current_admin() -> CurrentAccount {
    CurrentAccount {
        uuid: TEST_ADMIN_UUID,
        name: "Minh Tran".to_owned(),
        email: "minh@example.com".to_owned(),
        phone: "0907654321".to_owned(),
        role: AccountRole::Admin,
    }
}

#[salvo::handler]
pub(crate) async fn inject_customer(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_current_account(current_customer());
    ctrl.call_next(req, depot, res).await;
}

#[salvo::handler]
pub(crate) async fn inject_admin(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_current_account(current_admin());
    ctrl.call_next(req, depot, res).await;
}

pub(crate) fn state_with_auth(auth: MockAuthService) -> Arc<State> {
    TestApp {
        auth,
        ..TestApp::default()
    }
    .into_state()
}

/// A service whose routes run as a signed-in customer.
pub(crate) fn authed_service(app: TestApp, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(app.into_state()))
            .hoop(inject_customer)
            .push(route),
    )
}

/// A service whose routes run as a signed-in operator.
pub(crate) fn admin_service(app: TestApp, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(app.into_state()))
            .hoop(inject_admin)
            .push(route),
    )
}

/// A service with state but no session, for the public routes.
pub(crate) fn public_service(app: TestApp, route: Router) -> Service {
    Service::new(Router::new().hoop(inject(app.into_state())).push(route))
}
