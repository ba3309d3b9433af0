//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    auth::{AuthService, PgAuthService},
    database::{self, Db},
    domain::{
        accounts::{AccountsService, PgAccountsService},
        carts::{CartsService, PgCartsService},
        checkout::{CheckoutService, PgCheckoutService},
        orders::{OrdersService, PgOrdersService},
        payments::{PaymentsService, PgPaymentsService},
        products::{PgProductsService, ProductsService},
        shipping::{PgShippingRatesService, ShippingRatesService},
    },
    gateways::{
        GeoClient, GeoConfig, GeoError, GoogleGeoClient, MomoClient, MomoConfig, PaymentGateway,
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to build the map provider client")]
    Geo(#[source] GeoError),
}

/// Everything a frontend needs to serve requests, behind trait objects so
/// handlers can be tested against mocks.
#[derive(Clone)]
pub struct AppContext {
    pub auth: Arc<dyn AuthService>,
    pub accounts: Arc<dyn AccountsService>,
    pub products: Arc<dyn ProductsService>,
    pub carts: Arc<dyn CartsService>,
    pub shipping_rates: Arc<dyn ShippingRatesService>,
    pub checkout: Arc<dyn CheckoutService>,
    pub orders: Arc<dyn OrdersService>,
    pub payments: Arc<dyn PaymentsService>,
}

impl AppContext {
    /// Build application context from a database URL and the outbound
    /// provider configuration. The geocoder and payment gateway clients
    /// are shared between checkout and order placement.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails or
    /// the geocoder HTTP client cannot be constructed.
    pub async fn from_config(
        database_url: &str,
        geo: GeoConfig,
        momo: MomoConfig,
        default_shipping_fee: u64,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(database_url)
            .await
            .map_err(AppInitError::Database)?;

        let db = Db::new(pool);

        let geo: Arc<dyn GeoClient> =
            Arc::new(GoogleGeoClient::new(geo).map_err(AppInitError::Geo)?);
        let gateway: Arc<dyn PaymentGateway> = Arc::new(MomoClient::new(momo));

        Ok(Self {
            auth: Arc::new(PgAuthService::new(db.clone())),
            accounts: Arc::new(PgAccountsService::new(db.clone())),
            products: Arc::new(PgProductsService::new(db.clone())),
            carts: Arc::new(PgCartsService::new(db.clone())),
            shipping_rates: Arc::new(PgShippingRatesService::new(
                db.clone(),
                default_shipping_fee,
            )),
            checkout: Arc::new(PgCheckoutService::new(
                db.clone(),
                geo.clone(),
                default_shipping_fee,
            )),
            orders: Arc::new(PgOrdersService::new(
                db.clone(),
                geo,
                gateway,
                default_shipping_fee,
            )),
            payments: Arc::new(PgPaymentsService::new(db)),
        })
    }
}
