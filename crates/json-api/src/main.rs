//! Agora JSON API Server

use std::process;

use salvo::{
    affix_state::inject,
    oapi::{
        OpenApi,
        security::{ApiKey, ApiKeyValue, SecurityScheme},
        swagger_ui::SwaggerUi,
    },
    prelude::*,
    trailing_slash::remove_slash,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use agora_app::context::AppContext;

use crate::{config::ServerConfig, state::State};

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod auth;
mod carts;
mod checkout;
mod config;
mod errors;
mod extensions;
mod healthcheck;
mod orders;
mod payments;
mod products;
mod shipping_rates;
mod shutdown;
mod state;
#[cfg(test)]
mod test_helpers;

/// Agora JSON API Server entry point
///
/// # Panics
///
/// Panics if the server fails to bind or serve requests
#[tokio::main]
pub async fn main() {
    // Load configuration from .env and CLI arguments
    let config = ServerConfig::load().unwrap_or_else(|e| {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized yet, must use eprintln for config errors"
        )]
        {
            eprintln!("Configuration error: {e}");
        }

        process::exit(1);
    });

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    let addr = config.socket_addr();

    info!("Starting server on {addr}");

    // Bind server
    let listener = TcpListener::new(addr).bind().await;

    let app = match AppContext::from_config(
        &config.database_url,
        config.geo_config(),
        config.momo_config(),
        config.default_shipping_fee,
    )
    .await
    {
        Ok(app) => app,
        Err(init_error) => {
            error!("failed to initialize app context: {init_error}");

            process::exit(1);
        }
    };

    let router = Router::new()
        .hoop(CatchPanic::new())
        .hoop(remove_slash())
        .hoop(inject(State::from_app_context(
            app,
            config.thank_you_url.clone(),
        )))
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(Router::with_path("payments/momo/callback").get(payments::callback::handler))
        .push(
            Router::new()
                .hoop(auth::middleware::handler)
                .push(
                    Router::with_path("products")
                        .get(products::index::handler)
                        .push(Router::with_path("{uuid}").get(products::get::handler)),
                )
                .push(
                    Router::with_path("cart").get(carts::get::handler).push(
                        Router::with_path("items")
                            .post(carts::add_item::handler)
                            .push(
                                Router::with_path("{product_uuid}")
                                    .put(carts::update_item::handler)
                                    .delete(carts::remove_item::handler),
                            ),
                    ),
                )
                .push(Router::with_path("checkout/preview").get(checkout::preview::handler))
                .push(
                    Router::with_path("orders")
                        .get(orders::index::handler)
                        .post(orders::create::handler)
                        .push(
                            Router::with_path("{uuid}")
                                .get(orders::get::handler)
                                .push(Router::with_path("cancel").put(orders::cancel::handler))
                                .push(
                                    Router::with_path("status")
                                        .hoop(auth::middleware::require_admin)
                                        .put(orders::update_status::handler),
                                ),
                        ),
                )
                .push(
                    Router::with_path("shipping-rates")
                        .hoop(auth::middleware::require_admin)
                        .get(shipping_rates::index::handler)
                        .post(shipping_rates::create::handler)
                        .push(
                            Router::with_path("{uuid}").delete(shipping_rates::delete::handler),
                        ),
                ),
        );

    let doc = OpenApi::new("Agora API", "0.3.0")
        .add_security_scheme(
            "session_cookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("session"))),
        )
        .merge_router(&router);

    let router = router
        .push(doc.into_router("/api-doc/openapi.json"))
        .push(SwaggerUi::new("/api-doc/openapi.json").into_router("docs"));

    let server = Server::new(listener);

    let handle = server.handle();

    // Listen for shutdown signal
    tokio::spawn(async move {
        if let Err(error) = shutdown::listen(handle).await {
            error!("failed to listen for shutdown signal: {error}");
        }
    });

    // Start serving requests
    server.serve(router).await;
}
