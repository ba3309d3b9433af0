//! Server configuration module

use std::time::Duration;

use clap::Parser;

use agora_app::gateways::{Coordinate, GeoConfig, MomoConfig};

/// Agora JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "agora-json", about = "Agora JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server host address
    #[arg(short = 'H', long, env = "SERVER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Server port
    #[arg(short, long, env = "SERVER_PORT", default_value = "8698")]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// `PostgreSQL` connection string
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// Map provider API root
    #[arg(
        long,
        env = "GEOCODER_BASE_URL",
        default_value = "https://maps.googleapis.com/maps/api"
    )]
    pub geocoder_base_url: String,

    /// Map provider API key
    #[arg(long, env = "GEOCODER_API_KEY", hide_env_values = true)]
    pub geocoder_api_key: String,

    /// Warehouse latitude, the fixed origin of every delivery quote
    #[arg(long, env = "WAREHOUSE_LAT")]
    pub warehouse_lat: f64,

    /// Warehouse longitude
    #[arg(long, env = "WAREHOUSE_LNG")]
    pub warehouse_lng: f64,

    /// Map provider request timeout in milliseconds
    #[arg(long, env = "GEOCODER_TIMEOUT_MS", default_value = "5000")]
    pub geocoder_timeout_ms: u64,

    /// `MoMo` payment-creation endpoint
    #[arg(
        long,
        env = "MOMO_ENDPOINT",
        default_value = "https://test-payment.momo.vn/v2/gateway/api/create"
    )]
    pub momo_endpoint: String,

    /// `MoMo` partner code
    #[arg(long, env = "MOMO_PARTNER_CODE")]
    pub momo_partner_code: String,

    /// `MoMo` access key
    #[arg(long, env = "MOMO_ACCESS_KEY", hide_env_values = true)]
    pub momo_access_key: String,

    /// `MoMo` secret key used to sign payment requests
    #[arg(long, env = "MOMO_SECRET_KEY", hide_env_values = true)]
    pub momo_secret_key: String,

    /// Where the wallet sends the shopper back after paying
    #[arg(long, env = "MOMO_REDIRECT_URL")]
    pub momo_redirect_url: String,

    /// Where the wallet posts the asynchronous payment result
    #[arg(long, env = "MOMO_IPN_URL")]
    pub momo_ipn_url: String,

    /// Storefront page the payment callback redirects to on success
    #[arg(long, env = "THANK_YOU_URL")]
    pub thank_you_url: String,

    /// Shipping fee in đồng for distances no stored rate covers
    #[arg(long, env = "DEFAULT_SHIPPING_FEE", default_value = "30000")]
    pub default_shipping_fee: u64,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Map provider settings for the geolocation client
    #[must_use]
    pub fn geo_config(&self) -> GeoConfig {
        GeoConfig {
            base_url: self.geocoder_base_url.clone(),
            api_key: self.geocoder_api_key.clone(),
            warehouse: Coordinate {
                lat: self.warehouse_lat,
                lng: self.warehouse_lng,
            },
            timeout: Duration::from_millis(self.geocoder_timeout_ms),
        }
    }

    /// Gateway account settings for the payment client
    #[must_use]
    pub fn momo_config(&self) -> MomoConfig {
        MomoConfig {
            endpoint: self.momo_endpoint.clone(),
            partner_code: self.momo_partner_code.clone(),
            access_key: self.momo_access_key.clone(),
            secret_key: self.momo_secret_key.clone(),
            redirect_url: self.momo_redirect_url.clone(),
            ipn_url: self.momo_ipn_url.clone(),
        }
    }
}
