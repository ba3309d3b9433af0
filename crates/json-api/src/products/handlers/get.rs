//! Get Product Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use agora_app::domain::products::records::ProductRecord;

use crate::{
    errors::ApiError, extensions::*, products::errors::into_api_error, state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductResponse {
    /// The unique identifier of the product
    pub uuid: Uuid,

    /// The product title as listed
    pub title: String,

    /// Product image, if one was uploaded
    pub image_url: Option<String>,

    /// The listed unit price in đồng
    pub price: u64,

    /// Percentage taken off the listed price at the till
    pub discount_percent: u8,

    /// Units currently on the shelf
    pub stock: u32,

    /// The date and time the product was created
    pub created_at: String,

    /// The date and time the product was last updated
    pub updated_at: String,
}

impl From<ProductRecord> for ProductResponse {
    fn from(product: ProductRecord) -> Self {
        ProductResponse {
            uuid: product.uuid.into(),
            title: product.title,
            image_url: product.image_url,
            price: product.price,
            discount_percent: product.discount_percent,
            stock: product.stock,
            created_at: product.created_at.to_string(),
            updated_at: product.updated_at.to_string(),
        }
    }
}

/// Get Product Handler
///
/// Returns a product.
#[endpoint(
    tags("products"),
    summary = "Get Product",
    security(("session_cookie" = []))
)]
pub(crate) async fn handler(
    uuid: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<ProductResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let product = state
        .app
        .products
        .get_product(uuid.into_inner().into())
        .await
        .map_err(into_api_error)?;

    Ok(Json(product.into()))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use agora_app::domain::products::{
        MockProductsService, ProductsServiceError, records::ProductUuid,
    };

    use crate::test_helpers::{TestApp, authed_service};

    use super::*;

    fn make_service(products: MockProductsService) -> Service {
        let app = TestApp {
            products,
            ..TestApp::default()
        };

        authed_service(
            app,
            Router::with_path("products").push(Router::with_path("{uuid}").get(handler)),
        )
    }

    fn make_product(uuid: ProductUuid) -> ProductRecord {
        ProductRecord {
            uuid,
            title: "Robusta beans 500g".to_owned(),
            image_url: Some("https://cdn.example.com/robusta.jpg".to_owned()),
            price: 120_000,
            discount_percent: 25,
            stock: 40,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
            deleted_at: None,
        }
    }

    #[tokio::test]
    async fn test_get_returns_the_product() -> TestResult {
        let uuid = ProductUuid::new();

        let mut products = MockProductsService::new();

        products
            .expect_get_product()
            .once()
            .withf(move |requested| *requested == uuid)
            .return_once(move |_| Ok(make_product(uuid)));

        products.expect_list_products().never();
        products.expect_create_product().never();
        products.expect_update_product().never();
        products.expect_delete_product().never();

        let response: ProductResponse =
            TestClient::get(format!("http://example.com/products/{uuid}"))
                .send(&make_service(products))
                .await
                .take_json()
                .await?;

        assert_eq!(response.uuid, uuid.into_uuid());
        assert_eq!(response.title, "Robusta beans 500g");
        assert_eq!(response.price, 120_000);
        assert_eq!(response.discount_percent, 25);
        assert_eq!(response.stock, 40);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_unknown_product_returns_404() -> TestResult {
        let mut products = MockProductsService::new();

        products
            .expect_get_product()
            .once()
            .return_once(|_| Err(ProductsServiceError::NotFound));

        products.expect_list_products().never();
        products.expect_create_product().never();
        products.expect_update_product().never();
        products.expect_delete_product().never();

        let uuid = ProductUuid::new();

        let res = TestClient::get(format!("http://example.com/products/{uuid}"))
            .send(&make_service(products))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_with_malformed_uuid_returns_400() -> TestResult {
        let mut products = MockProductsService::new();

        products.expect_get_product().never();
        products.expect_list_products().never();
        products.expect_create_product().never();
        products.expect_update_product().never();
        products.expect_delete_product().never();

        let res = TestClient::get("http://example.com/products/not-a-uuid")
            .send(&make_service(products))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
