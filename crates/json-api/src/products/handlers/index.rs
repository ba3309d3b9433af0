//! Product Index Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use agora_app::{
    domain::products::records::ProductRecord,
    pagination::{Page, PageRequest},
};

use crate::{errors::ApiError, extensions::*, products::get::ProductResponse, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductsResponse {
    /// The requested page of products
    pub products: Vec<ProductResponse>,

    /// 1-based page number
    pub page: u32,

    /// Page size actually applied
    pub per_page: u32,

    /// How many products matched in total
    pub total: u64,
}

impl From<Page<ProductRecord>> for ProductsResponse {
    fn from(page: Page<ProductRecord>) -> Self {
        ProductsResponse {
            products: page.items.into_iter().map(Into::into).collect(),
            page: page.page,
            per_page: page.per_page,
            total: page.total,
        }
    }
}

/// Product Index Handler
///
/// Returns a page of products still on sale, newest first, optionally
/// filtered by a title search.
#[endpoint(
    tags("products"),
    summary = "List Products",
    security(("session_cookie" = []))
)]
pub(crate) async fn handler(
    page: QueryParam<u32, false>,
    per_page: QueryParam<u32, false>,
    search: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<ProductsResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let page = PageRequest::new(
        page.into_inner().unwrap_or(1),
        per_page
            .into_inner()
            .unwrap_or(PageRequest::DEFAULT_PER_PAGE),
    );

    let products = state
        .app
        .products
        .list_products(search.into_inner(), page)
        .await
        .or_500("failed to fetch products")?;

    Ok(Json(products.into()))
}
