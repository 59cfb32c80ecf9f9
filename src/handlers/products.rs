// handlers/products.rs - /products routes

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Extension, Path, Query};
use axum::Json;
use serde::Serialize;

use crate::app::AppState;
use crate::database::models::{Category, Product, ProductInput, ProductSummary, Supplier};
use crate::filter::Page;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::ProductCriteria;

use super::{json_body, parse_id, query_params, PageQuery};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    pub products: Vec<ProductSummary>,
    pub total_pages: i64,
}

impl From<Page<ProductSummary>> for ProductPage {
    fn from(page: Page<ProductSummary>) -> Self {
        let total_pages = page.total_pages();
        Self { products: page.items, total_pages }
    }
}

/// GET /products?page=N
pub async fn list(
    Extension(state): Extension<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<ProductPage> {
    let query = query_params(query)?;
    let page = state.products.list(query.page.as_deref()).await?;
    Ok(ApiResponse::success(page.into()))
}

/// GET /products/search?productName=&categoryId=&supplierId=&page=N
pub async fn search(
    Extension(state): Extension<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
    criteria: Result<Query<ProductCriteria>, QueryRejection>,
) -> ApiResult<ProductPage> {
    let query = query_params(query)?;
    let criteria = query_params(criteria)?;
    let page = state.products.search(&criteria, query.page.as_deref()).await?;
    Ok(ApiResponse::success(page.into()))
}

/// GET /products/:id
pub async fn show(Extension(state): Extension<AppState>, Path(id): Path<String>) -> ApiResult<Product> {
    let product = state.products.get(parse_id(&id)?).await?;
    Ok(ApiResponse::success(product))
}

/// POST /products
pub async fn create(
    Extension(state): Extension<AppState>,
    body: Result<Json<ProductInput>, JsonRejection>,
) -> ApiResult<Product> {
    let product = state.products.create(json_body(body)?).await?;
    let location = format!("/products/{}", product.product_id);
    Ok(ApiResponse::created(product, location))
}

/// PUT /products/:id
pub async fn update(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
    body: Result<Json<ProductInput>, JsonRejection>,
) -> ApiResult<()> {
    let id = parse_id(&id)?;
    state.products.update(id, json_body(body)?).await?;
    Ok(ApiResponse::no_content())
}

/// DELETE /products/:id
pub async fn delete(Extension(state): Extension<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    state.products.delete(parse_id(&id)?).await?;
    Ok(ApiResponse::no_content())
}

/// GET /products/categories
pub async fn categories(Extension(state): Extension<AppState>) -> ApiResult<Vec<Category>> {
    Ok(ApiResponse::success(state.products.categories().await?))
}

/// GET /products/suppliers
pub async fn suppliers(Extension(state): Extension<AppState>) -> ApiResult<Vec<Supplier>> {
    Ok(ApiResponse::success(state.products.suppliers().await?))
}
