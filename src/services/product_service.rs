use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use crate::database::models::{Category, Product, ProductInput, ProductSummary, Supplier};
use crate::database::{DatabaseError, Store};
use crate::error::ApiError;
use crate::filter::{Filter, Page, PageRequest};
use crate::validation::optional_query_int;

/// Raw product search criteria; ids arrive as query strings and are parsed here
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCriteria {
    pub product_name: Option<String>,
    #[serde(alias = "categoryID")]
    pub category_id: Option<String>,
    #[serde(alias = "supplierID")]
    pub supplier_id: Option<String>,
}

impl ProductCriteria {
    fn to_filter(&self) -> Result<Filter, ApiError> {
        let category_id = optional_query_int("categoryId", self.category_id.as_deref())?;
        let supplier_id = optional_query_int("supplierId", self.supplier_id.as_deref())?;

        let mut filter = Filter::new("products")?;
        filter
            .contains("product_name", self.product_name.as_deref())?
            .equals("category_id", category_id)?
            .equals("supplier_id", supplier_id)?;
        Ok(filter)
    }
}

#[derive(Clone)]
pub struct ProductService {
    store: Arc<dyn Store>,
    page_size: i64,
}

impl ProductService {
    pub fn new(store: Arc<dyn Store>, page_size: i64) -> Self {
        Self { store, page_size }
    }

    pub async fn list(&self, page: Option<&str>) -> Result<Page<ProductSummary>, ApiError> {
        self.search(&ProductCriteria::default(), page).await
    }

    pub async fn search(&self, criteria: &ProductCriteria, page: Option<&str>) -> Result<Page<ProductSummary>, ApiError> {
        let request = PageRequest::parse(page, self.page_size)?;
        let filter = criteria.to_filter()?;
        Ok(self.store.list_products(filter, &request).await?)
    }

    pub async fn get(&self, id: i32) -> Result<Product, ApiError> {
        self.store.find_product(id).await?.ok_or_else(|| not_found(id))
    }

    pub async fn create(&self, input: ProductInput) -> Result<Product, ApiError> {
        let fields = input.validate()?;
        let product = self.store.create_product(&fields).await?;
        info!(product_id = product.product_id, "Created product");
        Ok(product)
    }

    pub async fn update(&self, id: i32, input: ProductInput) -> Result<(), ApiError> {
        if let Some(body_id) = input.product_id {
            if body_id != id {
                return Err(ApiError::bad_request(format!(
                    "Body productId {} does not match path id {}",
                    body_id, id
                )));
            }
        }
        let fields = input.validate()?;

        match self.store.update_product(id, &fields).await {
            Ok(()) => {
                info!(product_id = id, "Updated product");
                Ok(())
            }
            Err(DatabaseError::Conflict(msg)) => Err(self.resolve_conflict(id, msg).await),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn delete(&self, id: i32) -> Result<(), ApiError> {
        match self.store.delete_product(id).await {
            Ok(true) => {
                info!(product_id = id, "Deleted product");
                Ok(())
            }
            Ok(false) => Err(not_found(id)),
            Err(DatabaseError::Conflict(msg)) => Err(self.resolve_conflict(id, msg).await),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        Ok(self.store.list_categories().await?)
    }

    pub async fn suppliers(&self) -> Result<Vec<Supplier>, ApiError> {
        Ok(self.store.list_suppliers().await?)
    }

    async fn resolve_conflict(&self, id: i32, msg: String) -> ApiError {
        match self.store.product_exists(id).await {
            Ok(false) => not_found(id),
            Ok(true) => DatabaseError::Conflict(msg).into(),
            Err(err) => err.into(),
        }
    }
}

fn not_found(id: i32) -> ApiError {
    ApiError::not_found(format!("Product {} not found", id))
}
