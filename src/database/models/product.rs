use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

use crate::error::ApiError;
use crate::filter::Filterable;
use crate::validation::FieldErrors;

use super::reference::{Category, Supplier};

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProductFields {
    pub product_name: String,
    pub category_id: i32,
    pub supplier_id: i32,
    pub quantity_per_unit: Option<String>,
    pub unit_price: Decimal,
    pub units_in_stock: i32,
    pub units_on_order: i32,
    pub reorder_level: i32,
    pub discontinued: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub product_id: i32,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub fields: ProductFields,
}

pub const PRODUCT_COLUMNS: &[&str] = &[
    "product_id", "product_name", "category_id", "supplier_id", "quantity_per_unit", "unit_price",
    "units_in_stock", "units_on_order", "reorder_level", "discontinued",
];

/// List projection with category and supplier reduced to id/name pairs
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub product_id: i32,
    pub product_name: String,
    #[sqlx(flatten)]
    pub category: Category,
    #[sqlx(flatten)]
    pub supplier: Supplier,
    pub unit_price: Decimal,
    pub units_in_stock: i32,
    pub units_on_order: i32,
    pub reorder_level: i32,
    pub discontinued: bool,
}

pub const PRODUCT_SUMMARY_COLUMNS: &[&str] = &[
    "product_id", "product_name",
    "categories.category_id", "categories.category_name",
    "suppliers.supplier_id", "suppliers.company_name",
    "unit_price", "units_in_stock", "units_on_order", "reorder_level", "discontinued",
];

impl ProductSummary {
    pub fn project(product: &Product, category: Category, supplier: Supplier) -> Self {
        let f = &product.fields;
        Self {
            product_id: product.product_id,
            product_name: f.product_name.clone(),
            category,
            supplier,
            unit_price: f.unit_price,
            units_in_stock: f.units_in_stock,
            units_on_order: f.units_on_order,
            reorder_level: f.reorder_level,
            discontinued: f.discontinued,
        }
    }
}

impl Filterable for Product {
    fn text_column(&self, column: &str) -> Option<&str> {
        match column {
            "product_name" => Some(self.fields.product_name.as_str()),
            "quantity_per_unit" => self.fields.quantity_per_unit.as_deref(),
            _ => None,
        }
    }

    fn int_column(&self, column: &str) -> Option<i64> {
        match column {
            "product_id" => Some(self.product_id.into()),
            "category_id" => Some(self.fields.category_id.into()),
            "supplier_id" => Some(self.fields.supplier_id.into()),
            _ => None,
        }
    }
}

/// Create/update payload as posted by the product form
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    #[serde(alias = "productID")]
    pub product_id: Option<i32>,
    pub product_name: Option<String>,
    #[serde(alias = "categoryID")]
    pub category_id: Option<Value>,
    #[serde(alias = "supplierID")]
    pub supplier_id: Option<Value>,
    pub quantity_per_unit: Option<String>,
    pub unit_price: Option<Value>,
    pub units_in_stock: Option<Value>,
    pub units_on_order: Option<Value>,
    pub reorder_level: Option<Value>,
    pub discontinued: Option<bool>,
}

impl ProductInput {
    pub fn validate(self) -> Result<ProductFields, ApiError> {
        let mut errors = FieldErrors::new();

        let product_name = errors.required_text("productName", self.product_name);
        let category_id = errors.required_int("categoryId", self.category_id);
        let supplier_id = errors.required_int("supplierId", self.supplier_id);
        let unit_price = errors.required_decimal("unitPrice", self.unit_price);
        if !errors.contains("unitPrice") && unit_price <= Decimal::ZERO {
            errors.add("unitPrice", "Unit price must be positive");
        }

        let fields = ProductFields {
            product_name,
            category_id,
            supplier_id,
            quantity_per_unit: errors.optional_text(self.quantity_per_unit),
            unit_price,
            units_in_stock: errors.required_count("unitsInStock", self.units_in_stock),
            units_on_order: errors.required_count("unitsOnOrder", self.units_on_order),
            reorder_level: errors.required_count("reorderLevel", self.reorder_level),
            discontinued: self.discontinued.unwrap_or(false),
        };

        errors.into_result()?;
        Ok(fields)
    }
}
