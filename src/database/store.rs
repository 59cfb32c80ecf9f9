use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    Category, Employee, EmployeeFields, EmployeeSummary, Product, ProductFields, ProductSummary, Supplier, Territory,
};
use crate::filter::{Filter, Page, PageRequest};
use crate::services::reconciler::TerritoryPlan;

/// Employee, territory and association persistence.
///
/// Writes that touch territories apply the reconciliation plan in the same
/// atomic unit as the scalar columns.
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    /// `filter` must be built over the `employees` table
    async fn list_employees(&self, filter: Filter, page: &PageRequest) -> Result<Page<EmployeeSummary>, DatabaseError>;

    async fn find_employee(&self, id: i32) -> Result<Option<Employee>, DatabaseError>;

    async fn employee_exists(&self, id: i32) -> Result<bool, DatabaseError>;

    /// Insert scalars, then associate `territories` (all of which must exist)
    async fn create_employee(
        &self,
        fields: &EmployeeFields,
        territories: &BTreeSet<String>,
    ) -> Result<(Employee, TerritoryPlan), DatabaseError>;

    /// Overwrite scalars and, when `territories` is given, reconcile the association set to it.
    /// Fails with `NotFound` when the employee does not exist.
    async fn update_employee(
        &self,
        id: i32,
        fields: &EmployeeFields,
        territories: Option<&BTreeSet<String>>,
    ) -> Result<TerritoryPlan, DatabaseError>;

    /// Remove the employee with its associations; direct reports lose their manager.
    /// Returns false when nothing was deleted.
    async fn delete_employee(&self, id: i32) -> Result<bool, DatabaseError>;

    /// All territories ordered by id
    async fn list_territories(&self) -> Result<Vec<Territory>, DatabaseError>;

    async fn employee_territory_ids(&self, id: i32) -> Result<BTreeSet<String>, DatabaseError>;
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    /// `filter` must be built over the `products` table
    async fn list_products(&self, filter: Filter, page: &PageRequest) -> Result<Page<ProductSummary>, DatabaseError>;

    async fn find_product(&self, id: i32) -> Result<Option<Product>, DatabaseError>;

    async fn product_exists(&self, id: i32) -> Result<bool, DatabaseError>;

    /// Category and supplier must exist
    async fn create_product(&self, fields: &ProductFields) -> Result<Product, DatabaseError>;

    /// Fails with `NotFound` when the product does not exist
    async fn update_product(&self, id: i32, fields: &ProductFields) -> Result<(), DatabaseError>;

    async fn delete_product(&self, id: i32) -> Result<bool, DatabaseError>;

    async fn list_categories(&self) -> Result<Vec<Category>, DatabaseError>;

    async fn list_suppliers(&self) -> Result<Vec<Supplier>, DatabaseError>;
}

#[async_trait]
pub trait Store: EmployeeStore + ProductStore {
    /// Cheap connectivity check for the health endpoint
    async fn ping(&self) -> Result<(), DatabaseError>;

    fn backend_name(&self) -> &'static str;
}
