// Store whose writes always lose to a concurrent writer, for exercising the
// services' conflict handling. Reads come from a seeded memory store.

use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::database::models::{
    Category, Employee, EmployeeFields, EmployeeSummary, Product, ProductFields, ProductSummary, Supplier, Territory,
};
use crate::database::{DatabaseError, EmployeeStore, MemoryStore, ProductStore, Store};
use crate::filter::{Filter, Page, PageRequest};
use crate::services::reconciler::TerritoryPlan;

pub(crate) struct ContendedStore {
    reads: MemoryStore,
    /// What existence checks report after the failed write
    still_present: bool,
}

impl ContendedStore {
    pub(crate) fn new(still_present: bool) -> Self {
        Self { reads: MemoryStore::seeded(), still_present }
    }
}

fn conflict() -> DatabaseError {
    DatabaseError::Conflict("could not serialize access due to concurrent update".to_string())
}

#[async_trait]
impl EmployeeStore for ContendedStore {
    async fn list_employees(&self, filter: Filter, page: &PageRequest) -> Result<Page<EmployeeSummary>, DatabaseError> {
        self.reads.list_employees(filter, page).await
    }

    async fn find_employee(&self, id: i32) -> Result<Option<Employee>, DatabaseError> {
        self.reads.find_employee(id).await
    }

    async fn employee_exists(&self, _id: i32) -> Result<bool, DatabaseError> {
        Ok(self.still_present)
    }

    async fn create_employee(
        &self,
        _fields: &EmployeeFields,
        _territories: &BTreeSet<String>,
    ) -> Result<(Employee, TerritoryPlan), DatabaseError> {
        Err(conflict())
    }

    async fn update_employee(
        &self,
        _id: i32,
        _fields: &EmployeeFields,
        _territories: Option<&BTreeSet<String>>,
    ) -> Result<TerritoryPlan, DatabaseError> {
        Err(conflict())
    }

    async fn delete_employee(&self, _id: i32) -> Result<bool, DatabaseError> {
        Err(conflict())
    }

    async fn list_territories(&self) -> Result<Vec<Territory>, DatabaseError> {
        self.reads.list_territories().await
    }

    async fn employee_territory_ids(&self, id: i32) -> Result<BTreeSet<String>, DatabaseError> {
        self.reads.employee_territory_ids(id).await
    }
}

#[async_trait]
impl ProductStore for ContendedStore {
    async fn list_products(&self, filter: Filter, page: &PageRequest) -> Result<Page<ProductSummary>, DatabaseError> {
        self.reads.list_products(filter, page).await
    }

    async fn find_product(&self, id: i32) -> Result<Option<Product>, DatabaseError> {
        self.reads.find_product(id).await
    }

    async fn product_exists(&self, _id: i32) -> Result<bool, DatabaseError> {
        Ok(self.still_present)
    }

    async fn create_product(&self, _fields: &ProductFields) -> Result<Product, DatabaseError> {
        Err(conflict())
    }

    async fn update_product(&self, _id: i32, _fields: &ProductFields) -> Result<(), DatabaseError> {
        Err(conflict())
    }

    async fn delete_product(&self, _id: i32) -> Result<bool, DatabaseError> {
        Err(conflict())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, DatabaseError> {
        self.reads.list_categories().await
    }

    async fn list_suppliers(&self) -> Result<Vec<Supplier>, DatabaseError> {
        self.reads.list_suppliers().await
    }
}

#[async_trait]
impl Store for ContendedStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "contended"
    }
}
