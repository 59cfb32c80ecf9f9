use std::collections::{BTreeMap, BTreeSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    Category, Employee, EmployeeFields, EmployeeSummary, Product, ProductFields, ProductSummary, Supplier, Territory,
};
use crate::database::store::{EmployeeStore, ProductStore, Store};
use crate::filter::{Filter, Page, PageRequest};
use crate::services::reconciler::{self, TerritoryPlan};

#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub employees: BTreeMap<i32, Employee>,
    pub territories: BTreeMap<String, Territory>,
    /// (employee_id, territory_id)
    pub employee_territories: BTreeSet<(i32, String)>,
    pub products: BTreeMap<i32, Product>,
    pub categories: BTreeMap<i32, Category>,
    pub suppliers: BTreeMap<i32, Supplier>,
    /// Ids are never reissued after a delete, as with identity columns
    next_employee_id: i32,
    next_product_id: i32,
}

impl Tables {
    fn territory_ids_of(&self, employee_id: i32) -> BTreeSet<String> {
        self.employee_territories
            .range((employee_id, String::new())..)
            .take_while(|(id, _)| *id == employee_id)
            .map(|(_, territory_id)| territory_id.clone())
            .collect()
    }

    fn known_territory_ids(&self) -> BTreeSet<String> {
        self.territories.keys().cloned().collect()
    }

    fn apply(&mut self, plan: &TerritoryPlan) {
        for territory_id in &plan.to_remove {
            self.employee_territories.remove(&(plan.employee_id, territory_id.clone()));
        }
        for territory_id in &plan.to_add {
            self.employee_territories.insert((plan.employee_id, territory_id.clone()));
        }
    }

    fn check_manager(&self, employee_id: Option<i32>, fields: &EmployeeFields) -> Result<(), DatabaseError> {
        let Some(manager) = fields.reports_to else { return Ok(()) };
        if Some(manager) == employee_id {
            return Err(reports_to_error("An employee cannot report to themselves"));
        }
        if !self.employees.contains_key(&manager) {
            return Err(reports_to_error(format!("Employee {} does not exist", manager)));
        }
        Ok(())
    }

    fn check_references(&self, fields: &ProductFields) -> Result<(), DatabaseError> {
        if !self.categories.contains_key(&fields.category_id) {
            return Err(DatabaseError::Validation {
                field: "categoryId".to_string(),
                message: format!("Category {} does not exist", fields.category_id),
            });
        }
        if !self.suppliers.contains_key(&fields.supplier_id) {
            return Err(DatabaseError::Validation {
                field: "supplierId".to_string(),
                message: format!("Supplier {} does not exist", fields.supplier_id),
            });
        }
        Ok(())
    }

    fn allocate_employee_id(&mut self) -> i32 {
        let id = next_id(self.next_employee_id, &self.employees);
        self.next_employee_id = id + 1;
        id
    }

    fn allocate_product_id(&mut self) -> i32 {
        let id = next_id(self.next_product_id, &self.products);
        self.next_product_id = id + 1;
        id
    }
}

/// Rows loaded directly into a map (fixtures) push the sequence past their ids
fn next_id<V>(sequence: i32, map: &BTreeMap<i32, V>) -> i32 {
    let after_max = map.keys().next_back().map_or(1, |id| id + 1);
    sequence.max(after_max)
}

fn reports_to_error(message: impl Into<String>) -> DatabaseError {
    DatabaseError::Validation { field: "reportsTo".to_string(), message: message.into() }
}

/// In-process store over ordered maps.
///
/// Every write holds the write lock for its whole duration, so each request
/// is applied atomically. Intended for development and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with the Northwind sample subset
    pub fn seeded() -> Self {
        Self { tables: RwLock::new(super::fixtures::northwind()) }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, DatabaseError> {
        self.tables
            .read()
            .map_err(|_| DatabaseError::QueryError("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, DatabaseError> {
        self.tables
            .write()
            .map_err(|_| DatabaseError::QueryError("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl EmployeeStore for MemoryStore {
    async fn list_employees(&self, filter: Filter, page: &PageRequest) -> Result<Page<EmployeeSummary>, DatabaseError> {
        let tables = self.read()?;
        let rows: Vec<EmployeeSummary> = tables
            .employees
            .values()
            .filter(|e| filter.matches(*e))
            .map(EmployeeSummary::from)
            .collect();
        Ok(Page::slice(&rows, page))
    }

    async fn find_employee(&self, id: i32) -> Result<Option<Employee>, DatabaseError> {
        Ok(self.read()?.employees.get(&id).cloned())
    }

    async fn employee_exists(&self, id: i32) -> Result<bool, DatabaseError> {
        Ok(self.read()?.employees.contains_key(&id))
    }

    async fn create_employee(
        &self,
        fields: &EmployeeFields,
        territories: &BTreeSet<String>,
    ) -> Result<(Employee, TerritoryPlan), DatabaseError> {
        let mut tables = self.write()?;
        tables.check_manager(None, fields)?;
        reconciler::check_known(territories, &tables.known_territory_ids())?;

        let employee_id = tables.allocate_employee_id();
        let employee = Employee { employee_id, fields: fields.clone() };
        tables.employees.insert(employee_id, employee.clone());

        let plan = reconciler::plan(employee_id, &BTreeSet::new(), territories);
        tables.apply(&plan);
        Ok((employee, plan))
    }

    async fn update_employee(
        &self,
        id: i32,
        fields: &EmployeeFields,
        territories: Option<&BTreeSet<String>>,
    ) -> Result<TerritoryPlan, DatabaseError> {
        let mut tables = self.write()?;
        if !tables.employees.contains_key(&id) {
            return Err(DatabaseError::NotFound(format!("Employee {} not found", id)));
        }
        tables.check_manager(Some(id), fields)?;

        // Validate everything before the first mutation
        let plan = match territories {
            Some(desired) => {
                reconciler::check_known(desired, &tables.known_territory_ids())?;
                reconciler::plan(id, &tables.territory_ids_of(id), desired)
            }
            None => TerritoryPlan { employee_id: id, ..Default::default() },
        };

        if let Some(employee) = tables.employees.get_mut(&id) {
            employee.fields = fields.clone();
        }
        tables.apply(&plan);
        Ok(plan)
    }

    async fn delete_employee(&self, id: i32) -> Result<bool, DatabaseError> {
        let mut tables = self.write()?;
        if tables.employees.remove(&id).is_none() {
            return Ok(false);
        }
        tables.employee_territories.retain(|(employee_id, _)| *employee_id != id);
        for report in tables.employees.values_mut() {
            if report.fields.reports_to == Some(id) {
                report.fields.reports_to = None;
            }
        }
        Ok(true)
    }

    async fn list_territories(&self) -> Result<Vec<Territory>, DatabaseError> {
        Ok(self.read()?.territories.values().cloned().collect())
    }

    async fn employee_territory_ids(&self, id: i32) -> Result<BTreeSet<String>, DatabaseError> {
        Ok(self.read()?.territory_ids_of(id))
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn list_products(&self, filter: Filter, page: &PageRequest) -> Result<Page<ProductSummary>, DatabaseError> {
        let tables = self.read()?;
        // Inner-join semantics: a product with a dangling reference is not listed
        let rows: Vec<ProductSummary> = tables
            .products
            .values()
            .filter(|p| filter.matches(*p))
            .filter_map(|p| {
                let category = tables.categories.get(&p.fields.category_id)?.clone();
                let supplier = tables.suppliers.get(&p.fields.supplier_id)?.clone();
                Some(ProductSummary::project(p, category, supplier))
            })
            .collect();
        Ok(Page::slice(&rows, page))
    }

    async fn find_product(&self, id: i32) -> Result<Option<Product>, DatabaseError> {
        Ok(self.read()?.products.get(&id).cloned())
    }

    async fn product_exists(&self, id: i32) -> Result<bool, DatabaseError> {
        Ok(self.read()?.products.contains_key(&id))
    }

    async fn create_product(&self, fields: &ProductFields) -> Result<Product, DatabaseError> {
        let mut tables = self.write()?;
        tables.check_references(fields)?;
        let product_id = tables.allocate_product_id();
        let product = Product { product_id, fields: fields.clone() };
        tables.products.insert(product_id, product.clone());
        Ok(product)
    }

    async fn update_product(&self, id: i32, fields: &ProductFields) -> Result<(), DatabaseError> {
        let mut tables = self.write()?;
        if !tables.products.contains_key(&id) {
            return Err(DatabaseError::NotFound(format!("Product {} not found", id)));
        }
        tables.check_references(fields)?;
        if let Some(product) = tables.products.get_mut(&id) {
            product.fields = fields.clone();
        }
        Ok(())
    }

    async fn delete_product(&self, id: i32) -> Result<bool, DatabaseError> {
        Ok(self.write()?.products.remove(&id).is_some())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, DatabaseError> {
        Ok(self.read()?.categories.values().cloned().collect())
    }

    async fn list_suppliers(&self) -> Result<Vec<Supplier>, DatabaseError> {
        Ok(self.read()?.suppliers.values().cloned().collect())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        self.read().map(|_| ())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
