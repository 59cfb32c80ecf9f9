use std::collections::BTreeSet;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::debug;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{
    Category, Employee, EmployeeFields, EmployeeSummary, Product, ProductFields, ProductSummary, Supplier, Territory,
    EMPLOYEE_COLUMNS, EMPLOYEE_SUMMARY_COLUMNS, PRODUCT_COLUMNS, PRODUCT_SUMMARY_COLUMNS,
};
use crate::database::query_builder::QueryBuilder;
use crate::database::store::{EmployeeStore, ProductStore, Store};
use crate::filter::{Filter, Page, PageRequest};
use crate::services::reconciler::{self, TerritoryPlan};

/// Postgres-backed store over the Northwind schema
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Lock the employee row for the rest of the transaction. Returns false if it does not exist.
    async fn lock_employee(tx: &mut Transaction<'_, Postgres>, id: i32) -> Result<bool, DatabaseError> {
        let row: Option<(i32,)> = sqlx::query_as("SELECT employee_id FROM employees WHERE employee_id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?;
        Ok(row.is_some())
    }

    async fn lock_product(tx: &mut Transaction<'_, Postgres>, id: i32) -> Result<bool, DatabaseError> {
        let row: Option<(i32,)> = sqlx::query_as("SELECT product_id FROM products WHERE product_id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?;
        Ok(row.is_some())
    }

    async fn check_manager(
        tx: &mut Transaction<'_, Postgres>,
        employee_id: Option<i32>,
        fields: &EmployeeFields,
    ) -> Result<(), DatabaseError> {
        let Some(manager) = fields.reports_to else { return Ok(()) };
        if Some(manager) == employee_id {
            return Err(DatabaseError::Validation {
                field: "reportsTo".to_string(),
                message: "An employee cannot report to themselves".to_string(),
            });
        }
        let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM employees WHERE employee_id = $1)")
            .bind(manager)
            .fetch_one(&mut **tx)
            .await?;
        if !exists {
            return Err(DatabaseError::Validation {
                field: "reportsTo".to_string(),
                message: format!("Employee {} does not exist", manager),
            });
        }
        Ok(())
    }

    async fn check_references(tx: &mut Transaction<'_, Postgres>, fields: &ProductFields) -> Result<(), DatabaseError> {
        let (category, supplier): (bool, bool) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE category_id = $1), \
                    EXISTS(SELECT 1 FROM suppliers WHERE supplier_id = $2)",
        )
        .bind(fields.category_id)
        .bind(fields.supplier_id)
        .fetch_one(&mut **tx)
        .await?;

        if !category {
            return Err(DatabaseError::Validation {
                field: "categoryId".to_string(),
                message: format!("Category {} does not exist", fields.category_id),
            });
        }
        if !supplier {
            return Err(DatabaseError::Validation {
                field: "supplierId".to_string(),
                message: format!("Supplier {} does not exist", fields.supplier_id),
            });
        }
        Ok(())
    }

    /// Compute the plan against the stored association set and apply it
    async fn reconcile_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        employee_id: i32,
        desired: &BTreeSet<String>,
    ) -> Result<TerritoryPlan, DatabaseError> {
        let requested: Vec<String> = desired.iter().cloned().collect();
        let known: Vec<(String,)> = sqlx::query_as("SELECT territory_id FROM territories WHERE territory_id = ANY($1)")
            .bind(requested)
            .fetch_all(&mut **tx)
            .await?;
        let known: BTreeSet<String> = known.into_iter().map(|(id,)| id).collect();
        reconciler::check_known(desired, &known)?;

        let current: Vec<(String,)> =
            sqlx::query_as("SELECT territory_id FROM employee_territories WHERE employee_id = $1")
                .bind(employee_id)
                .fetch_all(&mut **tx)
                .await?;
        let current: BTreeSet<String> = current.into_iter().map(|(id,)| id).collect();

        let plan = reconciler::plan(employee_id, &current, desired);
        if !plan.to_remove.is_empty() {
            let to_remove: Vec<String> = plan.to_remove.iter().cloned().collect();
            sqlx::query("DELETE FROM employee_territories WHERE employee_id = $1 AND territory_id = ANY($2)")
                .bind(employee_id)
                .bind(to_remove)
                .execute(&mut **tx)
                .await?;
        }
        if !plan.to_add.is_empty() {
            let to_add: Vec<String> = plan.to_add.iter().cloned().collect();
            sqlx::query(
                "INSERT INTO employee_territories (employee_id, territory_id) SELECT $1, UNNEST($2::text[])",
            )
            .bind(employee_id)
            .bind(to_add)
            .execute(&mut **tx)
            .await?;
        }
        Ok(plan)
    }
}

#[async_trait]
impl EmployeeStore for PgStore {
    async fn list_employees(&self, mut filter: Filter, page: &PageRequest) -> Result<Page<EmployeeSummary>, DatabaseError> {
        filter.select(EMPLOYEE_SUMMARY_COLUMNS)?.order_asc("employee_id")?;
        QueryBuilder::<EmployeeSummary>::new(filter).select_page(&self.pool, page).await
    }

    async fn find_employee(&self, id: i32) -> Result<Option<Employee>, DatabaseError> {
        let mut filter = Filter::new("employees")?;
        filter.select(EMPLOYEE_COLUMNS)?.equals("employee_id", Some(id.into()))?;
        QueryBuilder::<Employee>::new(filter).select_optional(&self.pool).await
    }

    async fn employee_exists(&self, id: i32) -> Result<bool, DatabaseError> {
        let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM employees WHERE employee_id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn create_employee(
        &self,
        fields: &EmployeeFields,
        territories: &BTreeSet<String>,
    ) -> Result<(Employee, TerritoryPlan), DatabaseError> {
        let mut tx = self.pool.begin().await?;
        Self::check_manager(&mut tx, None, fields).await?;

        let (employee_id,): (i32,) = sqlx::query_as(
            "INSERT INTO employees (last_name, first_name, title, title_of_courtesy, birth_date, hire_date, \
             address, city, region, postal_code, country, home_phone, extension, notes, reports_to, photo_path) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16) \
             RETURNING employee_id",
        )
        .bind(&fields.last_name)
        .bind(&fields.first_name)
        .bind(&fields.title)
        .bind(&fields.title_of_courtesy)
        .bind(fields.birth_date)
        .bind(fields.hire_date)
        .bind(&fields.address)
        .bind(&fields.city)
        .bind(&fields.region)
        .bind(&fields.postal_code)
        .bind(&fields.country)
        .bind(&fields.home_phone)
        .bind(&fields.extension)
        .bind(&fields.notes)
        .bind(fields.reports_to)
        .bind(&fields.photo_path)
        .fetch_one(&mut *tx)
        .await?;

        let plan = Self::reconcile_in_tx(&mut tx, employee_id, territories).await?;
        tx.commit().await?;

        debug!("Inserted employee {}", employee_id);
        Ok((Employee { employee_id, fields: fields.clone() }, plan))
    }

    async fn update_employee(
        &self,
        id: i32,
        fields: &EmployeeFields,
        territories: Option<&BTreeSet<String>>,
    ) -> Result<TerritoryPlan, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        if !Self::lock_employee(&mut tx, id).await? {
            return Err(DatabaseError::NotFound(format!("Employee {} not found", id)));
        }
        Self::check_manager(&mut tx, Some(id), fields).await?;

        sqlx::query(
            "UPDATE employees SET last_name = $2, first_name = $3, title = $4, title_of_courtesy = $5, \
             birth_date = $6, hire_date = $7, address = $8, city = $9, region = $10, postal_code = $11, \
             country = $12, home_phone = $13, extension = $14, notes = $15, reports_to = $16, photo_path = $17 \
             WHERE employee_id = $1",
        )
        .bind(id)
        .bind(&fields.last_name)
        .bind(&fields.first_name)
        .bind(&fields.title)
        .bind(&fields.title_of_courtesy)
        .bind(fields.birth_date)
        .bind(fields.hire_date)
        .bind(&fields.address)
        .bind(&fields.city)
        .bind(&fields.region)
        .bind(&fields.postal_code)
        .bind(&fields.country)
        .bind(&fields.home_phone)
        .bind(&fields.extension)
        .bind(&fields.notes)
        .bind(fields.reports_to)
        .bind(&fields.photo_path)
        .execute(&mut *tx)
        .await?;

        let plan = match territories {
            Some(desired) => Self::reconcile_in_tx(&mut tx, id, desired).await?,
            None => TerritoryPlan { employee_id: id, ..Default::default() },
        };
        tx.commit().await?;
        Ok(plan)
    }

    async fn delete_employee(&self, id: i32) -> Result<bool, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        if !Self::lock_employee(&mut tx, id).await? {
            return Ok(false);
        }

        sqlx::query("DELETE FROM employee_territories WHERE employee_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("UPDATE employees SET reports_to = NULL WHERE reports_to = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let deleted = sqlx::query("DELETE FROM employees WHERE employee_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;
        Ok(deleted > 0)
    }

    async fn list_territories(&self) -> Result<Vec<Territory>, DatabaseError> {
        let rows = sqlx::query_as::<_, Territory>(
            "SELECT territory_id, territory_description, region_id FROM territories ORDER BY territory_id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn employee_territory_ids(&self, id: i32) -> Result<BTreeSet<String>, DatabaseError> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT territory_id FROM employee_territories WHERE employee_id = $1")
            .bind(id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}

#[async_trait]
impl ProductStore for PgStore {
    async fn list_products(&self, mut filter: Filter, page: &PageRequest) -> Result<Page<ProductSummary>, DatabaseError> {
        filter
            .join("categories", "category_id")?
            .join("suppliers", "supplier_id")?
            .select(PRODUCT_SUMMARY_COLUMNS)?
            .order_asc("product_id")?;
        QueryBuilder::<ProductSummary>::new(filter).select_page(&self.pool, page).await
    }

    async fn find_product(&self, id: i32) -> Result<Option<Product>, DatabaseError> {
        let mut filter = Filter::new("products")?;
        filter.select(PRODUCT_COLUMNS)?.equals("product_id", Some(id.into()))?;
        QueryBuilder::<Product>::new(filter).select_optional(&self.pool).await
    }

    async fn product_exists(&self, id: i32) -> Result<bool, DatabaseError> {
        let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM products WHERE product_id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn create_product(&self, fields: &ProductFields) -> Result<Product, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        Self::check_references(&mut tx, fields).await?;

        let (product_id,): (i32,) = sqlx::query_as(
            "INSERT INTO products (product_name, category_id, supplier_id, quantity_per_unit, unit_price, \
             units_in_stock, units_on_order, reorder_level, discontinued) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING product_id",
        )
        .bind(&fields.product_name)
        .bind(fields.category_id)
        .bind(fields.supplier_id)
        .bind(&fields.quantity_per_unit)
        .bind(fields.unit_price)
        .bind(fields.units_in_stock)
        .bind(fields.units_on_order)
        .bind(fields.reorder_level)
        .bind(fields.discontinued)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Product { product_id, fields: fields.clone() })
    }

    async fn update_product(&self, id: i32, fields: &ProductFields) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;
        if !Self::lock_product(&mut tx, id).await? {
            return Err(DatabaseError::NotFound(format!("Product {} not found", id)));
        }
        Self::check_references(&mut tx, fields).await?;

        sqlx::query(
            "UPDATE products SET product_name = $2, category_id = $3, supplier_id = $4, quantity_per_unit = $5, \
             unit_price = $6, units_in_stock = $7, units_on_order = $8, reorder_level = $9, discontinued = $10 \
             WHERE product_id = $1",
        )
        .bind(id)
        .bind(&fields.product_name)
        .bind(fields.category_id)
        .bind(fields.supplier_id)
        .bind(&fields.quantity_per_unit)
        .bind(fields.unit_price)
        .bind(fields.units_in_stock)
        .bind(fields.units_on_order)
        .bind(fields.reorder_level)
        .bind(fields.discontinued)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn delete_product(&self, id: i32) -> Result<bool, DatabaseError> {
        let deleted = sqlx::query("DELETE FROM products WHERE product_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(deleted > 0)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, DatabaseError> {
        let rows = sqlx::query_as::<_, Category>("SELECT category_id, category_name FROM categories ORDER BY category_id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn list_suppliers(&self) -> Result<Vec<Supplier>, DatabaseError> {
        let rows = sqlx::query_as::<_, Supplier>("SELECT supplier_id, company_name FROM suppliers ORDER BY supplier_id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
