use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use crate::database::models::{Employee, EmployeeInput, EmployeeSummary, TerritoryOption};
use crate::database::{DatabaseError, Store};
use crate::error::ApiError;
use crate::filter::{Filter, Page, PageRequest};

/// Substring criteria accepted by the employee search screen
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeCriteria {
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub title: Option<String>,
}

impl EmployeeCriteria {
    fn to_filter(&self) -> Result<Filter, ApiError> {
        let mut filter = Filter::new("employees")?;
        filter
            .contains("last_name", self.last_name.as_deref())?
            .contains("first_name", self.first_name.as_deref())?
            .contains("title", self.title.as_deref())?;
        Ok(filter)
    }
}

#[derive(Clone)]
pub struct EmployeeService {
    store: Arc<dyn Store>,
    page_size: i64,
}

impl EmployeeService {
    pub fn new(store: Arc<dyn Store>, page_size: i64) -> Self {
        Self { store, page_size }
    }

    pub async fn list(&self, page: Option<&str>) -> Result<Page<EmployeeSummary>, ApiError> {
        self.search(&EmployeeCriteria::default(), page).await
    }

    pub async fn search(&self, criteria: &EmployeeCriteria, page: Option<&str>) -> Result<Page<EmployeeSummary>, ApiError> {
        let request = PageRequest::parse(page, self.page_size)?;
        let filter = criteria.to_filter()?;
        Ok(self.store.list_employees(filter, &request).await?)
    }

    pub async fn get(&self, id: i32) -> Result<Employee, ApiError> {
        self.store
            .find_employee(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn create(&self, input: EmployeeInput) -> Result<Employee, ApiError> {
        let write = input.validate()?;
        let territories = write.territories.unwrap_or_default();
        let (employee, plan) = self.store.create_employee(&write.fields, &territories).await?;

        info!(
            employee_id = employee.employee_id,
            territories = plan.to_add.len(),
            "Created employee"
        );
        Ok(employee)
    }

    pub async fn update(&self, id: i32, input: EmployeeInput) -> Result<(), ApiError> {
        if let Some(body_id) = input.employee_id {
            if body_id != id {
                return Err(ApiError::bad_request(format!(
                    "Body employeeId {} does not match path id {}",
                    body_id, id
                )));
            }
        }
        let write = input.validate()?;

        match self.store.update_employee(id, &write.fields, write.territories.as_ref()).await {
            Ok(plan) => {
                info!(
                    employee_id = id,
                    added = ?plan.to_add,
                    removed = ?plan.to_remove,
                    "Updated employee"
                );
                Ok(())
            }
            Err(DatabaseError::Conflict(msg)) => Err(self.resolve_conflict(id, msg).await),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn delete(&self, id: i32) -> Result<(), ApiError> {
        match self.store.delete_employee(id).await {
            Ok(true) => {
                info!(employee_id = id, "Deleted employee");
                Ok(())
            }
            Ok(false) => Err(not_found(id)),
            Err(DatabaseError::Conflict(msg)) => Err(self.resolve_conflict(id, msg).await),
            Err(err) => Err(err.into()),
        }
    }

    /// Territory checklist; with `id`, entries assigned to that employee are selected
    pub async fn territories(&self, id: Option<i32>) -> Result<Vec<TerritoryOption>, ApiError> {
        let assigned = match id {
            Some(id) => {
                if !self.store.employee_exists(id).await? {
                    return Err(not_found(id));
                }
                self.store.employee_territory_ids(id).await?
            }
            None => Default::default(),
        };
        let territories = self.store.list_territories().await?;
        Ok(TerritoryOption::checklist(territories, &assigned))
    }

    /// A concurrent writer won: report a vanished employee as not found, anything else as a conflict
    async fn resolve_conflict(&self, id: i32, msg: String) -> ApiError {
        match self.store.employee_exists(id).await {
            Ok(false) => not_found(id),
            Ok(true) => DatabaseError::Conflict(msg).into(),
            Err(err) => err.into(),
        }
    }
}

fn not_found(id: i32) -> ApiError {
    ApiError::not_found(format!("Employee {} not found", id))
}
