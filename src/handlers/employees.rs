// handlers/employees.rs - /employees routes

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Extension, Path, Query};
use axum::Json;
use serde::Serialize;

use crate::app::AppState;
use crate::database::models::{Employee, EmployeeInput, EmployeeSummary, TerritoryOption};
use crate::filter::Page;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::EmployeeCriteria;

use super::{json_body, parse_id, query_params, PageQuery};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePage {
    pub employees: Vec<EmployeeSummary>,
    pub total_pages: i64,
}

impl From<Page<EmployeeSummary>> for EmployeePage {
    fn from(page: Page<EmployeeSummary>) -> Self {
        let total_pages = page.total_pages();
        Self { employees: page.items, total_pages }
    }
}

/// GET /employees?page=N
pub async fn list(
    Extension(state): Extension<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<EmployeePage> {
    let query = query_params(query)?;
    let page = state.employees.list(query.page.as_deref()).await?;
    Ok(ApiResponse::success(page.into()))
}

/// GET /employees/search?lastName=&firstName=&title=&page=N
pub async fn search(
    Extension(state): Extension<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
    criteria: Result<Query<EmployeeCriteria>, QueryRejection>,
) -> ApiResult<EmployeePage> {
    let query = query_params(query)?;
    let criteria = query_params(criteria)?;
    let page = state.employees.search(&criteria, query.page.as_deref()).await?;
    Ok(ApiResponse::success(page.into()))
}

/// GET /employees/:id
pub async fn show(Extension(state): Extension<AppState>, Path(id): Path<String>) -> ApiResult<Employee> {
    let employee = state.employees.get(parse_id(&id)?).await?;
    Ok(ApiResponse::success(employee))
}

/// POST /employees
pub async fn create(
    Extension(state): Extension<AppState>,
    body: Result<Json<EmployeeInput>, JsonRejection>,
) -> ApiResult<Employee> {
    let employee = state.employees.create(json_body(body)?).await?;
    let location = format!("/employees/{}", employee.employee_id);
    Ok(ApiResponse::created(employee, location))
}

/// PUT /employees/:id
pub async fn update(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
    body: Result<Json<EmployeeInput>, JsonRejection>,
) -> ApiResult<()> {
    let id = parse_id(&id)?;
    state.employees.update(id, json_body(body)?).await?;
    Ok(ApiResponse::no_content())
}

/// DELETE /employees/:id
pub async fn delete(Extension(state): Extension<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    state.employees.delete(parse_id(&id)?).await?;
    Ok(ApiResponse::no_content())
}

/// GET /employees/territories - checklist with nothing selected
pub async fn territories(Extension(state): Extension<AppState>) -> ApiResult<Vec<TerritoryOption>> {
    let options = state.employees.territories(None).await?;
    Ok(ApiResponse::success(options))
}

/// GET /employees/:id/territories
pub async fn employee_territories(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<TerritoryOption>> {
    let options = state.employees.territories(Some(parse_id(&id)?)).await?;
    Ok(ApiResponse::success(options))
}
