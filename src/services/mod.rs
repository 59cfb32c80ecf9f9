pub mod employee_service;
pub mod product_service;
pub mod reconciler;

#[cfg(test)]
mod contended_store;

pub use employee_service::{EmployeeCriteria, EmployeeService};
pub use product_service::{ProductCriteria, ProductService};
