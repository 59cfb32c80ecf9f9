pub mod employee;
pub mod product;
pub mod reference;
pub mod territory;

pub use employee::{
    Employee, EmployeeFields, EmployeeInput, EmployeeSummary, EmployeeWrite, EMPLOYEE_COLUMNS, EMPLOYEE_SUMMARY_COLUMNS,
};
pub use product::{Product, ProductFields, ProductInput, ProductSummary, PRODUCT_COLUMNS, PRODUCT_SUMMARY_COLUMNS};
pub use reference::{Category, Supplier};
pub use territory::{Territory, TerritoryOption, TerritorySelection};
