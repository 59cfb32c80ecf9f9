use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

use crate::error::ApiError;
use crate::filter::Filterable;
use crate::validation::FieldErrors;

use super::territory::TerritorySelection;

/// Scalar profile columns of an employee
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeFields {
    pub last_name: String,
    pub first_name: String,
    pub title: Option<String>,
    pub title_of_courtesy: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub hire_date: Option<NaiveDate>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub home_phone: Option<String>,
    pub extension: Option<String>,
    pub notes: Option<String>,
    pub reports_to: Option<i32>,
    pub photo_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub employee_id: i32,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub fields: EmployeeFields,
}

pub const EMPLOYEE_COLUMNS: &[&str] = &[
    "employee_id", "last_name", "first_name", "title", "title_of_courtesy", "birth_date", "hire_date",
    "address", "city", "region", "postal_code", "country", "home_phone", "extension", "notes",
    "reports_to", "photo_path",
];

/// List projection; omits the manager reference and photo path
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeSummary {
    pub employee_id: i32,
    pub last_name: String,
    pub first_name: String,
    pub title: Option<String>,
    pub title_of_courtesy: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub hire_date: Option<NaiveDate>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub home_phone: Option<String>,
    pub extension: Option<String>,
    pub notes: Option<String>,
}

pub const EMPLOYEE_SUMMARY_COLUMNS: &[&str] = &[
    "employee_id", "last_name", "first_name", "title", "title_of_courtesy", "birth_date", "hire_date",
    "address", "city", "region", "postal_code", "country", "home_phone", "extension", "notes",
];

impl From<&Employee> for EmployeeSummary {
    fn from(e: &Employee) -> Self {
        let f = &e.fields;
        Self {
            employee_id: e.employee_id,
            last_name: f.last_name.clone(),
            first_name: f.first_name.clone(),
            title: f.title.clone(),
            title_of_courtesy: f.title_of_courtesy.clone(),
            birth_date: f.birth_date,
            hire_date: f.hire_date,
            address: f.address.clone(),
            city: f.city.clone(),
            region: f.region.clone(),
            postal_code: f.postal_code.clone(),
            country: f.country.clone(),
            home_phone: f.home_phone.clone(),
            extension: f.extension.clone(),
            notes: f.notes.clone(),
        }
    }
}

impl Filterable for Employee {
    fn text_column(&self, column: &str) -> Option<&str> {
        let f = &self.fields;
        match column {
            "last_name" => Some(f.last_name.as_str()),
            "first_name" => Some(f.first_name.as_str()),
            "title" => f.title.as_deref(),
            "city" => f.city.as_deref(),
            "country" => f.country.as_deref(),
            _ => None,
        }
    }

    fn int_column(&self, column: &str) -> Option<i64> {
        match column {
            "employee_id" => Some(self.employee_id.into()),
            "reports_to" => self.fields.reports_to.map(Into::into),
            _ => None,
        }
    }
}

/// Create/update payload as posted by the employee form
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeInput {
    #[serde(alias = "employeeID")]
    pub employee_id: Option<i32>,
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub title: Option<String>,
    pub title_of_courtesy: Option<String>,
    pub birth_date: Option<String>,
    pub hire_date: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub home_phone: Option<String>,
    pub extension: Option<String>,
    pub notes: Option<String>,
    pub reports_to: Option<Value>,
    pub photo_path: Option<String>,
    /// `None` leaves existing assignments untouched
    pub territories: Option<Vec<TerritorySelection>>,
}

/// A validated write: scalar columns plus the desired territory set, if any
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeWrite {
    pub fields: EmployeeFields,
    pub territories: Option<BTreeSet<String>>,
}

impl EmployeeInput {
    pub fn validate(self) -> Result<EmployeeWrite, ApiError> {
        let mut errors = FieldErrors::new();

        let last_name = errors.required_text("lastName", self.last_name);
        let first_name = errors.required_text("firstName", self.first_name);
        let title = errors.required_text("title", self.title);

        let fields = EmployeeFields {
            last_name,
            first_name,
            title: Some(title),
            title_of_courtesy: errors.optional_text(self.title_of_courtesy),
            birth_date: errors.optional_date("birthDate", self.birth_date),
            hire_date: errors.optional_date("hireDate", self.hire_date),
            address: errors.optional_text(self.address),
            city: errors.optional_text(self.city),
            region: errors.optional_text(self.region),
            postal_code: errors.optional_text(self.postal_code),
            country: errors.optional_text(self.country),
            home_phone: errors.optional_text(self.home_phone),
            extension: errors.optional_text(self.extension),
            notes: errors.optional_text(self.notes),
            reports_to: errors.optional_int("reportsTo", self.reports_to),
            photo_path: errors.optional_text(self.photo_path),
        };

        let territories = self.territories.map(|selections| {
            if selections.iter().any(|s| s.territory_id.trim().is_empty()) {
                errors.add("territories", "Territory id cannot be blank");
            }
            TerritorySelection::selected_ids(&selections)
        });

        errors.into_result()?;
        Ok(EmployeeWrite { fields, territories })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(value: Value) -> EmployeeInput {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn validates_required_fields_together() {
        let err = input(json!({ "lastName": "", "title": "Rep" })).validate().unwrap_err();
        let body = err.to_json();
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(body["field_errors"].get("lastName").is_some());
        assert!(body["field_errors"].get("firstName").is_some());
        assert!(body["field_errors"].get("title").is_none());
    }

    #[test]
    fn normalizes_form_blanks() {
        let write = input(json!({
            "lastName": "Davolio",
            "firstName": "Nancy",
            "title": "Sales Representative",
            "birthDate": "",
            "hireDate": "1992-05-01",
            "region": "",
            "reportsTo": "",
        }))
        .validate()
        .unwrap();

        assert_eq!(write.fields.birth_date, None);
        assert_eq!(write.fields.hire_date, NaiveDate::from_ymd_opt(1992, 5, 1));
        assert_eq!(write.fields.region, None);
        assert_eq!(write.fields.reports_to, None);
        assert_eq!(write.territories, None);
    }

    #[test]
    fn collects_selected_territories_from_legacy_keys() {
        let write = input(json!({
            "employeeID": 3,
            "lastName": "Leverling",
            "firstName": "Janet",
            "title": "Sales Representative",
            "territories": [
                { "territoryID": "30346", "territoryDescription": "Atlanta", "regionID": 4, "isSelected": true },
                { "territoryID": "31406", "isSelected": false },
                { "territoryId": "30346", "isSelected": true },
            ]
        }))
        .validate()
        .unwrap();

        let expected: BTreeSet<String> = ["30346".to_string()].into_iter().collect();
        assert_eq!(write.territories, Some(expected));
    }

    #[test]
    fn summary_drops_manager_and_photo() {
        let employee = Employee {
            employee_id: 1,
            fields: EmployeeFields {
                last_name: "Davolio".into(),
                first_name: "Nancy".into(),
                title: Some("Sales Representative".into()),
                title_of_courtesy: None,
                birth_date: None,
                hire_date: None,
                address: None,
                city: Some("Seattle".into()),
                region: None,
                postal_code: None,
                country: None,
                home_phone: None,
                extension: None,
                notes: None,
                reports_to: Some(2),
                photo_path: Some("http://accweb/emmployees/davolio.bmp".into()),
            },
        };
        let summary = serde_json::to_value(EmployeeSummary::from(&employee)).unwrap();
        assert_eq!(summary["employeeId"], 1);
        assert_eq!(summary["city"], "Seattle");
        assert!(summary.get("reportsTo").is_none());
        assert!(summary.get("photoPath").is_none());

        let full = serde_json::to_value(&employee).unwrap();
        assert_eq!(full["reportsTo"], 2);
        assert_eq!(full["lastName"], "Davolio");
    }
}
