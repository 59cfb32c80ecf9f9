use clap::Subcommand;
use serde_json::Value;

use crate::cli::client::ApiClient;
use crate::cli::utils::{output_page, output_success, output_value, text};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum EmployeeCommands {
    #[command(about = "List employees one page at a time")]
    List {
        #[arg(long, default_value_t = 1, help = "Page number (1-based)")]
        page: i64,
    },

    #[command(about = "Search employees by name or title substring")]
    Search {
        #[arg(long, help = "Last name contains")]
        last_name: Option<String>,
        #[arg(long, help = "First name contains")]
        first_name: Option<String>,
        #[arg(long, help = "Title contains")]
        title: Option<String>,
        #[arg(long, default_value_t = 1, help = "Page number (1-based)")]
        page: i64,
    },

    #[command(about = "Show one employee")]
    Show {
        #[arg(help = "Employee ID")]
        id: i32,
    },

    #[command(about = "Territory checklist, selected for the given employee")]
    Territories {
        #[arg(help = "Employee ID (omit for the unassigned checklist)")]
        id: Option<i32>,
    },

    #[command(about = "Delete an employee and its territory assignments")]
    Delete {
        #[arg(help = "Employee ID")]
        id: i32,
    },
}

fn summary_row(employee: &Value) -> String {
    format!(
        "{:>4}  {}, {}  {}",
        employee.get("employeeId").and_then(Value::as_i64).unwrap_or_default(),
        text(employee, "lastName"),
        text(employee, "firstName"),
        text(employee, "title"),
    )
}

pub async fn handle(cmd: EmployeeCommands, client: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        EmployeeCommands::List { page } => {
            let body = client.get("/employees", &[("page", Some(page.to_string()))]).await?;
            output_page(&output_format, &body, "employees", page, summary_row)
        }
        EmployeeCommands::Search { last_name, first_name, title, page } => {
            let body = client
                .get(
                    "/employees/search",
                    &[
                        ("lastName", last_name),
                        ("firstName", first_name),
                        ("title", title),
                        ("page", Some(page.to_string())),
                    ],
                )
                .await?;
            output_page(&output_format, &body, "employees", page, summary_row)
        }
        EmployeeCommands::Show { id } => {
            let body = client.get(&format!("/employees/{}", id), &[]).await?;
            output_value(&output_format, &body, |e| {
                println!("{}", summary_row(e));
                for (label, field) in [
                    ("Hired", "hireDate"),
                    ("City", "city"),
                    ("Country", "country"),
                    ("Phone", "homePhone"),
                ] {
                    let value = text(e, field);
                    if !value.is_empty() {
                        println!("  {}: {}", label, value);
                    }
                }
                if let Some(manager) = e.get("reportsTo").and_then(Value::as_i64) {
                    println!("  Reports to: {}", manager);
                }
            })
        }
        EmployeeCommands::Territories { id } => {
            let path = match id {
                Some(id) => format!("/employees/{}/territories", id),
                None => "/employees/territories".to_string(),
            };
            let body = client.get(&path, &[]).await?;
            output_value(&output_format, &body, |territories| {
                for t in territories.as_array().into_iter().flatten() {
                    let mark = if t.get("isSelected").and_then(Value::as_bool).unwrap_or(false) { "x" } else { " " };
                    println!("[{}] {}  {}", mark, text(t, "territoryId"), text(t, "territoryDescription"));
                }
            })
        }
        EmployeeCommands::Delete { id } => {
            client.delete(&format!("/employees/{}", id)).await?;
            output_success(&output_format, &format!("Employee {} deleted", id))
        }
    }
}
