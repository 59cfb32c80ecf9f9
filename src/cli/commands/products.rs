use clap::Subcommand;
use serde_json::Value;

use crate::cli::client::ApiClient;
use crate::cli::utils::{output_page, output_success, output_value, text};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum ProductCommands {
    #[command(about = "List products one page at a time")]
    List {
        #[arg(long, default_value_t = 1, help = "Page number (1-based)")]
        page: i64,
    },

    #[command(about = "Search products by name, category or supplier")]
    Search {
        #[arg(long, help = "Product name contains")]
        name: Option<String>,
        #[arg(long, help = "Category ID")]
        category: Option<i32>,
        #[arg(long, help = "Supplier ID")]
        supplier: Option<i32>,
        #[arg(long, default_value_t = 1, help = "Page number (1-based)")]
        page: i64,
    },

    #[command(about = "Show one product")]
    Show {
        #[arg(help = "Product ID")]
        id: i32,
    },

    #[command(about = "Delete a product")]
    Delete {
        #[arg(help = "Product ID")]
        id: i32,
    },

    #[command(about = "List product categories")]
    Categories,

    #[command(about = "List suppliers")]
    Suppliers,
}

fn summary_row(product: &Value) -> String {
    let category = product.get("category").map(|c| text(c, "categoryName")).unwrap_or_default();
    let price = product.get("unitPrice").and_then(Value::as_f64).unwrap_or_default();
    let discontinued = product.get("discontinued").and_then(Value::as_bool).unwrap_or(false);
    format!(
        "{:>4}  {}  [{}]  {:.2}{}",
        product.get("productId").and_then(Value::as_i64).unwrap_or_default(),
        text(product, "productName"),
        category,
        price,
        if discontinued { "  (discontinued)" } else { "" },
    )
}

fn print_pairs(list: &Value, id_field: &str, name_field: &str) {
    for item in list.as_array().into_iter().flatten() {
        println!(
            "{:>4}  {}",
            item.get(id_field).and_then(Value::as_i64).unwrap_or_default(),
            text(item, name_field)
        );
    }
}

pub async fn handle(cmd: ProductCommands, client: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ProductCommands::List { page } => {
            let body = client.get("/products", &[("page", Some(page.to_string()))]).await?;
            output_page(&output_format, &body, "products", page, summary_row)
        }
        ProductCommands::Search { name, category, supplier, page } => {
            let body = client
                .get(
                    "/products/search",
                    &[
                        ("productName", name),
                        ("categoryId", category.map(|c| c.to_string())),
                        ("supplierId", supplier.map(|s| s.to_string())),
                        ("page", Some(page.to_string())),
                    ],
                )
                .await?;
            output_page(&output_format, &body, "products", page, summary_row)
        }
        ProductCommands::Show { id } => {
            let body = client.get(&format!("/products/{}", id), &[]).await?;
            output_value(&output_format, &body, |p| {
                println!(
                    "{:>4}  {}",
                    p.get("productId").and_then(Value::as_i64).unwrap_or_default(),
                    text(p, "productName")
                );
                println!("  Quantity per unit: {}", text(p, "quantityPerUnit"));
                println!("  Unit price: {:.2}", p.get("unitPrice").and_then(Value::as_f64).unwrap_or_default());
                for (label, field) in [
                    ("In stock", "unitsInStock"),
                    ("On order", "unitsOnOrder"),
                    ("Reorder level", "reorderLevel"),
                ] {
                    println!("  {}: {}", label, p.get(field).and_then(Value::as_i64).unwrap_or_default());
                }
            })
        }
        ProductCommands::Delete { id } => {
            client.delete(&format!("/products/{}", id)).await?;
            output_success(&output_format, &format!("Product {} deleted", id))
        }
        ProductCommands::Categories => {
            let body = client.get("/products/categories", &[]).await?;
            output_value(&output_format, &body, |list| print_pairs(list, "categoryId", "categoryName"))
        }
        ProductCommands::Suppliers => {
            let body = client.get("/products/suppliers", &[]).await?;
            output_value(&output_format, &body, |list| print_pairs(list, "supplierId", "companyName"))
        }
    }
}
