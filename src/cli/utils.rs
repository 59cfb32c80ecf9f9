use serde_json::{json, Value};

use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ "success": true, "message": message }))?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Print `value` as pretty JSON, or hand it to `text` for human output
pub fn output_value(output_format: &OutputFormat, value: &Value, text: impl FnOnce(&Value)) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Text => text(value),
    }
    Ok(())
}

/// Print a paged list body (`{<key>: [...], totalPages}`) one row per item
pub fn output_page(
    output_format: &OutputFormat,
    body: &Value,
    key: &str,
    page: i64,
    row: impl Fn(&Value) -> String,
) -> anyhow::Result<()> {
    output_value(output_format, body, |body| {
        let items = body.get(key).and_then(Value::as_array).cloned().unwrap_or_default();
        if items.is_empty() {
            println!("No {} found", key);
        }
        for item in &items {
            println!("{}", row(item));
        }
        let total_pages = body.get("totalPages").and_then(Value::as_i64).unwrap_or(0);
        println!("Page {} of {}", page, total_pages);
    })
}

/// String field or empty
pub fn text<'a>(value: &'a Value, field: &str) -> &'a str {
    value.get(field).and_then(Value::as_str).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_defaults_to_empty() {
        let value = json!({ "lastName": "Davolio", "region": null });
        assert_eq!(text(&value, "lastName"), "Davolio");
        assert_eq!(text(&value, "region"), "");
        assert_eq!(text(&value, "missing"), "");
    }
}
