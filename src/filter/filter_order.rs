use super::types::{FilterOrderInfo, SortDirection};

pub struct FilterOrder;

impl FilterOrder {
    pub fn generate(table_name: &str, infos: &[FilterOrderInfo]) -> String {
        if infos.is_empty() { return String::new(); }
        let parts: Vec<String> = infos
            .iter()
            .map(|i| format!("\"{}\".\"{}\" {}", table_name, i.column, i.sort.to_sql()))
            .collect();
        format!("ORDER BY {}", parts.join(", "))
    }

    pub fn ascending(column: impl Into<String>) -> FilterOrderInfo {
        FilterOrderInfo { column: column.into(), sort: SortDirection::Asc }
    }
}
