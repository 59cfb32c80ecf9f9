use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::page::PageRequest;
use super::types::{FilterOp, FilterOrderInfo, FilterWhereInfo, Filterable, SqlParam, SqlResult};

/// Validated query over one base table: conditions, order, and a LIMIT/OFFSET window.
///
/// The same conditions render to parameterized SQL and evaluate against rows in memory,
/// so every store backend shares one matching semantics.
#[derive(Debug, Clone)]
pub struct Filter {
    table_name: String,
    joins: Vec<String>,
    select_columns: Vec<String>,
    conditions: Vec<FilterWhereInfo>,
    order_data: Vec<FilterOrderInfo>,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl Filter {
    pub fn new(table_name: impl Into<String>) -> Result<Self, FilterError> {
        let table_name = table_name.into();
        Self::validate_table_name(&table_name)?;
        Ok(Self {
            table_name,
            joins: vec![],
            select_columns: vec![],
            conditions: vec![],
            order_data: vec![],
            limit: None,
            offset: None,
        })
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn conditions(&self) -> &[FilterWhereInfo] {
        &self.conditions
    }

    /// Select columns, either bare (`last_name`) or table-qualified (`categories.category_name`)
    pub fn select(&mut self, columns: &[&str]) -> Result<&mut Self, FilterError> {
        Self::validate_select_columns(columns)?;
        self.select_columns = columns.iter().map(|c| c.to_string()).collect();
        Ok(self)
    }

    /// Inner-join `table` on `table.column = base.column`
    pub fn join(&mut self, table: &str, column: &str) -> Result<&mut Self, FilterError> {
        Self::validate_table_name(table)?;
        Self::validate_identifier(column)?;
        self.joins.push(format!(
            "JOIN \"{t}\" ON \"{t}\".\"{c}\" = \"{base}\".\"{c}\"",
            t = table,
            c = column,
            base = self.table_name
        ));
        Ok(self)
    }

    /// Case-insensitive substring match. Absent or empty needles add no condition.
    pub fn contains(&mut self, column: &str, needle: Option<&str>) -> Result<&mut Self, FilterError> {
        Self::validate_identifier(column)?;
        if let Some(needle) = needle.filter(|n| !n.is_empty()) {
            self.conditions.push(FilterWhereInfo {
                column: column.to_string(),
                operator: FilterOp::Contains,
                data: SqlParam::Text(needle.to_string()),
            });
        }
        Ok(self)
    }

    /// Exact equality. An absent value adds no condition.
    pub fn equals(&mut self, column: &str, value: Option<i64>) -> Result<&mut Self, FilterError> {
        Self::validate_identifier(column)?;
        if let Some(value) = value {
            self.conditions.push(FilterWhereInfo {
                column: column.to_string(),
                operator: FilterOp::Eq,
                data: SqlParam::Int(value),
            });
        }
        Ok(self)
    }

    pub fn order_asc(&mut self, column: &str) -> Result<&mut Self, FilterError> {
        Self::validate_identifier(column)?;
        self.order_data.push(FilterOrder::ascending(column));
        Ok(self)
    }

    pub fn limit(&mut self, limit: i64, offset: Option<i64>) -> Result<&mut Self, FilterError> {
        if limit < 0 { return Err(FilterError::InvalidLimit("Limit must be non-negative".to_string())); }
        if let Some(off) = offset { if off < 0 { return Err(FilterError::InvalidOffset("Offset must be non-negative".to_string())); } }
        self.limit = Some(limit);
        self.offset = offset;
        Ok(self)
    }

    pub fn page(&mut self, request: &PageRequest) -> Result<&mut Self, FilterError> {
        self.limit(request.page_size(), Some(request.offset()))
    }

    pub fn matches<T: Filterable>(&self, row: &T) -> bool {
        FilterWhere::matches(&self.conditions, row)
    }

    pub fn to_sql(&self) -> SqlResult {
        let (where_clause, mut params) = FilterWhere::generate(&self.table_name, &self.conditions, 0);
        let order_clause = FilterOrder::generate(&self.table_name, &self.order_data);
        let limit_clause = self.build_limit_clause(&mut params);

        let query = [
            format!("SELECT {}", self.build_select_clause()),
            self.build_from_clause(),
            format!("WHERE {}", where_clause),
            order_clause,
            limit_clause,
        ].into_iter().filter(|s| !s.is_empty()).collect::<Vec<_>>().join(" ");

        SqlResult { query, params }
    }

    pub fn to_count_sql(&self) -> SqlResult {
        let (where_clause, params) = FilterWhere::generate(&self.table_name, &self.conditions, 0);
        let query = format!("SELECT COUNT(*) AS count {} WHERE {}", self.build_from_clause(), where_clause);
        SqlResult { query, params }
    }

    fn validate_table_name(name: &str) -> Result<(), FilterError> {
        if name.is_empty() { return Err(FilterError::InvalidTableName("Table name cannot be empty".to_string())); }
        if !Self::is_identifier(name) {
            return Err(FilterError::InvalidTableName(format!("Invalid table name format: {}", name)));
        }
        Ok(())
    }

    fn validate_identifier(column: &str) -> Result<(), FilterError> {
        if column.is_empty() { return Err(FilterError::InvalidColumn("Column name cannot be empty".to_string())); }
        if !Self::is_identifier(column) {
            return Err(FilterError::InvalidColumn(format!("Invalid column name format: {}", column)));
        }
        Ok(())
    }

    fn validate_select_columns(columns: &[&str]) -> Result<(), FilterError> {
        for column in columns {
            if *column == "*" { continue; }
            for part in column.split('.') {
                Self::validate_identifier(part)?;
            }
        }
        Ok(())
    }

    fn is_identifier(name: &str) -> bool {
        let mut chars = name.chars();
        match chars.next() {
            Some(first) if first.is_ascii_alphabetic() || first == '_' => {
                chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            }
            _ => false,
        }
    }

    fn build_select_clause(&self) -> String {
        if self.select_columns.is_empty() || self.select_columns.iter().any(|c| c == "*") {
            return "*".to_string();
        }
        self.select_columns
            .iter()
            .map(|c| match c.split_once('.') {
                Some((table, column)) => format!("\"{}\".\"{}\"", table, column),
                None => format!("\"{}\".\"{}\"", self.table_name, c),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn build_from_clause(&self) -> String {
        let mut from = format!("FROM \"{}\"", self.table_name);
        for join in &self.joins {
            from.push(' ');
            from.push_str(join);
        }
        from
    }

    fn build_limit_clause(&self, params: &mut Vec<SqlParam>) -> String {
        let mut clause = String::new();
        if let Some(l) = self.limit {
            params.push(SqlParam::Int(l));
            clause.push_str(&format!("LIMIT ${}", params.len()));
        }
        if let Some(o) = self.offset {
            params.push(SqlParam::Int(o));
            if !clause.is_empty() { clause.push(' '); }
            clause.push_str(&format!("OFFSET ${}", params.len()));
        }
        clause
    }
}
