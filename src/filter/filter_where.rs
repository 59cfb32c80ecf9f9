use super::types::{FilterOp, FilterWhereInfo, Filterable, SqlParam};

pub struct FilterWhere {
    param_values: Vec<SqlParam>,
    param_index: usize,
}

impl FilterWhere {
    pub fn new(starting_param_index: usize) -> Self {
        Self {
            param_values: vec![],
            param_index: starting_param_index,
        }
    }

    /// Render conditions as a `WHERE` body qualified by `table_name`.
    /// Placeholders are numbered from `starting_param_index + 1`.
    pub fn generate(
        table_name: &str,
        conditions: &[FilterWhereInfo],
        starting_param_index: usize,
    ) -> (String, Vec<SqlParam>) {
        let mut filter_where = Self::new(starting_param_index);
        filter_where.build(table_name, conditions)
    }

    fn build(&mut self, table_name: &str, conditions: &[FilterWhereInfo]) -> (String, Vec<SqlParam>) {
        let sql_conditions: Vec<String> = conditions
            .iter()
            .map(|condition| self.build_sql_condition(table_name, condition))
            .collect();
        let where_clause = if sql_conditions.is_empty() { "1=1".to_string() } else { sql_conditions.join(" AND ") };
        (where_clause, std::mem::take(&mut self.param_values))
    }

    fn build_sql_condition(&mut self, table_name: &str, condition: &FilterWhereInfo) -> String {
        let quoted_column = format!("\"{}\".\"{}\"", table_name, condition.column);
        match condition.operator {
            FilterOp::Eq => format!("{} = {}", quoted_column, self.param(condition.data.clone())),
            FilterOp::Contains => {
                let pattern = match &condition.data {
                    SqlParam::Text(needle) => format!("%{}%", escape_like(needle)),
                    SqlParam::Int(n) => format!("%{}%", n),
                };
                format!("{} ILIKE {}", quoted_column, self.param(SqlParam::Text(pattern)))
            }
        }
    }

    fn param(&mut self, value: SqlParam) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        format!("${}", self.param_index)
    }

    /// Evaluate conditions against an in-memory row with the same semantics as the SQL rendering.
    pub fn matches<T: Filterable>(conditions: &[FilterWhereInfo], row: &T) -> bool {
        conditions.iter().all(|condition| match (&condition.operator, &condition.data) {
            (FilterOp::Eq, SqlParam::Int(expected)) => row.int_column(&condition.column) == Some(*expected),
            (FilterOp::Eq, SqlParam::Text(expected)) => row.text_column(&condition.column) == Some(expected.as_str()),
            (FilterOp::Contains, SqlParam::Text(needle)) => row
                .text_column(&condition.column)
                .map(|value| value.to_lowercase().contains(&needle.to_lowercase()))
                .unwrap_or(false),
            (FilterOp::Contains, SqlParam::Int(needle)) => row
                .int_column(&condition.column)
                .map(|value| value.to_string().contains(&needle.to_string()))
                .unwrap_or(false),
        })
    }
}

/// Escape LIKE wildcards so user input is matched literally (backslash is the default escape)
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
