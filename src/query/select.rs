use serde_json::Value;
use sqlx::{self, postgres::PgArguments, FromRow, PgPool, Row};

use super::error::QueryError;
use super::page::PageParams;
use super::sort::SortSpec;

/// Compiled SQL plus its positional bind parameters.
#[derive(Debug, Clone)]
pub struct SqlStatement {
    pub sql: String,
    pub params: Vec<Value>,
}

/// Composable SELECT statement assembled from ordered parts.
///
/// Read endpoints build their queries by pushing parts conditionally:
/// join snippets, computed select expressions, filter predicates with
/// numbered bind parameters, a whitelisted sort, and a pagination window.
/// The struct owns parameter numbering: `bind()` is the only way to
/// introduce a placeholder, so composition order can never desynchronize
/// the parameter list from the generated SQL.
pub struct SelectQuery {
    from: String,
    columns: Vec<String>,
    joins: Vec<String>,
    predicates: Vec<String>,
    order: Option<SortSpec>,
    window: Option<(i64, i64)>, // (limit, offset)
    params: Vec<Value>,
}

impl SelectQuery {
    pub fn from(table: impl Into<String>) -> Result<Self, QueryError> {
        let from = table.into();
        Self::validate_table_expr(&from)?;
        Ok(Self {
            from,
            columns: vec![],
            joins: vec![],
            predicates: vec![],
            order: None,
            window: None,
            params: vec![],
        })
    }

    /// Register a bind parameter and return its `$n` placeholder.
    pub fn bind(&mut self, value: Value) -> String {
        self.params.push(value);
        format!("${}", self.params.len())
    }

    pub fn column(&mut self, expr: impl Into<String>) -> &mut Self {
        self.columns.push(expr.into());
        self
    }

    pub fn columns(&mut self, exprs: &[&str]) -> &mut Self {
        self.columns.extend(exprs.iter().map(|c| c.to_string()));
        self
    }

    pub fn join(&mut self, snippet: impl Into<String>) -> &mut Self {
        self.joins.push(snippet.into());
        self
    }

    /// Add a raw predicate. Placeholders inside must come from `bind()`.
    pub fn filter(&mut self, predicate: impl Into<String>) -> &mut Self {
        self.predicates.push(predicate.into());
        self
    }

    /// Equality predicate with a bound parameter.
    pub fn filter_eq(&mut self, column: &str, value: Value) -> &mut Self {
        let p = self.bind(value);
        self.predicates.push(format!("{} = {}", column, p));
        self
    }

    /// Case-insensitive substring search over any of the given columns.
    pub fn filter_search(&mut self, columns: &[&str], term: &str) -> &mut Self {
        let p = self.bind(Value::String(format!("%{}%", term)));
        let clauses: Vec<String> =
            columns.iter().map(|c| format!("{} ILIKE {}", c, p)).collect();
        self.predicates.push(format!("({})", clauses.join(" OR ")));
        self
    }

    pub fn order_by(&mut self, spec: SortSpec) -> &mut Self {
        self.order = Some(spec);
        self
    }

    pub fn paginate(&mut self, page: PageParams) -> &mut Self {
        self.window = Some((page.limit, page.offset()));
        self
    }

    pub fn limit(&mut self, limit: i64) -> &mut Self {
        self.window = Some((limit, 0));
        self
    }

    pub fn to_sql(&self) -> SqlStatement {
        let select_clause = if self.columns.is_empty() {
            "*".to_string()
        } else {
            self.columns.join(", ")
        };

        let sql = [
            format!("SELECT {}", select_clause),
            format!("FROM {}", self.from),
            self.joins.join(" "),
            if self.predicates.is_empty() {
                String::new()
            } else {
                format!("WHERE {}", self.predicates.join(" AND "))
            },
            match &self.order {
                Some(spec) => format!("ORDER BY {}", spec.to_sql()),
                None => String::new(),
            },
            match self.window {
                Some((limit, 0)) => format!("LIMIT {}", limit),
                Some((limit, offset)) => format!("LIMIT {} OFFSET {}", limit, offset),
                None => String::new(),
            },
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        SqlStatement { sql, params: self.params.clone() }
    }

    /// COUNT(*) variant over the same joins and predicates, without the
    /// select list, sort, or window. The full bind list is reused, so
    /// paginated queries must keep their binds inside predicates.
    pub fn to_count_sql(&self) -> SqlStatement {
        let sql = [
            "SELECT COUNT(*) AS count".to_string(),
            format!("FROM {}", self.from),
            self.joins.join(" "),
            if self.predicates.is_empty() {
                String::new()
            } else {
                format!("WHERE {}", self.predicates.join(" AND "))
            },
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        SqlStatement { sql, params: self.params.clone() }
    }

    pub async fn fetch_all<T>(&self, pool: &PgPool) -> Result<Vec<T>, sqlx::Error>
    where
        T: for<'r> FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
    {
        let stmt = self.to_sql();
        let mut q = sqlx::query_as::<_, T>(&stmt.sql);
        for p in stmt.params.iter() {
            q = bind_param_query_as(q, p);
        }
        q.fetch_all(pool).await
    }

    pub async fn fetch_optional<T>(&self, pool: &PgPool) -> Result<Option<T>, sqlx::Error>
    where
        T: for<'r> FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
    {
        let stmt = self.to_sql();
        let mut q = sqlx::query_as::<_, T>(&stmt.sql);
        for p in stmt.params.iter() {
            q = bind_param_query_as(q, p);
        }
        q.fetch_optional(pool).await
    }

    pub async fn count(&self, pool: &PgPool) -> Result<i64, sqlx::Error> {
        let stmt = self.to_count_sql();
        let mut q = sqlx::query(&stmt.sql);
        for p in stmt.params.iter() {
            q = bind_param_query(q, p);
        }
        let row = q.fetch_one(pool).await?;
        row.try_get("count")
    }

    fn validate_table_expr(expr: &str) -> Result<(), QueryError> {
        if expr.trim().is_empty() {
            return Err(QueryError::InvalidTableName("Table name cannot be empty".to_string()));
        }
        // Allow "table" or "table alias"
        for token in expr.split_whitespace() {
            let mut chars = token.chars();
            let first = chars.next().unwrap();
            if !(first.is_alphabetic() || first == '_')
                || !token.chars().all(|c| c.is_alphanumeric() || c == '_')
            {
                return Err(QueryError::InvalidTableName(format!(
                    "Invalid table name format: {}",
                    expr
                )));
            }
        }
        Ok(())
    }
}

fn bind_param_query<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    v: &'q Value,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s),
        // Arrays and objects bind as JSONB
        other => q.bind(other.clone()),
    }
}

fn bind_param_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    v: &'q Value,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, sqlx::postgres::PgRow>,
{
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s),
        other => q.bind(other.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::sort::SortDirection;
    use serde_json::json;

    #[test]
    fn bare_query_selects_everything() {
        let q = SelectQuery::from("videos").unwrap();
        assert_eq!(q.to_sql().sql, "SELECT * FROM videos");
    }

    #[test]
    fn composes_parts_in_order() {
        let mut q = SelectQuery::from("videos v").unwrap();
        q.join("JOIN users u ON u.id = v.owner_id")
            .columns(&["v.id", "v.title", "u.username"])
            .filter("v.is_published = TRUE")
            .order_by(SortSpec::new("v.created_at", SortDirection::Desc))
            .paginate(PageParams { page: 2, limit: 10 });

        let stmt = q.to_sql();
        assert_eq!(
            stmt.sql,
            "SELECT v.id, v.title, u.username FROM videos v \
             JOIN users u ON u.id = v.owner_id \
             WHERE v.is_published = TRUE \
             ORDER BY v.created_at DESC LIMIT 10 OFFSET 10"
        );
        assert!(stmt.params.is_empty());
    }

    #[test]
    fn bind_numbers_placeholders_in_push_order() {
        let mut q = SelectQuery::from("videos v").unwrap();
        q.filter_search(&["v.title", "v.description"], "rust");
        q.filter_eq("v.owner_id", json!("abc"));

        let stmt = q.to_sql();
        assert!(stmt.sql.contains("(v.title ILIKE $1 OR v.description ILIKE $1)"));
        assert!(stmt.sql.contains("v.owner_id = $2"));
        assert_eq!(stmt.params, vec![json!("%rust%"), json!("abc")]);
    }

    #[test]
    fn bound_placeholder_is_reusable_in_column_exprs() {
        let mut q = SelectQuery::from("videos v").unwrap();
        let viewer = q.bind(json!("viewer-id"));
        q.column(format!(
            "EXISTS (SELECT 1 FROM likes l WHERE l.target_id = v.id AND l.user_id = {}) AS is_liked",
            viewer
        ));
        let id = q.bind(json!("video-id"));
        q.filter(format!("v.id = {}", id));

        let stmt = q.to_sql();
        assert!(stmt.sql.contains("l.user_id = $1"));
        assert!(stmt.sql.contains("v.id = $2"));
        assert_eq!(stmt.params.len(), 2);
    }

    #[test]
    fn count_drops_select_order_and_window() {
        let mut q = SelectQuery::from("videos v").unwrap();
        q.join("JOIN users u ON u.id = v.owner_id")
            .columns(&["v.id"])
            .filter("v.is_published = TRUE")
            .order_by(SortSpec::new("v.created_at", SortDirection::Desc))
            .paginate(PageParams { page: 1, limit: 10 });

        let stmt = q.to_count_sql();
        assert_eq!(
            stmt.sql,
            "SELECT COUNT(*) AS count FROM videos v \
             JOIN users u ON u.id = v.owner_id \
             WHERE v.is_published = TRUE"
        );
    }

    #[test]
    fn rejects_bad_table_expressions() {
        assert!(SelectQuery::from("").is_err());
        assert!(SelectQuery::from("videos; DROP TABLE users").is_err());
        assert!(SelectQuery::from("1videos").is_err());
        assert!(SelectQuery::from("videos v").is_ok());
    }
}
