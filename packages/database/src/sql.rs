//! Parameterized SQL rendering for [`Predicate`] trees.
//!
//! Every user-origin value is emitted as a `?` placeholder with a typed
//! parameter; the SQL text itself contains only column names from the
//! compile-time taxonomy. A match-all predicate renders to an empty
//! fragment, so callers can always append it to a query unconditionally.

use collision_dash_collision_models::{FilterColumn, TEXT_SEARCH_COLUMNS};
use collision_dash_query_models::{Clause, Predicate};
use duckdb::ToSql;
use duckdb::types::{ToSqlOutput, Value};

/// A typed query parameter bound at execution time.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// A string parameter.
    Text(String),
    /// An integer parameter.
    Int(i64),
}

impl ToSql for SqlValue {
    fn to_sql(&self) -> duckdb::Result<ToSqlOutput<'_>> {
        match self {
            Self::Text(s) => Ok(ToSqlOutput::Owned(Value::Text(s.clone()))),
            Self::Int(i) => Ok(ToSqlOutput::Owned(Value::BigInt(*i))),
        }
    }
}

/// A rendered filter: a `WHERE` fragment plus its bound parameters.
///
/// `where_sql` is either empty (match all) or starts with `" WHERE "`,
/// so it can be appended to any single-table query over `collisions`.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlFilter {
    where_sql: String,
    params: Vec<SqlValue>,
}

impl SqlFilter {
    /// Returns the `WHERE` fragment (possibly empty).
    #[must_use]
    pub fn where_sql(&self) -> &str {
        &self.where_sql
    }

    /// Returns the parameters to bind, in placeholder order.
    #[must_use]
    pub fn params(&self) -> &[SqlValue] {
        &self.params
    }
}

/// Renders a predicate into a parameterized `WHERE` fragment.
#[must_use]
pub fn render(predicate: &Predicate) -> SqlFilter {
    render_with(predicate, &[])
}

/// Renders a predicate with extra parameter-free conjuncts appended.
///
/// Used by charts that constrain derived columns (e.g. `hour BETWEEN 0
/// AND 23`) on top of the user's filter, without re-assembling the
/// `WHERE` keyword by string pasting.
#[must_use]
pub fn render_with(predicate: &Predicate, extra_conjuncts: &[&str]) -> SqlFilter {
    let mut frags: Vec<String> = Vec::new();
    let mut params: Vec<SqlValue> = Vec::new();

    for clause in &predicate.clauses {
        match clause {
            Clause::StringIn { column, values } => {
                frags.push(in_clause(column.dataset_column(), values.len()));
                params.extend(values.iter().cloned().map(SqlValue::Text));
            }
            Clause::YearIn { years } => {
                frags.push(in_clause(
                    FilterColumn::CrashYear.dataset_column(),
                    years.len(),
                ));
                params.extend(years.iter().map(|&y| SqlValue::Int(i64::from(y))));
            }
            Clause::WeekdayIn { days } => {
                frags.push(in_clause(
                    FilterColumn::CrashWeekday.dataset_column(),
                    days.len(),
                ));
                params.extend(days.iter().map(|d| SqlValue::Int(d.index())));
            }
            Clause::Contains { term } => {
                frags.push(contains_clause());
                let pattern = format!("%{}%", term.to_lowercase());
                params.extend(
                    std::iter::repeat_with(|| SqlValue::Text(pattern.clone()))
                        .take(TEXT_SEARCH_COLUMNS.len()),
                );
            }
        }
    }

    frags.extend(extra_conjuncts.iter().map(ToString::to_string));

    let where_sql = if frags.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", frags.join(" AND "))
    };

    SqlFilter { where_sql, params }
}

/// `col IN (?, ?, ...)` with one placeholder per value.
fn in_clause(column: &str, arity: usize) -> String {
    let placeholders = vec!["?"; arity].join(", ");
    format!("{column} IN ({placeholders})")
}

/// Case-insensitive substring match OR'd across the fixed text columns.
fn contains_clause() -> String {
    let alternatives: Vec<String> = TEXT_SEARCH_COLUMNS
        .iter()
        .map(|col| format!("LOWER(COALESCE(CAST({col} AS VARCHAR), '')) LIKE ?"))
        .collect();
    format!("({})", alternatives.join(" OR "))
}
