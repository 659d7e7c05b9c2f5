use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::postgres::{PgArguments, PgRow, PgTypeInfo};
use sqlx::types::BigDecimal;
use sqlx::{Column, PgPool, Postgres, Row as _, TypeInfo};

use super::manager::DatabaseError;
use super::{Row, Storage};
use crate::sql::Statement;

/// `Storage` backed by a PostgreSQL pool
#[derive(Clone)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Storage for PgStorage {
    async fn fetch_all(&self, statement: &Statement) -> Result<Vec<Row>, DatabaseError> {
        tracing::debug!("SQL: {} params={:?}", statement.sql(), statement.params());

        let rows = bind_all(statement).fetch_all(&self.pool).await?;
        rows.iter().map(row_to_json).collect()
    }

    async fn fetch_optional(&self, statement: &Statement) -> Result<Option<Row>, DatabaseError> {
        tracing::debug!("SQL: {} params={:?}", statement.sql(), statement.params());

        match bind_all(statement).fetch_optional(&self.pool).await? {
            Some(row) => Ok(Some(row_to_json(&row)?)),
            None => Ok(None),
        }
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

fn bind_all(statement: &Statement) -> sqlx::query::Query<'_, Postgres, PgArguments> {
    statement
        .params()
        .iter()
        .fold(sqlx::query(statement.sql()), |q, v| bind_param(q, v))
}

/// Bind parameter to SQL query
fn bind_param<'q>(
    q: sqlx::query::Query<'q, Postgres, PgArguments>,
    v: &'q Value,
) -> sqlx::query::Query<'q, Postgres, PgArguments> {
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(u) = n.as_u64() {
                // Postgres has no unsigned 64-bit type
                q.bind(u as i64)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s.as_str()),
        Value::Array(_) | Value::Object(_) => q.bind(v), // JSONB
    }
}

/// Convert database row to a JSON object keyed by column name
fn row_to_json(row: &PgRow) -> Result<Row, DatabaseError> {
    let mut record = Map::new();
    for (i, column) in row.columns().iter().enumerate() {
        let value = extract_column_value(row, i, column.type_info())?;
        record.insert(column.name().to_string(), value);
    }
    Ok(record)
}

fn extract_column_value(row: &PgRow, index: usize, type_info: &PgTypeInfo) -> Result<Value, DatabaseError> {
    let value = match type_info.name() {
        "TEXT" | "VARCHAR" | "BPCHAR" => row
            .try_get::<Option<String>, _>(index)?
            .map(Value::String),
        "INT2" => row.try_get::<Option<i16>, _>(index)?.map(Value::from),
        "INT4" => row.try_get::<Option<i32>, _>(index)?.map(Value::from),
        "INT8" => row.try_get::<Option<i64>, _>(index)?.map(Value::from),
        // NUMERIC keeps its exact decimal text, e.g. equity "0.1"
        "NUMERIC" => row
            .try_get::<Option<BigDecimal>, _>(index)?
            .map(|d| Value::String(d.to_string())),
        "FLOAT4" => row.try_get::<Option<f32>, _>(index)?.map(|f| Value::from(f as f64)),
        "FLOAT8" => row.try_get::<Option<f64>, _>(index)?.map(Value::from),
        "BOOL" => row.try_get::<Option<bool>, _>(index)?.map(Value::Bool),
        "JSON" | "JSONB" => row.try_get::<Option<Value>, _>(index)?,
        "TIMESTAMPTZ" => row
            .try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(index)?
            .map(|t| Value::String(t.to_rfc3339())),
        other => return Err(DatabaseError::UnsupportedType(other.to_string())),
    };
    Ok(value.unwrap_or(Value::Null))
}
